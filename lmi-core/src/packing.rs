//! Symmetric matrix packing.
//!
//! A symmetric m×m matrix has m(m+1)/2 distinct entries. Packing stores the
//! upper triangle (diagonal included) in row-major triangular order: for row
//! r = 0..m, columns c = r..m. The generators of an LMI are packed once into
//! the columns of a dense (m(m+1)/2) × d matrix so that evaluating the
//! weighted sum Σ xᵢ Aᵢ reduces to one matrix-vector product followed by a
//! symmetric scatter.

use nalgebra::DMatrix;

/// Number of distinct entries of a symmetric m×m matrix.
pub fn packed_len(m: usize) -> usize {
    m * (m + 1) / 2
}

/// Pack the upper triangle of `mat` into `out` in row-major triangular order.
///
/// `out.len()` must equal `packed_len(m)`. Entries below the diagonal are
/// never read, so only the upper triangle of `mat` has to be meaningful.
pub fn pack_upper_triangular(mat: &DMatrix<f64>, out: &mut [f64]) {
    let m = mat.nrows();
    assert_eq!(mat.ncols(), m);
    assert_eq!(out.len(), packed_len(m));

    let mut at = 0usize;
    for r in 0..m {
        for c in r..m {
            out[at] = mat[(r, c)];
            at += 1;
        }
    }
}

/// Rebuild the full symmetric matrix from a packed upper triangle.
pub fn unpack_symmetric(v: &[f64], m: usize) -> DMatrix<f64> {
    let mut out = DMatrix::<f64>::zeros(m, m);
    scatter_symmetric(v, &mut out);
    out
}

/// Scatter a packed upper triangle into both triangles of `out`.
///
/// The enumeration order must match [`pack_upper_triangular`]; the diagonal
/// is written once, off-diagonal entries are mirrored.
pub(crate) fn scatter_symmetric(v: &[f64], out: &mut DMatrix<f64>) {
    let m = out.nrows();
    assert_eq!(out.ncols(), m);
    assert_eq!(v.len(), packed_len(m));

    let mut at = 0usize;
    for r in 0..m {
        for c in r..m {
            let val = v[at];
            out[(r, c)] = val;
            out[(c, r)] = val;
            at += 1;
        }
    }
}

/// Build the packed generator matrix of an LMI family.
///
/// Column k holds the packed upper triangle of generator A_{k+1}; the
/// constant term A₀ is skipped. Shape is (m(m+1)/2) × d for a family of
/// d+1 matrices of size m.
pub(crate) fn build_packed_generators(matrices: &[DMatrix<f64>], m: usize) -> DMatrix<f64> {
    let d = matrices.len() - 1;
    let rows = packed_len(m);
    let mut packed = DMatrix::<f64>::zeros(rows, d);

    for (k, gen) in matrices.iter().skip(1).enumerate() {
        pack_upper_triangular(gen, packed.column_mut(k).as_mut_slice());
    }

    packed
}
