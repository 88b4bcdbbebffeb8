//! Linear matrix inequality evaluator.
//!
//! An [`Lmi`] owns a family of symmetric matrices A₀, A₁, ..., A_d and
//! evaluates the matrix-valued affine map M(x) = A₀ + Σ xᵢ Aᵢ, tests M(x)
//! for negative semidefiniteness, and computes boundary normals via the
//! determinant gradient. The evaluator is the per-step hot path of
//! boundary-following random walks over the spectrahedron {x : M(x) ⪯ 0},
//! so the generators are packed once at construction and every evaluation
//! reuses that representation.

use std::fmt;
use std::sync::OnceLock;

use nalgebra::{DMatrix, DVector};

use crate::eigen::{DenseEigenBackend, EigenBackend};
use crate::error::{LmiError, LmiResult};
use crate::packing;

fn lmi_trace_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        if let Ok(v) = std::env::var("LMI_VERBOSE") {
            if let Ok(n) = v.parse::<u8>() {
                return n >= 2;
            }
        }
        false
    })
}

/// Algorithm used for the homogeneous evaluation Σ xᵢ Aᵢ.
///
/// Both variants produce the same matrix up to floating-point associativity;
/// `Naive` is the correctness baseline, `Packed` is the production path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalStrategy {
    /// Accumulate xᵢ · A_{i+1} term by term, in index order
    Naive,
    /// One matrix-vector product against the packed generators, then a
    /// symmetric scatter of the resulting upper triangle
    Packed,
}

/// Sign convention for spectrahedron membership at the boundary.
///
/// Downstream algorithms disagree on whether a singular M(x) is feasible;
/// the inclusive convention (largest eigenvalue ≤ 0) is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryConvention {
    /// M(x) ⪯ 0: largest eigenvalue ≤ 0
    Inclusive,
    /// M(x) ≺ 0: largest eigenvalue < 0
    Strict,
}

/// Evaluator settings.
#[derive(Debug, Clone)]
pub struct LmiSettings {
    /// Evaluation path for Σ xᵢ Aᵢ
    pub strategy: EvalStrategy,

    /// Feasibility convention at the determinant-zero boundary
    pub boundary: BoundaryConvention,

    /// Verify the kernel precondition M(p)·e ≈ 0 before computing the
    /// determinant gradient. Off by default; the gradient routine trusts
    /// its caller on the hot path.
    pub check_kernel: bool,

    /// Relative tolerance for the kernel residual check
    pub kernel_tol: f64,
}

impl Default for LmiSettings {
    fn default() -> Self {
        // Allow environment variable override of the evaluation path,
        // LMI_EVAL_STRATEGY=naive forces the reference summation
        let strategy = match std::env::var("LMI_EVAL_STRATEGY").ok().as_deref() {
            Some("naive") => EvalStrategy::Naive,
            _ => EvalStrategy::Packed,
        };
        let check_kernel = std::env::var("LMI_CHECK_KERNEL").ok().as_deref() == Some("1");

        Self {
            strategy,
            boundary: BoundaryConvention::Inclusive,
            check_kernel,
            kernel_tol: 1e-8,
        }
    }
}

/// Linear matrix inequality A₀ + Σ xᵢ Aᵢ ⪯ 0.
///
/// Immutable after construction: the matrix family and the packed generator
/// representation are written once and only read afterwards, so a single
/// evaluator can be shared by reference across parallel walker threads,
/// each supplying its own point and output buffer.
#[derive(Debug, Clone)]
pub struct Lmi<E = DenseEigenBackend> {
    /// The matrices A₀, A₁, ..., A_d
    matrices: Vec<DMatrix<f64>>,

    /// Dimension of the parameter vector x
    d: usize,

    /// Size of the matrices Aᵢ
    m: usize,

    /// Packed generators: column k holds the m(m+1)/2 distinct entries of
    /// A_{k+1} in row-major triangular order
    packed: DMatrix<f64>,

    settings: LmiSettings,

    eigen: E,
}

fn validate_family(matrices: &[DMatrix<f64>]) -> LmiResult<(usize, usize)> {
    let first = matrices
        .first()
        .ok_or_else(|| LmiError::InvalidInput("matrix family is empty".into()))?;
    let m = first.nrows();
    if m == 0 {
        return Err(LmiError::InvalidInput("matrices must have at least one row".into()));
    }

    for (i, a) in matrices.iter().enumerate() {
        if a.nrows() != a.ncols() {
            return Err(LmiError::InvalidInput(format!(
                "matrix A{} is {}x{}, expected square",
                i,
                a.nrows(),
                a.ncols()
            )));
        }
        if a.nrows() != m {
            return Err(LmiError::InvalidInput(format!(
                "matrix A{} is {}x{}, family size is {}",
                i,
                a.nrows(),
                a.ncols(),
                m
            )));
        }
    }

    Ok((matrices.len() - 1, m))
}

impl Lmi<DenseEigenBackend> {
    /// Create an evaluator from the family A₀, A₁, ..., A_d.
    ///
    /// The first matrix is the constant term; the rest are the generators.
    /// All matrices must be square, of identical size, and symmetric
    /// (symmetry is a caller obligation, not validated here).
    pub fn new(matrices: Vec<DMatrix<f64>>) -> LmiResult<Self> {
        Self::with_settings(matrices, LmiSettings::default())
    }

    /// Create an evaluator with explicit settings.
    pub fn with_settings(matrices: Vec<DMatrix<f64>>, settings: LmiSettings) -> LmiResult<Self> {
        Self::with_backend(matrices, settings, DenseEigenBackend::default())
    }
}

impl<E: EigenBackend> Lmi<E> {
    /// Create an evaluator wired to a custom eigen backend.
    pub fn with_backend(matrices: Vec<DMatrix<f64>>, settings: LmiSettings, eigen: E) -> LmiResult<Self> {
        let (d, m) = validate_family(&matrices)?;
        let packed = packing::build_packed_generators(&matrices, m);

        Ok(Self {
            matrices,
            d,
            m,
            packed,
            settings,
            eigen,
        })
    }

    /// Dimension of the parameter vector x.
    pub fn dimension(&self) -> usize {
        self.d
    }

    /// Size of the matrices Aᵢ.
    pub fn size_of_matrices(&self) -> usize {
        self.m
    }

    pub fn settings(&self) -> &LmiSettings {
        &self.settings
    }

    /// The full family A₀, ..., A_d, read-only.
    pub fn matrices(&self) -> &[DMatrix<f64>] {
        &self.matrices
    }

    /// Borrow Aᵢ; `i` must satisfy 0 ≤ i ≤ d.
    pub fn matrix(&self, i: usize) -> LmiResult<&DMatrix<f64>> {
        self.matrices.get(i).ok_or_else(|| {
            LmiError::InvalidInput(format!(
                "matrix index {} out of range, family has {} matrices",
                i,
                self.matrices.len()
            ))
        })
    }

    fn check_point(&self, x: &DVector<f64>) -> LmiResult<()> {
        if x.len() != self.d {
            return Err(LmiError::InvalidInput(format!(
                "point has length {}, LMI dimension is {}",
                x.len(),
                self.d
            )));
        }
        Ok(())
    }

    /// Compute Σ xᵢ A_{i+1} into a caller-owned buffer.
    ///
    /// The buffer is resized to m×m if its shape disagrees. This is the
    /// in-place form for per-step buffer reuse; [`Self::evaluate_without_a0`]
    /// is the value-returning equivalent.
    pub fn evaluate_without_a0_into(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) -> LmiResult<()> {
        self.check_point(x)?;
        if out.nrows() != self.m || out.ncols() != self.m {
            out.resize_mut(self.m, self.m, 0.0);
        }

        match self.settings.strategy {
            EvalStrategy::Naive => self.eval_naive(x, out),
            EvalStrategy::Packed => self.eval_packed(x, out),
        }
        Ok(())
    }

    /// Compute Σ xᵢ A_{i+1}.
    pub fn evaluate_without_a0(&self, x: &DVector<f64>) -> LmiResult<DMatrix<f64>> {
        let mut out = DMatrix::<f64>::zeros(self.m, self.m);
        self.evaluate_without_a0_into(x, &mut out)?;
        Ok(out)
    }

    /// Compute M(x) = A₀ + Σ xᵢ A_{i+1} into a caller-owned buffer.
    pub fn evaluate_into(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) -> LmiResult<()> {
        self.evaluate_without_a0_into(x, out)?;
        *out += &self.matrices[0];
        Ok(())
    }

    /// Compute M(x) = A₀ + Σ xᵢ A_{i+1}.
    pub fn evaluate(&self, x: &DVector<f64>) -> LmiResult<DMatrix<f64>> {
        let mut out = DMatrix::<f64>::zeros(self.m, self.m);
        self.evaluate_into(x, &mut out)?;
        Ok(out)
    }

    /// Reference path: accumulate the weighted sum term by term.
    fn eval_naive(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) {
        out.fill(0.0);
        for (i, gen) in self.matrices.iter().skip(1).enumerate() {
            let xi = x[i];
            for c in 0..self.m {
                for r in 0..self.m {
                    out[(r, c)] += xi * gen[(r, c)];
                }
            }
        }
    }

    /// Packed path: one matrix-vector product yields the upper triangle of
    /// the sum, which is then mirrored into the full symmetric matrix.
    fn eval_packed(&self, x: &DVector<f64>, out: &mut DMatrix<f64>) {
        let a = &self.packed * x;
        packing::scatter_symmetric(a.as_slice(), out);
    }

    /// Check a symmetric matrix for negative semidefiniteness.
    ///
    /// Delegates to the eigen backend for the largest eigenvalue; a
    /// symmetric matrix is negative semidefinite iff that eigenvalue is
    /// ≤ 0 (or < 0 under the strict convention).
    pub fn is_negative_semidefinite(&self, mat: &DMatrix<f64>) -> LmiResult<bool> {
        if mat.nrows() != mat.ncols() {
            return Err(LmiError::InvalidInput(format!(
                "definiteness check on a {}x{} matrix, expected square",
                mat.nrows(),
                mat.ncols()
            )));
        }

        let top = self.eigen.largest_eigenvalue(mat)?;
        if lmi_trace_enabled() {
            eprintln!("lmi: definiteness check, largest eigenvalue {:.3e}", top);
        }

        Ok(match self.settings.boundary {
            BoundaryConvention::Inclusive => top <= 0.0,
            BoundaryConvention::Strict => top < 0.0,
        })
    }

    /// Evaluate M(x) and check it for negative semidefiniteness.
    pub fn is_negative_semidefinite_at(&self, x: &DVector<f64>) -> LmiResult<bool> {
        let mat = self.evaluate(x)?;
        self.is_negative_semidefinite(&mat)
    }

    /// Normalized gradient of det(M(x)) at a boundary point.
    ///
    /// `p` lies on the determinant-zero boundary and `e` spans the kernel
    /// of M(p): M(p)·e = 0, e ≠ 0. The i-th coordinate of the gradient is
    /// eᵀ · A_{i+1} · e; the result is scaled to unit Euclidean norm and is
    /// the outward normal driving reflection steps at the boundary.
    ///
    /// The kernel precondition is not verified unless
    /// [`LmiSettings::check_kernel`] is set. Without the check, a degenerate
    /// `e` (orthogonal to every generator, or zero) yields a non-finite
    /// vector, which the caller must treat as a degenerate boundary point.
    pub fn normalized_determinant_gradient(&self, p: &DVector<f64>, e: &DVector<f64>) -> LmiResult<DVector<f64>> {
        self.check_point(p)?;
        if e.len() != self.m {
            return Err(LmiError::InvalidInput(format!(
                "null vector has length {}, matrix size is {}",
                e.len(),
                self.m
            )));
        }
        if self.settings.check_kernel {
            self.verify_kernel(p, e)?;
        }

        let mut g = DVector::<f64>::zeros(self.d);
        for i in 0..self.d {
            g[i] = e.dot(&(&self.matrices[i + 1] * e));
        }

        let norm = g.norm();
        if self.settings.check_kernel && norm == 0.0 {
            return Err(LmiError::DegenerateGeometry(
                "kernel vector is orthogonal to every generator, gradient has zero norm".into(),
            ));
        }

        Ok(g / norm)
    }

    fn verify_kernel(&self, p: &DVector<f64>, e: &DVector<f64>) -> LmiResult<()> {
        let e_norm = e.norm();
        if e_norm == 0.0 {
            return Err(LmiError::DegenerateGeometry("null vector e has zero norm".into()));
        }

        let mat = self.evaluate(p)?;
        let scale = mat.iter().map(|v| v.abs()).fold(0.0_f64, f64::max).max(1.0);
        let residual = (&mat * e).norm();

        if residual > self.settings.kernel_tol * scale * e_norm {
            return Err(LmiError::DegenerateGeometry(format!(
                "M(p)·e has norm {:.3e}, e is not a kernel vector of M(p)",
                residual
            )));
        }
        Ok(())
    }
}

impl<E> fmt::Display for Lmi<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mat) in self.matrices.iter().enumerate() {
            writeln!(f, "A{}", i)?;
            writeln!(f, "{}", mat)?;
        }
        Ok(())
    }
}
