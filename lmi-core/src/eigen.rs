//! Symmetric eigenvalue backends.
//!
//! The definiteness check consumes an external eigen-solver capability:
//! "algebraically largest/smallest eigenvalue of a symmetric matrix". The
//! [`EigenBackend`] trait is that seam; [`DenseEigenBackend`] is the default
//! wiring on top of nalgebra's symmetric eigendecomposition.

use nalgebra::linalg::SymmetricEigen;
use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EigenError {
    #[error("symmetric eigendecomposition did not converge within {max_iter} iterations")]
    NonConvergence { max_iter: usize },
}

/// Symmetric eigenvalue solver interface.
///
/// Implementations may assume the input is symmetric and must signal
/// non-convergence via [`EigenError`] rather than returning a bogus value.
/// Methods are synchronous; scratch allocation is left to the backend.
pub trait EigenBackend: Send + Sync {
    /// Algebraically largest eigenvalue of a symmetric matrix.
    fn largest_eigenvalue(&self, mat: &DMatrix<f64>) -> Result<f64, EigenError>;

    /// Algebraically smallest eigenvalue of a symmetric matrix.
    fn smallest_eigenvalue(&self, mat: &DMatrix<f64>) -> Result<f64, EigenError>;
}

/// Dense symmetric eigensolver backed by nalgebra.
#[derive(Debug, Clone)]
pub struct DenseEigenBackend {
    /// Convergence tolerance for off-diagonal elimination
    pub eps: f64,
    /// Iteration cap; exceeding it is reported as non-convergence
    pub max_iter: usize,
}

impl Default for DenseEigenBackend {
    fn default() -> Self {
        Self {
            eps: 1.0e-13,
            max_iter: 250,
        }
    }
}

impl DenseEigenBackend {
    fn decompose(&self, mat: &DMatrix<f64>) -> Result<SymmetricEigen<f64, nalgebra::Dyn>, EigenError> {
        SymmetricEigen::try_new(mat.clone(), self.eps, self.max_iter).ok_or(EigenError::NonConvergence {
            max_iter: self.max_iter,
        })
    }
}

impl EigenBackend for DenseEigenBackend {
    fn largest_eigenvalue(&self, mat: &DMatrix<f64>) -> Result<f64, EigenError> {
        let eig = self.decompose(mat)?;
        Ok(eig.eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    fn smallest_eigenvalue(&self, mat: &DMatrix<f64>) -> Result<f64, EigenError> {
        let eig = self.decompose(mat)?;
        Ok(eig.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min))
    }
}
