//! Error types for the LMI evaluator.

use crate::eigen::EigenError;
use thiserror::Error;

/// Errors surfaced by the LMI evaluator.
///
/// Every failure here reflects either a malformed call or numerically
/// degenerate geometry; the policy is fail-fast with a typed error rather
/// than returning a plausible-looking but wrong numeric result.
#[derive(Debug, Error)]
pub enum LmiError {
    /// Malformed construction arguments or length-mismatched vectors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Logical precondition violation at a boundary point (zero-norm kernel
    /// vector, or a kernel vector orthogonal to every generator)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Eigen backend failure, propagated as-is and never retried here
    #[error("eigenvalue computation failed: {0}")]
    NonConvergence(#[from] EigenError),
}

/// Result type for LMI operations.
pub type LmiResult<T> = Result<T, LmiError>;
