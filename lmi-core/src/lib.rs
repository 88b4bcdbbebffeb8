//! LMI evaluation core for spectrahedron sampling.
//!
//! This library implements the algebraic primitive beneath spectrahedron
//! representations used by volume-estimation and sampling algorithms for
//! convex bodies defined by semidefinite constraints. Given a family of
//! symmetric matrices A₀, A₁, ..., A_d it provides:
//!
//! - **Affine evaluation**: M(x) = A₀ + Σ xᵢ Aᵢ and its homogeneous part
//!   Σ xᵢ Aᵢ, with a packed fast path that turns the weighted matrix sum
//!   into a single dense matrix-vector product
//! - **Feasibility testing**: negative semidefiniteness of M(x) via the
//!   largest symmetric eigenvalue (M(x) ⪯ 0 defines the spectrahedron)
//! - **Boundary normals**: the normalized gradient of det(M(x)) at a
//!   boundary point with known kernel vector, used by boundary-following
//!   random walks to reflect or bounce
//!
//! # Usage
//!
//! ```ignore
//! use lmi_core::Lmi;
//! use nalgebra::{DMatrix, DVector};
//!
//! // M(x) = A0 + x1 * A1, a spectrahedron in one parameter
//! let a0 = DMatrix::from_diagonal_element(2, 2, -1.0);
//! let a1 = DMatrix::from_partial_diagonal(2, 2, &[1.0]);
//!
//! let lmi = Lmi::new(vec![a0, a1])?;
//! let x = DVector::from_element(1, 0.5);
//!
//! assert!(lmi.is_negative_semidefinite_at(&x)?);
//! ```
//!
//! The evaluator is immutable after construction and holds no internal
//! scratch state, so a single instance can be shared by reference across
//! parallel walker threads, each supplying its own point and output buffer.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod eigen;
pub mod error;
pub mod lmi;
pub mod packing;

// Re-export main types
pub use eigen::{DenseEigenBackend, EigenBackend, EigenError};
pub use error::{LmiError, LmiResult};
pub use lmi::{BoundaryConvention, EvalStrategy, Lmi, LmiSettings};
