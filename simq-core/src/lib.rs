//! Core types and traits for SimQ differentiable circuits
//!
//! This crate provides the fundamental abstractions shared by the rest of the
//! workspace:
//! - [`Operator`]: Trait for operators acting on a register of qubits
//! - [`OperatorShape`]: Closed structural classification (rotation vs. generic)
//! - [`QubitId`]: Type-safe qubit addressing
//! - [`QuantumError`]: Errors raised while building operators
//!
//! # Example
//! ```
//! use simq_core::{OperatorShape, QubitId};
//!
//! let q1 = QubitId::new(1);
//! assert_eq!(q1.mask(), 0b10);
//! assert!(!OperatorShape::Generic.is_rotation());
//! ```

pub mod error;
pub mod operator;
pub mod qubit;

// Re-exports for convenience
pub use error::QuantumError;
pub use num_complex::Complex64;
pub use operator::{Locations, Operator, OperatorShape};
pub use qubit::QubitId;

/// Type alias for results in SimQ
pub type Result<T> = std::result::Result<T, QuantumError>;

/// Default numerical tolerance for matrix property checks
/// (unitarity, hermiticity, involution).
pub const DEFAULT_TOLERANCE: f64 = 1e-10;
