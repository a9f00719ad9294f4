//! Dense state-vector registers for SimQ
//!
//! This crate provides [`DenseState`], a full 2^n amplitude register that
//! supports everything the differentiation engine needs from a state:
//! canonical zero-state construction, deep copy, complex inner products and
//! in-place application of any [`simq_core::Operator`].
//!
//! Registers are plain complex vectors. They are not forced to unit norm, so
//! the same type carries both physical states and reverse-mode cotangents.
//!
//! # Example
//!
//! ```
//! use simq_state::DenseState;
//! use num_complex::Complex64;
//!
//! let zero = DenseState::zero_state(2).unwrap();
//! let one = DenseState::basis_state(2, 3).unwrap();
//! assert_eq!(zero.inner_product(&one).unwrap(), Complex64::new(0.0, 0.0));
//! ```

pub mod dense_state;
pub mod error;
pub mod kernels;

pub use dense_state::DenseState;
pub use error::{Result, StateError};

/// Largest register a [`DenseState`] will allocate
pub const MAX_QUBITS: usize = 30;
