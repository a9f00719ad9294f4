//! Gate library for SimQ
//!
//! This crate provides the concrete operators the simulator and the gradient
//! machinery work with:
//!
//! - **Gate table**: named constant gates (I, X, Y, Z, H, S, T, CNOT, CZ, SWAP)
//!   with matrices and property flags computed once
//! - **Rotations**: `exp(-iθ/2·G)` for any hermitian involutory generator,
//!   with `rx`/`ry`/`rz` shortcuts
//! - **Addressing**: [`Put`] places any operator on chosen qubits of a wider
//!   register
//! - **Generator extraction**: [`generator`] returns the generator of a
//!   rotation-shaped operator at the operator's own placement
//!
//! # Example
//!
//! ```
//! use simq_gates::{generator, registry, rotation::rx, Put};
//! use simq_core::Operator;
//! use std::sync::Arc;
//!
//! let cnot = registry::standard().put("CNOT", 3, &[0, 2]).unwrap();
//! assert_eq!(cnot.num_qubits(), 3);
//!
//! let rot = Put::new(3, &[1], Arc::new(rx(0.5))).unwrap();
//! let g = generator(&rot).unwrap();
//! assert_eq!(g.locations().as_slice(), &[1]);
//! ```

pub mod generator;
pub mod matrices;
pub mod matrix_gate;
pub mod matrix_ops;
pub mod put;
pub mod registry;
pub mod rotation;

pub use generator::{generator, involutory_generator};
pub use matrix_gate::MatrixGate;
pub use put::Put;
pub use registry::GateRegistry;
pub use rotation::{rx, ry, rz, Rotation};
