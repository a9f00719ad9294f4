//! Differentiable rotation nodes for SimQ
//!
//! This crate computes gradients of circuits built from parametrized
//! rotations `exp(-iθ/2·G)`:
//!
//! - **[`AnalyticMarker`]**: a passive gradient slot on a rotation, filled by
//!   an external evaluator such as the [parameter shift rule](shift)
//! - **[`BackpropNode`]**: in-engine reverse mode; forward apply records a
//!   checkpoint, backward step writes `Re(i·⟨G·ψ|δ⟩)` and pulls the cotangent
//!   back through the adjoint
//! - **[`DiffCircuit`]**: sequences forward applies before backward steps and
//!   threads the cotangent through a whole chain
//! - **[`numdiff`]**: finite differences for cross-checking
//!
//! The cotangent δ is ∂L/∂ψ* of a real loss L. For an expectation
//! `L = ⟨ψ|H|ψ⟩` the seed is `H·ψ`.
//!
//! # Example
//!
//! ```
//! use simq_diff::{BackpropNode, DiffTag};
//! use simq_gates::{registry, ry, Put};
//! use simq_state::DenseState;
//! use std::sync::Arc;
//!
//! let mut r1 = BackpropNode::new(Arc::new(Put::new(2, &[0], Arc::new(ry(0.4))).unwrap())).unwrap();
//! let mut r2 = BackpropNode::new(Arc::new(Put::new(2, &[0], Arc::new(ry(0.5))).unwrap())).unwrap();
//!
//! let mut state = DenseState::new(2).unwrap();
//! r2.forward_apply(r1.forward_apply(&mut state).unwrap()).unwrap();
//!
//! let z0 = registry::standard().put("Z", 2, &[0]).unwrap();
//! let mut delta = state.clone();
//! delta.apply(&z0).unwrap();
//! r1.backward_step(r2.backward_step(&mut delta).unwrap()).unwrap();
//!
//! // ⟨Z⟩ = cos(θ1 + θ2)
//! let expected = -(0.9f64).sin();
//! assert!((r1.grad()[0] - expected).abs() < 1e-12);
//! assert!((r2.grad()[0] - expected).abs() < 1e-12);
//! ```

pub mod backprop;
pub mod circuit;
pub mod error;
pub mod marker;
pub mod numdiff;
pub mod shift;
pub mod tag;

pub use backprop::BackpropNode;
pub use circuit::{DiffCircuit, Element};
pub use error::{DiffError, Result};
pub use marker::AnalyticMarker;
pub use numdiff::{circuit_gradient, FiniteDifferenceConfig, FiniteDifferenceMethod};
pub use shift::{parameter_shift, ParameterShiftConfig};
pub use tag::{DiffMode, DiffTag};
