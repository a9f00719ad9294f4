//! Error types for differentiable nodes and circuits

use simq_core::QuantumError;
use simq_state::StateError;
use thiserror::Error;

/// Result type for differentiation operations
pub type Result<T> = std::result::Result<T, DiffError>;

/// Errors raised by forward-apply, backward-step and the gradient evaluators
///
/// The first three kinds are precondition violations: they are raised before
/// any state or gradient slot is touched and are never retried internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Backward step requested before any forward apply recorded a checkpoint
    #[error("No forward checkpoint recorded for '{node}'")]
    StructuralMismatch { node: String },

    /// Operator has no involutory generator to differentiate against
    #[error("Operator '{name}' is not differentiable: {reason}")]
    UnsupportedOperator { name: String, reason: String },

    /// Register width does not match the node or circuit
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Failure inside the state register
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Failure building or validating an operator
    #[error("Operator error: {0}")]
    Quantum(#[from] QuantumError),
}

impl DiffError {
    pub(crate) fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        DiffError::UnsupportedOperator {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
