//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Same qubit listed twice in one application
    #[error("Qubit {index} listed more than once")]
    DuplicateQubit { index: usize },

    /// Register too large to allocate
    #[error("Cannot allocate a {num_qubits}-qubit register (limit {max})")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Dimension mismatch between registers or between a register and an operator
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Matrix does not fit the qubits it is applied to
    #[error("Matrix has {actual} elements, expected {expected}")]
    MatrixSizeMismatch { expected: usize, actual: usize },
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
