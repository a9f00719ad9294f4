//! Error types for SimQ operators

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur while constructing or combining operators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantumError {
    /// Invalid qubit index used
    #[error("Invalid qubit index {0}: register has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// Operator placed on the wrong number of qubits
    #[error("Operator '{gate}' requires {expected} qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Duplicate qubit in a placement
    #[error("Duplicate qubit {0} in operator placement")]
    DuplicateQubit(QubitId),

    /// Matrix does not have the 2^n × 2^n shape required for n qubits
    #[error("Matrix for '{gate}' must have {expected} elements, got {actual}")]
    InvalidMatrix {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Matrix contains NaN or infinite values
    #[error("Matrix for '{0}' contains NaN or infinite values")]
    NonFinite(String),

    /// Matrix is not unitary (U†U ≠ I)
    #[error("Operator '{gate}' is not unitary: max deviation {deviation:.2e}")]
    NotUnitary { gate: String, deviation: f64 },

    /// Generator is not hermitian
    #[error("Operator '{0}' is not hermitian")]
    NotHermitian(String),

    /// Generator does not square to the identity
    #[error("Operator '{0}' is not involutory (G·G ≠ I)")]
    NotInvolutory(String),

    /// Lookup of an unknown named gate
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),
}

impl QuantumError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}
