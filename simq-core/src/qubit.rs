//! Qubit addressing

use crate::{QuantumError, Result};
use std::fmt;

/// Type-safe identifier for a qubit
///
/// Qubit `k` corresponds to bit `k` of a basis-state index, so `|q1 q0⟩ = |10⟩`
/// is amplitude index 2.
///
/// # Example
/// ```
/// use simq_core::QubitId;
///
/// let q = QubitId::new(2);
/// assert_eq!(q.index(), 2);
/// assert_eq!(q.mask(), 4);
/// assert!(q.check(3).is_ok());
/// assert!(q.check(2).is_err());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit mask selecting this qubit in a basis-state index
    #[inline]
    pub const fn mask(&self) -> usize {
        1 << self.0
    }

    /// Ensure the qubit exists in a register of `num_qubits`
    pub fn check(self, num_qubits: usize) -> Result<Self> {
        if self.0 < num_qubits {
            Ok(self)
        } else {
            Err(QuantumError::invalid_qubit(self.0, num_qubits))
        }
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}
