//! Matrix-defined gates with validation and cached property flags
//!
//! [`MatrixGate`] is the concrete operator behind every entry of the gate
//! table and behind user-supplied unitaries. The matrix is validated once at
//! construction and shared afterwards; hermiticity and involution are computed
//! at the same time and cached as flags.
//!
//! # Example
//!
//! ```rust
//! use simq_gates::matrix_gate::MatrixGate;
//! use simq_core::Operator;
//! use num_complex::Complex64;
//!
//! let (o, l) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
//! let flip = MatrixGate::new("FLIP", 1, vec![o, l, l, o]).unwrap();
//! assert!(flip.is_hermitian());
//! assert!(flip.is_involutory());
//! ```

use crate::matrix_ops;
use num_complex::Complex64;
use simq_core::{Operator, QuantumError, Result, DEFAULT_TOLERANCE};
use std::fmt;
use std::sync::Arc;

/// A gate defined by an explicit unitary matrix
#[derive(Clone)]
pub struct MatrixGate {
    name: String,
    num_qubits: usize,
    matrix: Arc<[Complex64]>,
    hermitian: bool,
    involutory: bool,
}

impl MatrixGate {
    /// Create a gate with the default tolerance
    ///
    /// # Errors
    /// Returns an error if the name is empty, the matrix is not 2^n × 2^n,
    /// contains NaN/infinite values, or is not unitary.
    pub fn new(name: impl Into<String>, num_qubits: usize, matrix: Vec<Complex64>) -> Result<Self> {
        Self::with_tolerance(name, num_qubits, matrix, DEFAULT_TOLERANCE)
    }

    /// Create a gate with an explicit tolerance for the property checks
    pub fn with_tolerance(
        name: impl Into<String>,
        num_qubits: usize,
        matrix: Vec<Complex64>,
        tolerance: f64,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(QuantumError::InvalidMatrix {
                gate: name,
                expected: 0,
                actual: matrix.len(),
            });
        }

        let side = 1usize << num_qubits;
        if matrix.len() != side * side {
            return Err(QuantumError::InvalidMatrix {
                gate: name,
                expected: side * side,
                actual: matrix.len(),
            });
        }

        if matrix.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(QuantumError::NonFinite(name));
        }

        let deviation = matrix_ops::unitarity_deviation(&matrix);
        if deviation > tolerance {
            return Err(QuantumError::NotUnitary {
                gate: name,
                deviation,
            });
        }

        Ok(Self::flagged(name, num_qubits, matrix, tolerance))
    }

    /// Build from a matrix already known to be a valid unitary
    pub(crate) fn trusted(name: impl Into<String>, num_qubits: usize, matrix: &[Complex64]) -> Self {
        Self::flagged(name.into(), num_qubits, matrix.to_vec(), DEFAULT_TOLERANCE)
    }

    fn flagged(name: String, num_qubits: usize, matrix: Vec<Complex64>, tolerance: f64) -> Self {
        let hermitian = matrix_ops::is_hermitian(&matrix, tolerance);
        let involutory = matrix_ops::is_involutory(&matrix, tolerance);
        Self {
            name,
            num_qubits,
            matrix: matrix.into(),
            hermitian,
            involutory,
        }
    }

    /// The cached matrix
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

impl Operator for MatrixGate {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        self.matrix.to_vec()
    }

    fn is_hermitian(&self) -> bool {
        self.hermitian
    }

    fn is_involutory(&self) -> bool {
        self.involutory
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        if self.hermitian {
            return Arc::new(self.clone());
        }

        let name = match self.name.strip_suffix('†') {
            Some(base) => base.to_string(),
            None => format!("{}†", self.name),
        };
        Arc::new(Self {
            name,
            num_qubits: self.num_qubits,
            matrix: matrix_ops::matrix_adjoint(&self.matrix).into(),
            hermitian: false,
            involutory: self.involutory,
        })
    }
}

impl fmt::Debug for MatrixGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixGate")
            .field("name", &self.name)
            .field("num_qubits", &self.num_qubits)
            .field("hermitian", &self.hermitian)
            .field("involutory", &self.involutory)
            .finish()
    }
}
