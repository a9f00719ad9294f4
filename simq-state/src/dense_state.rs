//! Dense state-vector register
//!
//! [`DenseState`] stores all 2^n amplitudes and applies operators in place
//! through the scalar kernels in [`crate::kernels`].

use crate::error::{Result, StateError};
use crate::kernels::{apply_multi_qubit, apply_single_qubit};
use crate::MAX_QUBITS;
use num_complex::Complex64;
use simq_core::Operator;
use std::fmt;

/// Dense quantum register of `num_qubits` qubits
///
/// `Clone` performs a deep copy of the amplitudes, which is what reverse-mode
/// checkpointing relies on.
///
/// # Example
///
/// ```
/// use simq_state::DenseState;
/// use num_complex::Complex64;
///
/// let mut state = DenseState::new(1).unwrap();
///
/// // Pauli-X as a row-major 2×2 matrix
/// let (o, l) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
/// state.apply_matrix(&[o, l, l, o], &[0]).unwrap();
///
/// assert_eq!(state.amplitudes()[1], l);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseState {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl DenseState {
    /// Create a new register initialized to |0...0⟩
    ///
    /// # Errors
    /// Returns error if `num_qubits` exceeds [`MAX_QUBITS`]
    ///
    /// # Example
    /// ```
    /// use simq_state::DenseState;
    ///
    /// let state = DenseState::new(3).unwrap();
    /// assert_eq!(state.num_qubits(), 3);
    /// assert_eq!(state.dimension(), 8);
    /// ```
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::basis_state(num_qubits, 0)
    }

    /// Canonical zero state |0...0⟩ (alias of [`DenseState::new`])
    pub fn zero_state(num_qubits: usize) -> Result<Self> {
        Self::new(num_qubits)
    }

    /// Computational basis state |index⟩
    pub fn basis_state(num_qubits: usize, index: usize) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        if index >= dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: index + 1,
            });
        }

        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dimension];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a register from amplitude data
    ///
    /// The amplitudes are taken as given, without normalization; cotangent
    /// registers are generally not unit vectors.
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        let dimension = checked_dimension(num_qubits)?;
        if amplitudes.len() != dimension {
            return Err(StateError::DimensionMismatch {
                expected: dimension,
                actual: amplitudes.len(),
            });
        }

        Ok(Self {
            num_qubits,
            amplitudes: amplitudes.to_vec(),
        })
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the state dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Get a mutable reference to the amplitudes
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Euclidean norm of the amplitude vector
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(|a| a.norm_sqr())
            .sum::<f64>()
            .sqrt()
    }

    /// Scale to unit norm (no-op for the zero vector)
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            for amp in &mut self.amplitudes {
                *amp *= inv;
            }
        }
    }

    /// Complex inner product ⟨self|other⟩, conjugate-linear in `self`
    ///
    /// # Errors
    /// Returns error if the registers have different dimensions
    pub fn inner_product(&self, other: &DenseState) -> Result<Complex64> {
        self.check_dimension(other.dimension())?;
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Apply an operator in place
    ///
    /// The operator must be declared over exactly this register's width; its
    /// local matrix is applied to its `locations()`.
    ///
    /// # Errors
    /// Returns error if the operator width differs from the register width
    pub fn apply(&mut self, op: &dyn Operator) -> Result<()> {
        if op.num_qubits() != self.num_qubits {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: op.dimension(),
            });
        }

        let locations = op.locations();
        self.apply_matrix(&op.local_matrix(), &locations)
    }

    /// Apply a row-major 2^k × 2^k matrix to `k` distinct qubits
    ///
    /// # Errors
    /// Returns error if a qubit is out of range or repeated, or if the matrix
    /// size does not match the number of qubits
    pub fn apply_matrix(&mut self, matrix: &[Complex64], qubits: &[usize]) -> Result<()> {
        for (i, &q) in qubits.iter().enumerate() {
            if q >= self.num_qubits {
                return Err(StateError::InvalidQubitIndex {
                    index: q,
                    num_qubits: self.num_qubits,
                });
            }
            if qubits[..i].contains(&q) {
                return Err(StateError::DuplicateQubit { index: q });
            }
        }

        let local_dim = 1usize << qubits.len();
        if matrix.len() != local_dim * local_dim {
            return Err(StateError::MatrixSizeMismatch {
                expected: local_dim * local_dim,
                actual: matrix.len(),
            });
        }

        match qubits {
            [] => {
                // Global phase / scalar
                let factor = matrix[0];
                for amp in &mut self.amplitudes {
                    *amp *= factor;
                }
            },
            [qubit] => apply_single_qubit(&mut self.amplitudes, matrix, *qubit, self.num_qubits),
            _ => apply_multi_qubit(&mut self.amplitudes, matrix, qubits, self.num_qubits),
        }
        Ok(())
    }

    /// Expectation value Re⟨ψ|H|ψ⟩ of an operator
    pub fn expectation(&self, op: &dyn Operator) -> Result<f64> {
        let mut applied = self.clone();
        applied.apply(op)?;
        Ok(self.inner_product(&applied)?.re)
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual,
            });
        }
        Ok(())
    }
}

fn checked_dimension(num_qubits: usize) -> Result<usize> {
    if num_qubits > MAX_QUBITS {
        return Err(StateError::TooManyQubits {
            num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(1 << num_qubits)
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseState")
            .field("num_qubits", &self.num_qubits)
            .field("norm", &self.norm())
            .finish()
    }
}
