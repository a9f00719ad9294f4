//! Single-parameter rotations exp(-iθ/2·G)

use crate::matrices::{PAULI_X, PAULI_Y, PAULI_Z};
use crate::matrix_gate::MatrixGate;
use num_complex::Complex64;
use simq_core::{Locations, Operator, OperatorShape, QuantumError, Result};
use std::sync::Arc;

/// Rotation `R(θ) = exp(-iθ/2·G) = cos(θ/2)·I − i·sin(θ/2)·G`
///
/// The closed form requires a hermitian, involutory generator; both are
/// checked at construction. The rotation inherits the generator's width and
/// locations, so a generator already embedded with [`crate::Put`] yields an
/// embedded rotation.
///
/// # Example
/// ```
/// use simq_gates::rotation::rx;
/// use simq_core::Operator;
/// use std::f64::consts::PI;
///
/// let r = rx(PI);
/// // Rx(π) = -i·X
/// let m = r.local_matrix();
/// assert!((m[1].im + 1.0).abs() < 1e-12);
/// assert_eq!(r.parameters(), vec![PI]);
/// ```
#[derive(Debug, Clone)]
pub struct Rotation {
    name: String,
    generator: Arc<dyn Operator>,
    theta: f64,
}

impl Rotation {
    /// Create a rotation about `generator`
    ///
    /// # Errors
    /// Returns [`QuantumError::NotHermitian`] or [`QuantumError::NotInvolutory`]
    /// if the generator does not qualify
    pub fn new(generator: Arc<dyn Operator>, theta: f64) -> Result<Self> {
        if !generator.is_hermitian() {
            return Err(QuantumError::NotHermitian(generator.name().to_string()));
        }
        if !generator.is_involutory() {
            return Err(QuantumError::NotInvolutory(generator.name().to_string()));
        }
        let name = format!("R{}", generator.name().to_lowercase());
        Ok(Self {
            name,
            generator,
            theta,
        })
    }

    fn pauli(name: &str, matrix: &[Complex64], theta: f64) -> Self {
        Self {
            name: name.to_string(),
            generator: Arc::new(MatrixGate::trusted(&name[1..].to_uppercase(), 1, matrix)),
            theta,
        }
    }

    /// The rotation angle θ
    pub fn angle(&self) -> f64 {
        self.theta
    }

    /// The generator G
    pub fn generator(&self) -> &Arc<dyn Operator> {
        &self.generator
    }

    /// Same generator, different angle
    pub fn with_angle(&self, theta: f64) -> Self {
        Self {
            name: self.name.clone(),
            generator: self.generator.clone(),
            theta,
        }
    }
}

/// Rotation about the X axis
pub fn rx(theta: f64) -> Rotation {
    Rotation::pauli("Rx", &PAULI_X, theta)
}

/// Rotation about the Y axis
pub fn ry(theta: f64) -> Rotation {
    Rotation::pauli("Ry", &PAULI_Y, theta)
}

/// Rotation about the Z axis
pub fn rz(theta: f64) -> Rotation {
    Rotation::pauli("Rz", &PAULI_Z, theta)
}

impl Operator for Rotation {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.generator.num_qubits()
    }

    fn locations(&self) -> Locations {
        self.generator.locations()
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        let half = self.theta / 2.0;
        let (cos, sin) = (half.cos(), half.sin());
        let minus_i_sin = Complex64::new(0.0, -sin);

        let mut matrix: Vec<Complex64> = self
            .generator
            .local_matrix()
            .into_iter()
            .map(|g| minus_i_sin * g)
            .collect();
        let side = 1usize << self.generator.locations().len();
        for i in 0..side {
            matrix[i * side + i] += cos;
        }
        matrix
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.theta]
    }

    fn num_parameters(&self) -> usize {
        1
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        Arc::new(self.with_angle(-self.theta))
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Rotation {
            theta: self.theta,
            generator: self.generator.clone(),
        }
    }
}
