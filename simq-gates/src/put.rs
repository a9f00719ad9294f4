//! Addressing: placing an operator on chosen qubits of a wider register

use num_complex::Complex64;
use simq_core::{Locations, Operator, OperatorShape, QuantumError, QubitId, Result};
use std::sync::Arc;

/// An operator of width k embedded at k distinct locations of an N-qubit register
///
/// Structural queries are forwarded to the content; only the width and the
/// location map change. Wrapping a rotation keeps it rotation-shaped, and its
/// generator comes back embedded at the same locations.
///
/// # Example
/// ```
/// use simq_gates::{rotation::rx, Put};
/// use simq_core::Operator;
/// use std::sync::Arc;
///
/// let placed = Put::new(3, &[2], Arc::new(rx(0.4))).unwrap();
/// assert_eq!(placed.num_qubits(), 3);
/// assert_eq!(placed.locations().as_slice(), &[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Put {
    num_qubits: usize,
    locs: Locations,
    content: Arc<dyn Operator>,
}

impl Put {
    /// Embed `content` at `locs` of a `num_qubits` register
    ///
    /// # Errors
    /// Returns error if the number of locations differs from the content's
    /// width, or if a location is out of range or repeated
    pub fn new(num_qubits: usize, locs: &[usize], content: Arc<dyn Operator>) -> Result<Self> {
        if locs.len() != content.num_qubits() {
            return Err(QuantumError::invalid_qubit_count(
                content.name(),
                content.num_qubits(),
                locs.len(),
            ));
        }

        for (i, &loc) in locs.iter().enumerate() {
            QubitId::new(loc).check(num_qubits)?;
            if locs[..i].contains(&loc) {
                return Err(QuantumError::DuplicateQubit(QubitId::new(loc)));
            }
        }

        Ok(Self {
            num_qubits,
            locs: Locations::from_slice(locs),
            content,
        })
    }

    /// The wrapped operator
    pub fn content(&self) -> &Arc<dyn Operator> {
        &self.content
    }

    fn rewrap(&self, content: Arc<dyn Operator>) -> Self {
        Self {
            num_qubits: self.num_qubits,
            locs: self.locs.clone(),
            content,
        }
    }
}

impl Operator for Put {
    fn name(&self) -> &str {
        self.content.name()
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn locations(&self) -> Locations {
        self.content
            .locations()
            .iter()
            .map(|&inner| self.locs[inner])
            .collect()
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        self.content.local_matrix()
    }

    fn is_unitary(&self) -> bool {
        self.content.is_unitary()
    }

    fn is_hermitian(&self) -> bool {
        self.content.is_hermitian()
    }

    fn is_involutory(&self) -> bool {
        self.content.is_involutory()
    }

    fn parameters(&self) -> Vec<f64> {
        self.content.parameters()
    }

    fn num_parameters(&self) -> usize {
        self.content.num_parameters()
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        Arc::new(self.rewrap(self.content.adjoint()))
    }

    fn shape(&self) -> OperatorShape {
        match self.content.shape() {
            OperatorShape::Rotation { theta, generator } => OperatorShape::Rotation {
                theta,
                generator: Arc::new(self.rewrap(generator)),
            },
            OperatorShape::Generic => OperatorShape::Generic,
        }
    }
}
