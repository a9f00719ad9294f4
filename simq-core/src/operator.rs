//! Operator abstraction shared by gates, registers and differentiable nodes

use num_complex::Complex64;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Active qubits of an operator (most operators touch 1-2 qubits)
pub type Locations = SmallVec<[usize; 4]>;

/// Trait for operators acting on a register of qubits
///
/// An operator is declared over a register of `num_qubits()` qubits but only
/// touches `locations()`. Its `local_matrix()` is expressed in the basis of
/// those locations, little-endian: bit `k` of a local index is the state of
/// `locations()[k]`.
///
/// Operators are immutable and shared through `Arc<dyn Operator>`.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use simq_core::{Operator, OperatorShape};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Flip;
///
/// impl Operator for Flip {
///     fn name(&self) -> &str { "FLIP" }
///     fn num_qubits(&self) -> usize { 1 }
///     fn local_matrix(&self) -> Vec<Complex64> {
///         let (o, l) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
///         vec![o, l, l, o]
///     }
///     fn is_hermitian(&self) -> bool { true }
///     fn adjoint(&self) -> Arc<dyn Operator> { Arc::new(Flip) }
/// }
///
/// assert_eq!(Flip.dimension(), 2);
/// assert!(!Flip.is_rotation());
/// ```
pub trait Operator: Send + Sync + fmt::Debug {
    /// Name of the operator (e.g., "X", "Rx", "put")
    fn name(&self) -> &str;

    /// Width of the register the operator is declared over
    fn num_qubits(&self) -> usize;

    /// Hilbert-space dimension of the declared register (2^N)
    fn dimension(&self) -> usize {
        1 << self.num_qubits()
    }

    /// Qubits the local matrix acts on
    fn locations(&self) -> Locations {
        (0..self.num_qubits()).collect()
    }

    /// Row-major matrix over `locations()`
    fn local_matrix(&self) -> Vec<Complex64>;

    /// Whether the operator is unitary
    fn is_unitary(&self) -> bool {
        true
    }

    /// Whether the operator is hermitian (self-adjoint)
    fn is_hermitian(&self) -> bool {
        false
    }

    /// Whether the operator squares to the identity
    fn is_involutory(&self) -> bool {
        false
    }

    /// Free real parameters, in declaration order
    fn parameters(&self) -> Vec<f64> {
        Vec::new()
    }

    /// Number of free real parameters
    fn num_parameters(&self) -> usize {
        self.parameters().len()
    }

    /// Structural mathematical adjoint (the inverse for unitary operators)
    fn adjoint(&self) -> Arc<dyn Operator>;

    /// Structural classification of this operator
    fn shape(&self) -> OperatorShape {
        OperatorShape::Generic
    }

    /// Capability check: is this operator `exp(-iθ/2·G)` for some generator G?
    fn is_rotation(&self) -> bool {
        self.shape().is_rotation()
    }
}

/// Closed set of operator shapes recognised by differentiation
#[derive(Debug, Clone)]
pub enum OperatorShape {
    /// `exp(-iθ/2·G)` with one free angle.
    ///
    /// `generator` is already lifted to the operator's width and locations,
    /// so it can be applied to the same register as the rotation itself.
    Rotation {
        theta: f64,
        generator: Arc<dyn Operator>,
    },
    /// Any other operator
    Generic,
}

impl OperatorShape {
    /// Returns true for the rotation variant
    pub fn is_rotation(&self) -> bool {
        matches!(self, OperatorShape::Rotation { .. })
    }

    /// Generator of a rotation, if any
    pub fn generator(&self) -> Option<&Arc<dyn Operator>> {
        match self {
            OperatorShape::Rotation { generator, .. } => Some(generator),
            OperatorShape::Generic => None,
        }
    }

    /// Angle of a rotation, if any
    pub fn theta(&self) -> Option<f64> {
        match self {
            OperatorShape::Rotation { theta, .. } => Some(*theta),
            OperatorShape::Generic => None,
        }
    }
}
