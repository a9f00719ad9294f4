//! Generator extraction for rotation-shaped operators
//!
//! The generator of `exp(-iθ/2·G)` is returned at the operator's own width and
//! locations, so it can be applied to the same register as the rotation
//! without re-deriving any placement.

use simq_core::{Operator, OperatorShape};
use std::sync::Arc;

/// Hermitian generator of a rotation-shaped operator
///
/// Returns `None` for operators that are not rotation-shaped.
///
/// # Example
/// ```
/// use simq_gates::{generator, rotation::ry, Put};
/// use simq_core::Operator;
/// use std::sync::Arc;
///
/// let placed = Put::new(2, &[1], Arc::new(ry(0.3))).unwrap();
/// let g = generator(&placed).unwrap();
/// assert_eq!(g.name(), "Y");
/// assert_eq!(g.locations().as_slice(), &[1]);
/// ```
pub fn generator(op: &dyn Operator) -> Option<Arc<dyn Operator>> {
    match op.shape() {
        OperatorShape::Rotation { generator, .. } => Some(generator),
        OperatorShape::Generic => None,
    }
}

/// Generator that additionally squares to the identity
///
/// This is the form the closed-form derivative `d/dθ R = -(i/2)·G·R` needs.
pub fn involutory_generator(op: &dyn Operator) -> Option<Arc<dyn Operator>> {
    generator(op).filter(|g| g.is_involutory())
}
