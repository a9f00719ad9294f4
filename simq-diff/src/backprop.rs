//! Reverse-mode node with a forward checkpoint
//!
//! A [`BackpropNode`] runs a two-phase protocol:
//!
//! - **forward apply**: apply the wrapped operator, then record a copy of the
//!   resulting state as the checkpoint
//! - **backward step**: from the checkpoint ψ and the incoming cotangent δ,
//!   write `grad = Re(i·⟨G·ψ|δ⟩)` and then replace δ with `U†·δ`
//!
//! δ is the Wirtinger derivative ∂L/∂ψ* of a real loss L, which makes the
//! gradient above exactly dL/dθ for `U = exp(-iθ/2·G)` with `G·G = I`.
//!
//! The node has no structural adjoint. The backward step is the only way to
//! run it in reverse.
//!
//! # Example
//!
//! ```
//! use simq_diff::{BackpropNode, DiffTag};
//! use simq_gates::rx;
//! use simq_state::DenseState;
//! use std::sync::Arc;
//!
//! let mut node = BackpropNode::new(Arc::new(rx(0.7))).unwrap();
//! let mut state = DenseState::new(1).unwrap();
//! node.forward_apply(&mut state).unwrap();
//!
//! // cotangent of L = ⟨ψ|Z|ψ⟩ is Z·ψ
//! let mut delta = state.clone();
//! delta.apply_matrix(&simq_gates::matrices::PAULI_Z, &[0]).unwrap();
//! node.backward_step(&mut delta).unwrap();
//!
//! // ⟨Z⟩ = cos θ, so dL/dθ = -sin θ
//! assert!((node.grad()[0] + 0.7f64.sin()).abs() < 1e-12);
//! ```

use crate::error::{DiffError, Result};
use crate::tag::{check_width, DiffTag};
use log::{debug, trace};
use num_complex::Complex64;
use simq_core::Operator;
use simq_gates::involutory_generator;
use simq_state::DenseState;
use std::sync::Arc;

/// Operator wrapper that computes its own gradient in reverse mode
#[derive(Debug, Clone)]
pub struct BackpropNode {
    content: Arc<dyn Operator>,
    output: DenseState,
    recorded: bool,
    grad: Vec<f64>,
}

impl BackpropNode {
    /// Wrap `content`, allocating a zero-state checkpoint buffer
    ///
    /// Any operator can be wrapped; only rotation-shaped ones support
    /// [`BackpropNode::backward_step`].
    ///
    /// # Errors
    /// Returns error if the operator is too wide to allocate a register for
    pub fn new(content: Arc<dyn Operator>) -> Result<Self> {
        let register = DenseState::zero_state(content.num_qubits())?;
        Self::with_register(content, register)
    }

    /// Wrap `content`, reusing `register` as the checkpoint buffer
    ///
    /// The register's contents are not a checkpoint; a forward apply is still
    /// required before the first backward step.
    pub fn with_register(content: Arc<dyn Operator>, register: DenseState) -> Result<Self> {
        check_width(content.as_ref(), &register)?;
        let grad = vec![0.0; content.num_parameters()];
        Ok(Self {
            content,
            output: register,
            recorded: false,
            grad,
        })
    }

    /// Whether a forward apply has recorded a checkpoint
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    /// The checkpoint left by the last forward apply
    ///
    /// # Errors
    /// Returns [`DiffError::StructuralMismatch`] before the first forward apply
    pub fn output(&self) -> Result<&DenseState> {
        if !self.recorded {
            return Err(self.missing_checkpoint());
        }
        Ok(&self.output)
    }

    /// Check every precondition of a backward step and return the generator
    ///
    /// Nothing is mutated, so callers can validate a whole chain before
    /// stepping any of it.
    pub fn check_backward(&self, delta: &DenseState) -> Result<Arc<dyn Operator>> {
        let generator = match involutory_generator(self.content.as_ref()) {
            Some(g) => g,
            None if self.content.is_rotation() => {
                return Err(DiffError::unsupported(
                    self.content.name(),
                    "generator is not involutory",
                ))
            },
            None => return Err(DiffError::unsupported(self.content.name(), "not rotation-shaped")),
        };
        check_width(self.content.as_ref(), delta)?;
        if !self.recorded {
            return Err(self.missing_checkpoint());
        }
        Ok(generator)
    }

    /// Overwrite the gradient from the checkpoint and pull δ back through the operator
    ///
    /// The gradient reads δ before it is transformed; δ leaves as `U†·δ`, ready
    /// for the preceding node. On error neither δ nor the gradient is touched.
    ///
    /// δ is ∂L/∂ψ*, so the derivative of a linear functional `Re⟨d|ψ⟩` needs
    /// the seed `d/2`; seeding `d` itself yields twice that derivative.
    ///
    /// # Errors
    /// - [`DiffError::UnsupportedOperator`] if the operator is not a rotation
    ///   with an involutory generator
    /// - [`DiffError::DimensionMismatch`] if δ has the wrong width
    /// - [`DiffError::StructuralMismatch`] if no forward apply happened yet
    pub fn backward_step<'d>(&mut self, delta: &'d mut DenseState) -> Result<&'d mut DenseState> {
        let generator = self.check_backward(delta)?;

        let mut g = self.output.clone();
        g.apply(generator.as_ref())?;
        let grad = (Complex64::i() * g.inner_product(delta)?).re;

        delta.apply(self.content.adjoint().as_ref())?;

        if let Some(slot) = self.grad.first_mut() {
            *slot = grad;
        }
        debug!("backward {}: grad = {:.6e}", self.content.name(), grad);
        Ok(delta)
    }

    fn missing_checkpoint(&self) -> DiffError {
        DiffError::StructuralMismatch {
            node: self.content.name().to_string(),
        }
    }
}

impl DiffTag for BackpropNode {
    fn content(&self) -> &Arc<dyn Operator> {
        &self.content
    }

    fn into_content(self) -> Arc<dyn Operator> {
        self.content
    }

    fn forward_apply<'s>(&mut self, state: &'s mut DenseState) -> Result<&'s mut DenseState> {
        check_width(self.content.as_ref(), state)?;
        state.apply(self.content.as_ref())?;
        self.output.clone_from(state);
        self.recorded = true;
        trace!("checkpoint {} (norm {:.6})", self.content.name(), self.output.norm());
        Ok(state)
    }

    fn grad(&self) -> &[f64] {
        &self.grad
    }

    fn grad_mut(&mut self) -> &mut [f64] {
        &mut self.grad
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use simq_gates::{registry, rx, Put};
    use std::f64::consts::FRAC_PI_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_forward_records_checkpoint() {
        let mut node = BackpropNode::new(Arc::new(rx(FRAC_PI_2))).unwrap();
        assert!(node.output().is_err());

        let mut state = DenseState::new(1).unwrap();
        node.forward_apply(&mut state).unwrap();

        let s = std::f64::consts::FRAC_1_SQRT_2;
        let out = node.output().unwrap();
        assert_relative_eq!(out.amplitudes()[0].re, s, epsilon = 1e-12);
        assert_relative_eq!(out.amplitudes()[1].im, -s, epsilon = 1e-12);
        assert_eq!(out, &state);
    }

    #[test]
    fn test_forward_overwrites_checkpoint() {
        let mut node = BackpropNode::new(Arc::new(rx(0.4))).unwrap();
        let mut first = DenseState::new(1).unwrap();
        node.forward_apply(&mut first).unwrap();
        let mut second = DenseState::basis_state(1, 1).unwrap();
        node.forward_apply(&mut second).unwrap();
        assert_eq!(node.output().unwrap(), &second);
    }

    #[test]
    fn test_backward_before_forward() {
        let mut node = BackpropNode::new(Arc::new(rx(0.4))).unwrap();
        let mut delta = DenseState::new(1).unwrap();
        assert_eq!(
            node.backward_step(&mut delta).unwrap_err(),
            DiffError::StructuralMismatch {
                node: "Rx".to_string()
            }
        );
        assert_eq!(delta, DenseState::new(1).unwrap());
    }

    #[test]
    fn test_initial_register_is_not_a_checkpoint() {
        let op: Arc<dyn Operator> = Arc::new(rx(0.6));
        assert_eq!(
            BackpropNode::with_register(op.clone(), DenseState::new(2).unwrap()).unwrap_err(),
            DiffError::DimensionMismatch {
                expected: 2,
                actual: 4
            }
        );

        let mut node = BackpropNode::with_register(op, DenseState::basis_state(1, 1).unwrap()).unwrap();
        assert!(!node.is_recorded());
        assert!(matches!(node.output(), Err(DiffError::StructuralMismatch { .. })));

        let mut delta = DenseState::new(1).unwrap();
        assert_eq!(
            node.backward_step(&mut delta).unwrap_err(),
            DiffError::StructuralMismatch {
                node: "Rx".to_string()
            }
        );
        assert_eq!(delta, DenseState::new(1).unwrap());
        assert_eq!(node.grad(), &[0.0]);

        let mut state = DenseState::new(1).unwrap();
        node.forward_apply(&mut state).unwrap();
        assert_eq!(node.output().unwrap(), &state);

        let mut delta = state.clone();
        delta.apply_matrix(&simq_gates::matrices::PAULI_Z, &[0]).unwrap();
        node.backward_step(&mut delta).unwrap();
        assert_relative_eq!(node.grad()[0], -(0.6f64).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_backward_on_permutation_is_unsupported() {
        let swap = registry::standard().operator("SWAP").unwrap();
        let mut node = BackpropNode::new(swap).unwrap();
        assert!(node.grad().is_empty());

        let mut state = DenseState::basis_state(2, 1).unwrap();
        node.forward_apply(&mut state).unwrap();
        assert_eq!(state.amplitudes()[2], c(1.0, 0.0));

        let mut delta = DenseState::from_amplitudes(2, &[c(0.1, 0.0), c(0.2, 0.3), c(0.0, 0.0), c(0.5, 0.0)])
            .unwrap();
        let before = delta.clone();
        assert!(matches!(
            node.backward_step(&mut delta),
            Err(DiffError::UnsupportedOperator { .. })
        ));
        assert_eq!(delta, before);
    }

    #[test]
    fn test_cotangent_width_checked() {
        let mut node = BackpropNode::new(Arc::new(Put::new(2, &[0], Arc::new(rx(0.3))).unwrap())).unwrap();
        let mut state = DenseState::new(2).unwrap();
        node.forward_apply(&mut state).unwrap();
        node.grad_mut()[0] = 7.0;

        let mut delta = DenseState::new(1).unwrap();
        assert_eq!(
            node.backward_step(&mut delta).unwrap_err(),
            DiffError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(node.grad(), &[7.0]);
    }

    #[test]
    fn test_backward_pulls_cotangent_back() {
        let theta = 0.9;
        let mut node = BackpropNode::new(Arc::new(rx(theta))).unwrap();
        let mut state = DenseState::new(1).unwrap();
        node.forward_apply(&mut state).unwrap();

        // δ = U·|0⟩ pulls back to |0⟩
        let mut delta = state.clone();
        node.backward_step(&mut delta).unwrap();
        assert_relative_eq!(delta.amplitudes()[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(delta.amplitudes()[1].norm(), 0.0, epsilon = 1e-12);
        // ⟨ψ|ψ⟩ does not depend on θ
        assert_relative_eq!(node.grad()[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_overwritten_not_accumulated() {
        let mut node = BackpropNode::new(Arc::new(rx(0.5))).unwrap();
        let z = registry::standard().get("Z").unwrap();

        for _ in 0..3 {
            let mut state = DenseState::new(1).unwrap();
            node.forward_apply(&mut state).unwrap();
            let mut delta = state.clone();
            delta.apply(z.as_ref()).unwrap();
            node.backward_step(&mut delta).unwrap();
        }
        assert_relative_eq!(node.grad()[0], -(0.5f64).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_unwrap_returns_same_operator() {
        let op: Arc<dyn Operator> = Arc::new(rx(0.1));
        let node = BackpropNode::new(op.clone()).unwrap();
        assert_eq!(node.num_qubits(), 1);
        assert!(Arc::ptr_eq(&node.into_content(), &op));
    }
}
