//! Common contract of the differentiable node variants
//!
//! Both variants are transparent 1:1 wrappers: width, dimension, addressing
//! and matrix are those of the wrapped operator. They differ only in what
//! happens around the gradient slot.

use crate::error::{DiffError, Result};
use num_complex::Complex64;
use simq_core::Operator;
use simq_gates::matrix_ops::operator_matrix;
use simq_state::DenseState;
use std::fmt;
use std::sync::Arc;

/// Which node variant to wrap differentiable operators in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Bookkeeping only; an external evaluator fills the gradient slot
    Analytic,
    /// In-engine reverse mode with a forward checkpoint
    Backprop,
}

/// A differentiable wrapper around an operator
pub trait DiffTag: fmt::Debug {
    /// The wrapped operator
    fn content(&self) -> &Arc<dyn Operator>;

    /// Unwrap, returning the wrapped operator itself
    fn into_content(self) -> Arc<dyn Operator>
    where
        Self: Sized;

    /// Declared width of the wrapped operator
    fn num_qubits(&self) -> usize {
        self.content().num_qubits()
    }

    /// Hilbert-space dimension of the wrapped operator
    fn dimension(&self) -> usize {
        self.content().dimension()
    }

    /// Full-width matrix of the wrapped operator
    fn matrix(&self) -> Vec<Complex64> {
        operator_matrix(self.content().as_ref())
    }

    /// Apply the wrapped operator to `state` and hand it back for chaining
    fn forward_apply<'s>(&mut self, state: &'s mut DenseState) -> Result<&'s mut DenseState>;

    /// Gradient slot, one entry per free parameter
    fn grad(&self) -> &[f64];

    /// Mutable gradient slot
    fn grad_mut(&mut self) -> &mut [f64];
}

/// Reject registers whose width differs from the operator's
pub(crate) fn check_width(op: &dyn Operator, state: &DenseState) -> Result<()> {
    if state.num_qubits() != op.num_qubits() {
        return Err(DiffError::DimensionMismatch {
            expected: op.dimension(),
            actual: state.dimension(),
        });
    }
    Ok(())
}
