//! Analytic marker: a passive gradient slot on a rotation
//!
//! The marker never computes anything. It forwards simulation to the wrapped
//! rotation and gives an external evaluator, such as
//! [`crate::shift::parameter_shift`], a stable place to store the derivative.

use crate::error::{DiffError, Result};
use crate::tag::{check_width, DiffTag};
use log::trace;
use simq_core::Operator;
use simq_state::DenseState;
use std::slice;
use std::sync::Arc;

/// Rotation wrapper carrying an externally written gradient
///
/// # Example
/// ```
/// use simq_diff::{AnalyticMarker, DiffTag};
/// use simq_gates::rx;
/// use std::sync::Arc;
///
/// let mut marker = AnalyticMarker::new(Arc::new(rx(0.3))).unwrap();
/// assert_eq!(marker.gradient(), 0.0);
/// marker.set_gradient(-0.25);
/// assert_eq!(marker.grad(), &[-0.25]);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticMarker {
    content: Arc<dyn Operator>,
    grad: f64,
}

impl AnalyticMarker {
    /// Wrap a rotation-shaped operator
    ///
    /// # Errors
    /// Returns [`DiffError::UnsupportedOperator`] if `content` is not
    /// rotation-shaped
    pub fn new(content: Arc<dyn Operator>) -> Result<Self> {
        if !content.is_rotation() {
            return Err(DiffError::unsupported(content.name(), "not rotation-shaped"));
        }
        Ok(Self { content, grad: 0.0 })
    }

    /// Current rotation angle
    pub fn angle(&self) -> f64 {
        self.content.shape().theta().unwrap_or_default()
    }

    /// Stored gradient
    pub fn gradient(&self) -> f64 {
        self.grad
    }

    /// Overwrite the stored gradient
    pub fn set_gradient(&mut self, grad: f64) {
        self.grad = grad;
    }

    /// Marker around the adjoint of the wrapped rotation
    ///
    /// Structural reversal for use inside a larger adjoint expression; the
    /// new marker starts with a zero gradient.
    pub fn reverse_tag(&self) -> Self {
        Self {
            content: self.content.adjoint(),
            grad: 0.0,
        }
    }
}

impl DiffTag for AnalyticMarker {
    fn content(&self) -> &Arc<dyn Operator> {
        &self.content
    }

    fn into_content(self) -> Arc<dyn Operator> {
        self.content
    }

    fn forward_apply<'s>(&mut self, state: &'s mut DenseState) -> Result<&'s mut DenseState> {
        check_width(self.content.as_ref(), state)?;
        trace!("marker forward {}", self.content.name());
        state.apply(self.content.as_ref())?;
        Ok(state)
    }

    fn grad(&self) -> &[f64] {
        slice::from_ref(&self.grad)
    }

    fn grad_mut(&mut self) -> &mut [f64] {
        slice::from_mut(&mut self.grad)
    }
}
