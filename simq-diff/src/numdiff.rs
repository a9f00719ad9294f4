//! Finite difference derivatives
//!
//! Used to cross-check the analytic gradients and as a fallback for callers
//! that only have a black-box objective.

use crate::circuit::DiffCircuit;
use crate::error::Result;
use rayon::prelude::*;
use simq_core::Operator;
use simq_state::DenseState;
use std::convert::Infallible;

/// Finite difference method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiniteDifferenceMethod {
    /// Forward difference: f'(x) ≈ [f(x+ε) - f(x)] / ε
    Forward,
    /// Central difference: f'(x) ≈ [f(x+ε) - f(x-ε)] / (2ε)
    Central,
    /// Backward difference: f'(x) ≈ [f(x) - f(x-ε)] / ε
    Backward,
}

/// Configuration for finite difference derivatives
#[derive(Debug, Clone)]
pub struct FiniteDifferenceConfig {
    /// Method to use
    pub method: FiniteDifferenceMethod,
    /// Step size
    pub epsilon: f64,
    /// Evaluate parameters in parallel
    pub parallel: bool,
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            method: FiniteDifferenceMethod::Central,
            epsilon: 1e-6,
            parallel: true,
        }
    }
}

/// Derivative of a fallible scalar function at `x`
pub fn try_derivative<F, E>(mut f: F, x: f64, config: &FiniteDifferenceConfig) -> std::result::Result<f64, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
{
    let eps = config.epsilon;
    let derivative = match config.method {
        FiniteDifferenceMethod::Forward => (f(x + eps)? - f(x)?) / eps,
        FiniteDifferenceMethod::Central => (f(x + eps)? - f(x - eps)?) / (2.0 * eps),
        FiniteDifferenceMethod::Backward => (f(x)? - f(x - eps)?) / eps,
    };
    Ok(derivative)
}

/// Derivative of a scalar function at `x`
pub fn derivative<F>(mut f: F, x: f64, config: &FiniteDifferenceConfig) -> f64
where
    F: FnMut(f64) -> f64,
{
    match try_derivative(|t| Ok::<f64, Infallible>(f(t)), x, config) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Two-sided difference quotient with step `epsilon`
///
/// # Example
/// ```
/// use simq_diff::numdiff::central_difference;
///
/// let d = central_difference(f64::sin, 0.5, 1e-6);
/// assert!((d - 0.5f64.cos()).abs() < 1e-8);
/// ```
pub fn central_difference<F>(mut f: F, x: f64, epsilon: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    (f(x + epsilon) - f(x - epsilon)) / (2.0 * epsilon)
}

/// Finite difference gradient of ⟨H⟩ over every gradient entry of `circuit`
pub fn circuit_gradient(
    circuit: &DiffCircuit,
    observable: &dyn Operator,
    init: &DenseState,
    config: &FiniteDifferenceConfig,
) -> Result<Vec<f64>> {
    let single = |slot: usize| {
        try_derivative(
            |shift| circuit.expectation_at(observable, init, slot, shift),
            0.0,
            config,
        )
    };

    let n_params = circuit.num_parameters();
    if config.parallel {
        (0..n_params).into_par_iter().map(single).collect()
    } else {
        (0..n_params).map(single).collect()
    }
}
