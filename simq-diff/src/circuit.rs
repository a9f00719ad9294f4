//! Ordered chain of plain and differentiable operators
//!
//! [`DiffCircuit`] sequences forward applies strictly before backward steps
//! and threads one cotangent register back through the chain. Plain
//! operators and analytic markers pull δ back through their adjoint;
//! backprop nodes additionally write their gradient.
//!
//! Each node is owned by exactly one position in the circuit. Two positions
//! never share a gradient slot, so tied parameters have to be summed by the
//! caller from [`DiffCircuit::gradients`].
//!
//! # Example
//!
//! ```
//! use simq_diff::{DiffCircuit, DiffMode};
//! use simq_core::Operator;
//! use simq_gates::{registry, rx, ry, Put};
//! use simq_state::DenseState;
//! use std::sync::Arc;
//!
//! let ops: Vec<Arc<dyn Operator>> = vec![
//!     Arc::new(Put::new(2, &[0], Arc::new(rx(0.3))).unwrap()),
//!     Arc::new(registry::standard().put("CNOT", 2, &[0, 1]).unwrap()),
//!     Arc::new(Put::new(2, &[1], Arc::new(ry(1.2))).unwrap()),
//! ];
//! let mut circuit = DiffCircuit::mark(2, ops, DiffMode::Backprop).unwrap();
//! assert_eq!(circuit.parameters(), vec![0.3, 1.2]);
//!
//! let z1 = registry::standard().put("Z", 2, &[1]).unwrap();
//! let init = DenseState::new(2).unwrap();
//! let (energy, grads) = circuit.expectation_gradient(&z1, &init).unwrap();
//! assert!(energy.abs() <= 1.0);
//! assert_eq!(grads.len(), 2);
//! ```

use crate::backprop::BackpropNode;
use crate::error::{DiffError, Result};
use crate::marker::AnalyticMarker;
use crate::tag::{DiffMode, DiffTag};
use log::debug;
use simq_core::Operator;
use simq_gates::{generator, Rotation};
use simq_state::DenseState;
use std::sync::Arc;

/// One position of a [`DiffCircuit`]
#[derive(Debug, Clone)]
pub enum Element {
    /// Operator with no gradient slot
    Fixed(Arc<dyn Operator>),
    /// Rotation whose gradient is written by an external evaluator
    Marker(AnalyticMarker),
    /// Operator differentiated in reverse mode
    Backprop(BackpropNode),
}

impl Element {
    /// The operator this position applies
    pub fn operator(&self) -> &Arc<dyn Operator> {
        match self {
            Element::Fixed(op) => op,
            Element::Marker(marker) => marker.content(),
            Element::Backprop(node) => node.content(),
        }
    }

    /// Gradient slot, empty for fixed operators
    pub fn grad(&self) -> &[f64] {
        match self {
            Element::Fixed(_) => &[],
            Element::Marker(marker) => marker.grad(),
            Element::Backprop(node) => node.grad(),
        }
    }

    fn grad_mut(&mut self) -> &mut [f64] {
        match self {
            Element::Fixed(_) => &mut [],
            Element::Marker(marker) => marker.grad_mut(),
            Element::Backprop(node) => node.grad_mut(),
        }
    }
}

/// A differentiable circuit over a fixed-width register
#[derive(Debug, Clone)]
pub struct DiffCircuit {
    num_qubits: usize,
    elements: Vec<Element>,
}

impl DiffCircuit {
    /// Create an empty circuit
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            elements: Vec::new(),
        }
    }

    /// Build a circuit, wrapping every rotation-shaped operator in `mode`
    ///
    /// Operators that are not rotation-shaped are kept as plain positions.
    pub fn mark<I>(num_qubits: usize, ops: I, mode: DiffMode) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn Operator>>,
    {
        let mut circuit = Self::new(num_qubits);
        for op in ops {
            match (op.is_rotation(), mode) {
                (false, _) => circuit.push(op)?,
                (true, DiffMode::Analytic) => circuit.push_marker(op)?,
                (true, DiffMode::Backprop) => circuit.push_backprop(op)?,
            }
        }
        Ok(circuit)
    }

    /// Append a plain operator
    pub fn push(&mut self, op: Arc<dyn Operator>) -> Result<()> {
        self.check_operator(op.as_ref())?;
        self.elements.push(Element::Fixed(op));
        Ok(())
    }

    /// Append a rotation wrapped in an [`AnalyticMarker`]
    pub fn push_marker(&mut self, op: Arc<dyn Operator>) -> Result<()> {
        self.check_operator(op.as_ref())?;
        self.elements.push(Element::Marker(AnalyticMarker::new(op)?));
        Ok(())
    }

    /// Append an operator wrapped in a [`BackpropNode`]
    pub fn push_backprop(&mut self, op: Arc<dyn Operator>) -> Result<()> {
        self.check_operator(op.as_ref())?;
        self.elements.push(Element::Backprop(BackpropNode::new(op)?));
        Ok(())
    }

    /// Get the register width
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of positions
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the circuit is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get all positions in order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Total number of gradient entries
    pub fn num_parameters(&self) -> usize {
        self.elements.iter().map(|e| e.grad().len()).sum()
    }

    /// Parameters of the differentiable positions, in circuit order
    pub fn parameters(&self) -> Vec<f64> {
        self.elements
            .iter()
            .filter(|e| !e.grad().is_empty())
            .flat_map(|e| e.operator().parameters())
            .collect()
    }

    /// Gradient entries of the differentiable positions, in circuit order
    pub fn gradients(&self) -> Vec<f64> {
        self.elements.iter().flat_map(|e| e.grad().iter().copied()).collect()
    }

    /// Reset every gradient slot to zero
    pub fn zero_grad(&mut self) {
        for element in &mut self.elements {
            element.grad_mut().fill(0.0);
        }
    }

    /// Gradient indices that belong to analytic markers
    pub fn marker_slots(&self) -> Vec<usize> {
        let mut slots = Vec::new();
        let mut offset = 0;
        for element in &self.elements {
            if let Element::Marker(_) = element {
                slots.push(offset);
            }
            offset += element.grad().len();
        }
        slots
    }

    /// Mutable access to the analytic markers, in circuit order
    pub fn markers_mut(&mut self) -> impl Iterator<Item = &mut AnalyticMarker> {
        self.elements.iter_mut().filter_map(|e| match e {
            Element::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    /// Apply every position to `state`, recording backprop checkpoints
    pub fn forward(&mut self, state: &mut DenseState) -> Result<()> {
        self.check_register(state)?;
        for element in &mut self.elements {
            match element {
                Element::Fixed(op) => state.apply(op.as_ref())?,
                Element::Marker(marker) => {
                    marker.forward_apply(state)?;
                },
                Element::Backprop(node) => {
                    node.forward_apply(state)?;
                },
            }
        }
        Ok(())
    }

    /// Thread the cotangent `delta` back through the circuit
    ///
    /// All backprop nodes are validated first, so a failing circuit leaves
    /// `delta` and every gradient slot untouched.
    pub fn backward(&mut self, delta: &mut DenseState) -> Result<()> {
        self.check_register(delta)?;
        for element in &self.elements {
            if let Element::Backprop(node) = element {
                node.check_backward(delta)?;
            }
        }

        for element in self.elements.iter_mut().rev() {
            match element {
                Element::Fixed(op) => delta.apply(op.adjoint().as_ref())?,
                Element::Marker(marker) => {
                    marker.reverse_tag().forward_apply(delta)?;
                },
                Element::Backprop(node) => {
                    node.backward_step(delta)?;
                },
            }
        }
        Ok(())
    }

    /// Expectation ⟨ψ|H|ψ⟩ of the circuit output, without checkpointing
    pub fn expectation(&self, observable: &dyn Operator, init: &DenseState) -> Result<f64> {
        self.evaluate(observable, init, None)
    }

    /// Expectation with the rotation owning gradient entry `slot` advanced by `shift`
    ///
    /// `R(θ + s) = R(s)·R(θ)` for a shared generator, so the shifted rotation
    /// is applied as the original followed by a rotation by `shift`.
    pub fn expectation_at(
        &self,
        observable: &dyn Operator,
        init: &DenseState,
        slot: usize,
        shift: f64,
    ) -> Result<f64> {
        if slot >= self.num_parameters() {
            return Err(DiffError::DimensionMismatch {
                expected: self.num_parameters(),
                actual: slot.saturating_add(1),
            });
        }
        self.evaluate(observable, init, Some((slot, shift)))
    }

    /// Run forward, seed `δ = H·ψ` and run backward
    ///
    /// Returns `(⟨H⟩, gradients())`. Backprop entries hold dE/dθ afterwards;
    /// marker entries keep whatever an external evaluator last wrote.
    pub fn expectation_gradient(
        &mut self,
        observable: &dyn Operator,
        init: &DenseState,
    ) -> Result<(f64, Vec<f64>)> {
        let mut state = init.clone();
        self.forward(&mut state)?;

        let mut delta = state.clone();
        delta.apply(observable)?;
        let energy = state.inner_product(&delta)?.re;

        self.backward(&mut delta)?;
        debug!("expectation {:.6} over {} positions", energy, self.len());
        Ok((energy, self.gradients()))
    }

    fn evaluate(
        &self,
        observable: &dyn Operator,
        init: &DenseState,
        shifted: Option<(usize, f64)>,
    ) -> Result<f64> {
        self.check_register(init)?;
        let mut state = init.clone();
        let mut offset = 0;
        for element in &self.elements {
            let op = element.operator();
            state.apply(op.as_ref())?;

            let width = element.grad().len();
            if let Some((slot, shift)) = shifted {
                if (offset..offset + width).contains(&slot) {
                    let generator = generator(op.as_ref())
                        .ok_or_else(|| DiffError::unsupported(op.name(), "not rotation-shaped"))?;
                    state.apply(&Rotation::new(generator, shift)?)?;
                }
            }
            offset += width;
        }
        Ok(state.expectation(observable)?)
    }

    fn check_operator(&self, op: &dyn Operator) -> Result<()> {
        if op.num_qubits() != self.num_qubits {
            return Err(DiffError::DimensionMismatch {
                expected: 1 << self.num_qubits,
                actual: op.dimension(),
            });
        }
        Ok(())
    }

    fn check_register(&self, state: &DenseState) -> Result<()> {
        if state.num_qubits() != self.num_qubits {
            return Err(DiffError::DimensionMismatch {
                expected: 1 << self.num_qubits,
                actual: state.dimension(),
            });
        }
        Ok(())
    }
}
