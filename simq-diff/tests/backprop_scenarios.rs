//! Integration tests for the single-node and two-node reverse-mode contract

use approx::assert_relative_eq;
use num_complex::Complex64;
use simq_core::{Operator, OperatorShape};
use simq_diff::numdiff::central_difference;
use simq_diff::{AnalyticMarker, BackpropNode, DiffCircuit, DiffError, DiffMode, DiffTag};
use simq_gates::matrix_ops::kron;
use simq_gates::matrices::{PAULI_X, PAULI_Z};
use simq_gates::{registry, rx, ry, MatrixGate, Put, Rotation};
use simq_state::DenseState;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Re⟨d|R(θ)|ψ₀⟩ for a single-qubit Rx
fn linear_functional(d: &DenseState, theta: f64) -> f64 {
    let mut psi = DenseState::new(1).unwrap();
    psi.apply(&rx(theta)).unwrap();
    d.inner_product(&psi).unwrap().re
}

// Phase gate with a free parameter but no generator
#[derive(Debug)]
struct Phase(f64);

impl Operator for Phase {
    fn name(&self) -> &str {
        "P"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), Complex64::from_polar(1.0, self.0)]
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.0]
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        Arc::new(Phase(-self.0))
    }
}

// Hermitian generator that does not square to the identity
#[derive(Debug)]
struct Projector;

impl Operator for Projector {
    fn name(&self) -> &str {
        "P1"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        vec![c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)]
    }

    fn is_unitary(&self) -> bool {
        false
    }

    fn is_hermitian(&self) -> bool {
        true
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        Arc::new(Projector)
    }
}

// Rotation-shaped operator around the projector
#[derive(Debug)]
struct ProjectorRotation(f64);

impl Operator for ProjectorRotation {
    fn name(&self) -> &str {
        "RP1"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn local_matrix(&self) -> Vec<Complex64> {
        vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), Complex64::from_polar(1.0, -self.0 / 2.0)]
    }

    fn parameters(&self) -> Vec<f64> {
        vec![self.0]
    }

    fn adjoint(&self) -> Arc<dyn Operator> {
        Arc::new(ProjectorRotation(-self.0))
    }

    fn shape(&self) -> OperatorShape {
        OperatorShape::Rotation {
            theta: self.0,
            generator: Arc::new(Projector),
        }
    }
}

#[test]
fn test_single_rotation_forward_checkpoint() {
    init_logger();
    let mut node = BackpropNode::new(Arc::new(rx(FRAC_PI_2))).unwrap();
    let mut state = DenseState::zero_state(1).unwrap();
    node.forward_apply(&mut state).unwrap();

    let out = node.output().unwrap();
    assert_relative_eq!(out.amplitudes()[0].re, FRAC_PI_4.cos(), epsilon = 1e-12);
    assert_relative_eq!(out.amplitudes()[0].im, 0.0, epsilon = 1e-12);
    assert_relative_eq!(out.amplitudes()[1].re, 0.0, epsilon = 1e-12);
    assert_relative_eq!(out.amplitudes()[1].im, -FRAC_PI_4.sin(), epsilon = 1e-12);
}

#[test]
fn test_single_rotation_gradient_matches_finite_difference() {
    init_logger();
    let theta = FRAC_PI_2;
    let d = DenseState::from_amplitudes(1, &[c(1.0, 0.0), c(0.0, 0.0)]).unwrap();

    let mut node = BackpropNode::new(Arc::new(rx(theta))).unwrap();
    let mut state = DenseState::zero_state(1).unwrap();
    node.forward_apply(&mut state).unwrap();

    // cotangent of Re⟨d|ψ⟩ is d/2
    let mut delta = DenseState::from_amplitudes(1, &[c(0.5, 0.0), c(0.0, 0.0)]).unwrap();
    node.backward_step(&mut delta).unwrap();

    let fd = central_difference(|t| linear_functional(&d, t), theta, 1e-6);
    assert_relative_eq!(node.grad()[0], fd, epsilon = 1e-4);
    assert_relative_eq!(node.grad()[0], -0.5 * FRAC_PI_4.sin(), epsilon = 1e-10);

    // δ left as R(-θ)·δ
    assert_relative_eq!(delta.amplitudes()[0].re, 0.5 * FRAC_PI_4.cos(), epsilon = 1e-12);
    assert_relative_eq!(delta.amplitudes()[1].im, 0.5 * FRAC_PI_4.sin(), epsilon = 1e-12);
}

#[test]
fn test_unit_cotangent_is_gradient_of_symmetric_functional() {
    init_logger();
    let theta = FRAC_PI_2;
    let d = DenseState::from_amplitudes(1, &[c(1.0, 0.0), c(0.0, 0.0)]).unwrap();

    let mut node = BackpropNode::new(Arc::new(rx(theta))).unwrap();
    let mut state = DenseState::zero_state(1).unwrap();
    node.forward_apply(&mut state).unwrap();
    let mut delta = d.clone();
    node.backward_step(&mut delta).unwrap();

    // δ = d is the cotangent of ⟨d|ψ⟩ + ⟨ψ|d⟩
    let fd = central_difference(|t| 2.0 * linear_functional(&d, t), theta, 1e-6);
    assert_relative_eq!(node.grad()[0], fd, epsilon = 1e-4);
}

#[test]
fn test_two_node_chain() {
    init_logger();
    let (a, b) = (0.37, -1.21);
    let xx: Arc<dyn Operator> = Arc::new(MatrixGate::new("XX", 2, kron(&PAULI_X, &PAULI_X)).unwrap());
    let zz = MatrixGate::new("ZZ", 2, kron(&PAULI_Z, &PAULI_Z)).unwrap();
    let z1 = registry::standard().put("Z", 2, &[1]).unwrap();

    let r1 = |t: f64| -> Arc<dyn Operator> { Arc::new(Put::new(2, &[0], Arc::new(ry(t))).unwrap()) };
    let r2 = |t: f64| -> Arc<dyn Operator> { Arc::new(Rotation::new(xx.clone(), t).unwrap()) };
    let energy = |t1: f64, t2: f64| {
        let mut psi = DenseState::zero_state(2).unwrap();
        psi.apply(r1(t1).as_ref()).unwrap();
        psi.apply(r2(t2).as_ref()).unwrap();
        psi.expectation(&zz).unwrap() + 0.5 * psi.expectation(&z1).unwrap()
    };

    let mut n1 = BackpropNode::new(r1(a)).unwrap();
    let mut n2 = BackpropNode::new(r2(b)).unwrap();
    let mut state = DenseState::zero_state(2).unwrap();
    n2.forward_apply(n1.forward_apply(&mut state).unwrap()).unwrap();

    // δ = H·ψ for H = ZZ + Z₁/2
    let mut delta = state.clone();
    delta.apply(&zz).unwrap();
    let mut half_z1 = state.clone();
    half_z1.apply(&z1).unwrap();
    for (d, h) in delta.amplitudes_mut().iter_mut().zip(half_z1.amplitudes()) {
        *d += h * 0.5;
    }

    n1.backward_step(n2.backward_step(&mut delta).unwrap()).unwrap();

    let eps = 1e-6;
    let fd1 = central_difference(|t| energy(t, b), a, eps);
    let fd2 = central_difference(|t| energy(a, t), b, eps);
    assert_relative_eq!(n1.grad()[0], fd1, epsilon = 1e-4);
    assert_relative_eq!(n2.grad()[0], fd2, epsilon = 1e-4);
}

#[test]
fn test_non_rotation_is_unsupported_and_untouched() {
    init_logger();
    let mut node = BackpropNode::new(Arc::new(Phase(0.3))).unwrap();
    let mut state = DenseState::basis_state(1, 1).unwrap();
    node.forward_apply(&mut state).unwrap();
    node.grad_mut()[0] = 0.25;

    let mut delta = DenseState::from_amplitudes(1, &[c(0.2, -0.1), c(0.4, 0.7)]).unwrap();
    let before = delta.clone();
    let err = node.backward_step(&mut delta).unwrap_err();

    assert!(matches!(err, DiffError::UnsupportedOperator { ref name, .. } if name == "P"));
    assert_eq!(delta, before);
    assert_eq!(node.grad(), &[0.25]);
}

#[test]
fn test_permutation_is_unsupported() {
    init_logger();
    let swap = registry::standard().put("SWAP", 3, &[0, 2]).unwrap();
    let mut node = BackpropNode::new(Arc::new(swap)).unwrap();
    let mut state = DenseState::basis_state(3, 1).unwrap();
    node.forward_apply(&mut state).unwrap();
    assert_eq!(state, DenseState::basis_state(3, 4).unwrap());

    let mut delta = state.clone();
    assert!(matches!(
        node.backward_step(&mut delta),
        Err(DiffError::UnsupportedOperator { .. })
    ));
    assert_eq!(delta, state);
}

#[test]
fn test_non_involutory_generator_is_unsupported() {
    init_logger();
    let mut node = BackpropNode::new(Arc::new(ProjectorRotation(0.6))).unwrap();
    let mut state = DenseState::zero_state(1).unwrap();
    node.forward_apply(&mut state).unwrap();

    let mut delta = state.clone();
    match node.backward_step(&mut delta) {
        Err(DiffError::UnsupportedOperator { reason, .. }) => {
            assert_eq!(reason, "generator is not involutory")
        },
        other => panic!("Expected UnsupportedOperator, got {:?}", other),
    }
    assert_eq!(node.grad(), &[0.0]);
}

#[test]
fn test_backward_before_forward_is_structural_mismatch() {
    init_logger();
    let mut node = BackpropNode::new(Arc::new(ry(0.2))).unwrap();
    let mut delta = DenseState::from_amplitudes(1, &[c(0.6, 0.0), c(0.0, 0.8)]).unwrap();
    let before = delta.clone();

    assert!(matches!(
        node.backward_step(&mut delta),
        Err(DiffError::StructuralMismatch { .. })
    ));
    assert_eq!(delta, before);
    assert_eq!(node.grad(), &[0.0]);
}

#[test]
fn test_cotangent_dimension_mismatch() {
    init_logger();
    let op = Put::new(3, &[1], Arc::new(rx(0.2))).unwrap();
    let mut node = BackpropNode::new(Arc::new(op)).unwrap();
    let mut state = DenseState::zero_state(3).unwrap();
    node.forward_apply(&mut state).unwrap();

    let mut delta = DenseState::zero_state(2).unwrap();
    assert_eq!(
        node.backward_step(&mut delta).unwrap_err(),
        DiffError::DimensionMismatch {
            expected: 8,
            actual: 4
        }
    );
}

#[test]
fn test_wrapping_preserves_operator_identity() {
    let op: Arc<dyn Operator> = Arc::new(Put::new(2, &[1], Arc::new(rx(0.9))).unwrap());

    let marker = AnalyticMarker::new(op.clone()).unwrap();
    assert_eq!(marker.dimension(), op.dimension());
    assert_eq!(marker.matrix(), simq_gates::matrix_ops::operator_matrix(op.as_ref()));
    assert!(Arc::ptr_eq(&marker.into_content(), &op));

    let node = BackpropNode::new(op.clone()).unwrap();
    assert_eq!(node.num_qubits(), 2);
    assert_eq!(node.content().locations(), op.locations());
    assert!(Arc::ptr_eq(&node.into_content(), &op));
}

#[test]
fn test_circuit_rejects_partial_backward() {
    init_logger();
    let ops: Vec<Arc<dyn Operator>> = vec![
        Arc::new(Put::new(2, &[0], Arc::new(ry(0.3))).unwrap()),
        Arc::new(registry::standard().put("CNOT", 2, &[0, 1]).unwrap()),
    ];
    let mut circuit = DiffCircuit::mark(2, ops, DiffMode::Backprop).unwrap();
    circuit
        .push_backprop(Arc::new(registry::standard().put("SWAP", 2, &[0, 1]).unwrap()))
        .unwrap();

    let mut state = DenseState::zero_state(2).unwrap();
    circuit.forward(&mut state).unwrap();
    let mut delta = state.clone();
    assert!(matches!(
        circuit.backward(&mut delta),
        Err(DiffError::UnsupportedOperator { .. })
    ));
    assert_eq!(delta, state);
    assert_eq!(circuit.gradients(), vec![0.0]);
}
