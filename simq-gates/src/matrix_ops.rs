//! Matrix operations for gate matrices
//!
//! This module provides utilities for working with flattened row-major
//! matrices:
//! - Products, adjoints and tensor products
//! - Property checks (unitarity, hermiticity, involution)
//! - Full-width materialization of an [`Operator`] on its register
//!
//! # Example
//!
//! ```rust
//! use simq_gates::matrix_ops::{embed_matrix, is_unitary};
//! use simq_gates::matrices::PAULI_X;
//!
//! // X on qubit 1 of a 2-qubit register
//! let full = embed_matrix(&PAULI_X, &[1], 2);
//! assert_eq!(full.len(), 16);
//! assert!(is_unitary(&full, 1e-10));
//! ```

use num_complex::Complex64;
use simq_core::Operator;

/// Side length of a flattened square matrix, if `len` is a perfect square
pub fn matrix_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}

fn square_side(matrix: &[Complex64]) -> usize {
    let Some(n) = matrix_side(matrix.len()) else {
        panic!("Matrix must be square");
    };
    n
}

/// Create an identity matrix of the given size
pub fn identity_matrix(size: usize) -> Vec<Complex64> {
    let mut matrix = vec![Complex64::new(0.0, 0.0); size * size];
    for i in 0..size {
        matrix[i * size + i] = Complex64::new(1.0, 0.0);
    }
    matrix
}

/// Multiply two square matrices: C = A · B
pub fn matrix_multiply(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let n = square_side(a);
    assert_eq!(a.len(), b.len(), "Matrices must have the same size");

    let mut result = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        for k in 0..n {
            let a_ik = a[i * n + k];
            for j in 0..n {
                result[i * n + j] += a_ik * b[k * n + j];
            }
        }
    }
    result
}

/// Adjoint (Hermitian conjugate): (A†)ᵢⱼ = (Aⱼᵢ)*
pub fn matrix_adjoint(matrix: &[Complex64]) -> Vec<Complex64> {
    let n = square_side(matrix);
    let mut result = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n {
        for j in 0..n {
            result[i * n + j] = matrix[j * n + i].conj();
        }
    }
    result
}

/// Tensor product A ⊗ B
///
/// In the little-endian local basis, `b` acts on the low (first-listed)
/// qubits and `a` on the high ones.
pub fn kron(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let n_a = square_side(a);
    let n_b = square_side(b);
    let n = n_a * n_b;

    let mut result = vec![Complex64::new(0.0, 0.0); n * n];
    for i in 0..n_a {
        for j in 0..n_a {
            let a_ij = a[i * n_a + j];
            for k in 0..n_b {
                for l in 0..n_b {
                    result[(i * n_b + k) * n + (j * n_b + l)] = a_ij * b[k * n_b + l];
                }
            }
        }
    }
    result
}

/// Largest element-wise deviation |A - B|
pub fn max_deviation(a: &[Complex64], b: &[Complex64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Deviation of U†U from the identity
pub fn unitarity_deviation(matrix: &[Complex64]) -> f64 {
    let n = square_side(matrix);
    let product = matrix_multiply(&matrix_adjoint(matrix), matrix);
    max_deviation(&product, &identity_matrix(n))
}

/// Check if a matrix is unitary (U†U = I)
pub fn is_unitary(matrix: &[Complex64], tolerance: f64) -> bool {
    unitarity_deviation(matrix) <= tolerance
}

/// Check if a matrix is Hermitian (A = A†)
pub fn is_hermitian(matrix: &[Complex64], tolerance: f64) -> bool {
    max_deviation(matrix, &matrix_adjoint(matrix)) <= tolerance
}

/// Check if a matrix squares to the identity (A·A = I)
pub fn is_involutory(matrix: &[Complex64], tolerance: f64) -> bool {
    let n = square_side(matrix);
    max_deviation(&matrix_multiply(matrix, matrix), &identity_matrix(n)) <= tolerance
}

/// Embed a local matrix acting on `locations` into a `num_qubits` register
///
/// The result is the full 2^n × 2^n row-major matrix, identity on every
/// qubit not listed.
pub fn embed_matrix(local: &[Complex64], locations: &[usize], num_qubits: usize) -> Vec<Complex64> {
    let local_dim = 1usize << locations.len();
    assert_eq!(
        local.len(),
        local_dim * local_dim,
        "Local matrix does not match the number of locations"
    );

    let dim = 1usize << num_qubits;
    let active_mask = locations.iter().fold(0usize, |m, &q| m | (1 << q));
    let mut result = vec![Complex64::new(0.0, 0.0); dim * dim];

    for col in 0..dim {
        let local_col = gather(col, locations);
        let rest = col & !active_mask;
        for local_row in 0..local_dim {
            let row = rest | scatter(local_row, locations);
            result[row * dim + col] = local[local_row * local_dim + local_col];
        }
    }
    result
}

/// Full-width matrix of an operator on its declared register
pub fn operator_matrix(op: &dyn Operator) -> Vec<Complex64> {
    embed_matrix(&op.local_matrix(), &op.locations(), op.num_qubits())
}

fn scatter(local: usize, locations: &[usize]) -> usize {
    let mut index = 0;
    for (bit, &q) in locations.iter().enumerate() {
        if local & (1 << bit) != 0 {
            index |= 1 << q;
        }
    }
    index
}

fn gather(index: usize, locations: &[usize]) -> usize {
    let mut local = 0;
    for (bit, &q) in locations.iter().enumerate() {
        if index & (1 << q) != 0 {
            local |= 1 << bit;
        }
    }
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrices::{CNOT, IDENTITY, PAULI_X, PAULI_Z, S_GATE};
    use approx::assert_relative_eq;

    #[test]
    fn test_matrix_side() {
        assert_eq!(matrix_side(16), Some(4));
        assert_eq!(matrix_side(1), Some(1));
        assert_eq!(matrix_side(6), None);
    }

    #[test]
    fn test_adjoint_of_s() {
        let adj = matrix_adjoint(&S_GATE);
        assert_relative_eq!(adj[3].im, -1.0, epsilon = 1e-12);
        let product = matrix_multiply(&adj, &S_GATE);
        assert!(max_deviation(&product, &identity_matrix(2)) < 1e-12);
    }

    #[test]
    fn test_kron_places_second_factor_low() {
        // Z ⊗ X: X on local bit 0, Z on local bit 1
        let zx = kron(&PAULI_Z, &PAULI_X);
        let embedded_x = embed_matrix(&PAULI_X, &[0], 2);
        let embedded_z = embed_matrix(&PAULI_Z, &[1], 2);
        let product = matrix_multiply(&embedded_z, &embedded_x);
        assert!(max_deviation(&zx, &product) < 1e-12);
    }

    #[test]
    fn test_embed_single_qubit_identity_elsewhere() {
        let full = embed_matrix(&IDENTITY, &[1], 3);
        assert!(max_deviation(&full, &identity_matrix(8)) < 1e-12);
    }

    #[test]
    fn test_embed_cnot_reversed_locations() {
        // CNOT with control q1, target q0
        let full = embed_matrix(&CNOT, &[1, 0], 2);
        // |q1 q0⟩ = |10⟩ (index 2) -> |11⟩ (index 3)
        assert_relative_eq!(full[3 * 4 + 2].re, 1.0, epsilon = 1e-12);
        // |01⟩ (index 1) untouched
        assert_relative_eq!(full[4 + 1].re, 1.0, epsilon = 1e-12);
        assert!(is_unitary(&full, 1e-12));
    }

    #[test]
    fn test_property_checks() {
        assert!(is_hermitian(&PAULI_X, 1e-12));
        assert!(!is_hermitian(&S_GATE, 1e-12));
        assert!(is_involutory(&PAULI_Z, 1e-12));
        let not_unitary = vec![Complex64::new(2.0, 0.0); 4];
        assert!(!is_unitary(&not_unitary, 1e-6));
    }
}
