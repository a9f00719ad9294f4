//! Scalar gate-application kernels
//!
//! Both kernels work in place on a full amplitude vector. Matrices are
//! row-major over the listed qubits, little-endian: bit `k` of a local index
//! is the state of `qubits[k]`.

use num_complex::Complex64;

/// Apply a 2×2 matrix to one qubit
///
/// For a gate on qubit `q`, amplitudes are processed in pairs `(i, i | 1<<q)`
/// that differ only in bit `q`. Complexity: O(2^n).
pub fn apply_single_qubit(
    state: &mut [Complex64],
    matrix: &[Complex64],
    qubit: usize,
    num_qubits: usize,
) {
    debug_assert_eq!(matrix.len(), 4);
    let dimension = 1 << num_qubits;
    let qubit_mask = 1 << qubit;

    let (m00, m01, m10, m11) = (matrix[0], matrix[1], matrix[2], matrix[3]);

    for i in 0..dimension {
        // Each pair is visited once, from its low member
        if i & qubit_mask != 0 {
            continue;
        }
        let j = i | qubit_mask;

        let amp0 = state[i];
        let amp1 = state[j];
        state[i] = m00 * amp0 + m01 * amp1;
        state[j] = m10 * amp0 + m11 * amp1;
    }
}

/// Apply a 2^k × 2^k matrix to `k` distinct qubits
///
/// For every assignment of the untouched qubits, the 2^k amplitudes spanned
/// by `qubits` are gathered, multiplied by the matrix and scattered back.
pub fn apply_multi_qubit(
    state: &mut [Complex64],
    matrix: &[Complex64],
    qubits: &[usize],
    num_qubits: usize,
) {
    let k = qubits.len();
    let local_dim = 1 << k;
    debug_assert_eq!(matrix.len(), local_dim * local_dim);

    let dimension = 1 << num_qubits;
    let active_mask = qubits.iter().fold(0usize, |mask, &q| mask | (1 << q));

    // Offsets of each local basis state relative to a base index
    let offsets: Vec<usize> = (0..local_dim)
        .map(|local| scatter_bits(local, qubits))
        .collect();

    let mut gathered = vec![Complex64::new(0.0, 0.0); local_dim];
    for base in 0..dimension {
        if base & active_mask != 0 {
            continue;
        }

        for (slot, &offset) in gathered.iter_mut().zip(&offsets) {
            *slot = state[base | offset];
        }

        for (row, &offset) in offsets.iter().enumerate() {
            let row_start = row * local_dim;
            state[base | offset] = matrix[row_start..row_start + local_dim]
                .iter()
                .zip(&gathered)
                .map(|(m, a)| m * a)
                .sum();
        }
    }
}

/// Spread the bits of a local index onto the positions in `qubits`
#[inline]
pub fn scatter_bits(local: usize, qubits: &[usize]) -> usize {
    let mut index = 0;
    for (bit, &q) in qubits.iter().enumerate() {
        if local & (1 << bit) != 0 {
            index |= 1 << q;
        }
    }
    index
}
