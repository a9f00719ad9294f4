//! Constant gate matrices
//!
//! All matrices are flattened row-major. Multi-qubit matrices use the
//! little-endian local basis of [`simq_core::Operator::local_matrix`]: for
//! CNOT the control is the first location and the target the second.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// I = [[1, 0], [0, 1]]
pub const IDENTITY: [Complex64; 4] = [ONE, ZERO, ZERO, ONE];

/// X = [[0, 1], [1, 0]]
pub const PAULI_X: [Complex64; 4] = [ZERO, ONE, ONE, ZERO];

/// Y = [[0, -i], [i, 0]]
pub const PAULI_Y: [Complex64; 4] = [ZERO, NEG_I, I, ZERO];

/// Z = [[1, 0], [0, -1]]
pub const PAULI_Z: [Complex64; 4] = [ONE, ZERO, ZERO, NEG_ONE];

/// H = 1/√2 · [[1, 1], [1, -1]]
pub const HADAMARD: [Complex64; 4] = [
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(-INV_SQRT2, 0.0),
];

/// S = [[1, 0], [0, i]]
pub const S_GATE: [Complex64; 4] = [ONE, ZERO, ZERO, I];

/// S† = [[1, 0], [0, -i]]
pub const S_GATE_DAGGER: [Complex64; 4] = [ONE, ZERO, ZERO, NEG_I];

/// T = [[1, 0], [0, e^(iπ/4)]]
pub const T_GATE: [Complex64; 4] = [
    ONE,
    ZERO,
    ZERO,
    Complex64::new(INV_SQRT2, INV_SQRT2),
];

/// T† = [[1, 0], [0, e^(-iπ/4)]]
pub const T_GATE_DAGGER: [Complex64; 4] = [
    ONE,
    ZERO,
    ZERO,
    Complex64::new(INV_SQRT2, -INV_SQRT2),
];

/// CNOT, control on local bit 0, target on local bit 1
pub const CNOT: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ZERO, ZERO, ONE, //
    ZERO, ZERO, ONE, ZERO, //
    ZERO, ONE, ZERO, ZERO,
];

/// CZ = diag(1, 1, 1, -1)
pub const CZ: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ONE, ZERO, ZERO, //
    ZERO, ZERO, ONE, ZERO, //
    ZERO, ZERO, ZERO, NEG_ONE,
];

/// SWAP exchanges the two local bits
pub const SWAP: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ZERO, ONE, ZERO, //
    ZERO, ONE, ZERO, ZERO, //
    ZERO, ZERO, ZERO, ONE,
];
