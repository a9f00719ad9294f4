//! Named gate table
//!
//! The registry maps names to shared [`MatrixGate`]s whose matrices and
//! property flags are computed once. [`GateRegistry::standard`] is
//! pre-populated with the built-in constant gates; [`standard`] exposes a
//! process-wide instance of it.
//!
//! # Example
//!
//! ```rust
//! use simq_gates::registry::{self, GateRegistry};
//! use simq_core::Operator;
//!
//! let x = registry::standard().get("X").unwrap();
//! assert!(x.is_involutory());
//!
//! // X on qubit 2 of a 3-qubit register
//! let placed = registry::standard().put("X", 3, &[2]).unwrap();
//! assert_eq!(placed.locations().as_slice(), &[2]);
//! ```

use crate::matrices;
use crate::matrix_gate::MatrixGate;
use crate::put::Put;
use ahash::AHashMap;
use num_complex::Complex64;
use simq_core::{Operator, QuantumError, Result};
use std::sync::{Arc, OnceLock};

/// Built-in gates: (name, qubits, matrix)
const BUILTIN: &[(&str, usize, &[Complex64])] = &[
    ("I", 1, &matrices::IDENTITY),
    ("X", 1, &matrices::PAULI_X),
    ("Y", 1, &matrices::PAULI_Y),
    ("Z", 1, &matrices::PAULI_Z),
    ("H", 1, &matrices::HADAMARD),
    ("S", 1, &matrices::S_GATE),
    ("S†", 1, &matrices::S_GATE_DAGGER),
    ("T", 1, &matrices::T_GATE),
    ("T†", 1, &matrices::T_GATE_DAGGER),
    ("CNOT", 2, &matrices::CNOT),
    ("CZ", 2, &matrices::CZ),
    ("SWAP", 2, &matrices::SWAP),
];

/// A table of named gates with cached matrices and flags
#[derive(Debug, Default)]
pub struct GateRegistry {
    gates: AHashMap<String, Arc<MatrixGate>>,
}

impl GateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in constant gates
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for &(name, num_qubits, matrix) in BUILTIN {
            registry.register(MatrixGate::trusted(name, num_qubits, matrix));
        }
        registry
    }

    /// Register a gate under its own name, replacing any previous entry
    pub fn register(&mut self, gate: MatrixGate) {
        self.gates.insert(gate.name().to_string(), Arc::new(gate));
    }

    /// Retrieve a gate by name
    pub fn get(&self, name: &str) -> Option<Arc<MatrixGate>> {
        self.gates.get(name).cloned()
    }

    /// Retrieve a gate by name as a shared operator
    ///
    /// # Errors
    /// Returns [`QuantumError::UnknownGate`] if no gate has this name
    pub fn operator(&self, name: &str) -> Result<Arc<dyn Operator>> {
        self.get(name)
            .map(|gate| gate as Arc<dyn Operator>)
            .ok_or_else(|| QuantumError::UnknownGate(name.to_string()))
    }

    /// Addressed instance: the named gate placed at `locs` of a `num_qubits` register
    pub fn put(&self, name: &str, num_qubits: usize, locs: &[usize]) -> Result<Put> {
        Put::new(num_qubits, locs, self.operator(name)?)
    }

    /// Check if a gate is registered
    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    /// Names of all registered gates, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered gates
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Process-wide registry of the built-in gates
pub fn standard() -> &'static GateRegistry {
    static STANDARD: OnceLock<GateRegistry> = OnceLock::new();
    STANDARD.get_or_init(GateRegistry::standard)
}
