//! Circuit configuration

use crate::error::InputError;

/// Default tree depth (supports 2^29 deposits)
pub const TREE_DEPTH: usize = 29;

/// Smallest supported tree depth
pub const MIN_TREE_DEPTH: usize = 1;

/// Largest supported tree depth; addresses are carried as `u64` and the
/// packed address must stay far below the field modulus.
pub const MAX_TREE_DEPTH: usize = 32;

/// Shape parameters of the withdrawal circuit.
///
/// Two circuits built from equal configs are identical, so a proving key
/// generated from one config proves witnesses assigned under the same config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CircuitConfig {
    /// Merkle tree depth D
    pub tree_depth: usize,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self { tree_depth: TREE_DEPTH }
    }
}

impl CircuitConfig {
    /// Create a config for the given depth
    pub fn new(tree_depth: usize) -> Result<Self, InputError> {
        if !(MIN_TREE_DEPTH..=MAX_TREE_DEPTH).contains(&tree_depth) {
            return Err(InputError::UnsupportedDepth {
                depth: tree_depth,
                min: MIN_TREE_DEPTH,
                max: MAX_TREE_DEPTH,
            });
        }
        Ok(Self { tree_depth })
    }

    /// Number of leaves the tree can hold
    pub fn capacity(&self) -> u64 {
        1u64 << self.tree_depth
    }
}
