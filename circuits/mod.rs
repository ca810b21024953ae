//! Murkl withdrawal circuit
//!
//! Groth16-ready R1CS for anonymous withdrawals from a MiMC commitment tree
//! over BN254, plus the off-circuit helpers that must agree with it
//! bit-for-bit (nullifiers, tree paths, address encoding).
//!
//! Call [`params::init`] once and pass the returned parameters down.

pub mod circuit;
pub mod codec;
pub mod config;
pub mod error;
pub mod gadgets;
pub mod merkle;
pub mod mimc;
pub mod nullifier;
pub mod params;

// Re-exports for convenience
pub use circuit::{CircuitShape, WithdrawCircuit, WithdrawInputs, Witness};
pub use config::{CircuitConfig, MAX_TREE_DEPTH, MIN_TREE_DEPTH, TREE_DEPTH};
pub use error::{CircuitError, InputError};
pub use merkle::{MerklePath, MerkleTree};
pub use params::{init, HashParams};

/// The BN254 scalar field
pub use ark_bn254::Fr;

/// Commonly used items
pub mod prelude {
    pub use crate::circuit::{WithdrawCircuit, WithdrawInputs, Witness};
    pub use crate::codec::{address_bits_from_index, address_bits_from_str, parse_field};
    pub use crate::config::{CircuitConfig, TREE_DEPTH};
    pub use crate::error::{CircuitError, InputError};
    pub use crate::merkle::{MerklePath, MerkleTree};
    pub use crate::nullifier::{leaf_commitment, nullifier_for_address, public_digest};
    pub use crate::params::{init, HashParams};
    pub use ark_bn254::Fr;
}
