//! Off-circuit commitment, nullifier and public digest
//!
//! These must match the circuit bit-for-bit: double-spend tracking keys off
//! the exact nullifier value, and the verifying contract recomputes the
//! public digest from the root, nullifier and external hash it sees.
//!
//! Argument order is fixed:
//! - leaf      = H(0, [secret])
//! - nullifier = H(0, [address, secret])
//! - digest    = H(0, [root, nullifier, exthash])

use ark_bn254::Fr;
use ark_ff::AdditiveGroup;

use crate::codec::bits_to_field;
use crate::mimc;
use crate::params::HashParams;

/// IV used for every non-tree hash (the in-circuit zero constant)
pub const IV0: Fr = Fr::ZERO;

/// Leaf commitment for a deposit: H(secret)
pub fn leaf_commitment(params: &HashParams, secret: Fr) -> Fr {
    mimc::hash(params, IV0, &[secret])
}

/// Nullifier from little-endian address bits: H(address, secret)
pub fn nullifier(params: &HashParams, secret: Fr, address_bits: &[bool]) -> Fr {
    mimc::hash(params, IV0, &[bits_to_field(address_bits), secret])
}

/// Nullifier from an integer leaf address: H(address, secret)
pub fn nullifier_for_address(params: &HashParams, secret: Fr, address: u64) -> Fr {
    mimc::hash(params, IV0, &[Fr::from(address), secret])
}

/// Single public input binding root, nullifier and external context
pub fn public_digest(params: &HashParams, root: Fr, nullifier: Fr, exthash: Fr) -> Fr {
    mimc::hash(params, IV0, &[root, nullifier, exthash])
}
