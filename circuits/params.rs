//! One-time cryptographic parameter setup
//!
//! MiMC round constants and the per-level Merkle IVs are derived from
//! keccak256 hash chains over fixed labels. They are computed once per process
//! by [`init`], and every entry point calls it before touching field
//! arithmetic, then passes the returned reference down.
//!
//! The round constants use the ethsnarks chain and seed (`"mimc"`), so
//! [`crate::mimc::hash`] equals ethsnarks `mimc_hash` and leaf commitments,
//! nullifiers and the public digest interoperate with its tooling. The level
//! IVs come from a chain of our own rather than the ethsnarks
//! `merkle_tree_IVs` table, so interior tree nodes and roots do not match an
//! ethsnarks-built tree.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use sha3::{Digest, Keccak256};

use crate::config::MAX_TREE_DEPTH;

/// Number of MiMC rounds (exponent 7 over BN254)
pub const MIMC_ROUNDS: usize = 91;

/// Seed label for the MiMC round constant chain
pub const MIMC_SEED: &[u8] = b"mimc";

/// Seed label for the per-level Merkle IV chain
pub const LEVEL_IV_SEED: &[u8] = b"murkl.merkle.level_iv";

static PARAMS: OnceLock<HashParams> = OnceLock::new();

/// Process-wide hash parameters.
#[derive(Debug)]
pub struct HashParams {
    round_constants: Vec<Fr>,
    level_ivs: Vec<Fr>,
}

impl HashParams {
    fn generate() -> Self {
        Self {
            round_constants: keccak_chain(MIMC_SEED, MIMC_ROUNDS),
            level_ivs: keccak_chain(LEVEL_IV_SEED, MAX_TREE_DEPTH),
        }
    }

    /// MiMC round constants, in round order
    pub fn round_constants(&self) -> &[Fr] {
        &self.round_constants
    }

    /// All level IVs, leaf level first
    pub fn level_ivs(&self) -> &[Fr] {
        &self.level_ivs
    }

    /// IV mixed into the hash at tree level `level` (0 = leaf level).
    ///
    /// Panics if `level >= MAX_TREE_DEPTH`; every depth is validated by
    /// `CircuitConfig` before reaching this point.
    pub fn level_iv(&self, level: usize) -> Fr {
        self.level_ivs[level]
    }
}

/// Initialize the hash parameters. Idempotent; the work happens exactly once.
pub fn init() -> &'static HashParams {
    PARAMS.get_or_init(|| {
        tracing::debug!(
            rounds = MIMC_ROUNDS,
            levels = MAX_TREE_DEPTH,
            "initializing MiMC parameters"
        );
        HashParams::generate()
    })
}

/// c_0 = H(H(seed)), c_{i+1} = H(c_i), each read big-endian mod p
fn keccak_chain(seed: &[u8], count: usize) -> Vec<Fr> {
    let mut state = [0u8; 32];
    state.copy_from_slice(&Keccak256::digest(seed));

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let next = Keccak256::digest(state);
        state.copy_from_slice(&next);
        out.push(Fr::from_be_bytes_mod_order(&state));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let a = init();
        let b = init();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_parameter_counts() {
        let params = init();
        assert_eq!(params.round_constants().len(), MIMC_ROUNDS);
        assert_eq!(params.level_ivs().len(), MAX_TREE_DEPTH);
    }

    #[test]
    fn test_level_ivs_distinct() {
        let ivs = init().level_ivs();
        for i in 0..ivs.len() {
            for j in (i + 1)..ivs.len() {
                assert_ne!(ivs[i], ivs[j], "levels {} and {} share an IV", i, j);
            }
        }
    }

    #[test]
    fn test_chains_are_domain_separated() {
        let params = init();
        assert_ne!(params.round_constants()[0], params.level_iv(0));
    }
}
