//! Proof verification

use ark_bn254::{Bn254, Fr};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey};
use murkl_circuit::init;
use murkl_circuit::nullifier::public_digest;
use tracing::debug;

use crate::error::{Groth16Error, Result};
use crate::keys::WithdrawVerifyingKey;
use crate::types::WithdrawProof;

/// Verifier with a prepared key, for checking many proofs of one depth
pub struct Verifier {
    depth: usize,
    pvk: PreparedVerifyingKey<Bn254>,
}

impl Verifier {
    pub fn new(vk: &WithdrawVerifyingKey) -> Self {
        Self {
            depth: vk.depth(),
            pvk: prepare_verifying_key(vk.inner()),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check `proof` against explicit public inputs
    pub fn verify(&self, public_inputs: &[Fr], proof: &WithdrawProof) -> Result<bool> {
        if proof.depth != self.depth {
            return Err(Groth16Error::DepthMismatch {
                key: self.depth,
                witness: proof.depth,
            });
        }
        let valid = Groth16::<Bn254>::verify_proof(&self.pvk, &proof.proof, public_inputs)?;
        debug!(depth = self.depth, valid, "proof checked");
        Ok(valid)
    }

    /// Recompute the public digest from root, nullifier and external hash
    /// and check both the binding and the proof
    pub fn verify_bound(&self, proof: &WithdrawProof, root: Fr, nullifier: Fr, exthash: Fr) -> Result<bool> {
        let digest = public_digest(init(), root, nullifier, exthash);
        if digest != proof.public_digest || nullifier != proof.nullifier {
            debug!("proof is not bound to the given root, nullifier and external hash");
            return Ok(false);
        }
        self.verify(&[digest], proof)
    }
}

/// Check `proof` against explicit public inputs
pub fn verify(vk: &WithdrawVerifyingKey, public_inputs: &[Fr], proof: &WithdrawProof) -> Result<bool> {
    Verifier::new(vk).verify(public_inputs, proof)
}

/// Check `proof` against the digest of `(root, nullifier, exthash)`
pub fn verify_bound(
    vk: &WithdrawVerifyingKey,
    proof: &WithdrawProof,
    root: Fr,
    nullifier: Fr,
    exthash: Fr,
) -> Result<bool> {
    Verifier::new(vk).verify_bound(proof, root, nullifier, exthash)
}
