//! Key generation and proof generation

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_std::rand::{CryptoRng, RngCore};
use murkl_circuit::{init, CircuitConfig, CircuitError, WithdrawCircuit, WithdrawInputs, Witness};
use tracing::{debug, info};

use crate::error::{Groth16Error, Result};
use crate::keys::{WithdrawProvingKey, WithdrawVerifyingKey};
use crate::types::WithdrawProof;

/// Compile the circuit for `config` and run the Groth16 setup
pub fn generate_keys<R: RngCore + CryptoRng>(
    config: CircuitConfig,
    rng: &mut R,
) -> Result<(WithdrawProvingKey, WithdrawVerifyingKey)> {
    let circuit = WithdrawCircuit::new(init(), config, "genkeys");
    let shape = circuit.shape()?;
    info!(
        depth = shape.depth,
        constraints = shape.constraints,
        variables = shape.private_variables,
        "generating Groth16 keys"
    );

    let pk = Groth16::<Bn254>::generate_random_parameters_with_reduction(circuit, rng)?;
    let pk = WithdrawProvingKey::new(config.tree_depth, pk);
    let vk = pk.verifying_key();
    info!(depth = config.tree_depth, "key generation complete");
    Ok((pk, vk))
}

/// Prove a withdrawal from a satisfying witness
pub fn prove<R: RngCore + CryptoRng>(
    pk: &WithdrawProvingKey,
    witness: Witness,
    rng: &mut R,
) -> Result<WithdrawProof> {
    if pk.depth() != witness.depth() {
        return Err(Groth16Error::DepthMismatch {
            key: pk.depth(),
            witness: witness.depth(),
        });
    }

    let depth = witness.depth();
    let public_digest = witness.public_digest();
    let nullifier = witness.nullifier();
    debug!(depth, constraints = witness.num_constraints(), "proving withdrawal");

    let proof = Groth16::<Bn254>::create_random_proof_with_reduction(witness.into_circuit(), pk.inner(), rng)?;
    info!(depth, "proof generated");

    Ok(WithdrawProof {
        depth,
        public_digest,
        nullifier,
        proof,
    })
}

/// Assign `inputs` against the key's depth, then prove.
///
/// A path or address of the wrong length is invalid input. An inconsistent
/// request is reported as [`Groth16Error::UnsatisfiedInstance`] before the
/// prover runs; no proof is produced for it.
pub fn prove_inputs<R: RngCore + CryptoRng>(
    pk: &WithdrawProvingKey,
    inputs: WithdrawInputs,
    rng: &mut R,
) -> Result<WithdrawProof> {
    let config = CircuitConfig::new(pk.depth())?;
    let circuit = WithdrawCircuit::new(init(), config, "prove");
    let witness = circuit.assign(inputs).map_err(|e| match e {
        CircuitError::WitnessMismatch { constraint } => Groth16Error::UnsatisfiedInstance { constraint },
        other => Groth16Error::Circuit(other),
    })?;

    prove(pk, witness, rng)
}
