//! Command implementations

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use murkl_circuit::codec::{address_bits_from_index, address_bits_from_str, format_field, parse_field, parse_fields};
use murkl_circuit::nullifier::nullifier_for_address;
use murkl_circuit::{init, CircuitConfig, WithdrawInputs};
use murkl_groth16::{prove_inputs, storage, verify, verify_bound, ProveRequest, WithdrawProof};
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use crate::error::CliError;

/// Marker for stdin/stdout in file arguments
pub const STDIO: &str = "-";

pub fn cmd_genkeys<R: RngCore + CryptoRng>(
    pk_out: &Path,
    vk_out: &Path,
    depth: usize,
    rng: &mut R,
) -> Result<(), CliError> {
    println!("🐈‍⬛ Murkl - Generating keys\n");

    let config = CircuitConfig::new(depth)?;
    let (pk, vk) = murkl_groth16::generate_keys(config, rng)?;
    storage::save_proving_key(pk_out, &pk)?;
    storage::save_verifying_key(vk_out, &vk)?;
    info!(depth, pk = %pk_out.display(), vk = %vk_out.display(), "keys written");

    println!("   Tree depth: {}", depth);
    println!("\n✅ Proving key saved to {:?}", pk_out);
    println!("✅ Verifying key saved to {:?}", vk_out);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_prove<R: RngCore + CryptoRng>(
    pk_path: &Path,
    proof_out: &Path,
    root: &str,
    exthash: &str,
    secret: &str,
    address: &str,
    path: &[String],
    rng: &mut R,
) -> Result<(), CliError> {
    println!("🐈‍⬛ Murkl - Generating withdrawal proof\n");

    let pk = storage::load_proving_key(pk_path)?;
    debug!(pk = %pk_path.display(), depth = pk.depth(), "proving key loaded");
    let inputs = WithdrawInputs {
        root: parse_field(root)?,
        exthash: parse_field(exthash)?,
        secret: parse_field(secret)?,
        address_bits: address_bits_from_str(address, pk.depth())?,
        path: parse_fields(path)?,
    };

    let proof = prove_inputs(&pk, inputs, rng)?;
    storage::save_proof(proof_out, &proof)?;
    info!(depth = proof.depth, proof = %proof_out.display(), "proof written");

    println!("   Tree depth: {}", proof.depth);
    println!("   Nullifier: {}", format_field(&proof.nullifier));
    println!("   Public digest: {}", format_field(&proof.public_digest));
    println!("\n✅ Proof saved to {:?}", proof_out);
    Ok(())
}

pub fn cmd_prove_json<R: RngCore + CryptoRng>(
    pk_path: &Path,
    input: &str,
    output: &str,
    rng: &mut R,
) -> Result<(), CliError> {
    let json = if input == STDIO {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    let request = ProveRequest::from_json(&json)?;
    debug!(input, "request parsed");
    let pk = storage::load_proving_key(pk_path)?;
    let proof = prove_inputs(&pk, request.to_inputs()?, rng)?;

    if output == STDIO {
        println!("{}", proof.to_json()?);
    } else {
        storage::save_proof(Path::new(output), &proof)?;
        info!(depth = proof.depth, proof = output, "proof written");
        println!("🐈‍⬛ Murkl - Generating withdrawal proof\n");
        println!("   Nullifier: {}", format_field(&proof.nullifier));
        println!("\n✅ Proof saved to {:?}", output);
    }
    Ok(())
}

/// Context values a proof must be bound to
#[derive(Debug, Default)]
pub struct Binding {
    pub root: Option<String>,
    pub nullifier: Option<String>,
    pub exthash: Option<String>,
}

/// Returns whether the proof is valid
pub fn cmd_verify(vk_path: &Path, proof_path: &Path, binding: &Binding) -> Result<bool, CliError> {
    let bound = match (&binding.root, &binding.nullifier, &binding.exthash) {
        (Some(root), Some(nullifier), Some(exthash)) => {
            Some((parse_field(root)?, parse_field(nullifier)?, parse_field(exthash)?))
        }
        (None, None, None) => None,
        _ => {
            return Err(CliError::Usage(
                "--root, --nullifier and --exthash must be given together".into(),
            ))
        }
    };

    println!("🐈‍⬛ Murkl - Verifying proof\n");

    let vk = storage::load_verifying_key(vk_path)?;
    let proof: WithdrawProof = storage::load_proof(proof_path)?;
    let valid = match bound {
        Some((root, nullifier, exthash)) => verify_bound(&vk, &proof, root, nullifier, exthash)?,
        None => verify(&vk, &proof.public_inputs(), &proof)?,
    };
    if valid {
        info!(proof = %proof_path.display(), bound = bound.is_some(), "proof accepted");
    } else {
        warn!(proof = %proof_path.display(), bound = bound.is_some(), "proof rejected");
    }

    println!("   Nullifier: {}", format_field(&proof.nullifier));
    if valid {
        println!("✅ Proof is VALID!");
    } else {
        println!("❌ Proof is INVALID!");
    }
    Ok(valid)
}

pub fn cmd_nullifier(secret: &str, address: u64, depth: usize) -> Result<(), CliError> {
    let config = CircuitConfig::new(depth)?;
    address_bits_from_index(address, config.tree_depth)?;
    let secret = parse_field(secret)?;

    println!("🐈‍⬛ Murkl - Compute nullifier\n");
    println!("   Address: {}", address);
    println!("   Nullifier: {}", format_field(&nullifier_for_address(init(), secret, address)));
    Ok(())
}

pub fn cmd_depth(key_path: &Path) -> Result<(), CliError> {
    let (kind, depth) = storage::key_file_depth(key_path)?;
    println!("🐈‍⬛ Murkl - Key info\n");
    println!("   Kind: {}", kind);
    println!("   Tree depth: {}", depth);
    Ok(())
}
