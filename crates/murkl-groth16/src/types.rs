//! Proofs and JSON envelopes
//!
//! Field elements travel as strings: decimal or `0x` hex on input,
//! canonical decimal on output. Proof bytes are `0x`-prefixed hex of the
//! arkworks compressed encoding.

use ark_bn254::{Bn254, Fr};
use ark_groth16::Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use murkl_circuit::codec::{format_field, parse_field, parse_fields};
use murkl_circuit::{InputError, WithdrawInputs};
use serde::{Deserialize, Serialize};

use crate::error::{Groth16Error, Result};

/// A Groth16 withdrawal proof with the values it commits to
#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawProof {
    pub depth: usize,
    /// The single public input
    pub public_digest: Fr,
    /// Published so the verifier can record it as spent
    pub nullifier: Fr,
    pub proof: Proof<Bn254>,
}

impl WithdrawProof {
    /// Public inputs in verifier order
    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![self.public_digest]
    }

    /// Compressed proof bytes
    pub fn proof_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.proof.compressed_size());
        self.proof.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn to_envelope(&self) -> Result<ProofEnvelope> {
        Ok(ProofEnvelope {
            depth: self.depth,
            input: vec![format_field(&self.public_digest)],
            nullifier: format_field(&self.nullifier),
            proof: format!("0x{}", hex::encode(self.proof_bytes()?)),
        })
    }

    pub fn from_envelope(envelope: &ProofEnvelope) -> Result<Self> {
        let public_digest = match envelope.input.as_slice() {
            [digest] => parse_field(digest)?,
            other => {
                return Err(Groth16Error::InvalidEnvelope(format!(
                    "expected exactly one public input, found {}",
                    other.len()
                )))
            }
        };
        let nullifier = parse_field(&envelope.nullifier)?;

        let hex_str = envelope.proof.strip_prefix("0x").unwrap_or(&envelope.proof);
        let bytes = hex::decode(hex_str)?;
        let proof = Proof::deserialize_compressed(bytes.as_slice())?;

        Ok(Self {
            depth: envelope.depth,
            public_digest,
            nullifier,
            proof,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_envelope()?)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: ProofEnvelope = serde_json::from_str(json)?;
        Self::from_envelope(&envelope)
    }
}

/// Serialized proof: `{ "depth", "input": [digest], "nullifier", "proof" }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProofEnvelope {
    pub depth: usize,
    pub input: Vec<String>,
    pub nullifier: String,
    pub proof: String,
}

/// A proving request as accepted by `prove_json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProveRequest {
    pub root: String,
    pub exthash: String,
    pub secret: String,
    /// Leaf index
    pub address: u64,
    /// Siblings, leaf level first
    pub path: Vec<String>,
}

impl ProveRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode into circuit inputs; depth is the path length
    pub fn to_inputs(&self) -> core::result::Result<WithdrawInputs, InputError> {
        WithdrawInputs::from_address(
            parse_field(&self.root)?,
            parse_field(&self.exthash)?,
            parse_field(&self.secret)?,
            self.address,
            parse_fields(self.path.as_slice())?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses() {
        let json = r#"{
            "root": "0x10",
            "exthash": "3",
            "secret": "97",
            "address": 5,
            "path": ["1", "2", "0x3", "4"]
        }"#;
        let request = ProveRequest::from_json(json).unwrap();
        let inputs = request.to_inputs().unwrap();

        assert_eq!(inputs.root, Fr::from(16u64));
        assert_eq!(inputs.secret, Fr::from(97u64));
        assert_eq!(inputs.address_bits, vec![true, false, true, false]);
        assert_eq!(inputs.path[2], Fr::from(3u64));
    }

    #[test]
    fn test_request_rejects_unknown_fields() {
        let json = r#"{"root":"1","exthash":"2","secret":"3","address":0,"path":["4"],"extra":1}"#;
        assert!(matches!(ProveRequest::from_json(json), Err(Groth16Error::Json(_))));
    }

    #[test]
    fn test_request_rejects_missing_fields() {
        let json = r#"{"root":"1","exthash":"2","address":0,"path":["4"]}"#;
        assert!(matches!(ProveRequest::from_json(json), Err(Groth16Error::Json(_))));
    }

    #[test]
    fn test_request_address_out_of_range() {
        let request = ProveRequest {
            root: "1".into(),
            exthash: "2".into(),
            secret: "3".into(),
            address: 4,
            path: vec!["0".into(), "0".into()],
        };
        assert_eq!(
            request.to_inputs(),
            Err(InputError::AddressOutOfRange { address: 4, depth: 2 })
        );
    }

    #[test]
    fn test_request_bad_field() {
        let request = ProveRequest {
            root: "12abc".into(),
            exthash: "2".into(),
            secret: "3".into(),
            address: 0,
            path: vec!["0".into()],
        };
        assert!(matches!(request.to_inputs(), Err(InputError::InvalidFieldElement(_))));
    }

    #[test]
    fn test_envelope_needs_single_input() {
        let envelope = ProofEnvelope {
            depth: 3,
            input: vec!["1".into(), "2".into()],
            nullifier: "3".into(),
            proof: "0x".into(),
        };
        assert!(matches!(
            WithdrawProof::from_envelope(&envelope),
            Err(Groth16Error::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_envelope_bad_hex() {
        let envelope = ProofEnvelope {
            depth: 3,
            input: vec!["1".into()],
            nullifier: "3".into(),
            proof: "0xzz".into(),
        };
        assert!(matches!(WithdrawProof::from_envelope(&envelope), Err(Groth16Error::Hex(_))));
    }
}
