//! Error types for key generation, proving and verification

use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use murkl_circuit::{CircuitError, InputError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Groth16Error {
    /// Circuit construction or witness generation failed
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// The request does not satisfy the withdrawal statement
    #[error("witness does not satisfy the circuit: {constraint}")]
    UnsatisfiedInstance { constraint: String },

    /// Key and witness (or proof) were built for different tree depths
    #[error("key is for tree depth {key}, witness has depth {witness}")]
    DepthMismatch { key: usize, witness: usize },

    /// Curve point or proof (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Key file with a bad header
    #[error("invalid key file: {0}")]
    InvalidKeyFile(String),

    /// Proof envelope that does not describe a single-input proof
    #[error("invalid proof envelope: {0}")]
    InvalidEnvelope(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl From<InputError> for Groth16Error {
    fn from(e: InputError) -> Self {
        Self::Circuit(CircuitError::InvalidInput(e))
    }
}

impl From<SynthesisError> for Groth16Error {
    fn from(e: SynthesisError) -> Self {
        match e {
            SynthesisError::Unsatisfiable => Self::UnsatisfiedInstance {
                constraint: "reported by the prover".into(),
            },
            other => Self::Circuit(CircuitError::Synthesis(other)),
        }
    }
}

impl Groth16Error {
    /// Malformed request or key material, as opposed to a failed proof
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::Circuit(e) => matches!(e, CircuitError::InvalidInput(_)),
            Self::DepthMismatch { .. }
            | Self::Serialization(_)
            | Self::InvalidKeyFile(_)
            | Self::InvalidEnvelope(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Hex(_) => true,
            Self::UnsatisfiedInstance { .. } => false,
        }
    }
}

pub type Result<T> = core::result::Result<T, Groth16Error>;
