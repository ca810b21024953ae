//! Error types for the withdrawal circuit
//!
//! Two families matter to callers: [`InputError`] for malformed requests
//! (always detected before any hashing) and [`CircuitError::WitnessMismatch`]
//! for well-formed requests that simply do not satisfy the statement.

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

/// Malformed input, rejected before any hashing happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Tree depth outside the supported range
    #[error("unsupported tree depth {depth} (supported: {min}..={max})")]
    UnsupportedDepth { depth: usize, min: usize, max: usize },

    /// Address bit-string of the wrong length
    #[error("address has {actual} bits, tree depth is {expected}")]
    AddressLengthMismatch { expected: usize, actual: usize },

    /// Address bit-string with a character other than '0' or '1'
    #[error("address bit {position} invalid, unknown: {found:?}")]
    AddressInvalidCharacter { position: usize, found: char },

    /// Integer address that does not fit in the tree
    #[error("address {address} does not fit in a depth-{depth} tree")]
    AddressOutOfRange { address: u64, depth: usize },

    /// Address bit-string too long to pack into an integer
    #[error("address has {bits} bits, at most 64 fit an integer address")]
    AddressTooWide { bits: usize },

    /// Merkle path of the wrong length
    #[error("path has {actual} elements, tree depth is {expected}")]
    PathLengthMismatch { expected: usize, actual: usize },

    /// Empty field element string
    #[error("empty field element")]
    EmptyFieldElement,

    /// Field element string that is neither decimal nor 0x-hex
    #[error("invalid field element {0:?}")]
    InvalidFieldElement(String),

    /// Field element string whose value is not below the field modulus
    #[error("field element {0:?} is not below the field modulus")]
    FieldElementOutOfRange(String),
}

/// Circuit construction and witness generation errors
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Caller supplied malformed input
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Input is well-formed but root/path/secret/address are inconsistent
    #[error("witness does not satisfy the withdrawal statement (first failing constraint: {constraint})")]
    WitnessMismatch { constraint: String },

    /// Miswired circuit; not recoverable by the caller
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// Error raised by the constraint system itself
    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
}

impl CircuitError {
    /// True for the expected rejection paths (bad input or dishonest prover).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::WitnessMismatch { .. })
    }
}

pub type Result<T> = core::result::Result<T, CircuitError>;
