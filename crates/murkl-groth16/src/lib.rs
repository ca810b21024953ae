//! Murkl Groth16 - proving system glue for the withdrawal circuit
//!
//! Compiles [`murkl_circuit::WithdrawCircuit`] into Groth16 keys over BN254,
//! proves assigned witnesses and verifies proofs.
//!
//! # Components
//!
//! - `keys` - Depth-tagged proving/verifying keys and their binary format
//! - `prover` - Key generation and proof generation
//! - `verifier` - Proof verification, including digest binding
//! - `types` - Proofs and the JSON request/proof envelopes
//! - `storage` - Atomic key and proof files

pub mod error;
pub mod keys;
pub mod prover;
pub mod storage;
pub mod types;
pub mod verifier;

// Re-exports for convenience
pub use error::{Groth16Error, Result};
pub use keys::{KeyKind, WithdrawProvingKey, WithdrawVerifyingKey};
pub use prover::{generate_keys, prove, prove_inputs};
pub use types::{ProofEnvelope, ProveRequest, WithdrawProof};
pub use verifier::{verify, verify_bound, Verifier};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Groth16Error;
    pub use crate::keys::{WithdrawProvingKey, WithdrawVerifyingKey};
    pub use crate::prover::{generate_keys, prove, prove_inputs};
    pub use crate::types::{ProveRequest, WithdrawProof};
    pub use crate::verifier::{verify, verify_bound, Verifier};
    pub use murkl_circuit::prelude::*;
}
