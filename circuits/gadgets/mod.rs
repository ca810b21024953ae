//! R1CS gadgets for the withdrawal circuit
//!
//! Gadgets work on `ark-r1cs-std` variables, which carry their own values:
//! present when a concrete withdrawal is being assigned, absent while the
//! circuit is compiled into keys (setup mode).

pub mod bits;
pub mod merkle;
pub mod mimc;

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::{AllocatedFp, FpVar};
use ark_relations::r1cs::{ConstraintSystemRef, LinearCombination, SynthesisError};

/// Allocate a private field variable
pub fn witness(cs: &ConstraintSystemRef<Fr>, value: Option<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_witness(cs.clone(), || value.ok_or(SynthesisError::AssignmentMissing))
}

/// Allocate a public field variable
pub fn input(cs: &ConstraintSystemRef<Fr>, value: Option<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_input(cs.clone(), || value.ok_or(SynthesisError::AssignmentMissing))
}

/// Pin `zero` to 0 with `zero * zero = zero - zero`
pub fn enforce_zero(cs: &ConstraintSystemRef<Fr>, zero: &AllocatedFp<Fr>) -> Result<(), SynthesisError> {
    let z = LinearCombination::from(zero.variable);
    cs.enforce_constraint(z.clone(), z.clone(), z.clone() - &z)
}
