//! Address bit decomposition
//!
//! Allocates the D address bits as `Boolean`s, each carrying its
//! `b * (1 - b) = 0` constraint, followed by a packed address variable
//! constrained to equal their little-endian weighted sum.

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::witness;
use crate::codec::bits_to_field;

/// Little-endian address bits and their packed value
#[derive(Clone, Debug)]
pub struct AddressBitsGadget {
    bits: Vec<Boolean<Fr>>,
    packed: FpVar<Fr>,
}

impl AddressBitsGadget {
    /// Allocate `depth` bits and the packed address.
    ///
    /// Emits `depth` boolean constraints and one packing constraint.
    pub fn alloc(
        cs: &ConstraintSystemRef<Fr>,
        depth: usize,
        values: Option<&[bool]>,
    ) -> Result<Self, SynthesisError> {
        let bits = (0..depth)
            .map(|i| {
                Boolean::new_witness(cs.clone(), || {
                    values
                        .and_then(|v| v.get(i).copied())
                        .ok_or(SynthesisError::AssignmentMissing)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let packed = witness(cs, values.map(bits_to_field))?;
        packed.enforce_equal(&Boolean::le_bits_to_fp(&bits)?)?;

        Ok(Self { bits, packed })
    }

    pub fn bits(&self) -> &[Boolean<Fr>] {
        &self.bits
    }

    pub fn packed(&self) -> &FpVar<Fr> {
        &self.packed
    }
}
