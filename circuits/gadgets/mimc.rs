//! MiMC hash gadget
//!
//! Per round, with `t = x + k + c`:
//!   t2 = t * t,  t4 = t2 * t2,  t6 = t4 * t2,  x' = t6 * t
//! The cipher output `x_R + k` and the Miyaguchi-Preneel feed-forward
//! `k + x + E_k(x)` are linear, so they cost no constraints.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::SynthesisError;

use crate::params::HashParams;

/// Multiplication constraints per absorbed input
pub const CONSTRAINTS_PER_BLOCK: usize = 4 * crate::params::MIMC_ROUNDS;

/// MiMC-e7 encryption of `x` under key `key`
pub fn cipher(params: &HashParams, x: &FpVar<Fr>, key: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = x.clone();
    for &c in params.round_constants() {
        let t = &state + key + c;
        let t2 = t.square()?;
        let t4 = t2.square()?;
        let t6 = &t4 * &t2;
        state = &t6 * &t;
    }
    Ok(state + key)
}

/// Hash `inputs` starting from key `iv`; mirrors [`crate::mimc::hash`]
pub fn hash(params: &HashParams, iv: &FpVar<Fr>, inputs: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    inputs.iter().try_fold(iv.clone(), |key, x| {
        let encrypted = cipher(params, x, &key)?;
        Ok(key + x + encrypted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::witness;
    use crate::mimc as native;
    use crate::params::init;
    use ark_ff::AdditiveGroup;
    use ark_r1cs_std::eq::EqGadget;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::{ConstraintSystem, SynthesisMode};

    #[test]
    fn test_gadget_matches_native() {
        let params = init();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let inputs = [Fr::from(11u64), Fr::from(22u64), Fr::from(33u64)];

        let iv = witness(&cs, Some(Fr::ZERO)).unwrap();
        let vars: Vec<FpVar<Fr>> = inputs
            .iter()
            .map(|&v| witness(&cs, Some(v)).unwrap())
            .collect();
        let out = hash(params, &iv, &vars).unwrap();

        assert_eq!(out.value().unwrap(), native::hash(params, Fr::ZERO, &inputs));
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints(), 3 * CONSTRAINTS_PER_BLOCK);
    }

    #[test]
    fn test_constant_iv() {
        let params = init();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let iv = FpVar::Constant(params.level_iv(3));
        let left = witness(&cs, Some(Fr::from(1u64))).unwrap();
        let right = witness(&cs, Some(Fr::from(2u64))).unwrap();

        let out = hash(params, &iv, &[left, right]).unwrap();
        assert_eq!(
            out.value().unwrap(),
            native::hash(params, params.level_iv(3), &[Fr::from(1u64), Fr::from(2u64)])
        );
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints(), 2 * CONSTRAINTS_PER_BLOCK);
    }

    #[test]
    fn test_setup_mode_has_no_values() {
        let params = init();
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(SynthesisMode::Setup);

        let iv = witness(&cs, None).unwrap();
        let x = witness(&cs, None).unwrap();
        let out = hash(params, &iv, &[x]).unwrap();

        assert!(out.value().is_err());
        assert_eq!(cs.num_constraints(), CONSTRAINTS_PER_BLOCK);
    }

    #[test]
    fn test_wrong_output_unsatisfied() {
        let params = init();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let x = witness(&cs, Some(Fr::from(5u64))).unwrap();
        let out = hash(params, &FpVar::Constant(Fr::ZERO), &[x]).unwrap();

        let claimed = witness(&cs, Some(Fr::from(6u64))).unwrap();
        out.enforce_equal(&claimed).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
