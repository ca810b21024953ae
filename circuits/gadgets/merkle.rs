//! In-circuit Merkle authentication
//!
//! One level combines the running value `c` with the sibling `s` under the
//! level's constant IV. The address bit `b` picks the argument order:
//!
//!   b * (s - c) = left - c
//!   right = c + s - left
//!
//! so `b = 0` gives `(c, s)` and `b = 1` gives `(s, c)`.

use ark_bn254::Fr;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::select::CondSelectGadget;
use ark_relations::r1cs::SynthesisError;

use super::mimc;
use crate::params::HashParams;

/// Constraints emitted per tree level
pub const CONSTRAINTS_PER_LEVEL: usize = 1 + 2 * mimc::CONSTRAINTS_PER_BLOCK;

/// Order `(current, sibling)` by `bit`
pub fn select(
    current: &FpVar<Fr>,
    sibling: &FpVar<Fr>,
    bit: &Boolean<Fr>,
) -> Result<(FpVar<Fr>, FpVar<Fr>), SynthesisError> {
    let left = FpVar::conditionally_select(bit, sibling, current)?;
    let right = current + sibling - &left;
    Ok((left, right))
}

/// Hash one tree level, returning the parent
pub fn level(
    params: &HashParams,
    level: usize,
    current: &FpVar<Fr>,
    sibling: &FpVar<Fr>,
    bit: &Boolean<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let (left, right) = select(current, sibling, bit)?;
    mimc::hash(params, &FpVar::Constant(params.level_iv(level)), &[left, right])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gadgets::witness;
    use crate::merkle::{combine, MerkleTree};
    use crate::params::init;
    use ark_r1cs_std::alloc::AllocVar;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};

    fn bit(cs: &ConstraintSystemRef<Fr>, value: bool) -> Boolean<Fr> {
        Boolean::new_witness(cs.clone(), || Ok(value)).unwrap()
    }

    #[test]
    fn test_select_order() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let c = witness(&cs, Some(Fr::from(3u64))).unwrap();
        let s = witness(&cs, Some(Fr::from(8u64))).unwrap();

        let (l, r) = select(&c, &s, &bit(&cs, false)).unwrap();
        assert_eq!((l.value().unwrap(), r.value().unwrap()), (Fr::from(3u64), Fr::from(8u64)));

        let (l, r) = select(&c, &s, &bit(&cs, true)).unwrap();
        assert_eq!((l.value().unwrap(), r.value().unwrap()), (Fr::from(8u64), Fr::from(3u64)));

        // 2 boolean + 1 selector per call
        assert_eq!(cs.num_constraints(), 4);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_levels_match_tree() {
        let params = init();
        let mut tree = MerkleTree::new(params, 3).unwrap();
        for i in 0..6u64 {
            tree.insert(Fr::from(100 + i)).unwrap();
        }
        let address = 5u64;
        let path = tree.path(address).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let mut current = witness(&cs, Some(tree.leaf(address))).unwrap();
        let bits: Vec<_> = path.address_bits.iter().map(|&b| bit(&cs, b)).collect();
        let before = cs.num_constraints();
        for (i, (&sibling, b)) in path.siblings.iter().zip(&bits).enumerate() {
            let sibling = witness(&cs, Some(sibling)).unwrap();
            current = level(params, i, &current, &sibling, b).unwrap();
        }

        assert_eq!(current.value().unwrap(), tree.root());
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(cs.num_constraints() - before, 3 * CONSTRAINTS_PER_LEVEL);
    }

    #[test]
    fn test_level_uses_level_iv() {
        let params = init();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let (a, b) = (Fr::from(1u64), Fr::from(2u64));
        let current = witness(&cs, Some(a)).unwrap();
        let sibling = witness(&cs, Some(b)).unwrap();

        let parent = level(params, 2, &current, &sibling, &bit(&cs, false)).unwrap();
        assert_eq!(parent.value().unwrap(), combine(params, 2, a, b));
        assert_ne!(parent.value().unwrap(), combine(params, 0, a, b));
    }
}
