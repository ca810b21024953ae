//! MiMC-e7 hash over the BN254 scalar field
//!
//! MiMC is a ZK-friendly cipher: each round is `x <- (x + k + c)^7`, which
//! costs four multiplication constraints. We use it for:
//! - Leaf commitments: H(secret)
//! - Nullifiers: H(address, secret)
//! - The public digest: H(root, nullifier, exthash)
//! - Merkle tree internal nodes, keyed by a per-level IV
//!
//! Multiple inputs are absorbed with the Miyaguchi-Preneel construction,
//! the running key being the IV for the first block.

use ark_bn254::Fr;
use ark_ff::Field;

use crate::params::HashParams;

/// S-box: x^7
#[inline]
pub fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x2 * x
}

/// MiMC block cipher: encrypt `x` under key `k`
pub fn cipher(params: &HashParams, x: Fr, k: Fr) -> Fr {
    let mut state = x;
    for c in params.round_constants() {
        state = sbox(state + k + c);
    }
    state + k
}

/// Hash a sequence of field elements, starting from key `iv`
pub fn hash(params: &HashParams, iv: Fr, inputs: &[Fr]) -> Fr {
    inputs
        .iter()
        .fold(iv, |k, &x| k + x + cipher(params, x, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_field;
    use crate::params::init;
    use ark_ff::AdditiveGroup;

    fn fr(decimal: &str) -> Fr {
        parse_field(decimal).unwrap()
    }

    #[test]
    fn test_ethsnarks_vectors() {
        let params = init();
        assert_eq!(
            params.round_constants()[0],
            fr("20888961410941983456478427210666206549300505294776164667214940546594746570981")
        );
        assert_eq!(
            cipher(params, Fr::from(1u64), Fr::from(1u64)),
            fr("2447343676970420247355835473667983267115132689045447905848734383579598297563")
        );
        assert_eq!(
            hash(params, Fr::ZERO, &[Fr::from(1u64), Fr::from(2u64)]),
            fr("19670617727424383673977505442868227592029708183490812407091408237538568456292")
        );
    }

    #[test]
    fn test_sbox() {
        assert_eq!(sbox(Fr::from(2u64)), Fr::from(128u64));
    }

    #[test]
    fn test_hash_deterministic() {
        let params = init();
        let a = Fr::from(123u64);
        let b = Fr::from(456u64);

        assert_eq!(hash(params, Fr::ZERO, &[a, b]), hash(params, Fr::ZERO, &[a, b]));
    }

    #[test]
    fn test_hash_different_inputs() {
        let params = init();
        let h1 = hash(params, Fr::ZERO, &[Fr::from(1u64), Fr::from(2u64)]);
        let h2 = hash(params, Fr::ZERO, &[Fr::from(2u64), Fr::from(1u64)]);
        let h3 = hash(params, Fr::ZERO, &[Fr::from(1u64), Fr::from(3u64)]);

        assert_ne!(h1, h2); // Order matters
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_iv_separates_outputs() {
        let params = init();
        let input = [Fr::from(7u64), Fr::from(8u64)];

        assert_ne!(
            hash(params, params.level_iv(0), &input),
            hash(params, params.level_iv(1), &input)
        );
    }

    #[test]
    fn test_empty_input_returns_iv() {
        let params = init();
        let iv = Fr::from(99u64);
        assert_eq!(hash(params, iv, &[]), iv);
    }

    #[test]
    fn test_single_block_is_miyaguchi_preneel() {
        let params = init();
        let x = Fr::from(42u64);
        let k = Fr::from(5u64);
        assert_eq!(hash(params, k, &[x]), k + x + cipher(params, x, k));
    }

    #[test]
    fn test_no_trivial_zero() {
        let params = init();
        assert_ne!(hash(params, Fr::ZERO, &[Fr::ZERO]), Fr::ZERO);
    }
}
