//! Address and field element codec
//!
//! Converts the external encodings of a leaf position and of field elements
//! into the forms the circuit consumes.
//!
//! Address bits are little-endian: bit `i` is `(address >> i) & 1` and
//! selects the argument order at tree level `i` (0 = running hash on the
//! left). The string form lists bit 0 first. Any off-circuit tree that
//! indexes leaves differently produces paths that can never satisfy the
//! circuit, so [`crate::merkle::MerkleTree`] goes through this module too.

use ark_bn254::Fr;
use ark_ff::{AdditiveGroup, PrimeField};
use num_bigint::BigUint;
use num_traits::Num;

use crate::error::InputError;

/// Decode an integer address into `depth` little-endian bits
pub fn address_bits_from_index(address: u64, depth: usize) -> Result<Vec<bool>, InputError> {
    if depth < 64 && address >> depth != 0 {
        return Err(InputError::AddressOutOfRange { address, depth });
    }
    Ok((0..depth).map(|i| i < 64 && (address >> i) & 1 == 1).collect())
}

/// Decode a '0'/'1' string (bit 0 first) of exactly `depth` characters
pub fn address_bits_from_str(bits: &str, depth: usize) -> Result<Vec<bool>, InputError> {
    let actual = bits.chars().count();
    if actual != depth {
        return Err(InputError::AddressLengthMismatch { expected: depth, actual });
    }

    bits.chars()
        .enumerate()
        .map(|(position, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            found => Err(InputError::AddressInvalidCharacter { position, found }),
        })
        .collect()
}

/// Pack little-endian bits back into an integer address; at most 64 bits
pub fn bits_to_address(bits: &[bool]) -> Result<u64, InputError> {
    if bits.len() > u64::BITS as usize {
        return Err(InputError::AddressTooWide { bits: bits.len() });
    }
    Ok(bits
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &bit)| if bit { acc | (1 << i) } else { acc }))
}

/// Pack little-endian bits into a field element, `sum(2^i * bit_i)`.
///
/// Same value as the circuit's packed address for any number of bits.
pub fn bits_to_field(bits: &[bool]) -> Fr {
    bits.iter()
        .rev()
        .fold(Fr::ZERO, |acc, &bit| acc.double() + Fr::from(bit))
}

/// Encode bits as a '0'/'1' string, bit 0 first
pub fn bits_to_string(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parse a decimal or `0x`-prefixed hex field element.
///
/// Values at or above the field modulus are rejected rather than reduced.
pub fn parse_field(input: &str) -> Result<Fr, InputError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(InputError::EmptyFieldElement);
    }

    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(InputError::InvalidFieldElement(input.to_string()));
    }

    let value = BigUint::from_str_radix(digits, radix)
        .map_err(|_| InputError::InvalidFieldElement(input.to_string()))?;
    if value >= BigUint::from(Fr::MODULUS) {
        return Err(InputError::FieldElementOutOfRange(input.to_string()));
    }
    Ok(Fr::from(value))
}

/// Parse a list of field elements
pub fn parse_fields<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Fr>, InputError> {
    inputs.iter().map(|s| parse_field(s.as_ref())).collect()
}

/// Canonical decimal encoding
pub fn format_field(value: &Fr) -> String {
    BigUint::from(value.into_bigint()).to_str_radix(10)
}

/// `0x`-prefixed lowercase hex encoding
pub fn format_field_hex(value: &Fr) -> String {
    format!("0x{}", BigUint::from(value.into_bigint()).to_str_radix(16))
}
