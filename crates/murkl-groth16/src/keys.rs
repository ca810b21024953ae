//! Depth-tagged Groth16 keys
//!
//! Binary layout:
//! - 4-byte magic (`MKPK` proving, `MKVK` verifying)
//! - tree depth as `u32` little-endian
//! - arkworks compressed canonical serialization of the key

use std::io::{Read, Write};

use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use murkl_circuit::CircuitConfig;

use crate::error::{Groth16Error, Result};

pub const PROVING_KEY_MAGIC: [u8; 4] = *b"MKPK";
pub const VERIFYING_KEY_MAGIC: [u8; 4] = *b"MKVK";

/// Header length in bytes
pub const HEADER_LEN: usize = 8;

/// Which key a file holds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    Proving,
    Verifying,
}

impl KeyKind {
    fn magic(self) -> [u8; 4] {
        match self {
            Self::Proving => PROVING_KEY_MAGIC,
            Self::Verifying => VERIFYING_KEY_MAGIC,
        }
    }

    fn from_magic(magic: &[u8]) -> Option<Self> {
        if magic == PROVING_KEY_MAGIC {
            Some(Self::Proving)
        } else if magic == VERIFYING_KEY_MAGIC {
            Some(Self::Verifying)
        } else {
            None
        }
    }
}

impl core::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Proving => write!(f, "proving key"),
            Self::Verifying => write!(f, "verifying key"),
        }
    }
}

fn write_header<W: Write>(writer: &mut W, kind: KeyKind, depth: usize) -> Result<()> {
    let depth = u32::try_from(depth)
        .map_err(|_| Groth16Error::InvalidKeyFile(format!("depth {} does not fit in u32", depth)))?;
    writer.write_all(&kind.magic())?;
    writer.write_all(&depth.to_le_bytes())?;
    Ok(())
}

/// Parse a key header without touching the key body
pub fn read_header(bytes: &[u8]) -> Result<(KeyKind, usize)> {
    if bytes.len() < HEADER_LEN {
        return Err(Groth16Error::InvalidKeyFile(format!(
            "{} bytes is shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    let kind = KeyKind::from_magic(&bytes[..4])
        .ok_or_else(|| Groth16Error::InvalidKeyFile("unknown magic".into()))?;
    let mut depth = [0u8; 4];
    depth.copy_from_slice(&bytes[4..HEADER_LEN]);
    let depth = u32::from_le_bytes(depth) as usize;

    CircuitConfig::new(depth).map_err(|e| Groth16Error::InvalidKeyFile(e.to_string()))?;
    Ok((kind, depth))
}

fn expect_header<R: Read>(reader: &mut R, kind: KeyKind) -> Result<usize> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;
    let (found, depth) = read_header(&header)?;
    if found != kind {
        return Err(Groth16Error::InvalidKeyFile(format!("expected a {}, found a {}", kind, found)));
    }
    Ok(depth)
}

// ============================================================================
// Proving key
// ============================================================================

/// Groth16 proving key for one tree depth
#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawProvingKey {
    depth: usize,
    key: ProvingKey<Bn254>,
}

impl WithdrawProvingKey {
    pub fn new(depth: usize, key: ProvingKey<Bn254>) -> Self {
        Self { depth, key }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn inner(&self) -> &ProvingKey<Bn254> {
        &self.key
    }

    /// The matching verifying key
    pub fn verifying_key(&self) -> WithdrawVerifyingKey {
        WithdrawVerifyingKey::new(self.depth, self.key.vk.clone())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        write_header(&mut writer, KeyKind::Proving, self.depth)?;
        self.key.serialize_compressed(&mut writer)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let depth = expect_header(&mut reader, KeyKind::Proving)?;
        let key = ProvingKey::deserialize_compressed(&mut reader)?;
        Ok(Self { depth, key })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.key.compressed_size());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }
}

// ============================================================================
// Verifying key
// ============================================================================

/// Groth16 verifying key for one tree depth
#[derive(Clone, Debug, PartialEq)]
pub struct WithdrawVerifyingKey {
    depth: usize,
    key: VerifyingKey<Bn254>,
}

impl WithdrawVerifyingKey {
    pub fn new(depth: usize, key: VerifyingKey<Bn254>) -> Self {
        Self { depth, key }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn inner(&self) -> &VerifyingKey<Bn254> {
        &self.key
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        write_header(&mut writer, KeyKind::Verifying, self.depth)?;
        self.key.serialize_compressed(&mut writer)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let depth = expect_header(&mut reader, KeyKind::Verifying)?;
        let key = VerifyingKey::deserialize_compressed(&mut reader)?;
        Ok(Self { depth, key })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.key.compressed_size());
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, KeyKind::Verifying, 29).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(&bytes[..4], b"MKVK");
        assert_eq!(read_header(&bytes).unwrap(), (KeyKind::Verifying, 29));
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let bytes = [b'X', b'X', b'X', b'X', 4, 0, 0, 0];
        assert!(matches!(read_header(&bytes), Err(Groth16Error::InvalidKeyFile(_))));
    }

    #[test]
    fn test_header_rejects_bad_depth() {
        let mut bytes = PROVING_KEY_MAGIC.to_vec();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(read_header(&bytes), Err(Groth16Error::InvalidKeyFile(_))));

        let mut bytes = PROVING_KEY_MAGIC.to_vec();
        bytes.extend_from_slice(&33u32.to_le_bytes());
        assert!(matches!(read_header(&bytes), Err(Groth16Error::InvalidKeyFile(_))));
    }

    #[test]
    fn test_header_rejects_truncated() {
        assert!(matches!(read_header(b"MKPK"), Err(Groth16Error::InvalidKeyFile(_))));
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, KeyKind::Proving, 3).unwrap();
        let mut reader = bytes.as_slice();
        assert!(matches!(
            expect_header(&mut reader, KeyKind::Verifying),
            Err(Groth16Error::InvalidKeyFile(_))
        ));
    }
}
