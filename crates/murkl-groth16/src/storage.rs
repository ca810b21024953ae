//! Atomic persistence for keys and proofs
//!
//! Files are written to a temporary file in the destination directory,
//! flushed and synced, then renamed over the target. A failed write leaves
//! no partial file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Groth16Error, Result};
use crate::keys::{read_header, KeyKind, WithdrawProvingKey, WithdrawVerifyingKey};
use crate::types::WithdrawProof;

/// Write `bytes` to `path` atomically
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Groth16Error::Io(e.error))?;
    Ok(())
}

pub fn save_proving_key(path: &Path, pk: &WithdrawProvingKey) -> Result<()> {
    write_atomic(path, &pk.to_bytes()?)
}

pub fn load_proving_key(path: &Path) -> Result<WithdrawProvingKey> {
    WithdrawProvingKey::from_bytes(&fs::read(path)?)
}

pub fn save_verifying_key(path: &Path, vk: &WithdrawVerifyingKey) -> Result<()> {
    write_atomic(path, &vk.to_bytes()?)
}

pub fn load_verifying_key(path: &Path) -> Result<WithdrawVerifyingKey> {
    WithdrawVerifyingKey::from_bytes(&fs::read(path)?)
}

/// Key kind and depth from a key file's header
pub fn key_file_depth(path: &Path) -> Result<(KeyKind, usize)> {
    let bytes = fs::read(path)?;
    read_header(&bytes)
}

pub fn save_proof(path: &Path, proof: &WithdrawProof) -> Result<()> {
    write_atomic(path, proof.to_json()?.as_bytes())
}

pub fn load_proof(path: &Path) -> Result<WithdrawProof> {
    WithdrawProof::from_json(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // Only the target remains in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bin");
        assert!(matches!(write_atomic(&path, b"data"), Err(Groth16Error::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_key_file_depth_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.key");
        fs::write(&path, b"not a key file").unwrap();
        assert!(matches!(key_file_depth(&path), Err(Groth16Error::InvalidKeyFile(_))));
    }
}
