//! Merkle tree implementation for Murkl
//!
//! An append-only tree of leaf commitments, maintained off-circuit by the
//! pool indexer. Every internal node at level `i` is `H(IV_i, [left, right])`
//! so that a node value cannot be replayed at a different height.
//! The withdrawal circuit proves membership without revealing which leaf.

use ark_bn254::Fr;
use ark_ff::AdditiveGroup;
use itertools::Itertools;

use crate::codec::{address_bits_from_index, bits_to_address};
use crate::config::CircuitConfig;
use crate::error::InputError;
use crate::mimc;
use crate::params::HashParams;

/// Hash two children at tree level `level` (0 = leaf level)
#[inline]
pub fn combine(params: &HashParams, level: usize, left: Fr, right: Fr) -> Fr {
    mimc::hash(params, params.level_iv(level), &[left, right])
}

/// Default (empty) leaf value
pub fn empty_leaf() -> Fr {
    Fr::ZERO
}

/// Precomputed empty subtree roots for each height
/// empty_roots[i] = root of an empty subtree of height i
pub fn empty_subtree_roots(params: &HashParams, depth: usize) -> Vec<Fr> {
    let mut roots = Vec::with_capacity(depth + 1);
    roots.push(empty_leaf());
    for level in 0..depth {
        let below = roots[level];
        roots.push(combine(params, level, below, below));
    }
    roots
}

/// A Merkle path (sibling hashes from leaf to root)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    /// Sibling hashes at each level
    pub siblings: Vec<Fr>,
    /// Position bits, little-endian (false = running hash on the left)
    pub address_bits: Vec<bool>,
}

impl MerklePath {
    /// Compute the root from a leaf using this path
    pub fn compute_root(&self, params: &HashParams, leaf: Fr) -> Fr {
        self.siblings
            .iter()
            .zip_eq(&self.address_bits)
            .enumerate()
            .fold(leaf, |current, (level, (&sibling, &is_right))| {
                if is_right {
                    combine(params, level, sibling, current)
                } else {
                    combine(params, level, current, sibling)
                }
            })
    }

    /// Verify this path leads to the given root
    pub fn verify(&self, params: &HashParams, leaf: Fr, root: Fr) -> bool {
        self.compute_root(params, leaf) == root
    }

    /// Get the leaf address from the path bits
    pub fn address(&self) -> Result<u64, InputError> {
        bits_to_address(&self.address_bits)
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// In-memory Merkle tree for building/updating
/// Only leaves are stored; empty subtrees come from the cached roots.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    params: &'static HashParams,
    depth: usize,
    leaves: Vec<Fr>,
    empty_roots: Vec<Fr>,
}

impl MerkleTree {
    /// Create a new empty tree of the given depth.
    ///
    /// Depths outside the range [`CircuitConfig`] accepts have no level IVs.
    pub fn new(params: &'static HashParams, depth: usize) -> Result<Self, InputError> {
        let depth = CircuitConfig::new(depth)?.tree_depth;
        Ok(Self {
            params,
            depth,
            leaves: Vec::new(),
            empty_roots: empty_subtree_roots(params, depth),
        })
    }

    /// Tree depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaves inserted
    pub fn leaf_count(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// Insert a leaf at the next available position
    pub fn insert(&mut self, leaf: Fr) -> Result<u64, InputError> {
        let address = self.leaf_count();
        if self.depth < 64 && address >> self.depth != 0 {
            return Err(InputError::AddressOutOfRange { address, depth: self.depth });
        }
        self.leaves.push(leaf);
        Ok(address)
    }

    /// Get the leaf at a given address
    pub fn leaf(&self, address: u64) -> Fr {
        usize::try_from(address)
            .ok()
            .and_then(|i| self.leaves.get(i).copied())
            .unwrap_or_else(empty_leaf)
    }

    /// Find the first address holding `leaf`
    pub fn position(&self, leaf: &Fr) -> Option<u64> {
        self.leaves.iter().position(|l| l == leaf).map(|i| i as u64)
    }

    /// Compute the current root
    pub fn root(&self) -> Fr {
        self.subtree_root(0, self.depth)
    }

    /// Root of the subtree of the given height starting at `start`
    fn subtree_root(&self, start: u64, height: usize) -> Fr {
        if start >= self.leaf_count() {
            return self.empty_roots[height];
        }
        if height == 0 {
            return self.leaf(start);
        }

        let half = 1u64 << (height - 1);
        let left = self.subtree_root(start, height - 1);
        let right = self.subtree_root(start + half, height - 1);
        combine(self.params, height - 1, left, right)
    }

    /// Generate a Merkle path for the given leaf address
    pub fn path(&self, address: u64) -> Result<MerklePath, InputError> {
        let address_bits = address_bits_from_index(address, self.depth)?;
        let siblings = (0..self.depth)
            .map(|level| {
                let sibling_start = ((address >> level) ^ 1) << level;
                self.subtree_root(sibling_start, level)
            })
            .collect();

        Ok(MerklePath { siblings, address_bits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_TREE_DEPTH, MIN_TREE_DEPTH};
    use crate::params::init;

    #[test]
    fn test_empty_tree() {
        let params = init();
        let tree = MerkleTree::new(params, 8).unwrap();
        assert_eq!(tree.root(), empty_subtree_roots(params, 8)[8]);
    }

    #[test]
    fn test_single_leaf() {
        let mut tree = MerkleTree::new(init(), 4).unwrap();
        let address = tree.insert(Fr::from(12345u64)).unwrap();

        assert_eq!(address, 0);
        assert_eq!(tree.leaf(0), Fr::from(12345u64));
        assert_eq!(tree.leaf(1), empty_leaf());
    }

    #[test]
    fn test_merkle_path_verification() {
        let params = init();
        let mut tree = MerkleTree::new(params, 5).unwrap();
        for i in 0..10u64 {
            tree.insert(Fr::from(i * 1000 + 123)).unwrap();
        }
        let root = tree.root();

        for address in 0..10u64 {
            let path = tree.path(address).unwrap();
            assert!(
                path.verify(params, tree.leaf(address), root),
                "Path verification failed for leaf {}",
                address
            );
            assert_eq!(path.address(), Ok(address));
        }
    }

    #[test]
    fn test_two_leaf_root() {
        let params = init();
        let mut tree = MerkleTree::new(params, 1).unwrap();
        let l0 = Fr::from(1u64);
        let l1 = Fr::from(2u64);
        tree.insert(l0).unwrap();
        tree.insert(l1).unwrap();

        assert_eq!(tree.root(), combine(params, 0, l0, l1));
        assert_eq!(tree.path(0).unwrap().siblings, vec![l1]);
        assert_eq!(tree.path(1).unwrap().siblings, vec![l0]);
    }

    #[test]
    fn test_full_tree_rejects_insert() {
        let mut tree = MerkleTree::new(init(), 1).unwrap();
        tree.insert(Fr::from(1u64)).unwrap();
        tree.insert(Fr::from(2u64)).unwrap();
        assert!(matches!(
            tree.insert(Fr::from(3u64)),
            Err(InputError::AddressOutOfRange { address: 2, depth: 1 })
        ));
    }

    #[test]
    fn test_wrong_leaf_fails() {
        let params = init();
        let mut tree = MerkleTree::new(params, 4).unwrap();
        tree.insert(Fr::from(5u64)).unwrap();
        let path = tree.path(0).unwrap();

        assert!(!path.verify(params, Fr::from(6u64), tree.root()));
    }

    #[test]
    fn test_unsupported_depth_rejected() {
        let params = init();
        for depth in [0, MAX_TREE_DEPTH + 1, 64] {
            assert_eq!(
                MerkleTree::new(params, depth).err(),
                Some(InputError::UnsupportedDepth {
                    depth,
                    min: MIN_TREE_DEPTH,
                    max: MAX_TREE_DEPTH
                })
            );
        }
        assert_eq!(MerkleTree::new(params, MAX_TREE_DEPTH).unwrap().depth(), MAX_TREE_DEPTH);
    }

    #[test]
    fn test_level_separation() {
        let params = init();
        // Same children, different levels, different parents
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_ne!(combine(params, 0, a, b), combine(params, 1, a, b));
    }

    #[test]
    fn test_different_roots_for_different_trees() {
        let params = init();
        let mut tree1 = MerkleTree::new(params, 4).unwrap();
        let mut tree2 = MerkleTree::new(params, 4).unwrap();
        tree1.insert(Fr::from(100u64)).unwrap();
        tree2.insert(Fr::from(200u64)).unwrap();

        assert_ne!(tree1.root(), tree2.root());
    }
}
