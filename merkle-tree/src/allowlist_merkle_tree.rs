use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

use gpro_allowlist_merkle_verify::{hash_leaf, verify};
use indexmap::IndexMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    audit::{AuditEvent, AuditLog, NoopAudit},
    claim_entry::ClaimEntry,
    error::{MerkleTreeError, MerkleTreeError::MerkleValidationError, Result},
    merkle_tree::MerkleTree,
    tree_node::TreeNode,
    types::{Address, Bytes32},
    utils::{get_proof, to_raw_proof},
};

/// Proofs carry at most 32 siblings, so a tree holds at most 2^32 - 1 leaves.
pub const MAX_NUM_NODES: u64 = (1 << 32) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Order leaves by byte value before building. Turning this off builds
    /// over the input order, as the first published roots were.
    pub sort_leaves: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { sort_leaves: true }
    }
}

fn default_sorted_leaves() -> bool {
    true
}

/// Merkle Tree committing to one allow-list version (usually one epoch).
/// Contains everything needed to hand each claimant their proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListMerkleTree {
    /// The merkle root, which is submitted to the minting contract
    pub merkle_root: Bytes32,
    pub max_num_nodes: u64,
    #[serde(default = "default_sorted_leaves")]
    pub sorted_leaves: bool,
    pub tree_nodes: Vec<TreeNode>,
}

impl AllowListMerkleTree {
    pub fn new(tree_nodes: Vec<TreeNode>) -> Result<Self> {
        Self::new_with_options(tree_nodes, BuildOptions::default(), &mut NoopAudit)
    }

    pub fn new_with_options(
        mut tree_nodes: Vec<TreeNode>,
        options: BuildOptions,
        audit: &mut dyn AuditLog,
    ) -> Result<Self> {
        if tree_nodes.len() as u64 > MAX_NUM_NODES {
            return Err(MerkleValidationError(format!(
                "{} claims exceed the maximum of {MAX_NUM_NODES}",
                tree_nodes.len()
            )));
        }

        let mut seen = HashSet::with_capacity(tree_nodes.len());
        let mut hashed_nodes = Vec::with_capacity(tree_nodes.len());
        for (index, node) in tree_nodes.iter().enumerate() {
            let encoded = node.encode();
            let leaf = hash_leaf(&encoded);
            audit.record(AuditEvent::LeafEncoded {
                index,
                encoded: &encoded,
                leaf: &leaf,
            });
            if !seen.insert(leaf) {
                warn!(
                    "duplicate claim for {} (epoch {}, pool {}, count {}) at index {index}",
                    node.address, node.epoch, node.pool, node.count
                );
            }
            hashed_nodes.push(leaf);
        }

        let tree = MerkleTree::new_with_audit(&hashed_nodes, options.sort_leaves, audit)?;

        for (i, tree_node) in tree_nodes.iter_mut().enumerate() {
            tree_node.proof = Some(get_proof(&tree, i)?);
        }

        let tree = AllowListMerkleTree {
            merkle_root: Bytes32(tree.get_root()),
            max_num_nodes: tree_nodes.len() as u64,
            sorted_leaves: options.sort_leaves,
            tree_nodes,
        };

        info!(
            "created allow-list merkle tree with {} claims from {} wallets, root {}",
            tree.max_num_nodes,
            tree.group_by_address().len(),
            tree.merkle_root
        );

        tree.validate()?;

        Ok(tree)
    }

    pub fn new_from_entries(entries: Vec<ClaimEntry>) -> Result<Self> {
        Self::new_from_entries_with_options(entries, BuildOptions::default(), &mut NoopAudit)
    }

    pub fn new_from_entries_with_options(
        entries: Vec<ClaimEntry>,
        options: BuildOptions,
        audit: &mut dyn AuditLog,
    ) -> Result<Self> {
        let tree_nodes = entries
            .into_iter()
            .map(TreeNode::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new_with_options(tree_nodes, options, audit)
    }

    /// Load a merkle tree from a csv path
    pub fn new_from_csv(path: &Path) -> Result<Self> {
        Self::new_from_entries(ClaimEntry::from_csv_file(path)?)
    }

    /// Load a merkle tree from a json path
    pub fn new_from_json(path: &Path) -> Result<Self> {
        Self::new_from_entries(ClaimEntry::from_json_file(path)?)
    }

    /// Load a serialized merkle tree from file path
    pub fn new_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let tree: AllowListMerkleTree = serde_json::from_reader(reader)?;
        tree.validate()?;

        Ok(tree)
    }

    /// Write a merkle tree to a filepath
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self)?;
        let mut file = File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    pub fn root_hex(&self) -> String {
        self.merkle_root.to_string()
    }

    pub fn get_node(&self, index: usize) -> Result<&TreeNode> {
        self.tree_nodes
            .get(index)
            .ok_or(MerkleTreeError::IndexOutOfRangeError {
                index,
                len: self.tree_nodes.len(),
            })
    }

    /// Every claim of one wallet with its index. A wallet may hold several.
    pub fn get_nodes_for_address(&self, address: &Address) -> Vec<(usize, &TreeNode)> {
        self.tree_nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.address == *address)
            .collect()
    }

    pub fn get_proof(&self, index: usize) -> Result<Vec<Bytes32>> {
        self.get_node(index)?
            .proof
            .clone()
            .ok_or_else(|| MerkleValidationError(format!("claim {index} has no proof")))
    }

    /// Claim indices per wallet, wallets in order of first appearance.
    pub fn group_by_address(&self) -> IndexMap<Address, Vec<usize>> {
        let mut groups: IndexMap<Address, Vec<usize>> = IndexMap::new();
        for (index, node) in self.tree_nodes.iter().enumerate() {
            groups.entry(node.address).or_default().push(index);
        }
        groups
    }

    /// Rebuild the full tree from the nodes, e.g. to print it.
    pub fn build_merkle_tree(&self) -> Result<MerkleTree> {
        let hashed_nodes: Vec<[u8; 32]> = self.tree_nodes.iter().map(|n| n.hash().0).collect();
        MerkleTree::new(&hashed_nodes, self.sorted_leaves)
    }

    fn validate(&self) -> Result<()> {
        if self.max_num_nodes > MAX_NUM_NODES {
            return Err(MerkleValidationError(format!(
                "Max num nodes {} is greater than 2^32 - 1",
                self.max_num_nodes
            )));
        }

        if self.tree_nodes.len() as u64 != self.max_num_nodes {
            return Err(MerkleValidationError(format!(
                "Tree nodes length {} does not match max_num_nodes {}",
                self.tree_nodes.len(),
                self.max_num_nodes
            )));
        }

        self.verify_proof()
    }

    /// Verify that the root matches the nodes and that every stored proof
    /// climbs to it.
    pub fn verify_proof(&self) -> Result<()> {
        let root = self.merkle_root.to_bytes();

        let rebuilt = self.build_merkle_tree()?;
        if rebuilt.get_root() != root {
            return Err(MerkleValidationError(format!(
                "Merkle root {} is invalid given nodes",
                self.merkle_root
            )));
        }

        for (i, node) in self.tree_nodes.iter().enumerate() {
            let proof = node
                .proof
                .as_ref()
                .ok_or_else(|| MerkleValidationError(format!("claim {i} has no proof")))?;
            if !verify(to_raw_proof(proof), root, node.hash().to_bytes()) {
                return Err(MerkleValidationError(format!(
                    "invalid merkle proof for claim {i}"
                )));
            }
        }

        Ok(())
    }
}
