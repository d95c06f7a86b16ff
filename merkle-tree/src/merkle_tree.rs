//! Binary Keccak-256 tree with sorted-pair parents.
//!
//! Odd levels promote their last node unchanged to the next level; the node
//! is neither duplicated nor hashed with itself, and the proof gets no element
//! for that level. This matches the Merkle library the allow-list roots were
//! first published with, so changing it changes every root with an odd level.

use std::fmt;

use gpro_allowlist_merkle_verify::hash_pair;

use crate::{
    audit::{AuditEvent, AuditLog, NoopAudit},
    error::{MerkleTreeError, Result},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Level 0 holds the leaves in build order, the last level holds the root.
    levels: Vec<Vec<[u8; 32]>>,
    /// Position in level 0 of each leaf, indexed by input order.
    leaf_positions: Vec<usize>,
}

/// One step of the climb from a leaf to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofEntry {
    target: [u8; 32],
    left_sibling: Option<[u8; 32]>,
    right_sibling: Option<[u8; 32]>,
}

impl ProofEntry {
    pub fn get_target(&self) -> &[u8; 32] {
        &self.target
    }

    pub fn get_left_sibling(&self) -> Option<&[u8; 32]> {
        self.left_sibling.as_ref()
    }

    pub fn get_right_sibling(&self) -> Option<&[u8; 32]> {
        self.right_sibling.as_ref()
    }

    /// True when the node was promoted through this level without a sibling.
    pub fn is_promoted(&self) -> bool {
        self.left_sibling.is_none() && self.right_sibling.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    entries: Vec<ProofEntry>,
}

impl Proof {
    pub fn get_proof_entries(&self) -> &[ProofEntry] {
        &self.entries
    }

    /// Sibling hashes in climbing order, the form the verifier consumes.
    pub fn to_hashes(&self) -> Vec<[u8; 32]> {
        self.entries
            .iter()
            .filter_map(|entry| entry.left_sibling.or(entry.right_sibling))
            .collect()
    }

    pub fn root_from(&self, leaf: [u8; 32]) -> [u8; 32] {
        self.to_hashes()
            .iter()
            .fold(leaf, |node, sibling| hash_pair(&node, sibling))
    }

    pub fn verify(&self, leaf: [u8; 32], root: [u8; 32]) -> bool {
        self.root_from(leaf) == root
    }
}

impl MerkleTree {
    /// Builds the tree. With `sort_leaves` the leaves are ordered by byte value
    /// first, which makes the root independent of input order.
    pub fn new(leaves: &[[u8; 32]], sort_leaves: bool) -> Result<Self> {
        Self::new_with_audit(leaves, sort_leaves, &mut NoopAudit)
    }

    pub fn new_with_audit(
        leaves: &[[u8; 32]],
        sort_leaves: bool,
        audit: &mut dyn AuditLog,
    ) -> Result<Self> {
        if leaves.is_empty() {
            return Err(MerkleTreeError::EmptyInputError);
        }

        let mut order: Vec<usize> = (0..leaves.len()).collect();
        if sort_leaves {
            // stable, so equal leaves keep their input order
            order.sort_by_key(|&i| leaves[i]);
        }

        let mut leaf_positions = vec![0; leaves.len()];
        for (position, &index) in order.iter().enumerate() {
            leaf_positions[index] = position;
        }

        let base: Vec<[u8; 32]> = order.iter().map(|&i| leaves[i]).collect();
        audit.record(AuditEvent::LevelBuilt {
            height: 0,
            nodes: &base,
        });

        let mut levels = vec![base];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() == 1 {
                break;
            }

            let height = levels.len();
            let mut next = Vec::with_capacity((current.len() + 1) / 2);
            for pair in current.chunks(2) {
                if let [left, right] = pair {
                    next.push(hash_pair(left, right));
                } else {
                    audit.record(AuditEvent::OddNodePromoted {
                        height,
                        node: &pair[0],
                    });
                    next.push(pair[0]);
                }
            }

            audit.record(AuditEvent::LevelBuilt {
                height,
                nodes: &next,
            });
            levels.push(next);
        }

        let tree = Self {
            levels,
            leaf_positions,
        };
        audit.record(AuditEvent::RootComputed {
            root: &tree.get_root(),
            leaf_count: tree.leaf_count(),
        });

        Ok(tree)
    }

    pub fn get_root(&self) -> [u8; 32] {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_positions.len()
    }

    /// Number of levels above the leaves; the longest possible proof.
    pub fn height(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn levels(&self) -> &[Vec<[u8; 32]>] {
        &self.levels
    }

    /// Leaf hash of the `index`-th input leaf.
    pub fn get_leaf(&self, index: usize) -> Result<[u8; 32]> {
        let position = self.position_of(index)?;
        Ok(self.levels[0][position])
    }

    /// Path from the `index`-th input leaf up to the root.
    pub fn find_path(&self, index: usize) -> Result<Proof> {
        let mut position = self.position_of(index)?;
        let mut entries = Vec::with_capacity(self.height());

        for level in &self.levels[..self.height()] {
            let target = level[position];
            let entry = if position % 2 == 1 {
                ProofEntry {
                    target,
                    left_sibling: Some(level[position - 1]),
                    right_sibling: None,
                }
            } else if position + 1 < level.len() {
                ProofEntry {
                    target,
                    left_sibling: None,
                    right_sibling: Some(level[position + 1]),
                }
            } else {
                ProofEntry {
                    target,
                    left_sibling: None,
                    right_sibling: None,
                }
            };
            entries.push(entry);
            position /= 2;
        }

        Ok(Proof { entries })
    }

    fn position_of(&self, index: usize) -> Result<usize> {
        self.leaf_positions
            .get(index)
            .copied()
            .ok_or(MerkleTreeError::IndexOutOfRangeError {
                index,
                len: self.leaf_count(),
            })
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        height: usize,
        position: usize,
        prefix: &str,
        last: bool,
    ) -> fmt::Result {
        let branch = if last { "└─ " } else { "├─ " };
        writeln!(
            f,
            "{prefix}{branch}0x{}",
            hex::encode(self.levels[height][position])
        )?;
        if height == 0 {
            return Ok(());
        }

        let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });
        let left = 2 * position;
        if left + 1 < self.levels[height - 1].len() {
            self.fmt_node(f, height - 1, left, &child_prefix, false)?;
            self.fmt_node(f, height - 1, left + 1, &child_prefix, true)
        } else {
            self.fmt_node(f, height - 1, left, &child_prefix, true)
        }
    }
}

/// Renders the tree root first, one node per line.
impl fmt::Display for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.height(), 0, "", true)
    }
}
