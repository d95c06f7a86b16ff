use gpro_allowlist_merkle_verify::{encode_claim, hash_leaf, ENCODED_CLAIM_LEN};
use serde::{Deserialize, Serialize};

use crate::{
    claim_entry::ClaimEntry,
    error::{MerkleTreeError, Result},
    types::{Address, Bytes32},
};

/// Represents one allow-listed claim.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Wallet allowed to mint; the minting contract checks it against the receiver
    pub address: Address,

    pub epoch: Bytes32,

    pub pool: Bytes32,

    pub count: Bytes32,

    /// Claimant's proof of inclusion in the Merkle Tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Vec<Bytes32>>,
}

impl TreeNode {
    pub fn new(address: Address, epoch: Bytes32, pool: Bytes32, count: Bytes32) -> Self {
        Self {
            address,
            epoch,
            pool,
            count,
            proof: None,
        }
    }

    /// Fixed-width concatenation of address, epoch, pool and count.
    pub fn encode(&self) -> [u8; ENCODED_CLAIM_LEN] {
        encode_claim(&self.address.0, &self.epoch.0, &self.pool.0, &self.count.0)
    }

    /// Leaf value committed to by the tree.
    pub fn hash(&self) -> Bytes32 {
        Bytes32(hash_leaf(&self.encode()))
    }
}

impl TryFrom<ClaimEntry> for TreeNode {
    type Error = MerkleTreeError;

    fn try_from(entry: ClaimEntry) -> Result<Self> {
        Ok(Self::new(
            entry.address.parse()?,
            entry.epoch.parse()?,
            entry.pool.parse()?,
            entry.count.parse()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_claim(count: u64) -> TreeNode {
        TreeNode::new(
            "f39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap(),
            Bytes32::from(0u64),
            Bytes32::from(1u64),
            Bytes32::from(count),
        )
    }

    #[test]
    fn test_leaf_is_deterministic() {
        let a = owner_claim(0);
        let b = owner_claim(0);
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.hash(), b.hash());
        assert_eq!(
            a.hash().to_string(),
            "0x92b4dc55abf502327566e9a49dae3fa4e8a402e67498d02c82053c9f27d9192e"
        );
    }

    #[test]
    fn test_each_field_changes_the_leaf() {
        let base = owner_claim(3);
        let mut changed = vec![base.clone(), base.clone(), base.clone(), base.clone()];
        changed[0].address = "70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        changed[1].epoch = Bytes32::from(1u64);
        changed[2].pool = Bytes32::from(2u64);
        changed[3].count = Bytes32::from(4u64);

        for node in changed {
            assert_ne!(node.hash(), base.hash());
        }
    }

    #[test]
    fn test_try_from_entry() {
        let entry = ClaimEntry::new(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "0",
            "1",
            "0000000000000000000000000000000000000000000000000000000000000003",
        );
        let node = TreeNode::try_from(entry).unwrap();
        assert_eq!(node, owner_claim(3));
        assert!(node.proof.is_none());
    }

    #[test]
    fn test_try_from_entry_rejects_oversized_field() {
        let entry = ClaimEntry::new(
            "f39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "0",
            &"f".repeat(65),
            "0",
        );
        assert!(matches!(
            TreeNode::try_from(entry),
            Err(MerkleTreeError::EncodingError(_))
        ));
    }
}
