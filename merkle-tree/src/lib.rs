pub mod allowlist_merkle_tree;
pub mod audit;
pub mod claim_entry;
pub mod error;
pub mod merkle_tree;
pub mod tree_node;
pub mod types;
pub mod utils;

pub use allowlist_merkle_tree::{AllowListMerkleTree, BuildOptions};
pub use audit::{AuditEvent, AuditLog, LogAudit, NoopAudit};
pub use claim_entry::ClaimEntry;
pub use error::{MerkleTreeError, Result};
pub use merkle_tree::{MerkleTree, Proof, ProofEntry};
pub use tree_node::TreeNode;
pub use types::{Address, Bytes32};
