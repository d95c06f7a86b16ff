use crate::{error::Result, merkle_tree::MerkleTree, types::Bytes32};

/// Sibling hashes for the `index`-th input leaf, skipping levels where the
/// node was promoted without a sibling.
pub fn get_proof(merkle_tree: &MerkleTree, index: usize) -> Result<Vec<Bytes32>> {
    let path = merkle_tree.find_path(index)?;
    let mut proof = Vec::new();
    for branch in path.get_proof_entries() {
        if let Some(hash) = branch.get_left_sibling() {
            proof.push(Bytes32(*hash));
        } else if let Some(hash) = branch.get_right_sibling() {
            proof.push(Bytes32(*hash));
        }
    }
    Ok(proof)
}

pub fn to_raw_proof(proof: &[Bytes32]) -> Vec<[u8; 32]> {
    proof.iter().map(Bytes32::to_bytes).collect()
}
