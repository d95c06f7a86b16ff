//! Hashing rules shared by the off-chain tree builder and the on-chain claim
//! verifier. A claim is accepted only if both sides agree byte for byte on the
//! leaf encoding, the double Keccak-256 leaf hash and the sorted-pair climb.

use sha3::{Digest, Keccak256};

/// Width of a claimant address.
pub const ADDRESS_LEN: usize = 20;

/// Width of the epoch, pool and count fields.
pub const WORD_LEN: usize = 32;

/// Length of an encoded claim: address, epoch, pool, count with no delimiters.
pub const ENCODED_CLAIM_LEN: usize = ADDRESS_LEN + 3 * WORD_LEN;

/// Keccak-256 over the concatenation of `vals`.
pub fn hashv(vals: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for val in vals {
        hasher.update(val);
    }
    hasher.finalize().into()
}

/// Parent of two nodes. The smaller hash always goes first, so the verifier
/// does not need to know whether a sibling sat on the left or the right.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        hashv(&[a, b])
    } else {
        hashv(&[b, a])
    }
}

/// Double hash of an encoded record. The second round keeps a 64 byte
/// internal node preimage from ever being accepted as a leaf.
pub fn hash_leaf(encoded: &[u8]) -> [u8; 32] {
    let inner = hashv(&[encoded]);
    hashv(&[&inner])
}

pub fn encode_claim(
    address: &[u8; ADDRESS_LEN],
    epoch: &[u8; WORD_LEN],
    pool: &[u8; WORD_LEN],
    count: &[u8; WORD_LEN],
) -> [u8; ENCODED_CLAIM_LEN] {
    let mut out = [0u8; ENCODED_CLAIM_LEN];
    out[..ADDRESS_LEN].copy_from_slice(address);
    out[ADDRESS_LEN..ADDRESS_LEN + WORD_LEN].copy_from_slice(epoch);
    out[ADDRESS_LEN + WORD_LEN..ADDRESS_LEN + 2 * WORD_LEN].copy_from_slice(pool);
    out[ADDRESS_LEN + 2 * WORD_LEN..].copy_from_slice(count);
    out
}

pub fn claim_leaf(
    address: &[u8; ADDRESS_LEN],
    epoch: &[u8; WORD_LEN],
    pool: &[u8; WORD_LEN],
    count: &[u8; WORD_LEN],
) -> [u8; 32] {
    hash_leaf(&encode_claim(address, epoch, pool, count))
}

/// Climbs from `leaf` through `proof` and compares the result with `root`.
pub fn verify(proof: Vec<[u8; 32]>, root: [u8; 32], leaf: [u8; 32]) -> bool {
    let computed = proof
        .iter()
        .fold(leaf, |node, sibling| hash_pair(&node, sibling));
    computed == root
}

/// Recomputes the leaf of a claim and checks it against `root`, the same
/// way the minting contract does at claim time.
pub fn verify_claim(
    address: &[u8; ADDRESS_LEN],
    epoch: &[u8; WORD_LEN],
    pool: &[u8; WORD_LEN],
    count: &[u8; WORD_LEN],
    proof: &[[u8; 32]],
    root: [u8; 32],
) -> bool {
    verify(proof.to_vec(), root, claim_leaf(address, epoch, pool, count))
}
