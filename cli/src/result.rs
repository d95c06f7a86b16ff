use std::io::Error as IoError;

use gpro_allowlist_merkle_tree::MerkleTreeError;
use log::SetLoggerError;
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Merkle tree error: {0}")]
    MerkleTree(#[from] MerkleTreeError),

    #[error("Input/output error: {0}")]
    Io(#[from] IoError),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] JsonError),

    #[error("SetLogger Error: {0}")]
    SetLoggerError(#[from] SetLoggerError),

    #[error("Proof does not verify against root {0}")]
    InvalidProof(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
