use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleTreeError {
    #[error("Encoding Error: {0}")]
    EncodingError(String),
    #[error("Cannot build a merkle tree from zero leaves")]
    EmptyInputError,
    #[error("Leaf index {index} is out of range for a tree with {len} leaves")]
    IndexOutOfRangeError { index: usize, len: usize },
    #[error("Merkle Tree Validation Error: {0}")]
    MerkleValidationError(String),
    #[error("io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    CsvError(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MerkleTreeError>;
