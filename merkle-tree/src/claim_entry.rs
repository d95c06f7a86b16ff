use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Represents a single row of an allow-list file, fields still hex encoded.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ClaimEntry {
    /// Wallet allowed to claim, 20 bytes
    pub address: String,

    /// Price-feed epoch the claim belongs to
    pub epoch: String,

    /// Staking pool id
    pub pool: String,

    /// Number of mint credits (staking position index on the minting contract)
    pub count: String,
}

impl ClaimEntry {
    pub fn new(address: &str, epoch: &str, pool: &str, count: &str) -> Self {
        Self {
            address: address.to_string(),
            epoch: epoch.to_string(),
            pool: pool.to_string(),
            count: count.to_string(),
        }
    }

    /// Reads entries from a CSV file with the header `address,epoch,pool,count`.
    pub fn from_csv_file(path: &Path) -> Result<Vec<Self>> {
        let file = File::open(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let record: ClaimEntry = result?;
            entries.push(record);
        }

        Ok(entries)
    }

    pub fn from_json_file(path: &Path) -> Result<Vec<Self>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let entries: Vec<ClaimEntry> = serde_json::from_reader(reader)?;
        Ok(entries)
    }
}
