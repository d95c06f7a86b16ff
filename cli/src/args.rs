use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use gpro_allowlist_merkle_tree::{Address, Bytes32};

use crate::result::{AppError, Result};

#[derive(Parser, Debug)]
#[command(name = "allowlist-merkle")]
#[command(about = "Build GPRO allow-list Merkle roots and claim proofs", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree from an allow list and print its root
    Build(BuildArgs),
    /// Print the proofs of one or more claims from a saved tree
    Proof(ProofArgs),
    /// Check a single claim and proof against a root
    Verify(VerifyArgs),
    /// Print the fixed-width encoding and leaf hash of a claim
    EncodeLeaf(ClaimArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(AppError::InvalidArgument(format!(
                "cannot infer input format of {}, pass --format",
                path.display()
            ))),
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct BuildArgs {
    /// Allow list with columns address, epoch, pool, count (hex)
    #[arg(long, short, env = "ALLOWLIST_INPUT")]
    pub input: PathBuf,

    /// Input format [default: from file extension]
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Where to write the tree with every claim's proof
    #[arg(long, short, env = "ALLOWLIST_TREE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Build over the input order instead of sorting leaves
    #[arg(long)]
    pub preserve_order: bool,

    /// Print the tree structure before the root
    #[arg(long)]
    pub print_tree: bool,

    /// Send every build step to the debug log
    #[arg(long)]
    pub verbose_audit: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ProofArgs {
    /// Tree file written by `build --output`
    #[arg(long, short, env = "ALLOWLIST_TREE")]
    pub tree: PathBuf,

    /// Claim index in the allow list
    #[arg(long, conflicts_with = "address", required_unless_present = "address")]
    pub index: Option<usize>,

    /// Print every claim of this wallet
    #[arg(long)]
    pub address: Option<Address>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ClaimArgs {
    #[arg(long)]
    pub address: Address,

    #[arg(long)]
    pub epoch: Bytes32,

    #[arg(long)]
    pub pool: Bytes32,

    #[arg(long)]
    pub count: Bytes32,
}

#[derive(ClapArgs, Debug)]
pub struct VerifyArgs {
    /// Root stored by the minting contract
    #[arg(long, env = "ALLOWLIST_ROOT")]
    pub root: Bytes32,

    #[command(flatten)]
    pub claim: ClaimArgs,

    /// Comma separated sibling hashes, empty for a single-claim tree
    #[arg(long, value_delimiter = ',')]
    pub proof: Vec<Bytes32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_parse_build() {
        let args = Args::try_parse_from([
            "allowlist-merkle",
            "build",
            "--input",
            "list.csv",
            "--preserve-order",
        ])
        .unwrap();
        match args.command {
            Commands::Build(build) => {
                assert_eq!(build.input, PathBuf::from("list.csv"));
                assert!(build.preserve_order);
                assert!(build.output.is_none());
                assert!(build.format.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_verify_with_proof_list() {
        let args = Args::try_parse_from([
            "allowlist-merkle",
            "verify",
            "--root",
            "0xb9eef4baaca80a8db40f72f0ce9e66b659a65dc11efe8180c0bec577bea6d0a0",
            "--address",
            OWNER,
            "--epoch",
            "0",
            "--pool",
            "1",
            "--count",
            "3",
            "--proof",
            "0x01,0x02",
        ])
        .unwrap();
        match args.command {
            Commands::Verify(verify) => {
                assert_eq!(verify.proof, vec![Bytes32::from(1u64), Bytes32::from(2u64)]);
                assert_eq!(verify.claim.count, Bytes32::from(3u64));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_reject_oversized_field() {
        let too_long = format!("0x1{}", "0".repeat(64));
        let result = Args::try_parse_from([
            "allowlist-merkle",
            "encode-leaf",
            "--address",
            OWNER,
            "--epoch",
            "0",
            "--pool",
            "1",
            "--count",
            too_long.as_str(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_proof_needs_index_or_address() {
        assert!(Args::try_parse_from(["allowlist-merkle", "proof", "--tree", "t.json"]).is_err());
        assert!(Args::try_parse_from([
            "allowlist-merkle",
            "proof",
            "--tree",
            "t.json",
            "--index",
            "0",
            "--address",
            OWNER,
        ])
        .is_err());
    }

    #[test]
    fn test_input_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("a/b/list.CSV")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("list.json")).unwrap(),
            InputFormat::Json
        );
        assert!(InputFormat::from_path(Path::new("list.txt")).is_err());
    }
}
