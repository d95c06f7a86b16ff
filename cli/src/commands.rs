use std::fmt::Write as _;

use gpro_allowlist_merkle_tree::{
    AllowListMerkleTree, AuditLog, BuildOptions, Bytes32, ClaimEntry, LogAudit, NoopAudit,
    TreeNode,
};
use gpro_allowlist_merkle_verify::verify;
use log::info;
use serde::Serialize;

use crate::{
    args::{BuildArgs, ClaimArgs, InputFormat, ProofArgs, VerifyArgs},
    result::{AppError, Result},
};

/// One claim as handed to a claimant: what to submit and the proof for it.
#[derive(Debug, Serialize)]
struct ClaimProof<'a> {
    index: usize,
    #[serde(flatten)]
    node: &'a TreeNode,
    leaf: Bytes32,
}

#[derive(Debug, Serialize)]
struct ProofOutput<'a> {
    merkle_root: Bytes32,
    claims: Vec<ClaimProof<'a>>,
}

fn to_node(claim: &ClaimArgs) -> TreeNode {
    TreeNode::new(claim.address, claim.epoch, claim.pool, claim.count)
}

pub fn run_build(args: &BuildArgs) -> Result<String> {
    let format = match args.format {
        Some(format) => format,
        None => InputFormat::from_path(&args.input)?,
    };
    let entries = match format {
        InputFormat::Csv => ClaimEntry::from_csv_file(&args.input)?,
        InputFormat::Json => ClaimEntry::from_json_file(&args.input)?,
    };
    info!(
        "read {} allow-list entries from {}",
        entries.len(),
        args.input.display()
    );

    let options = BuildOptions {
        sort_leaves: !args.preserve_order,
    };
    let mut audit: Box<dyn AuditLog> = if args.verbose_audit {
        Box::new(LogAudit)
    } else {
        Box::new(NoopAudit)
    };
    let tree = AllowListMerkleTree::new_from_entries_with_options(entries, options, audit.as_mut())?;

    if let Some(output) = &args.output {
        tree.write_to_file(output)?;
        info!("wrote merkle tree to {}", output.display());
    }

    let mut out = String::new();
    if args.print_tree {
        // writing to a String cannot fail
        let _ = write!(out, "{}", tree.build_merkle_tree()?);
    }
    let _ = writeln!(out, "{}", tree.root_hex());
    Ok(out)
}

pub fn run_proof(args: &ProofArgs) -> Result<String> {
    let tree = AllowListMerkleTree::new_from_file(&args.tree)?;

    let nodes = match (&args.index, &args.address) {
        (Some(index), _) => vec![(*index, tree.get_node(*index)?)],
        (None, Some(address)) => {
            let nodes = tree.get_nodes_for_address(address);
            if nodes.is_empty() {
                return Err(AppError::InvalidArgument(format!(
                    "{address} has no claims in {}",
                    args.tree.display()
                )));
            }
            nodes
        }
        (None, None) => {
            return Err(AppError::InvalidArgument(
                "either --index or --address is required".to_string(),
            ))
        }
    };

    let output = ProofOutput {
        merkle_root: tree.merkle_root,
        claims: nodes
            .into_iter()
            .map(|(index, node)| ClaimProof {
                index,
                node,
                leaf: node.hash(),
            })
            .collect(),
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

pub fn run_verify(args: &VerifyArgs) -> Result<String> {
    let leaf = to_node(&args.claim).hash();
    let proof: Vec<[u8; 32]> = args.proof.iter().map(Bytes32::to_bytes).collect();

    if !verify(proof, args.root.to_bytes(), leaf.to_bytes()) {
        return Err(AppError::InvalidProof(args.root.to_string()));
    }
    info!("claim of {} verifies against {}", args.claim.address, args.root);
    Ok(format!("valid: leaf {leaf} is included in {}\n", args.root))
}

pub fn run_encode_leaf(args: &ClaimArgs) -> Result<String> {
    let node = to_node(args);
    Ok(format!(
        "encoded: 0x{}\nleaf: {}\n",
        hex::encode(node.encode()),
        node.hash()
    ))
}
