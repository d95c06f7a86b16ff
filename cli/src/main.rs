//! Operator tool for GPRO allow-list roots. Build the tree once per epoch,
//! submit the printed root to the minting contract, then hand each claimant
//! their proof.

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::{
    args::{Args, Commands},
    commands::{run_build, run_encode_leaf, run_proof, run_verify},
    result::Result,
};

mod args;
mod commands;
mod result;

/// Logs go to stderr; stdout only carries roots and proofs.
fn init_logger() -> Result<()> {
    let mut builder = Builder::new();
    builder
        .target(Target::Stderr)
        .filter_level(LevelFilter::Info)
        .parse_default_env();
    Ok(builder.try_init()?)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logger()?;

    let output = match &args.command {
        Commands::Build(build_args) => run_build(build_args)?,
        Commands::Proof(proof_args) => run_proof(proof_args)?,
        Commands::Verify(verify_args) => run_verify(verify_args)?,
        Commands::EncodeLeaf(claim_args) => run_encode_leaf(claim_args)?,
    };
    print!("{output}");

    Ok(())
}
