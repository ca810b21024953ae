//! Murkl CLI - Groth16 withdrawal proofs
//!
//! Commands:
//! - genkeys: Compile the circuit and write proving/verifying keys
//! - prove: Prove a withdrawal from positional arguments
//! - prove_json: Prove a withdrawal from a JSON request
//! - verify: Verify a proof, optionally against root/nullifier/exthash
//! - nullifier: Compute the nullifier for a secret and leaf address
//! - depth: Show the tree depth a key file was generated for
//!
//! Exit codes: 0 success, 1 invalid input or rejected proof,
//! 2 unknown command or proving failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use murkl_circuit::TREE_DEPTH;
use rand::rngs::OsRng;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::*;
use error::{CliError, EXIT_FAILURE, EXIT_INVALID};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "murkl=info";

#[derive(Parser)]
#[command(name = "murkl")]
#[command(about = "Anonymous withdrawals with Groth16 proofs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the circuit and generate proving/verifying keys
    Genkeys {
        /// Output proving key file
        pk: PathBuf,

        /// Output verifying key file
        vk: PathBuf,

        /// Merkle tree depth
        #[arg(short, long, default_value_t = TREE_DEPTH)]
        depth: usize,
    },

    /// Generate a withdrawal proof
    Prove {
        /// Proving key file
        pk: PathBuf,

        /// Output proof file
        proof: PathBuf,

        /// Merkle root
        root: String,

        /// External context hash
        exthash: String,

        /// Deposit secret
        secret: String,

        /// Leaf address as '0'/'1' characters, least significant bit first
        address: String,

        /// Merkle path, one sibling per level from the leaf up
        #[arg(required = true)]
        path: Vec<String>,
    },

    /// Generate a withdrawal proof from a JSON request
    #[command(name = "prove_json")]
    ProveJson {
        /// Proving key file
        pk: PathBuf,

        /// Request file, or '-' for stdin
        #[arg(default_value = STDIO)]
        input: String,

        /// Proof output file, or '-' for stdout
        #[arg(default_value = STDIO)]
        output: String,
    },

    /// Verify a proof
    Verify {
        /// Verifying key file
        vk: PathBuf,

        /// Proof file
        proof: PathBuf,

        /// Expected Merkle root
        #[arg(long)]
        root: Option<String>,

        /// Expected nullifier
        #[arg(long)]
        nullifier: Option<String>,

        /// Expected external context hash
        #[arg(long)]
        exthash: Option<String>,
    },

    /// Compute the nullifier for a secret at a leaf address
    Nullifier {
        /// Deposit secret
        secret: String,

        /// Leaf index
        address: u64,

        /// Merkle tree depth the address must fit
        #[arg(short, long, default_value_t = TREE_DEPTH)]
        depth: usize,
    },

    /// Show the tree depth of a key file
    Depth {
        /// Proving or verifying key file
        key: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit code for a command-line parse failure
fn parse_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        ErrorKind::InvalidSubcommand => EXIT_FAILURE,
        _ => EXIT_INVALID,
    }
}

fn run(command: Commands) -> Result<bool, CliError> {
    let mut rng = OsRng;
    match command {
        Commands::Genkeys { pk, vk, depth } => cmd_genkeys(&pk, &vk, depth, &mut rng).map(|_| true),
        Commands::Prove { pk, proof, root, exthash, secret, address, path } => {
            cmd_prove(&pk, &proof, &root, &exthash, &secret, &address, &path, &mut rng).map(|_| true)
        }
        Commands::ProveJson { pk, input, output } => {
            cmd_prove_json(&pk, &input, &output, &mut rng).map(|_| true)
        }
        Commands::Verify { vk, proof, root, nullifier, exthash } => {
            cmd_verify(&vk, &proof, &Binding { root, nullifier, exthash })
        }
        Commands::Nullifier { secret, address, depth } => {
            cmd_nullifier(&secret, address, depth).map(|_| true)
        }
        Commands::Depth { key } => cmd_depth(&key).map(|_| true),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_exit_code(e.kind()));
        }
    };

    init_logging();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INVALID),
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
