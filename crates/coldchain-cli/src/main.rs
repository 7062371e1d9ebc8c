//! Coldchain CLI - submit custody operations and audit the ledger journal.

use clap::{ArgGroup, Args, Parser, Subcommand};
use coldchain_canonical::{Identity, MessageHash, SignatureBytes};
use coldchain_core::{Role, Status};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;

use commands::query::HashInput;
use commands::{hash, list, query, submit, verify, Context};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "coldchain")]
#[command(about = "Vaccine cold-chain custody ledger CLI")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "coldchain.toml")]
    config: PathBuf,
    /// Journal file (overrides the configuration)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(ArgGroup::new("hash_input").required(true).args(["message", "hash"])))]
struct HashArgs {
    /// Certification message; hashed with Keccak-256
    #[arg(long)]
    message: Option<String>,
    /// Precomputed 32-byte hash (0x-prefixed hex)
    #[arg(long)]
    hash: Option<MessageHash>,
}

impl HashArgs {
    fn into_input(self) -> HashInput {
        match (self.hash, self.message) {
            (Some(hash), _) => HashInput::Hash(hash),
            (None, message) => HashInput::Message(message.unwrap_or_default()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a participant
    AddEntity {
        /// Participant address
        id: Identity,
        /// ISSUER, PROVER or VERIFIER
        role: Role,
        /// Submitting identity (default: configured admin)
        #[arg(long)]
        caller: Option<Identity>,
    },
    /// Register a vaccine batch
    AddBatch {
        /// Brand name
        brand: String,
        /// Manufacturer address (must be a PROVER)
        manufacturer: Identity,
        /// Submitting identity (default: configured admin)
        #[arg(long)]
        caller: Option<Identity>,
    },
    /// Store a signed custody certificate
    Issue {
        /// Issuer address (must be an ISSUER)
        #[arg(long)]
        issuer: Identity,
        /// Prover address (must be a PROVER)
        #[arg(long)]
        prover: Identity,
        /// Custody stage, e.g. MANUFACTURED or delivering-local
        #[arg(long)]
        status: Status,
        /// 65-byte signature (0x-prefixed hex)
        #[arg(long)]
        signature: SignatureBytes,
        /// Batch the certificate attests
        #[arg(long)]
        batch: Option<u64>,
        /// Submitting identity (default: configured admin)
        #[arg(long)]
        caller: Option<Identity>,
    },
    /// Check whether a certificate was signed by an address
    MatchSignature {
        /// Certificate id
        certificate: u64,
        /// Expected signer address
        signer: Identity,
        #[command(flatten)]
        input: HashArgs,
        /// Querying identity (default: configured admin)
        #[arg(long)]
        caller: Option<Identity>,
    },
    /// Show a registered participant
    Entity {
        /// Participant address
        id: Identity,
    },
    /// Show a batch and its certificates
    Batch {
        /// Batch id
        id: u64,
    },
    /// Show a certificate
    Certificate {
        /// Certificate id
        id: u64,
    },
    /// List ledger records
    List {
        /// Only this operation (add_entity, add_vaccine_batch, issue_certificate)
        #[arg(long = "op")]
        operation: Option<String>,
        /// Only records submitted by this identity
        #[arg(long)]
        caller: Option<Identity>,
        /// Lowest height (inclusive)
        #[arg(long)]
        from: Option<u64>,
        /// Highest height (inclusive)
        #[arg(long)]
        to: Option<u64>,
        /// One JSON record per line
        #[arg(long)]
        json: bool,
    },
    /// Verify the record chain and replay every transaction
    Verify {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the Keccak-256 hash of a certification message
    Hash {
        /// Message text
        message: String,
    },
    /// Sign a message hash with a raw secret key (testing only)
    #[cfg(feature = "dev-tools")]
    Sign {
        /// 32-byte secp256k1 secret (hex)
        #[arg(long)]
        secret: String,
        #[command(flatten)]
        input: HashArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::CommandResult {
    let Cli {
        config: config_path,
        journal,
        command,
        ..
    } = cli;
    // Loaded on demand: hashing needs no ledger and therefore no configuration.
    let context = || -> Result<Context, config::ConfigError> {
        let mut config = CliConfig::load(&config_path)?;
        if let Some(journal) = &journal {
            config.journal = journal.clone();
        }
        Ok(Context { config })
    };

    match command {
        Commands::AddEntity { id, role, caller } => {
            submit::add_entity(&context()?, caller, id, role)
        }
        Commands::AddBatch {
            brand,
            manufacturer,
            caller,
        } => submit::add_batch(&context()?, caller, brand, manufacturer),
        Commands::Issue {
            issuer,
            prover,
            status,
            signature,
            batch,
            caller,
        } => submit::issue(&context()?, caller, issuer, prover, status, signature, batch),
        Commands::MatchSignature {
            certificate,
            signer,
            input,
            caller,
        } => query::match_signature(&context()?, caller, certificate, signer, input.into_input()),
        Commands::Entity { id } => query::entity(&context()?, id),
        Commands::Batch { id } => query::batch(&context()?, id),
        Commands::Certificate { id } => query::certificate(&context()?, id),
        Commands::List {
            operation,
            caller,
            from,
            to,
            json,
        } => list::run(
            &context()?,
            list::ListArgs {
                operation,
                caller,
                from,
                to,
                json,
            },
        ),
        Commands::Verify { json } => verify::run(&context()?, json),
        Commands::Hash { message } => hash::run(&message),
        #[cfg(feature = "dev-tools")]
        Commands::Sign { secret, input } => hash::sign(
            &secret,
            input.into_input(),
            context()?.config.engine.signature_scheme,
        ),
    }
}
