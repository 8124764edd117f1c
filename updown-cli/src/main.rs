//! updown CLI - versioned up/down SQL migrations in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use updown_core::Version;

mod commands;
mod output;

use commands::{base, history, init, new, purge, rollback, status, up, GlobalArgs};

/// updown - apply and roll back versioned SQL migrations
#[derive(Parser)]
#[command(name = "updown", version, about, long_about = None)]
struct Cli {
    /// Project directory containing updown.json
    #[arg(long, short = 'C', global = true, default_value = ".")]
    project: PathBuf,

    /// Database file (overrides updown.json and UPDOWN_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Migration folder (overrides updown.json and UPDOWN_MIGRATIONS_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Show debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current version and pending migrations
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run new up migrations, asking for approval of each one
    Up {
        /// Approve every migration without prompting
        #[arg(long, short)]
        yes: bool,
    },

    /// Run down migrations until the given version has been reverted
    Rollback {
        /// Oldest version to revert
        version: Version,
        /// Approve every migration without prompting
        #[arg(long, short)]
        yes: bool,
    },

    /// Create the ledger table from the base file, then run new migrations
    Init {
        /// Approve every migration without prompting
        #[arg(long, short)]
        yes: bool,
    },

    /// Print the ledger table schema and offer to save it as the base file
    Base {
        /// Save without prompting
        #[arg(long, short)]
        yes: bool,
    },

    /// Create an empty up/down migration pair
    New {
        /// Version to use (defaults to the current Unix timestamp)
        #[arg(long)]
        version: Option<Version>,
    },

    /// Show every recorded migration action
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drop every table in the database
    Purge {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
        /// Re-create the ledger table afterwards
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let args = GlobalArgs {
        project: cli.project,
        database: cli.database,
        dir: cli.dir,
    };

    match cli.command {
        Commands::Status { json } => status::run(&args, json),
        Commands::Up { yes } => up::run(&args, yes),
        Commands::Rollback { version, yes } => rollback::run(&args, version, yes),
        Commands::Init { yes } => init::run(&args, yes),
        Commands::Base { yes } => base::run(&args, yes),
        Commands::New { version } => new::run(&args, version),
        Commands::History { json } => history::run(&args, json),
        Commands::Purge { force, init } => purge::run(&args, force, init),
    }
}
