//! Skirmish CLI - run and inspect matches between built-in agents.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Skirmish - a deterministic two-faction wargame engine
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Verbose engine logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single match between two agents
    Run {
        /// Random seed (default: derived from the clock)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Maximum turns (default: 50)
        #[arg(short, long, default_value = "50")]
        turns: u32,

        /// Agent for the alpha faction
        #[arg(long, default_value = "advance")]
        alpha: cli::AgentKind,

        /// Agent for the beta faction
        #[arg(long, default_value = "advance")]
        beta: cli::AgentKind,

        /// ASCII map file replacing the built-in scenario map
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Alpha headquarters as X,Y (required with --map)
        #[arg(long)]
        alpha_hq: Option<String>,

        /// Beta headquarters as X,Y (required with --map)
        #[arg(long)]
        beta_hq: Option<String>,

        /// Evaluate attack adjacency against start-of-turn positions
        #[arg(long)]
        pre_movement_attacks: bool,

        /// Save the match log to a file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Suppress turn-by-turn output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a saved match log
    Replay {
        /// Match log file (.json)
        #[arg(required = true)]
        log: PathBuf,

        /// Show a single turn only
        #[arg(short, long)]
        turn: Option<u32>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("skirmish=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match args.command {
        Commands::Run {
            seed,
            turns,
            alpha,
            beta,
            map,
            alpha_hq,
            beta_hq,
            pre_movement_attacks,
            save,
            quiet,
        } => cli::run::execute(
            seed,
            turns,
            alpha,
            beta,
            map,
            alpha_hq,
            beta_hq,
            pre_movement_attacks,
            save,
            quiet,
        ),

        Commands::Replay { log, turn } => cli::replay::execute(log, turn),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
