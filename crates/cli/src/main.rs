//! `bicycle` — runs bicycle-model discretization scenarios.
//!
//! # Commands
//!
//! - `bicycle run <SCENARIO>` - integrate every configured scheme and print a summary
//! - `bicycle defaults` - print the default scenario as TOML

mod report;
mod run;
mod scenario;

use std::path::PathBuf;

use anyhow::Result;
use bicycle_core::Scheme;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Discrete-time bicycle model runner
#[derive(Parser)]
#[command(name = "bicycle")]
#[command(about = "Compare bicycle-model discretization schemes", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate a scenario with one or more schemes
    Run {
        /// Scenario file (TOML)
        #[arg(name = "SCENARIO")]
        scenario: PathBuf,

        /// Scheme to run; repeat to run several. Overrides the scenario's list.
        #[arg(short, long = "scheme")]
        schemes: Vec<Scheme>,

        /// Print every state as CSV after the summary
        #[arg(long)]
        dump: bool,

        /// Stop a scheme once any state component exceeds this magnitude
        #[arg(long, value_name = "BOUND")]
        stop_above: Option<f64>,
    },

    /// Print the default scenario as TOML
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            scenario,
            schemes,
            dump,
            stop_above,
        } => run::run(&run::Options {
            scenario,
            schemes,
            dump,
            stop_above,
        }),
        Commands::Defaults => scenario::print_defaults(),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
