//! Dialectic CLI - run LLM debates from the command line
//!
//! # Usage
//!
//! ```bash
//! # Run a three-round debate and save the transcript
//! dialectic run "Was congestion pricing successful in London?" --output debate.json
//!
//! # Try it offline with the built-in mock agents
//! dialectic run "Tabs beat spaces" --rounds 1 --mock
//!
//! # Inspect a saved transcript
//! dialectic show debate.json
//!
//! # Show version and configuration
//! dialectic info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{info, run, show};

/// Dialectic - structured debates between LLM agents
///
/// Two agents argue opposite sides of a topic over several rounds,
/// then a third agent scores the exchange and names a winner.
#[derive(Parser)]
#[command(
    name = "dialectic",
    version,
    about = "Dialectic - multi-agent LLM debates with automated judging",
    long_about = "Dialectic runs a structured debate between two LLM agents.\n\n\
                  Agent A argues for the topic and agent B against it.\n\
                  A judge agent then scores the debate and gives a verdict."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate on a topic
    #[command(name = "run")]
    Run(run::RunArgs),

    /// Display a saved debate transcript
    #[command(name = "show")]
    Show(show::ShowArgs),

    /// Show version and configuration
    #[command(name = "info")]
    Info(info::InfoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Show(args) => show::run(args).await,
        Commands::Info(args) => info::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
