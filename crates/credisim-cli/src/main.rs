mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;
use std::process;

use commands::comparison::{CompareArgs, ScoreArgs, SimulateArgs};
use commands::consortium::ConsortiumArgs;
use commands::loan::LoanArgs;

/// Consortium vs. financing simulations
#[derive(Parser)]
#[command(
    name = "credisim",
    version,
    about = "Consortium vs. financing simulations for sales proposals",
    long_about = "Simulate a financed loan (Price or SAC), a consortium plan with bids, \
                  and a heuristic recommendation between the two. Results are estimates \
                  for sales conversations, not accounting figures. Range warnings are \
                  shown by default; set RUST_LOG=debug for engine traces."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a month-by-month loan schedule (Price or SAC)
    Loan(LoanArgs),
    /// Compute consortium plan and bid economics
    Consortium(ConsortiumArgs),
    /// Score financing against a consortium plan
    Compare(CompareArgs),
    /// Run schedule, plan and comparison in one pass (use with --output proposal)
    Simulate(SimulateArgs),
    /// Score a single product on a 0–100 scale
    Score(ScoreArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    /// Plain-text sales proposal (simulate only)
    Proposal,
}

/// `RUST_LOG` when set, otherwise warnings and errors.
fn logger() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
}

fn main() {
    logger().init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Consortium(args) => commands::consortium::run_consortium(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::Simulate(args) => commands::comparison::run_simulate(args),
        Commands::Score(args) => commands::comparison::run_score(args),
        Commands::Version => {
            println!("credisim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            debug!("rendering output as {:?}", cli.output);
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
