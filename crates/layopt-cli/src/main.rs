use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory holding conf/, data/ and cache/.
    #[arg(global = true, short, long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full multi-restart optimization.
    Search(cmd::search::SearchArgs),
    /// Calibrate per-task cost ranges and the population size.
    Calibrate(cmd::calibrate::CalibrateArgs),
    /// Score the bundled baseline layouts and print a ranking.
    Rank(cmd::rank::RankArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Search(args) => cmd::search::run(&cli.root, args),
        Commands::Calibrate(args) => cmd::calibrate::run(&cli.root, args),
        Commands::Rank(args) => cmd::rank::run(&cli.root, args),
    };

    if let Err(e) = outcome {
        error!("{e}");
        process::exit(1);
    }
}
