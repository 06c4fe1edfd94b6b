mod commands;
mod io;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lktrack", about = "Template tracking by iterative image alignment")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track rectangles between two images
    Pair(commands::pair::PairArgs),
    /// Track rectangles through a directory of images
    Sequence(commands::sequence::SequenceArgs),
    /// Print or save the default tracking config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Pair(args) => commands::pair::run(args),
        Commands::Sequence(args) => commands::sequence::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
