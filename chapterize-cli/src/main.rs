// chapterize-cli/src/main.rs
//
// Command-line interface for the chapterize audiobook tool.
//
// Responsibilities:
// - Defining the CLI argument structures (`Cli`, `Commands`).
// - Initializing logging (env_logger, RUST_LOG, default "info").
// - Dispatching to the split/merge command implementations.
// - Mapping command failures to a styled error line and exit code 1.

use clap::{Parser, Subcommand};
use console::style;
use std::process;

mod commands;

use commands::merge::{MergeArgs, run_merge};
use commands::split::{SplitArgs, run_split};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Chapterize: audiobook chapter split/merge tool",
    long_about = "Splits a chaptered audiobook container into per-chapter files, \
or merges a directory of audio files into one chaptered container, using \
ffmpeg/ffprobe via the chapterize-core library."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Splits a chaptered container into per-chapter files
    Split(SplitArgs),
    /// Merges a directory of audio files into one chaptered container
    Merge(MergeArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Split(args) => run_split(args),
        Commands::Merge(args) => run_merge(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}
