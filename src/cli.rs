#[allow(unused_imports)]
use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "convomark")]
#[command(about = "Annotate two-party conversation exports with recipients and genders", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Enrich every conversation export under the raw directory.
    Run {
        /// Directory of raw .csv exports. Default: raw_texts
        #[arg(long)]
        raw_dir: Option<PathBuf>,
        /// Directory for enriched outputs. Default: parsed_texts
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Phone number cache file. Default: phoneNumbers.json
        #[arg(long)]
        numbers: Option<PathBuf>,
        /// Run-log directory. Default: logs
        #[arg(long)]
        log_dir: Option<PathBuf>,
        /// Validate conversations only; no prompting, no writes.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the cached phone numbers and their genders.
    Numbers {
        /// Phone number cache file. Default: phoneNumbers.json
        #[arg(long)]
        numbers: Option<PathBuf>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}
