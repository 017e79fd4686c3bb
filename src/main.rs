// Module declarations
mod cli;
mod config;
mod enrich;
mod gender_db;
mod prompt;
mod run_log;
mod runner;
mod table;
mod types;
mod util;

// Re-export all module items at crate root so cross-module references work
// through a single namespace.
#[allow(unused_imports)]
pub(crate) use cli::*;
#[allow(unused_imports)]
pub(crate) use config::*;
#[allow(unused_imports)]
pub(crate) use enrich::*;
#[allow(unused_imports)]
pub(crate) use gender_db::*;
#[allow(unused_imports)]
pub(crate) use prompt::*;
#[allow(unused_imports)]
pub(crate) use run_log::*;
#[allow(unused_imports)]
pub(crate) use runner::*;
#[allow(unused_imports)]
pub(crate) use table::*;
#[allow(unused_imports)]
pub(crate) use types::*;
#[allow(unused_imports)]
pub(crate) use util::*;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            raw_dir,
            out_dir,
            numbers,
            log_dir,
            dry_run,
        } => {
            let config = Config::resolve(raw_dir, out_dir, numbers, log_dir, dry_run);
            let mut prompt = StdinPrompt;
            let summary = match run(&config, &mut prompt) {
                Ok(summary) => summary,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            if config.dry_run {
                println!(
                    "Dry run over {} file(s): {} valid, {} rejected, {} unreadable",
                    summary.scanned, summary.enriched, summary.rejected, summary.failed
                );
            } else {
                println!(
                    "Processed {} file(s): {} enriched, {} rejected, {} failed",
                    summary.scanned, summary.enriched, summary.rejected, summary.failed
                );
            }
            Ok(())
        }

        Command::Numbers { numbers, json } => {
            let path = numbers_path(numbers);
            let genders = GenderDirectory::load(&path);
            if json {
                println!("{}", serde_json::to_string_pretty(genders.entries())?);
            } else if genders.is_empty() {
                println!("No numbers cached in {}", path.display());
            } else {
                for (number, gender) in genders.entries() {
                    println!("{number}\t{}", gender.as_str());
                }
                println!("{} number(s) cached", genders.len());
            }
            Ok(())
        }
    }
}
