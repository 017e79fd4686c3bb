use std::path::{Path, PathBuf};

use chrono::Utc;
use walkdir::WalkDir;

use super::{
    append_run_log, enrich_table, is_csv_file, validate_batch, Config, EnrichError,
    GenderDirectory, Prompt, RawTable, RunLogEntry,
};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) scanned: usize,
    pub(crate) enriched: usize,
    pub(crate) rejected: usize,
    pub(crate) failed: usize,
}

/// Process every .csv under the raw directory, one file at a time. Each file
/// is read, enriched (blocking on the operator for unknown numbers), and
/// written to the mirrored path under the output directory; the gender
/// directory is saved after every batch. All errors are scoped to the file
/// they hit — only a missing raw directory or a dead prompt ends the run.
pub(crate) fn run(
    config: &Config,
    prompt: &mut dyn Prompt,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    if !config.raw_dir.is_dir() {
        return Err(format!(
            "Error reading the {} directory: not a directory",
            config.raw_dir.display()
        )
        .into());
    }

    let mut genders = GenderDirectory::load(&config.numbers_path);
    let mut summary = RunSummary::default();

    println!("Reading directory...");

    for path in csv_files(&config.raw_dir) {
        summary.scanned += 1;
        let relative = path
            .strip_prefix(&config.raw_dir)
            .unwrap_or(&path)
            .to_path_buf();
        let rel_name = relative.to_string_lossy().into_owned();

        let table = match RawTable::read(&path) {
            Ok(table) => table,
            Err(err) => {
                eprintln!("Error reading file {}: {err}", path.display());
                summary.failed += 1;
                log_outcome(config, &rel_name, "read-failed", 0, Some(err.to_string()));
                continue;
            }
        };

        if config.dry_run {
            match validate_batch(&table) {
                Ok(rows) => {
                    println!("{rel_name}: ok ({rows} row(s))");
                    summary.enriched += 1;
                }
                Err(err) => {
                    eprintln!("{rel_name}: {err}");
                    summary.rejected += 1;
                }
            }
            continue;
        }

        match enrich_table(&table, &mut genders, prompt) {
            Ok(enriched) => {
                let out_path = config.out_dir.join(&relative);
                match enriched.write(&out_path) {
                    Ok(()) => {
                        println!("Saved file: {}", out_path.display());
                        summary.enriched += 1;
                        log_outcome(config, &rel_name, "enriched", enriched.rows.len(), None);
                    }
                    Err(err) => {
                        eprintln!("Error saving file {}: {err}", out_path.display());
                        summary.failed += 1;
                        log_outcome(config, &rel_name, "write-failed", 0, Some(err.to_string()));
                    }
                }
            }
            Err(EnrichError::Prompt(err)) => {
                // No operator, no progress: every remaining file would block
                // on the same prompt. Keep what was already learned.
                save_genders(&genders, config);
                return Err(Box::new(EnrichError::Prompt(err)));
            }
            Err(err) => {
                eprintln!("Error in {}: {err}", path.display());
                eprintln!("Skipping this conversation.");
                summary.rejected += 1;
                log_outcome(config, &rel_name, "rejected", 0, Some(err.to_string()));
            }
        }

        save_genders(&genders, config);
    }

    Ok(summary)
}

fn save_genders(genders: &GenderDirectory, config: &Config) {
    if let Err(err) = genders.save(&config.numbers_path) {
        eprintln!("Error saving phone number database: {err}");
    }
}

fn log_outcome(config: &Config, file: &str, outcome: &str, rows: usize, detail: Option<String>) {
    let entry = RunLogEntry {
        ts_utc: Utc::now().timestamp(),
        file: file.to_string(),
        outcome: outcome.to_string(),
        rows,
        detail,
    };
    if let Err(err) = append_run_log(&config.log_dir, &entry) {
        eprintln!("Error writing run log: {err}");
    }
}

// Sorted traversal keeps prompt order (and therefore runs) reproducible.
fn csv_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_csv_file(path))
        .collect()
}
