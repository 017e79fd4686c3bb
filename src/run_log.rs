use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::RunLogEntry;

pub(crate) fn run_log_path(log_dir: &Path) -> PathBuf {
    let date_str = Utc::now().format("%Y-%m-%d");
    log_dir.join(format!("run-{}.jsonl", date_str))
}

pub(crate) fn append_run_log(
    log_dir: &Path,
    entry: &RunLogEntry,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(log_dir)?;
    let path = run_log_path(log_dir);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{}", json)?;
    Ok(())
}
