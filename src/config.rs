use std::path::PathBuf;

use super::env_optional;

// Well-known names from the original export layout. A bare `convomark run`
// inside the export directory needs no flags at all.
pub(crate) const RAW_TEXTS_DIR: &str = "raw_texts";
pub(crate) const PARSED_TEXTS_DIR: &str = "parsed_texts";
pub(crate) const PHONE_NUMBER_DB_FILENAME: &str = "phoneNumbers.json";
pub(crate) const RUN_LOG_DIR: &str = "logs";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) raw_dir: PathBuf,
    pub(crate) out_dir: PathBuf,
    pub(crate) numbers_path: PathBuf,
    pub(crate) log_dir: PathBuf,
    pub(crate) dry_run: bool,
}

impl Config {
    pub(crate) fn resolve(
        raw_dir: Option<PathBuf>,
        out_dir: Option<PathBuf>,
        numbers: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        dry_run: bool,
    ) -> Config {
        Config {
            raw_dir: resolve_path(raw_dir, "CONVOMARK_RAW_DIR", RAW_TEXTS_DIR),
            out_dir: resolve_path(out_dir, "CONVOMARK_OUT_DIR", PARSED_TEXTS_DIR),
            numbers_path: resolve_path(numbers, "CONVOMARK_NUMBERS", PHONE_NUMBER_DB_FILENAME),
            log_dir: resolve_path(log_dir, "CONVOMARK_LOG_DIR", RUN_LOG_DIR),
            dry_run,
        }
    }
}

pub(crate) fn numbers_path(cli: Option<PathBuf>) -> PathBuf {
    resolve_path(cli, "CONVOMARK_NUMBERS", PHONE_NUMBER_DB_FILENAME)
}

// Precedence: CLI flag, then environment, then the well-known default.
fn resolve_path(cli: Option<PathBuf>, env_name: &str, default: &str) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Some(value) = env_optional(env_name) {
        return PathBuf::from(value);
    }
    PathBuf::from(default)
}
