use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use super::{Gender, Prompt};

/// Phone number -> gender cache. Loaded once per run, mutated in memory as
/// numbers are resolved, saved back after each batch.
#[derive(Debug, Default)]
pub(crate) struct GenderDirectory {
    numbers: BTreeMap<String, Gender>,
}

impl GenderDirectory {
    /// Load the persisted mapping. A missing, unreadable, or corrupt file
    /// degrades to an empty directory; the run then asks the operator about
    /// every number it meets.
    pub(crate) fn load(path: &Path) -> GenderDirectory {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("Error loading the phone number database: {err}");
                return GenderDirectory::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(numbers) => GenderDirectory { numbers },
            Err(err) => {
                eprintln!("Error parsing the phone number database: {err}");
                GenderDirectory::default()
            }
        }
    }

    /// Serialize the full mapping over `path` (temp file + rename). The
    /// caller reports failures; outputs already written stay valid.
    pub(crate) fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.numbers)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Cache-first gender lookup. On a miss, asks the operator and keeps
    /// asking about the same number until the answer is `m` or `f`; invalid
    /// answers never touch the cache. Blocks the run until an answer is
    /// obtained; a prompt I/O error (stdin closed) is the only way out
    /// without one.
    pub(crate) fn resolve(&mut self, number: &str, prompt: &mut dyn Prompt) -> io::Result<Gender> {
        if let Some(gender) = self.numbers.get(number) {
            return Ok(*gender);
        }
        loop {
            let answer = prompt.ask(number)?;
            match Gender::parse(&answer) {
                Some(gender) => {
                    self.numbers.insert(number.to_string(), gender);
                    return Ok(gender);
                }
                None => {
                    eprintln!("Please enter m or f.");
                }
            }
        }
    }

    pub(crate) fn entries(&self) -> &BTreeMap<String, Gender> {
        &self.numbers
    }

    pub(crate) fn len(&self) -> usize {
        self.numbers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, number: &str) -> Option<Gender> {
        self.numbers.get(number).copied()
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, number: &str, gender: Gender) {
        self.numbers.insert(number.to_string(), gender);
    }
}
