use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

/// A CSV file held in memory: one header row plus data rows, all strings.
/// Columns are identified by header name, never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl RawTable {
    pub(crate) fn read(path: &Path) -> Result<RawTable, Box<dyn std::error::Error>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
            // Ragged exports happen; keep every row at header width.
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        Ok(RawTable { headers, rows })
    }

    /// Write the table, creating parent directories as needed. The csv writer
    /// quotes any field containing the delimiter, quotes, or line breaks.
    pub(crate) fn write(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub(crate) fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
