//! Metadata CSV reading.

use crate::models::{KeyColumns, MetadataRow, MetadataTable};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of data rows in a metadata file: line count minus the header line.
/// Only used as a progress total, so quoted multi-line fields are not special-cased.
pub fn count_data_rows(path: &Path) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open metadata file {}", path.display()))?;
    let mut lines = 0usize;
    for line in BufReader::new(file).lines() {
        line.with_context(|| format!("Failed to read metadata file {}", path.display()))?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}

fn find_column(headers: &[String], name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow!("Metadata file {} has no '{}' column", path.display(), name))
}

/// Read the whole metadata table into memory.
pub fn read_metadata(path: &Path) -> Result<MetadataTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open metadata file {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let columns = KeyColumns {
        mood: find_column(&headers, "mood", path)?,
        artist: find_column(&headers, "artist", path)?,
        title: find_column(&headers, "title", path)?,
    };

    let mut rows = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to parse row {} of {}", index + 1, path.display()))?;
        rows.push(MetadataRow {
            index,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(MetadataTable {
        headers,
        columns,
        rows,
    })
}
