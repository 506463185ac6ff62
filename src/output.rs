//! CSV and stats writers.

use crate::models::{AugmentedTable, MergeStats};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the rows at `positions` of `table` to a CSV file.
///
/// With `include_index` the first column has an empty header and holds each
/// row's position in the input metadata file.
pub fn write_table(
    path: &Path,
    table: &AugmentedTable,
    positions: &[usize],
    include_index: bool,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header: Vec<&str> = Vec::with_capacity(table.headers.len() + 2);
    if include_index {
        header.push("");
    }
    header.extend(table.output_headers());
    wtr.write_record(&header)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;

    for &pos in positions {
        let augmented = &table.rows[pos];
        let index = augmented.row.index.to_string();
        let record = include_index
            .then_some(index.as_str())
            .into_iter()
            .chain(augmented.row.fields.iter().map(String::as_str))
            .chain(std::iter::once(augmented.lyrics.as_str()));
        wtr.write_record(record)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write run stats as pretty-printed JSON.
pub fn write_stats(path: &Path, stats: &MergeStats) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create stats file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, stats)
        .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
