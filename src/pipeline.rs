//! End-to-end merge run: read metadata, attach lyrics, split, write.

use crate::lyrics::attach_lyrics;
use crate::metadata::{count_data_rows, read_metadata};
use crate::models::{MergeConfig, MergeStats};
use crate::output::{write_stats, write_table};
use crate::progress::{create_spinner, format_duration};
use crate::safety::validate_output_paths;
use crate::split::{train_test_split, validate_fraction};
use anyhow::{Context, Result};
use std::time::Instant;

/// Run the whole pipeline. No output file is touched until every row has
/// been processed, so a failed lookup under `MissingPolicy::Fail` leaves
/// the output directory unchanged.
pub fn run(config: &MergeConfig) -> Result<MergeStats> {
    let start = Instant::now();

    validate_fraction(config.train_fraction)?;
    let train_path = config.train_path();
    let test_path = config.test_path();
    validate_output_paths(&config.input, &train_path, &test_path)?;

    println!("Reading metadata: {:?}", config.input);
    let total = count_data_rows(&config.input)?;
    let spinner = create_spinner("Phase 1: Reading metadata");
    let table = read_metadata(&config.input)?;
    spinner.finish_with_message(format!("Phase 1: Read {} metadata rows", table.rows.len()));

    let (augmented, lyrics_stats) = attach_lyrics(
        table,
        &config.directory,
        config.on_missing,
        total,
        config.verbose,
    )?;

    let split = train_test_split(augmented.len(), config.train_fraction, config.seed)?;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    let spinner = create_spinner("Phase 3: Writing splits");
    write_table(&train_path, &augmented, &split.train, config.include_index)?;
    write_table(&test_path, &augmented, &split.test, config.include_index)?;
    spinner.finish_with_message(format!(
        "Phase 3: Wrote {} train / {} test rows",
        split.train.len(),
        split.test.len()
    ));

    let elapsed = start.elapsed();
    let stats = MergeStats {
        lyrics: lyrics_stats,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        seed: config.seed,
        train_fraction: config.train_fraction,
        elapsed_secs: elapsed.as_secs_f64(),
    };

    if let Some(ref path) = config.stats {
        write_stats(path, &stats)?;
    }

    println!("\n{:=<60}", "");
    println!("Merge complete!");
    println!("  Rows: {}", stats.lyrics.rows_total);
    println!("  With lyrics: {}", stats.lyrics.rows_with_lyrics);
    println!("  Missing lyrics: {}", stats.lyrics.rows_missing_lyrics);
    println!("  Train: {} -> {}", stats.train_rows, train_path.display());
    println!("  Test: {} -> {}", stats.test_rows, test_path.display());
    println!("  Elapsed: {}", format_duration(elapsed));
    println!("{:=<60}", "");

    Ok(stats)
}
