//! Core data models for the lyrics merge pipeline.
//!
//! This module contains the table, row and stats structs shared by the
//! metadata reader, the lyrics loader, the splitter and the CSV writer.

use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

/// Name of the column appended to the metadata table.
pub const LYRICS_COLUMN: &str = "Lyrics";

/// Fixed output file names, written inside the output directory.
pub const TRAIN_FILE: &str = "mood_train.csv";
pub const TEST_FILE: &str = "mood_test.csv";

pub const DEFAULT_SEED: u64 = 200;
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

// ============================================================================
// Metadata Models
// ============================================================================

/// The (mood, artist, title) triple a lyrics file name is derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongKey<'a> {
    pub mood: &'a str,
    pub artist: &'a str,
    pub title: &'a str,
}

/// Positions of the columns the pipeline needs within a metadata record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyColumns {
    pub mood: usize,
    pub artist: usize,
    pub title: usize,
}

/// One metadata record, identified by its position in the input file
/// (0-based, header excluded).
#[derive(Clone, Debug)]
pub struct MetadataRow {
    pub index: usize,
    pub fields: Vec<String>,
}

impl MetadataRow {
    fn field(&self, pos: usize) -> &str {
        self.fields.get(pos).map(String::as_str).unwrap_or("")
    }

    pub fn song_key(&self, columns: KeyColumns) -> SongKey<'_> {
        SongKey {
            mood: self.field(columns.mood),
            artist: self.field(columns.artist),
            title: self.field(columns.title),
        }
    }
}

/// Metadata table as read from the input CSV.
#[derive(Clone, Debug)]
pub struct MetadataTable {
    pub headers: Vec<String>,
    pub columns: KeyColumns,
    pub rows: Vec<MetadataRow>,
}

// ============================================================================
// Augmented Models
// ============================================================================

/// A metadata row that survived the lyrics lookup, with its lyrics text.
#[derive(Clone, Debug)]
pub struct AugmentedRow {
    pub row: MetadataRow,
    pub lyrics: String,
}

/// Metadata table plus the `Lyrics` column.
#[derive(Clone, Debug)]
pub struct AugmentedTable {
    pub headers: Vec<String>,
    pub rows: Vec<AugmentedRow>,
}

impl AugmentedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output header: original headers followed by the lyrics column.
    pub fn output_headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(LYRICS_COLUMN))
            .collect()
    }
}

/// Train/test partition expressed as positions into an `AugmentedTable`.
/// Train positions keep the sampling order; test positions are ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

// ============================================================================
// Configuration
// ============================================================================

/// What to do with a row whose lyrics file cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MissingPolicy {
    /// Drop the row from the augmented table and both outputs
    #[default]
    Skip,
    /// Abort the run before any output is written
    Fail,
    /// Keep the row with an empty lyrics field
    Empty,
}

/// Everything the pipeline needs for one run.
#[derive(Clone, Debug)]
pub struct MergeConfig {
    pub input: PathBuf,
    /// Raw prefix prepended to each lyrics file name; no separator is inserted.
    pub directory: String,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub train_fraction: f64,
    pub on_missing: MissingPolicy,
    pub include_index: bool,
    pub stats: Option<PathBuf>,
    pub verbose: bool,
}

impl MergeConfig {
    pub fn new(input: impl Into<PathBuf>, directory: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            directory: directory.into(),
            output_dir: PathBuf::from("."),
            seed: DEFAULT_SEED,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            on_missing: MissingPolicy::default(),
            include_index: true,
            stats: None,
            verbose: false,
        }
    }

    pub fn train_path(&self) -> PathBuf {
        self.output_dir.join(TRAIN_FILE)
    }

    pub fn test_path(&self) -> PathBuf {
        self.output_dir.join(TEST_FILE)
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Counters collected while attaching lyrics.
#[derive(Default, Debug, Clone, Serialize)]
pub struct LyricsStats {
    pub rows_total: usize,
    pub rows_with_lyrics: usize,
    pub rows_missing_lyrics: usize,
    pub rows_dropped: usize,
    pub missing_files: Vec<String>,
}

/// Summary of a full run, written with `--stats`.
#[derive(Default, Debug, Clone, Serialize)]
pub struct MergeStats {
    #[serde(flatten)]
    pub lyrics: LyricsStats,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    pub train_fraction: f64,
    pub elapsed_secs: f64,
}
