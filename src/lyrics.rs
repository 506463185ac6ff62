//! Lyrics file lookup and the merge loop that appends the `Lyrics` column.

use crate::models::{
    AugmentedRow, AugmentedTable, LyricsStats, MetadataRow, MetadataTable, MissingPolicy, SongKey,
};
use crate::progress::{create_progress_bar, error_status, is_log_only, log_progress};
use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::Read;

const MERGE_PHASE: &str = "Phase 2: Merging lyrics";

/// Expected lyrics file name for a song.
///
/// `directory` is a plain prefix: no path separator is inserted, so
/// `"./lyrics/"` yields `./lyrics/happy_beatles_here` while `"./lyrics"`
/// yields `./lyricshappy_beatles_here`.
pub fn lyrics_path(directory: &str, key: &SongKey<'_>) -> String {
    format!("{}{}_{}_{}", directory, key.mood, key.artist, key.title)
}

/// Translate `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Row dump printed in verbose mode.
pub fn row_summary(headers: &[String], row: &MetadataRow) -> String {
    let fields: Vec<String> = headers
        .iter()
        .zip(row.fields.iter())
        .map(|(h, v)| format!("{}: {}", h, v))
        .collect();
    format!("[row {}] {}", row.index, fields.join(", "))
}

/// Read a lyrics file as text, with line endings translated to `\n`.
///
/// Returns `Ok(None)` when the file cannot be opened. A file that opens but
/// cannot be read (e.g. invalid UTF-8) is an error.
pub fn read_lyrics(name: &str) -> Result<Option<String>> {
    let mut file = match File::open(name) {
        Ok(f) => f,
        Err(_) => return Ok(None),
    };
    let mut text = String::new();
    file.read_to_string(&mut text)
        .with_context(|| format!("Failed to read lyrics file {}", name))?;
    Ok(Some(normalize_newlines(&text)))
}

fn report(pb: &ProgressBar, line: String) {
    if is_log_only() || pb.is_hidden() {
        println!("{}", line);
    } else {
        pb.println(line);
    }
}

/// Walk every metadata row in order, look up its lyrics file and build the
/// augmented table according to `policy`.
///
/// `total` is only the progress bar length; the loop always covers every row.
pub fn attach_lyrics(
    table: MetadataTable,
    directory: &str,
    policy: MissingPolicy,
    total: usize,
    verbose: bool,
) -> Result<(AugmentedTable, LyricsStats)> {
    let pb = create_progress_bar(total as u64, MERGE_PHASE);
    let columns = table.columns;
    let mut stats = LyricsStats {
        rows_total: table.rows.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(table.rows.len());

    for (processed, row) in table.rows.into_iter().enumerate() {
        if verbose {
            report(&pb, row_summary(&table.headers, &row));
        }

        let name = lyrics_path(directory, &row.song_key(columns));
        match read_lyrics(&name)? {
            Some(lyrics) => {
                stats.rows_with_lyrics += 1;
                rows.push(AugmentedRow { row, lyrics });
            }
            None => {
                report(&pb, format!("No lyrics for: {}", name));
                stats.rows_missing_lyrics += 1;
                stats.missing_files.push(name.clone());
                pb.set_message(error_status(stats.rows_missing_lyrics));

                match policy {
                    MissingPolicy::Skip => stats.rows_dropped += 1,
                    MissingPolicy::Empty => rows.push(AugmentedRow {
                        row,
                        lyrics: String::new(),
                    }),
                    MissingPolicy::Fail => {
                        pb.abandon();
                        bail!("No lyrics for: {} (row {})", name, row.index);
                    }
                }
            }
        }

        pb.inc(1);
        log_progress(
            MERGE_PHASE,
            (processed + 1) as u64,
            total as u64,
            stats.rows_missing_lyrics,
        );
    }

    pb.finish_with_message(format!(
        "{} rows merged, {}",
        rows.len(),
        error_status(stats.rows_missing_lyrics)
    ));

    Ok((
        AugmentedTable {
            headers: table.headers,
            rows,
        },
        stats,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyColumns;
    use crate::progress::set_log_only;
    use std::fs;
    use tempfile::TempDir;

    fn key<'a>(mood: &'a str, artist: &'a str, title: &'a str) -> SongKey<'a> {
        SongKey { mood, artist, title }
    }

    fn table(rows: &[(&str, &str, &str)]) -> MetadataTable {
        MetadataTable {
            headers: vec!["mood".into(), "artist".into(), "title".into()],
            columns: KeyColumns { mood: 0, artist: 1, title: 2 },
            rows: rows
                .iter()
                .enumerate()
                .map(|(index, (m, a, t))| MetadataRow {
                    index,
                    fields: vec![m.to_string(), a.to_string(), t.to_string()],
                })
                .collect(),
        }
    }

    fn prefix(dir: &TempDir) -> String {
        format!("{}/", dir.path().display())
    }

    #[test]
    fn test_lyrics_path_concatenates_without_separator() {
        assert_eq!(
            lyrics_path("./lyrics/", &key("happy", "beatles", "here")),
            "./lyrics/happy_beatles_here"
        );
        assert_eq!(
            lyrics_path("./lyrics", &key("happy", "beatles", "here")),
            "./lyricshappy_beatles_here"
        );
        assert_eq!(lyrics_path("", &key("sad", "adele", "hello")), "sad_adele_hello");
    }

    #[test]
    fn test_read_lyrics_missing_file() {
        assert!(read_lyrics("/nonexistent/happy_beatles_here").unwrap().is_none());
    }

    #[test]
    fn test_read_lyrics_full_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("happy_beatles_here");
        fs::write(&path, "line one\nline two\n").unwrap();
        let text = read_lyrics(path.to_str().unwrap()).unwrap();
        assert_eq!(text.as_deref(), Some("line one\nline two\n"));
    }

    #[test]
    fn test_read_lyrics_translates_crlf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("happy_beatles_here");
        fs::write(&path, "line one\r\nline two\r\nold mac\rend").unwrap();
        let text = read_lyrics(path.to_str().unwrap()).unwrap();
        assert_eq!(text.as_deref(), Some("line one\nline two\nold mac\nend"));
    }

    #[test]
    fn test_row_summary() {
        let headers = vec!["mood".to_string(), "artist".to_string(), "title".to_string()];
        let row = MetadataRow {
            index: 4,
            fields: vec!["happy".into(), "beatles".into(), "here".into()],
        };
        assert_eq!(
            row_summary(&headers, &row),
            "[row 4] mood: happy, artist: beatles, title: here"
        );
    }

    #[test]
    fn test_attach_lyrics_log_only_verbose() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("happy_a_one"), "first").unwrap();

        set_log_only(true);
        let result = attach_lyrics(
            table(&[("happy", "a", "one"), ("sad", "b", "two")]),
            &prefix(&dir),
            MissingPolicy::Skip,
            2,
            true,
        );
        set_log_only(false);

        let (augmented, stats) = result.unwrap();
        assert_eq!(augmented.len(), 1);
        assert_eq!(augmented.rows[0].lyrics, "first");
        assert_eq!(stats.rows_missing_lyrics, 1);
        assert_eq!(stats.rows_dropped, 1);
    }

    #[test]
    fn test_read_lyrics_invalid_utf8_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(read_lyrics(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_attach_lyrics_all_present() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("happy_a_one"), "first").unwrap();
        fs::write(dir.path().join("sad_b_two"), "second").unwrap();

        let (augmented, stats) = attach_lyrics(
            table(&[("happy", "a", "one"), ("sad", "b", "two")]),
            &prefix(&dir),
            MissingPolicy::Skip,
            2,
            false,
        )
        .unwrap();

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented.rows[0].lyrics, "first");
        assert_eq!(augmented.rows[1].lyrics, "second");
        assert_eq!(stats.rows_with_lyrics, 2);
        assert_eq!(stats.rows_missing_lyrics, 0);
    }

    #[test]
    fn test_attach_lyrics_skip_drops_missing_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("happy_a_one"), "first").unwrap();
        fs::write(dir.path().join("angry_c_three"), "third").unwrap();

        let (augmented, stats) = attach_lyrics(
            table(&[("happy", "a", "one"), ("sad", "b", "two"), ("angry", "c", "three")]),
            &prefix(&dir),
            MissingPolicy::Skip,
            3,
            false,
        )
        .unwrap();

        let indices: Vec<usize> = augmented.rows.iter().map(|r| r.row.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(augmented.rows[1].lyrics, "third");
        assert_eq!(stats.rows_missing_lyrics, 1);
        assert_eq!(stats.rows_dropped, 1);
        assert_eq!(stats.missing_files, vec![format!("{}sad_b_two", prefix(&dir))]);
    }

    #[test]
    fn test_attach_lyrics_empty_keeps_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("happy_a_one"), "first").unwrap();

        let (augmented, stats) = attach_lyrics(
            table(&[("happy", "a", "one"), ("sad", "b", "two")]),
            &prefix(&dir),
            MissingPolicy::Empty,
            2,
            false,
        )
        .unwrap();

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented.rows[1].lyrics, "");
        assert_eq!(stats.rows_missing_lyrics, 1);
        assert_eq!(stats.rows_dropped, 0);
    }

    #[test]
    fn test_attach_lyrics_fail_aborts() {
        let dir = TempDir::new().unwrap();
        let result = attach_lyrics(
            table(&[("sad", "b", "two")]),
            &prefix(&dir),
            MissingPolicy::Fail,
            1,
            false,
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No lyrics for"));
    }
}
