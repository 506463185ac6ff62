//! Lyrics merge library - shared modules for the `lyrics-merge` binary.

pub mod lyrics;
pub mod metadata;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod safety;
pub mod split;
