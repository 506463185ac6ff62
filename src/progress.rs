//! Progress bar and logging utilities.
//!
//! The merge loop reports through an `indicatif` bar whose message carries the
//! running error count. In log-only mode the bar is hidden and periodic lines
//! go to stderr instead, which keeps redirected output readable.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Rows between log lines in log-only mode.
pub const LOG_INTERVAL: u64 = 1_000;

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Status line shown next to the merge bar.
pub fn error_status(errors: usize) -> String {
    format!("Errors encountered: {}", errors)
}

/// Create the row progress bar. `prefix` names the phase, the message is
/// updated with the error count as rows are processed.
pub fn create_progress_bar(len: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] [{bar:60.cyan/blue}] {percent}% ...{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
    }
    pb.set_prefix(prefix.to_string());
    pb.set_message(error_status(0));
    pb
}

/// Log line for `current` of `total`, or `None` between intervals.
pub fn progress_line(phase: &str, current: u64, total: u64, errors: usize) -> Option<String> {
    if total == 0 || (current % LOG_INTERVAL != 0 && current != total) {
        return None;
    }
    let pct = 100.0 * current as f64 / total as f64;
    Some(format!(
        "[{}] {}/{} ({:.1}%) {}",
        phase,
        current,
        total,
        pct,
        error_status(errors)
    ))
}

/// Log progress periodically for tail-friendly output.
/// Only logs when in log-only mode and at specified intervals.
pub fn log_progress(phase: &str, current: u64, total: u64, errors: usize) {
    if !is_log_only() {
        return;
    }
    if let Some(line) = progress_line(phase, current, total, errors) {
        eprintln!("{}", line);
    }
}

/// Create a spinner for the phases without a row count (reading, writing).
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_spinner()
            .template("{msg} {spinner} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(msg.to_string());
    pb
}
