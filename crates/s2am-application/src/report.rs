// SPDX-License-Identifier: GPL-3.0-or-later

//! Result files written after each playlist.

use chrono::NaiveDateTime;
use s2am_domain::{AddResult, RunResult, SearchStatus, TrackRecord};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// `<stem>_<kind>_<timestamp>.<extension>`
fn report_file_name(csv_path: &Path, kind: &str, extension: &str, now: NaiveDateTime) -> String {
    let stem = csv_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_{kind}_{}.{extension}", now.format(TIMESTAMP_FORMAT))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write the full run as a pretty-printed JSON array into `results_dir`,
/// creating it if needed. Falls back to the CSV's own directory when
/// `results_dir` cannot be created. Returns the written path.
pub fn write_json_results(
    run: &RunResult,
    csv_path: &Path,
    results_dir: &Path,
    now: NaiveDateTime,
) -> ReportResult<PathBuf> {
    let dir = match fs::create_dir_all(results_dir) {
        Ok(()) => results_dir.to_path_buf(),
        Err(e) => {
            warn!(
                target: "report",
                dir = %results_dir.display(),
                error = %e,
                "cannot create results directory, writing next to the CSV"
            );
            csv_path.parent().map(Path::to_path_buf).unwrap_or_default()
        }
    };
    let path = dir.join(report_file_name(csv_path, "results", "json", now));

    let file = File::create(&path).map_err(io_error(&path))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    run.serialize(&mut serializer)?;
    writer.flush().map_err(io_error(&path))?;

    info!(target: "report", path = %path.display(), "wrote full results");
    Ok(path)
}

/// Whether a record belongs in the failure log: a new match that was not
/// added, or a track that was not found at all. Duplicates are not failures.
pub fn is_failure(record: &TrackRecord) -> bool {
    match record.search_status {
        Some(SearchStatus::Ok) => record.result != Some(AddResult::Added),
        Some(SearchStatus::Duplicate) => false,
        _ => true,
    }
}

pub fn failure_entries(run: &RunResult) -> Vec<&TrackRecord> {
    run.records().iter().filter(|record| is_failure(record)).collect()
}

fn failure_line(record: &TrackRecord) -> String {
    fn or_unknown<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_else(|| "UNKNOWN".to_string())
    }

    format!(
        "{} | {} | {} (Search Status: {} | Adding to Playlist: {})",
        record.query.title,
        record.query.artist,
        record.query.album,
        or_unknown(record.search_status),
        or_unknown(record.result),
    )
}

/// Write one line per failed track next to the CSV. Nothing is written for
/// an empty list; `Ok(None)` is returned instead.
pub fn write_failure_log(
    entries: &[&TrackRecord],
    csv_path: &Path,
    now: NaiveDateTime,
) -> ReportResult<Option<PathBuf>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let file_name = report_file_name(csv_path, "failure", "txt", now);
    let path = csv_path.with_file_name(file_name);

    let file = File::create(&path).map_err(io_error(&path))?;
    let mut writer = BufWriter::new(file);
    for record in entries {
        writeln!(writer, "{}", failure_line(record)).map_err(io_error(&path))?;
    }
    writer.flush().map_err(io_error(&path))?;

    info!(target: "report", path = %path.display(), failures = entries.len(), "wrote failure log");
    Ok(Some(path))
}
