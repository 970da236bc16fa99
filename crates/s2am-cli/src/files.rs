// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

fn is_csv(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".csv")
}

/// CSV files to convert. A path ending in `.csv` is taken as is; anything
/// else is scanned recursively, in file-name order. The parent directory
/// is refused.
pub fn discover_csv_files(target: &Path) -> Result<Vec<PathBuf>> {
    if target == Path::new("..") {
        bail!("It is not allowed to process the parent directory");
    }

    if is_csv(target) {
        return Ok(vec![target.to_path_buf()]);
    }

    let files: Vec<PathBuf> = WalkDir::new(target)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(target: "cli", error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_csv(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    info!(
        target: "cli",
        count = files.len(),
        dir = %target.display(),
        "discovered CSV files"
    );
    Ok(files)
}
