//! Selection of input trajectory files `<in_folder>/<in_prefix><n>.txt`.

use std::path::{Path, PathBuf};

use lsim_core::errors::{ErrorInfo, LsimError};
use serde::{Deserialize, Serialize};
use tracing::info;
use walkdir::WalkDir;

/// Set of admissible trajectory numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileRange {
    /// Every numbered file.
    All,
    /// Union of inclusive `(low, high)` ranges.
    Ranges(Vec<(i64, i64)>),
}

impl FileRange {
    /// Parses `0-999` or `0-99,200-299`.
    ///
    /// An empty string selects every file. Segments that are not exactly two
    /// integers separated by `-` are skipped.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return FileRange::All;
        }
        let ranges = text
            .split(',')
            .filter_map(|segment| {
                let bounds: Vec<i64> = segment
                    .split('-')
                    .map(|bound| bound.trim().parse::<i64>())
                    .collect::<Result<_, _>>()
                    .ok()?;
                match bounds.as_slice() {
                    [low, high] => Some((*low, *high)),
                    _ => None,
                }
            })
            .collect();
        FileRange::Ranges(ranges)
    }

    /// Returns `true` when `number` lies in any range.
    pub fn contains(&self, number: i64) -> bool {
        match self {
            FileRange::All => true,
            FileRange::Ranges(ranges) => ranges
                .iter()
                .any(|(low, high)| *low <= number && number <= *high),
        }
    }
}

/// Lists the trajectory files of `in_folder` selected by `range`, sorted by
/// path.
pub fn discover_inputs(
    in_folder: &Path,
    in_prefix: &str,
    range: &FileRange,
) -> Result<Vec<PathBuf>, LsimError> {
    let mut total = 0usize;
    let mut selected = Vec::new();
    for entry in WalkDir::new(in_folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| match err.io_error() {
            Some(io) => LsimError::from_read("stage.inputs", in_folder, io),
            None => LsimError::FileUnreadable(
                ErrorInfo::new("stage.inputs", err.to_string())
                    .with_context("path", in_folder.display().to_string()),
            ),
        })?;
        total += 1;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if let Some(number) = trajectory_number(name, in_prefix) {
            if range.contains(number) {
                selected.push(entry.into_path());
            }
        }
    }
    selected.sort();
    info!(
        folder = %in_folder.display(),
        found = total,
        valid = selected.len(),
        "selected input trajectories"
    );
    Ok(selected)
}

fn trajectory_number(name: &str, prefix: &str) -> Option<i64> {
    let digits = name.strip_prefix(prefix)?.strip_suffix(".txt")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
