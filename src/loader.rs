use crate::table::ResultTable;
use anyhow::Result;
use log::{debug, error, warn};
use std::{collections::BTreeMap, path::Path};
use walkdir::{DirEntry, WalkDir};

fn is_csv(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext == "csv")
            .unwrap_or(false)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

/// Load every result set under `dir`, sorted by label.
///
/// Each sub-directory is one label and all its CSV files are concatenated
/// into a single table. A sub-directory without CSV files yields an empty
/// table, which the renderer skips. Each CSV file directly under `dir` is a
/// label named after its file stem.
pub fn load_results(dir: &Path) -> Result<(Vec<String>, Vec<ResultTable>)> {
    if !dir.is_dir() {
        let reason = format!("results directory does not exist (path={})", dir.display());
        error!("{reason}");
        anyhow::bail!(reason);
    }

    let mut results = BTreeMap::<String, ResultTable>::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let reason = format!(
                "error walking results directory (path={}, error={e:?})",
                dir.display()
            );
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;
        let path = entry.path();

        let label = match entry.depth() {
            1 if entry.file_type().is_dir() => {
                if let Some(label) = file_name(path) {
                    results.entry(label).or_default();
                }
                continue;
            }
            1 if is_csv(&entry) => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string()),
            2 if is_csv(&entry) => path.parent().and_then(file_name),
            _ => None,
        };
        let Some(label) = label else {
            continue;
        };

        debug!("loading results (label={label}, file={})", path.display());
        let table = ResultTable::from_path(path)?;
        results.entry(label).or_default().append(table)?;
    }

    if results.is_empty() {
        warn!("no results found (path={})", dir.display());
    }

    Ok(results.into_iter().unzip())
}
