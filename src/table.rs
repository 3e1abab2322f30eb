//! Cumulative bill table: walk the extracted tree, flatten records, merge.

use crate::config::{self, Config};
use crate::error::Result;
use crate::types::BillRow;
use jwalk::WalkDir;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Parse every bill record under `<data_dir>/<state>/<congress-session>/bill`
/// into rows. Malformed files are logged and skipped, never fatal.
pub fn collect_rows(config: &Config) -> Result<Vec<BillRow>> {
    let state_dir = config.state_dir();
    if !state_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions: Vec<PathBuf> = std::fs::read_dir(&state_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .map(|name| config::is_congress_dir(&name.to_string_lossy()))
                    .unwrap_or(false)
        })
        .collect();
    sessions.sort();

    let mut rows = Vec::new();
    for session in sessions {
        info!(session = %session.display(), "processing congress session");
        let bill_dir = session.join("bill");
        if !bill_dir.exists() {
            continue;
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&bill_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        files.sort();

        for file in files {
            match parse_bill_file(&file) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(file = %file.display(), error = %e, "skipping bill record"),
            }
        }
    }
    Ok(rows)
}

fn parse_bill_file(path: &Path) -> Result<BillRow> {
    let contents = std::fs::read_to_string(path)?;
    let doc: serde_json::Value = serde_json::from_str(&contents)?;
    BillRow::from_bill_json(&doc)
}

/// Merge new rows with the prior table, new rows first, dropping duplicate
/// bill_ids after the first occurrence. New data therefore wins on conflict.
pub fn merge_rows(new_rows: Vec<BillRow>, prior_rows: Vec<BillRow>) -> Vec<BillRow> {
    let mut seen = HashSet::new();
    new_rows
        .into_iter()
        .chain(prior_rows)
        .filter(|row| seen.insert(row.bill_id))
        .collect()
}

/// Read the cumulative table; an absent file is the first-run condition
pub fn load_table(path: &Path) -> Result<Vec<BillRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Overwrite the cumulative table, header included
pub fn save_table(path: &Path, rows: &[BillRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Full builder stage: collect new rows, merge with the existing table, and
/// persist. Returns the merged row count.
pub fn build_and_persist(config: &Config) -> Result<usize> {
    let new_rows = collect_rows(config)?;
    let prior_rows = load_table(&config.table_path())?;
    let merged = merge_rows(new_rows, prior_rows);
    save_table(&config.table_path(), &merged)?;
    Ok(merged.len())
}
