//! Archive extraction for freshly fetched datasets.
//!
//! Archives are matched by fingerprint against the current run's persisted
//! hash set, only the bill-record subtree is extracted (in-process, no
//! subprocess), and every dataset archive is deleted afterwards to keep the
//! data directory bounded.

use crate::config::Config;
use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Extract the bill subtree from every archive whose file name contains one
/// of the given hashes, then remove all dataset archives. Returns the number
/// of bill files written.
///
/// Extraction overwrites in place, so re-running against already-extracted
/// data is safe.
pub fn extract_changed(config: &Config, hashes: &[String]) -> Result<usize> {
    let bill_entry = Regex::new(&format!(
        r"^{}/[0-9]{{4}}-[0-9]{{4}}_[0-9]{{3}}th_Congress/bill/[^/]+\.json$",
        regex::escape(&config.state)
    ))?;
    let hashes: Vec<String> = hashes
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
        .collect();

    let mut extracted = 0;
    for entry in fs::read_dir(&config.data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(".zip") {
            continue;
        }
        let lower = name.to_lowercase();
        if !hashes.iter().any(|h| lower.contains(h)) {
            continue;
        }
        info!(archive = %name, "extracting bill records");
        extracted += extract_archive(&entry.path(), &config.data_dir, &bill_entry)?;
    }

    remove_dataset_archives(config)?;
    Ok(extracted)
}

fn extract_archive(path: &Path, dest: &Path, bill_entry: &Regex) -> Result<usize> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !bill_entry.is_match(entry.name()) {
            continue;
        }
        // Reject entries that would escape the destination
        let rel = match entry.enclosed_name() {
            Some(p) => p.to_path_buf(),
            None => continue,
        };
        let out_path = dest.join(rel);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;
        written += 1;
    }
    debug!(archive = %path.display(), written, "archive done");
    Ok(written)
}

/// Delete every file matching the fetcher's archive naming convention,
/// whether or not it matched a current hash.
fn remove_dataset_archives(config: &Config) -> Result<()> {
    let archive_name = Regex::new(&format!(
        r"^{}_[0-9]+_data_d.*\.zip$",
        regex::escape(&config.state)
    ))?;

    for entry in fs::read_dir(&config.data_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if archive_name.is_match(&name) {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use std::io::Write;
    use zip::write::FileOptions;

    fn write_fixture_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, body) in entries {
            writer
                .start_file(name.to_string(), FileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn bill_json(id: u64) -> String {
        format!(r#"{{"bill": {{"bill_id": {}, "title": "T"}}}}"#, id)
    }

    #[test]
    fn extracts_only_bill_subtree_and_removes_archives() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).build().unwrap();

        let zip_path = config.archive_path(2041, "abc123");
        let body = bill_json(1);
        write_fixture_zip(
            &zip_path,
            &[
                ("US/2023-2024_118th_Congress/bill/HB1.json", body.as_str()),
                ("US/2023-2024_118th_Congress/vote/V1.json", "{}"),
                ("US/2023-2024_118th_Congress/people/P1.json", "{}"),
            ],
        );

        let written = extract_changed(&config, &["abc123".to_string()]).unwrap();
        assert_eq!(written, 1);
        assert!(dir
            .path()
            .join("US/2023-2024_118th_Congress/bill/HB1.json")
            .exists());
        assert!(!dir
            .path()
            .join("US/2023-2024_118th_Congress/vote/V1.json")
            .exists());
        // archive cleanup ran
        assert!(!zip_path.exists());
    }

    #[test]
    fn skips_archives_with_unrelated_hashes_but_still_deletes_them() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).build().unwrap();

        let zip_path = config.archive_path(2000, "stalehash");
        let body = bill_json(9);
        write_fixture_zip(
            &zip_path,
            &[("US/2019-2020_116th_Congress/bill/HB9.json", body.as_str())],
        );

        let written = extract_changed(&config, &["abc123".to_string()]).unwrap();
        assert_eq!(written, 0);
        assert!(!dir
            .path()
            .join("US/2019-2020_116th_Congress/bill/HB9.json")
            .exists());
        assert!(!zip_path.exists());
    }

    #[test]
    fn re_extraction_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).build().unwrap();
        let entries = [(
            "US/2023-2024_118th_Congress/bill/HB1.json",
            bill_json(1),
        )];
        let entries: Vec<(&str, &str)> =
            entries.iter().map(|(n, b)| (*n, b.as_str())).collect();

        for _ in 0..2 {
            let zip_path = config.archive_path(2041, "abc123");
            write_fixture_zip(&zip_path, &entries);
            extract_changed(&config, &["abc123".to_string()]).unwrap();
        }

        let extracted = dir.path().join("US/2023-2024_118th_Congress/bill");
        let files: Vec<_> = fs::read_dir(&extracted).unwrap().collect();
        assert_eq!(files.len(), 1);
        let body =
            fs::read_to_string(extracted.join("HB1.json")).unwrap();
        assert_eq!(body, bill_json(1));
    }

    #[test]
    fn hash_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).build().unwrap();
        let zip_path = config.archive_path(2041, "ABC123");
        let body = bill_json(1);
        write_fixture_zip(
            &zip_path,
            &[("US/2023-2024_118th_Congress/bill/HB1.json", body.as_str())],
        );

        let written = extract_changed(&config, &["abc123".to_string()]).unwrap();
        assert_eq!(written, 1);
    }
}
