//! Sponsor index: invert the bill table into people_id -> sponsored bills.

use crate::error::Result;
use crate::types::BillRow;
use indexmap::IndexMap;
use std::path::Path;

/// Build the sponsor index in first-seen insertion order. The sponsors
/// column is decoded strictly; malformed stored text aborts the stage.
/// Placeholder sponsor records contribute nothing.
pub fn build_index(rows: &[BillRow]) -> Result<IndexMap<u64, Vec<u64>>> {
    let mut index: IndexMap<u64, Vec<u64>> = IndexMap::new();
    for row in rows {
        for sponsor in row.parse_sponsors()? {
            let Some(people_id) = sponsor.people_id else {
                continue;
            };
            index.entry(people_id).or_default().push(row.bill_id);
        }
    }
    Ok(index)
}

/// Persist the index pretty-printed. serde_json writes non-ASCII characters
/// literally, matching the required output encoding.
pub fn persist_index(path: &Path, index: &IndexMap<u64, Vec<u64>>) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(index)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(bill_id: u64, sponsors: &str) -> BillRow {
        BillRow {
            bill_id,
            session_id: None,
            bill_number: None,
            title: None,
            description: None,
            state: None,
            url: None,
            status: None,
            status_date: None,
            sponsors: sponsors.to_string(),
        }
    }

    #[test]
    fn inversion_preserves_insertion_order() {
        let rows = vec![
            bill(1, r#"[{"people_id": 9}]"#),
            bill(2, r#"[{"people_id": 9}, {"people_id": 5}]"#),
        ];

        let index = build_index(&rows).unwrap();
        let keys: Vec<u64> = index.keys().copied().collect();
        assert_eq!(keys, vec![9, 5]);
        assert_eq!(index[&9], vec![1, 2]);
        assert_eq!(index[&5], vec![2]);
    }

    #[test]
    fn empty_and_placeholder_sponsors_contribute_nothing() {
        let rows = vec![
            bill(1, "[]"),
            bill(2, r#"[{}, {"name": "no id"}]"#),
            bill(3, ""),
        ];
        assert!(build_index(&rows).unwrap().is_empty());
    }

    #[test]
    fn malformed_sponsor_text_aborts() {
        let rows = vec![bill(1, "[{'people_id': 9}]")];
        assert!(build_index(&rows).is_err());
    }

    #[test]
    fn persisted_index_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sponsor_index.json");
        let rows = vec![bill(1, r#"[{"people_id": 9}]"#)];

        persist_index(&path, &build_index(&rows).unwrap()).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"9\": [\n"));
    }
}
