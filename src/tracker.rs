//! Change detection over listed datasets.

use crate::error::Result;
use crate::store::ChangeStore;
use crate::types::DatasetDescriptor;
use std::collections::HashSet;

/// Return the datasets whose hash is new relative to the persisted
/// fingerprint set, and persist the current full set as a side effect.
///
/// With no prior state every dataset is treated as changed. An empty result
/// is the normal "nothing to do" termination path, not a failure.
pub fn select_changed(
    store: &dyn ChangeStore,
    datasets: &[DatasetDescriptor],
) -> Result<Vec<DatasetDescriptor>> {
    let current: Vec<String> = datasets.iter().map(|d| d.dataset_hash.clone()).collect();
    let prior = store.load()?;
    store.save(&current)?;

    match prior {
        None => Ok(datasets.to_vec()),
        Some(prior) => {
            let prior: HashSet<&str> = prior.iter().map(String::as_str).collect();
            Ok(datasets
                .iter()
                .filter(|d| !prior.contains(d.dataset_hash.as_str()))
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryChangeStore;

    fn descriptor(session_id: u64, hash: &str) -> DatasetDescriptor {
        DatasetDescriptor {
            session_id,
            session_title: format!("Session {}", session_id),
            access_key: "key".to_string(),
            dataset_hash: hash.to_string(),
        }
    }

    #[test]
    fn first_run_selects_everything_and_persists() {
        let store = MemoryChangeStore::new();
        let datasets = vec![descriptor(1, "aaa"), descriptor(2, "bbb")];

        let changed = select_changed(&store, &datasets).unwrap();
        assert_eq!(changed.len(), 2);
        assert_eq!(
            store.load().unwrap(),
            Some(vec!["aaa".to_string(), "bbb".to_string()])
        );
    }

    #[test]
    fn selection_is_set_difference_by_hash() {
        let store = MemoryChangeStore::with_state(vec!["aaa".to_string(), "bbb".to_string()]);
        let datasets = vec![
            descriptor(1, "aaa"),
            descriptor(2, "bbb2"),
            descriptor(3, "ccc"),
        ];

        let changed = select_changed(&store, &datasets).unwrap();
        let sessions: Vec<u64> = changed.iter().map(|d| d.session_id).collect();
        assert_eq!(sessions, vec![2, 3]);

        // persisted state is the full current set, not just the delta
        assert_eq!(
            store.load().unwrap(),
            Some(vec![
                "aaa".to_string(),
                "bbb2".to_string(),
                "ccc".to_string()
            ])
        );
    }

    #[test]
    fn unchanged_listing_yields_empty_change_set() {
        let store = MemoryChangeStore::with_state(vec!["aaa".to_string()]);
        let datasets = vec![descriptor(1, "aaa")];
        assert!(select_changed(&store, &datasets).unwrap().is_empty());
    }
}
