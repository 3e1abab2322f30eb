//! Stage orchestration. Stages run strictly in sequence: each one's output
//! on disk is the next one's mandatory input.

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{self, LegiscanClient};
use crate::store::ChangeStore;
use crate::{archive, corpus, sponsors, table, topics, tracker};
use tracing::{info, warn};

/// List, track, fetch, extract, and rebuild the cumulative table.
///
/// Returns false when the change set is empty; the fingerprint state has
/// already been overwritten with the current listing in that case and no
/// further stage runs. This is the designed normal termination, not an error.
pub async fn run_collect(
    config: &Config,
    client: &LegiscanClient,
    store: &dyn ChangeStore,
) -> Result<bool> {
    let datasets = client.dataset_list(&config.state).await?;
    info!(listed = datasets.len(), "dataset listing retrieved");

    let changed = tracker::select_changed(store, &datasets)?;
    if changed.is_empty() {
        info!("no change files");
        return Ok(false);
    }
    info!(changed = changed.len(), "datasets to fetch");

    fetch::download_datasets(config, client, &changed).await?;

    // the extractor matches archives against the persisted fingerprint set
    let hashes = store.load()?.unwrap_or_default();
    let extracted = archive::extract_changed(config, &hashes)?;
    info!(extracted, "bill records extracted");

    let rows = table::build_and_persist(config)?;
    info!(rows, table = %config.table_path().display(), "cumulative bill table written");
    Ok(true)
}

/// Rebuild and persist the sponsor index from the cumulative table
pub fn run_sponsors(config: &Config) -> Result<usize> {
    let rows = table::load_table(&config.table_path())?;
    let index = sponsors::build_index(&rows)?;
    sponsors::persist_index(&config.sponsor_index_path(), &index)?;
    info!(
        sponsors = index.len(),
        index = %config.sponsor_index_path().display(),
        "sponsor index written"
    );
    Ok(index.len())
}

/// Derive the corpus and retrain the topic model from the cumulative table
pub fn run_train(config: &Config) -> Result<()> {
    let rows = table::load_table(&config.table_path())?;
    let corpus = corpus::extract_corpus(&rows);
    if corpus.is_empty() {
        warn!("corpus is empty, skipping topic training");
        return Ok(());
    }

    let model = topics::train(
        &corpus,
        config.num_topics,
        config.train_iterations,
        config.seed,
    );
    model.save(&config.model_path())?;
    info!(
        documents = corpus.len(),
        topics = config.num_topics,
        model = %config.model_path().display(),
        "topic model written"
    );
    Ok(())
}

/// Full pipeline. An empty change set stops after the tracker stage; the
/// downstream artifacts are left untouched.
pub async fn run_all(
    config: &Config,
    client: &LegiscanClient,
    store: &dyn ChangeStore,
) -> Result<()> {
    if !run_collect(config, client, store).await? {
        return Ok(());
    }
    run_sponsors(config)?;
    run_train(config)
}
