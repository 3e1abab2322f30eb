//! LegiScan API client and dataset downloader.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{DatasetDescriptor, DatasetListResponse, DatasetPayload, DatasetResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{info, warn};

/// Thin client over the keyed LegiScan endpoints
pub struct LegiscanClient {
    http: reqwest::Client,
    base: String,
    key: String,
}

impl LegiscanClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "API key is required (pass --api-key or set LEGISCAN_API_KEY)".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base: config.api_base.clone(),
            key: config.api_key.clone(),
        })
    }

    /// List the available session datasets for a state
    pub async fn dataset_list(&self, state: &str) -> Result<Vec<DatasetDescriptor>> {
        let url = format!(
            "{}?key={}&op=getDatasetList&state={}",
            self.base, self.key, state
        );
        let res: DatasetListResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if res.status != "OK" {
            return Err(Error::Api(format!(
                "getDatasetList returned status {:?}",
                res.status
            )));
        }
        Ok(res.datasetlist)
    }

    /// Retrieve one dataset's archive payload
    pub async fn dataset(&self, session_id: u64, access_key: &str) -> Result<DatasetPayload> {
        let url = format!(
            "{}?key={}&op=getDataset&id={}&access_key={}",
            self.base, self.key, session_id, access_key
        );
        let res: DatasetResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if res.status != "OK" {
            return Err(Error::Api(format!(
                "getDataset returned status {:?}",
                res.status
            )));
        }
        res.dataset
            .ok_or_else(|| Error::Api("getDataset response missing dataset payload".to_string()))
    }
}

/// Download each dataset sequentially, decoding the base64 zip payload into
/// `<state>_<session>_data_d<hash>.zip` under the data directory. The first
/// unrecoverable error aborts the whole run.
pub async fn download_datasets(
    config: &Config,
    client: &LegiscanClient,
    datasets: &[DatasetDescriptor],
) -> Result<()> {
    for d in datasets {
        info!(session = %d.session_title, "collecting dataset");
        let payload = fetch_with_retry(client, d, config.fetch_retries).await?;
        let bytes = BASE64.decode(payload.zip.as_bytes())?;
        let path = config.archive_path(d.session_id, &d.dataset_hash);
        std::fs::write(&path, bytes)?;
    }
    Ok(())
}

/// One attempt by default; `retries` extra attempts only when configured.
async fn fetch_with_retry(
    client: &LegiscanClient,
    descriptor: &DatasetDescriptor,
    retries: u32,
) -> Result<DatasetPayload> {
    let mut attempt = 0;
    loop {
        match client
            .dataset(descriptor.session_id, &descriptor.access_key)
            .await
        {
            Ok(payload) => return Ok(payload),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!(
                    session_id = descriptor.session_id,
                    attempt,
                    error = %e,
                    "dataset fetch failed, retrying"
                );
            }
            Err(e) => return Err(e),
        }
    }
}
