use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default LegiScan API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.legiscan.com/";

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding every on-disk artifact: fingerprint file, archives,
    /// the extracted bill tree, the cumulative table, index and model files.
    pub data_dir: PathBuf,
    pub api_base: String,
    /// LegiScan API key. May be empty for offline stages; the client
    /// constructor rejects an empty key.
    pub api_key: String,
    pub state: String,
    pub num_topics: usize,
    pub train_iterations: usize,
    /// Extra fetch attempts per dataset. Zero (the default) means a failed
    /// request aborts the run immediately.
    pub fetch_retries: u32,
    /// RNG seed for the topic trainer; None seeds from entropy.
    pub seed: Option<u64>,
}

impl Config {
    /// Create a new default configuration
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            state: "US".to_string(),
            num_topics: 5,
            train_iterations: 200,
            fetch_retries: 0,
            seed: None,
        }
    }

    /// Validate the configuration, creating the data directory if needed
    pub fn validate(&self) -> Result<()> {
        if self.state.is_empty() {
            return Err(Error::Config("state must not be empty".to_string()));
        }

        if self.num_topics == 0 {
            return Err(Error::Config("num_topics must be at least 1".to_string()));
        }

        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(Error::Config(format!(
                "Data path is not a directory: {}",
                self.data_dir.display()
            )));
        }

        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Fingerprint-state file, newline-separated dataset hashes
    pub fn change_hash_path(&self) -> PathBuf {
        self.data_dir.join("change_hash.txt")
    }

    /// Cumulative bill table
    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}_congress.csv", self.state))
    }

    /// Sponsor index document
    pub fn sponsor_index_path(&self) -> PathBuf {
        self.data_dir.join("sponsor_index.json")
    }

    /// Topic-model artifact
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join("topic_model.json")
    }

    /// Archive file name for one dataset: `US_<session>_data_d<hash>.zip`
    pub fn archive_path(&self, session_id: u64, dataset_hash: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}_data_d{}.zip", self.state, session_id, dataset_hash))
    }

    /// Root of the extracted bill tree, e.g. `<data_dir>/US`
    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join(&self.state)
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(data_dir),
        }
    }

    /// Set the API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.config.api_base = base.into();
        self
    }

    /// Set the API key directly
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API key from an argument, falling back to the
    /// `LEGISCAN_API_KEY` environment variable
    pub fn api_key_or_env(mut self, key: Option<String>) -> Self {
        self.config.api_key = key
            .or_else(|| std::env::var("LEGISCAN_API_KEY").ok())
            .unwrap_or_default();
        self
    }

    /// Set the state code used in listing requests and file names
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.config.state = state.into();
        self
    }

    /// Set the number of topics for the trainer
    pub fn num_topics(mut self, k: usize) -> Self {
        self.config.num_topics = k;
        self
    }

    /// Set the number of Gibbs sweeps for the trainer
    pub fn train_iterations(mut self, iterations: usize) -> Self {
        self.config.train_iterations = iterations;
        self
    }

    /// Set extra fetch attempts per dataset (default 0, no implicit retry)
    pub fn fetch_retries(mut self, retries: u32) -> Self {
        self.config.fetch_retries = retries;
        self
    }

    /// Seed the trainer RNG for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("./data")
    }
}

/// True if a directory name looks like a congress-session directory,
/// e.g. `2023-2024_118th_Congress`
pub fn is_congress_dir(name: &str) -> bool {
    congress_dir_regex().is_match(name)
}

pub(crate) fn congress_dir_regex() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[0-9]{4}-[0-9]{4}_[0-9]{3}th_Congress$").expect("static regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).api_key("k").build().unwrap();
        assert_eq!(config.state, "US");
        assert_eq!(config.num_topics, 5);
        assert_eq!(config.fetch_retries, 0);
        assert!(config.table_path().ends_with("US_congress.csv"));
    }

    #[test]
    fn archive_path_uses_session_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigBuilder::new(dir.path()).build().unwrap();
        let path = config.archive_path(2041, "abc123");
        assert!(path.ends_with("US_2041_data_dabc123.zip"));
    }

    #[test]
    fn zero_topics_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigBuilder::new(dir.path()).num_topics(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn congress_dir_pattern() {
        assert!(is_congress_dir("2023-2024_118th_Congress"));
        assert!(!is_congress_dir("2023-2024_8th_Congress"));
        assert!(!is_congress_dir("notes"));
    }
}
