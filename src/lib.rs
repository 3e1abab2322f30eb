//! A batch pipeline for the LegiScan bulk-dataset API.
//!
//! The pipeline detects changed session datasets by fingerprint, downloads and
//! unpacks their archives, flattens bill records into a cumulative CSV table,
//! derives a filtered token corpus from bill text, inverts a sponsor->bill
//! index, and trains a fixed-topic LDA model over the corpus.

pub mod archive;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod sponsors;
pub mod store;
pub mod table;
pub mod topics;
pub mod tracker;
pub mod types;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use fetch::LegiscanClient;
pub use store::{ChangeStore, FileChangeStore, MemoryChangeStore};
pub use types::{BillRow, DatasetDescriptor, Sponsor};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::fetch::LegiscanClient;
    pub use crate::store::{ChangeStore, FileChangeStore, MemoryChangeStore};
    pub use crate::types::{BillRow, DatasetDescriptor, Sponsor};
}
