//! imgsearch core - topic index build and lookup library.
//!
//! Builds a local inverted index mapping topic labels to image URLs, with
//! labels produced by the Clarifai image-recognition API, and serves exact
//! label lookups against the persisted index.
//!
//! # Architecture
//!
//! ```text
//! build:  List Fetcher → Index Builder → Classifier (per image) → Index → Store
//! search: Store → Index → lookup(label)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use imgsearch_core::{
//!     BuildOptions, ClarifaiClassifier, Config, IndexBuilder, IndexStore, ListFetcher,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> imgsearch_core::Result<()> {
//!     let config = Config::load()?;
//!     let classifier = Arc::new(ClarifaiClassifier::new(&config.classifier, "API_KEY")?);
//!
//!     let images = ListFetcher::new(&config.build, None)?.fetch().await?;
//!     let index = IndexBuilder::new(classifier, BuildOptions::from(&config.build))
//!         .build(&images)
//!         .await?;
//!     IndexStore::new(config.index_path()).save(&index)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod index;

// Re-exports for convenient access
pub use builder::{BuildOptions, IndexBuilder};
pub use classify::{Classifier, ClarifaiClassifier, LabelScore};
pub use config::{Config, ErrorPolicy};
pub use error::{
    ClassifyError, ConfigError, FetchError, ImgsearchError, Result, StoreError,
};
pub use fetch::ListFetcher;
pub use index::{Index, IndexEntry, IndexStore};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
