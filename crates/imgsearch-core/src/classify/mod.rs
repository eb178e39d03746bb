//! Classifier trait and result types.
//!
//! Defines the interface between the index builder and whatever scores the
//! images. Production uses the Clarifai HTTP client; tests substitute stubs.

mod clarifai;

pub use clarifai::ClarifaiClassifier;

use crate::error::ClassifyError;
use async_trait::async_trait;

/// One label assigned to an image, with the classifier's confidence.
///
/// Scores are nominally in [0, 1] but no bound is enforced; they are used
/// for ranking only.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Category name, exactly as the classifier returned it
    pub label: String,
    /// Confidence score
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Trait the index builder drives, one call per image.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the builder holds an `Arc<dyn Classifier>` for the worker pool).
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifier name for logging (e.g., "clarifai").
    fn name(&self) -> &str;

    /// Score one image, identified by URL.
    ///
    /// Returns an empty vec when the classifier found nothing for the image;
    /// errors are reserved for transport, auth, and malformed responses.
    async fn classify(&self, image: &str) -> Result<Vec<LabelScore>, ClassifyError>;
}
