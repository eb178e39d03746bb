//! The index build pass.
//!
//! Drives the classifier once per candidate image and folds the returned
//! label/score pairs into the index. The reference path is fully sequential;
//! setting `workers > 1` switches to a bounded worker pool with a single
//! aggregation loop owning the index.

use crate::classify::{Classifier, LabelScore};
use crate::config::{BuildConfig, ErrorPolicy};
use crate::error::{ClassifyError, ImgsearchError};
use crate::index::{Index, IndexEntry};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Knobs for one build pass.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Log progress every N images
    pub progress_interval: usize,

    /// What to do when one image's classify call fails
    pub error_policy: ErrorPolicy,

    /// Concurrent classify calls; 1 means sequential
    pub workers: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            progress_interval: 20,
            error_policy: ErrorPolicy::Abort,
            workers: 1,
        }
    }
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        Self {
            progress_interval: config.progress_interval,
            error_policy: config.error_policy,
            workers: config.workers,
        }
    }
}

/// Builds an index from a list of candidate image URLs.
pub struct IndexBuilder {
    classifier: Arc<dyn Classifier>,
    options: BuildOptions,
}

impl IndexBuilder {
    pub fn new(classifier: Arc<dyn Classifier>, options: BuildOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Classify every image and return the finalized index.
    ///
    /// Dispatches to the worker pool when more than one worker is
    /// configured; otherwise processes images strictly in list order.
    pub async fn build(&self, images: &[String]) -> Result<Index, ImgsearchError> {
        tracing::info!(
            "Building index over {} images via {} ({} worker(s))",
            images.len(),
            self.classifier.name(),
            self.options.workers
        );

        let mut index = if self.options.workers > 1 {
            self.build_parallel(images).await?
        } else {
            self.build_sequential(images).await?
        };

        index.finalize();
        tracing::info!(
            "Index built: {} labels, {} entries",
            index.len(),
            index.entry_count()
        );
        Ok(index)
    }

    async fn build_sequential(&self, images: &[String]) -> Result<Index, ImgsearchError> {
        let mut index = Index::new();

        for (i, image) in images.iter().enumerate() {
            if i % self.options.progress_interval == 0 {
                tracing::info!("{i} images indexed");
            }

            match self.classifier.classify(image).await {
                Ok(matches) => fold_matches(&mut index, image, matches),
                Err(e) => self.handle_failure(image, e)?,
            }
        }

        Ok(index)
    }

    /// Worker-pool variant: a fixed number of tasks pull image URLs from a
    /// shared queue and publish per-image results over a bounded channel to
    /// this task, which is the only writer to the index.
    async fn build_parallel(&self, images: &[String]) -> Result<Index, ImgsearchError> {
        type ImageResult = (String, Result<Vec<LabelScore>, ClassifyError>);

        let workers = self.options.workers;
        let (work_tx, work_rx) = mpsc::channel::<String>(workers * 2);
        let (result_tx, mut result_rx) = mpsc::channel::<ImageResult>(workers * 2);
        let work_rx = Arc::new(Mutex::new(work_rx));

        for _ in 0..workers {
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();
            let classifier = Arc::clone(&self.classifier);
            tokio::spawn(async move {
                loop {
                    // lock only to pull the next URL, never across the call
                    let image = { work_rx.lock().await.recv().await };
                    let Some(image) = image else { break };
                    let result = classifier.classify(&image).await;
                    if result_tx.send((image, result)).await.is_err() {
                        // aggregator gone (abort), stop pulling work
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let feed: Vec<String> = images.to_vec();
        let feeder = tokio::spawn(async move {
            for image in feed {
                if work_tx.send(image).await.is_err() {
                    break;
                }
            }
        });

        let mut index = Index::new();
        let mut processed = 0usize;
        while let Some((image, result)) = result_rx.recv().await {
            match result {
                Ok(matches) => fold_matches(&mut index, &image, matches),
                Err(e) => {
                    if let Err(fatal) = self.handle_failure(&image, e) {
                        // dropping the receiver unwinds workers and feeder
                        drop(result_rx);
                        feeder.abort();
                        return Err(fatal);
                    }
                }
            }

            processed += 1;
            if processed % self.options.progress_interval == 0 {
                tracing::info!("{processed} images indexed");
            }
        }

        let _ = feeder.await;
        Ok(index)
    }

    fn handle_failure(&self, image: &str, error: ClassifyError) -> Result<(), ImgsearchError> {
        match self.options.error_policy {
            ErrorPolicy::Abort => Err(error.into()),
            ErrorPolicy::Skip => {
                tracing::warn!("Skipping {image}: {error}");
                Ok(())
            }
        }
    }
}

fn fold_matches(index: &mut Index, image: &str, matches: Vec<LabelScore>) {
    for m in matches {
        index.insert(m.label, IndexEntry::new(image, m.score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifyError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubClassifier {
        responses: HashMap<String, Vec<LabelScore>>,
    }

    impl StubClassifier {
        fn new(responses: &[(&str, &[(&str, f64)])]) -> Self {
            let responses = responses
                .iter()
                .map(|(image, labels)| {
                    let scores = labels
                        .iter()
                        .map(|(label, score)| LabelScore::new(*label, *score))
                        .collect();
                    (image.to_string(), scores)
                })
                .collect();
            Self { responses }
        }
    }

    #[async_trait]
    impl Classifier for StubClassifier {
        fn name(&self) -> &str {
            "stub"
        }

        async fn classify(&self, image: &str) -> Result<Vec<LabelScore>, ClassifyError> {
            Ok(self.responses.get(image).cloned().unwrap_or_default())
        }
    }

    /// Fails on one specific image, succeeds (empty) on everything else.
    struct FailingClassifier {
        bad_image: String,
        good: StubClassifier,
    }

    #[async_trait]
    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing-stub"
        }

        async fn classify(&self, image: &str) -> Result<Vec<LabelScore>, ClassifyError> {
            if image == self.bad_image {
                Err(ClassifyError::Transport {
                    image: image.to_string(),
                    message: "connection reset".to_string(),
                })
            } else {
                self.good.classify(image).await
            }
        }
    }

    fn two_image_stub() -> Arc<dyn Classifier> {
        Arc::new(StubClassifier::new(&[
            ("http://a.jpg", &[("dog", 0.9), ("cat", 0.5)]),
            ("http://b.jpg", &[("dog", 0.95)]),
        ]))
    }

    fn refs(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn test_build_aggregates_and_ranks() {
        let builder = IndexBuilder::new(two_image_stub(), BuildOptions::default());
        let index = builder
            .build(&refs(&["http://a.jpg", "http://b.jpg"]))
            .await
            .unwrap();

        let dogs = index.lookup("dog").unwrap();
        assert_eq!(dogs.len(), 2);
        assert_eq!(dogs[0], IndexEntry::new("http://b.jpg", 0.95));
        assert_eq!(dogs[1], IndexEntry::new("http://a.jpg", 0.9));

        let cats = index.lookup("cat").unwrap();
        assert_eq!(cats, &[IndexEntry::new("http://a.jpg", 0.5)]);
    }

    #[tokio::test]
    async fn test_image_with_no_concepts_contributes_nothing() {
        let builder = IndexBuilder::new(two_image_stub(), BuildOptions::default());
        let index = builder
            .build(&refs(&["http://a.jpg", "http://unknown.jpg"]))
            .await
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidate_list_builds_empty_index() {
        let builder = IndexBuilder::new(two_image_stub(), BuildOptions::default());
        let index = builder.build(&[]).await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_abort_policy_fails_fast() {
        let classifier = Arc::new(FailingClassifier {
            bad_image: "http://bad.jpg".to_string(),
            good: StubClassifier::new(&[]),
        });
        let builder = IndexBuilder::new(classifier, BuildOptions::default());

        let result = builder
            .build(&refs(&["http://bad.jpg", "http://a.jpg"]))
            .await;
        assert!(matches!(result, Err(ImgsearchError::Classify(_))));
    }

    #[tokio::test]
    async fn test_skip_policy_continues_past_failures() {
        let classifier = Arc::new(FailingClassifier {
            bad_image: "http://bad.jpg".to_string(),
            good: StubClassifier::new(&[("http://a.jpg", &[("dog", 0.9)])]),
        });
        let options = BuildOptions {
            error_policy: ErrorPolicy::Skip,
            ..BuildOptions::default()
        };
        let builder = IndexBuilder::new(classifier, options);

        let index = builder
            .build(&refs(&["http://bad.jpg", "http://a.jpg"]))
            .await
            .unwrap();
        assert_eq!(index.lookup("dog").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parallel_build_matches_sequential_content() {
        let options = BuildOptions {
            workers: 4,
            ..BuildOptions::default()
        };
        let builder = IndexBuilder::new(two_image_stub(), options);
        let index = builder
            .build(&refs(&["http://a.jpg", "http://b.jpg"]))
            .await
            .unwrap();

        // distinct scores make the final ranking deterministic even though
        // completion order is not
        let dogs = index.lookup("dog").unwrap();
        assert_eq!(dogs[0].image, "http://b.jpg");
        assert_eq!(dogs[1].image, "http://a.jpg");
        assert_eq!(index.lookup("cat").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_parallel_abort_policy_surfaces_error() {
        let classifier = Arc::new(FailingClassifier {
            bad_image: "http://bad.jpg".to_string(),
            good: StubClassifier::new(&[]),
        });
        let options = BuildOptions {
            workers: 3,
            ..BuildOptions::default()
        };
        let builder = IndexBuilder::new(classifier, options);

        let result = builder
            .build(&refs(&["http://a.jpg", "http://bad.jpg", "http://c.jpg"]))
            .await;
        assert!(result.is_err());
    }
}
