//! Clarifai classifier client using the model-outputs API.
//!
//! Sends one image URL per request and decodes the concepts list at
//! `outputs[0].data.concepts` into label/score pairs.

use super::{Classifier, LabelScore};
use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Clarifai client. One instance is shared across the whole build pass.
pub struct ClarifaiClassifier {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ClarifaiClassifier {
    /// Create a client from config plus the API key supplied on the CLI.
    ///
    /// The per-request timeout is baked into the underlying HTTP client.
    pub fn new(config: &ClassifierConfig, api_key: &str) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifyError::Request {
                image: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct OutputsRequest {
    inputs: Vec<Input>,
}

#[derive(Serialize)]
struct Input {
    data: InputData,
}

#[derive(Serialize)]
struct InputData {
    image: ImageUrl,
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

impl OutputsRequest {
    fn for_image(url: &str) -> Self {
        Self {
            inputs: vec![Input {
                data: InputData {
                    image: ImageUrl {
                        url: url.to_string(),
                    },
                },
            }],
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct OutputsResponse {
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Deserialize)]
struct Output {
    #[serde(default)]
    data: OutputData,
}

/// `concepts` stays an Option so "classifier found nothing" decodes cleanly
/// instead of being conflated with a malformed body.
#[derive(Deserialize, Default)]
struct OutputData {
    concepts: Option<Vec<Concept>>,
}

#[derive(Deserialize)]
struct Concept {
    name: String,
    value: f64,
}

#[async_trait]
impl Classifier for ClarifaiClassifier {
    fn name(&self) -> &str {
        "clarifai"
    }

    async fn classify(&self, image: &str) -> Result<Vec<LabelScore>, ClassifyError> {
        let body = OutputsRequest::for_image(image);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Key {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Transport {
                image: image.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Status {
                image: image.to_string(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let outputs_resp: OutputsResponse =
            resp.json().await.map_err(|e| ClassifyError::Malformed {
                image: image.to_string(),
                message: format!("undecodable body: {e}"),
            })?;

        let output = outputs_resp
            .outputs
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::Malformed {
                image: image.to_string(),
                message: "response contained no outputs".to_string(),
            })?;

        let Some(concepts) = output.data.concepts else {
            tracing::info!("Found no concepts for {image}");
            return Ok(Vec::new());
        };

        Ok(concepts
            .into_iter()
            .map(|c| LabelScore::new(c.name, c.value))
            .collect())
    }
}
