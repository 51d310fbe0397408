//! External career classifier client — the single point of entry for
//! classifier inference calls. The engine consumes only the inference
//! contract; training and retraining happen elsewhere.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 2;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("classifier returned no careers")]
    Empty,
}

/// Inference contract of the pretrained statistical classifier: a skill list
/// in, base confidences per career out on a 0–100 scale. Implementations must
/// either return at least one career or signal unavailability with an error;
/// the predictor degrades to a uniform prior on failure.
#[async_trait]
pub trait CareerClassifier: Send + Sync {
    async fn classify(&self, skills: &[String]) -> Result<HashMap<String, f64>, ClassifierError>;
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    skills: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    /// Career name → probability in [0,1].
    probabilities: HashMap<String, f64>,
}

/// HTTP client for the model-serving sidecar that hosts the pretrained
/// classifier. Retries transient failures with backoff inside the bounded
/// request timeout.
pub struct HttpClassifier {
    client: Client,
    base_url: String,
}

impl HttpClassifier {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }
}

#[async_trait]
impl CareerClassifier for HttpClassifier {
    async fn classify(&self, skills: &[String]) -> Result<HashMap<String, f64>, ClassifierError> {
        let url = format!("{}/predict", self.base_url.trim_end_matches('/'));
        let mut last_error: Option<ClassifierError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(250 * u64::from(attempt));
                warn!(
                    "Classifier call attempt {attempt} failed, retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(&ClassifyRequest { skills })
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ClassifierError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(ClassifierError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClassifierError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let parsed: ClassifyResponse = response.json().await?;
            if parsed.probabilities.is_empty() {
                return Err(ClassifierError::Empty);
            }

            debug!(
                "Classifier returned {} careers",
                parsed.probabilities.len()
            );
            return Ok(parsed
                .probabilities
                .into_iter()
                .map(|(career, p)| {
                    (
                        career.trim().to_lowercase(),
                        (p * 100.0).clamp(0.0, 100.0),
                    )
                })
                .collect());
        }

        Err(last_error.unwrap_or(ClassifierError::Empty))
    }
}
