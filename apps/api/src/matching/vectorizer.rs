//! Text vectorization — pluggable similarity backends behind one trait.
//!
//! Default: `TfidfCosineVectorizer` (pure-Rust, fast, deterministic, fully
//! testable). Optional: `HttpVectorizer` against a remote embedding service,
//! selected via `VECTORIZER_URL`.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorizerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Similarity backend contract: cosine-style similarity in [0,1].
///
/// Carried in `AppState` behind `Arc<dyn TextVectorizer>` so backends swap
/// without touching the matcher or handlers.
#[async_trait]
pub trait TextVectorizer: Send + Sync {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, VectorizerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// TfidfCosineVectorizer — default local backend
// ────────────────────────────────────────────────────────────────────────────

/// TF-IDF cosine over unigrams and bigrams of the two documents, with
/// smoothed idf. No network, no allocation beyond the two term maps.
pub struct TfidfCosineVectorizer;

#[async_trait]
impl TextVectorizer for TfidfCosineVectorizer {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, VectorizerError> {
        Ok(tfidf_cosine(a, b))
    }
}

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9][a-z0-9+#./-]*").expect("word pattern must compile"));

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of the two documents' TF-IDF vectors. A zero-variance
/// vector (empty or fully disjoint text) yields 0.0, never NaN.
pub(crate) fn tfidf_cosine(a: &str, b: &str) -> f64 {
    let tf_a = term_counts(&tokenize(a));
    let tf_b = term_counts(&tokenize(b));
    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }

    let terms: BTreeSet<&String> = tf_a.keys().chain(tf_b.keys()).collect();
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for term in terms {
        let df = f64::from(u8::from(tf_a.contains_key(term)) + u8::from(tf_b.contains_key(term)));
        // smoothed idf over the two-document corpus
        let idf = ((1.0 + 2.0) / (1.0 + df)).ln() + 1.0;
        let weight_a = tf_a.get(term).copied().unwrap_or(0.0) * idf;
        let weight_b = tf_b.get(term).copied().unwrap_or(0.0) * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// HttpVectorizer — remote backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    text_a: &'a str,
    text_b: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimilarityResponse {
    similarity: f64,
}

/// Client for a remote embedding-based similarity service. Bounded timeout;
/// callers treat any error as "similarity unavailable", never as a failed
/// match.
pub struct HttpVectorizer {
    client: Client,
    base_url: String,
}

impl HttpVectorizer {
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
impl TextVectorizer for HttpVectorizer {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, VectorizerError> {
        let url = format!("{}/similarity", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&SimilarityRequest { text_a: a, text_b: b })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorizerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SimilarityResponse = response.json().await?;
        Ok(parsed.similarity.clamp(0.0, 1.0))
    }
}
