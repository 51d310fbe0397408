//! Job-fit matcher — weighted skill overlap between a resume and a posting,
//! with semantic similarity reported alongside (never blended: explicit
//! overlap is the trustworthy signal, text similarity the noisy one).

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::matching::vectorizer::TextVectorizer;

pub const REQUIRED_WEIGHT: f64 = 70.0;
pub const PREFERRED_WEIGHT: f64 = 30.0;

/// Fit of one resume against one posting. Computed fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct JobFitResult {
    pub match_percentage: f64,
    /// 0–100; absent when the vectorizer is unavailable or either text is
    /// empty. Reported, not folded into `match_percentage`.
    pub semantic_similarity: Option<f64>,
    pub required_matched: Vec<String>,
    pub preferred_matched: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_preferred: Vec<String>,
    pub recommendation: &'static str,
}

pub struct JobFitMatcher {
    vectorizer: Arc<dyn TextVectorizer>,
}

impl JobFitMatcher {
    pub fn new(vectorizer: Arc<dyn TextVectorizer>) -> Self {
        Self { vectorizer }
    }

    /// Scores a resume against a posting's skill lists.
    ///
    /// Edge defaults: empty required ⇒ rate 1.0 (nothing to fail), empty
    /// preferred ⇒ rate 0.0 (no bonus, not a pass); both empty ⇒ 100.0, the
    /// vacuous posting is fully satisfied. Total over any input — no overlap
    /// is a valid low score, never an error.
    pub async fn match_job(
        &self,
        resume_skills: &BTreeSet<String>,
        required: &BTreeSet<String>,
        preferred: &BTreeSet<String>,
        resume_text: &str,
        job_text: &str,
    ) -> JobFitResult {
        // BTreeSet iteration keeps every list sorted and reproducible.
        let required_matched: Vec<String> = required.intersection(resume_skills).cloned().collect();
        let preferred_matched: Vec<String> =
            preferred.intersection(resume_skills).cloned().collect();
        let missing_required: Vec<String> = required.difference(resume_skills).cloned().collect();
        let missing_preferred: Vec<String> = preferred.difference(resume_skills).cloned().collect();

        let match_percentage = if required.is_empty() && preferred.is_empty() {
            100.0
        } else {
            let required_rate = if required.is_empty() {
                1.0
            } else {
                required_matched.len() as f64 / required.len() as f64
            };
            let preferred_rate = if preferred.is_empty() {
                0.0
            } else {
                preferred_matched.len() as f64 / preferred.len() as f64
            };
            round1(
                (required_rate * REQUIRED_WEIGHT + preferred_rate * PREFERRED_WEIGHT)
                    .clamp(0.0, 100.0),
            )
        };

        let semantic_similarity = self.semantic_similarity(resume_text, job_text).await;

        JobFitResult {
            match_percentage,
            semantic_similarity,
            required_matched,
            preferred_matched,
            missing_required,
            missing_preferred,
            recommendation: recommendation(match_percentage),
        }
    }

    /// Supplementary signal only: failure or empty text degrades to `None`,
    /// the skill-based percentage is never affected.
    async fn semantic_similarity(&self, resume_text: &str, job_text: &str) -> Option<f64> {
        if resume_text.trim().is_empty() || job_text.trim().is_empty() {
            return None;
        }
        match self.vectorizer.similarity(resume_text, job_text).await {
            Ok(similarity) => Some(round1(similarity * 100.0)),
            Err(e) => {
                warn!("Vectorizer unavailable, omitting semantic similarity: {e}");
                None
            }
        }
    }
}

/// Recommendation tiers, lower bound inclusive.
fn recommendation(match_percentage: f64) -> &'static str {
    if match_percentage >= 80.0 {
        "Excellent match! You meet most requirements."
    } else if match_percentage >= 60.0 {
        "Good match. Consider applying and highlighting relevant experience."
    } else if match_percentage >= 40.0 {
        "Moderate match. Focus on learning missing skills before applying."
    } else {
        "Low match. Significant skill gaps exist. Consider other roles or upskilling."
    }
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::vectorizer::{TfidfCosineVectorizer, VectorizerError};
    use async_trait::async_trait;

    struct FailingVectorizer;

    #[async_trait]
    impl TextVectorizer for FailingVectorizer {
        async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, VectorizerError> {
            Err(VectorizerError::Api {
                status: 503,
                message: "down".to_string(),
            })
        }
    }

    fn set(skills: &[&str]) -> BTreeSet<String> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    fn matcher() -> JobFitMatcher {
        JobFitMatcher::new(Arc::new(TfidfCosineVectorizer))
    }

    #[tokio::test]
    async fn test_full_required_and_partial_preferred_scores_ninety() {
        let result = matcher()
            .match_job(
                &set(&["python", "sql", "machine learning", "tensorflow", "aws"]),
                &set(&["python", "sql", "machine learning"]),
                &set(&["tensorflow", "aws", "docker"]),
                "",
                "",
            )
            .await;

        assert_eq!(result.match_percentage, 90.0);
        assert_eq!(
            result.recommendation,
            "Excellent match! You meet most requirements."
        );
        assert_eq!(result.missing_preferred, vec!["docker"]);
        assert!(result.missing_required.is_empty());
    }

    #[tokio::test]
    async fn test_empty_required_rate_is_one() {
        let result = matcher()
            .match_job(
                &set(&["python", "docker"]),
                &BTreeSet::new(),
                &set(&["docker"]),
                "",
                "",
            )
            .await;
        // 1.0·70 + 1.0·30
        assert_eq!(result.match_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_empty_preferred_gives_no_bonus() {
        let result = matcher()
            .match_job(
                &set(&["python", "sql"]),
                &set(&["python", "sql"]),
                &BTreeSet::new(),
                "",
                "",
            )
            .await;
        assert_eq!(result.match_percentage, 70.0);
    }

    #[tokio::test]
    async fn test_vacuous_posting_scores_one_hundred() {
        let result = matcher()
            .match_job(
                &set(&["python"]),
                &BTreeSet::new(),
                &BTreeSet::new(),
                "",
                "",
            )
            .await;
        assert_eq!(result.match_percentage, 100.0);
        assert_eq!(result.semantic_similarity, None);
    }

    #[tokio::test]
    async fn test_no_overlap_is_a_low_score_not_an_error() {
        let result = matcher()
            .match_job(
                &set(&["accounting"]),
                &set(&["python", "sql"]),
                &set(&["docker"]),
                "",
                "",
            )
            .await;
        assert_eq!(result.match_percentage, 0.0);
        assert_eq!(
            result.recommendation,
            "Low match. Significant skill gaps exist. Consider other roles or upskilling."
        );
        assert_eq!(result.missing_required, vec!["python", "sql"]);
    }

    #[tokio::test]
    async fn test_missing_lists_are_sorted() {
        let result = matcher()
            .match_job(
                &BTreeSet::new(),
                &set(&["zsh", "ansible", "make"]),
                &set(&["docker", "bash"]),
                "",
                "",
            )
            .await;
        assert_eq!(result.missing_required, vec!["ansible", "make", "zsh"]);
        assert_eq!(result.missing_preferred, vec!["bash", "docker"]);
    }

    #[tokio::test]
    async fn test_semantic_similarity_reported_but_not_blended() {
        let result = matcher()
            .match_job(
                &set(&["python"]),
                &set(&["python"]),
                &BTreeSet::new(),
                "python developer building data pipelines",
                "python developer building data pipelines",
            )
            .await;
        // Identical texts: similarity ≈ 100, match stays at the 70 skill score.
        assert_eq!(result.match_percentage, 70.0);
        assert_eq!(result.semantic_similarity, Some(100.0));
    }

    #[tokio::test]
    async fn test_vectorizer_failure_omits_similarity_only() {
        let matcher = JobFitMatcher::new(Arc::new(FailingVectorizer));
        let result = matcher
            .match_job(
                &set(&["python"]),
                &set(&["python"]),
                &BTreeSet::new(),
                "resume text",
                "job text",
            )
            .await;
        assert_eq!(result.semantic_similarity, None);
        assert_eq!(result.match_percentage, 70.0);
    }

    #[test]
    fn test_tier_boundaries_inclusive_at_lower_bound() {
        assert!(recommendation(80.0).starts_with("Excellent"));
        assert!(recommendation(79.9).starts_with("Good"));
        assert!(recommendation(60.0).starts_with("Good"));
        assert!(recommendation(59.9).starts_with("Moderate"));
        assert!(recommendation(40.0).starts_with("Moderate"));
        assert!(recommendation(39.9).starts_with("Low"));
    }

    #[test]
    fn test_round1_rounds_to_one_decimal() {
        assert_eq!(round1(89.99999999999999), 90.0);
        assert_eq!(round1(66.66666666666667), 66.7);
    }
}
