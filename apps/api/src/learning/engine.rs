//! Learning engine — translates feedback events into pattern-store writes.
//! The single writer of `skill_patterns`; everything else only reads.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::learning::patterns::{PatternDelta, PatternStore};
use crate::skills;

/// How the user judged a prediction. A correction carries the career the
/// user says is actually right, redirecting learning toward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "career", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Positive,
    Negative,
    CorrectedTo(String),
}

/// One user judgment of one prediction. Transient: only its effect on the
/// pattern table persists, the event itself is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub predicted_career: String,
    pub skills: Vec<String>,
    pub outcome: FeedbackOutcome,
}

pub struct LearningEngine {
    store: Arc<dyn PatternStore>,
}

impl LearningEngine {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self { store }
    }

    /// Applies one feedback event to the pattern table.
    ///
    /// Per skill in the event, the `(skill, predicted)` pattern observes one
    /// occurrence plus a positive or negative feedback count. A correction is
    /// a negative on the predicted career and a fresh positive observation on
    /// the corrected one. Events with no skills are valid no-ops: there is no
    /// co-occurrence to learn from.
    pub async fn record_feedback(&self, event: &FeedbackEvent) -> Result<(), AppError> {
        let predicted = event.predicted_career.trim().to_lowercase();
        if predicted.is_empty() {
            return Err(AppError::Validation(
                "predicted_career must not be empty".to_string(),
            ));
        }

        let outcome = match &event.outcome {
            FeedbackOutcome::CorrectedTo(career) => {
                let career = career.trim().to_lowercase();
                if career.is_empty() {
                    return Err(AppError::Validation(
                        "corrected career must not be empty".to_string(),
                    ));
                }
                // A correction naming the predicted career is an emphatic yes.
                if career == predicted {
                    FeedbackOutcome::Positive
                } else {
                    FeedbackOutcome::CorrectedTo(career)
                }
            }
            other => other.clone(),
        };

        let skill_set = skills::normalize_skills(&event.skills);
        debug!(
            "Recording {:?} feedback for '{predicted}' across {} skills",
            outcome,
            skill_set.len()
        );

        for skill in &skill_set {
            match &outcome {
                FeedbackOutcome::Positive => {
                    self.store
                        .apply(skill, &predicted, PatternDelta::positive())
                        .await?;
                }
                FeedbackOutcome::Negative => {
                    self.store
                        .apply(skill, &predicted, PatternDelta::negative())
                        .await?;
                }
                FeedbackOutcome::CorrectedTo(correct) => {
                    self.store
                        .apply(skill, &predicted, PatternDelta::negative())
                        .await?;
                    self.store
                        .apply(skill, correct, PatternDelta::positive())
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Records the co-occurrence of a served prediction's skills with its top
    /// career. Occurrence only: feedback counters and confidence are
    /// untouched until the user actually judges the prediction.
    pub async fn record_prediction(
        &self,
        skill_set: &BTreeSet<String>,
        career: &str,
    ) -> Result<(), AppError> {
        let career = career.trim().to_lowercase();
        if career.is_empty() {
            return Ok(());
        }
        for skill in skill_set {
            self.store
                .apply(skill, &career, PatternDelta::observed())
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::patterns::MemoryPatternStore;

    fn engine() -> (LearningEngine, Arc<MemoryPatternStore>) {
        let store = Arc::new(MemoryPatternStore::new());
        (LearningEngine::new(store.clone()), store)
    }

    fn event(predicted: &str, skills: &[&str], outcome: FeedbackOutcome) -> FeedbackEvent {
        FeedbackEvent {
            predicted_career: predicted.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            outcome,
        }
    }

    #[tokio::test]
    async fn test_positive_feedback_raises_confidence() {
        let (engine, store) = engine();
        engine
            .record_feedback(&event(
                "data scientist",
                &["python", "sql"],
                FeedbackOutcome::Positive,
            ))
            .await
            .unwrap();

        for skill in ["python", "sql"] {
            let pattern = store.get(skill, "data scientist").await.unwrap();
            assert_eq!(pattern.occurrence_count, 1);
            assert_eq!(pattern.positive_feedback_count, 1);
            assert!((pattern.confidence - 2.0 / 3.0).abs() < 1e-12);
        }
    }

    #[tokio::test]
    async fn test_negative_feedback_lowers_confidence() {
        let (engine, store) = engine();
        engine
            .record_feedback(&event("data scientist", &["python"], FeedbackOutcome::Negative))
            .await
            .unwrap();

        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.negative_feedback_count, 1);
        assert!((pattern.confidence - 1.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_balanced_feedback_returns_to_neutral() {
        let (engine, store) = engine();
        let positive = event("data scientist", &["python"], FeedbackOutcome::Positive);
        let negative = event("data scientist", &["python"], FeedbackOutcome::Negative);
        engine.record_feedback(&positive).await.unwrap();
        engine.record_feedback(&negative).await.unwrap();

        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.confidence, 0.5);
        assert_eq!(pattern.occurrence_count, 2);
    }

    #[tokio::test]
    async fn test_correction_redirects_learning() {
        let (engine, store) = engine();
        engine
            .record_feedback(&event(
                "web developer",
                &["python", "tensorflow"],
                FeedbackOutcome::CorrectedTo("Machine Learning Engineer".to_string()),
            ))
            .await
            .unwrap();

        let wrong = store.get("tensorflow", "web developer").await.unwrap();
        assert_eq!(wrong.negative_feedback_count, 1);
        assert!((wrong.confidence - 1.0 / 3.0).abs() < 1e-12);

        let right = store
            .get("tensorflow", "machine learning engineer")
            .await
            .unwrap();
        assert_eq!(right.occurrence_count, 1);
        assert_eq!(right.positive_feedback_count, 1);
        assert!((right.confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_correction_naming_predicted_career_collapses_to_positive() {
        let (engine, store) = engine();
        engine
            .record_feedback(&event(
                "data scientist",
                &["python"],
                FeedbackOutcome::CorrectedTo(" Data Scientist ".to_string()),
            ))
            .await
            .unwrap();

        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.positive_feedback_count, 1);
        assert_eq!(pattern.negative_feedback_count, 0);
        assert_eq!(pattern.occurrence_count, 1);
    }

    #[tokio::test]
    async fn test_empty_predicted_career_is_validation_error() {
        let (engine, _) = engine();
        let result = engine
            .record_feedback(&event("  ", &["python"], FeedbackOutcome::Positive))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_event_without_skills_is_a_no_op() {
        let (engine, store) = engine();
        engine
            .record_feedback(&event("data scientist", &[], FeedbackOutcome::Positive))
            .await
            .unwrap();
        assert_eq!(store.stats().await.unwrap().total_patterns, 0);
    }

    #[tokio::test]
    async fn test_record_prediction_touches_occurrence_only() {
        let (engine, store) = engine();
        let skill_set: BTreeSet<String> = ["python", "sql"].iter().map(|s| s.to_string()).collect();
        engine
            .record_prediction(&skill_set, "data scientist")
            .await
            .unwrap();

        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.occurrence_count, 1);
        assert_eq!(pattern.positive_feedback_count, 0);
        assert_eq!(pattern.negative_feedback_count, 0);
        assert_eq!(pattern.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_repeated_identical_events_each_count() {
        let (engine, store) = engine();
        let feedback = event("data scientist", &["python"], FeedbackOutcome::Positive);
        engine.record_feedback(&feedback).await.unwrap();
        engine.record_feedback(&feedback).await.unwrap();

        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.positive_feedback_count, 2);
        assert!((pattern.confidence - 3.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_feedback_event_deserializes_tagged_outcome() {
        let json = r#"{
            "predicted_career": "web developer",
            "skills": ["python"],
            "outcome": {"type": "corrected_to", "career": "backend developer"}
        }"#;
        let event: FeedbackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.outcome,
            FeedbackOutcome::CorrectedTo("backend developer".to_string())
        );

        let json = r#"{
            "predicted_career": "web developer",
            "skills": [],
            "outcome": {"type": "positive"}
        }"#;
        let event: FeedbackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.outcome, FeedbackOutcome::Positive);
    }
}
