//! Career predictor — blends the classifier's base confidence with learned
//! pattern boosts into a ranked, deterministic top-3.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::learning::patterns::PatternStore;
use crate::prediction::classifier::CareerClassifier;
use crate::skills::vocab;

pub const MAX_CANDIDATES: usize = 3;

/// Base confidence assigned to every catalog career when the classifier is
/// unavailable: maximally uncertain, so the learned layer and the
/// deterministic tie-break decide.
const UNKNOWN_BASE_CONFIDENCE: f64 = 50.0;

/// One ranked career suggestion. Built per request, never persisted — only
/// feedback about it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerCandidate {
    pub career: String,
    pub base_confidence: f64,
    pub learned_boost: f64,
    pub final_confidence: f64,
}

pub struct CareerPredictor {
    classifier: Arc<dyn CareerClassifier>,
    store: Arc<dyn PatternStore>,
    /// Blend weight `w` in `final = (1-w)·base + w·boost`. The base model
    /// dominates; the learned layer nudges.
    blend_weight: f64,
}

impl CareerPredictor {
    pub fn new(
        classifier: Arc<dyn CareerClassifier>,
        store: Arc<dyn PatternStore>,
        blend_weight: f64,
    ) -> Self {
        Self {
            classifier,
            store,
            blend_weight,
        }
    }

    /// Ranks careers for a skill set.
    ///
    /// Ordering is total and deterministic: final confidence descending, ties
    /// broken by base confidence, then lexicographically by career name.
    /// Identical (skills, classifier output, store state) triples always
    /// produce identical rankings.
    pub async fn predict(
        &self,
        skill_set: &BTreeSet<String>,
    ) -> Result<Vec<CareerCandidate>, AppError> {
        let skill_list: Vec<String> = skill_set.iter().cloned().collect();

        let base = match self.classifier.classify(&skill_list).await {
            Ok(probabilities) => probabilities,
            Err(e) => {
                warn!("Classifier unavailable, falling back to uniform base: {e}");
                uniform_base()
            }
        };

        let mut candidates = Vec::with_capacity(base.len());
        for (career, base_confidence) in base {
            let learned_boost = self.learned_boost(&skill_list, &career).await?;
            let final_confidence =
                (1.0 - self.blend_weight) * base_confidence + self.blend_weight * learned_boost;
            candidates.push(CareerCandidate {
                career,
                base_confidence,
                learned_boost,
                final_confidence,
            });
        }

        candidates.sort_by(|a, b| {
            b.final_confidence
                .total_cmp(&a.final_confidence)
                .then_with(|| b.base_confidence.total_cmp(&a.base_confidence))
                .then_with(|| a.career.cmp(&b.career))
        });
        candidates.truncate(MAX_CANDIDATES);
        Ok(candidates)
    }

    /// Learned boost for one career: occurrence-weighted mean of pattern
    /// confidences over the input skills, scaled to 0–100.
    ///
    /// An empty skill set has no co-occurrence to look up and boosts 0.
    /// Skills with no stored pattern contribute nothing; a career with no
    /// stored patterns at all sits at the 0.5 prior (boost 50).
    async fn learned_boost(&self, skills: &[String], career: &str) -> Result<f64, AppError> {
        if skills.is_empty() {
            return Ok(0.0);
        }
        let patterns = self.store.get_for_career(skills, career).await?;
        if patterns.is_empty() {
            return Ok(50.0);
        }
        let total_occurrences: i64 = patterns.iter().map(|p| p.occurrence_count).sum();
        if total_occurrences == 0 {
            return Ok(50.0);
        }
        let weighted = patterns
            .iter()
            .map(|p| p.confidence * p.occurrence_count as f64)
            .sum::<f64>()
            / total_occurrences as f64;
        Ok(weighted * 100.0)
    }
}

fn uniform_base() -> HashMap<String, f64> {
    vocab::career_catalog()
        .into_iter()
        .map(|career| (career.to_string(), UNKNOWN_BASE_CONFIDENCE))
        .collect()
}
