//! Read-only views over the learned pattern table.

use serde::Serialize;

use crate::errors::AppError;
use crate::learning::patterns::PatternStore;

/// How strongly one skill points at a career, on a 0–100 scale.
#[derive(Debug, Clone, Serialize)]
pub struct CareerAffinity {
    pub career: String,
    pub confidence_pct: f64,
    pub occurrence_count: i64,
}

/// How strongly a career has learned to expect a skill, on a 0–100 scale.
#[derive(Debug, Clone, Serialize)]
pub struct SkillAffinity {
    pub skill: String,
    pub confidence_pct: f64,
    pub occurrence_count: i64,
}

pub async fn careers_for_skill(
    store: &dyn PatternStore,
    skill: &str,
) -> Result<Vec<CareerAffinity>, AppError> {
    Ok(store
        .for_skill(skill)
        .await?
        .into_iter()
        .map(|p| CareerAffinity {
            career: p.career,
            confidence_pct: pct(p.confidence),
            occurrence_count: p.occurrence_count,
        })
        .collect())
}

pub async fn skills_for_career(
    store: &dyn PatternStore,
    career: &str,
) -> Result<Vec<SkillAffinity>, AppError> {
    Ok(store
        .for_career(career)
        .await?
        .into_iter()
        .map(|p| SkillAffinity {
            skill: p.skill,
            confidence_pct: pct(p.confidence),
            occurrence_count: p.occurrence_count,
        })
        .collect())
}

fn pct(confidence: f64) -> f64 {
    (confidence * 1000.0).round() / 10.0
}
