use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the `skill_patterns` table. One row per `(skill, career)` pair,
/// enforced by a composite unique constraint; rows accumulate counts forever
/// and are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillPatternRow {
    pub id: Uuid,
    pub skill: String,
    pub career: String,
    pub occurrence_count: i64,
    pub positive_feedback_count: i64,
    pub negative_feedback_count: i64,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
