#![allow(dead_code)]

//! Pattern store — the `(skill, career) → confidence state` mapping behind
//! the self-learning layer. The only shared mutable resource in the engine:
//! writes are atomic per key, reads never fail (a missing pattern is the
//! maximally-uncertain zero state, not an error).

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pattern::SkillPatternRow;

/// Laplace-smoothed positive-rate estimator. Strictly inside (0,1) for any
/// non-negative counts; zero feedback sits at the 0.5 prior and a single
/// early negative cannot pin confidence to 0.
pub fn laplace_confidence(positive: i64, negative: i64) -> f64 {
    (positive as f64 + 1.0) / ((positive + negative) as f64 + 2.0)
}

/// Learned association strength between one skill and one career.
/// `occurrence_count` tracks raw co-occurrence observations and moves
/// independently of the two feedback counters; `confidence` is always a pure
/// function of the feedback counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCareerPattern {
    pub skill: String,
    pub career: String,
    pub occurrence_count: i64,
    pub positive_feedback_count: i64,
    pub negative_feedback_count: i64,
    pub confidence: f64,
}

impl SkillCareerPattern {
    /// The not-yet-observed state for a pair: zero counts, 0.5 confidence.
    pub fn zero_state(skill: &str, career: &str) -> Self {
        Self {
            skill: skill.to_string(),
            career: career.to_string(),
            occurrence_count: 0,
            positive_feedback_count: 0,
            negative_feedback_count: 0,
            confidence: laplace_confidence(0, 0),
        }
    }
}

/// Additive count deltas for one pattern write.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDelta {
    pub occurrence: i64,
    pub positive: i64,
    pub negative: i64,
}

impl PatternDelta {
    /// Co-occurrence observed without feedback (a served prediction).
    pub fn observed() -> Self {
        Self {
            occurrence: 1,
            ..Default::default()
        }
    }

    pub fn positive() -> Self {
        Self {
            occurrence: 1,
            positive: 1,
            negative: 0,
        }
    }

    pub fn negative() -> Self {
        Self {
            occurrence: 1,
            positive: 0,
            negative: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillOccurrences {
    pub skill: String,
    pub occurrences: i64,
}

/// Aggregate view of the learned state, for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LearningStats {
    pub total_patterns: i64,
    pub average_confidence_pct: f64,
    pub total_positive_feedback: i64,
    pub total_negative_feedback: i64,
    pub positive_rate_pct: f64,
    pub top_observed_skills: Vec<SkillOccurrences>,
}

const TOP_SKILLS_LIMIT: i64 = 10;

/// Durable storage contract for skill/career patterns.
///
/// Carried in `AppState` as `Arc<dyn PatternStore>`. Concurrency policy:
/// `apply` must be atomic per `(skill, career)` key — concurrent writes to
/// different keys proceed independently, concurrent writes to the same key
/// serialize their read-modify-write. Reads may observe pre- or post-update
/// state under concurrent feedback.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Never fails on a missing pattern: returns the zero state instead.
    async fn get(&self, skill: &str, career: &str) -> Result<SkillCareerPattern, AppError>;

    /// Existing patterns for any of `skills` with `career`. Pairs without a
    /// stored pattern are simply absent from the result.
    async fn get_for_career(
        &self,
        skills: &[String],
        career: &str,
    ) -> Result<Vec<SkillCareerPattern>, AppError>;

    /// Applies additive deltas and recomputes confidence in the same write.
    /// Repeated identical deltas each count; the store keeps raw history.
    async fn apply(&self, skill: &str, career: &str, delta: PatternDelta) -> Result<(), AppError>;

    /// Patterns for one skill, strongest association first.
    async fn for_skill(&self, skill: &str) -> Result<Vec<SkillCareerPattern>, AppError>;

    /// Patterns for one career, strongest association first.
    async fn for_career(&self, career: &str) -> Result<Vec<SkillCareerPattern>, AppError>;

    /// Observed patterns ranked by confidence.
    async fn top_patterns(&self, limit: i64) -> Result<Vec<SkillCareerPattern>, AppError>;

    async fn stats(&self) -> Result<LearningStats, AppError>;
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Rejects corrupt records coming back from storage: negative counts or an
/// out-of-range confidence never reach callers.
fn validate(pattern: &SkillCareerPattern) -> Result<(), AppError> {
    if pattern.occurrence_count < 0
        || pattern.positive_feedback_count < 0
        || pattern.negative_feedback_count < 0
        || !(0.0..=1.0).contains(&pattern.confidence)
    {
        return Err(AppError::DataIntegrity(format!(
            "pattern ({}, {}) has corrupt state: occ={} pos={} neg={} conf={}",
            pattern.skill,
            pattern.career,
            pattern.occurrence_count,
            pattern.positive_feedback_count,
            pattern.negative_feedback_count,
            pattern.confidence,
        )));
    }
    Ok(())
}

fn validate_delta(skill: &str, career: &str, delta: &PatternDelta) -> Result<(), AppError> {
    if delta.occurrence < 0 || delta.positive < 0 || delta.negative < 0 {
        return Err(AppError::DataIntegrity(format!(
            "rejecting negative delta for pattern ({skill}, {career})"
        )));
    }
    Ok(())
}

fn sort_strongest_first(patterns: &mut [SkillCareerPattern]) {
    patterns.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.skill.cmp(&b.skill))
            .then_with(|| a.career.cmp(&b.career))
    });
}

impl From<SkillPatternRow> for SkillCareerPattern {
    fn from(row: SkillPatternRow) -> Self {
        Self {
            skill: row.skill,
            career: row.career,
            occurrence_count: row.occurrence_count,
            positive_feedback_count: row.positive_feedback_count,
            negative_feedback_count: row.negative_feedback_count,
            confidence: row.confidence,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgPatternStore — durable backend
// ────────────────────────────────────────────────────────────────────────────

/// PostgreSQL-backed store. The single-statement upsert makes each write
/// atomic per `(skill, career)` row; confidence is recomputed from the
/// post-update counts inside the same statement.
pub struct PgPatternStore {
    pool: PgPool,
}

impl PgPatternStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatternStore for PgPatternStore {
    async fn get(&self, skill: &str, career: &str) -> Result<SkillCareerPattern, AppError> {
        let skill = normalize_key(skill);
        let career = normalize_key(career);
        let row: Option<SkillPatternRow> =
            sqlx::query_as("SELECT * FROM skill_patterns WHERE skill = $1 AND career = $2")
                .bind(&skill)
                .bind(&career)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => {
                let pattern = SkillCareerPattern::from(row);
                validate(&pattern)?;
                Ok(pattern)
            }
            None => Ok(SkillCareerPattern::zero_state(&skill, &career)),
        }
    }

    async fn get_for_career(
        &self,
        skills: &[String],
        career: &str,
    ) -> Result<Vec<SkillCareerPattern>, AppError> {
        if skills.is_empty() {
            return Ok(Vec::new());
        }
        let normalized: Vec<String> = skills.iter().map(|s| normalize_key(s)).collect();
        let rows: Vec<SkillPatternRow> = sqlx::query_as(
            "SELECT * FROM skill_patterns WHERE career = $1 AND skill = ANY($2) ORDER BY skill ASC",
        )
        .bind(normalize_key(career))
        .bind(&normalized)
        .fetch_all(&self.pool)
        .await?;
        let patterns: Vec<SkillCareerPattern> =
            rows.into_iter().map(SkillCareerPattern::from).collect();
        for pattern in &patterns {
            validate(pattern)?;
        }
        Ok(patterns)
    }

    async fn apply(&self, skill: &str, career: &str, delta: PatternDelta) -> Result<(), AppError> {
        let skill = normalize_key(skill);
        let career = normalize_key(career);
        validate_delta(&skill, &career, &delta)?;
        sqlx::query(
            r#"
            INSERT INTO skill_patterns
                (id, skill, career, occurrence_count,
                 positive_feedback_count, negative_feedback_count, confidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (skill, career) DO UPDATE SET
                occurrence_count = skill_patterns.occurrence_count + EXCLUDED.occurrence_count,
                positive_feedback_count =
                    skill_patterns.positive_feedback_count + EXCLUDED.positive_feedback_count,
                negative_feedback_count =
                    skill_patterns.negative_feedback_count + EXCLUDED.negative_feedback_count,
                confidence =
                    (skill_patterns.positive_feedback_count
                     + EXCLUDED.positive_feedback_count + 1)::double precision
                    / (skill_patterns.positive_feedback_count
                       + EXCLUDED.positive_feedback_count
                       + skill_patterns.negative_feedback_count
                       + EXCLUDED.negative_feedback_count + 2),
                updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&skill)
        .bind(&career)
        .bind(delta.occurrence)
        .bind(delta.positive)
        .bind(delta.negative)
        .bind(laplace_confidence(delta.positive, delta.negative))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn for_skill(&self, skill: &str) -> Result<Vec<SkillCareerPattern>, AppError> {
        let rows: Vec<SkillPatternRow> = sqlx::query_as(
            "SELECT * FROM skill_patterns WHERE skill = $1 \
             ORDER BY confidence DESC, career ASC",
        )
        .bind(normalize_key(skill))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SkillCareerPattern::from).collect())
    }

    async fn for_career(&self, career: &str) -> Result<Vec<SkillCareerPattern>, AppError> {
        let rows: Vec<SkillPatternRow> = sqlx::query_as(
            "SELECT * FROM skill_patterns WHERE career = $1 \
             ORDER BY confidence DESC, skill ASC",
        )
        .bind(normalize_key(career))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SkillCareerPattern::from).collect())
    }

    async fn top_patterns(&self, limit: i64) -> Result<Vec<SkillCareerPattern>, AppError> {
        let rows: Vec<SkillPatternRow> = sqlx::query_as(
            "SELECT * FROM skill_patterns WHERE occurrence_count > 0 \
             ORDER BY confidence DESC, skill ASC, career ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SkillCareerPattern::from).collect())
    }

    async fn stats(&self) -> Result<LearningStats, AppError> {
        let (total_patterns, average_confidence, positive, negative): (i64, f64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), COALESCE(AVG(confidence), 0.5), \
                 COALESCE(SUM(positive_feedback_count), 0)::BIGINT, \
                 COALESCE(SUM(negative_feedback_count), 0)::BIGINT \
                 FROM skill_patterns",
            )
            .fetch_one(&self.pool)
            .await?;

        let top: Vec<(String, i64)> = sqlx::query_as(
            "SELECT skill, COALESCE(SUM(occurrence_count), 0)::BIGINT AS total \
             FROM skill_patterns GROUP BY skill ORDER BY total DESC, skill ASC LIMIT $1",
        )
        .bind(TOP_SKILLS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(build_stats(
            total_patterns,
            average_confidence,
            positive,
            negative,
            top,
        ))
    }
}

fn build_stats(
    total_patterns: i64,
    average_confidence: f64,
    positive: i64,
    negative: i64,
    top: Vec<(String, i64)>,
) -> LearningStats {
    let total_feedback = positive + negative;
    let positive_rate_pct = if total_feedback > 0 {
        round1(positive as f64 / total_feedback as f64 * 100.0)
    } else {
        0.0
    };
    LearningStats {
        total_patterns,
        average_confidence_pct: round1(average_confidence * 100.0),
        total_positive_feedback: positive,
        total_negative_feedback: negative,
        positive_rate_pct,
        top_observed_skills: top
            .into_iter()
            .map(|(skill, occurrences)| SkillOccurrences { skill, occurrences })
            .collect(),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryPatternStore — storage-free backend for tests and local runs
// ────────────────────────────────────────────────────────────────────────────

/// In-memory store. The write lock serializes every read-modify-write, which
/// is stricter than the per-key requirement but trivially correct.
#[derive(Default)]
pub struct MemoryPatternStore {
    inner: RwLock<HashMap<(String, String), SkillCareerPattern>>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn get(&self, skill: &str, career: &str) -> Result<SkillCareerPattern, AppError> {
        let skill = normalize_key(skill);
        let career = normalize_key(career);
        let map = self.inner.read().await;
        let pattern = map
            .get(&(skill.clone(), career.clone()))
            .cloned()
            .unwrap_or_else(|| SkillCareerPattern::zero_state(&skill, &career));
        validate(&pattern)?;
        Ok(pattern)
    }

    async fn get_for_career(
        &self,
        skills: &[String],
        career: &str,
    ) -> Result<Vec<SkillCareerPattern>, AppError> {
        let career = normalize_key(career);
        let map = self.inner.read().await;
        let mut patterns: Vec<SkillCareerPattern> = skills
            .iter()
            .filter_map(|s| map.get(&(normalize_key(s), career.clone())).cloned())
            .collect();
        patterns.sort_by(|a, b| a.skill.cmp(&b.skill));
        Ok(patterns)
    }

    async fn apply(&self, skill: &str, career: &str, delta: PatternDelta) -> Result<(), AppError> {
        let skill = normalize_key(skill);
        let career = normalize_key(career);
        validate_delta(&skill, &career, &delta)?;
        let mut map = self.inner.write().await;
        let pattern = map
            .entry((skill.clone(), career.clone()))
            .or_insert_with(|| SkillCareerPattern::zero_state(&skill, &career));
        pattern.occurrence_count += delta.occurrence;
        pattern.positive_feedback_count += delta.positive;
        pattern.negative_feedback_count += delta.negative;
        pattern.confidence = laplace_confidence(
            pattern.positive_feedback_count,
            pattern.negative_feedback_count,
        );
        Ok(())
    }

    async fn for_skill(&self, skill: &str) -> Result<Vec<SkillCareerPattern>, AppError> {
        let skill = normalize_key(skill);
        let map = self.inner.read().await;
        let mut patterns: Vec<SkillCareerPattern> =
            map.values().filter(|p| p.skill == skill).cloned().collect();
        sort_strongest_first(&mut patterns);
        Ok(patterns)
    }

    async fn for_career(&self, career: &str) -> Result<Vec<SkillCareerPattern>, AppError> {
        let career = normalize_key(career);
        let map = self.inner.read().await;
        let mut patterns: Vec<SkillCareerPattern> = map
            .values()
            .filter(|p| p.career == career)
            .cloned()
            .collect();
        sort_strongest_first(&mut patterns);
        Ok(patterns)
    }

    async fn top_patterns(&self, limit: i64) -> Result<Vec<SkillCareerPattern>, AppError> {
        let map = self.inner.read().await;
        let mut patterns: Vec<SkillCareerPattern> = map
            .values()
            .filter(|p| p.occurrence_count > 0)
            .cloned()
            .collect();
        sort_strongest_first(&mut patterns);
        patterns.truncate(limit.max(0) as usize);
        Ok(patterns)
    }

    async fn stats(&self) -> Result<LearningStats, AppError> {
        let map = self.inner.read().await;
        let total_patterns = map.len() as i64;
        let average_confidence = if map.is_empty() {
            0.5
        } else {
            map.values().map(|p| p.confidence).sum::<f64>() / map.len() as f64
        };
        let positive: i64 = map.values().map(|p| p.positive_feedback_count).sum();
        let negative: i64 = map.values().map(|p| p.negative_feedback_count).sum();

        let mut occurrences: HashMap<String, i64> = HashMap::new();
        for pattern in map.values() {
            *occurrences.entry(pattern.skill.clone()).or_insert(0) += pattern.occurrence_count;
        }
        let mut top: Vec<(String, i64)> = occurrences.into_iter().collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top.truncate(TOP_SKILLS_LIMIT as usize);

        Ok(build_stats(
            total_patterns,
            average_confidence,
            positive,
            negative,
            top,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_laplace_prior_is_exactly_half() {
        assert_eq!(laplace_confidence(0, 0), 0.5);
    }

    #[test]
    fn test_laplace_single_positive() {
        assert!((laplace_confidence(1, 0) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_laplace_balanced_feedback_returns_to_neutral() {
        assert_eq!(laplace_confidence(1, 1), 0.5);
    }

    #[test]
    fn test_laplace_stays_strictly_inside_unit_interval() {
        assert!(laplace_confidence(0, 1000) > 0.0);
        assert!(laplace_confidence(1000, 0) < 1.0);
    }

    #[tokio::test]
    async fn test_missing_pattern_is_zero_state() {
        let store = MemoryPatternStore::new();
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.occurrence_count, 0);
        assert_eq!(pattern.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_apply_accumulates_and_recomputes_confidence() {
        let store = MemoryPatternStore::new();
        store
            .apply("python", "data scientist", PatternDelta::positive())
            .await
            .unwrap();
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.occurrence_count, 1);
        assert_eq!(pattern.positive_feedback_count, 1);
        assert!((pattern.confidence - 2.0 / 3.0).abs() < 1e-12);

        store
            .apply("python", "data scientist", PatternDelta::negative())
            .await
            .unwrap();
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_keys_are_normalized() {
        let store = MemoryPatternStore::new();
        store
            .apply("  Python ", "Data Scientist", PatternDelta::positive())
            .await
            .unwrap();
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.positive_feedback_count, 1);
    }

    #[tokio::test]
    async fn test_repeated_identical_deltas_each_count() {
        let store = MemoryPatternStore::new();
        for _ in 0..3 {
            store
                .apply("sql", "data analyst", PatternDelta::positive())
                .await
                .unwrap();
        }
        let pattern = store.get("sql", "data analyst").await.unwrap();
        assert_eq!(pattern.positive_feedback_count, 3);
        assert!((pattern.confidence - 4.0 / 5.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_negative_delta_is_rejected() {
        let store = MemoryPatternStore::new();
        let delta = PatternDelta {
            occurrence: 1,
            positive: -1,
            negative: 0,
        };
        let result = store.apply("python", "data scientist", delta).await;
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
        // The rejected write must not have touched the store.
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.occurrence_count, 0);
    }

    #[test]
    fn test_validate_rejects_corrupt_record() {
        let mut pattern = SkillCareerPattern::zero_state("python", "data scientist");
        pattern.negative_feedback_count = -3;
        assert!(matches!(
            validate(&pattern),
            Err(AppError::DataIntegrity(_))
        ));

        let mut pattern = SkillCareerPattern::zero_state("python", "data scientist");
        pattern.confidence = 1.5;
        assert!(matches!(
            validate(&pattern),
            Err(AppError::DataIntegrity(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_feedback_on_same_key_loses_no_updates() {
        let store = Arc::new(MemoryPatternStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .apply("python", "data scientist", PatternDelta::positive())
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let pattern = store.get("python", "data scientist").await.unwrap();
        assert_eq!(pattern.positive_feedback_count, 50);
        assert_eq!(pattern.occurrence_count, 50);
        assert!((pattern.confidence - 51.0 / 52.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_get_for_career_returns_only_existing_patterns() {
        let store = MemoryPatternStore::new();
        store
            .apply("python", "data scientist", PatternDelta::positive())
            .await
            .unwrap();
        let skills = vec!["python".to_string(), "sql".to_string()];
        let patterns = store
            .get_for_career(&skills, "data scientist")
            .await
            .unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].skill, "python");
    }

    #[tokio::test]
    async fn test_top_patterns_ranked_by_confidence() {
        let store = MemoryPatternStore::new();
        store
            .apply("python", "data scientist", PatternDelta::positive())
            .await
            .unwrap();
        store
            .apply("sql", "data analyst", PatternDelta::negative())
            .await
            .unwrap();
        let top = store.top_patterns(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].skill, "python");
        assert!(top[0].confidence > top[1].confidence);
    }

    #[tokio::test]
    async fn test_stats_aggregates_counts() {
        let store = MemoryPatternStore::new();
        store
            .apply("python", "data scientist", PatternDelta::positive())
            .await
            .unwrap();
        store
            .apply("python", "data scientist", PatternDelta::positive())
            .await
            .unwrap();
        store
            .apply("sql", "data analyst", PatternDelta::negative())
            .await
            .unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_patterns, 2);
        assert_eq!(stats.total_positive_feedback, 2);
        assert_eq!(stats.total_negative_feedback, 1);
        assert!((stats.positive_rate_pct - 66.7).abs() < 1e-9);
        assert_eq!(stats.top_observed_skills[0].skill, "python");
        assert_eq!(stats.top_observed_skills[0].occurrences, 2);
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let store = MemoryPatternStore::new();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_patterns, 0);
        assert_eq!(stats.average_confidence_pct, 50.0);
        assert_eq!(stats.positive_rate_pct, 0.0);
    }
}
