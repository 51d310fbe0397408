use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::learning::engine::FeedbackEvent;
use crate::learning::insights::{self, CareerAffinity, SkillAffinity};
use crate::learning::patterns::{LearningStats, SkillCareerPattern};
use crate::state::AppState;

/// POST /api/v1/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(event): Json<FeedbackEvent>,
) -> Result<StatusCode, AppError> {
    state.learning.record_feedback(&event).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/learning/skills/:skill
pub async fn handle_skill_insights(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Result<Json<Vec<CareerAffinity>>, AppError> {
    let affinities = insights::careers_for_skill(state.patterns.as_ref(), &skill).await?;
    Ok(Json(affinities))
}

/// GET /api/v1/learning/careers/:career
pub async fn handle_career_requirements(
    State(state): State<AppState>,
    Path(career): Path<String>,
) -> Result<Json<Vec<SkillAffinity>>, AppError> {
    let affinities = insights::skills_for_career(state.patterns.as_ref(), &career).await?;
    Ok(Json(affinities))
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/learning/patterns?limit=20
pub async fn handle_top_patterns(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<SkillCareerPattern>>, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let patterns = state.patterns.top_patterns(limit).await?;
    Ok(Json(patterns))
}

/// GET /api/v1/learning/stats
pub async fn handle_stats(
    State(state): State<AppState>,
) -> Result<Json<LearningStats>, AppError> {
    let stats = state.patterns.stats().await?;
    Ok(Json(stats))
}
