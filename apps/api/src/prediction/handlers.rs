use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::prediction::predictor::CareerCandidate;
use crate::skills;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PredictRequest {
    pub skills: Option<Vec<String>>,
    /// Comma- or space-separated skill list, for form-style callers.
    pub skills_text: Option<String>,
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub skills_used: Vec<String>,
    pub candidates: Vec<CareerCandidate>,
}

/// POST /api/v1/careers/predict
/// Accepts an explicit skill list, raw resume text, or both; with text the
/// skills are extracted server-side.
pub async fn handle_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let explicit = req.skills.as_deref().unwrap_or(&[]);
    let skills_text = req
        .skills_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let text = req
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if explicit.is_empty() && skills_text.is_none() && text.is_none() {
        return Err(AppError::Validation(
            "Either skills, skills_text, or text must be provided".to_string(),
        ));
    }

    let mut skill_set = skills::normalize_skills(explicit);
    if let Some(listed) = skills_text {
        skill_set.extend(skills::parse_skill_list(listed));
    }
    if let Some(t) = text {
        skill_set.extend(skills::extract(t));
    }

    let candidates = state.predictor.predict(&skill_set).await?;

    // Served predictions feed the co-occurrence counts; a failed write must
    // not fail the prediction itself.
    if let Some(top) = candidates.first() {
        if let Err(e) = state.learning.record_prediction(&skill_set, &top.career).await {
            warn!("Failed to record prediction occurrence: {e}");
        }
    }

    Ok(Json(PredictResponse {
        skills_used: skill_set.into_iter().collect(),
        candidates,
    }))
}
