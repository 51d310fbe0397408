use std::collections::BTreeSet;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::matcher::JobFitResult;
use crate::skills;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub resume_skills: Option<Vec<String>>,
    pub resume_text: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub preferred_skills: Option<Vec<String>>,
    pub job_description: Option<String>,
}

/// POST /api/v1/jobs/match
/// When the posting lists no skills at all, they are extracted from the job
/// description and split 60/40 into required/preferred.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<JobFitResult>, AppError> {
    let explicit = req.resume_skills.as_deref().unwrap_or(&[]);
    let resume_text = req.resume_text.as_deref().unwrap_or("");

    if explicit.is_empty() && resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Either resume_skills or resume_text must be provided".to_string(),
        ));
    }

    let mut resume_skills = skills::normalize_skills(explicit);
    if !resume_text.trim().is_empty() {
        resume_skills.extend(skills::extract(resume_text));
    }

    let job_text = req.job_description.as_deref().unwrap_or("");
    let (required, preferred) = if req.required_skills.is_none() && req.preferred_skills.is_none() {
        split_job_skills(job_text)
    } else {
        (
            skills::normalize_skills(req.required_skills.as_deref().unwrap_or(&[])),
            skills::normalize_skills(req.preferred_skills.as_deref().unwrap_or(&[])),
        )
    };

    let result = state
        .matcher
        .match_job(&resume_skills, &required, &preferred, resume_text, job_text)
        .await;
    Ok(Json(result))
}

/// Splits skills extracted from a job description 60/40 into required and
/// preferred. Too few skills to split: everything is required.
fn split_job_skills(job_text: &str) -> (BTreeSet<String>, BTreeSet<String>) {
    let extracted: Vec<String> = skills::extract(job_text).into_iter().collect();
    let split_point = extracted.len() * 6 / 10;
    if split_point == 0 {
        return (extracted.into_iter().collect(), BTreeSet::new());
    }
    let required = extracted[..split_point].iter().cloned().collect();
    let preferred = extracted[split_point..].iter().cloned().collect();
    (required, preferred)
}
