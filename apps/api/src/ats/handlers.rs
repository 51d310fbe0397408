use axum::Json;

use crate::ats::{self, AtsReport, ResumeInput};
use crate::errors::AppError;

/// POST /api/v1/resumes/score
pub async fn handle_score(Json(input): Json<ResumeInput>) -> Result<Json<AtsReport>, AppError> {
    let report = ats::score(&input)?;
    Ok(Json(report))
}
