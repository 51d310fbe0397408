use axum::Json;
use serde::{Deserialize, Serialize};

use crate::skills;

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub skills: Vec<String>,
    pub count: usize,
}

/// POST /api/v1/skills/extract
/// Total over any input: unmatched text returns an empty list.
pub async fn handle_extract(Json(req): Json<ExtractRequest>) -> Json<ExtractResponse> {
    let skills: Vec<String> = skills::extract(&req.text).into_iter().collect();
    let count = skills.len();
    Json(ExtractResponse { skills, count })
}
