pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats;
use crate::learning;
use crate::matching;
use crate::prediction;
use crate::skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Core engine surface
        .route(
            "/api/v1/skills/extract",
            post(skills::handlers::handle_extract),
        )
        .route("/api/v1/resumes/score", post(ats::handlers::handle_score))
        .route(
            "/api/v1/careers/predict",
            post(prediction::handlers::handle_predict),
        )
        .route(
            "/api/v1/feedback",
            post(learning::handlers::handle_feedback),
        )
        .route("/api/v1/jobs/match", post(matching::handlers::handle_match))
        // Learned-state introspection
        .route(
            "/api/v1/learning/skills/:skill",
            get(learning::handlers::handle_skill_insights),
        )
        .route(
            "/api/v1/learning/careers/:career",
            get(learning::handlers::handle_career_requirements),
        )
        .route(
            "/api/v1/learning/patterns",
            get(learning::handlers::handle_top_patterns),
        )
        .route(
            "/api/v1/learning/stats",
            get(learning::handlers::handle_stats),
        )
        .with_state(state)
}
