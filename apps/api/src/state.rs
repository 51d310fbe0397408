use std::sync::Arc;

use crate::learning::engine::LearningEngine;
use crate::learning::patterns::PatternStore;
use crate::matching::matcher::JobFitMatcher;
use crate::prediction::predictor::CareerPredictor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The pattern table — the only shared mutable resource in the engine.
    /// Writes are atomic per (skill, career) key.
    pub patterns: Arc<dyn PatternStore>,
    /// The single writer of the pattern table.
    pub learning: Arc<LearningEngine>,
    pub predictor: Arc<CareerPredictor>,
    pub matcher: Arc<JobFitMatcher>,
}
