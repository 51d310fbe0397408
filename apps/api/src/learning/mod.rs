// Self-learning layer: the skill→career pattern table, the feedback updater
// that mutates it, and read-only insight views. LearningEngine is the only
// writer of patterns — predictors and scorers read, never write.

pub mod engine;
pub mod handlers;
pub mod insights;
pub mod patterns;

pub use engine::LearningEngine;
pub use patterns::{MemoryPatternStore, PatternStore, PgPatternStore};
