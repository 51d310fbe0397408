// Career prediction: external classifier inference blended with the learned
// pattern layer. All classifier calls go through the CareerClassifier trait —
// no direct model access anywhere else.

pub mod classifier;
pub mod handlers;
pub mod predictor;

pub use classifier::{CareerClassifier, HttpClassifier};
pub use predictor::CareerPredictor;
