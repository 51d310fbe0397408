// Job-fit matching: skill-set overlap scoring plus a reported semantic
// similarity signal. Vectorizer backends are pluggable; the matcher never
// fails a match over a missing similarity.

pub mod handlers;
pub mod matcher;
pub mod vectorizer;

pub use matcher::JobFitMatcher;
pub use vectorizer::{HttpVectorizer, TextVectorizer, TfidfCosineVectorizer};
