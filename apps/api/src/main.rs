mod ats;
mod config;
mod db;
mod errors;
mod learning;
mod matching;
mod models;
mod prediction;
mod routes;
mod skills;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::learning::engine::LearningEngine;
use crate::learning::patterns::{PatternStore, PgPatternStore};
use crate::matching::matcher::JobFitMatcher;
use crate::matching::vectorizer::{HttpVectorizer, TextVectorizer, TfidfCosineVectorizer};
use crate::prediction::classifier::HttpClassifier;
use crate::prediction::predictor::CareerPredictor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lodestar API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);

    // Initialize the classifier client
    let classifier = Arc::new(HttpClassifier::new(
        config.classifier_url.clone(),
        upstream_timeout,
    ));
    info!("Classifier client initialized ({})", config.classifier_url);

    // Initialize the similarity backend (local TF-IDF unless VECTORIZER_URL is set)
    let vectorizer: Arc<dyn TextVectorizer> = match &config.vectorizer_url {
        Some(url) => {
            info!("Using remote vectorizer ({url})");
            Arc::new(HttpVectorizer::new(url.clone(), upstream_timeout))
        }
        None => {
            info!("Using local TF-IDF vectorizer");
            Arc::new(TfidfCosineVectorizer)
        }
    };

    // Wire the engine: one pattern store, one writer, read-side consumers
    let patterns: Arc<dyn PatternStore> = Arc::new(PgPatternStore::new(db));
    let learning = Arc::new(LearningEngine::new(patterns.clone()));
    let predictor = Arc::new(CareerPredictor::new(
        classifier,
        patterns.clone(),
        config.blend_weight,
    ));
    let matcher = Arc::new(JobFitMatcher::new(vectorizer));
    info!("Prediction blend weight: {}", config.blend_weight);

    // Build app state
    let state = AppState {
        patterns,
        learning,
        predictor,
        matcher,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
