//! Fraud Detection App - Main Entry Point
//!
//! Loads the classifier once, then serves the transaction form.
//! A model that cannot be loaded stops startup before the listener is bound.

use anyhow::{Context, Result};
use fraud_detection_app::{
    config::{AppConfig, LoggingConfig},
    models::{Classifier, ModelLoader, TransactionEvaluator},
    types::FEATURE_COUNT,
    web,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Fraud Detection App");
    info!(
        model_path = %config.model.path,
        bind_address = %config.server.bind_address,
        "Configuration loaded"
    );

    // Without a model there is nothing to serve
    let loader = ModelLoader::with_threads(config.model.onnx_threads);
    let classifier = match loader.load_model(&config.model.path) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!(error = %e, "Failed to load classifier artifact");
            return Err(e).context("Classifier artifact could not be loaded");
        }
    };

    if let Some(width) = classifier.input_width() {
        if width != FEATURE_COUNT {
            warn!(
                expected = FEATURE_COUNT,
                model_width = width,
                "Model input width does not match the transaction record; evaluations will fail"
            );
        }
    }

    let app = web::router(TransactionEvaluator::new(classifier));

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!("Serving form on http://{}", config.server.bind_address);

    axum::serve(listener, app).await?;

    info!("Fraud Detection App shutting down...");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("fraud_detection_app={}", logging.level))
    })?;

    match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    Ok(())
}
