//! IdeaBoost server binary.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use ideaboost::adapters::{
    build_router, AiIdeaEnhancer, GeminiConfig, GeminiProvider, InMemoryRateLimiter,
    SmtpIdeaNotifier,
};
use ideaboost::application::handlers::EnhanceIdeaHandler;
use ideaboost::config::{AppConfig, ValidationError};
use ideaboost::ports::IdeaNotifier;
use ideaboost::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(&config.server)?;

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let addr = config.server.socket_addr()?;
    let app = build_app(&config).map_err(|e| {
        tracing::error!("Failed to initialise services: {}", e);
        e
    })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "IdeaBoost server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_app(config: &AppConfig) -> Result<axum::Router, Box<dyn Error>> {
    let api_key = config
        .ai
        .gemini_api_key
        .as_deref()
        .ok_or(ValidationError::MissingRequired("GEMINI_API_KEY"))?;

    let provider = GeminiProvider::new(
        GeminiConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout()),
    )?;

    let enhancer = AiIdeaEnhancer::new(Arc::new(provider))
        .with_timeout(config.ai.timeout())
        .with_validity_gate(config.ai.validity_gate)
        .with_generation(config.ai.max_output_tokens, config.ai.temperature);

    let notifier = Arc::new(SmtpIdeaNotifier::from_config(&config.email));
    let email_configured = notifier.is_configured();
    let handler = Arc::new(
        EnhanceIdeaHandler::new(Arc::new(enhancer), notifier)
            .with_delivery_timeout(config.email.delivery_timeout()),
    );
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    tracing::info!(
        model = %config.ai.model,
        validity_gate = config.ai.validity_gate,
        email_configured,
        requests_per_window = config.rate_limit.requests_per_window,
        window_secs = config.rate_limit.window_secs,
        "Services initialised"
    );

    Ok(build_router(config, handler, limiter))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
