//! ExoHunt API Server
//!
//! REST API for classifying transit candidates with the trained model.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use inference_engine::InferenceService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;
pub mod telemetry;

use config::{AppConfig, LoggingConfig};

/// Application state shared across handlers
pub struct AppState {
    /// Prediction service
    pub service: Arc<InferenceService>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(service: Arc<InferenceService>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics,
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>, config: &AppConfig) -> Router {
    let mut predictions: Router<Arc<AppState>> = Router::new()
        .route("/api/v1/predict", post(routes::predictions::predict))
        .route("/api/v1/batch-predict", post(routes::predictions::batch_predict));

    if config.rate_limit.enabled {
        match rate_limit::create_governor_config(&config.rate_limit) {
            Some(governor) => {
                predictions = predictions.layer(GovernorLayer { config: governor });
            }
            None => warn!("Rate limit quota is degenerate, limiter disabled"),
        }
    }

    let mut router = Router::new()
        .route("/", get(routes::model::root))
        .route("/api/v1/health", get(routes::model::health))
        .route("/api/v1/model-info", get(routes::model::model_info))
        .route("/metrics", get(metrics_handler))
        .merge(predictions)
        .layer(TraceLayer::new_for_http());

    if config.server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics exporter disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);

    let result = if config.json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    result.expect("Failed to set tracing subscriber");
}

/// Run the server.
///
/// Starts listening immediately and loads the model in the background;
/// requests arriving before the load finishes get 503.
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = if config.metrics.enabled {
        Some(telemetry::install_recorder()?)
    } else {
        None
    };
    telemetry::set_model_ready(false);

    let service = Arc::new(InferenceService::new());
    let state = Arc::new(AppState::new(Arc::clone(&service), metrics));
    let app = create_router(state, &config);

    let location = config.artifacts.location();
    tokio::spawn(async move {
        let ready = service.load(&location).await.is_ok();
        telemetry::set_model_ready(ready);
    });

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
