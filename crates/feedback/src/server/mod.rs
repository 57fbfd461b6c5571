//! HTTP server for the feedback service.
//!
//! Routes:
//! - `POST /api/submit-feedback` stores a validated submission (201)
//! - `GET /api/feedbacks?page=&limit=&q=` returns one page, newest first
//! - `GET /api/health` always answers `{"status": "ok"}`

pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{Config, PaginationConfig};
use crate::error::Result;
use crate::storage::FeedbackStore;
use crate::validation::Validator;

use routes::{feedbacks_handler, health_handler, submit_feedback_handler};

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// The record store.
    pub store: Arc<FeedbackStore>,
    /// Submission rules.
    pub validator: Validator,
    /// Page size defaults and limits.
    pub pagination: PaginationConfig,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppState {
    /// Build state from configuration, opening the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store can't be opened.
    pub fn from_config(config: &Config) -> Result<Arc<Self>> {
        let store = FeedbackStore::open(config.data_path())?;
        Ok(Self::with_store(store, config))
    }

    /// Build state around an already opened store.
    #[must_use]
    pub fn with_store(store: FeedbackStore, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            store: Arc::new(store),
            validator: Validator::new(&config.validation),
            pagination: config.pagination.clone(),
            allowed_origins: config.allowed_origins(),
        })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(state.allowed_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/submit-feedback", post(submit_feedback_handler))
        .route("/api/feedbacks", get(feedbacks_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the store can't be opened or the address can't be bound.
pub async fn serve(config: &Config) -> Result<()> {
    info!("Initializing state...");
    let state = AppState::from_config(config)?;

    let address = config.bind_address()?;
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
