//! HTTP surface: routing, shared state and server lifecycle.

pub mod error;
pub mod pages;
pub mod routes;
pub mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use agronomy_core::db::DbPool;
use agronomy_core::PredictionPipeline;
use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::info;

pub use error::WebError;
pub use session::{SessionStore, SESSION_COOKIE};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
    /// `None` when the server runs without a database.
    pub db: Option<DbPool>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pipeline: PredictionPipeline, db: Option<DbPool>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            db,
            sessions: SessionStore::new(),
        }
    }

    pub fn require_db(&self) -> Result<&DbPool, WebError> {
        self.db.as_ref().ok_or(WebError::DatabaseUnavailable)
    }
}

impl FromRef<AppState> for SessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/about", get(routes::about))
        .route("/services", get(routes::services))
        .route("/products", get(routes::products))
        .route("/blogs", get(routes::blogs))
        .route("/predict", get(routes::predict_page).post(routes::predict))
        .route("/contact", get(routes::contact_page).post(routes::contact))
        .route("/signup", get(routes::signup_page).post(routes::signup))
        .route("/login", get(routes::login_page).post(routes::login))
        .route("/logout", get(routes::logout))
        .route("/healthz", get(routes::healthz))
        .layer(middleware::from_fn(session::ensure_session))
        .with_state(state)
}

pub async fn serve(state: AppState, bind: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(
        address = %bind,
        database = state.db.is_some(),
        classifier = state.pipeline.classifier_name(),
        "Listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
