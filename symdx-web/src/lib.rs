//! symdx-web library - Symptom diagnosis web service
//!
//! Serves a pre-trained symptom classifier over HTTP: a JSON prediction
//! endpoint, a landing page and a metrics dashboard.

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use symdx_common::{Metrics, ModelComponents};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod report;

pub use crate::error::{ApiError, ApiResult};

/// URL prefix the static directory is mounted under
pub const STATIC_PREFIX: &str = "/static";

/// Application state shared across HTTP handlers
///
/// Built once at startup and never written afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Complete model, absent if any artifact failed to load
    pub model: Option<ModelComponents>,
    /// Evaluation metrics (empty record if unavailable)
    pub metrics: Arc<Metrics>,
    /// Directory served under [`STATIC_PREFIX`]
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(model: Option<ModelComponents>, metrics: Metrics, static_dir: PathBuf) -> Self {
        Self {
            model,
            metrics: Arc::new(metrics),
            static_dir,
        }
    }

    /// Public URL of the dashboard chart, whether or not it was generated
    pub fn chart_url(&self) -> String {
        format!("{}/{}", STATIC_PREFIX, report::CHART_FILE)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(api::serve_index))
        .route("/predict_ui", post(api::predict_ui))
        .route("/dashboard", get(api::dashboard))
        .merge(api::health_routes())
        .nest_service(STATIC_PREFIX, static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
