//! HTTP API handlers for symdx-web

pub mod dashboard;
pub mod health;
pub mod predict;
pub mod ui;

pub use dashboard::{dashboard, DashboardView};
pub use health::health_routes;
pub use predict::{predict_ui, PredictRequest, PredictResponse};
pub use ui::serve_index;
