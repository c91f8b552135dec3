//! Prediction endpoint
//!
//! POST /predict_ui turns a free-text symptom description into a diagnosis
//! label using the model loaded at startup.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

/// Request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Option<String>,
}

/// Successful prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub symptoms: String,
    pub diagnosis: String,
}

/// POST /predict_ui
///
/// - 400 when `symptoms` is missing or empty (checked first, so it holds
///   even when the model is unavailable)
/// - 500 "Model components not loaded" when any artifact is absent
/// - 500 with the raw message when inference fails
pub async fn predict_ui(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<PredictResponse>> {
    // Parsed by hand so malformed bodies get the same `{"error": ...}` shape
    let request: PredictRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let symptoms = match request.symptoms {
        Some(s) if !s.is_empty() => s,
        _ => return Err(ApiError::BadRequest("No symptoms provided".to_string())),
    };

    let model = state.model.as_ref().ok_or(ApiError::ModelsUnavailable)?;

    let diagnosis = model.diagnose(&symptoms)?;
    debug!("Predicted '{}' for {} chars of input", diagnosis, symptoms.len());

    Ok(Json(PredictResponse {
        symptoms,
        diagnosis,
    }))
}
