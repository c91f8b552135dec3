//! Integration tests for symdx-web API endpoints
//!
//! Tests cover:
//! - POST /predict_ui success, validation and model-unavailable paths
//! - Inference errors surfaced as 500 with the raw message
//! - GET /dashboard with and without metrics
//! - GET / landing page, GET /health, static chart serving

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use symdx_common::model::{
    Classifier, FeatureVector, IndexLabelEncoder, LabelEncoder, LinearClassifier, Vectorizer,
};
use symdx_common::{Error, Metrics, ModelComponents, Result};
use symdx_web::{build_router, report, AppState};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Stub vectorizer: counts occurrences of each keyword
struct KeywordVectorizer {
    keywords: Vec<&'static str>,
}

impl Vectorizer for KeywordVectorizer {
    fn transform(&self, documents: &[&str]) -> Result<Vec<FeatureVector>> {
        Ok(documents
            .iter()
            .map(|doc| {
                let doc = doc.to_lowercase();
                self.keywords
                    .iter()
                    .map(|k| doc.matches(k).count() as f64)
                    .collect()
            })
            .collect())
    }
}

/// Stub vectorizer that always fails
struct FailingVectorizer;

impl Vectorizer for FailingVectorizer {
    fn transform(&self, _documents: &[&str]) -> Result<Vec<FeatureVector>> {
        Err(Error::Inference("vocabulary not fitted".to_string()))
    }
}

/// Stub classifier that fails the test if reached
struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn predict(&self, _features: &[FeatureVector]) -> Result<Vec<usize>> {
        panic!("classifier must not be reached");
    }
}

fn keyword_model() -> ModelComponents {
    let vectorizer = KeywordVectorizer {
        keywords: vec!["fever", "sneez", "headache"],
    };
    let classifier = LinearClassifier::new(
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ],
        vec![0.0, 0.0, 0.0],
    );
    let encoder = IndexLabelEncoder::new(vec![
        "flu".to_string(),
        "common cold".to_string(),
        "migraine".to_string(),
    ]);
    ModelComponents::new(Arc::new(classifier), Arc::new(vectorizer), Arc::new(encoder))
}

/// Test helper: Create app with the given model and metrics
fn setup_app(
    model: Option<ModelComponents>,
    metrics: Metrics,
    static_dir: &TempDir,
) -> axum::Router {
    let state = AppState::new(model, metrics, static_dir.path().to_path_buf());
    build_router(state)
}

/// Test helper: POST JSON to /predict_ui
fn predict_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict_ui")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

// =============================================================================
// Prediction Tests
// =============================================================================

#[tokio::test]
async fn test_predict_returns_diagnosis() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(Some(keyword_model()), Metrics::default(), &dir);

    let response = app
        .oneshot(predict_request(r#"{"symptoms": "Constant sneezing and sneezing"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({"symptoms": "Constant sneezing and sneezing", "diagnosis": "common cold"})
    );
}

#[tokio::test]
async fn test_predict_matches_component_chain() {
    let dir = TempDir::new().unwrap();
    let model = keyword_model();
    let symptoms = "fever with a mild headache and more fever";

    let features = model.vectorizer.transform(&[symptoms]).unwrap();
    let ids = model.classifier.predict(&features).unwrap();
    let expected = model.label_encoder.inverse_transform(&ids).unwrap()[0].clone();

    let app = setup_app(Some(model), Metrics::default(), &dir);
    let response = app
        .oneshot(predict_request(&json!({ "symptoms": symptoms }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["diagnosis"], expected.as_str());
    assert_eq!(expected, "flu");
}

#[tokio::test]
async fn test_missing_symptoms_is_bad_request_regardless_of_model() {
    for model in [Some(keyword_model()), None] {
        for body in [r#"{}"#, r#"{"symptoms": ""}"#, r#"{"symptoms": null}"#] {
            let dir = TempDir::new().unwrap();
            let app = setup_app(model.clone(), Metrics::default(), &dir);

            let response = app.oneshot(predict_request(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            let json = extract_json(response.into_body()).await;
            assert_eq!(json, json!({"error": "No symptoms provided"}));
        }
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(Some(keyword_model()), Metrics::default(), &dir);

    let response = app.oneshot(predict_request("symptoms=fever")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = extract_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[tokio::test]
async fn test_model_not_loaded_is_server_error() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(None, Metrics::default(), &dir);

    let response = app
        .oneshot(predict_request(r#"{"symptoms": "fever"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json, json!({"error": "Model components not loaded"}));
}

#[tokio::test]
async fn test_inference_error_is_surfaced_verbatim() {
    let dir = TempDir::new().unwrap();
    let model = ModelComponents::new(
        Arc::new(PanickingClassifier),
        Arc::new(FailingVectorizer),
        Arc::new(IndexLabelEncoder::new(vec!["flu".to_string()])),
    );
    let app = setup_app(Some(model), Metrics::default(), &dir);

    let response = app
        .oneshot(predict_request(r#"{"symptoms": "fever"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json, json!({"error": "vocabulary not fitted"}));
}

#[tokio::test]
async fn test_unseen_label_is_server_error() {
    let dir = TempDir::new().unwrap();
    let mut model = keyword_model();
    let short: Arc<dyn LabelEncoder> = Arc::new(IndexLabelEncoder::new(vec!["flu".to_string()]));
    model.label_encoder = short;
    let app = setup_app(Some(model), Metrics::default(), &dir);

    let response = app
        .oneshot(predict_request(r#"{"symptoms": "headache"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = extract_json(response.into_body()).await;
    assert_eq!(json["error"], "y contains previously unseen labels: [2]");
}

// =============================================================================
// Dashboard Tests
// =============================================================================

#[tokio::test]
async fn test_dashboard_shows_rounded_accuracy_and_counts() {
    let dir = TempDir::new().unwrap();
    let metrics = Metrics::from_json_str(
        r#"{"accuracy": 0.8734, "label_distribution": {"flu": 10, "cold": 5}}"#,
    )
    .unwrap();
    let app = setup_app(None, metrics, &dir);

    let response = app.oneshot(get_request("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;
    assert!(html.contains(">87.34%<"));

    let flu = html.find("<td>flu</td><td class=\"count\">10</td>").expect("flu row");
    let cold = html.find("<td>cold</td><td class=\"count\">5</td>").expect("cold row");
    assert!(flu < cold, "rows keep file order");
    assert!(html.contains("src=\"/static/chart.svg?v="));
}

#[tokio::test]
async fn test_dashboard_without_metrics_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(None, Metrics::default(), &dir);

    let response = app.oneshot(get_request("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;
    assert!(html.contains(">0%<"));
    assert!(html.contains("No label distribution available"));
    // Chart reference is present even though no chart exists
    assert!(html.contains("/static/chart.svg"));
}

// =============================================================================
// Landing Page, Health and Static Files
// =============================================================================

#[tokio::test]
async fn test_index_page() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(None, Metrics::default(), &dir);

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = extract_text(response.into_body()).await;
    assert!(html.contains("/predict_ui"));
    assert!(html.contains("/dashboard"));
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(None, Metrics::default(), &dir);

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "symdx-web");
    assert_eq!(body["model_loaded"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_carries_build_identification() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(Some(keyword_model()), Metrics::default(), &dir);

    let response = app.oneshot(get_request("/health")).await.unwrap();

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["model_loaded"], true);
    assert!(!body["git_hash"].as_str().unwrap().is_empty());
    assert!(body["build_profile"].is_string());
    // UTC stamp from the build script
    assert!(body["build_timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_generated_chart_is_served() {
    let dir = TempDir::new().unwrap();
    let metrics = Metrics {
        accuracy: Some(0.9),
        label_distribution: Some(vec![("flu".to_string(), 3)]),
    };
    report::generate_chart(&metrics, dir.path()).unwrap();
    let app = setup_app(None, metrics, &dir);

    let response = app.oneshot(get_request("/static/chart.svg")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let svg = extract_text(response.into_body()).await;
    assert_eq!(svg.matches(r#"class="bar""#).count(), 1);
}

#[tokio::test]
async fn test_missing_chart_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = setup_app(None, Metrics::default(), &dir);

    let response = app.oneshot(get_request("/static/chart.svg")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
