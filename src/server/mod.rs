//! HTTP surface for a loaded model.
//!
//! Routes:
//! - `GET  /`                  model listing with endpoint paths
//! - `POST /predict`           one record -> probability, list -> list of probabilities
//! - `GET  /input_parameters`  feature descriptions
//! - `GET  /health`            liveness
//!
//! Validation failures return 422 with a JSON error body; malformed bodies
//! return 400.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::domain::{FeatureSpec, Scores, ServeConfig};
use crate::error::{AppError, ValidationError};
use crate::models::LogisticModel;

pub type SharedModel = Arc<LogisticModel>;

pub fn router(model: SharedModel) -> Router {
    Router::new()
        .route("/", get(list_models))
        .route("/predict", post(predict))
        .route("/input_parameters", get(input_parameters))
        .route("/health", get(health))
        .with_state(model)
}

/// Bind `config.addr` and serve until ctrl-c.
pub async fn serve(config: ServeConfig, model: SharedModel) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| AppError::new(4, format!("Failed to bind {}: {e}", config.addr)))?;

    info!(addr = %config.addr, model = %model.metadata().model_name, "serving model");

    axum::serve(listener, router(model))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::new(4, format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl+c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[derive(Debug, Serialize)]
struct ModelListing {
    models: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
struct ModelEntry {
    model_uri: String,
    model_name: String,
    path: &'static str,
    path_parameters: &'static str,
}

async fn list_models(State(model): State<SharedModel>) -> Json<ModelListing> {
    let meta = model.metadata();
    Json(ModelListing {
        models: vec![ModelEntry {
            model_uri: meta.model_uri.clone(),
            model_name: meta.model_name.clone(),
            path: "/predict",
            path_parameters: "/input_parameters",
        }],
    })
}

async fn predict(
    State(model): State<SharedModel>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Scores>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;
    let scores = model.predict_value(body).map_err(|err| {
        debug!(kind = err.kind(), "prediction rejected: {err}");
        ApiError::Validation(err)
    })?;
    Ok(Json(scores))
}

async fn input_parameters(State(model): State<SharedModel>) -> Json<Vec<FeatureSpec>> {
    Json(model.input_parameters().to_vec())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Error responses for `/predict`.
#[derive(Debug)]
pub enum ApiError {
    Malformed(String),
    Validation(ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Malformed(message) => {
                let body = json!({ "error": message, "kind": "MalformedBody" });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Validation(err) => {
                let status = match err {
                    ValidationError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                let body = json!({
                    "error": err.to_string(),
                    "kind": err.kind(),
                    "feature": err.feature(),
                    "item": err.item(),
                });
                (status, Json(body)).into_response()
            }
        }
    }
}
