//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::error::{Result, ServerError};
use super::feedback::{feedback_for, portal_score, round_to_cents, SCORING_FAILED};
use super::state::AppState;
use crate::pipeline::Pipeline;
use crate::utils::data_loader::ResumeRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: i64,
    pub feedback: String,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Resume Score API is running.",
    }))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.pipeline.estimator().kind(),
        "model_path": state.config.model_path.display().to_string(),
        "uptime_secs": uptime.num_seconds(),
    }))
}

/// Score one résumé, rounded to two decimals
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ResumeRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>> {
    let Json(record) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let score = score_record(Arc::clone(&state.pipeline), record).await?;
    debug!(score, "Scored resume");

    Ok(Json(PredictResponse {
        score: round_to_cents(score),
    }))
}

/// Portal endpoint: score raw résumé text against the fixed profile
pub async fn api_score(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>> {
    let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let record = ResumeRecord::from_text(request.text);
    let response = match score_record(Arc::clone(&state.pipeline), record).await {
        Ok(raw) => {
            let score = portal_score(raw);
            ScoreResponse {
                score,
                feedback: feedback_for(score).to_string(),
            }
        }
        Err(e) => {
            error!(error = %e, "Portal scoring failed");
            ScoreResponse {
                score: 0,
                feedback: SCORING_FAILED.to_string(),
            }
        }
    };

    Ok(Json(response))
}

async fn score_record(pipeline: Arc<Pipeline>, record: ResumeRecord) -> Result<f64> {
    let scores = tokio::task::spawn_blocking(move || {
        let df = record.to_frame()?;
        pipeline.predict(&df)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("prediction task failed: {}", e)))??;

    scores
        .first()
        .copied()
        .ok_or_else(|| ServerError::Prediction("model returned no score".to_string()))
}
