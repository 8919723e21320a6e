use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    Json,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::llm::CompletionBackend;
use crate::models::{GenerateReportRequest, GenerateReportResponse};

use super::{ApiError, AppState};

pub async fn root<B: CompletionBackend>(
    State(state): State<Arc<AppState<B>>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
) -> Result<Json<Value>, ApiError> {
    if state.root_limiter.check_key(&client.ip()).is_err() {
        tracing::warn!(client = %client.ip(), "root_rate_limited");
        return Err(ApiError::RateLimited);
    }

    Ok(Json(json!({
        "service": "Trade Report Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Technical-indicator review of completed paper trades",
        "endpoints": ["POST /reports/generate"],
    })))
}

pub async fn generate_report<B: CompletionBackend>(
    State(state): State<Arc<AppState<B>>>,
    payload: Result<Json<GenerateReportRequest>, JsonRejection>,
) -> Result<Json<GenerateReportResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Validation {
        field: None,
        message: rejection.body_text(),
    })?;
    request.validate()?;

    tracing::info!(
        trade_cycle_id = request.trade_cycle_id,
        symbol = %request.symbol,
        profit_loss_rate = request.profit_loss_rate,
        "report_generation_request"
    );

    let response = state.generator.generate_response(&request).await?;
    Ok(Json(response))
}
