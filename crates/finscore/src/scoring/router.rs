use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::FinancialRecord;
use super::service::FinancialScoreService;

pub const SCORE_ROUTE: &str = "/calculate_financial_score";

/// Router exposing the single-record scoring endpoint.
pub fn scoring_router(service: Arc<FinancialScoreService>) -> Router {
    Router::new()
        .route(SCORE_ROUTE, post(score_handler))
        .with_state(service)
}

/// Structural and computational failures both map to 400.
pub(crate) async fn score_handler(
    State(service): State<Arc<FinancialScoreService>>,
    payload: Result<Json<FinancialRecord>, JsonRejection>,
) -> Response {
    let record = match payload {
        Ok(Json(record)) => record,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match service.respond(&record) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => bad_request(err.to_string()),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
