use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use finscore::dataset::{load_transactions, DashboardSession, Dataset, DatasetReport, FamilyProfile};
use finscore::error::AppError;
use finscore::scoring::{scoring_router, FamilyId, FinancialScoreService};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetReportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) family_id: Option<i64>,
    #[serde(default)]
    pub(crate) new_records: Vec<FamilyProfile>,
}

pub(crate) fn with_scoring_routes(service: Arc<FinancialScoreService>) -> axum::Router {
    scoring_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/dataset/report",
            axum::routing::post(dataset_report_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dataset_report_endpoint(
    Extension(service): Extension<Arc<FinancialScoreService>>,
    payload: Result<Json<DatasetReportRequest>, JsonRejection>,
) -> Result<Json<DatasetReport>, AppError> {
    let Json(payload) = payload?;
    let DatasetReportRequest {
        csv,
        family_id,
        new_records,
    } = payload;

    let rows = load_transactions(Cursor::new(csv.into_bytes()))?;
    let mut session = DashboardSession::new(Arc::new(Dataset::new(rows)), service.engine().clone());
    for profile in new_records {
        let added_id = profile.record.family_id;
        // unscorable additions stay in the table with an empty score
        if let Err(err) = session.add_record(profile) {
            warn!(family_id = %added_id, error = %err, "new family record could not be scored");
        }
    }

    let report = DatasetReport::build(&session, family_id.map(FamilyId));
    info!(
        rows = report.row_count,
        families = report.scored_families.len(),
        "dataset report generated"
    );
    Ok(Json(report))
}
