//! # REST API for Data Export
//!
//! `GET /api/cuentas-pagar/export` answers with a CSV attachment of the
//! payables matching the same filter query the list view uses.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Local;
use shared::{PayableFilter, PayableFilterQuery};
use tracing::{error, info};

use super::errors::{ApiError, ApiResult};
use crate::domain::commands::export::ExportPayablesQuery;
use crate::domain::DomainError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/cuentas-pagar/export", get(export_payables_csv))
}

pub async fn export_payables_csv(
    State(state): State<AppState>,
    query: Result<Query<PayableFilterQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query.map_err(|r| ApiError::bad_request(r.body_text()))?;
    info!("GET /api/cuentas-pagar/export - query: {:?}", query);

    let filter = PayableFilter::try_from(query).map_err(DomainError::from)?;
    let result = state
        .export_service
        .export_payables_csv(ExportPayablesQuery {
            filter,
            export_date: Local::now().date_naive(),
        })
        .await
        .map_err(|e| {
            error!("Failed to export payables: {}", e);
            ApiError::from(e)
        })?;

    info!("Export {} with {} rows", result.filename, result.row_count);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", result.filename),
            ),
        ],
        result.csv_content,
    ))
}
