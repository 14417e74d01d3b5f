//! # REST API for Payable Accounts
//!
//! CRUD on `/api/cuentas-pagar`, plus the paid toggle and partial payments.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use shared::{
    DeletePayableResponse, PartialPaymentRequest, PartialPaymentResponse, PayableAccount, PayableInput,
};
use tracing::{error, info};

use super::errors::{ApiError, ApiResult};
use super::mappers::PayableMapper;
use crate::domain::commands::payables::ApplyPartialPaymentCommand;
use crate::AppState;

/// Create a router for payable APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cuentas-pagar", get(list_payables).post(create_payable))
        .route(
            "/api/cuentas-pagar/:id",
            get(get_payable).put(update_payable).delete(delete_payable),
        )
        .route("/api/cuentas-pagar/:id/pagado", put(toggle_paid))
        .route("/api/cuentas-pagar/:id/abonos", post(apply_partial_payment))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// List every payable, most recent due date first
pub async fn list_payables(State(state): State<AppState>) -> ApiResult<Json<Vec<PayableAccount>>> {
    info!("GET /api/cuentas-pagar");

    let payables = state.payable_service.list_payables().await.map_err(|e| {
        error!("Failed to list payables: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(PayableMapper::to_dtos(payables)))
}

pub async fn get_payable(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PayableAccount>> {
    info!("GET /api/cuentas-pagar/{}", id);

    let payable = state.payable_service.get_payable(&id).await?;
    Ok(Json(PayableMapper::to_dto(payable)))
}

pub async fn create_payable(
    State(state): State<AppState>,
    body: Result<Json<PayableInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PayableAccount>)> {
    let input = json_body(body)?;
    info!("POST /api/cuentas-pagar - concepto: {}", input.concept);

    let payable = state
        .payable_service
        .create_payable(PayableMapper::to_command(input))
        .await
        .map_err(|e| {
            error!("Failed to create payable: {}", e);
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(PayableMapper::to_dto(payable))))
}

/// Full update; also used by the client to record partial payments
pub async fn update_payable(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PayableInput>, JsonRejection>,
) -> ApiResult<Json<PayableAccount>> {
    let input = json_body(body)?;
    info!("PUT /api/cuentas-pagar/{}", id);

    let payable = state
        .payable_service
        .update_payable(&id, PayableMapper::to_command(input))
        .await
        .map_err(|e| {
            error!("Failed to update payable {}: {}", id, e);
            ApiError::from(e)
        })?;
    Ok(Json(PayableMapper::to_dto(payable)))
}

pub async fn toggle_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PayableAccount>> {
    info!("PUT /api/cuentas-pagar/{}/pagado", id);

    let payable = state.payable_service.toggle_paid(&id).await?;
    Ok(Json(PayableMapper::to_dto(payable)))
}

pub async fn apply_partial_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PartialPaymentRequest>, JsonRejection>,
) -> ApiResult<Json<PartialPaymentResponse>> {
    let request = json_body(body)?;
    info!("POST /api/cuentas-pagar/{}/abonos - monto: {}", id, request.amount);

    let result = state
        .payable_service
        .apply_partial_payment(ApplyPartialPaymentCommand {
            payable_id: id.clone(),
            amount: request.amount,
        })
        .await
        .map_err(|e| {
            error!("Failed to apply partial payment to {}: {}", id, e);
            ApiError::from(e)
        })?;

    Ok(Json(PartialPaymentResponse {
        account: PayableMapper::to_dto(result.payable),
        newly_paid: result.newly_paid,
        overpaid_by: result.overpaid_by,
    }))
}

pub async fn delete_payable(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletePayableResponse>> {
    info!("DELETE /api/cuentas-pagar/{}", id);

    let result = state.payable_service.delete_payable(&id).await?;
    Ok(Json(DeletePayableResponse {
        id: result.deleted_id,
        success_message: result.success_message,
    }))
}
