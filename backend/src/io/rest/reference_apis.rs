//! # REST API for Reference Data
//!
//! Providers and categories feeding the payable form dropdowns.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{Category, CreateCategoryRequest, CreateProviderRequest, Provider};
use tracing::info;

use super::errors::{ApiError, ApiResult};
use crate::domain::commands::reference::{CreateCategoryCommand, CreateProviderCommand};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/proveedores", get(list_providers).post(create_provider))
        .route("/api/categorias", get(list_categories).post(create_category))
}

pub async fn list_providers(State(state): State<AppState>) -> ApiResult<Json<Vec<Provider>>> {
    info!("GET /api/proveedores");
    Ok(Json(state.reference_data_service.list_providers().await?))
}

pub async fn create_provider(
    State(state): State<AppState>,
    body: Result<Json<CreateProviderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Provider>)> {
    let Json(request) = body.map_err(|r| ApiError::bad_request(r.body_text()))?;
    info!("POST /api/proveedores - nombre: {}", request.name);

    let provider = state
        .reference_data_service
        .create_provider(CreateProviderCommand {
            name: request.name,
            rfc: request.rfc,
            contact: request.contact,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    info!("GET /api/categorias");
    Ok(Json(state.reference_data_service.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(request) = body.map_err(|r| ApiError::bad_request(r.body_text()))?;
    info!("POST /api/categorias - nombre: {}", request.name);

    let category = state
        .reference_data_service
        .create_category(CreateCategoryCommand { name: request.name })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
