use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use shared::permissions::UserPermissionsResponse;
use tracing::info;

use super::errors::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/usuarios/:usuario/permisos", get(get_user_permissions))
}

/// Permission set loaded once per session by the frontend
pub async fn get_user_permissions(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    info!("GET /api/usuarios/{}/permisos", user);

    let permissions = state.permission_service.permissions_for(&user).await?;
    Ok(Json(UserPermissionsResponse { user, permissions }))
}
