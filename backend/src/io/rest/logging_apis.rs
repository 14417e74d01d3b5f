use axum::{extract::State, response::Json, routing::post, Router};
use shared::{LogEntry, LogResponse};
use tracing::{debug, error, info, warn};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/logs", post(log_message))
}

/// Re-emit a frontend log line through the backend subscriber
pub async fn log_message(
    State(_app_state): State<AppState>,
    Json(entry): Json<LogEntry>,
) -> Json<LogResponse> {
    let component = entry.component.as_deref().unwrap_or("frontend");

    match entry.level.to_lowercase().as_str() {
        "debug" => debug!(target: "frontend", component, "{}", entry.message),
        "warn" => warn!(target: "frontend", component, "{}", entry.message),
        "error" => error!(target: "frontend", component, "{}", entry.message),
        _ => info!(target: "frontend", component, "{}", entry.message),
    }

    Json(LogResponse { success: true })
}
