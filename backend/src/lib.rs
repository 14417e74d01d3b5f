//! # Cuentas por Pagar Backend
//!
//! REST service for the accounts payable area. Layered the usual way:
//! ```text
//! HTTP clients (Yew frontend, scripts)
//!     ↓
//! IO layer (axum handlers, DTO mappers, error translation)
//!     ↓
//! Domain layer (services, commands, models)
//!     ↓
//! Storage layer (CSV files in the data directory)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, ServerConfig};
use crate::domain::{ExportService, PayableService, PermissionService, ReferenceDataService};
use crate::storage::CsvConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub payable_service: PayableService<CsvConnection>,
    pub reference_data_service: ReferenceDataService<CsvConnection>,
    pub permission_service: PermissionService<CsvConnection>,
    pub export_service: ExportService<CsvConnection>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up CSV storage in {}", config.storage.data_dir.display());
    let connection = CsvConnection::new(&config.storage.data_dir)
        .context("Failed to initialize CSV storage")?;

    info!("Setting up domain services (tax rate {})", config.payables.tax_rate);
    Ok(build_state(Arc::new(connection), config.payables.tax_rate))
}

pub fn build_state(connection: Arc<CsvConnection>, tax_rate: f64) -> AppState {
    let payable_service = PayableService::new(connection.clone(), tax_rate);
    let reference_data_service = ReferenceDataService::new(connection.clone());
    let permission_service = PermissionService::new(connection);
    let export_service = ExportService::new(payable_service.clone());

    AppState {
        payable_service,
        reference_data_service,
        permission_service,
        export_service,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let origin = HeaderValue::from_str(&server.cors_origin)
        .with_context(|| format!("Invalid CORS origin: {}", server.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    let mut router = io::api_routes();
    if let Some(static_dir) = &server.static_dir {
        info!("Serving frontend from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use shared::{ErrorResponse, PayableAccount, PartialPaymentResponse};
    use tower::ServiceExt;

    fn test_router(env: &TestEnvironment) -> Router {
        let state = build_state(Arc::new(env.connection.clone()), 0.16);
        create_router(state, &ServerConfig::default()).unwrap()
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn payable_json(concept: &str, net: f64, requires_tax: bool, due: &str) -> Value {
        json!({
            "concepto": concept,
            "monto_neto": net,
            "requiere_iva": requires_tax,
            "categoria": "Servicios",
            "proveedor_id": null,
            "fecha": due,
            "pagado": false,
            "pagos_parciales": 0.0,
            "monto_transferencia": null,
            "monto_efectivo": null
        })
    }

    async fn create(router: &Router, concept: &str, net: f64, due: &str) -> PayableAccount {
        let (status, body) = send(router, "POST", "/api/cuentas-pagar", Some(payable_json(concept, net, false, due))).await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_list_and_get() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);

        let (status, body) = send(
            &router,
            "POST",
            "/api/cuentas-pagar",
            Some(payable_json("Renta", 1000.0, true, "2025-06-10")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: PayableAccount = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.amount_with_tax, 1160.0);

        create(&router, "Luz", 300.0, "2025-07-01").await;

        let (status, body) = send(&router, "GET", "/api/cuentas-pagar", None).await;
        assert_eq!(status, StatusCode::OK);
        let list: Vec<PayableAccount> = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].concept, "Luz");

        let (status, body) = send(&router, "GET", &format!("/api/cuentas-pagar/{}", created.id), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: PayableAccount = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_errors_are_json() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);

        let (status, body) = send(&router, "GET", "/api/cuentas-pagar/cxp-1-ffff", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.error.contains("cxp-1-ffff"));

        let (status, body) = send(
            &router,
            "POST",
            "/api/cuentas-pagar",
            Some(payable_json("", 100.0, false, "2025-06-10")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "El concepto es obligatorio");

        let (status, body) = send(&router, "POST", "/api/cuentas-pagar", Some(json!({"concepto": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(serde_json::from_slice::<ErrorResponse>(&body).is_ok());
    }

    #[tokio::test]
    async fn test_partial_payment_through_put_and_abonos() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);
        let created = create(&router, "Renta", 1000.0, "2025-06-10").await;

        // Client-side rule: the full record goes back with PUT
        let outcome = shared::payment::apply_partial_payment(&created, 400.0).unwrap();
        let input = shared::PayableInput::from(&outcome.updated);
        let (status, body) = send(
            &router,
            "PUT",
            &format!("/api/cuentas-pagar/{}", created.id),
            Some(serde_json::to_value(&input).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: PayableAccount = serde_json::from_slice(&body).unwrap();
        assert_eq!(updated.partial_payments, 400.0);
        assert_eq!(updated.outstanding(), 600.0);

        let (status, body) = send(
            &router,
            "POST",
            &format!("/api/cuentas-pagar/{}/abonos", created.id),
            Some(json!({"monto": 600.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: PartialPaymentResponse = serde_json::from_slice(&body).unwrap();
        assert!(response.newly_paid);
        assert!(response.account.is_paid);
        assert_eq!(response.account.partial_payments, 1000.0);
        assert_eq!(response.account.outstanding(), 0.0);

        let (status, _) = send(
            &router,
            "POST",
            &format!("/api/cuentas-pagar/{}/abonos", created.id),
            Some(json!({"monto": 10.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);
        let created = create(&router, "Renta", 100.0, "2025-06-10").await;

        let (status, body) = send(&router, "PUT", &format!("/api/cuentas-pagar/{}/pagado", created.id), None).await;
        assert_eq!(status, StatusCode::OK);
        let toggled: PayableAccount = serde_json::from_slice(&body).unwrap();
        assert!(toggled.is_paid);

        let (status, _) = send(&router, "DELETE", &format!("/api/cuentas-pagar/{}", created.id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&router, "DELETE", &format!("/api/cuentas-pagar/{}", created.id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_honors_filters() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);
        create(&router, "Renta junio", 100.0, "2025-06-10").await;
        create(&router, "Renta julio", 100.0, "2025-07-10").await;

        let request = Request::builder()
            .uri("/api/cuentas-pagar/export?filtroMes=6&estadoFiltro=pendientes")
            .header(header::ORIGIN, ServerConfig::default().cors_origin)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"cuentas_por_pagar_"));
        let exposed = response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS].to_str().unwrap();
        assert!(exposed.eq_ignore_ascii_case("content-disposition"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Renta junio"));

        let (status, _) = send(&router, "GET", "/api/cuentas-pagar/export", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&router, "GET", "/api/cuentas-pagar/export?filtroMes=13", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reference_data_and_permissions() {
        let env = TestEnvironment::new().unwrap();
        let router = test_router(&env);

        let (status, _) = send(&router, "POST", "/api/proveedores", Some(json!({"nombre": "CFE"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&router, "GET", "/api/proveedores", None).await;
        assert_eq!(status, StatusCode::OK);
        let providers: Vec<shared::Provider> = serde_json::from_slice(&body).unwrap();
        assert_eq!(providers.len(), 1);

        let (status, _) = send(&router, "POST", "/api/categorias", Some(json!({"nombre": "Renta"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&router, "GET", "/api/usuarios/admin/permisos", None).await;
        assert_eq!(status, StatusCode::OK);
        let response: shared::permissions::UserPermissionsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.user, "admin");
        assert!(response.permissions.is_admin);

        let (status, _) = send(
            &router,
            "POST",
            "/api/logs",
            Some(json!({"level": "warn", "message": "hola", "component": "test"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        let state = build_state(Arc::new(env.connection.clone()), 0.16);
        let server = ServerConfig {
            cors_origin: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        assert!(create_router(state, &server).is_err());
    }
}
