//! # REST API Interface Layer
//!
//! HTTP endpoints of the accounts payable service. Handlers log the request
//! line, call one domain service and map `DomainError` to a JSON error body
//! through [`errors::ApiError`].
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET, POST | `/api/cuentas-pagar` | [`payable_apis`] |
//! | GET, PUT, DELETE | `/api/cuentas-pagar/:id` | [`payable_apis`] |
//! | PUT | `/api/cuentas-pagar/:id/pagado` | [`payable_apis`] |
//! | POST | `/api/cuentas-pagar/:id/abonos` | [`payable_apis`] |
//! | GET | `/api/cuentas-pagar/export` | [`export_apis`] |
//! | GET, POST | `/api/proveedores`, `/api/categorias` | [`reference_apis`] |
//! | GET | `/api/usuarios/:usuario/permisos` | [`permission_apis`] |
//! | POST | `/api/logs` | [`logging_apis`] |

use axum::Router;

use crate::AppState;

pub mod errors;
pub mod export_apis;
pub mod logging_apis;
pub mod mappers;
pub mod payable_apis;
pub mod permission_apis;
pub mod reference_apis;

pub use errors::{ApiError, ApiResult};

/// Every API route, without state or middleware
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(payable_apis::router())
        .merge(export_apis::router())
        .merge(reference_apis::router())
        .merge(permission_apis::router())
        .merge(logging_apis::router())
}
