//! # Domain Module
//!
//! Business rules of accounts payable. Services are generic over the storage
//! `Connection` and work on the domain models in [`models`]; the REST layer
//! converts between them and the `shared` DTOs.
//!
//! - [`payable_service`]: CRUD, paid toggle and partial payments
//! - [`reference_data_service`]: providers and categories
//! - [`permission_service`]: per-user permission sets
//! - [`export_service`]: filtered CSV export

pub mod commands;
pub mod errors;
pub mod export_service;
pub mod models;
pub mod payable_service;
pub mod permission_service;
pub mod reference_data_service;

pub use errors::{DomainError, DomainResult};
pub use export_service::ExportService;
pub use payable_service::PayableService;
pub use permission_service::PermissionService;
pub use reference_data_service::ReferenceDataService;
