//! # Storage Module
//!
//! Persistence for the accounts payable service. The domain layer only sees
//! the traits in [`traits`]; the CSV backend under [`csv`] keeps each
//! collection in one file of the data directory:
//!
//! - `cuentas_pagar.csv`: payable accounts
//! - `proveedores.csv`: providers
//! - `categorias.csv`: expense categories
//! - `permisos.yaml`: per-user permission table

pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{
    CategoryStorage, Connection, PayableChange, PayableModification, PayableStorage, PermissionStorage,
    ProviderStorage,
};
