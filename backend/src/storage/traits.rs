//! # Storage Traits
//!
//! Storage abstraction used by the domain layer. Services are generic over a
//! `Connection`, which hands out one repository per collection.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Category, PermissionSet, Provider};

use crate::domain::models::Payable;

/// In-place change run by `modify_payable` while the write lock is held.
/// Returning `Err` leaves the stored record untouched.
pub type PayableChange = Box<dyn for<'a> FnOnce(&'a mut Payable) -> std::result::Result<(), String> + Send>;

/// What `modify_payable` did with a change
#[derive(Debug, Clone, PartialEq)]
pub enum PayableModification {
    Modified { previous: Payable, updated: Payable },
    /// The change refused the current record; carries its reason
    Rejected(String),
    NotFound,
}

/// Persistence of payable accounts
#[async_trait]
pub trait PayableStorage: Send + Sync {
    /// All payables in file order
    async fn list_payables(&self) -> Result<Vec<Payable>>;

    async fn get_payable(&self, id: &str) -> Result<Option<Payable>>;

    async fn store_payable(&self, payable: &Payable) -> Result<()>;

    /// Replace an existing payable
    /// Returns false when no payable has that ID
    async fn update_payable(&self, payable: &Payable) -> Result<bool>;

    /// Read-modify-write of a single payable under the write lock
    async fn modify_payable(&self, id: &str, change: PayableChange) -> Result<PayableModification>;

    /// Returns true if the payable was found and deleted
    async fn delete_payable(&self, id: &str) -> Result<bool>;
}

/// Persistence of providers
#[async_trait]
pub trait ProviderStorage: Send + Sync {
    async fn list_providers(&self) -> Result<Vec<Provider>>;

    async fn get_provider(&self, id: &str) -> Result<Option<Provider>>;

    async fn store_provider(&self, provider: &Provider) -> Result<()>;
}

/// Persistence of expense categories
#[async_trait]
pub trait CategoryStorage: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Returns false, storing nothing, when a category with the same name
    /// (ignoring ASCII case) already exists
    async fn store_category(&self, category: &Category) -> Result<bool>;
}

/// Read access to the permission table
#[async_trait]
pub trait PermissionStorage: Send + Sync {
    /// Permissions of `user`, None when the user is not listed
    async fn get_permissions(&self, user: &str) -> Result<Option<PermissionSet>>;
}

/// Factory for the repositories of one storage backend
pub trait Connection: Send + Sync + Clone + 'static {
    type PayableRepository: PayableStorage + Clone + 'static;
    type ProviderRepository: ProviderStorage + Clone + 'static;
    type CategoryRepository: CategoryStorage + Clone + 'static;
    type PermissionRepository: PermissionStorage + Clone + 'static;

    fn create_payable_repository(&self) -> Self::PayableRepository;

    fn create_provider_repository(&self) -> Self::ProviderRepository;

    fn create_category_repository(&self) -> Self::CategoryRepository;

    fn create_permission_repository(&self) -> Self::PermissionRepository;
}
