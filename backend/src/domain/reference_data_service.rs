//! Providers and expense categories used by the payable forms.
use crate::domain::{
    commands::reference::{CreateCategoryCommand, CreateProviderCommand},
    errors::{DomainError, DomainResult},
};
use crate::storage::{CategoryStorage, Connection, ProviderStorage};
use shared::{Category, Provider};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReferenceDataService<C: Connection> {
    provider_repository: C::ProviderRepository,
    category_repository: C::CategoryRepository,
}

impl<C: Connection> ReferenceDataService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            provider_repository: connection.create_provider_repository(),
            category_repository: connection.create_category_repository(),
        }
    }

    /// Providers sorted by name
    pub async fn list_providers(&self) -> DomainResult<Vec<Provider>> {
        let mut providers = self.provider_repository.list_providers().await?;
        providers.sort_by_key(|p| p.name.to_lowercase());
        Ok(providers)
    }

    pub async fn create_provider(&self, command: CreateProviderCommand) -> DomainResult<Provider> {
        let name = required_name(&command.name, "proveedor")?;
        let provider = Provider {
            id: new_id("prov"),
            name,
            rfc: optional_text(command.rfc).map(|rfc| rfc.to_uppercase()),
            contact: optional_text(command.contact),
        };
        self.provider_repository.store_provider(&provider).await?;
        info!("Created provider {} ({})", provider.id, provider.name);
        Ok(provider)
    }

    /// Categories sorted by name
    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let mut categories = self.category_repository.list_categories().await?;
        categories.sort_by_key(|c| c.name.to_lowercase());
        Ok(categories)
    }

    pub async fn create_category(&self, command: CreateCategoryCommand) -> DomainResult<Category> {
        let name = required_name(&command.name, "categoría")?;

        let category = Category { id: new_id("cat"), name };
        if !self.category_repository.store_category(&category).await? {
            return Err(DomainError::Validation(format!("La categoría {} ya existe", category.name)));
        }
        info!("Created category {} ({})", category.id, category.name);
        Ok(category)
    }
}

fn new_id(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{}-{}", prefix, suffix)
}

fn required_name(name: &str, kind: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation(format!("El nombre del {} es obligatorio", kind)));
    }
    Ok(name.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
