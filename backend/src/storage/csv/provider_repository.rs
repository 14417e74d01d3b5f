use anyhow::Result;
use async_trait::async_trait;
use shared::Provider;
use tracing::debug;

use super::connection::{CsvConnection, PROVIDERS_HEADER};
use crate::storage::traits::ProviderStorage;

/// CSV-based provider repository backed by `proveedores.csv`
#[derive(Clone)]
pub struct ProviderRepository {
    connection: CsvConnection,
}

impl ProviderRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_providers(&self) -> Result<Vec<Provider>> {
        self.connection.read_records(&self.connection.providers_file_path())
    }
}

#[async_trait]
impl ProviderStorage for ProviderRepository {
    async fn list_providers(&self) -> Result<Vec<Provider>> {
        self.read_providers()
    }

    async fn get_provider(&self, id: &str) -> Result<Option<Provider>> {
        Ok(self.read_providers()?.into_iter().find(|p| p.id == id))
    }

    async fn store_provider(&self, provider: &Provider) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;
        let mut providers = self.read_providers()?;
        if providers.iter().any(|p| p.id == provider.id) {
            anyhow::bail!("Provider {} already exists", provider.id);
        }
        providers.push(provider.clone());
        self.connection
            .write_records(&self.connection.providers_file_path(), &PROVIDERS_HEADER, &providers)?;
        debug!("Stored provider {}", provider.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    #[tokio::test]
    async fn test_store_and_get_provider() {
        let env = TestEnvironment::new().unwrap();
        let repo = ProviderRepository::new(env.connection.clone());
        let provider = Provider {
            id: "prov-1".to_string(),
            name: "Papelera del Norte".to_string(),
            rfc: Some("PNO010101AAA".to_string()),
            contact: None,
        };

        repo.store_provider(&provider).await.unwrap();

        assert_eq!(repo.get_provider("prov-1").await.unwrap(), Some(provider.clone()));
        assert_eq!(repo.list_providers().await.unwrap(), vec![provider]);
        assert_eq!(repo.get_provider("prov-2").await.unwrap(), None);
    }
}
