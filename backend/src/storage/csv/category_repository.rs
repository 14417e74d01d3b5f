use anyhow::Result;
use async_trait::async_trait;
use shared::Category;
use tracing::debug;

use super::connection::{CsvConnection, CATEGORIES_HEADER};
use crate::storage::traits::CategoryStorage;

/// CSV-based category repository backed by `categorias.csv`
#[derive(Clone)]
pub struct CategoryRepository {
    connection: CsvConnection,
}

impl CategoryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.connection.read_records(&self.connection.categories_file_path())
    }

    async fn store_category(&self, category: &Category) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let path = self.connection.categories_file_path();
        let mut categories: Vec<Category> = self.connection.read_records(&path)?;
        if categories.iter().any(|c| c.id == category.id) {
            anyhow::bail!("Category {} already exists", category.id);
        }
        if categories.iter().any(|c| c.name.eq_ignore_ascii_case(&category.name)) {
            debug!("Category name {} already taken", category.name);
            return Ok(false);
        }
        categories.push(category.clone());
        self.connection.write_records(&path, &CATEGORIES_HEADER, &categories)?;
        debug!("Stored category {}", category.id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    #[tokio::test]
    async fn test_store_and_list_categories() {
        let env = TestEnvironment::new().unwrap();
        let repo = CategoryRepository::new(env.connection.clone());
        assert!(repo.list_categories().await.unwrap().is_empty());

        let renta = Category { id: "cat-1".to_string(), name: "Renta".to_string() };
        let luz = Category { id: "cat-2".to_string(), name: "Luz".to_string() };
        assert!(repo.store_category(&renta).await.unwrap());
        assert!(repo.store_category(&luz).await.unwrap());

        assert_eq!(repo.list_categories().await.unwrap(), vec![renta.clone(), luz]);
        assert!(repo.store_category(&renta).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_stores_with_same_name_keep_one() {
        let env = TestEnvironment::new().unwrap();
        let repo = CategoryRepository::new(env.connection.clone());

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            let name = if i % 2 == 0 { "Renta" } else { "RENTA" };
            let category = Category { id: format!("cat-{}", i), name: name.to_string() };
            handles.push(tokio::spawn(async move { repo.store_category(&category).await.unwrap() }));
        }
        let mut stored = 0;
        for handle in handles {
            if handle.await.unwrap() {
                stored += 1;
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(repo.list_categories().await.unwrap().len(), 1);
    }
}
