//! Permission table stored as YAML.
//!
//! ```yaml
//! usuarios:
//!   admin:
//!     is_admin: true
//!   ana:
//!     resources: [cuentas-pagar, exportar]
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::PermissionSet;
use std::collections::BTreeMap;
use std::fs;

use super::connection::CsvConnection;
use crate::storage::traits::PermissionStorage;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PermissionTable {
    #[serde(rename = "usuarios", default)]
    users: BTreeMap<String, PermissionSet>,
}

/// Repository for the per-user permission table in `permisos.yaml`
#[derive(Clone)]
pub struct PermissionRepository {
    connection: CsvConnection,
}

impl PermissionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_table(&self) -> Result<PermissionTable> {
        let path = self.connection.permissions_file_path();
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(PermissionTable::default());
        }
        serde_yaml::from_str(&contents).with_context(|| format!("Invalid permission table {}", path.display()))
    }
}

#[async_trait]
impl PermissionStorage for PermissionRepository {
    async fn get_permissions(&self, user: &str) -> Result<Option<PermissionSet>> {
        let table = self.read_table()?;
        Ok(table.users.get(user.trim()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use shared::Resource;

    #[tokio::test]
    async fn test_default_table_has_admin() {
        let env = TestEnvironment::new().unwrap();
        let repo = PermissionRepository::new(env.connection.clone());

        let admin = repo.get_permissions("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);
        assert_eq!(repo.get_permissions("nadie").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_explicit_resources() {
        let env = TestEnvironment::new().unwrap();
        env.write_permissions("usuarios:\n  ana:\n    resources: [cuentas-pagar, exportar]\n")
            .unwrap();
        let repo = PermissionRepository::new(env.connection.clone());

        let ana = repo.get_permissions(" ana ").await.unwrap().unwrap();
        assert!(!ana.is_admin);
        assert!(ana.can_access(Resource::CuentasPagar));
        assert!(ana.can_access(Resource::Exportar));
        assert!(!ana.can_access(Resource::Usuarios));
    }

    #[tokio::test]
    async fn test_malformed_table_is_an_error() {
        let env = TestEnvironment::new().unwrap();
        env.write_permissions("usuarios:\n  ana:\n    resources: [contabilidad]\n")
            .unwrap();
        let repo = PermissionRepository::new(env.connection.clone());

        assert!(repo.get_permissions("ana").await.is_err());
    }
}
