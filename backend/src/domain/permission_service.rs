//! Per-user permission lookup.
use crate::domain::errors::DomainResult;
use crate::storage::{Connection, PermissionStorage};
use shared::PermissionSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PermissionService<C: Connection> {
    permission_repository: C::PermissionRepository,
}

impl<C: Connection> PermissionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            permission_repository: connection.create_permission_repository(),
        }
    }

    /// Permissions of `user`; blank or unknown users get an empty set
    pub async fn permissions_for(&self, user: &str) -> DomainResult<PermissionSet> {
        let user = user.trim();
        if user.is_empty() {
            return Ok(PermissionSet::empty());
        }

        match self.permission_repository.get_permissions(user).await? {
            Some(permissions) => {
                debug!("Loaded permissions for {}", user);
                Ok(permissions)
            }
            None => {
                info!("No permissions configured for {}", user);
                Ok(PermissionSet::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use shared::Resource;

    #[tokio::test]
    async fn test_permissions_lookup() {
        let env = TestEnvironment::new().unwrap();
        env.write_permissions(
            "usuarios:\n  admin:\n    is_admin: true\n  luis:\n    resources: [proveedores]\n",
        )
        .unwrap();
        let service = PermissionService::new(Arc::new(env.connection.clone()));

        assert!(service.permissions_for("admin").await.unwrap().can_access(Resource::Usuarios));

        let luis = service.permissions_for("luis").await.unwrap();
        assert!(luis.can_access(Resource::Proveedores));
        assert!(!luis.can_access(Resource::CuentasPagar));

        assert_eq!(service.permissions_for("desconocido").await.unwrap(), PermissionSet::empty());
        assert_eq!(service.permissions_for("  ").await.unwrap(), PermissionSet::empty());
    }
}
