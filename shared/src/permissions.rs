//! Permission policy.
//!
//! A `PermissionSet` is loaded once per session and every page asks it
//! `can_access(resource)`; nothing is re-fetched per route.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Application areas guarded by permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    CuentasPagar,
    Proveedores,
    Categorias,
    Exportar,
    Usuarios,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::CuentasPagar,
        Resource::Proveedores,
        Resource::Categorias,
        Resource::Exportar,
        Resource::Usuarios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::CuentasPagar => "cuentas-pagar",
            Resource::Proveedores => "proveedores",
            Resource::Categorias => "categorias",
            Resource::Exportar => "exportar",
            Resource::Usuarios => "usuarios",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub resources: BTreeSet<Resource>,
}

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self {
            is_admin: true,
            resources: BTreeSet::new(),
        }
    }

    pub fn with_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        Self {
            is_admin: false,
            resources: resources.into_iter().collect(),
        }
    }

    pub fn can_access(&self, resource: Resource) -> bool {
        self.is_admin || self.resources.contains(&resource)
    }
}

/// Response of GET /api/usuarios/:usuario/permisos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissionsResponse {
    #[serde(rename = "usuario")]
    pub user: String,
    #[serde(rename = "permisos")]
    pub permissions: PermissionSet,
}

/// Policy entry point: an anonymous user can access nothing
pub fn can_access(user: Option<&str>, permissions: &PermissionSet, resource: Resource) -> bool {
    match user {
        Some(name) if !name.trim().is_empty() => permissions.can_access(resource),
        _ => false,
    }
}
