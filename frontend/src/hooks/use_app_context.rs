use gloo::storage::{LocalStorage, Storage};
use shared::permissions::can_access;
use shared::{PermissionSet, Resource};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// Local storage key holding the identified user name
pub const USER_STORAGE_KEY: &str = "cxp_usuario";

/// Session-wide user and permission set, loaded once per identification
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppContext {
    pub user: Option<String>,
    pub permissions: PermissionSet,
}

impl AppContext {
    pub fn can_access(&self, resource: Resource) -> bool {
        can_access(self.user.as_deref(), &self.permissions, resource)
    }
}

pub struct UseAppContextResult {
    pub context: AppContext,
    pub is_loading: bool,
    pub error: Option<String>,
    pub actions: UseAppContextActions,
}

#[derive(Clone, PartialEq)]
pub struct UseAppContextActions {
    pub login: Callback<String>,
    pub logout: Callback<()>,
}

fn stored_user() -> Option<String> {
    LocalStorage::get::<String>(USER_STORAGE_KEY)
        .ok()
        .map(|user| user.trim().to_string())
        .filter(|user| !user.is_empty())
}

#[hook]
pub fn use_app_context(api_client: &ApiClient) -> UseAppContextResult {
    let context = use_state(AppContext::default);
    let is_loading = use_state(|| false);
    let error = use_state(|| None::<String>);

    let login = {
        let api_client = api_client.clone();
        let context = context.clone();
        let is_loading = is_loading.clone();
        let error = error.clone();

        use_callback(api_client.clone(), move |user: String, _| {
            let user = user.trim().to_string();
            if user.is_empty() {
                error.set(Some("Ingresa un nombre de usuario".to_string()));
                return;
            }
            let api_client = api_client.clone();
            let context = context.clone();
            let is_loading = is_loading.clone();
            let error = error.clone();

            spawn_local(async move {
                is_loading.set(true);
                match api_client.get_permissions(&user).await {
                    Ok(response) => {
                        if let Err(e) = LocalStorage::set(USER_STORAGE_KEY, &response.user) {
                            gloo::console::warn!(format!("Failed to remember user: {}", e));
                        }
                        Logger::info_with_component("app_context", &format!("User {} identified", response.user));
                        context.set(AppContext {
                            user: Some(response.user),
                            permissions: response.permissions,
                        });
                        error.set(None);
                    }
                    Err(e) => {
                        Logger::error_with_component("app_context", &format!("Failed to load permissions: {}", e));
                        error.set(Some(e));
                    }
                }
                is_loading.set(false);
            });
        })
    };

    let logout = {
        let context = context.clone();
        use_callback((), move |_: (), _| {
            LocalStorage::delete(USER_STORAGE_KEY);
            context.set(AppContext::default());
        })
    };

    // Resume the stored session once on mount
    {
        let login = login.clone();
        use_effect_with((), move |_| {
            if let Some(user) = stored_user() {
                login.emit(user);
            }
            || ()
        });
    }

    UseAppContextResult {
        context: (*context).clone(),
        is_loading: *is_loading,
        error: (*error).clone(),
        actions: UseAppContextActions { login, logout },
    }
}
