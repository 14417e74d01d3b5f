use shared::{Category, Provider};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Clone, PartialEq, Default)]
pub struct ReferenceData {
    pub providers: Vec<Provider>,
    pub categories: Vec<Category>,
}

/// Providers and categories for dropdowns, fetched once on mount
#[hook]
pub fn use_reference_data(api_client: &ApiClient) -> ReferenceData {
    let providers = use_state(Vec::<Provider>::new);
    let categories = use_state(Vec::<Category>::new);

    {
        let api_client = api_client.clone();
        let providers = providers.clone();
        let categories = categories.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.list_providers().await {
                    Ok(data) => providers.set(data),
                    Err(e) => Logger::warn_with_component("reference_data", &format!("Failed to load providers: {}", e)),
                }
                match api_client.list_categories().await {
                    Ok(data) => categories.set(data),
                    Err(e) => Logger::warn_with_component("reference_data", &format!("Failed to load categories: {}", e)),
                }
            });
            || ()
        });
    }

    ReferenceData {
        providers: (*providers).clone(),
        categories: (*categories).clone(),
    }
}
