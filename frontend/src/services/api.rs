use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::filters::encode_query_component;
use shared::permissions::UserPermissionsResponse;
use shared::{
    Category, DeletePayableResponse, ErrorResponse, PayableAccount, PayableFilter, PayableInput, Provider,
};

/// Backend address used when `CXP_API_URL` is not set at build time
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

pub fn api_base_url() -> String {
    option_env!("CXP_API_URL")
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Body of a server export with the filename the backend suggested
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedCsv {
    pub filename: Option<String>,
    pub content: String,
}

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(api_base_url())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn payable_url(&self, id: &str) -> String {
        format!("{}/api/cuentas-pagar/{}", self.base_url, encode_query_component(id))
    }

    /// Fetch the whole payable collection
    pub async fn list_payables(&self) -> Result<Vec<PayableAccount>, String> {
        let url = format!("{}/api/cuentas-pagar", self.base_url);
        match Request::get(&url).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Failed to fetch payables: {}", e)),
        }
    }

    pub async fn create_payable(&self, input: &PayableInput) -> Result<PayableAccount, String> {
        let url = format!("{}/api/cuentas-pagar", self.base_url);
        let request = Request::post(&url)
            .json(input)
            .map_err(|e| format!("Failed to serialize request: {}", e))?;
        match request.send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Full-record update; partial payments go through here too
    pub async fn update_payable(&self, id: &str, input: &PayableInput) -> Result<PayableAccount, String> {
        let request = Request::put(&self.payable_url(id))
            .json(input)
            .map_err(|e| format!("Failed to serialize request: {}", e))?;
        match request.send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    pub async fn toggle_paid(&self, id: &str) -> Result<PayableAccount, String> {
        let url = format!("{}/pagado", self.payable_url(id));
        match Request::put(&url).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    pub async fn delete_payable(&self, id: &str) -> Result<DeletePayableResponse, String> {
        match Request::delete(&self.payable_url(id)).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Export endpoint with the active filters; no query string when none is active
    pub fn export_url(&self, filter: &PayableFilter) -> String {
        let query = filter.to_query_string();
        if query.is_empty() {
            format!("{}/api/cuentas-pagar/export", self.base_url)
        } else {
            format!("{}/api/cuentas-pagar/export?{}", self.base_url, query)
        }
    }

    /// Server-side CSV export from a URL built by `export_url`, returned verbatim
    pub async fn export_payables(&self, export_url: &str) -> Result<ExportedCsv, String> {
        match Request::get(export_url).send().await {
            Ok(response) if response.ok() => {
                let filename = response
                    .headers()
                    .get("content-disposition")
                    .and_then(|value| filename_from_content_disposition(&value));
                let content = response
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read export: {}", e))?;
                Ok(ExportedCsv { filename, content })
            }
            Ok(response) => Err(error_message(response).await),
            Err(e) => Err(format!("Failed to export payables: {}", e)),
        }
    }

    pub async fn list_providers(&self) -> Result<Vec<Provider>, String> {
        let url = format!("{}/api/proveedores", self.base_url);
        match Request::get(&url).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Failed to fetch providers: {}", e)),
        }
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, String> {
        let url = format!("{}/api/categorias", self.base_url);
        match Request::get(&url).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Failed to fetch categories: {}", e)),
        }
    }

    pub async fn get_permissions(&self, user: &str) -> Result<UserPermissionsResponse, String> {
        let url = format!(
            "{}/api/usuarios/{}/permisos",
            self.base_url,
            encode_query_component(user)
        );
        match Request::get(&url).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(format!("Failed to fetch permissions: {}", e)),
        }
    }
}

/// `filename` parameter of a `Content-Disposition` value, quoted or bare
pub fn filename_from_content_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (name, raw) = param.split_once('=')?;
            name.trim().eq_ignore_ascii_case("filename").then(|| raw.trim())
        })
        .map(|raw| raw.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

/// Parse a 2xx body, or turn the error body into a message
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_message(response).await)
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) => match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.error,
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => format!("Request failed with status {}", status),
        },
        Err(_) => format!("Request failed with status {}", status),
    }
}
