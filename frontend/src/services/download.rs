//! Browser-side file download for generated CSV content.

use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// Delay before the object URL is released; revoking right after `click()`
/// cancels the download in some browsers
const REVOKE_DELAY_MS: u32 = 1000;

/// Offer `content` to the user as a file named `filename`
pub fn download_text_file(filename: &str, content: &str, mime_type: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let document = window.document().ok_or("No document available")?;

    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let result = document
        .create_element("a")
        .map_err(|e| format!("Failed to create link: {:?}", e))
        .and_then(|element| {
            element
                .dyn_into::<HtmlAnchorElement>()
                .map_err(|_| "Created element is not an anchor".to_string())
        })
        .map(|anchor| {
            anchor.set_href(&url);
            anchor.set_download(filename);
            anchor.click();
        });

    // Release the object URL whether or not the click went through
    Timeout::new(REVOKE_DELAY_MS, move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            gloo::console::warn!(format!("Failed to revoke object URL: {:?}", e));
        }
    })
    .forget();
    result
}
