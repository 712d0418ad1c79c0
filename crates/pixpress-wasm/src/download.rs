//! Saving a result from the browser.
//!
//! The blob is exposed through a temporary object URL and a hidden anchor.
//! The URL is revoked as soon as the click has been dispatched so the host
//! does not keep the blob alive.

use js_sys::{Array, Uint8Array};
use pixpress_core::Download;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// An object URL, revoked on drop.
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &Blob) -> Result<Self, JsValue> {
        Url::create_object_url_with_blob(blob).map(ObjectUrl)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if Url::revoke_object_url(&self.0).is_err() {
            log::warn!("failed to revoke object URL {}", self.0);
        }
    }
}

/// Wrap encoded bytes in a typed `Blob`.
pub(crate) fn to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

/// Trigger a browser download of `download`.
///
/// Needs a `window` with a document body.
pub(crate) fn save(download: &Download) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Document has no body"))?;

    let blob = to_blob(&download.bytes, download.mime_type)?;
    let url = ObjectUrl::for_blob(&blob)?;

    let link: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    link.set_download(&download.file_name);
    link.set_href(url.as_str());

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;

    log::info!(
        "saved {} ({} bytes)",
        download.file_name,
        download.bytes.len()
    );
    Ok(())
}
