//! The 4x image upscaler exposed to JavaScript.
//!
//! ```typescript
//! const upscaler = ImageUpscaler.withOptions({ upscaleFilter: 'lanczos3' });
//! upscaler.selectFile(file.name, file.type, bytes);
//! await upscaler.upscale();
//! preview.src = upscaler.resultDataUrl();
//! ```

use crate::download;
use crate::tool::{self, options_from_js, start_transform, to_js_error, SharedTool};
use js_sys::Promise;
use pixpress_core::{PipelineOptions, ScaleFactor, Tool};
use wasm_bindgen::prelude::*;
use web_sys::Blob;

/// Resamples images to four times their width and height, as PNG.
#[wasm_bindgen]
pub struct ImageUpscaler {
    tool: SharedTool,
}

impl Default for ImageUpscaler {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ImageUpscaler {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ImageUpscaler {
        Self {
            tool: tool::shared(Tool::Upscaler, PipelineOptions::default()),
        }
    }

    /// Create an upscaler from an options object, e.g.
    /// `{ upscaleFilter: 'catmullrom', pngCompression: 'best' }`.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> ImageUpscaler {
        Self {
            tool: tool::shared(Tool::Upscaler, options_from_js(options)),
        }
    }

    #[wasm_bindgen(getter, js_name = scaleFactor)]
    pub fn scale_factor(&self) -> u32 {
        ScaleFactor::VALUE
    }

    /// Select a file. Returns false (and changes nothing) for non-image types.
    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(
        &mut self,
        name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> Result<bool, JsValue> {
        self.tool
            .borrow_mut()
            .select_file(name, mime_type, bytes)
            .map_err(to_js_error)
    }

    /// Upscale the source after one event-loop turn.
    ///
    /// Same promise contract as `ImageCompressor.compress`.
    pub fn upscale(&self) -> Promise {
        start_transform(&self.tool)
    }

    #[wasm_bindgen(getter, js_name = isProcessing)]
    pub fn is_processing(&self) -> bool {
        self.tool.borrow().session().is_processing()
    }

    #[wasm_bindgen(getter, js_name = hasSource)]
    pub fn has_source(&self) -> bool {
        self.tool.borrow().session().source().is_some()
    }

    #[wasm_bindgen(getter, js_name = hasResult)]
    pub fn has_result(&self) -> bool {
        self.tool.borrow().session().result().is_some()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> Option<String> {
        self.tool.borrow().file_name()
    }

    #[wasm_bindgen(getter, js_name = originalSize)]
    pub fn original_size(&self) -> f64 {
        self.tool.borrow().original_size()
    }

    #[wasm_bindgen(getter, js_name = upscaledSize)]
    pub fn upscaled_size(&self) -> f64 {
        self.tool.borrow().result_size()
    }

    #[wasm_bindgen(getter, js_name = originalWidth)]
    pub fn original_width(&self) -> u32 {
        self.tool.borrow().original_width()
    }

    #[wasm_bindgen(getter, js_name = originalHeight)]
    pub fn original_height(&self) -> u32 {
        self.tool.borrow().original_height()
    }

    #[wasm_bindgen(getter, js_name = upscaledWidth)]
    pub fn upscaled_width(&self) -> u32 {
        self.tool.borrow().result_width()
    }

    #[wasm_bindgen(getter, js_name = upscaledHeight)]
    pub fn upscaled_height(&self) -> u32 {
        self.tool.borrow().result_height()
    }

    #[wasm_bindgen(js_name = originalDataUrl)]
    pub fn original_data_url(&self) -> Option<String> {
        self.tool.borrow().original_data_url()
    }

    #[wasm_bindgen(js_name = resultDataUrl)]
    pub fn result_data_url(&self) -> Option<String> {
        self.tool.borrow().result_data_url()
    }

    #[wasm_bindgen(js_name = resultBytes)]
    pub fn result_bytes(&self) -> Option<Vec<u8>> {
        self.tool.borrow().result_bytes()
    }

    #[wasm_bindgen(js_name = resultBlob)]
    pub fn result_blob(&self) -> Result<Option<Blob>, JsValue> {
        match (self.tool.borrow().result_bytes(), self.tool.borrow().result_mime_type()) {
            (Some(bytes), Some(mime)) => download::to_blob(&bytes, &mime).map(Some),
            _ => Ok(None),
        }
    }

    pub fn comparison(&self) -> Result<JsValue, JsValue> {
        match self.tool.borrow().session().comparison() {
            Some(cmp) => serde_wasm_bindgen::to_value(&cmp).map_err(JsValue::from),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter, js_name = downloadName)]
    pub fn download_name(&self) -> Option<String> {
        self.tool.borrow().download().map(|d| d.file_name)
    }

    /// Save the result as `<stem>_upscaled_4x.png`. Returns false without a result.
    pub fn download(&self) -> Result<bool, JsValue> {
        match self.tool.borrow().download() {
            Some(d) => download::save(&d).map(|()| true),
            None => Ok(false),
        }
    }
}
