//! The image compressor exposed to JavaScript.
//!
//! # Example
//!
//! ```typescript
//! import init, { ImageCompressor, format_bytes } from '@pixpress/wasm';
//!
//! await init();
//! const compressor = new ImageCompressor();
//!
//! const file = input.files[0];
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (compressor.selectFile(file.name, file.type, bytes)) {
//!   compressor.quality = 75;
//!   const pending = compressor.compress();
//!   spinner.hidden = !compressor.isProcessing;
//!   await pending;
//!   spinner.hidden = true;
//!   console.log(`${format_bytes(compressor.compressedSize)} (-${compressor.compressionRatio}%)`);
//!   compressor.download();
//! }
//! ```

use crate::download;
use crate::tool::{self, options_from_js, start_transform, to_js_error, SharedTool};
use js_sys::Promise;
use pixpress_core::{PipelineOptions, Tool};
use wasm_bindgen::prelude::*;
use web_sys::Blob;

/// JPEG re-encoder with an adjustable quality (10-100, default 80).
#[wasm_bindgen]
pub struct ImageCompressor {
    tool: SharedTool,
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ImageCompressor {
    /// Create a compressor with default options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> ImageCompressor {
        Self {
            tool: tool::shared(Tool::Compressor, PipelineOptions::default()),
        }
    }

    /// Create a compressor from an options object, e.g. `{ defaultQuality: 70 }`.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> ImageCompressor {
        Self {
            tool: tool::shared(Tool::Compressor, options_from_js(options)),
        }
    }

    /// Select a file. Returns false (and changes nothing) for non-image types.
    ///
    /// Throws if an image-typed file cannot be decoded; the previous source
    /// and result are kept.
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

    /// Current quality (10-100).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> i32 {
        i32::from(self.tool.borrow().quality())
    }

    /// Set quality; out-of-range values are clamped. Does not re-compress.
    #[wasm_bindgen(setter)]
    pub fn set_quality(&mut self, value: i32) {
        self.tool.borrow_mut().set_quality(value);
    }

    /// Re-encode the source as JPEG at the current quality.
    ///
    /// `isProcessing` is true as soon as this returns. The promise resolves
    /// to false if no source is loaded (or a run is already pending), to
    /// true once the result is available, and rejects if encoding failed.
    pub fn compress(&self) -> Promise {
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

    /// Original file size in bytes.
    #[wasm_bindgen(getter, js_name = originalSize)]
    pub fn original_size(&self) -> f64 {
        self.tool.borrow().original_size()
    }

    /// Exact size of the encoded JPEG in bytes (0 without a result).
    #[wasm_bindgen(getter, js_name = compressedSize)]
    pub fn compressed_size(&self) -> f64 {
        self.tool.borrow().result_size()
    }

    /// Size reduction in percent.
    #[wasm_bindgen(getter, js_name = compressionRatio)]
    pub fn compression_ratio(&self) -> i32 {
        self.tool.borrow().size_reduction()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.tool.borrow().original_width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.tool.borrow().original_height()
    }

    #[wasm_bindgen(js_name = originalDataUrl)]
    pub fn original_data_url(&self) -> Option<String> {
        self.tool.borrow().original_data_url()
    }

    /// Preview of the compressed JPEG. Not a size source.
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

    /// Sizes, labels and dimensions for the comparison panel.
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

    /// Save the result as `<stem>_compressed.jpg`. Returns false without a result.
    pub fn download(&self) -> Result<bool, JsValue> {
        match self.tool.borrow().download() {
            Some(d) => download::save(&d).map(|()| true),
            None => Ok(false),
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixpress_core::encode::{encode_png, PngCompression};
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode_png(
            &vec![90u8; (width * height * 4) as usize],
            width,
            height,
            PngCompression::Fast,
        )
        .unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_compress_png() {
        let mut compressor = ImageCompressor::new();
        assert!(compressor
            .select_file("a.png".into(), "image/png".into(), png(100, 100))
            .unwrap());

        let done = JsFuture::from(compressor.compress()).await.unwrap();

        assert_eq!(done.as_bool(), Some(true));
        assert!(compressor.has_result());
        assert!(compressor.compressed_size() > 0.0);
        assert_eq!(compressor.download_name().as_deref(), Some("a_compressed.jpg"));
    }

    #[wasm_bindgen_test]
    async fn test_processing_is_visible_until_the_promise_settles() {
        let mut compressor = ImageCompressor::new();
        compressor
            .select_file("a.png".into(), "image/png".into(), png(40, 40))
            .unwrap();

        let pending = compressor.compress();
        assert!(compressor.is_processing());
        assert!(!compressor.has_result());
        let busy = compressor
            .select_file("b.png".into(), "image/png".into(), png(4, 4))
            .unwrap();
        assert!(!busy);

        JsFuture::from(pending).await.unwrap();
        assert!(!compressor.is_processing());
        assert!(compressor.has_result());
        assert_eq!(compressor.file_name().as_deref(), Some("a.png"));
    }

    #[wasm_bindgen_test]
    async fn test_compress_without_source_resolves_false() {
        let compressor = ImageCompressor::new();
        let done = JsFuture::from(compressor.compress()).await.unwrap();
        assert_eq!(done.as_bool(), Some(false));
        assert!(!compressor.is_processing());
    }

    #[wasm_bindgen_test]
    fn test_invalid_image_throws() {
        let mut compressor = ImageCompressor::new();
        let result = compressor.select_file("a.png".into(), "image/png".into(), vec![1, 2]);
        assert!(result.is_err());
        assert!(!compressor.has_source());
    }

    #[wasm_bindgen_test]
    fn test_options_object() {
        let options = serde_wasm_bindgen::to_value(
            &PipelineOptions::new().with_default_quality(pixpress_core::Quality::clamped(55)),
        )
        .unwrap();
        let compressor = ImageCompressor::with_options(options);
        assert_eq!(compressor.quality(), 55);
    }

    #[wasm_bindgen_test]
    fn test_comparison_is_null_without_source() {
        let compressor = ImageCompressor::new();
        assert!(compressor.comparison().unwrap().is_null());
    }
}
