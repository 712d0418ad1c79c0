//! Pixpress WASM - WebAssembly bindings for the Pixpress tools
//!
//! This crate exposes the pixpress-core pipeline to JavaScript/TypeScript
//! as two classes, one per tool, plus a few display helpers.
//!
//! # Module Structure
//!
//! - `compressor` - `ImageCompressor` (JPEG, quality 10-100)
//! - `upscaler` - `ImageUpscaler` (4x, PNG)
//! - `download` - Blob construction and browser download
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageUpscaler, format_bytes } from '@pixpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const upscaler = new ImageUpscaler();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! upscaler.selectFile(file.name, file.type, bytes);
//! const pending = upscaler.upscale(); // upscaler.isProcessing === true
//! await pending;
//! console.log(`${upscaler.upscaledWidth} × ${upscaler.upscaledHeight}`);
//! ```
//!
//! `compress()` and `upscale()` mark the session busy immediately, yield one
//! `setTimeout(0)` turn so the page can paint that state, then encode.
//! `download()` needs a document, so load the module on the page itself.

use wasm_bindgen::prelude::*;

mod compressor;
mod download;
mod logger;
mod tool;
mod upscaler;

pub use compressor::ImageCompressor;
pub use upscaler::ImageUpscaler;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Info);
}

/// Change the console log level ("error", "warn", "info", "debug", "trace", "off").
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    logger::init(logger::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Human-readable size, e.g. `1536` -> `"1.5 KB"`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    pixpress_core::format_bytes(to_byte_count(bytes))
}

/// Percentage size reduction, rounded. Negative when the result is larger.
#[wasm_bindgen]
pub fn compression_ratio(original: f64, compressed: f64) -> i32 {
    pixpress_core::compression_ratio(to_byte_count(original), to_byte_count(compressed)) as i32
}

// JS numbers: NaN and negatives count as zero, fractions are truncated.
fn to_byte_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}
