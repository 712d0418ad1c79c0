//! Image decoding pipeline for Pixpress.
//!
//! This module provides functionality for:
//! - Decoding PNG, JPEG, WebP, GIF, BMP and TIFF images into RGBA surfaces
//! - Correcting EXIF orientation the way browsers do on display
//! - Resampling surfaces to new dimensions
//!
//! # Architecture
//!
//! All operations are synchronous. The WASM bindings yield to the event loop
//! before calling into them so the page can show a busy state.

mod raster;
mod resize;
mod types;

pub use raster::decode_image;
pub use resize::resize;
pub use types::{DecodeError, FilterType};
