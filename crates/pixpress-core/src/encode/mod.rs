//! Image encoding pipeline for Pixpress.
//!
//! This module provides functionality for:
//! - Encoding surfaces to JPEG with configurable quality (compressor)
//! - Encoding surfaces to lossless PNG (upscaler)
//! - Wrapping the output in an exact-length [`EncodedBlob`]
//!
//! # Architecture
//!
//! All operations are synchronous and allocate a fresh output buffer.

mod blob;
mod jpeg;
mod png;
mod types;

pub use blob::{data_url, EncodedBlob};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, OutputFormat, PngCompression};
