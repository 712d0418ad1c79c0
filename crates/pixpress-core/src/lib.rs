//! Pixpress Core - image compressor and upscaler pipeline
//!
//! This crate provides the host-independent logic behind the two Pixpress
//! tools: decode a selected file, transform it with a single parameter,
//! re-encode it, and report sizes and dimensions for a before/after view.
//!
//! - **Compressor**: re-encode as JPEG at quality 10-100, same dimensions
//! - **Upscaler**: resample to 4x width and height, encode as PNG
//!
//! Codec work goes through the [`RasterHost`] capability so the session
//! logic can be exercised without real images.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod host;
pub mod params;
pub mod present;
pub mod session;
pub mod source;
pub mod surface;
pub mod transform;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use config::PipelineOptions;
pub use encode::{EncodedBlob, OutputFormat};
pub use error::PipelineError;
pub use host::{HostOptions, NativeHost, RasterHost};
pub use params::{Quality, ScaleFactor, TransformParameter};
pub use present::{compression_ratio, format_bytes, output_file_name, Comparison};
pub use session::{
    Download, JobId, SelectOutcome, Session, SessionState, Tool, TransformJob, TransformOutcome,
};
pub use source::{is_image_mime, FileRef, SourceImage};
pub use surface::{Dimensions, Surface};
pub use transform::ResultImage;
#[cfg(not(target_arch = "wasm32"))]
pub use worker::PendingTransform;
