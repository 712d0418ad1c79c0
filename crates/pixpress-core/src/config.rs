//! Runtime options for a tool session.
//!
//! There are no configuration files or environment variables. Options are an
//! in-memory struct, usually deserialized from a JavaScript object handed to
//! the WASM bindings. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::encode::PngCompression;
use crate::params::Quality;

/// Options shared by the compressor and the upscaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineOptions {
    /// Quality the compressor starts with.
    pub default_quality: Quality,
    /// Resampling filter used by the upscaler.
    pub upscale_filter: FilterType,
    /// Deflate effort for upscaled PNG output.
    pub png_compression: PngCompression,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_quality(mut self, quality: Quality) -> Self {
        self.default_quality = quality;
        self
    }

    pub fn with_upscale_filter(mut self, filter: FilterType) -> Self {
        self.upscale_filter = filter;
        self
    }

    pub fn with_png_compression(mut self, compression: PngCompression) -> Self {
        self.png_compression = compression;
        self
    }
}
