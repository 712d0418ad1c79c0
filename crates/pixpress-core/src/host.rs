//! The narrow rasterization/codec capability the pipeline runs against.
//!
//! Decoding, resampling and encoding are delegated to a [`RasterHost`]. The
//! pipeline and session logic never touch a codec directly, so they can be
//! driven by a counting fake in tests and by [`NativeHost`] everywhere else.

use crate::decode::{self, FilterType};
use crate::encode::{self, EncodedBlob, OutputFormat, PngCompression};
use crate::error::PipelineError;
use crate::params::Quality;
use crate::surface::{Dimensions, Surface};

/// JPEG output has no alpha channel; transparent pixels land on this.
pub const JPEG_BACKGROUND: [u8; 3] = [0, 0, 0];

/// Decode / resample / encode capability.
pub trait RasterHost: Send + Sync {
    /// Decode an encoded image into a surface.
    fn decode(&self, bytes: &[u8]) -> Result<Surface, PipelineError>;

    /// Resample `surface` to exactly `target`.
    fn resample(&self, surface: &Surface, target: Dimensions) -> Result<Surface, PipelineError>;

    /// Serialize `surface` in `format`. `quality` is ignored by lossless formats.
    fn encode(
        &self,
        surface: &Surface,
        format: OutputFormat,
        quality: Option<Quality>,
    ) -> Result<EncodedBlob, PipelineError>;
}

/// Host settings that are not part of the capability contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostOptions {
    pub upscale_filter: FilterType,
    pub png_compression: PngCompression,
}

/// [`RasterHost`] backed by the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct NativeHost {
    options: HostOptions,
}

impl NativeHost {
    pub fn new(options: HostOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> HostOptions {
        self.options
    }
}

impl RasterHost for NativeHost {
    fn decode(&self, bytes: &[u8]) -> Result<Surface, PipelineError> {
        Ok(decode::decode_image(bytes)?)
    }

    fn resample(&self, surface: &Surface, target: Dimensions) -> Result<Surface, PipelineError> {
        decode::resize(surface, target, self.options.upscale_filter)
    }

    fn encode(
        &self,
        surface: &Surface,
        format: OutputFormat,
        quality: Option<Quality>,
    ) -> Result<EncodedBlob, PipelineError> {
        let bytes = match format {
            OutputFormat::Jpeg => {
                let quality = quality.unwrap_or_default();
                let rgb = surface.to_opaque_rgb(JPEG_BACKGROUND);
                encode::encode_jpeg(&rgb, surface.width, surface.height, quality.get())?
            }
            OutputFormat::Png => encode::encode_png(
                &surface.pixels,
                surface.width,
                surface.height,
                self.options.png_compression,
            )?,
        };

        log::debug!(
            "encoded {}x{} surface as {} ({} bytes)",
            surface.width,
            surface.height,
            format,
            bytes.len()
        );
        Ok(EncodedBlob::new(bytes, format))
    }
}
