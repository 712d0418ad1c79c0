//! Upscale a source image by the fixed factor and encode it losslessly.

use super::ResultImage;
use crate::encode::OutputFormat;
use crate::error::PipelineError;
use crate::host::RasterHost;
use crate::params::ScaleFactor;
use crate::source::SourceImage;

/// Resample the source to 4x its width and height (16x the pixel count)
/// with the host's high-quality filter, then encode as PNG.
pub fn upscale<H: RasterHost + ?Sized>(
    host: &H,
    source: &SourceImage,
) -> Result<ResultImage, PipelineError> {
    let dimensions = source.dimensions();
    let target = dimensions.scaled(ScaleFactor::VALUE)?;
    if target.checked_rgba_len().is_none() {
        return Err(PipelineError::DimensionOverflow {
            width: dimensions.width,
            height: dimensions.height,
            factor: ScaleFactor::VALUE,
        });
    }
    let surface = host.resample(source.surface(), target)?;

    if surface.dimensions() != target {
        // A host that ignores the requested size breaks the 4x contract.
        return Err(PipelineError::InvalidDimensions {
            width: surface.width,
            height: surface.height,
        });
    }

    let blob = host.encode(&surface, OutputFormat::Png, None)?;

    log::info!(
        "upscaled {} from {} to {} ({} bytes)",
        source.file_name(),
        dimensions,
        target,
        blob.len()
    );
    Ok(ResultImage::new(surface, blob))
}
