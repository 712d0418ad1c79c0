//! Re-encode a source image as JPEG at a chosen quality.

use super::ResultImage;
use crate::encode::OutputFormat;
use crate::error::PipelineError;
use crate::host::RasterHost;
use crate::params::Quality;
use crate::source::SourceImage;
use crate::surface::Surface;

/// Draw the full source onto a blank surface of identical dimensions and
/// encode it as JPEG at `quality`.
///
/// For a fixed image, a larger quality yields a larger or equal encoded size
/// and a smaller or equal reconstruction error. The exact rate/distortion
/// curve belongs to the host encoder.
pub fn compress<H: RasterHost + ?Sized>(
    host: &H,
    source: &SourceImage,
    quality: Quality,
) -> Result<ResultImage, PipelineError> {
    let mut target = Surface::blank(source.dimensions());
    target.draw(source.surface());

    let blob = host.encode(&target, OutputFormat::Jpeg, Some(quality))?;

    log::info!(
        "compressed {} at quality {}: {} -> {} bytes",
        source.file_name(),
        quality.get(),
        source.byte_len(),
        blob.len()
    );
    Ok(ResultImage::new(target, blob))
}
