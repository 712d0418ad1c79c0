//! Surface resampling using the `image` crate's filters.
//!
//! Filtering happens on premultiplied alpha, the way a canvas scales an
//! image. Returns new `Surface` instances without modifying the input.

use super::FilterType;
use crate::error::PipelineError;
use crate::surface::{Dimensions, Surface};

/// Resample a surface to exact dimensions.
///
/// # Errors
///
/// Returns `PipelineError::InvalidDimensions` if either target axis is zero,
/// and `PipelineError::MalformedSurface` if the source buffer is inconsistent.
pub fn resize(
    surface: &Surface,
    target: Dimensions,
    filter: FilterType,
) -> Result<Surface, PipelineError> {
    if target.is_empty() {
        return Err(PipelineError::InvalidDimensions {
            width: target.width,
            height: target.height,
        });
    }

    // Fast path: if dimensions match, just clone
    if surface.dimensions() == target {
        return Ok(surface.clone());
    }

    let rgba = surface
        .premultiplied()
        .to_rgba_image()
        .ok_or(PipelineError::MalformedSurface {
            width: surface.width,
            height: surface.height,
        })?;

    let resized = image::imageops::resize(
        &rgba,
        target.width,
        target.height,
        filter.to_image_filter(),
    );

    Ok(Surface::from_rgba_image(resized).unpremultiplied())
}
