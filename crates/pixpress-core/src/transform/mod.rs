//! Parameterized raster transforms: re-encode at a quality, or upscale.
//!
//! Both variants follow the same shape:
//! 1. Build a target surface from the source
//! 2. Encode it through the host
//! 3. Package surface, blob and dimensions as a [`ResultImage`]
//!
//! The compressor never changes dimensions. The upscaler always multiplies
//! both axes by exactly [`ScaleFactor::VALUE`].

mod compress;
mod upscale;

pub use compress::compress;
pub use upscale::upscale;

use crate::encode::EncodedBlob;
use crate::error::PipelineError;
use crate::host::RasterHost;
use crate::params::{ScaleFactor, TransformParameter};
use crate::source::SourceImage;
use crate::surface::{Dimensions, Surface};

/// Output of one transform run.
#[derive(Debug, Clone)]
pub struct ResultImage {
    surface: Surface,
    blob: EncodedBlob,
}

impl ResultImage {
    pub(crate) fn new(surface: Surface, blob: EncodedBlob) -> Self {
        Self { surface, blob }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn blob(&self) -> &EncodedBlob {
        &self.blob
    }

    pub fn dimensions(&self) -> Dimensions {
        self.surface.dimensions()
    }

    /// Exact encoded size, measured from the blob.
    pub fn byte_len(&self) -> u64 {
        self.blob.len()
    }

    pub fn mime_type(&self) -> &'static str {
        self.blob.mime_type()
    }
}

/// Run the transform selected by `parameter`.
pub fn apply<H: RasterHost + ?Sized>(
    host: &H,
    source: &SourceImage,
    parameter: TransformParameter,
) -> Result<ResultImage, PipelineError> {
    match parameter {
        TransformParameter::Quality(quality) => compress(host, source, quality),
        TransformParameter::Scale(ScaleFactor) => upscale(host, source),
    }
}
