//! Pipeline-level error type.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::params::ParamError;

/// Errors surfaced by the decode → transform → encode pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Param(#[from] ParamError),

    /// Scaling the source would overflow the target dimensions.
    #[error("Scaling {width}x{height} by {factor} overflows the maximum surface size")]
    DimensionOverflow { width: u32, height: u32, factor: u32 },

    /// A resample target with a zero axis.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The thread running a transform could not be started or went away.
    #[error("Transform worker failed: {0}")]
    Worker(String),

    /// The surface buffer cannot be viewed as an image.
    #[error("Surface buffer does not match its {width}x{height} dimensions")]
    MalformedSurface { width: u32, height: u32 },
}
