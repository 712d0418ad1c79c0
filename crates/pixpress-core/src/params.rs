//! Transform parameters: compression quality and the upscale factor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a parameter from an untrusted value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("Quality {0} is outside the supported range {min}-{max}", min = Quality::MIN, max = Quality::MAX)]
    QualityOutOfRange(i64),
}

/// JPEG quality in the range 10-100 (percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
    pub const DEFAULT: Quality = Quality(80);

    /// Validate a quality value.
    pub fn new(value: i64) -> Result<Self, ParamError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Quality(value as u8))
        } else {
            Err(ParamError::QualityOutOfRange(value))
        }
    }

    /// Saturate into range. Used for the slider control.
    pub fn clamped(value: i64) -> Self {
        Quality(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Quality as a 0.0-1.0 codec control.
    pub fn as_fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Quality {
    type Error = ParamError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Linear upscale factor. Fixed at 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScaleFactor;

impl ScaleFactor {
    pub const VALUE: u32 = 4;

    pub fn get(self) -> u32 {
        Self::VALUE
    }
}

/// The single scalar control a transform runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformParameter {
    Quality(Quality),
    Scale(ScaleFactor),
}
