//! User-selected files and the decoded source image.

use crate::error::PipelineError;
use crate::host::RasterHost;
use crate::surface::{Dimensions, Surface};

/// MIME prefix accepted by the loader.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Whether a declared MIME type names an image.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with(IMAGE_MIME_PREFIX)
}

/// A binary file reference as handed over by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileRef {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// A decoded, immutable source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    surface: Surface,
}

impl SourceImage {
    /// Decode `file` through `host`.
    ///
    /// The MIME check is the caller's job; this only decodes.
    pub fn load<H: RasterHost + ?Sized>(host: &H, file: FileRef) -> Result<Self, PipelineError> {
        let surface = host.decode(&file.bytes)?;
        Ok(Self {
            file_name: file.name,
            mime_type: file.mime_type,
            bytes: file.bytes,
            surface,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the file as selected.
    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Native pixel dimensions after decoding.
    pub fn dimensions(&self) -> Dimensions {
        self.surface.dimensions()
    }

    /// `data:` URL of the original bytes, for the "before" preview.
    pub fn to_data_url(&self) -> String {
        crate::encode::data_url(&self.mime_type, &self.bytes)
    }
}
