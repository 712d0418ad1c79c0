//! Exact-length encoded output.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::OutputFormat;

/// An encoded image: the authoritative bytes plus their format.
///
/// The byte length reported here is what gets compared against the original
/// file size. The data URL is a display convenience only; it is roughly a
/// third larger than the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    bytes: Vec<u8>,
    format: OutputFormat,
}

impl EncodedBlob {
    pub fn new(bytes: Vec<u8>, format: OutputFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Exact encoded size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL for on-screen preview.
    pub fn to_data_url(&self) -> String {
        data_url(self.mime_type(), &self.bytes)
    }
}

/// Build a base64 `data:` URL for arbitrary bytes.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
