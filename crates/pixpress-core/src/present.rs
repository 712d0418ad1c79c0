//! Size and dimension bookkeeping for the before/after display.

use serde::Serialize;

use crate::source::SourceImage;
use crate::surface::Dimensions;
use crate::transform::ResultImage;

const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];

/// Human-readable byte size in binary units, rounded to two decimals.
///
/// `0` renders as `"0 Bytes"`. Units stop at MB, so a gigabyte reads as
/// `"1024 MB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Size reduction in percent: `round((1 - compressed / original) * 100)`.
///
/// Halves round toward positive infinity. Negative when the output grew.
/// Returns 0 when either size is unknown (zero).
pub fn compression_ratio(original: u64, compressed: u64) -> i64 {
    if original == 0 || compressed == 0 {
        return 0;
    }
    let saved = (1.0 - compressed as f64 / original as f64) * 100.0;
    (saved + 0.5).floor() as i64
}

/// Strip one trailing extension from `original` and append `suffix`.
///
/// An extension is a final `.` followed by at least one character that is
/// neither `.` nor `/`.
pub fn output_file_name(original: &str, suffix: &str) -> String {
    format!("{}{}", file_stem(original), suffix)
}

fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    }
}

/// Before/after figures for the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub file_name: String,
    pub original_bytes: u64,
    pub original_size: String,
    pub original_dimensions: Dimensions,
    pub original_label: String,
    pub result_bytes: Option<u64>,
    pub result_size: Option<String>,
    pub result_dimensions: Option<Dimensions>,
    pub result_label: Option<String>,
    pub result_mime_type: Option<String>,
    /// Percent saved relative to the original file. 0 without a result.
    pub size_reduction: i64,
}

impl Comparison {
    pub fn new(source: &SourceImage, result: Option<&ResultImage>) -> Self {
        let original_bytes = source.byte_len();
        let original_dimensions = source.dimensions();
        let result_bytes = result.map(ResultImage::byte_len);

        Self {
            file_name: source.file_name().to_string(),
            original_bytes,
            original_size: format_bytes(original_bytes),
            original_dimensions,
            original_label: dimension_label(original_dimensions, original_bytes),
            result_bytes,
            result_size: result_bytes.map(format_bytes),
            result_dimensions: result.map(ResultImage::dimensions),
            result_label: result.map(|r| dimension_label(r.dimensions(), r.byte_len())),
            result_mime_type: result.map(|r| r.mime_type().to_string()),
            size_reduction: compression_ratio(original_bytes, result_bytes.unwrap_or(0)),
        }
    }
}

/// `"W × H px • size"` caption shown above each preview.
pub fn dimension_label(dimensions: Dimensions, bytes: u64) -> String {
    format!("{} • {}", dimensions, format_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::CountingHost;
    use crate::params::Quality;
    use crate::source::FileRef;
    use crate::transform;

    #[test]
    fn test_format_bytes_known_values() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_258_291), "1.2 MB");
    }

    #[test]
    fn test_format_bytes_rounds_to_two_decimals() {
        // 1234 / 1024 = 1.2050...
        assert_eq!(format_bytes(1234), "1.21 KB");
        // 2_000_000 / 1048576 = 1.9073...
        assert_eq!(format_bytes(2_000_000), "1.91 MB");
    }

    #[test]
    fn test_format_bytes_caps_at_megabytes() {
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1024 MB");
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(1_000_000, 250_000), 75);
        assert_eq!(compression_ratio(1000, 1000), 0);
        assert_eq!(compression_ratio(1000, 1500), -50);
        assert_eq!(compression_ratio(0, 10), 0);
        assert_eq!(compression_ratio(10, 0), 0);
    }

    #[test]
    fn test_compression_ratio_rounds_half_up() {
        // 1 - 995/1000 = 0.5% -> 1
        assert_eq!(compression_ratio(1000, 995), 1);
        // 1 - 1005/1000 = -0.5% -> 0 (toward +inf)
        assert_eq!(compression_ratio(1000, 1005), 0);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("cat.png", "_compressed.jpg"), "cat_compressed.jpg");
        assert_eq!(output_file_name("archive.tar.gz", "_x"), "archive.tar_x");
        assert_eq!(output_file_name("noext", "_upscaled_4x.png"), "noext_upscaled_4x.png");
        assert_eq!(output_file_name("trailing.", "_x"), "trailing._x");
        assert_eq!(output_file_name("dir.d/file", "_x"), "dir.d/file_x");
        assert_eq!(output_file_name(".hidden", "_x"), "_x");
    }

    #[test]
    fn test_dimension_label() {
        assert_eq!(
            dimension_label(Dimensions::new(100, 100), 1536),
            "100 × 100 px • 1.5 KB"
        );
    }

    #[test]
    fn test_comparison_without_result() {
        let host = CountingHost::default();
        let file = FileRef::new("a.png", "image/png", CountingHost::payload(4, 2));
        let source = SourceImage::load(&host, file).unwrap();

        let cmp = Comparison::new(&source, None);

        assert_eq!(cmp.original_bytes, 5);
        assert_eq!(cmp.original_size, "5 Bytes");
        assert_eq!(cmp.original_label, "4 × 2 px • 5 Bytes");
        assert_eq!(cmp.result_bytes, None);
        assert_eq!(cmp.size_reduction, 0);
    }

    #[test]
    fn test_comparison_with_result() {
        let host = CountingHost::default();
        let file = FileRef::new("a.png", "image/png", CountingHost::payload(2, 2));
        let source = SourceImage::load(&host, file).unwrap();
        // CountingHost encodes 4 px * quality 10 = 40 bytes
        let result = transform::compress(&host, &source, Quality::new(10).unwrap()).unwrap();

        let cmp = Comparison::new(&source, Some(&result));

        assert_eq!(cmp.result_bytes, Some(40));
        assert_eq!(cmp.result_dimensions, Some(Dimensions::new(2, 2)));
        assert_eq!(cmp.result_mime_type.as_deref(), Some("image/jpeg"));
        // 1 - 40/5 = -700%
        assert_eq!(cmp.size_reduction, -700);
    }
}
