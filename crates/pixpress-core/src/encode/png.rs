//! Lossless PNG encoding for the upscaler.

use image::codecs::png::{FilterType as PngFilter, PngEncoder};
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{EncodeError, OutputFormat, PngCompression};

/// Encode RGBA pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `compression` - Deflate effort; output is lossless at every level
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    compression: PngCompression,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Vec::new();
    PngEncoder::new_with_quality(
        &mut buffer,
        compression.to_image_compression(),
        PngFilter::Adaptive,
    )
    .write_image(pixels, width, height, ExtendedColorType::Rgba8)
    .map_err(|e| EncodeError::EncodingFailed {
        format: OutputFormat::Png,
        message: e.to_string(),
    })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let pixels = vec![200u8; 8 * 8 * 4];
        let png = encode_png(&pixels, 8, 8, PngCompression::Default).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let pixels: Vec<u8> = (0..6 * 5 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let png = encode_png(&pixels, 6, 5, PngCompression::Best).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (6, 5));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_every_compression_level() {
        let pixels = vec![50u8; 4 * 4 * 4];
        for level in [
            PngCompression::Fast,
            PngCompression::Default,
            PngCompression::Best,
        ] {
            assert!(encode_png(&pixels, 4, 4, level).is_ok());
        }
    }

    #[test]
    fn test_encode_png_rejects_rgb_buffer() {
        let pixels = vec![50u8; 4 * 4 * 3];
        assert!(matches!(
            encode_png(&pixels, 4, 4, PngCompression::Default),
            Err(EncodeError::InvalidPixelData {
                expected: 64,
                actual: 48
            })
        ));
    }

    #[test]
    fn test_encode_png_zero_dimensions() {
        assert!(matches!(
            encode_png(&[], 0, 0, PngCompression::Default),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
