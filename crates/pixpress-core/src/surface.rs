//! In-memory raster surfaces and their dimensions.
//!
//! A [`Surface`] is the common intermediate form between the decode and
//! encode steps: an RGBA8 grid, row-major, 4 bytes per pixel. A freshly
//! created surface is fully transparent black, like a new canvas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Multiply both axes by `factor`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::DimensionOverflow` if either axis overflows `u32`.
    pub fn scaled(self, factor: u32) -> Result<Dimensions, PipelineError> {
        let overflow = || PipelineError::DimensionOverflow {
            width: self.width,
            height: self.height,
            factor,
        };
        let width = self.width.checked_mul(factor).ok_or_else(overflow)?;
        let height = self.height.checked_mul(factor).ok_or_else(overflow)?;
        Ok(Dimensions { width, height })
    }

    /// Get the total number of pixels.
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Length of an RGBA buffer with these dimensions.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * BYTES_PER_PIXEL
    }

    /// Like [`Dimensions::rgba_len`], but `None` when the buffer length does
    /// not fit in `usize` on this target.
    pub fn checked_rgba_len(self) -> Option<usize> {
        let len = self.pixel_count().checked_mul(BYTES_PER_PIXEL as u64)?;
        usize::try_from(len).ok()
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {} px", self.width, self.height)
    }
}

/// An RGBA8 raster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order.
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Surface {
    /// Create a new Surface with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            Dimensions::new(width, height).rgba_len(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A fully transparent black surface.
    pub fn blank(dimensions: Dimensions) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            pixels: vec![0; dimensions.rgba_len()],
        }
    }

    /// Create a Surface from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Check if this is an empty/invalid surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Composite `src` over this surface at the origin (source-over).
    ///
    /// Only the overlapping region is drawn.
    pub fn draw(&mut self, src: &Surface) {
        let width = self.width.min(src.width) as usize;
        let height = self.height.min(src.height) as usize;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;
        let src_stride = src.width as usize * BYTES_PER_PIXEL;

        for y in 0..height {
            let dst_row = &mut self.pixels[y * dst_stride..y * dst_stride + width * BYTES_PER_PIXEL];
            let src_row = &src.pixels[y * src_stride..y * src_stride + width * BYTES_PER_PIXEL];
            for (dst, src) in dst_row
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(src_row.chunks_exact(BYTES_PER_PIXEL))
            {
                blend_over(dst, src);
            }
        }
    }

    /// Flatten onto an opaque background, dropping alpha.
    ///
    /// Returns RGB pixel data (3 bytes per pixel).
    pub fn to_opaque_rgb(&self, background: [u8; 3]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() / BYTES_PER_PIXEL * 3);
        for px in self.pixels.chunks_exact(BYTES_PER_PIXEL) {
            let alpha = u32::from(px[3]);
            for c in 0..3 {
                let fg = u32::from(px[c]) * alpha;
                let bg = u32::from(background[c]) * (255 - alpha);
                rgb.push(((fg + bg + 127) / 255) as u8);
            }
        }
        rgb
    }

    /// Copy with colour channels multiplied by alpha.
    ///
    /// Filters must run in this space, or colour from fully transparent
    /// pixels bleeds into the edges of opaque ones.
    pub fn premultiplied(&self) -> Surface {
        let mut pixels = self.pixels.clone();
        for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            let alpha = u32::from(px[3]);
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * alpha + 127) / 255) as u8;
            }
        }
        Surface {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Inverse of [`Surface::premultiplied`]. Fully transparent pixels become
    /// transparent black.
    pub fn unpremultiplied(&self) -> Surface {
        let mut pixels = self.pixels.clone();
        for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            let alpha = u32::from(px[3]);
            for c in &mut px[..3] {
                *c = if alpha == 0 {
                    0
                } else {
                    ((u32::from(*c) * 255 + alpha / 2) / alpha).min(255) as u8
                };
            }
        }
        Surface {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Source-over blend of one straight-alpha RGBA pixel onto another.
fn blend_over(dst: &mut [u8], src: &[u8]) {
    let sa = u32::from(src[3]);
    if sa == 255 {
        dst.copy_from_slice(src);
        return;
    }
    if sa == 0 {
        return;
    }

    let da = u32::from(dst[3]);
    // Output alpha scaled by 255: sa*255 + da*(255 - sa)
    let out_a = sa * 255 + da * (255 - sa);
    for c in 0..3 {
        let s = u32::from(src[c]) * sa * 255;
        let d = u32::from(dst[c]) * da * (255 - sa);
        dst[c] = ((s + d + out_a / 2) / out_a) as u8;
    }
    dst[3] = ((out_a + 127) / 255) as u8;
}
