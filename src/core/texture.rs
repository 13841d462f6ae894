// Raster types for the gradient -> directional lighting texture remap.
// Both wrap an 8-bit RGBA buffer; the newtypes keep "input mask" and
// "packed output" from being mixed up at call sites.

use std::path::Path;

use image::{DynamicImage, ImageReader, Rgba, RgbaImage};

use super::error::SdfError;

/// Decoded source mask. Always RGBA8; missing alpha is filled with 255 on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientImage(RgbaImage);

impl GradientImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self(image)
    }

    /// Any pixel layout `image` can decode (gray, gray+alpha, rgb, 16-bit...) is
    /// normalized to RGBA8 here.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self(image.into_rgba8())
    }

    /// Decode from disk. The format is sniffed from the file content so a
    /// mislabelled extension still loads.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SdfError> {
        let path = path.as_ref();
        let decode_err = |reason: String| SdfError::DecodeFailure { path: path.to_path_buf(), reason };
        let reader = ImageReader::open(path)
            .map_err(|e| decode_err(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?;
        let decoded = reader.decode().map_err(|e| decode_err(e.to_string()))?;
        Ok(Self::from_dynamic(decoded))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

/// Packed output: R = mirrored mask (light from the right), G = mask (light
/// from the left), B = 0, A = source alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdfResult(RgbaImage);

impl SdfResult {
    pub fn width(&self) -> u32 {
        self.0.width()
    }
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

/// Remap a gradient mask into the two-channel lighting texture.
///
/// Per pixel: `m = mean(r, g, b) / 255`, red takes `m` of the horizontally
/// mirrored pixel, green takes `m` of the pixel itself, both quantized with
/// `round(m * 255)`. Blue is cleared and alpha is copied untouched, so the
/// output always has the source dimensions and alpha.
pub fn generate(source: &GradientImage) -> SdfResult {
    let src = source.image();
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let here = src.get_pixel(x, y);
            let mirrored = src.get_pixel(w - 1 - x, y);
            out.put_pixel(
                x,
                y,
                Rgba([quantize(mask(mirrored)), quantize(mask(here)), 0, here[3]]),
            );
        }
    }
    SdfResult(out)
}

#[inline]
fn mask(p: &Rgba<u8>) -> f32 {
    (p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0 / 255.0
}

#[inline]
fn quantize(m: f32) -> u8 {
    (m * 255.0).round().clamp(0.0, 255.0) as u8
}
