// Display-only views of a generated texture.

use image::{imageops, imageops::FilterType, Rgba, RgbaImage};

use super::texture::SdfResult;

/// Per-channel views of one result. Every view has the result's dimensions
/// and alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewChannels {
    /// Red only: light from the right.
    pub red: RgbaImage,
    /// Green only: light from the left.
    pub green: RgbaImage,
    pub combined: RgbaImage,
}

pub fn split_channels(result: &SdfResult) -> PreviewChannels {
    let src = result.image();
    let isolate = |keep: usize| {
        let mut view = RgbaImage::new(src.width(), src.height());
        for (dst, p) in view.pixels_mut().zip(src.pixels()) {
            let mut rgba = [0, 0, 0, p[3]];
            rgba[keep] = p[keep];
            *dst = Rgba(rgba);
        }
        view
    };
    PreviewChannels {
        red: isolate(0),
        green: isolate(1),
        combined: src.clone(),
    }
}

/// Width/height that fit inside a `max_side` square keeping aspect ratio.
/// Never enlarges and never collapses a side to zero.
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    if width <= max_side && height <= max_side {
        return (width, height);
    }
    let scale = max_side as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Lanczos downscale for preview panels.
pub fn thumbnail(image: &RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = fit_within(image.width(), image.height(), max_side.max(1));
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Lanczos3)
}
