//! Per-layer raster transforms: high-quality resize, then rotation into the layer's bounds.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::{Pivot, Point};
use crate::layout::bbox::rotated_bounds;
use crate::layout::model::LayoutEntry;

/// A transformed layer raster and the global position of its top-left pixel.
#[derive(Clone, Debug)]
pub struct PlacedRaster {
    /// Premultiplied RGBA8 pixels.
    pub image: RgbaImage,
    /// Global x of column 0.
    pub x: i64,
    /// Global y of row 0.
    pub y: i64,
}

/// Resize a premultiplied raster to exactly `width x height` with a Lanczos3 filter.
pub fn resize_premul(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    let mut out = imageops::resize(src, width, height, FilterType::Lanczos3);
    clamp_premul_in_place(&mut out);
    out
}

/// Lanczos ringing can push colour above alpha; premultiplied pixels require `c <= a`.
fn clamp_premul_in_place(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let a = px.0[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
}

/// Resize the sampled frame to the entry's size and rotate it into the entry's pixel bounds.
///
/// Unrotated entries are placed at exactly `(x, y)`. Rotated entries are rendered by
/// inverse-mapping every pixel of [`crate::layer_bounds`] through the entry's affine, so the result
/// always matches the measured canvas footprint. Pixels outside the layer are transparent.
pub fn place_layer(frame: &RgbaImage, entry: &LayoutEntry, pivot: Pivot) -> PlacedRaster {
    let resized = resize_premul(frame, entry.width, entry.height);
    if entry.is_axis_aligned() {
        return PlacedRaster {
            image: resized,
            x: entry.x,
            y: entry.y,
        };
    }

    let bounds = rotated_bounds(entry, pivot);
    let out_w = bounds.width().and_then(|w| u32::try_from(w).ok()).unwrap_or(0);
    let out_h = bounds.height().and_then(|h| u32::try_from(h).ok()).unwrap_or(0);
    let inv = entry.transform(pivot).to_affine().inverse();

    let mut out = RgbaImage::new(out_w, out_h);
    for (px, py, dst) in out.enumerate_pixels_mut() {
        let global = Point::new(
            (bounds.min_x + i64::from(px)) as f64 + 0.5,
            (bounds.min_y + i64::from(py)) as f64 + 0.5,
        );
        let local = inv * global;
        dst.0 = sample_bilinear(&resized, local.x - 0.5, local.y - 0.5);
    }

    PlacedRaster {
        image: out,
        x: bounds.min_x,
        y: bounds.min_y,
    }
}

/// Bilinear sample at fractional pixel coordinates; texels outside the image are transparent.
pub(crate) fn sample_bilinear(img: &RgbaImage, fx: f64, fy: f64) -> [u8; 4] {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    if fx <= -1.0 || fy <= -1.0 || fx >= w as f64 || fy >= h as f64 {
        return [0; 4];
    }

    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let tx = (fx - x0 as f64) as f32;
    let ty = (fy - y0 as f64) as f32;

    let fetch = |x: i64, y: i64| -> [f32; 4] {
        if x < 0 || y < 0 || x >= w || y >= h {
            return [0.0; 4];
        }
        let p = img.get_pixel(x as u32, y as u32).0;
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] + (p10[i] - p00[i]) * tx;
        let bot = p01[i] + (p11[i] - p01[i]) * tx;
        out[i] = (top + (bot - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
