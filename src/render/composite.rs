use image::RgbaImage;

use crate::foundation::math::mul_div255_u8;
use crate::render::frame::FrameRGBA;

pub(crate) type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over `src` onto `dst` with its top-left at canvas position `(dx, dy)`.
///
/// Parts of `src` that fall outside the canvas are clipped.
pub(crate) fn blit_over(dst: &mut FrameRGBA, src: &RgbaImage, dx: i64, dy: i64) {
    let (cw, ch) = (i64::from(dst.width), i64::from(dst.height));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x_start = dx.max(0);
    let y_start = dy.max(0);
    let x_end = dx.saturating_add(sw).min(cw);
    let y_end = dy.saturating_add(sh).min(ch);
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let src_raw = src.as_raw();
    for y in y_start..y_end {
        let sy = (y - dy) as usize;
        for x in x_start..x_end {
            let sx = (x - dx) as usize;
            let si = (sy * sw as usize + sx) * 4;
            let di = (y as usize * cw as usize + x as usize) * 4;
            let s = [
                src_raw[si],
                src_raw[si + 1],
                src_raw[si + 2],
                src_raw[si + 3],
            ];
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
