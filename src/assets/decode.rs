use std::io::Cursor;
use std::path::Path;

use image::{AnimationDecoder, ImageFormat, RgbaImage};

use crate::foundation::error::{BakeError, BakeResult};

/// Read an asset file fully into memory.
pub(crate) fn read_asset(path: &Path) -> BakeResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| BakeError::decode(format!("failed to read asset '{}': {e}", path.display())))
}

/// Decode encoded image bytes to premultiplied RGBA8.
pub fn decode_still(bytes: &[u8]) -> BakeResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| BakeError::decode(format!("decode image: {e}")))?;
    let mut rgba = dyn_img.to_rgba8();
    premultiply_rgba8_in_place(&mut rgba);
    Ok(rgba)
}

/// Decode every frame of an animation to premultiplied RGBA8, in display order.
///
/// GIF frames come back fully composited (disposal applied). Non-GIF content decodes as a
/// single-frame sequence.
pub fn decode_animation(bytes: &[u8]) -> BakeResult<Vec<RgbaImage>> {
    if image::guess_format(bytes).ok() != Some(ImageFormat::Gif) {
        return Ok(vec![decode_still(bytes)?]);
    }

    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| BakeError::decode(format!("open gif: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| BakeError::decode(format!("decode gif frames: {e}")))?;

    Ok(frames
        .into_iter()
        .map(|f| {
            let mut rgba = f.into_buffer();
            premultiply_rgba8_in_place(&mut rgba);
            rgba
        })
        .collect())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
