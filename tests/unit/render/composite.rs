use image::Rgba;

use super::*;

#[test]
fn over_opaque_replaces_and_transparent_keeps() {
    let dst = [10, 20, 30, 255];
    assert_eq!(over(dst, [1, 2, 3, 255]), [1, 2, 3, 255]);
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn over_half_alpha_blends() {
    let out = over([0, 0, 200, 255], [128, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 200 - ((200u32 * 128 + 127) / 255) as u8);
}

#[test]
fn blit_clips_to_canvas() {
    let mut canvas = FrameRGBA::transparent(4, 3);
    let src = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
    blit_over(&mut canvas, &src, 2, -1);

    let covered: Vec<(u32, u32)> = (0..3)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| canvas.pixel_straight(x, y).unwrap()[3] != 0)
        .collect();
    assert_eq!(covered, vec![(2, 0), (3, 0), (2, 1), (3, 1)]);
}

#[test]
fn blit_fully_outside_is_noop() {
    let mut canvas = FrameRGBA::transparent(4, 3);
    let src = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
    blit_over(&mut canvas, &src, -2, 0);
    blit_over(&mut canvas, &src, 4, 0);
    blit_over(&mut canvas, &src, 0, 10);
    assert!(canvas.data.iter().all(|&b| b == 0));
}
