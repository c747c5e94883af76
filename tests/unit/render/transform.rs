use image::Rgba;

use super::*;

fn entry(x: i64, y: i64, width: u32, height: u32, rotation_degrees: f64) -> LayoutEntry {
    LayoutEntry {
        path: "a.png".to_string(),
        kind: None,
        x,
        y,
        width,
        height,
        rotation_degrees,
        order: 0,
    }
}

#[test]
fn resize_solid_stays_solid_and_exact_size() {
    let src = RgbaImage::from_pixel(64, 32, Rgba([200, 40, 10, 255]));
    let out = resize_premul(&src, 10, 7);
    assert_eq!(out.dimensions(), (10, 7));
    for px in out.pixels() {
        assert_eq!(px.0, [200, 40, 10, 255]);
    }
}

#[test]
fn resize_keeps_premultiplied_invariant() {
    let mut src = RgbaImage::new(40, 40);
    for (x, _, px) in src.enumerate_pixels_mut() {
        // Hard edge between opaque white and transparent provokes Lanczos ringing.
        px.0 = if x < 20 { [255, 255, 255, 255] } else { [0, 0, 0, 0] };
    }
    let out = resize_premul(&src, 13, 9);
    for px in out.pixels() {
        assert!(px.0[..3].iter().all(|&c| c <= px.0[3]), "{:?}", px.0);
    }
}

#[test]
fn unrotated_layer_is_resized_and_placed_exactly() {
    let src = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
    let placed = place_layer(&src, &entry(-3, 9, 4, 2, 0.0), Pivot::Center);
    assert_eq!((placed.x, placed.y), (-3, 9));
    assert_eq!(placed.image.dimensions(), (4, 2));
    assert_eq!(placed.image, resize_premul(&src, 4, 2));
}

#[test]
fn quarter_turn_fills_the_measured_bounds() {
    let src = RgbaImage::from_pixel(100, 50, Rgba([0, 0, 255, 255]));
    let e = entry(10, 10, 100, 50, 90.0);
    let placed = place_layer(&src, &e, Pivot::Center);
    assert_eq!((placed.x, placed.y), (35, -15));
    assert_eq!(placed.image.dimensions(), (50, 100));
    // Interior is fully covered by the rotated layer.
    assert_eq!(placed.image.get_pixel(25, 50).0, [0, 0, 255, 255]);
    assert_eq!(placed.image.get_pixel(1, 1).0, [0, 0, 255, 255]);
}

#[test]
fn quarter_turn_maps_top_edge_to_right_edge() {
    // 4x2 source: top row red, bottom row green.
    let mut src = RgbaImage::new(4, 2);
    for (_, y, px) in src.enumerate_pixels_mut() {
        px.0 = if y == 0 {
            [255, 0, 0, 255]
        } else {
            [0, 255, 0, 255]
        };
    }
    let placed = place_layer(&src, &entry(0, 0, 4, 2, 90.0), Pivot::TopLeft);
    assert_eq!((placed.x, placed.y), (-2, 0));
    assert_eq!(placed.image.dimensions(), (2, 4));
    // Clockwise: the top row ends up on the right, the bottom row on the left.
    assert_eq!(placed.image.get_pixel(1, 1).0, [255, 0, 0, 255]);
    assert_eq!(placed.image.get_pixel(0, 2).0, [0, 255, 0, 255]);
}

#[test]
fn rotated_corners_outside_layer_are_transparent() {
    let src = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
    let placed = place_layer(&src, &entry(0, 0, 20, 20, 45.0), Pivot::Center);
    let (w, h) = placed.image.dimensions();
    assert!(w > 20 && h > 20);
    assert_eq!(placed.image.get_pixel(0, 0).0[3], 0);
    assert_eq!(placed.image.get_pixel(w - 1, h - 1).0[3], 0);
    assert_eq!(placed.image.get_pixel(w / 2, h / 2).0, [255, 255, 255, 255]);
}

#[test]
fn bilinear_sample_exact_and_midpoint() {
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
    img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
    assert_eq!(sample_bilinear(&img, 0.0, 0.0), [0, 0, 0, 255]);
    assert_eq!(sample_bilinear(&img, 0.5, 0.0), [100, 50, 25, 255]);
    assert_eq!(sample_bilinear(&img, 5.0, 0.0), [0, 0, 0, 0]);
}
