use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(255, 0), 0);
}

#[test]
fn pixel_edges_floor_and_ceil_with_snapping() {
    assert_eq!(floor_px(-0.5), -1);
    assert_eq!(ceil_px(-0.5), 0);
    assert_eq!(floor_px(10.0 - 1e-12), 10);
    assert_eq!(ceil_px(110.0 + 1e-12), 110);
    assert_eq!(ceil_px(10.25), 11);
    assert_eq!(floor_px(-14.999_999_999_9), -15);
}
