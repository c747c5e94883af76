pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Snap values within `1e-6` of an integer onto it.
///
/// Rotating by exact quarter turns leaves `cos`/`sin` noise around 1e-16; without snapping a
/// 100px edge could become 101px after `ceil`.
pub(crate) fn snap_to_grid(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-6 { r } else { v }
}

pub(crate) fn floor_px(v: f64) -> i64 {
    snap_to_grid(v).floor() as i64
}

pub(crate) fn ceil_px(v: f64) -> i64 {
    snap_to_grid(v).ceil() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
