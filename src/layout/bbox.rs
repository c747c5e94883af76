//! Canvas measurement: the minimal axis-aligned box covering every layer's rotated footprint.

use crate::foundation::core::{Pivot, Rect};
use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::{ceil_px, floor_px};
use crate::layout::model::LayoutEntry;

/// Integer axis-aligned box in global coordinates (`max` edges exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub min_x: i64,
    /// Top edge.
    pub min_y: i64,
    /// Right edge (exclusive).
    pub max_x: i64,
    /// Bottom edge (exclusive).
    pub max_y: i64,
}

impl BoundingBox {
    /// Horizontal extent; may be non-positive for degenerate boxes. `None` if it overflows `i64`.
    pub fn width(&self) -> Option<i64> {
        self.max_x.checked_sub(self.min_x)
    }

    /// Vertical extent; may be non-positive for degenerate boxes. `None` if it overflows `i64`.
    pub fn height(&self) -> Option<i64> {
        self.max_y.checked_sub(self.min_y)
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Pixel-aligned cover of a floating-point rectangle (floor the minimum, ceil the maximum).
    pub fn covering(r: Rect) -> Self {
        Self {
            min_x: floor_px(r.x0),
            min_y: floor_px(r.y0),
            max_x: ceil_px(r.x1),
            max_y: ceil_px(r.y1),
        }
    }
}

/// Canvas size plus the coordinate shift from global to canvas-local pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasGeometry {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Global x of canvas column 0 (`min_x`).
    pub origin_x: i64,
    /// Global y of canvas row 0 (`min_y`).
    pub origin_y: i64,
}

impl CanvasGeometry {
    /// Fix the canvas from a bounding box, rejecting zero or negative area.
    pub fn from_bbox(bbox: BoundingBox) -> BakeResult<Self> {
        let too_large = || {
            BakeError::degenerate_canvas(format!(
                "bounding box ({}, {})..({}, {}) is too large",
                bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y
            ))
        };
        let w = bbox.width().ok_or_else(too_large)?;
        let h = bbox.height().ok_or_else(too_large)?;
        if w <= 0 || h <= 0 {
            return Err(BakeError::degenerate_canvas(format!(
                "bounding box {w}x{h} has no area"
            )));
        }
        let width = u32::try_from(w)
            .map_err(|_| BakeError::degenerate_canvas(format!("canvas width {w} is too large")))?;
        let height = u32::try_from(h)
            .map_err(|_| BakeError::degenerate_canvas(format!("canvas height {h} is too large")))?;
        Ok(Self {
            width,
            height,
            origin_x: bbox.min_x,
            origin_y: bbox.min_y,
        })
    }

    /// Map a global position onto canvas-local pixel coordinates.
    ///
    /// Positions inside the bounding box always map exactly; anything further out saturates.
    pub fn to_canvas(&self, x: i64, y: i64) -> (i64, i64) {
        (x.saturating_sub(self.origin_x), y.saturating_sub(self.origin_y))
    }
}

/// Floating-point footprint of one layer in global coordinates.
///
/// Axis-aligned layers skip the affine. Coordinates beyond 2^53 lose precision here; use
/// [`layer_bounds`] for exact integer placement.
pub fn layer_footprint(entry: &LayoutEntry, pivot: Pivot) -> Rect {
    let (w, h) = (f64::from(entry.width), f64::from(entry.height));
    if entry.is_axis_aligned() {
        let (x, y) = (entry.x as f64, entry.y as f64);
        return Rect::new(x, y, x + w, y + h);
    }
    entry
        .transform(pivot)
        .to_affine()
        .transform_rect_bbox(Rect::new(0.0, 0.0, w, h))
}

/// Pixel-aligned footprint of one layer.
///
/// Unrotated layers are measured with exact integer arithmetic; a layer whose far edge does not
/// fit in `i64` is rejected as a degenerate canvas.
pub fn layer_bounds(entry: &LayoutEntry, pivot: Pivot) -> BakeResult<BoundingBox> {
    if !entry.is_axis_aligned() {
        return Ok(rotated_bounds(entry, pivot));
    }
    let max_x = entry.x.checked_add(i64::from(entry.width));
    let max_y = entry.y.checked_add(i64::from(entry.height));
    match (max_x, max_y) {
        (Some(max_x), Some(max_y)) => Ok(BoundingBox {
            min_x: entry.x,
            min_y: entry.y,
            max_x,
            max_y,
        }),
        _ => Err(BakeError::degenerate_canvas(format!(
            "layer '{}' at ({}, {}) extends past the coordinate range",
            entry.path, entry.x, entry.y
        ))),
    }
}

/// Pixel bounds of a rotated layer: the cover of its affine-mapped rectangle.
///
/// The compositor renders rotated layers into exactly these bounds.
pub(crate) fn rotated_bounds(entry: &LayoutEntry, pivot: Pivot) -> BoundingBox {
    BoundingBox::covering(layer_footprint(entry, pivot))
}

/// Union of every layer's rotated footprint.
pub fn compute_bounding_box(entries: &[LayoutEntry], pivot: Pivot) -> BakeResult<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;
    for entry in entries {
        let b = layer_bounds(entry, pivot)?;
        bbox = Some(match bbox {
            Some(acc) => acc.union(b),
            None => b,
        });
    }
    bbox.ok_or_else(|| BakeError::degenerate_canvas("layout has no layers"))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/bbox.rs"]
mod tests;
