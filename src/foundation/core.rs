pub use kurbo::{Affine, Point, Rect, Vec2};

/// Global frame index on the synthetic export clock (0-based).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Point a layer rotates around.
///
/// The same pivot is used when measuring the canvas and when compositing, so a rotated layer is
/// always drawn inside the box that was measured for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    /// Rotate about the centre of the `width x height` rectangle.
    #[default]
    Center,
    /// Rotate about the placement anchor (the rectangle's top-left corner).
    TopLeft,
}

impl Pivot {
    /// Pivot position in the layer's local (unrotated, unscaled) space.
    pub fn anchor(self, width: f64, height: f64) -> Vec2 {
        match self {
            Self::Center => Vec2::new(width * 0.5, height * 0.5),
            Self::TopLeft => Vec2::ZERO,
        }
    }
}

/// Rigid 2-D placement: rotation about `anchor`, then translation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform2D {
    /// Offset applied after rotation (global placement of the local origin).
    pub translate: Vec2,
    /// Positive values rotate clockwise on a y-down canvas.
    pub rotation_rad: f64,
    /// Pivot in local space.
    pub anchor: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            anchor: Vec2::ZERO,
        }
    }
}

impl Transform2D {
    /// Local layer space to global canvas space.
    pub fn to_affine(self) -> Affine {
        let t_translate = Affine::translate(self.translate);
        let t_anchor = Affine::translate(self.anchor);
        let t_unanchor = Affine::translate(-self.anchor);
        let t_rotate = Affine::rotate(self.rotation_rad);

        // T(translate) * T(anchor) * R(rot) * T(-anchor)
        t_translate * t_anchor * t_rotate * t_unanchor
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
