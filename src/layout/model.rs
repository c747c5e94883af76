use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::{Pivot, Transform2D, Vec2};
use crate::foundation::error::{BakeError, BakeResult};

/// Declared media kind of a layer.
///
/// Serialized with the names the authoring tool writes (`image`, `gif`, `video`); `animation` is
/// accepted as an alias for `gif`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MediaKind {
    /// Single still raster.
    #[serde(rename = "image")]
    Image,
    /// Looping multi-frame animation, decoded eagerly.
    #[serde(rename = "gif", alias = "animation")]
    Animation,
    /// Video container decoded through `ffmpeg`.
    #[serde(rename = "video")]
    Video,
}

impl MediaKind {
    /// Short lowercase label used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Animation => "animation",
            Self::Video => "video",
        }
    }
}

/// One authored layer: asset, placement, size, rotation and stacking index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutEntry {
    /// Asset locator. Relative paths resolve against [`Layout::assets_root`].
    pub path: String,
    /// Declared kind; `None` selects the kind from the file extension.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    /// Top-left x in global coordinates.
    pub x: i64,
    /// Top-left y in global coordinates.
    pub y: i64,
    /// Render width before rotation.
    pub width: u32,
    /// Render height before rotation.
    pub height: u32,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation_degrees: f64,
    /// Stacking index; lower values are drawn first.
    pub order: i64,
}

impl LayoutEntry {
    /// Whether the layer is drawn without any rotation transform.
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation_degrees == 0.0
    }

    /// Placement of this layer under the given pivot convention.
    pub fn transform(&self, pivot: Pivot) -> Transform2D {
        Transform2D {
            translate: Vec2::new(self.x as f64, self.y as f64),
            rotation_rad: self.rotation_degrees.to_radians(),
            anchor: pivot.anchor(f64::from(self.width), f64::from(self.height)),
        }
    }

    fn validate(&self, idx: usize) -> BakeResult<()> {
        if self.path.trim().is_empty() {
            return Err(BakeError::malformed_layout(format!(
                "entry {idx}: path must be non-empty"
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(BakeError::malformed_layout(format!(
                "entry {idx} ('{}'): width and height must be > 0 (got {}x{})",
                self.path, self.width, self.height
            )));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(BakeError::malformed_layout(format!(
                "entry {idx} ('{}'): rotation_degrees must be finite",
                self.path
            )));
        }
        Ok(())
    }
}

/// Validated, immutable scene description.
#[derive(Clone, Debug)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
    assets_root: PathBuf,
}

impl Layout {
    /// Build a layout from already-parsed entries, validating every one of them.
    pub fn from_entries(
        entries: Vec<LayoutEntry>,
        assets_root: impl Into<PathBuf>,
    ) -> BakeResult<Self> {
        for (idx, entry) in entries.iter().enumerate() {
            entry.validate(idx)?;
        }
        Ok(Self {
            entries,
            assets_root: assets_root.into(),
        })
    }

    /// Parse a layout JSON array from a reader.
    pub fn from_reader<R: std::io::Read>(r: R, assets_root: impl Into<PathBuf>) -> BakeResult<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_reader(r).map_err(|e| {
            BakeError::malformed_layout(format!("layout must be a JSON array of entries: {e}"))
        })?;
        let mut entries = Vec::with_capacity(raw.len());
        for (idx, value) in raw.into_iter().enumerate() {
            let entry: LayoutEntry = serde_json::from_value(value)
                .map_err(|e| BakeError::malformed_layout(format!("entry {idx}: {e}")))?;
            entries.push(entry);
        }
        Self::from_entries(entries, assets_root)
    }

    /// Parse a layout JSON array from a string.
    pub fn from_json_str(json: &str, assets_root: impl Into<PathBuf>) -> BakeResult<Self> {
        Self::from_reader(json.as_bytes(), assets_root)
    }

    /// Parse a layout JSON file. Relative asset paths resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> BakeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BakeError::malformed_layout(format!("open layout '{}': {e}", path.display()))
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_reader(BufReader::new(f), root)
    }

    /// Entries in authored (input) order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layout has no layers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory relative asset paths are resolved against.
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Absolute or root-relative location of an entry's asset.
    pub fn resolve_asset(&self, entry: &LayoutEntry) -> PathBuf {
        let p = Path::new(&entry.path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.assets_root.join(p)
        }
    }

    /// Entry indices sorted back-to-front: ascending `order`, ties keep input order.
    pub fn stacking_order(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.entries.len()).collect();
        idx.sort_by_key(|&i| self.entries[i].order);
        idx
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
