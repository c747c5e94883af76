use std::sync::Arc;

use crate::assets::source::MediaSource;
use crate::foundation::core::{FrameIndex, Pivot};
use crate::foundation::error::BakeResult;
use crate::layout::bbox::CanvasGeometry;
use crate::layout::model::LayoutEntry;
use crate::render::composite::blit_over;
use crate::render::frame::FrameRGBA;
use crate::render::transform::{PlacedRaster, place_layer};

/// A layout entry paired with the source handle it samples from.
///
/// Still and animation frames never change, so their resized and rotated rasters are kept per
/// source frame and reused across global frames.
pub struct BoundLayer {
    entry: LayoutEntry,
    source: MediaSource,
    placed: Vec<Option<Arc<PlacedRaster>>>,
    placed_pivot: Pivot,
}

impl BoundLayer {
    /// Bind `entry` to its opened source.
    pub fn new(entry: LayoutEntry, source: MediaSource) -> Self {
        Self {
            entry,
            source,
            placed: Vec::new(),
            placed_pivot: Pivot::default(),
        }
    }

    /// Placement and stacking data.
    pub fn entry(&self) -> &LayoutEntry {
        &self.entry
    }

    /// Frame source opened for the entry.
    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Independent copy with its own source handle (see [`MediaSource::fork`]).
    ///
    /// Already placed rasters are shared with the fork.
    pub fn fork(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            source: self.source.fork(),
            placed: self.placed.clone(),
            placed_pivot: self.placed_pivot,
        }
    }

    /// The layer's raster for global `frame`, resized and rotated into place.
    pub fn placed_frame(&mut self, frame: FrameIndex, pivot: Pivot) -> BakeResult<Arc<PlacedRaster>> {
        if pivot != self.placed_pivot {
            self.placed.clear();
            self.placed_pivot = pivot;
        }
        let slot = self.source.static_slot(frame);
        if let Some(slot) = slot
            && let Some(Some(hit)) = self.placed.get(slot)
        {
            return Ok(hit.clone());
        }

        let sampled = self.source.get_frame(frame)?;
        let placed = Arc::new(place_layer(&sampled, &self.entry, pivot));
        if let Some(slot) = slot {
            if self.placed.len() <= slot {
                self.placed.resize(slot + 1, None);
            }
            self.placed[slot] = Some(placed.clone());
        }
        Ok(placed)
    }
}

/// Composite one global frame.
///
/// `layers` must already be in back-to-front stacking order. Each layer is sampled cyclically,
/// resized, rotated and blended source-over onto a fresh transparent canvas; nothing is carried
/// between calls apart from per-layer raster caches.
#[tracing::instrument(level = "debug", skip(layers, geometry), fields(layers = layers.len()))]
pub fn compose_frame(
    layers: &mut [BoundLayer],
    frame: FrameIndex,
    geometry: &CanvasGeometry,
    pivot: Pivot,
) -> BakeResult<FrameRGBA> {
    let mut canvas = FrameRGBA::transparent(geometry.width, geometry.height);
    for layer in layers.iter_mut() {
        let placed = layer.placed_frame(frame, pivot)?;
        let (dx, dy) = geometry.to_canvas(placed.x, placed.y);
        blit_over(&mut canvas, &placed.image, dx, dy);
    }
    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
