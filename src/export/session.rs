use std::path::Path;

use rayon::prelude::*;

use crate::assets::formats::FormatTable;
use crate::assets::source::MediaSource;
use crate::export::sink::{FrameSink, PngSequenceOpts, PngSequenceSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Pivot};
use crate::foundation::error::BakeResult;
use crate::layout::bbox::{BoundingBox, CanvasGeometry, compute_bounding_box};
use crate::layout::model::Layout;
use crate::render::compositor::{BoundLayer, compose_frame};
use crate::render::frame::FrameRGBA;

/// Options controlling an export run.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Force the total frame count. `None` uses the longest source loop.
    pub frames: Option<u64>,
    /// Rotation pivot shared by bounding box and compositor.
    pub pivot: Pivot,
    /// Extension table used when an entry has no declared type.
    pub formats: FormatTable,
    /// Render frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Worker thread count for parallel mode. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames rendered per parallel batch.
    pub chunk_size: usize,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            frames: None,
            pivot: Pivot::default(),
            formats: FormatTable::default(),
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Export run counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames the run was asked to produce.
    pub frames_total: u64,
    /// Frames handed to the sink.
    pub frames_written: u64,
}

/// Per-layer summary, as reported by `layerbake inspect`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerInfo {
    /// Index in the authored layout.
    pub index: usize,
    /// Asset path as written in the layout.
    pub path: String,
    /// Resolved media kind.
    pub kind: &'static str,
    /// Source loop length.
    pub frame_count: u64,
    /// Stacking order value.
    pub order: i64,
}

/// A fully validated export, ready to render.
///
/// Construction front-loads every fallible step except per-frame rendering: layout validation,
/// bounding box, format resolution, source decoding and the total frame count. Nothing is written
/// to disk until [`ExportSession::export`] runs.
pub struct ExportSession {
    layers: Vec<BoundLayer>,
    indices: Vec<usize>,
    bbox: BoundingBox,
    geometry: CanvasGeometry,
    total_frames: u64,
    opts: ExportOpts,
}

impl ExportSession {
    /// Open every layer's source and size the canvas.
    #[tracing::instrument(level = "info", skip(layout, opts), fields(layers = layout.len()))]
    pub fn new(layout: &Layout, opts: ExportOpts) -> BakeResult<Self> {
        if opts.frames == Some(0) {
            return Err(anyhow::anyhow!("frame count override must be >= 1").into());
        }
        if opts.threads == Some(0) {
            return Err(anyhow::anyhow!("export 'threads' must be >= 1 when set").into());
        }
        let bbox = compute_bounding_box(layout.entries(), opts.pivot)?;
        let geometry = CanvasGeometry::from_bbox(bbox)?;

        let indices = layout.stacking_order();
        let mut layers = Vec::with_capacity(indices.len());
        for &idx in &indices {
            let entry = &layout.entries()[idx];
            let path = layout.resolve_asset(entry);
            let source = MediaSource::open(&path, entry.kind, &opts.formats)?;
            layers.push(BoundLayer::new(entry.clone(), source));
        }

        let total_frames = match opts.frames {
            Some(n) => n,
            None => layers
                .iter()
                .map(|l| l.source().frame_count())
                .max()
                .unwrap_or(1)
                .max(1),
        };

        tracing::info!(
            width = geometry.width,
            height = geometry.height,
            origin_x = geometry.origin_x,
            origin_y = geometry.origin_y,
            total_frames,
            "export session ready"
        );
        Ok(Self {
            layers,
            indices,
            bbox,
            geometry,
            total_frames,
            opts,
        })
    }

    /// Canvas size and global-to-canvas shift.
    pub fn geometry(&self) -> CanvasGeometry {
        self.geometry
    }

    /// Global bounding box of every layer.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Number of frames [`ExportSession::export`] will produce.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Options this session was built with.
    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    /// Layers back-to-front.
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .zip(&self.indices)
            .map(|(l, &index)| LayerInfo {
                index,
                path: l.entry().path.clone(),
                kind: l.source().kind().label(),
                frame_count: l.source().frame_count(),
                order: l.entry().order,
            })
            .collect()
    }

    /// Composite a single frame. Indices past `total_frames` still sample cyclically.
    pub fn render_frame(&mut self, frame: FrameIndex) -> BakeResult<FrameRGBA> {
        compose_frame(&mut self.layers, frame, &self.geometry, self.opts.pivot)
    }

    /// Render every frame into `sink`, in index order. The first failure aborts the run.
    #[tracing::instrument(level = "info", skip(self, sink), fields(total = self.total_frames))]
    pub fn export(&mut self, sink: &mut dyn FrameSink) -> BakeResult<ExportStats> {
        let cfg = SinkConfig {
            width: self.geometry.width,
            height: self.geometry.height,
            total_frames: self.total_frames,
        };
        sink.begin(cfg)?;

        let mut stats = ExportStats {
            frames_total: self.total_frames,
            frames_written: 0,
        };
        if self.opts.parallel {
            let pool = build_thread_pool(self.opts.threads)?;
            let chunk_size = normalized_chunk_size(self.opts.chunk_size);
            let mut chunk_start = 0u64;
            while chunk_start < self.total_frames {
                let chunk_end = chunk_start
                    .saturating_add(chunk_size)
                    .min(self.total_frames);
                let frames = self.render_chunk_parallel(&pool, chunk_start, chunk_end)?;
                for (offset, frame) in frames.iter().enumerate() {
                    sink.push_frame(FrameIndex(chunk_start + offset as u64), frame)?;
                    stats.frames_written += 1;
                }
                chunk_start = chunk_end;
            }
        } else {
            for f in 0..self.total_frames {
                let frame = self.render_frame(FrameIndex(f))?;
                sink.push_frame(FrameIndex(f), &frame)?;
                stats.frames_written += 1;
            }
        }

        sink.end()?;
        tracing::info!(frames = stats.frames_written, "export complete");
        Ok(stats)
    }

    fn render_chunk_parallel(
        &self,
        pool: &rayon::ThreadPool,
        start: u64,
        end: u64,
    ) -> BakeResult<Vec<FrameRGBA>> {
        let layers = &self.layers;
        let geometry = &self.geometry;
        let pivot = self.opts.pivot;
        let rendered = pool.install(|| {
            (0..(end - start) as usize)
                .into_par_iter()
                .map_init(
                    || layers.iter().map(BoundLayer::fork).collect::<Vec<_>>(),
                    |worker_layers, offset| {
                        let f = FrameIndex(start + offset as u64);
                        compose_frame(worker_layers, f, geometry, pivot)
                    },
                )
                .collect::<Vec<_>>()
        });
        rendered.into_iter().collect()
    }
}

/// Load `layout_path`, then write its PNG sequence into `out_dir` with default file naming.
pub fn export_layout(
    layout_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    opts: ExportOpts,
) -> BakeResult<ExportStats> {
    let layout = Layout::from_path(layout_path)?;
    let mut session = ExportSession::new(&layout, opts)?;
    let mut sink = PngSequenceSink::new(out_dir.as_ref(), PngSequenceOpts::default());
    session.export(&mut sink)
}

fn build_thread_pool(threads: Option<usize>) -> BakeResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n.max(1));
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
