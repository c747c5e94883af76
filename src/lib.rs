//! layerbake renders a static multi-layer media layout into a cropped PNG frame sequence.
//!
//! A layout is a JSON list of placed layers (still images, looping GIFs, videos), each with a
//! position, size, rotation and stacking order. Every layer loops over its own frames on a shared
//! frame clock; each global frame is composited onto a canvas sized to the union of all rotated
//! layer footprints.
//!
//! - Load a [`Layout`]
//! - Create an [`ExportSession`]
//! - Render single frames or stream every frame into a [`FrameSink`] such as [`PngSequenceSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod layout;
mod render;

pub use crate::foundation::core::{Affine, FrameIndex, Pivot, Point, Rect, Transform2D, Vec2};
pub use crate::foundation::error::{BakeError, BakeErrorKind, BakeResult};

pub use crate::layout::bbox::{
    BoundingBox, CanvasGeometry, compute_bounding_box, layer_bounds, layer_footprint,
};
pub use crate::layout::model::{Layout, LayoutEntry, MediaKind};

pub use crate::assets::decode::{decode_animation, decode_still};
pub use crate::assets::formats::FormatTable;
pub use crate::assets::media::{
    VideoSourceInfo, is_ffmpeg_on_path, is_ffprobe_on_path, probe_video,
};
pub use crate::assets::source::{AnimationSource, MediaSource, StillSource, VideoSource};

pub use crate::render::compositor::{BoundLayer, compose_frame};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::transform::{PlacedRaster, place_layer, resize_premul};

pub use crate::export::session::{
    ExportOpts, ExportSession, ExportStats, LayerInfo, export_layout,
};
pub use crate::export::sink::{
    FrameSink, InMemorySink, PngSequenceOpts, PngSequenceSink, SinkConfig,
};
