use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::assets::decode::{decode_animation, decode_still, premultiply_rgba8_in_place, read_asset};
use crate::assets::formats::FormatTable;
use crate::assets::media::{VideoSourceInfo, decode_video_frames_rgba8, probe_video};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BakeError, BakeResult};
use crate::layout::model::MediaKind;

const DEFAULT_VIDEO_CACHE_CAPACITY: usize = 64;
const DEFAULT_VIDEO_BATCH: u32 = 16;

/// Uniform, cyclic frame access over one layer's asset.
///
/// Every variant honours `get_frame(i) == get_frame(i % frame_count())`. Frames are premultiplied
/// RGBA8. A handle is not meant to be shared between workers; use [`MediaSource::fork`].
pub enum MediaSource {
    /// A single raster returned for every index.
    Still(StillSource),
    /// An eagerly decoded frame sequence.
    Animation(AnimationSource),
    /// A video decoded lazily through `ffmpeg`.
    Video(VideoSource),
}

/// See [`MediaSource::Still`].
#[derive(Clone)]
pub struct StillSource {
    frame: Arc<RgbaImage>,
}

/// See [`MediaSource::Animation`].
#[derive(Clone)]
pub struct AnimationSource {
    frames: Arc<[Arc<RgbaImage>]>,
}

/// See [`MediaSource::Video`].
pub struct VideoSource {
    info: Arc<VideoSourceInfo>,
    frame_count: u64,
    decoder: VideoFrameDecoder,
}

impl MediaSource {
    /// Open an asset, resolving its kind from `declared` or the extension table.
    #[tracing::instrument(level = "debug", skip(path, formats), fields(path = %path.display()))]
    pub fn open(
        path: &Path,
        declared: Option<MediaKind>,
        formats: &FormatTable,
    ) -> BakeResult<Self> {
        let kind = formats.resolve(path, declared)?;
        let source = match kind {
            MediaKind::Image => {
                let bytes = read_asset(path)?;
                let frame = decode_still(&bytes).map_err(|e| with_path(e, path))?;
                Self::still(frame)
            }
            MediaKind::Animation => {
                let bytes = read_asset(path)?;
                let frames = decode_animation(&bytes).map_err(|e| with_path(e, path))?;
                Self::animation(frames)
            }
            MediaKind::Video => Self::Video(VideoSource::open(path)?),
        };
        tracing::debug!(
            kind = kind.label(),
            frame_count = source.frame_count(),
            "opened media source"
        );
        Ok(source)
    }

    /// Wrap an in-memory premultiplied raster as a still source.
    pub fn still(frame: RgbaImage) -> Self {
        Self::Still(StillSource {
            frame: Arc::new(frame),
        })
    }

    /// Wrap in-memory premultiplied frames as a looping animation.
    pub fn animation(frames: Vec<RgbaImage>) -> Self {
        Self::Animation(AnimationSource {
            frames: frames.into_iter().map(Arc::new).collect(),
        })
    }

    /// Media kind of this source.
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Still(_) => MediaKind::Image,
            Self::Animation(_) => MediaKind::Animation,
            Self::Video(_) => MediaKind::Video,
        }
    }

    /// Loop length in frames; always at least 1.
    pub fn frame_count(&self) -> u64 {
        match self {
            Self::Still(_) => 1,
            Self::Animation(a) => (a.frames.len() as u64).max(1),
            Self::Video(v) => v.frame_count,
        }
    }

    /// Frame `frame % frame_count()`.
    ///
    /// An empty animation yields a 1x1 transparent raster. A video index that fails to decode
    /// falls back to the video's first frame.
    pub fn get_frame(&mut self, frame: FrameIndex) -> BakeResult<Arc<RgbaImage>> {
        match self {
            Self::Still(s) => Ok(s.frame.clone()),
            Self::Animation(a) => {
                if a.frames.is_empty() {
                    return Ok(Arc::new(RgbaImage::new(1, 1)));
                }
                let idx = (frame.0 % a.frames.len() as u64) as usize;
                Ok(a.frames[idx].clone())
            }
            Self::Video(v) => v.get_frame(frame),
        }
    }

    /// Slot of `frame` among this source's immutable decoded frames.
    ///
    /// `None` for video, whose frames live in a bounded decoder cache instead.
    pub(crate) fn static_slot(&self, frame: FrameIndex) -> Option<usize> {
        match self {
            Self::Still(_) => Some(0),
            Self::Animation(a) if a.frames.is_empty() => Some(0),
            Self::Animation(a) => Some((frame.0 % a.frames.len() as u64) as usize),
            Self::Video(_) => None,
        }
    }

    /// Independent handle over the same asset.
    ///
    /// Decoded still/animation frames are shared read-only; a video fork gets its own decoder
    /// cursor and cache.
    pub fn fork(&self) -> Self {
        match self {
            Self::Still(s) => Self::Still(s.clone()),
            Self::Animation(a) => Self::Animation(a.clone()),
            Self::Video(v) => Self::Video(VideoSource {
                info: v.info.clone(),
                frame_count: v.frame_count,
                decoder: VideoFrameDecoder::new(v.info.clone(), v.frame_count),
            }),
        }
    }
}

fn with_path(err: BakeError, path: &Path) -> BakeError {
    match err {
        BakeError::Decode(msg) => BakeError::decode(format!("'{}': {msg}", path.display())),
        other => other,
    }
}

impl VideoSource {
    fn open(path: &Path) -> BakeResult<Self> {
        let info = Arc::new(probe_video(path)?);
        let frame_count = match info.frame_count() {
            Some(n) => n,
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "video frame count unavailable, treating source as a single frame"
                );
                1
            }
        };
        Ok(Self::from_info(info, frame_count))
    }

    pub(crate) fn from_info(info: Arc<VideoSourceInfo>, frame_count: u64) -> Self {
        let frame_count = frame_count.max(1);
        Self {
            decoder: VideoFrameDecoder::new(info.clone(), frame_count),
            info,
            frame_count,
        }
    }

    /// Probed metadata.
    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn get_frame(&mut self, frame: FrameIndex) -> BakeResult<Arc<RgbaImage>> {
        let idx = frame.0 % self.frame_count;
        match self.decoder.frame_at(idx) {
            Ok(img) => Ok(img),
            Err(e) if idx != 0 => {
                tracing::warn!(
                    path = %self.info.source_path.display(),
                    index = idx,
                    error = %e,
                    "video frame decode failed, falling back to frame 0"
                );
                self.decoder.frame_at(0)
            }
            Err(e) => Err(e),
        }
    }
}

/// Sequential-batch decoder with a bounded LRU of decoded frames.
///
/// A miss decodes a run of frames starting at the requested index, so a sequential export
/// launches `ffmpeg` once per batch instead of once per frame.
struct VideoFrameDecoder {
    info: Arc<VideoSourceInfo>,
    frame_count: u64,
    frame_cache: HashMap<u64, Arc<RgbaImage>>,
    lru: VecDeque<u64>,
    capacity: usize,
    batch: u32,
}

impl VideoFrameDecoder {
    fn new(info: Arc<VideoSourceInfo>, frame_count: u64) -> Self {
        let capacity = env_positive("LAYERBAKE_VIDEO_CACHE_CAPACITY")
            .unwrap_or(DEFAULT_VIDEO_CACHE_CAPACITY);
        let batch = env_positive("LAYERBAKE_VIDEO_BATCH")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_VIDEO_BATCH)
            .min(u32::try_from(capacity).unwrap_or(u32::MAX));
        Self {
            info,
            frame_count,
            frame_cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
            batch,
        }
    }

    fn frame_at(&mut self, index: u64) -> BakeResult<Arc<RgbaImage>> {
        if let Some(img) = self.frame_cache.get(&index).cloned() {
            self.touch(index);
            return Ok(img);
        }

        let remaining = self.frame_count.saturating_sub(index).max(1);
        let count = u32::try_from(remaining).unwrap_or(u32::MAX).min(self.batch);
        let raw = decode_video_frames_rgba8(&self.info, index, count)?;
        if raw.is_empty() {
            return Err(BakeError::decode(format!(
                "ffmpeg returned no frame {index} for '{}'",
                self.info.source_path.display()
            )));
        }

        let mut requested = None;
        for (offset, mut bytes) in raw.into_iter().enumerate() {
            premultiply_rgba8_in_place(&mut bytes);
            let img = RgbaImage::from_raw(self.info.width, self.info.height, bytes)
                .map(Arc::new)
                .ok_or_else(|| BakeError::decode("decoded video frame has unexpected size"))?;
            if offset == 0 {
                requested = Some(img.clone());
            }
            self.insert_frame(index + offset as u64, img);
        }
        requested.ok_or_else(|| BakeError::decode("video batch missing requested frame"))
    }

    fn insert_frame(&mut self, key: u64, image: Arc<RgbaImage>) {
        self.frame_cache.insert(key, image);
        self.touch(key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.frame_cache.remove(&old);
            }
        }
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

fn env_positive(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
