use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BakeError, BakeResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub total_frames: u64,
}

/// Consumer of composited frames.
///
/// `push_frame` is called exactly once per index, in strictly increasing order starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BakeResult<()>;
    /// Consume one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BakeResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> BakeResult<()>;
}

/// File naming for [`PngSequenceSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngSequenceOpts {
    /// Prepended to the zero-padded frame number.
    pub prefix: String,
    /// Lower bound on the zero-pad width.
    pub min_digits: usize,
}

impl Default for PngSequenceOpts {
    fn default() -> Self {
        Self {
            prefix: "frame_".to_string(),
            min_digits: 3,
        }
    }
}

/// Writes every frame as `<dir>/<prefix><index>.png`.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    opts: PngSequenceOpts,
    digits: usize,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Create a sink targeting `dir`. Nothing is touched until [`FrameSink::begin`].
    pub fn new(dir: impl Into<PathBuf>, opts: PngSequenceOpts) -> Self {
        Self {
            dir: dir.into(),
            digits: opts.min_digits.max(1),
            opts,
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File path used for frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!(
            "{}{:0width$}.png",
            self.opts.prefix,
            idx.0,
            width = self.digits
        ))
    }
}

/// Decimal digits needed to print `n`.
pub(crate) fn decimal_digits(mut n: u64) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> BakeResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BakeError::io(format!(
                "create output directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        let last = cfg.total_frames.saturating_sub(1);
        self.digits = self.opts.min_digits.max(decimal_digits(last));
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BakeResult<()> {
        let path = self.frame_path(idx);
        frame
            .to_straight_image()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| BakeError::io(format!("write '{}': {e}", path.display())))?;
        tracing::info!(frame = idx.0, path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> BakeResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BakeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BakeResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BakeResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
