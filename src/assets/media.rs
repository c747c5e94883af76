//! Video access through the system `ffprobe` / `ffmpeg` binaries.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::snap_to_grid;

/// Basic metadata about a source video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames per second of the first video stream, when ffprobe reports a usable rate.
    pub fps: Option<f64>,
    /// Container-level frame count (`nb_frames`), when present.
    pub nb_frames: Option<u64>,
    /// Stream (or, failing that, container) duration in seconds.
    pub duration_sec: Option<f64>,
}

impl VideoSourceInfo {
    /// Best available frame count: `nb_frames`, else `floor(duration * fps)`.
    ///
    /// The estimate rounds down so a partial trailing frame never becomes an index that fails to
    /// decode.
    ///
    /// `None` means the count could not be determined; callers treat the video as one frame.
    pub fn frame_count(&self) -> Option<u64> {
        if let Some(n) = self.nb_frames.filter(|&n| n > 0) {
            return Some(n);
        }
        let (fps, dur) = (self.fps?, self.duration_sec?);
        let est = snap_to_grid(fps * dur).floor();
        (est.is_finite() && est >= 1.0).then_some(est as u64)
    }
}

/// Whether `ffmpeg` can be launched from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_runs("ffmpeg")
}

/// Whether `ffprobe` can be launched from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_runs("ffprobe")
}

fn tool_runs(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> BakeResult<VideoSourceInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,nb_frames,duration:format=duration",
            "-of",
            "json",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| BakeError::decode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(BakeError::decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(source_path, &out.stdout)
}

pub(crate) fn parse_probe_json(source_path: &Path, json: &[u8]) -> BakeResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        width: Option<u32>,
        height: Option<u32>,
        avg_frame_rate: Option<String>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| BakeError::decode(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed.streams.first().ok_or_else(|| {
        BakeError::decode(format!(
            "no video stream found in '{}'",
            source_path.display()
        ))
    })?;
    let width = stream
        .width
        .filter(|&w| w > 0)
        .ok_or_else(|| BakeError::decode("missing video width from ffprobe"))?;
    let height = stream
        .height
        .filter(|&h| h > 0)
        .ok_or_else(|| BakeError::decode("missing video height from ffprobe"))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate));
    let nb_frames = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.trim().parse::<u64>().ok());
    let duration_sec = stream
        .duration
        .as_deref()
        .and_then(parse_seconds)
        .or_else(|| {
            parsed
                .format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(parse_seconds)
        });

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps,
        nb_frames,
        duration_sec,
    })
}

/// Parse an ffprobe rational such as `30000/1001`. Zero or malformed rates yield `None`.
fn parse_rate(s: &str) -> Option<f64> {
    let (num, den) = s.trim().split_once('/').unwrap_or((s.trim(), "1"));
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    let rate = num / den;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

fn parse_seconds(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Arguments for decoding `frame_count` sequential frames starting at `start_index`.
///
/// With a known frame rate the decoder seeks by time; otherwise frames are selected by index.
pub(crate) fn decode_args(info: &VideoSourceInfo, start_index: u64, frame_count: u32) -> Vec<String> {
    let mut args: Vec<String> = vec!["-v".into(), "error".into()];
    let select = match info.fps {
        Some(fps) if start_index > 0 => {
            args.push("-ss".into());
            args.push(format!("{:.9}", start_index as f64 / fps));
            None
        }
        None if start_index > 0 => Some(format!("select=gte(n\\,{start_index})")),
        _ => None,
    };
    args.push("-i".into());
    args.push(info.source_path.to_string_lossy().into_owned());
    if let Some(filter) = select {
        args.extend(["-vf".into(), filter, "-vsync".into(), "0".into()]);
    }
    args.extend([
        "-frames:v".into(),
        frame_count.to_string(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "pipe:1".into(),
    ]);
    args
}

/// Decode up to `frame_count` sequential straight-alpha RGBA frames starting at `start_index`.
pub(crate) fn decode_video_frames_rgba8(
    info: &VideoSourceInfo,
    start_index: u64,
    frame_count: u32,
) -> BakeResult<Vec<Vec<u8>>> {
    if frame_count == 0 {
        return Ok(Vec::new());
    }

    let out = Command::new("ffmpeg")
        .args(decode_args(info, start_index, frame_count))
        .output()
        .map_err(|e| BakeError::decode(format!("failed to run ffmpeg for video decode: {e}")))?;

    if !out.status.success() {
        return Err(BakeError::decode(format!(
            "ffmpeg video decode failed for '{}' at frame {start_index}: {}",
            info.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    split_raw_frames(out.stdout, info.width, info.height, frame_count)
}

pub(crate) fn split_raw_frames(
    raw: Vec<u8>,
    width: u32,
    height: u32,
    frame_count: u32,
) -> BakeResult<Vec<Vec<u8>>> {
    let expected_len = width as usize * height as usize * 4;
    if expected_len == 0 {
        return Err(BakeError::decode(
            "decoded video frame size is zero (invalid source dimensions)",
        ));
    }
    if !raw.len().is_multiple_of(expected_len) {
        return Err(BakeError::decode(format!(
            "decoded video batch has invalid size: got {} bytes, expected multiples of {expected_len}",
            raw.len()
        )));
    }

    let available = (raw.len() / expected_len).min(frame_count as usize);
    Ok(raw
        .chunks_exact(expected_len)
        .take(available)
        .map(<[u8]>::to_vec)
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
