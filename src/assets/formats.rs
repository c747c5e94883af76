use std::collections::BTreeSet;
use std::path::Path;

use crate::foundation::error::{BakeError, BakeResult};
use crate::layout::model::MediaKind;

/// Recognised file extensions per media kind.
///
/// Passed explicitly to format resolution; there is no process-wide table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatTable {
    animation: BTreeSet<String>,
    video: BTreeSet<String>,
    image: BTreeSet<String>,
}

impl Default for FormatTable {
    fn default() -> Self {
        Self::new(
            ["gif"],
            ["mp4", "avi", "mov", "mkv", "flv", "wmv", "webm", "m4v"],
            ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"],
        )
    }
}

impl FormatTable {
    /// Build a table from extension lists (leading dots and case are ignored).
    pub fn new<A, V, I>(animation: A, video: V, image: I) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        fn norm<T: AsRef<str>>(it: impl IntoIterator<Item = T>) -> BTreeSet<String> {
            it.into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect()
        }
        Self {
            animation: norm(animation),
            video: norm(video),
            image: norm(image),
        }
    }

    /// Kind selected by extension alone, if any. Animation wins over video, video over image.
    pub fn kind_for_extension(&self, ext: &str) -> Option<MediaKind> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if self.animation.contains(&ext) {
            Some(MediaKind::Animation)
        } else if self.video.contains(&ext) {
            Some(MediaKind::Video)
        } else if self.image.contains(&ext) {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// Resolve the kind of an asset. A declared kind always wins over the extension.
    pub fn resolve(&self, path: &Path, declared: Option<MediaKind>) -> BakeResult<MediaKind> {
        if let Some(kind) = declared {
            return Ok(kind);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.kind_for_extension(ext).ok_or_else(|| {
            BakeError::unsupported_format(format!(
                "cannot determine media type of '{}' (no declared type, unrecognised extension '{ext}')",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/formats.rs"]
mod tests;
