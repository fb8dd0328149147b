use std::path::Path;

use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};

use crate::error::{Result, SaveError};

/// Metadata for one half of a composite: source basename plus the slot's
/// (position, count) at compose time, for display purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMember {
    /// Basename of the source file
    pub file_name: String,

    /// 0-based index the image was taken from
    pub position: usize,

    /// Slot length at compose time
    pub count: usize,
}

impl PairMember {
    pub(crate) fn new(path: &Path, position: usize, count: usize) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self { file_name, position, count }
    }

    /// Display label in the form `(2/3) a2.png` (1-based position)
    pub fn label(&self) -> String {
        format!("({}/{}) {}", self.position + 1, self.count, self.file_name)
    }
}

/// A stitched pair: an owned RGB pixel buffer plus source metadata
///
/// Alpha has already been flattened against an opaque background, so the
/// buffer can be written as PNG or JPEG without further conversion. The
/// engine hands out an owned composite per request; callers decide whether
/// to keep, display, or drop it.
#[derive(Debug, Clone)]
pub struct Composite {
    buffer: RgbImage,

    /// Top half metadata
    pub top: PairMember,

    /// Bottom half metadata
    pub bottom: PairMember,
}

impl Composite {
    pub(crate) fn new(buffer: RgbImage, top: PairMember, bottom: PairMember) -> Self {
        Self { buffer, top, bottom }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Borrow the underlying pixel buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Consume the composite, returning the pixel buffer
    pub fn into_image(self) -> RgbImage {
        self.buffer
    }

    /// Info line for status displays:
    /// `Top: (1/3) a1.png | Bottom: (1/2) b1.jpg`
    pub fn caption(&self) -> String {
        format!("Top: {} | Bottom: {}", self.top.label(), self.bottom.label())
    }

    /// Aspect-preserving downscale to fit within `max_w` x `max_h`
    ///
    /// Returns the buffer unscaled when it already fits.
    pub fn scaled_to_fit(&self, max_w: u32, max_h: u32) -> RgbImage {
        let (w, h) = (self.width(), self.height());
        if w <= max_w && h <= max_h {
            return self.buffer.clone();
        }

        let image_ratio = w as f64 / h as f64;
        let bounds_ratio = max_w as f64 / max_h as f64;

        let (new_w, new_h) = if image_ratio > bounds_ratio {
            let new_w = max_w;
            (new_w, ((new_w as f64 / image_ratio).round() as u32).max(1))
        } else {
            let new_h = max_h;
            (((new_h as f64 * image_ratio).round() as u32).max(1), new_h)
        };

        image::imageops::resize(&self.buffer, new_w, new_h, FilterType::Lanczos3)
    }

    /// Write the composite to `path` in the format implied by its extension
    ///
    /// PNG and JPEG are supported; anything else is `UnsupportedFormat`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let format = match ext.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            _ => {
                return Err(SaveError::UnsupportedFormat {
                    format: if ext.is_empty() { "(none)".to_string() } else { ext },
                }
                .into())
            }
        };

        self.buffer
            .save_with_format(path, format)
            .map_err(|e| SaveError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}
