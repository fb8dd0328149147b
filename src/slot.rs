use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, SlotError};

/// File extensions recognized by the directory scan (case-insensitive)
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

/// Names the two stimulus slots of a pairing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    Top,
    Bottom,
}

impl SlotId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An ordered set of image paths from one directory plus a current index
///
/// Paths are sorted lexicographically by filename. The index is 0-based and
/// stays within `[0, len)` for a non-empty slot; an empty slot pins it at 0.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    paths: Vec<PathBuf>,
    index: usize,
}

impl ImageSlot {
    /// Scan a directory (non-recursively) for supported image files
    ///
    /// Hidden (dot-prefixed) files are skipped; macOS `._x.jpg` AppleDouble
    /// droppings match the extension filter but are not images. Matching
    /// zero files is a valid result and leaves the slot empty.
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.is_dir() {
            return Err(SlotError::DirectoryNotFound {
                path: dir.display().to_string(),
            }
            .into());
        }

        let entries = std::fs::read_dir(dir).map_err(|_| SlotError::DirectoryNotFound {
            path: dir.display().to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();

            if path.is_file() && !is_hidden_file(&path) && has_supported_extension(&path) {
                debug!("matched image file: {:?}", path);
                paths.push(path);
            }
        }

        paths.sort();

        if paths.is_empty() {
            warn!("no supported image files in {:?}", dir);
        } else {
            info!("scanned {} image files from {:?}", paths.len(), dir);
        }

        Ok(Self { paths, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Current 0-based index (always 0 for an empty slot)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the index by `delta`, wrapping modulo the slot length
    ///
    /// No-op on an empty slot.
    pub fn step(&mut self, delta: isize) {
        if self.paths.is_empty() {
            return;
        }

        let len = self.paths.len() as isize;
        self.index = (self.index as isize + delta).rem_euclid(len) as usize;
    }

    /// Path at the current index
    pub fn current(&self) -> Option<&Path> {
        self.paths.get(self.index).map(PathBuf::as_path)
    }

    /// Path at `offset` positions past the current index, wrapping
    pub fn at_offset(&self, offset: usize) -> Option<(usize, &Path)> {
        if self.paths.is_empty() {
            return None;
        }

        let index = (self.index + offset) % self.paths.len();
        Some((index, self.paths[index].as_path()))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_supported_extension(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
