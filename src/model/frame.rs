//! Frames, boxes and frame ranges of a loaded sequence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Axis-aligned ground-truth box in pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BoundingBox {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One image of the active sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position in the (clipped) frame list
    pub index: usize,
    /// Full path to the image file
    pub path: PathBuf,
    /// Frame number encoded in the file name, if numeric
    pub number: Option<u32>,
    /// Ground-truth box, absent when the file has no entry for this frame
    pub bbox: Option<BoundingBox>,
}

impl Frame {
    pub fn new(index: usize, path: PathBuf, bbox: Option<BoundingBox>) -> Self {
        let number = frame_number(&path);
        Self {
            index,
            path,
            number,
            bbox,
        }
    }

    /// File name for display.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }
}

/// Parse the frame number from a file stem such as `0042.jpg`.
pub fn frame_number(path: &Path) -> Option<u32> {
    path.file_stem()?.to_str()?.parse().ok()
}

/// Inclusive range of valid frame numbers, as written in file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub first: u32,
    pub last: u32,
}

impl FrameRange {
    pub fn new(first: u32, last: u32) -> Self {
        Self { first, last }
    }

    /// Offsets of this range relative to the first frame number on disk.
    ///
    /// Returns `None` when the range ends before `base` or is inverted.
    pub fn window(&self, base: u32) -> Option<ClipWindow> {
        if self.last < self.first || self.last < base {
            return None;
        }
        Some(ClipWindow {
            start: self.first.saturating_sub(base) as usize,
            end: (self.last - base) as usize,
        })
    }
}

/// Inclusive index window into a per-directory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipWindow {
    pub start: usize,
    pub end: usize,
}

impl ClipWindow {
    /// Number of entries covered by the window.
    pub fn count(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Slice `items` to the window, clamped to what exists.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let end = (self.end + 1).min(items.len());
        let start = self.start.min(end);
        items.into_iter().skip(start).take(end - start).collect()
    }
}
