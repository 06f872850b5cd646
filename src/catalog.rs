//! Sequence discovery and resolution under a dataset root.

use std::path::{Path, PathBuf};

use crate::constants::{
    GROUND_TRUTH_EXTENSION, GROUND_TRUTH_STEM, IMAGE_EXTENSIONS, IMAGE_SUBDIR,
};
use crate::error::CatalogError;
use crate::model::{ClipWindow, FrameRange, frame_number};
use crate::quirks;
use crate::range_file::FrameRangeTable;

/// Check if a path has a supported image extension
fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Direction for stepping through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Everything needed to load one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    /// Catalog identifier, also used to name the label file
    pub id: String,
    /// Plain directory name
    pub name: String,
    /// Segment tag for multi-segment sequences
    pub segment: Option<u32>,
    /// Directory holding the frame images
    pub image_dir: PathBuf,
    /// Ground-truth file for this identifier (may not exist)
    pub ground_truth: PathBuf,
    /// Valid annotated frame range, if the range file lists one
    pub frame_range: Option<FrameRange>,
}

/// Frame images of a resolved sequence after range clipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameListing {
    /// Sorted image paths inside the clip
    pub images: Vec<PathBuf>,
    /// Window applied to the directory listing, used to clip ground truth too
    pub clip: Option<ClipWindow>,
}

/// Enumerates and resolves sequences of a benchmark dataset.
#[derive(Debug, Clone)]
pub struct SequenceCatalog {
    root: PathBuf,
    ranges: FrameRangeTable,
}

impl SequenceCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ranges: FrameRangeTable::new(),
        }
    }

    /// Attach a frame-range table used to clip frames and ground truth.
    pub fn with_ranges(mut self, ranges: FrameRangeTable) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<(), CatalogError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(CatalogError::DatasetRootNotFound {
                path: self.root.clone(),
            })
        }
    }

    /// List sequence identifiers in sorted order.
    ///
    /// Reserved and hidden entries are left out, and multi-segment sequences
    /// are replaced by one identifier per segment.
    pub fn list(&self) -> Result<Vec<String>, CatalogError> {
        self.ensure_root()?;

        let mut names: Vec<String> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .filter(|name| !name.starts_with('.') && !quirks::is_reserved(name))
            .collect();
        names.sort();

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            match quirks::segments(&name) {
                Some(segments) => {
                    ids.extend(segments.iter().map(|&s| quirks::segment_id(&name, s)));
                }
                None => ids.push(name),
            }
        }

        log::debug!("Catalog {:?}: {} sequences", self.root, ids.len());
        Ok(ids)
    }

    /// Resolve an identifier to its image directory and ground-truth file.
    pub fn resolve(&self, id: &str) -> Result<ResolvedSequence, CatalogError> {
        self.ensure_root()?;

        let (name, segment) = match quirks::split_segment_id(id) {
            Some((name, segment)) => (name, Some(segment)),
            None => (id, None),
        };

        let seq_dir = self.root.join(name);
        if !seq_dir.is_dir() {
            return Err(CatalogError::SequenceNotFound {
                id: id.to_string(),
                path: seq_dir,
            });
        }

        let image_dir = seq_dir.join(IMAGE_SUBDIR);
        if !image_dir.is_dir() {
            return Err(CatalogError::ImageDirNotFound {
                id: id.to_string(),
                path: image_dir,
            });
        }

        let gt_name = match segment {
            Some(s) => format!("{}.{}.{}", GROUND_TRUTH_STEM, s, GROUND_TRUTH_EXTENSION),
            None => format!("{}.{}", GROUND_TRUTH_STEM, GROUND_TRUTH_EXTENSION),
        };

        Ok(ResolvedSequence {
            id: id.to_string(),
            name: name.to_string(),
            segment,
            image_dir,
            ground_truth: seq_dir.join(gt_name),
            frame_range: self.ranges.get(name),
        })
    }

    /// List the frame images of a resolved sequence, clipped to its range.
    pub fn frames(&self, seq: &ResolvedSequence) -> Result<FrameListing, CatalogError> {
        let mut images: Vec<PathBuf> = std::fs::read_dir(&seq.image_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();

        // Sort by filename for consistent ordering
        images.sort();

        let Some(range) = seq.frame_range else {
            return Ok(FrameListing { images, clip: None });
        };

        let Some(base) = images.first().and_then(|p| frame_number(p)) else {
            log::warn!(
                "Cannot apply frame range to '{}': first image name is not a frame number",
                seq.id
            );
            return Ok(FrameListing { images, clip: None });
        };

        let Some(clip) = range.window(base) else {
            log::warn!(
                "Frame range {}..={} of '{}' lies outside its images (first frame {})",
                range.first,
                range.last,
                seq.id,
                base
            );
            return Ok(FrameListing {
                images: Vec::new(),
                clip: None,
            });
        };

        let total = images.len();
        let images = clip.apply(images);
        log::debug!(
            "Clipped '{}' to frames {}..={}: {} of {} images",
            seq.id,
            range.first,
            range.last,
            images.len(),
            total
        );

        Ok(FrameListing {
            images,
            clip: Some(clip),
        })
    }

    /// Identifier adjacent to `id` in catalog order.
    pub fn neighbor(&self, id: &str, direction: Direction) -> Result<Option<String>, CatalogError> {
        let ids = self.list()?;
        let Some(pos) = ids.iter().position(|candidate| candidate == id) else {
            return Ok(None);
        };
        let target = match direction {
            Direction::Next => pos.checked_add(1),
            Direction::Previous => pos.checked_sub(1),
        };
        Ok(target.and_then(|i| ids.get(i).cloned()))
    }
}
