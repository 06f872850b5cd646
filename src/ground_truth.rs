//! Ground-truth box loading.
//!
//! A ground-truth file has one line per frame holding `x y w h` separated by
//! any non-digit characters (commas, tabs, spaces). Lines are not validated
//! beyond extracting their integers.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{BoundingBox, ClipWindow};
use crate::quirks;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Per-frame boxes, `None` where a line carries fewer than four integers.
pub type BoxList = Vec<Option<BoundingBox>>;

/// Extract a box from one ground-truth line.
///
/// The first four integers are used. A line with fewer, or one whose
/// leading integers do not fit an `i64`, yields `None`.
pub fn parse_line(line: &str) -> Option<BoundingBox> {
    let mut values = INTEGER
        .find_iter(line)
        .map(|m| m.as_str().parse::<i64>().ok());
    let x = values.next()??;
    let y = values.next()??;
    let w = values.next()??;
    let h = values.next()??;
    Some(BoundingBox::new(x, y, w, h))
}

/// Parse ground-truth content, one entry per non-empty line.
pub fn parse(content: &str) -> BoxList {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                log::warn!("Ground-truth line {} does not hold four box integers: {:?}", i + 1, line);
            } else {
                log::trace!("Ground-truth line {}: {:?}", i + 1, parsed);
            }
            parsed
        })
        .collect()
}

/// Shift a box list by a fixed per-sequence correction.
///
/// Positive shifts drop leading entries, negative shifts prepend absent ones.
pub fn apply_offset(boxes: BoxList, shift: i64) -> BoxList {
    match shift {
        0 => boxes,
        s if s > 0 => boxes.into_iter().skip(s as usize).collect(),
        s => std::iter::repeat_n(None, s.unsigned_abs() as usize)
            .chain(boxes)
            .collect(),
    }
}

/// Part of a box offset still to apply after `dropped` leading entries were
/// already cut by a frame-range clip.
///
/// The offset and the clip both count entries before the first annotated
/// frame, so a clip starting at or past the offset absorbs it.
pub fn residual_offset(shift: i64, dropped: usize) -> i64 {
    if shift <= 0 {
        return shift;
    }
    (shift - i64::try_from(dropped).unwrap_or(i64::MAX)).max(0)
}

/// Loads ground-truth files and aligns them to frame indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundTruthLoader;

impl GroundTruthLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load the boxes of `name` from `path`, aligned to the clipped frame list.
    ///
    /// A file that covers the whole image directory (more than `clip.end`
    /// entries) is sliced to the clip; a shorter file is taken to be aligned
    /// to the clipped range already. A missing file yields an empty list.
    pub fn load(
        &self,
        path: &Path,
        name: &str,
        clip: Option<ClipWindow>,
    ) -> Result<BoxList, std::io::Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No ground truth at {:?}, frames will have no boxes", path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut boxes = parse(&content);
        let total = boxes.len();
        let mut shift = quirks::box_offset(name);

        if let Some(clip) = clip {
            if total > clip.end {
                boxes = clip.apply(boxes);
                shift = residual_offset(shift, clip.start);
            } else {
                if total != clip.count() {
                    log::warn!(
                        "Ground truth {:?} has {} entries for a {}-frame range",
                        path,
                        total,
                        clip.count()
                    );
                }
                log::debug!(
                    "Ground truth {:?} has {} entries, treating it as pre-clipped",
                    path,
                    total
                );
                shift = 0;
            }
        }

        if shift != 0 {
            log::debug!("Applying box offset {} to '{}'", shift, name);
            boxes = apply_offset(boxes, shift);
        }

        log::info!("Loaded {} ground-truth boxes from {:?}", boxes.len(), path);
        Ok(boxes)
    }
}
