//! Static per-sequence corrections for the benchmark dataset.
//!
//! Dataset idiosyncrasies live here as lookup tables so that the catalog and
//! the ground-truth loader stay free of name checks.

/// Catalog entries that are bookkeeping folders, not sequences.
pub const RESERVED_ENTRIES: &[&str] = &["anno", "MEEM"];

/// Sequences whose directory holds one ground-truth file per tracked target.
///
/// Each segment `s` lives in `groundtruth_rect.<s>.txt` and is exposed in the
/// catalog as `<name>-<s>`.
const MULTI_SEGMENT: &[(&str, &[u32])] = &[
    ("Human4", &[2]),
    ("Jogging", &[1, 2]),
    ("Skating2", &[1, 2]),
];

/// Fixed shift between ground-truth lines and frame files.
///
/// A positive shift means the file starts that many entries before the
/// first frame image.
const BOX_OFFSETS: &[(&str, i64)] = &[("Tiger1", 5)];

/// Segments of a multi-segment sequence, `None` for ordinary sequences.
pub fn segments(name: &str) -> Option<&'static [u32]> {
    MULTI_SEGMENT
        .iter()
        .find(|(seq, _)| *seq == name)
        .map(|(_, segs)| *segs)
}

/// Box offset correction for a sequence, 0 when none is needed.
pub fn box_offset(name: &str) -> i64 {
    BOX_OFFSETS
        .iter()
        .find(|(seq, _)| *seq == name)
        .map(|(_, shift)| *shift)
        .unwrap_or(0)
}

/// Whether a directory name is a reserved bookkeeping entry.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_ENTRIES.contains(&name)
}

/// Build the catalog identifier of one segment.
pub fn segment_id(name: &str, segment: u32) -> String {
    format!("{}-{}", name, segment)
}

/// Split a synthetic `<name>-<segment>` identifier.
///
/// Only identifiers whose name is a known multi-segment sequence and whose
/// segment is listed for it are split; `Jogging-7` or `Some-Name-1` stay
/// plain identifiers.
pub fn split_segment_id(id: &str) -> Option<(&str, u32)> {
    let (name, segment) = id.rsplit_once('-')?;
    let segment: u32 = segment.parse().ok()?;
    segments(name)?
        .contains(&segment)
        .then_some((name, segment))
}
