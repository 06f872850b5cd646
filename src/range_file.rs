//! Parser for the optional frame-range file.
//!
//! Each line reads `<sequenceName> <firstFrameNumber> <lastFrameNumber>`.
//! Blank lines and `#` comments are ignored; malformed lines are logged and
//! skipped so one bad entry does not hide the rest of the table.

use std::collections::HashMap;
use std::path::Path;

use crate::model::FrameRange;

/// Valid annotated frame ranges keyed by plain sequence name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameRangeTable {
    ranges: HashMap<String, FrameRange>,
}

impl FrameRangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the table from disk.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::parse(&content);
        if table.is_empty() {
            log::warn!("No frame ranges in {:?}, sequences will not be clipped", path);
        } else {
            log::info!("Loaded {} frame ranges from {:?}", table.len(), path);
        }
        Ok(table)
    }

    /// Parse table content.
    pub fn parse(content: &str) -> Self {
        let mut ranges = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let parsed = match parts.as_slice() {
                [name, first, last] => first
                    .parse()
                    .ok()
                    .zip(last.parse().ok())
                    .map(|(first, last)| (*name, FrameRange::new(first, last))),
                _ => None,
            };

            match parsed {
                Some((name, range)) if range.first <= range.last => {
                    ranges.insert(name.to_string(), range);
                }
                _ => {
                    log::warn!(
                        "Skipping malformed frame range on line {}: {:?}",
                        line_no + 1,
                        line
                    );
                }
            }
        }

        Self { ranges }
    }

    pub fn insert(&mut self, name: impl Into<String>, range: FrameRange) {
        self.ranges.insert(name.into(), range);
    }

    pub fn get(&self, name: &str) -> Option<FrameRange> {
        self.ranges.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
