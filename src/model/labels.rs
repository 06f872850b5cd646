//! Per-frame label vector of the active sequence.

use std::ops::Index;

use super::AttributeCode;

/// Ordered attribute codes, index `i` belonging to frame `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelVector {
    codes: Vec<AttributeCode>,
}

impl LabelVector {
    /// All-unset vector of `len` frames.
    pub fn zeros(len: usize) -> Self {
        Self {
            codes: vec![AttributeCode::None; len],
        }
    }

    pub fn from_codes(codes: Vec<AttributeCode>) -> Self {
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<AttributeCode> {
        self.codes.get(index).copied()
    }

    /// Overwrite one entry. Returns the previous code, or `None` if out of range.
    pub fn set(&mut self, index: usize, code: AttributeCode) -> Option<AttributeCode> {
        let slot = self.codes.get_mut(index)?;
        Some(std::mem::replace(slot, code))
    }

    /// Extend with unset codes up to `len`, keeping stored values in place.
    /// Never shortens.
    pub fn pad_to(&mut self, len: usize) {
        if self.codes.len() < len {
            self.codes.resize(len, AttributeCode::None);
        }
    }

    pub fn as_slice(&self) -> &[AttributeCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = AttributeCode> + '_ {
        self.codes.iter().copied()
    }

    /// Raw values as written to storage.
    pub fn to_raw(&self) -> Vec<i64> {
        self.codes.iter().map(|c| i64::from(c.as_u8())).collect()
    }

    /// Count of frames per code, indexed by raw value.
    pub fn counts(&self) -> [usize; AttributeCode::MAX as usize + 1] {
        let mut counts = [0; AttributeCode::MAX as usize + 1];
        for code in &self.codes {
            counts[code.as_u8() as usize] += 1;
        }
        counts
    }
}

impl Index<usize> for LabelVector {
    type Output = AttributeCode;

    fn index(&self, index: usize) -> &Self::Output {
        &self.codes[index]
    }
}

impl FromIterator<AttributeCode> for LabelVector {
    fn from_iter<I: IntoIterator<Item = AttributeCode>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}
