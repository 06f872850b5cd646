//! Attribute codes assigned to individual frames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of per-frame attribute codes.
///
/// The numeric value is what gets persisted, so the discriminants are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum AttributeCode {
    /// Not annotated / no attribute
    #[default]
    None = 0,
    /// Target is occluded
    Occlusion = 1,
    /// Target is deformed
    Deformation = 2,
    /// Frame is motion-blurred
    Blur = 3,
    /// Occluded and blurred at once
    OcclusionBlur = 4,
}

impl AttributeCode {
    /// Highest valid raw code.
    pub const MAX: u8 = 4;

    /// Every code in persisted order.
    pub fn all() -> &'static [AttributeCode] {
        &[
            AttributeCode::None,
            AttributeCode::Occlusion,
            AttributeCode::Deformation,
            AttributeCode::Blur,
            AttributeCode::OcclusionBlur,
        ]
    }

    /// Raw value written to label storage.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short label shown on the selector buttons.
    pub fn short_label(self) -> &'static str {
        match self {
            AttributeCode::None => "-",
            AttributeCode::Occlusion => "O",
            AttributeCode::Deformation => "D",
            AttributeCode::Blur => "B",
            AttributeCode::OcclusionBlur => "OB",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            AttributeCode::None => "none",
            AttributeCode::Occlusion => "occlusion",
            AttributeCode::Deformation => "deformation",
            AttributeCode::Blur => "blur",
            AttributeCode::OcclusionBlur => "occlusion+blur",
        }
    }

    /// Highlight colour for a checked selector, `None` for the unset code.
    pub fn color(self) -> Option<[u8; 3]> {
        match self {
            AttributeCode::None => None,
            AttributeCode::Occlusion => Some([240, 128, 128]), // LightCoral
            AttributeCode::Deformation => Some([127, 255, 0]), // Chartreuse
            AttributeCode::Blur => Some([127, 255, 212]),      // Aquamarine
            AttributeCode::OcclusionBlur => Some([95, 158, 160]), // CadetBlue
        }
    }
}

impl From<AttributeCode> for u8 {
    fn from(code: AttributeCode) -> Self {
        code.as_u8()
    }
}

/// Raw value that does not name an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid attribute code {0} (expected 0..={max})", max = AttributeCode::MAX)]
pub struct InvalidAttributeCode(pub i64);

impl TryFrom<u8> for AttributeCode {
    type Error = InvalidAttributeCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        AttributeCode::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for AttributeCode {
    type Error = InvalidAttributeCode;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AttributeCode::None),
            1 => Ok(AttributeCode::Occlusion),
            2 => Ok(AttributeCode::Deformation),
            3 => Ok(AttributeCode::Blur),
            4 => Ok(AttributeCode::OcclusionBlur),
            other => Err(InvalidAttributeCode(other)),
        }
    }
}

impl fmt::Display for AttributeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}
