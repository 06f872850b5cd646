//! Data models for sequence attribute annotation.

mod attribute;
mod frame;
mod labels;

pub use attribute::{AttributeCode, InvalidAttributeCode};
pub use frame::{BoundingBox, ClipWindow, Frame, FrameRange, frame_number};
pub use labels::LabelVector;
