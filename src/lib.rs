//! seqattr - per-frame attribute annotation for tracking benchmark sequences
//!
//! Session core behind an attribute annotator: it tracks the active sequence,
//! aligns its ground-truth boxes and stored labels to the frame list, pages
//! through frames in fixed-size windows and persists labels on save or when
//! switching sequences. Rendering is left to whatever front end drives it.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod ground_truth;
pub mod label_store;
pub mod model;
pub mod page;
pub mod quirks;
pub mod range_file;
pub mod session;

pub use catalog::{Direction, FrameListing, ResolvedSequence, SequenceCatalog};
pub use config::{ConfigError, LogLevel, SessionConfig};
pub use error::{CatalogError, LabelStoreError, SessionError};
pub use ground_truth::GroundTruthLoader;
pub use label_store::{LabelStorage, NpzLabelStore};
pub use model::{AttributeCode, BoundingBox, Frame, FrameRange, LabelVector};
pub use page::PageWindow;
pub use range_file::FrameRangeTable;
pub use session::{AnnotationSession, PageEntry, SessionState};
