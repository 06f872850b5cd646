//! Annotation session state management.
//!
//! One sequence is held in memory at a time. Edits mark the session dirty,
//! and the outgoing sequence is flushed before another one replaces it, so
//! at most one sequence ever has unsaved labels.

use std::path::PathBuf;

use crate::catalog::{Direction, ResolvedSequence, SequenceCatalog};
use crate::config::{ConfigError, SessionConfig};
use crate::error::SessionError;
use crate::ground_truth::GroundTruthLoader;
use crate::label_store::{LabelStorage, NpzLabelStore, label_path};
use crate::model::{AttributeCode, BoundingBox, Frame, LabelVector};
use crate::page::PageWindow;
use crate::range_file::FrameRangeTable;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No sequence loaded
    Empty,
    /// Sequence loaded, labels match storage
    Loaded,
    /// Sequence loaded with unsaved edits
    Dirty,
}

/// One visible cell of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry<'a> {
    /// Frame index within the sequence
    pub index: usize,
    pub frame: &'a Frame,
    pub bbox: Option<BoundingBox>,
    pub label: AttributeCode,
}

/// In-memory data of the active sequence.
#[derive(Debug)]
struct ActiveSequence {
    sequence: ResolvedSequence,
    frames: Vec<Frame>,
    labels: LabelVector,
    label_path: PathBuf,
    window: PageWindow,
    dirty: bool,
}

/// Tracks the active sequence, its labels and the visible page.
pub struct AnnotationSession {
    catalog: SequenceCatalog,
    ground_truth: GroundTruthLoader,
    store: Box<dyn LabelStorage>,
    attr_root: PathBuf,
    page_size: usize,
    active: Option<ActiveSequence>,
}

impl AnnotationSession {
    /// Create a session storing labels as `.npz` files below `attr_root`.
    pub fn new(catalog: SequenceCatalog, attr_root: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            catalog,
            ground_truth: GroundTruthLoader::new(),
            store: Box::new(NpzLabelStore::new()),
            attr_root: attr_root.into(),
            page_size: page_size.max(1),
            active: None,
        }
    }

    /// Build a session from configuration, reading the frame-range file if set.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let ranges = match &config.frame_range_file {
            Some(path) => FrameRangeTable::from_file(path)?,
            None => FrameRangeTable::new(),
        };
        let catalog = SequenceCatalog::new(&config.dataset_root).with_ranges(ranges);

        Ok(Self::new(catalog, &config.attr_root, config.page_size()))
    }

    /// Replace the label storage backend.
    pub fn with_store(mut self, store: Box<dyn LabelStorage>) -> Self {
        self.store = store;
        self
    }

    pub fn catalog(&self) -> &SequenceCatalog {
        &self.catalog
    }

    pub fn state(&self) -> SessionState {
        match &self.active {
            None => SessionState::Empty,
            Some(active) if active.dirty => SessionState::Dirty,
            Some(_) => SessionState::Loaded,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == SessionState::Dirty
    }

    /// Identifier of the loaded sequence.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.sequence.id.as_str())
    }

    /// Resolution details of the loaded sequence.
    pub fn active_sequence(&self) -> Option<&ResolvedSequence> {
        self.active.as_ref().map(|a| &a.sequence)
    }

    /// Frame count of the loaded sequence, 0 when empty.
    pub fn frame_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.frames.len())
    }

    pub fn frames(&self) -> &[Frame] {
        self.active.as_ref().map_or(&[], |a| a.frames.as_slice())
    }

    pub fn labels(&self) -> Option<&LabelVector> {
        self.active.as_ref().map(|a| &a.labels)
    }

    pub fn window(&self) -> Option<&PageWindow> {
        self.active.as_ref().map(|a| &a.window)
    }

    /// Frames per code of the loaded sequence.
    pub fn label_counts(&self) -> Option<[usize; AttributeCode::MAX as usize + 1]> {
        self.labels().map(LabelVector::counts)
    }

    /// Switch to sequence `id`.
    ///
    /// Unsaved edits of the outgoing sequence are saved first; if that save
    /// fails the switch is aborted. The new sequence is fully loaded before
    /// it replaces the old one, so any load error leaves the session as it was.
    pub fn select_sequence(&mut self, id: &str) -> Result<(), SessionError> {
        if self.is_dirty() {
            self.save()?;
        }

        let next = self.load_sequence(id)?;
        log::info!(
            "Selected '{}': {} frames, {} per page",
            id,
            next.frames.len(),
            next.window.page_size()
        );
        self.active = Some(next);
        Ok(())
    }

    /// Switch to the sequence after the active one in catalog order.
    ///
    /// Returns `Ok(false)` when there is no such sequence.
    pub fn select_next_sequence(&mut self) -> Result<bool, SessionError> {
        self.select_neighbor(Direction::Next)
    }

    /// Switch to the sequence before the active one in catalog order.
    pub fn select_previous_sequence(&mut self) -> Result<bool, SessionError> {
        self.select_neighbor(Direction::Previous)
    }

    fn select_neighbor(&mut self, direction: Direction) -> Result<bool, SessionError> {
        let target = match self.active_id() {
            Some(id) => self.catalog.neighbor(id, direction)?,
            None => match direction {
                Direction::Next => self.catalog.list()?.into_iter().next(),
                Direction::Previous => self.catalog.list()?.pop(),
            },
        };

        match target {
            Some(id) => {
                self.select_sequence(&id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_sequence(&self, id: &str) -> Result<ActiveSequence, SessionError> {
        let sequence = self.catalog.resolve(id)?;
        let listing = self.catalog.frames(&sequence)?;

        let boxes = self
            .ground_truth
            .load(&sequence.ground_truth, &sequence.name, listing.clip)
            .map_err(|source| SessionError::GroundTruth {
                path: sequence.ground_truth.clone(),
                source,
            })?;
        if !boxes.is_empty() && boxes.len() != listing.images.len() {
            log::warn!(
                "'{}' has {} ground-truth boxes for {} frames",
                id,
                boxes.len(),
                listing.images.len()
            );
        }

        let frames: Vec<Frame> = listing
            .images
            .into_iter()
            .enumerate()
            .map(|(i, path)| Frame::new(i, path, boxes.get(i).copied().flatten()))
            .collect();

        let label_path = label_path(&self.attr_root, &sequence.id);
        let labels = self.store.load(&label_path, frames.len())?;
        let window = PageWindow::new(frames.len(), self.page_size);

        Ok(ActiveSequence {
            sequence,
            frames,
            labels,
            label_path,
            window,
            dirty: false,
        })
    }

    /// Frames of the visible page with their boxes and current labels.
    pub fn current_page(&self) -> Vec<PageEntry<'_>> {
        let Some(active) = &self.active else {
            return Vec::new();
        };

        active.frames[active.window.range()]
            .iter()
            .map(|frame| PageEntry {
                index: frame.index,
                frame,
                bbox: frame.bbox,
                label: active.labels.get(frame.index).unwrap_or_default(),
            })
            .collect()
    }

    /// Set the attribute of one frame.
    ///
    /// Rejects indices past the frame count and codes outside `0..=4`
    /// without touching the labels.
    pub fn set_attribute(&mut self, frame_index: usize, code: u8) -> Result<(), SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveSequence)?;

        let len = active.frames.len();
        if frame_index >= len {
            return Err(SessionError::IndexOutOfRange {
                index: frame_index,
                len,
            });
        }
        let code = AttributeCode::try_from(code)?;

        let previous = active.labels.set(frame_index, code);
        active.dirty = true;
        log::debug!(
            "Frame {} of '{}': {:?} -> {}",
            frame_index,
            active.sequence.id,
            previous,
            code
        );
        Ok(())
    }

    /// Set frames `from..=to` to one code.
    ///
    /// The whole range is validated before any label changes.
    pub fn set_attribute_range(
        &mut self,
        from: usize,
        to: usize,
        code: u8,
    ) -> Result<(), SessionError> {
        let len = self.frame_count();
        if self.active.is_none() {
            return Err(SessionError::NoActiveSequence);
        }
        if to >= len || from > to {
            return Err(SessionError::IndexOutOfRange {
                index: to.max(from),
                len,
            });
        }
        AttributeCode::try_from(code)?;

        for index in from..=to {
            self.set_attribute(index, code)?;
        }
        Ok(())
    }

    /// Show the next page. Returns false when already on the last page.
    pub fn advance_page(&mut self) -> bool {
        self.active
            .as_mut()
            .is_some_and(|active| active.window.advance())
    }

    /// Show the previous page. Returns false when already on the first page.
    pub fn retreat_page(&mut self) -> bool {
        self.active
            .as_mut()
            .is_some_and(|active| active.window.retreat())
    }

    pub fn can_advance(&self) -> bool {
        self.window().is_some_and(PageWindow::can_advance)
    }

    pub fn can_retreat(&self) -> bool {
        self.window().is_some_and(PageWindow::can_retreat)
    }

    /// Persist the labels of the active sequence.
    ///
    /// Succeeds without writing when there are no unsaved edits. On failure
    /// the edits stay in memory and the session stays dirty.
    pub fn save(&mut self) -> Result<(), SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveSequence)?;
        if !active.dirty {
            log::debug!("'{}' has no unsaved edits", active.sequence.id);
            return Ok(());
        }

        if let Err(e) = self.store.save(&active.label_path, &active.labels) {
            log::error!("Failed to save labels of '{}': {}", active.sequence.id, e);
            return Err(e.into());
        }
        active.dirty = false;
        Ok(())
    }

    /// Save and release the active sequence.
    ///
    /// A failed save keeps the sequence loaded.
    pub fn close(&mut self) -> Result<(), SessionError> {
        if self.active.is_none() {
            return Ok(());
        }
        self.save()?;
        if let Some(active) = self.active.take() {
            log::info!("Closed '{}'", active.sequence.id);
        }
        Ok(())
    }
}

impl Drop for AnnotationSession {
    fn drop(&mut self) {
        if let Some(active) = self.active.as_ref().filter(|a| a.dirty) {
            log::warn!(
                "Session dropped with unsaved labels for '{}'",
                active.sequence.id
            );
        }
    }
}
