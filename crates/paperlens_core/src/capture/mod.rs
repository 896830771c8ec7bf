//! Selection capture and section attribution.
//!
//! # Responsibility
//! - Turn raw text-selection events from the presentation layer into
//!   candidate annotations with an inferred section and an anchor point
//!   for the note affordance.
//! - Drive the `Idle -> Selected -> {Idle | NoteEditing -> Idle}` state
//!   machine and commit saved notes into the entity store.
//!
//! # Invariants
//! - Selections that are empty, collapsed, outside the annotatable region
//!   or shorter than [`MIN_SELECTION_CHARS`] after trimming never leave
//!   `Idle`.
//! - While a note is being edited the captured candidate is frozen:
//!   further selection events are ignored until Save or Cancel.
//! - The anchor point is transient UI state and is never persisted.

use crate::model::highlight::{HighlightId, GENERAL_SECTION};
use crate::model::paper::PaperId;
use crate::store::LibraryStore;
use log::debug;

/// Minimum selected characters (after trimming) for a candidate.
pub const MIN_SELECTION_CHARS: usize = 5;

/// Vertical distance the note affordance floats above the selection.
const AFFORDANCE_RISE_PX: f64 = 50.0;
/// Half the affordance width, used to center it on the selection.
const AFFORDANCE_HALF_WIDTH_PX: f64 = 20.0;

/// Node interface the section walk runs over.
///
/// The presentation layer adapts its document tree to this; tests use a
/// plain struct tree. `label` is the explicit section label an ancestor
/// may carry; `parent` is `None` at the annotatable region's root.
pub trait SectionNode {
    fn label(&self) -> Option<&str>;
    fn parent(&self) -> Option<&dyn SectionNode>;
}

/// Walks the ancestor chain upward and returns the nearest explicit
/// section label, or `"General"` when the walk exits the region without
/// finding one.
pub fn attribute_section(anchor: &dyn SectionNode) -> String {
    let mut current: Option<&dyn SectionNode> = Some(anchor);
    while let Some(node) = current {
        if let Some(label) = node.label() {
            return label.to_string();
        }
        current = node.parent();
    }
    GENERAL_SECTION.to_string()
}

/// Document-space bounding rectangle of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Screen-space anchor for the note affordance: above and centered on the
/// selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub top: f64,
    pub left: f64,
}

impl AnchorPoint {
    /// Computes the affordance anchor from a selection rectangle.
    pub fn above(rect: BoundingRect) -> Self {
        Self {
            top: rect.top - AFFORDANCE_RISE_PX,
            left: rect.left + rect.width / 2.0 - AFFORDANCE_HALF_WIDTH_PX,
        }
    }
}

/// A raw selection event as reported by the selection provider.
///
/// `anchor` is `None` when the selection started outside the annotatable
/// region; such selections never qualify.
pub struct RawSelection<'a> {
    pub text: &'a str,
    pub collapsed: bool,
    pub anchor: Option<&'a dyn SectionNode>,
    pub rect: BoundingRect,
}

/// Injected capability abstracting the host document's live selection.
pub trait SelectionProvider {
    /// The current selection, or `None` when nothing is selected.
    fn current_selection(&self) -> Option<RawSelection<'_>>;
    /// Clears the host's native selection.
    fn clear_selection(&mut self);
}

/// A qualified selection waiting to become a highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCandidate {
    /// Trimmed selected text.
    pub text: String,
    /// Attributed section label.
    pub section: String,
    /// Where the note affordance should appear.
    pub anchor: AnchorPoint,
}

/// Capture state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    /// A qualifying selection exists; the affordance is showing.
    Selected(SelectionCandidate),
    /// The note editor is open; the candidate is frozen.
    NoteEditing(SelectionCandidate),
}

/// Converts selection events into highlights via the entity store.
#[derive(Debug, Default)]
pub struct SelectionCapture {
    state: CaptureState,
}

impl SelectionCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// The current candidate, in either `Selected` or `NoteEditing`.
    pub fn candidate(&self) -> Option<&SelectionCandidate> {
        match &self.state {
            CaptureState::Idle => None,
            CaptureState::Selected(candidate) | CaptureState::NoteEditing(candidate) => {
                Some(candidate)
            }
        }
    }

    /// Pulls the provider's current selection and processes it.
    pub fn observe<P: SelectionProvider + ?Sized>(&mut self, provider: &P) {
        self.handle_selection(provider.current_selection());
    }

    /// Processes one raw selection event.
    ///
    /// A qualifying selection enters `Selected`; a disqualifying one
    /// returns to `Idle`. While a note is being edited the event is
    /// ignored and the candidate stays frozen.
    pub fn handle_selection(&mut self, selection: Option<RawSelection<'_>>) {
        if matches!(self.state, CaptureState::NoteEditing(_)) {
            return;
        }

        self.state = match Self::qualify(selection) {
            Some(candidate) => CaptureState::Selected(candidate),
            None => CaptureState::Idle,
        };
    }

    fn qualify(selection: Option<RawSelection<'_>>) -> Option<SelectionCandidate> {
        let selection = selection?;
        if selection.collapsed {
            return None;
        }
        let anchor_node = selection.anchor?;

        let text = selection.text.trim();
        if text.chars().count() < MIN_SELECTION_CHARS {
            return None;
        }

        Some(SelectionCandidate {
            text: text.to_string(),
            section: attribute_section(anchor_node),
            anchor: AnchorPoint::above(selection.rect),
        })
    }

    /// Opens the note editor for the current candidate.
    ///
    /// Returns `false` (no-op) unless the state is `Selected`.
    pub fn begin_note_editing(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            CaptureState::Selected(candidate) => {
                self.state = CaptureState::NoteEditing(candidate);
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Saves the frozen candidate as a highlight and clears the native
    /// selection.
    ///
    /// Returns the new highlight id, or `None` when no note is being
    /// edited or the store refuses the paper reference.
    pub fn save_note<P: SelectionProvider + ?Sized>(
        &mut self,
        provider: &mut P,
        store: &mut LibraryStore,
        paper_id: PaperId,
        note: &str,
    ) -> Option<HighlightId> {
        let candidate = match std::mem::take(&mut self.state) {
            CaptureState::NoteEditing(candidate) => candidate,
            other => {
                self.state = other;
                return None;
            }
        };

        let created = store.create_highlight(paper_id, &candidate.text, note, &candidate.section);
        provider.clear_selection();
        if let Some(id) = created {
            debug!("event=note_saved module=capture highlight={id} section={}", candidate.section);
        }
        created
    }

    /// Discards the frozen candidate and clears the native selection.
    pub fn cancel_note<P: SelectionProvider + ?Sized>(&mut self, provider: &mut P) {
        if !matches!(self.state, CaptureState::NoteEditing(_)) {
            return;
        }
        self.state = CaptureState::Idle;
        provider.clear_selection();
    }
}
