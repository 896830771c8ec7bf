//! Highlight records: immutable annotations captured from text selections.
//!
//! # Invariants
//! - `text` is non-empty and trimmed.
//! - `paper_title` is a snapshot taken at creation time; it is never
//!   refreshed if the owning paper changes later.
//! - A highlight is never mutated after creation; the only lifecycle
//!   transitions are create and delete.

use crate::model::now_epoch_ms;
use crate::model::paper::PaperId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a highlight.
pub type HighlightId = Uuid;

/// Section label used when attribution finds no labeled ancestor.
pub const GENERAL_SECTION: &str = "General";

/// An immutable record of one annotation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: HighlightId,
    /// Owning paper at creation time. May dangle if that paper is later
    /// deleted; readers must render from the captured fields below.
    pub paper_id: PaperId,
    /// Display title of the owning paper, captured at creation.
    pub paper_title: String,
    /// The selected text, trimmed and non-empty.
    pub text: String,
    /// User-authored note; may be empty.
    pub note: String,
    /// Attributed section label, `"General"` when nothing more specific
    /// was found.
    pub section: String,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
}

impl Highlight {
    /// Creates a highlight with a fresh id and the current timestamp.
    ///
    /// The caller (the entity store) is responsible for validating that
    /// `text` is non-empty after trimming and that `paper_id` resolves.
    pub fn new(
        paper_id: PaperId,
        paper_title: impl Into<String>,
        text: impl Into<String>,
        note: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            paper_id,
            paper_title: paper_title.into(),
            text: text.into(),
            note: note.into(),
            section: section.into(),
            created_at: now_epoch_ms(),
        }
    }
}
