//! Paper records: one stored analysis per uploaded document.

use crate::model::analysis::PaperAnalysis;
use crate::model::folder::FolderId;
use crate::model::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a paper.
pub type PaperId = Uuid;

/// A stored analysis record for one uploaded document.
///
/// # Invariants
/// - `folder_id` references an existing folder or the reserved default
///   folder; the store never lets it dangle.
/// - `tags` are normalized (trimmed, lowercase, deduplicated) by the store
///   mutator before they land here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    /// The structured analysis payload captured at upload time.
    pub data: PaperAnalysis,
    /// Upload timestamp in epoch milliseconds.
    pub uploaded_at: i64,
    pub folder_id: FolderId,
    pub tags: Vec<String>,
}

impl Paper {
    /// Creates a paper with a fresh id and the current upload timestamp.
    pub fn new(data: PaperAnalysis, folder_id: FolderId) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            uploaded_at: now_epoch_ms(),
            folder_id,
            tags: Vec::new(),
        }
    }

    /// Returns the single display string used for lists and highlights.
    pub fn display_title(&self) -> &str {
        self.data.display_title()
    }
}
