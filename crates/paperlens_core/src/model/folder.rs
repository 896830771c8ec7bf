//! Folder records grouping papers in the library.
//!
//! # Invariants
//! - The default folder id is reserved (`Uuid::nil()`), always exists in a
//!   well-formed store, and is never removable.
//! - Folder names are non-empty after trimming.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a folder.
pub type FolderId = Uuid;

/// Display name of the implicit default folder.
pub const DEFAULT_FOLDER_NAME: &str = "Uncategorized";

/// Returns the reserved id of the default, non-deletable folder.
pub const fn default_folder_id() -> FolderId {
    Uuid::nil()
}

/// A user-defined grouping bucket for papers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
}

impl Folder {
    /// Creates a folder with a fresh id.
    ///
    /// Callers are responsible for rejecting blank names; the constructor
    /// stores the name trimmed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
        }
    }

    /// Returns the implicit folder every paper falls back to.
    pub fn default_folder() -> Self {
        Self {
            id: default_folder_id(),
            name: DEFAULT_FOLDER_NAME.to_string(),
        }
    }

    /// Whether this record is the reserved default folder.
    pub fn is_default(&self) -> bool {
        self.id == default_folder_id()
    }
}
