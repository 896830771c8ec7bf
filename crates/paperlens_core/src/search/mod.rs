//! In-memory filtering for the library and notebook views.
//!
//! Read-side only: filters borrow from the store's collections and never
//! mutate anything.

use crate::model::folder::FolderId;
use crate::model::highlight::Highlight;
use crate::model::paper::Paper;

/// Folder scoping for a library query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderScope {
    /// Papers from every folder.
    #[default]
    All,
    /// Papers in one folder.
    In(FolderId),
}

/// Library view query: folder scope plus a title search.
#[derive(Debug, Clone, Default)]
pub struct PaperFilter {
    pub folder: FolderScope,
    /// Case-insensitive substring matched against both titles. Blank
    /// matches everything.
    pub query: String,
}

/// Filters papers by folder scope and title query, preserving order.
pub fn filter_papers<'a>(papers: &'a [Paper], filter: &PaperFilter) -> Vec<&'a Paper> {
    let needle = filter.query.trim().to_lowercase();
    papers
        .iter()
        .filter(|paper| match filter.folder {
            FolderScope::All => true,
            FolderScope::In(folder_id) => paper.folder_id == folder_id,
        })
        .filter(|paper| {
            needle.is_empty()
                || paper.data.title_cn.to_lowercase().contains(&needle)
                || paper.data.title_en.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Filters highlights by a case-insensitive substring over the selected
/// text, the note and the captured paper title, preserving order.
pub fn filter_highlights<'a>(highlights: &'a [Highlight], query: &str) -> Vec<&'a Highlight> {
    let needle = query.trim().to_lowercase();
    highlights
        .iter()
        .filter(|highlight| {
            needle.is_empty()
                || highlight.text.to_lowercase().contains(&needle)
                || highlight.note.to_lowercase().contains(&needle)
                || highlight.paper_title.to_lowercase().contains(&needle)
        })
        .collect()
}
