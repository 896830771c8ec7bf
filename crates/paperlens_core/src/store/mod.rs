//! Library entity store: the single source of truth for papers, folders
//! and highlights.
//!
//! # Responsibility
//! - Own the three collections and funnel every mutation through the
//!   operations here.
//! - Keep cross-references consistent: a paper's `folder_id` always
//!   resolves, the default folder always exists and is never removable.
//! - Notify the registered observer after each successful mutation so a
//!   write-through persistence layer sees every change before the mutating
//!   call returns.
//!
//! # Invariants
//! - Operations that would create a dangling reference are refused as
//!   no-ops instead of panicking or erroring; the store is well-formed by
//!   construction at every observable point.
//! - Papers and highlights are kept most-recent-first (new records are
//!   prepended); folders keep creation order.
//! - Deleting a paper does not cascade to its highlights; the dangling
//!   `paper_id` is tolerated and `orphaned_highlights` exposes it.

use crate::model::analysis::PaperAnalysis;
use crate::model::folder::{default_folder_id, Folder, FolderId};
use crate::model::highlight::{Highlight, HighlightId};
use crate::model::paper::{Paper, PaperId};
use log::{debug, warn};
use std::collections::BTreeSet;

/// Borrowed view of one collection, handed to observers after a mutation.
#[derive(Debug, Clone, Copy)]
pub enum PartitionSnapshot<'a> {
    Papers(&'a [Paper]),
    Folders(&'a [Folder]),
    Highlights(&'a [Highlight]),
}

/// Synchronous write-through hook.
///
/// Called after every successful mutation, before the mutating operation
/// returns to its caller. Observers must not call back into the store.
pub trait StoreObserver {
    fn collection_changed(&mut self, snapshot: PartitionSnapshot<'_>);
}

/// In-process entity store exclusively owning the library collections.
pub struct LibraryStore {
    papers: Vec<Paper>,
    folders: Vec<Folder>,
    highlights: Vec<Highlight>,
    observer: Option<Box<dyn StoreObserver>>,
}

impl LibraryStore {
    /// Creates an empty store seeded with the default folder.
    pub fn new() -> Self {
        Self {
            papers: Vec::new(),
            folders: vec![Folder::default_folder()],
            highlights: Vec::new(),
            observer: None,
        }
    }

    /// Builds a store from rehydrated collections.
    ///
    /// Repairs two classes of damage a snapshot could carry: a missing
    /// default folder is re-inserted at the front, and papers referencing
    /// an unknown folder are reassigned to the default folder. Both cases
    /// are logged.
    pub fn from_collections(
        papers: Vec<Paper>,
        folders: Vec<Folder>,
        highlights: Vec<Highlight>,
    ) -> Self {
        let mut folders = folders;
        if !folders.iter().any(Folder::is_default) {
            warn!("event=store_repair module=store reason=missing_default_folder");
            folders.insert(0, Folder::default_folder());
        }

        let known: BTreeSet<FolderId> = folders.iter().map(|folder| folder.id).collect();
        let mut papers = papers;
        for paper in &mut papers {
            if !known.contains(&paper.folder_id) {
                warn!(
                    "event=store_repair module=store reason=dangling_folder_ref paper={} folder={}",
                    paper.id, paper.folder_id
                );
                paper.folder_id = default_folder_id();
            }
        }

        Self {
            papers,
            folders,
            highlights,
            observer: None,
        }
    }

    /// Registers the write-through observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn StoreObserver>) {
        self.observer = Some(observer);
    }

    // -- Read accessors -------------------------------------------------

    /// Papers, most recent first.
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Folders in creation order, default folder included.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Highlights, most recent first.
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn paper(&self, id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|paper| paper.id == id)
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    pub fn highlight(&self, id: HighlightId) -> Option<&Highlight> {
        self.highlights.iter().find(|highlight| highlight.id == id)
    }

    pub fn folder_exists(&self, id: FolderId) -> bool {
        self.folders.iter().any(|folder| folder.id == id)
    }

    /// Highlights whose owning paper no longer exists.
    ///
    /// Paper deletion does not cascade, so these records accumulate until
    /// the user deletes them; they still render from their captured title.
    pub fn orphaned_highlights(&self) -> Vec<&Highlight> {
        let papers: BTreeSet<PaperId> = self.papers.iter().map(|paper| paper.id).collect();
        self.highlights
            .iter()
            .filter(|highlight| !papers.contains(&highlight.paper_id))
            .collect()
    }

    // -- Paper operations -----------------------------------------------

    /// Stores a fresh analysis as a paper and returns its id.
    ///
    /// `folder_id = None` and unknown folder ids both land in the default
    /// folder, keeping the reference invariant without a failure path.
    pub fn create_paper(&mut self, analysis: PaperAnalysis, folder_id: Option<FolderId>) -> PaperId {
        let target = folder_id
            .filter(|id| self.folder_exists(*id))
            .unwrap_or_else(default_folder_id);
        let paper = Paper::new(analysis, target);
        let id = paper.id;
        self.papers.insert(0, paper);
        debug!("event=paper_created module=store id={id} folder={target}");
        self.notify_papers();
        id
    }

    /// Removes a paper if present; silently does nothing otherwise.
    ///
    /// Highlights referencing the paper are left in place.
    pub fn delete_paper(&mut self, id: PaperId) -> bool {
        let before = self.papers.len();
        self.papers.retain(|paper| paper.id != id);
        if self.papers.len() == before {
            return false;
        }
        debug!("event=paper_deleted module=store id={id}");
        self.notify_papers();
        true
    }

    /// Reassigns a paper to another folder.
    ///
    /// No-op when the paper is unknown or when the target folder does not
    /// exist; the folder reference must keep resolving.
    pub fn move_paper(&mut self, id: PaperId, folder_id: FolderId) -> bool {
        if !self.folder_exists(folder_id) {
            warn!("event=paper_move_refused module=store paper={id} folder={folder_id}");
            return false;
        }
        let Some(paper) = self.papers.iter_mut().find(|paper| paper.id == id) else {
            return false;
        };
        paper.folder_id = folder_id;
        debug!("event=paper_moved module=store id={id} folder={folder_id}");
        self.notify_papers();
        true
    }

    /// Replaces a paper's tag set with a normalized copy of `tags`.
    ///
    /// Tags are trimmed, lowercased and deduplicated; blank entries are
    /// dropped. No-op when the paper is unknown.
    pub fn set_paper_tags(&mut self, id: PaperId, tags: &[String]) -> bool {
        let normalized = normalize_tags(tags);
        let Some(paper) = self.papers.iter_mut().find(|paper| paper.id == id) else {
            return false;
        };
        paper.tags = normalized;
        self.notify_papers();
        true
    }

    // -- Folder operations ----------------------------------------------

    /// Creates a folder; returns `None` (no-op) when the name is blank.
    pub fn create_folder(&mut self, name: &str) -> Option<FolderId> {
        if name.trim().is_empty() {
            return None;
        }
        let folder = Folder::new(name);
        let id = folder.id;
        self.folders.push(folder);
        debug!("event=folder_created module=store id={id}");
        self.notify_folders();
        Some(id)
    }

    /// Deletes a folder, reassigning its papers to the default folder.
    ///
    /// Refuses the default folder. Papers are reassigned before the folder
    /// record is removed and the paper snapshot is flushed first, so no
    /// observable state (in memory or durable) has a paper referencing a
    /// missing folder.
    pub fn delete_folder(&mut self, id: FolderId) -> bool {
        if id == default_folder_id() {
            warn!("event=folder_delete_refused module=store reason=default_folder");
            return false;
        }
        if !self.folder_exists(id) {
            return false;
        }

        let mut moved = 0usize;
        for paper in &mut self.papers {
            if paper.folder_id == id {
                paper.folder_id = default_folder_id();
                moved += 1;
            }
        }
        if moved > 0 {
            self.notify_papers();
        }

        self.folders.retain(|folder| folder.id != id);
        debug!("event=folder_deleted module=store id={id} papers_moved={moved}");
        self.notify_folders();
        true
    }

    // -- Highlight operations -------------------------------------------

    /// Captures an annotation against an existing paper.
    ///
    /// Refused (`None`) when the paper id is unknown or the trimmed text
    /// is empty: without the paper there is no title to snapshot, and an
    /// empty highlight records nothing. The paper's display title is
    /// captured at this instant and never refreshed.
    pub fn create_highlight(
        &mut self,
        paper_id: PaperId,
        text: &str,
        note: &str,
        section: &str,
    ) -> Option<HighlightId> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let title = match self.paper(paper_id) {
            Some(paper) => paper.display_title().to_string(),
            None => {
                warn!("event=highlight_refused module=store reason=unknown_paper paper={paper_id}");
                return None;
            }
        };

        let highlight = Highlight::new(paper_id, title, trimmed, note, section);
        let id = highlight.id;
        self.highlights.insert(0, highlight);
        debug!("event=highlight_created module=store id={id} paper={paper_id}");
        self.notify_highlights();
        Some(id)
    }

    /// Removes a highlight if present; no-op otherwise.
    pub fn delete_highlight(&mut self, id: HighlightId) -> bool {
        let before = self.highlights.len();
        self.highlights.retain(|highlight| highlight.id != id);
        if self.highlights.len() == before {
            return false;
        }
        debug!("event=highlight_deleted module=store id={id}");
        self.notify_highlights();
        true
    }

    // -- Observer plumbing ----------------------------------------------

    fn notify_papers(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.collection_changed(PartitionSnapshot::Papers(&self.papers));
        }
    }

    fn notify_folders(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.collection_changed(PartitionSnapshot::Folders(&self.folders));
        }
    }

    fn notify_highlights(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.collection_changed(PartitionSnapshot::Highlights(&self.highlights));
        }
    }
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes one tag value: trimmed and lowercased, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates a tag set, dropping blank entries.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}
