//! Core engine for PaperLens: the annotation and library persistence
//! engine behind an AI-assisted paper reader.
//! This crate is the single source of truth for business invariants.

pub mod analysis;
pub mod capture;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod persist;
pub mod render;
pub mod search;
pub mod store;
pub mod terms;

pub use analysis::{
    AnalysisError, AnalysisRequest, AnalysisService, AnalysisStatus, IngestFlow,
    MAX_DOCUMENT_BYTES,
};
pub use capture::{
    attribute_section, AnchorPoint, BoundingRect, CaptureState, RawSelection, SectionNode,
    SelectionCandidate, SelectionCapture, SelectionProvider, MIN_SELECTION_CHARS,
};
pub use export::{export_notebook, NotebookExport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::analysis::{FigureDetail, MethodDetail, MethodologyAnalysis, PaperAnalysis};
pub use model::folder::{default_folder_id, Folder, FolderId, DEFAULT_FOLDER_NAME};
pub use model::highlight::{Highlight, HighlightId, GENERAL_SECTION};
pub use model::paper::{Paper, PaperId};
pub use persist::{
    load_library, Partition, PersistenceAdapter, PersistenceStatusHandle, SnapshotStorage,
    SqliteSnapshotStorage, StorageError,
};
pub use render::{
    check_page_bounds, PageRenderer, RenderError, RenderedPage, DEFAULT_RENDER_SCALE,
};
pub use search::{filter_highlights, filter_papers, FolderScope, PaperFilter};
pub use store::{LibraryStore, PartitionSnapshot, StoreObserver};
pub use terms::{mark_terms, MethodologyLevel, ProseSpan, TermPopover};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
