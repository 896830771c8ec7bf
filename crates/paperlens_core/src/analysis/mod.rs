//! Boundary to the external AI analysis service, plus the upload flow
//! that turns a successful analysis into a stored paper.
//!
//! # Responsibility
//! - Define the request contract and validate it (document size cap)
//!   before any call is attempted.
//! - Model the analysis status state machine the presentation layer
//!   renders (`Idle -> Uploading -> Analyzing -> Complete | Error`).
//!
//! # Invariants
//! - The service is a black box: one call, one complete structured result
//!   or one failure. No partial or streaming results are modeled, and
//!   failures are never retried automatically.
//! - A failed analysis mutates nothing in the store.

use crate::model::analysis::PaperAnalysis;
use crate::model::paper::PaperId;
use crate::store::LibraryStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Documents above this size are rejected before the call (20 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// One analysis request: the raw document and its mime type.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub document: &'a [u8],
    pub mime_type: &'a str,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure modes of the analysis boundary.
#[derive(Debug)]
pub enum AnalysisError {
    /// Rejected locally before the call; the limit is in bytes.
    DocumentTooLarge { size: usize, limit: usize },
    /// The external call failed or returned nothing usable.
    ServiceFailure(String),
    /// The service responded, but the payload did not match the schema.
    InvalidResponse(String),
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentTooLarge { size, limit } => {
                write!(f, "document of {size} bytes exceeds the {limit} byte limit")
            }
            Self::ServiceFailure(message) => write!(f, "analysis service failure: {message}"),
            Self::InvalidResponse(message) => write!(f, "invalid analysis response: {message}"),
        }
    }
}

impl Error for AnalysisError {}

/// Rejects oversized documents before any upload work happens.
pub fn validate_document(request: &AnalysisRequest<'_>) -> AnalysisResult<()> {
    if request.document.len() > MAX_DOCUMENT_BYTES {
        return Err(AnalysisError::DocumentTooLarge {
            size: request.document.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

/// The external analysis collaborator.
///
/// Implementations wrap whatever backend produces the structured payload;
/// the engine only depends on this contract.
pub trait AnalysisService {
    fn analyze(&self, request: &AnalysisRequest<'_>) -> AnalysisResult<PaperAnalysis>;
}

/// Upload/analysis progress the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Complete,
    Error,
}

/// Orchestrates one document upload end to end.
#[derive(Debug, Default)]
pub struct IngestFlow {
    status: AnalysisStatus,
    last_error: Option<String>,
}

impl IngestFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    /// User-visible message for the most recent failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns to `Idle`, e.g. when the user re-opens the upload view.
    pub fn reset(&mut self) {
        self.status = AnalysisStatus::Idle;
        self.last_error = None;
    }

    /// Validates, analyzes and stores one document.
    ///
    /// On success the paper lands in the default folder (the user files it
    /// later) and the new id is returned. On failure the status becomes
    /// `Error`, the message is kept for display, and the store is
    /// untouched; the user must re-initiate the upload.
    pub fn ingest(
        &mut self,
        store: &mut LibraryStore,
        service: &dyn AnalysisService,
        document: &[u8],
        mime_type: &str,
    ) -> AnalysisResult<PaperId> {
        let request = AnalysisRequest {
            document,
            mime_type,
        };

        self.last_error = None;
        self.status = AnalysisStatus::Uploading;
        if let Err(err) = validate_document(&request) {
            self.fail(&err);
            return Err(err);
        }

        self.status = AnalysisStatus::Analyzing;
        info!(
            "event=analysis_request module=analysis size={} mime={}",
            document.len(),
            mime_type
        );
        match service.analyze(&request) {
            Ok(analysis) => {
                let paper_id = store.create_paper(analysis, None);
                self.status = AnalysisStatus::Complete;
                info!("event=analysis_complete module=analysis paper={paper_id}");
                Ok(paper_id)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&mut self, err: &AnalysisError) {
        warn!("event=analysis_failed module=analysis error={err}");
        self.status = AnalysisStatus::Error;
        self.last_error = Some(err.to_string());
    }
}
