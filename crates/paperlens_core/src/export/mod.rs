//! Notebook export: serialize a filtered highlight set into a portable
//! document.
//!
//! # Responsibility
//! - Produce a single self-contained HTML document (Word opens it) with
//!   one entry per highlight, in input order.
//! - Name the artifact with the generation date.
//!
//! # Invariants
//! - An empty input produces no artifact (`None`); the caller suppresses
//!   the export action.
//! - The document references no external resources.
//! - User text is minimally HTML-escaped so markup in a note cannot break
//!   the document; plain text round-trips verbatim.

use crate::model::highlight::Highlight;
use chrono::DateTime;
use std::fmt::Write as _;

/// A generated export artifact ready to hand to the download layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookExport {
    /// Suggested download file name, dated with the generation day.
    pub file_name: String,
    /// Complete document markup.
    pub html: String,
}

/// Serializes `highlights` into a notebook document.
///
/// `generated_at_ms` stamps both the header line and the file name.
/// Returns `None` when the input is empty.
pub fn export_notebook(highlights: &[&Highlight], generated_at_ms: i64) -> Option<NotebookExport> {
    if highlights.is_empty() {
        return None;
    }

    let generated_on = format_date(generated_at_ms);
    let mut body = String::new();
    for highlight in highlights {
        // write! to a String cannot fail; ignore the Result.
        let _ = write!(
            body,
            concat!(
                "<div style=\"margin-bottom: 20px; border-bottom: 1px solid #ccc; ",
                "padding-bottom: 10px;\">\n",
                "<h3>Paper: {title}</h3>\n",
                "<p><strong>Section:</strong> {section}</p>\n",
                "<p><strong>Highlight:</strong> <em>\"{text}\"</em></p>\n",
                "<p><strong>Note:</strong> {note}</p>\n",
                "<p style=\"color: #666; font-size: 0.8em;\">Date: {date}</p>\n",
                "</div>\n"
            ),
            title = escape_html(&highlight.paper_title),
            section = escape_html(&highlight.section),
            text = escape_html(&highlight.text),
            note = escape_html(&highlight.note),
            date = format_date(highlight.created_at),
        );
    }

    let html = format!(
        concat!(
            "<html>\n<head><meta charset=\"utf-8\"><title>PaperLens Export</title></head>\n",
            "<body>\n",
            "<h1>PaperLens Notebook Export</h1>\n",
            "<p>Generated on {generated_on}</p>\n",
            "<hr/>\n",
            "{body}",
            "</body>\n</html>\n"
        ),
        generated_on = generated_on,
        body = body,
    );

    Some(NotebookExport {
        file_name: format!("PaperLens_Notebook_{generated_on}.doc"),
        html,
    })
}

/// Formats an epoch-millisecond timestamp as an ISO calendar date.
fn format_date(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(moment) => moment.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

/// Escapes the characters that would change the document structure.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
