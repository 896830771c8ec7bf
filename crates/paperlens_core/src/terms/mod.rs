//! Interactive term highlighting inside generated methodology prose.
//!
//! # Responsibility
//! - Scan a narrative for known method short names and split it into
//!   alternating plain and term spans, in source order.
//! - Track the methodology depth level and the single open term popover.
//!
//! # Invariants
//! - Concatenating the text of all spans reproduces the input exactly.
//! - Overlapping term names resolve longest-first: with `PLS` and `PLSR`
//!   in the glossary, `PLSR` in prose is one `PLSR` span, never `PLS`
//!   plus a stray `R`.
//! - An empty glossary makes the scan the identity transform.
//! - At most one glossary entry is shown per prose body.

use crate::model::analysis::{MethodDetail, MethodologyAnalysis};
use log::warn;
use regex::Regex;

/// One span of scanned prose.
#[derive(Debug, Clone, PartialEq)]
pub enum ProseSpan<'a> {
    /// Pass-through text, whitespace and punctuation preserved exactly.
    Plain(&'a str),
    /// A glossary term mention rendered as an interactive unit.
    Term {
        /// The matched text as it appears in prose (original casing).
        text: &'a str,
        /// The resolved glossary entry.
        method: &'a MethodDetail,
    },
}

impl ProseSpan<'_> {
    /// The source text this span covers.
    pub fn text(&self) -> &str {
        match self {
            ProseSpan::Plain(text) => text,
            ProseSpan::Term { text, .. } => text,
        }
    }
}

/// Splits `prose` into plain and term spans against the method glossary.
///
/// Builds a single case-insensitive alternation over all short names,
/// longest name first so overlapping alternatives resolve leftmost-longest,
/// and scans the input text once left to right, so matches can never land
/// inside an already-consumed span. Word boundaries are ASCII (`(?-u:\b)`)
/// so an acronym embedded directly in CJK prose still matches; the Unicode
/// default would treat the surrounding ideographs as word characters and
/// suppress the boundary.
pub fn mark_terms<'a>(prose: &'a str, methods: &'a [MethodDetail]) -> Vec<ProseSpan<'a>> {
    let Some(pattern) = term_pattern(methods) else {
        return vec![ProseSpan::Plain(prose)];
    };

    let mut spans = Vec::new();
    let mut cursor = 0usize;
    for found in pattern.find_iter(prose) {
        if found.start() > cursor {
            spans.push(ProseSpan::Plain(&prose[cursor..found.start()]));
        }

        let text = found.as_str();
        match resolve_method(methods, text) {
            Some(method) => spans.push(ProseSpan::Term { text, method }),
            // Unreachable for patterns built from the same glossary; keep
            // the text flowing rather than dropping it.
            None => spans.push(ProseSpan::Plain(text)),
        }
        cursor = found.end();
    }

    if cursor < prose.len() || spans.is_empty() {
        spans.push(ProseSpan::Plain(&prose[cursor..]));
    }
    spans
}

/// Resolves a matched token to its glossary entry by case-insensitive
/// equality against the short name.
fn resolve_method<'a>(methods: &'a [MethodDetail], text: &str) -> Option<&'a MethodDetail> {
    let lowered = text.to_lowercase();
    methods
        .iter()
        .find(|method| method.name.to_lowercase() == lowered)
}

/// Builds the combined alternation, or `None` when no usable names exist.
fn term_pattern(methods: &[MethodDetail]) -> Option<Regex> {
    let mut names: Vec<&str> = methods
        .iter()
        .map(|method| method.name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }

    // Longest first; stable sort keeps glossary order among equal lengths.
    names.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternatives = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let source = format!(r"(?i)(?-u:\b)(?:{alternatives})(?-u:\b)");

    match Regex::new(&source) {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            warn!("event=term_pattern module=terms status=error error={err}");
            None
        }
    }
}

/// Methodology narrative depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodologyLevel {
    /// Simplified conceptual explanation.
    Concept,
    /// Technical workflow summary.
    Process,
    /// Math and nuance deep dive; the reader opens here.
    #[default]
    Technical,
}

impl MethodologyLevel {
    pub const ALL: [MethodologyLevel; 3] = [
        MethodologyLevel::Concept,
        MethodologyLevel::Process,
        MethodologyLevel::Technical,
    ];

    /// The narrative body this level selects.
    pub fn narrative<'a>(self, methodology: &'a MethodologyAnalysis) -> &'a str {
        match self {
            MethodologyLevel::Concept => &methodology.level_1_concept,
            MethodologyLevel::Process => &methodology.level_2_process,
            MethodologyLevel::Technical => &methodology.level_3_technical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MethodologyLevel::Concept => "Concept",
            MethodologyLevel::Process => "Process",
            MethodologyLevel::Technical => "Deep Dive",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            MethodologyLevel::Concept => "Simplified logic",
            MethodologyLevel::Process => "Technical workflow",
            MethodologyLevel::Technical => "Math & nuance",
        }
    }
}

/// The single term-detail popover for one prose body.
///
/// Selecting a term replaces the shown entry; dismissing clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermPopover {
    selected: Option<MethodDetail>,
}

impl TermPopover {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, method: &MethodDetail) {
        self.selected = Some(method.clone());
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&MethodDetail> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}
