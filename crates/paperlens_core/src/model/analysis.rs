//! Structured analysis payload returned by the external AI service.
//!
//! # Responsibility
//! - Mirror the response schema of the analysis call so the library can
//!   store and render it without re-validation.
//!
//! # Invariants
//! - All list fields preserve the order the service generated them in.
//! - `FigureDetail::page_number` is 1-based.

use serde::{Deserialize, Serialize};

/// One technical method surfaced by the analysis for interactive lookup.
///
/// `name` is the short form that appears inline in prose (e.g. `"PLSR"`),
/// `full_name` the expansion, `description` the explanation shown when the
/// term is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDetail {
    pub name: String,
    pub full_name: String,
    pub description: String,
}

/// One figure or table the analysis located in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureDetail {
    /// Display label, e.g. `"Figure 1"` or `"Table 2"`.
    pub label: String,
    /// Caption text found under the figure.
    pub caption: String,
    /// Generated explanation of what the figure shows.
    pub description: String,
    /// 1-based page the figure appears on.
    pub page_number: u32,
}

/// Three-depth methodology narrative plus the method glossary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodologyAnalysis {
    /// Conceptual explanation for a layperson.
    pub level_1_concept: String,
    /// Standard technical workflow summary.
    pub level_2_process: String,
    /// Deep dive into models, algorithms and experimental nuance.
    pub level_3_technical: String,
    /// Methods mentioned in the narratives, for inline term lookup.
    pub key_methods: Vec<MethodDetail>,
}

/// Complete structured analysis for one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperAnalysis {
    pub title_en: String,
    pub title_cn: String,
    pub authors: Vec<String>,
    pub keywords: Vec<String>,
    pub summary_cn: String,
    pub conclusions: Vec<String>,
    pub methodology: MethodologyAnalysis,
    pub figures: Vec<FigureDetail>,
}

impl PaperAnalysis {
    /// Returns the title used everywhere a single display string is needed.
    ///
    /// Prefers the translated title and falls back to the original-language
    /// title when the translation is blank.
    pub fn display_title(&self) -> &str {
        if self.title_cn.trim().is_empty() {
            &self.title_en
        } else {
            &self.title_cn
        }
    }
}
