//! Result types returned by the conversion entry points.

use crate::error::ReferenceWarning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of converting one Markdown file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the converted document was written.
    pub output_path: PathBuf,
    /// Name of the encoding used for both reading and writing.
    pub encoding: String,
    /// Every image reference found, in document order (Markdown syntax first).
    pub images: Vec<ImageReference>,
    /// Non-fatal problems; the conversion still succeeded.
    pub warnings: Vec<ReferenceWarning>,
    pub stats: ConversionStats,
}

/// Result of the in-memory text pipeline (no file I/O).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedMarkdown {
    pub markdown: String,
    pub images: Vec<ImageReference>,
    pub warnings: Vec<ReferenceWarning>,
    pub formulas_rewritten: usize,
}

/// Counters for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub images_rewritten: usize,
    pub images_missing: usize,
    /// References that already pointed at an `http(s)` URL.
    pub images_remote: usize,
    pub formulas_rewritten: usize,
    pub total_duration_ms: u64,
}

impl ConversionStats {
    pub(crate) fn from_transform(t: &TransformedMarkdown, total_duration_ms: u64) -> Self {
        let count = |f: fn(&ReferenceOutcome) -> bool| {
            t.images.iter().filter(|r| f(&r.outcome)).count()
        };
        Self {
            images_rewritten: count(|o| matches!(o, ReferenceOutcome::Rewritten { .. })),
            images_missing: count(|o| {
                matches!(o, ReferenceOutcome::Missing | ReferenceOutcome::EmptyPath)
            }),
            images_remote: count(|o| matches!(o, ReferenceOutcome::Remote)),
            formulas_rewritten: t.formulas_rewritten,
            total_duration_ms,
        }
    }
}

/// Which surface syntax an image reference was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSyntax {
    /// `![alt](path)`
    Markdown,
    /// `<img src="path" …>`
    HtmlTag,
}

/// One image reference found in the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub syntax: ImageSyntax,
    /// Alt text; `None` for the HTML tag syntax.
    pub alt: Option<String>,
    /// The path exactly as written in the document.
    pub path: String,
    /// Source directory joined with the path (leading `./` removed).
    pub local_path: Option<PathBuf>,
    pub outcome: ReferenceOutcome,
}

impl ImageReference {
    /// Published URL, when the reference was rewritten.
    pub fn url(&self) -> Option<&str> {
        match &self.outcome {
            ReferenceOutcome::Rewritten { url } => Some(url),
            _ => None,
        }
    }
}

/// What happened to an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceOutcome {
    /// The local file exists; the reference now points at `url`.
    Rewritten { url: String },
    /// No file at the resolved local path; left unchanged.
    Missing,
    /// Already an `http(s)` URL; left unchanged.
    Remote,
    /// Empty path; left unchanged.
    EmptyPath,
}
