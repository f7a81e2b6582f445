use serde::{Deserialize, Serialize};
use std::fmt;

/// What the matchers found on one page. Produced per page while scanning
/// and dropped once the page has been folded into the scan state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageObservation {
    pub page_index: usize,
    pub is_low_text: bool,
    /// `(current, total)` from "Page X of Y" numbering.
    pub page_of: Option<(u32, u32)>,
    /// Standalone page number ("Page N", "- N -").
    pub standalone: Option<u32>,
    /// Most specific header keyword found at the top of the page.
    pub header_type: Option<String>,
    /// Plausible title line, if any.
    pub title: Option<String>,
}

/// One detected logical document: a contiguous, inclusive range of
/// zero-based PDF page indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub start_page: usize,
    pub end_page: usize,
    #[serde(default)]
    pub title: Option<String>,
    pub has_no_ocr_pages: bool,
    pub no_ocr_page_count: usize,
}

impl DocumentDescriptor {
    pub fn page_count(&self) -> usize {
        self.end_page - self.start_page + 1
    }

    /// 1-based, human-readable page range ("3-7").
    pub fn display_range(&self) -> String {
        format!("{}-{}", self.start_page + 1, self.end_page + 1)
    }
}

/// Why a PDF was left as a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleReason {
    /// No method found any boundary.
    NoBoundaryFound,
    /// Boundaries were found but collapsed into one span.
    DegenerateSplit,
}

impl fmt::Display for SingleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingleReason::NoBoundaryFound => write!(f, "no document boundaries detected"),
            SingleReason::DegenerateSplit => {
                write!(f, "boundaries collapse to a single document")
            }
        }
    }
}

/// Result of scanning one PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SplitOutcome {
    /// The input is one document; nothing to write.
    Single {
        total_pages: usize,
        reason: SingleReason,
    },
    /// Two or more documents covering every page exactly once.
    Split {
        total_pages: usize,
        documents: Vec<DocumentDescriptor>,
    },
}

impl SplitOutcome {
    pub fn documents(&self) -> Option<&[DocumentDescriptor]> {
        match self {
            SplitOutcome::Single { .. } => None,
            SplitOutcome::Split { documents, .. } => Some(documents),
        }
    }

    pub fn total_pages(&self) -> usize {
        match self {
            SplitOutcome::Single { total_pages, .. } | SplitOutcome::Split { total_pages, .. } => {
                *total_pages
            }
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, SplitOutcome::Split { .. })
    }
}

/// A descriptor with its resolved output identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOutput {
    /// Position of the document within its source PDF (0-based).
    pub index: usize,
    pub type_slug: String,
    /// 1-based counter, independent per `type_slug`.
    pub per_type_sequence: usize,
    pub filename: String,
    pub document: DocumentDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_ranges() {
        let d = DocumentDescriptor {
            start_page: 4,
            end_page: 6,
            title: None,
            has_no_ocr_pages: false,
            no_ocr_page_count: 0,
        };
        assert_eq!(d.page_count(), 3);
        assert_eq!(d.display_range(), "5-7");
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = SplitOutcome::Single {
            total_pages: 3,
            reason: SingleReason::NoBoundaryFound,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "single");
        assert_eq!(json["reason"], "no_boundary_found");
        assert!(outcome.documents().is_none());
    }
}
