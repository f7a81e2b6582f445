use serde::{Deserialize, Serialize};
use std::fmt;

/// Which detection method produced a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMethod {
    /// "Page X of X" marks the last page of a document.
    PageOf,
    /// A standalone page number dropped back to 1.
    StandaloneReset,
    /// The header document type changed.
    HeaderChange,
}

impl fmt::Display for BoundaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryMethod::PageOf => write!(f, "page-of"),
            BoundaryMethod::StandaloneReset => write!(f, "page-reset"),
            BoundaryMethod::HeaderChange => write!(f, "header-change"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanEventKind {
    /// Page text below the minimum length.
    LowText,
    /// Page `current` of `total` closed the open document on this page.
    PageOfClose { current: u32, total: u32 },
    /// Numbering went from `previous` back to 1; a document starts here.
    StandaloneReset { previous: u32 },
    /// Header type changed; a document starts here.
    HeaderChange { from: String, to: String },
}

/// Something noteworthy the scanner decided on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub page_index: usize,
    #[serde(flatten)]
    pub kind: ScanEventKind,
}

impl ScanEvent {
    pub fn boundary_method(&self) -> Option<BoundaryMethod> {
        match self.kind {
            ScanEventKind::LowText => None,
            ScanEventKind::PageOfClose { .. } => Some(BoundaryMethod::PageOf),
            ScanEventKind::StandaloneReset { .. } => Some(BoundaryMethod::StandaloneReset),
            ScanEventKind::HeaderChange { .. } => Some(BoundaryMethod::HeaderChange),
        }
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page_index + 1;
        match &self.kind {
            ScanEventKind::LowText => write!(f, "page {page}: no OCR text"),
            ScanEventKind::PageOfClose { current, total } => {
                write!(f, "page {page}: document ends (page {current} of {total})")
            }
            ScanEventKind::StandaloneReset { previous } => {
                write!(f, "page {page}: new document (page {previous} -> 1)")
            }
            ScanEventKind::HeaderChange { from, to } => {
                write!(f, "page {page}: new document (header {from} -> {to})")
            }
        }
    }
}
