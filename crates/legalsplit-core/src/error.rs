use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("could not read PDF {path}: {reason}")]
    PdfLoad { path: PathBuf, reason: String },

    #[error("failed to load pattern table from {path}: {reason}")]
    PatternLoad { path: PathBuf, reason: String },

    #[error("invalid pattern table: {0}")]
    PatternInvalid(String),

    #[error("failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    #[error("scan cancelled at page {page}")]
    Cancelled { page: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
