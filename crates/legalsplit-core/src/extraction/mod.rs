pub mod pdftotext;

use crate::error::SplitError;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// 1-based page number within the source PDF.
    pub page_number: usize,
    /// Raw page text. Empty when the page has no extractable text.
    pub text: String,
}

impl PageContent {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        PageContent {
            page_number,
            text: text.into(),
        }
    }
}

/// Trait for PDF text extraction backends.
///
/// Implementations must return one entry per page, in page order. Pages
/// without a text layer come back as empty strings, never as errors.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SplitError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Extract page texts and line them up with the PDF's real page count.
///
/// Text backends occasionally report fewer pages than the document holds
/// (trailing blank pages). Missing pages are padded with empty text so every
/// PDF page is scanned; surplus entries are dropped.
pub fn extract_page_texts(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    page_count: Option<usize>,
) -> Result<Vec<String>, SplitError> {
    let mut texts: Vec<String> = extractor
        .extract_pages(pdf_bytes)?
        .into_iter()
        .map(|p| p.text)
        .collect();

    if let Some(expected) = page_count {
        if texts.len() != expected {
            tracing::debug!(
                backend = extractor.backend_name(),
                extracted = texts.len(),
                expected,
                "reconciling extracted page count"
            );
            texts.resize(expected, String::new());
        }
    }

    Ok(texts)
}
