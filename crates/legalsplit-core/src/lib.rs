pub mod checkpoint;
pub mod detect;
pub mod error;
pub mod extraction;
pub mod model;
pub mod naming;
pub mod patterns;
pub mod split;
pub mod trace;

use detect::{Analysis, BoundaryDetector};
use error::SplitError;
use extraction::PdfExtractor;
use model::{NamedOutput, SplitOutcome};
use naming::NamingResolver;
use patterns::PatternSet;

/// Analysis of one PDF together with the files it would be split into.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub analysis: Analysis,
    /// Empty when the PDF is a single document.
    pub outputs: Vec<NamedOutput>,
}

impl SplitPlan {
    pub fn outcome(&self) -> &SplitOutcome {
        &self.analysis.outcome
    }
}

/// Detect document boundaries in already-extracted page texts.
pub fn analyze_pages<S: AsRef<str>>(pages: &[S], patterns: &PatternSet) -> Analysis {
    BoundaryDetector::new(patterns).analyze(pages)
}

/// Name the documents of a split outcome. A single-document outcome has
/// nothing to write and yields no outputs.
pub fn plan_outputs<S: AsRef<str>>(
    outcome: &SplitOutcome,
    pages: &[S],
    base_name: &str,
    patterns: &PatternSet,
) -> Vec<NamedOutput> {
    match outcome.documents() {
        Some(documents) => {
            NamingResolver::new(patterns).resolve_with_pages(documents, base_name, pages)
        }
        None => Vec::new(),
    }
}

/// Main API entry point: extract page text, detect boundaries and name the
/// resulting documents.
///
/// `page_count` is the PDF's real page count when known (from the writer);
/// extracted text is padded or truncated to match it.
pub fn analyze_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    page_count: Option<usize>,
    base_name: &str,
    patterns: &PatternSet,
) -> Result<SplitPlan, SplitError> {
    let pages = extraction::extract_page_texts(pdf_bytes, extractor, page_count)?;
    let analysis = analyze_pages(&pages, patterns);
    let outputs = plan_outputs(&analysis.outcome, &pages, base_name, patterns);

    tracing::info!(
        file = base_name,
        pages = pages.len(),
        documents = analysis.outcome.documents().map_or(1, <[_]>::len),
        split = analysis.outcome.is_split(),
        "analyzed"
    );

    Ok(SplitPlan { analysis, outputs })
}
