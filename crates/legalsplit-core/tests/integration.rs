//! Integration tests for the analyze -> name -> write pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, and a MockWriter that records page ranges instead of
//! writing PDFs, so these tests run without poppler-utils.

use legalsplit_core::error::SplitError;
use legalsplit_core::extraction::{PageContent, PdfExtractor};
use legalsplit_core::model::{SingleReason, SplitOutcome};
use legalsplit_core::patterns::builtin::load_preset;
use legalsplit_core::patterns::parse_patterns_str;
use legalsplit_core::patterns::PatternSet;
use legalsplit_core::split::{write_outputs, PdfWriter, WriteResult};
use legalsplit_core::trace::BoundaryMethod;
use legalsplit_core::{analyze_pages, analyze_pdf};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl MockExtractor {
    fn new(texts: &[String]) -> Self {
        MockExtractor {
            pages: texts
                .iter()
                .enumerate()
                .map(|(i, t)| PageContent::new(i + 1, t.clone()))
                .collect(),
        }
    }
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SplitError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MockWriter {
    pages: usize,
    fail_files: Vec<&'static str>,
    written: Mutex<Vec<(usize, usize, PathBuf)>>,
}

impl MockWriter {
    fn new(pages: usize) -> Self {
        MockWriter {
            pages,
            fail_files: Vec::new(),
            written: Mutex::new(Vec::new()),
        }
    }
}

impl PdfWriter for MockWriter {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn write_subset(&self, start: usize, end: usize, output: &Path) -> Result<(), SplitError> {
        let name = output.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail_files.contains(&name.as_str()) {
            return Err(SplitError::Write {
                path: output.to_path_buf(),
                reason: "permission denied".into(),
            });
        }
        std::fs::write(output, format!("{start}-{end}"))?;
        self.written
            .lock()
            .unwrap()
            .push((start, end, output.to_path_buf()));
        Ok(())
    }
}

const BODY: &str = "The undersigned, being duly sworn, deposes and says that the \
                    facts stated herein are true and correct to the best of knowledge.";

fn body(top: &str, bottom: &str) -> String {
    format!("{top}\n\n{BODY}\n{BODY}\n\n{bottom}")
}

fn legal() -> PatternSet {
    load_preset("legal").unwrap()
}

/// Every page covered exactly once, in order, with no gaps.
fn assert_partition(outcome: &SplitOutcome) {
    let docs = outcome.documents().expect("split outcome");
    assert!(docs.len() >= 2);
    assert_eq!(docs[0].start_page, 0);
    for pair in docs.windows(2) {
        assert_eq!(pair[1].start_page, pair[0].end_page + 1);
    }
    assert_eq!(docs.last().unwrap().end_page, outcome.total_pages() - 1);
    for d in docs {
        assert!(d.start_page <= d.end_page);
    }
}

// ---------------------------------------------------------------------------
// Method 1: "Page X of Y"
// ---------------------------------------------------------------------------
#[test]
fn page_of_numbering_splits_at_last_page() {
    let pages = vec![
        body("SEARCH WARRANT", "Page 1 of 2"),
        body("", "Page 2 of 2"),
        body("AFFIDAVIT IN SUPPORT OF WARRANT", "Page 1 of 3"),
        body("", "Page 2 of 3"),
        body("", "Page 3 of 3"),
    ];
    let outcome = analyze_pages(&pages, &legal()).outcome;

    assert_partition(&outcome);
    let docs = outcome.documents().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!((docs[0].start_page, docs[0].end_page), (0, 1));
    assert_eq!((docs[1].start_page, docs[1].end_page), (2, 4));
}

#[test]
fn ocr_damaged_page_of_still_detected() {
    let pages = vec![
        body("NOTICE TO APPEAR", "PAEG 1 OF 1"),
        body("RETURN OF SERVICE", "PA GE 1 OF 1"),
    ];
    let analysis = analyze_pages(&pages, &legal());
    let methods: Vec<_> = analysis
        .events
        .iter()
        .filter_map(|e| e.boundary_method())
        .collect();
    assert_eq!(methods, vec![BoundaryMethod::PageOf, BoundaryMethod::PageOf]);
}

// ---------------------------------------------------------------------------
// Method 2: standalone page number reset
// ---------------------------------------------------------------------------
#[test]
fn standalone_number_reset_starts_new_document() {
    let pages = vec![
        body("", "Page 1"),
        body("", "Page 2"),
        body("", "Page 3"),
        body("", "- 1 -"),
        body("", "- 2 -"),
    ];
    let outcome = analyze_pages(&pages, &legal()).outcome;

    assert_partition(&outcome);
    let docs = outcome.documents().unwrap();
    assert_eq!((docs[0].start_page, docs[0].end_page), (0, 2));
    assert_eq!((docs[1].start_page, docs[1].end_page), (3, 4));
}

// ---------------------------------------------------------------------------
// Method 3: header type change
// ---------------------------------------------------------------------------
#[test]
fn header_change_splits_and_titles_documents() {
    let pages = vec![
        body("AFFIDAVIT", ""),
        body("AFFIDAVIT", ""),
        body("SEARCH WARRANT", ""),
        body("SUBPOENA", ""),
    ];
    let outcome = analyze_pages(&pages, &legal()).outcome;

    assert_partition(&outcome);
    let docs = outcome.documents().unwrap();
    let ranges: Vec<_> = docs.iter().map(|d| (d.start_page, d.end_page)).collect();
    assert_eq!(ranges, vec![(0, 1), (2, 2), (3, 3)]);
}

#[test]
fn mixed_methods_cover_every_page() {
    let pages = vec![
        body("AFFIDAVIT", "Page 1 of 2"),
        body("", "Page 2 of 2"),
        body("SEARCH WARRANT", "Page 1"),
        body("", "Page 2"),
        body("", "Page 1"),
        body("SUBPOENA DUCES TECUM", ""),
        String::new(),
    ];
    let analysis = analyze_pages(&pages, &legal());
    assert_partition(&analysis.outcome);
    assert_eq!(analysis.outcome.total_pages(), 7);
}

// ---------------------------------------------------------------------------
// Low-text pages
// ---------------------------------------------------------------------------
#[test]
fn low_text_pages_counted_per_document() {
    let pages = vec![
        body("AFFIDAVIT", "Page 1 of 3"),
        "   \n".to_string(),
        body("", "Page 3 of 3"),
        body("RETURN OF SERVICE", "Page 1 of 1"),
    ];
    let outcome = analyze_pages(&pages, &legal()).outcome;
    let docs = outcome.documents().unwrap();

    assert_eq!(docs[0].no_ocr_page_count, 1);
    assert!(docs[0].has_no_ocr_pages);
    assert_eq!(docs[1].no_ocr_page_count, 0);
    assert!(!docs[1].has_no_ocr_pages);
}

#[test]
fn all_blank_pdf_is_single() {
    let pages = vec![String::new(); 3];
    let outcome = analyze_pages(&pages, &legal()).outcome;
    assert_eq!(
        outcome,
        SplitOutcome::Single {
            total_pages: 3,
            reason: SingleReason::NoBoundaryFound
        }
    );
}

// ---------------------------------------------------------------------------
// Degenerate results
// ---------------------------------------------------------------------------
#[test]
fn one_complete_document_is_degenerate() {
    let pages = vec![
        body("MOTION TO SUPPRESS", "Page 1 of 2"),
        body("", "Page 2 of 2"),
    ];
    let outcome = analyze_pages(&pages, &legal()).outcome;
    assert_eq!(
        outcome,
        SplitOutcome::Single {
            total_pages: 2,
            reason: SingleReason::DegenerateSplit
        }
    );
}

#[test]
fn custom_table_without_headers_ignores_keywords() {
    let def = parse_patterns_str(
        r#"{
            "name": "numbers only",
            "version": "1",
            "page_of_patterns": ["PAGE\\s+(\\d+)\\s+OF\\s+(\\d+)"],
            "standalone_patterns": [],
            "header_types": [],
            "document_types": [],
            "case_patterns": []
        }"#,
    )
    .unwrap();
    let patterns = PatternSet::compile(&def).unwrap();
    let pages = vec![body("AFFIDAVIT", ""), body("SEARCH WARRANT", "")];
    assert!(!analyze_pages(&pages, &patterns).outcome.is_split());
}

// ---------------------------------------------------------------------------
// Full pipeline: extract -> analyze -> name -> write
// ---------------------------------------------------------------------------
#[test]
fn pipeline_names_and_writes_documents() {
    let texts = vec![
        body("SEARCH WARRANT TNT-72-24", "Page 1 of 1"),
        body("AFFIDAVIT FOR SEARCH WARRANT", "Page 1 of 2"),
        "Page 2 of 2".to_string(),
        body("SEARCH WARRANT", "Page 1 of 1"),
    ];
    let extractor = MockExtractor::new(&texts);
    let patterns = legal();

    let plan = analyze_pdf(&[], &extractor, Some(4), "discovery", &patterns).unwrap();
    let names: Vec<&str> = plan.outputs.iter().map(|o| o.filename.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "search_warrant_tnt-72-24_001.pdf",
            "No_OCR_search_warrant_001.pdf",
            "search_warrant_002.pdf",
        ]
    );

    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter::new(4);
    let report = write_outputs(&writer, &plan.outputs, dir.path()).unwrap();
    assert!(report.is_complete());

    let written = writer.written.lock().unwrap();
    let ranges: Vec<_> = written.iter().map(|(s, e, _)| (*s, *e)).collect();
    assert_eq!(ranges, vec![(0, 0), (1, 2), (3, 3)]);
}

#[test]
fn pipeline_pads_pages_missing_from_extraction() {
    let texts = vec![
        body("AFFIDAVIT", "Page 1 of 1"),
        body("ORDER", "Page 1 of 2"),
    ];
    let extractor = MockExtractor::new(&texts);
    let plan = analyze_pdf(&[], &extractor, Some(3), "x", &legal()).unwrap();

    assert_eq!(plan.outcome().total_pages(), 3);
    assert_partition(plan.outcome());
    let last = plan.outputs.last().unwrap();
    assert_eq!(last.document.end_page, 2);
    assert_eq!(last.document.no_ocr_page_count, 1);
}

#[test]
fn single_document_plans_no_outputs() {
    let texts = vec![body("Dear counsel,", ""), body("", "")];
    let plan = analyze_pdf(&[], &MockExtractor::new(&texts), None, "x", &legal()).unwrap();
    assert!(!plan.outcome().is_split());
    assert!(plan.outputs.is_empty());
}

#[test]
fn partial_write_failure_is_reported_not_fatal() {
    let texts = vec![
        body("AFFIDAVIT", "Page 1 of 1"),
        body("SUBPOENA", "Page 1 of 1"),
        body("ORDER", "Page 1 of 1"),
    ];
    let plan = analyze_pdf(&[], &MockExtractor::new(&texts), Some(3), "x", &legal()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut writer = MockWriter::new(3);
    writer.fail_files = vec!["subpoena_001.pdf"];
    let report = write_outputs(&writer, &plan.outputs, dir.path()).unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.written_count(), 2);
    assert!(matches!(
        &report.outputs[1].result,
        WriteResult::Failed { reason, .. } if reason.contains("permission denied")
    ));
    assert!(dir.path().join("order_001.pdf").exists());
}

#[test]
fn independent_files_restart_counters() {
    let texts = vec![
        body("AFFIDAVIT", "Page 1 of 1"),
        body("AFFIDAVIT", "Page 1 of 1"),
    ];
    let patterns = legal();
    let first = analyze_pdf(&[], &MockExtractor::new(&texts), None, "a", &patterns).unwrap();
    let second = analyze_pdf(&[], &MockExtractor::new(&texts), None, "b", &patterns).unwrap();

    assert_eq!(first.outputs[0].filename, "affidavit_001.pdf");
    assert_eq!(second.outputs[0].filename, "affidavit_001.pdf");
    assert_eq!(second.outputs[1].filename, "affidavit_002.pdf");
}

#[test]
fn output_filenames_are_unique_within_a_file() {
    let headers = [
        "SEARCH WARRANT",
        "AFFIDAVIT",
        "SEARCH WARRANT",
        "EXHIBIT A",
        "AFFIDAVIT",
        "SEARCH WARRANT",
    ];
    let texts: Vec<String> = headers
        .iter()
        .map(|h| body(h, "Page 1 of 1"))
        .collect();
    let plan = analyze_pdf(&[], &MockExtractor::new(&texts), None, "x", &legal()).unwrap();

    let unique: HashSet<&str> = plan.outputs.iter().map(|o| o.filename.as_str()).collect();
    assert_eq!(unique.len(), plan.outputs.len());
    assert_eq!(plan.outputs.len(), 6);
}
