use legalsplit_core::checkpoint::{checkpoint_path, scan_with_checkpoints, CheckpointOptions};
use legalsplit_core::detect::{Analysis, BoundaryDetector};
use legalsplit_core::error::SplitError;
use legalsplit_core::extraction::extract_page_texts;
use legalsplit_core::extraction::pdftotext::PdftotextExtractor;
use legalsplit_core::model::NamedOutput;
use legalsplit_core::patterns::PatternSet;
use legalsplit_core::plan_outputs;
use legalsplit_core::split::{write_outputs, LopdfWriter, PdfWriter, SplitReport};
use std::path::{Path, PathBuf};

use crate::commands::load_pattern_set;
use crate::output;
use crate::PatternArgs;

#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub delete_original: bool,
    pub resume: bool,
    pub checkpoint_interval: usize,
}

/// Everything that happened to one input file.
#[derive(Debug)]
pub struct FileSummary {
    pub pdf_file: PathBuf,
    pub output_dir: PathBuf,
    pub analysis: Analysis,
    pub outputs: Vec<NamedOutput>,
    /// `None` for single documents and dry runs.
    pub report: Option<SplitReport>,
    pub deleted_original: bool,
}

impl FileSummary {
    /// True unless some planned document failed to write.
    pub fn is_complete(&self) -> bool {
        self.report.as_ref().map_or(true, SplitReport::is_complete)
    }

    pub fn files_created(&self) -> usize {
        self.report.as_ref().map_or(0, SplitReport::written_count)
    }
}

pub fn run(
    pdf_file: &Path,
    options: &SplitOptions,
    pattern_args: &PatternArgs,
    output_format: &str,
) -> Result<i32, SplitError> {
    let patterns = load_pattern_set(pattern_args)?;
    let summary = process_file(pdf_file, options, &patterns)?;

    match output_format {
        "json" => output::json::print_summary(&summary)?,
        _ => output::table::print_summary(&summary, options.dry_run),
    }

    Ok(if summary.is_complete() { 0 } else { 1 })
}

/// Analyze one PDF and, unless this is a dry run, write its documents.
pub fn process_file(
    pdf_file: &Path,
    options: &SplitOptions,
    patterns: &PatternSet,
) -> Result<FileSummary, SplitError> {
    check_input(pdf_file)?;

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(pdf_file));
    if !options.dry_run {
        std::fs::create_dir_all(&output_dir)?;
    }

    let writer = LopdfWriter::open(pdf_file)?;
    let pdf_bytes = std::fs::read(pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let pages = extract_page_texts(&pdf_bytes, &extractor, Some(writer.page_count()))?;

    let detector = BoundaryDetector::new(patterns);
    let checkpoint = CheckpointOptions {
        path: checkpoint_path(pdf_file, &output_dir),
        interval: options.checkpoint_interval,
        resume: options.resume,
        read_only: options.dry_run,
    };
    let analysis = scan_with_checkpoints(&detector, &pages, pdf_file, &checkpoint, None)?;

    let base_name = pdf_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let outputs = plan_outputs(&analysis.outcome, &pages, &base_name, patterns);

    tracing::info!(
        file = %pdf_file.display(),
        pages = pages.len(),
        documents = outputs.len(),
        "analyzed"
    );

    let mut summary = FileSummary {
        pdf_file: pdf_file.to_path_buf(),
        output_dir,
        analysis,
        outputs,
        report: None,
        deleted_original: false,
    };

    if summary.outputs.is_empty() || options.dry_run {
        return Ok(summary);
    }

    let report = write_outputs(&writer, &summary.outputs, &summary.output_dir)?;
    if options.delete_original && report.is_complete() {
        match std::fs::remove_file(pdf_file) {
            Ok(()) => summary.deleted_original = true,
            Err(e) => {
                tracing::warn!(file = %pdf_file.display(), error = %e, "could not delete original")
            }
        }
    }
    summary.report = Some(report);

    Ok(summary)
}

fn check_input(pdf_file: &Path) -> Result<(), SplitError> {
    let reason = if !pdf_file.is_file() {
        "file not found"
    } else if !is_pdf(pdf_file) {
        "not a .pdf file"
    } else {
        return Ok(());
    };
    Err(SplitError::PdfLoad {
        path: pdf_file.to_path_buf(),
        reason: reason.into(),
    })
}

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
}

fn default_output_dir(pdf_file: &Path) -> PathBuf {
    match pdf_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
