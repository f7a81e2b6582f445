use legalsplit_core::error::SplitError;
use legalsplit_core::extraction::pdftotext::PdftotextExtractor;
use legalsplit_core::split::{LopdfWriter, PdfWriter};
use std::path::Path;

use crate::commands::load_pattern_set;
use crate::output;
use crate::PatternArgs;

pub fn run(
    pdf_file: &Path,
    pattern_args: &PatternArgs,
    output_format: &str,
) -> Result<i32, SplitError> {
    let patterns = load_pattern_set(pattern_args)?;

    let page_count = LopdfWriter::open(pdf_file)?.page_count();
    let pdf_bytes = std::fs::read(pdf_file)?;
    let base_name = pdf_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let plan = legalsplit_core::analyze_pdf(
        &pdf_bytes,
        &PdftotextExtractor::new(),
        Some(page_count),
        &base_name,
        &patterns,
    )?;

    match output_format {
        "json" => output::json::print_plan(pdf_file, &plan)?,
        _ => output::table::print_plan(pdf_file, &plan),
    }

    Ok(0)
}
