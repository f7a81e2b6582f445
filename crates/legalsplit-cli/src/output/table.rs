use legalsplit_core::model::{NamedOutput, SplitOutcome};
use legalsplit_core::split::WriteResult;
use legalsplit_core::trace::ScanEventKind;
use legalsplit_core::SplitPlan;
use std::path::Path;

use crate::commands::batch::{BatchStats, FileResult};
use crate::commands::split::FileSummary;

pub fn print_summary(summary: &FileSummary, dry_run: bool) {
    println!("Processing: {}", file_name(&summary.pdf_file));

    if let SplitOutcome::Single { reason, .. } = &summary.analysis.outcome {
        println!("  single document ({reason})");
        return;
    }

    println!("  {} documents detected", summary.outputs.len());
    let no_ocr = summary
        .outputs
        .iter()
        .filter(|o| o.document.has_no_ocr_pages)
        .count();
    if no_ocr > 0 {
        println!("  warning: {no_ocr} document(s) contain pages with no OCR text");
    }

    if dry_run || summary.report.is_none() {
        println!("\n  Dry run, no files written:\n");
        for output in &summary.outputs {
            print_planned(output);
        }
        return;
    }

    if let Some(report) = &summary.report {
        for entry in &report.outputs {
            let doc = &entry.output.document;
            match &entry.result {
                WriteResult::Written { .. } => {
                    let status = if doc.has_no_ocr_pages { " [No OCR]" } else { "" };
                    println!(
                        "  -> {} (pages {}){}",
                        entry.output.filename,
                        doc.display_range(),
                        status
                    );
                }
                WriteResult::Failed { reason, .. } => {
                    println!("  !! {} not written: {}", entry.output.filename, reason);
                }
            }
        }

        let total = report.outputs.len();
        let written = report.written_count();
        if written == total {
            println!("\n  Created {} files in {}", written, summary.output_dir.display());
        } else {
            println!("\n  Only created {written} of {total} files");
        }
        if summary.deleted_original {
            println!("  Deleted original: {}", file_name(&summary.pdf_file));
        }
    }
}

pub fn print_plan(pdf_file: &Path, plan: &SplitPlan) {
    let outcome = plan.outcome();
    println!(
        "{} ({} pages)\n",
        file_name(pdf_file),
        outcome.total_pages()
    );

    match outcome {
        SplitOutcome::Single { reason, .. } => println!("  Single document: {reason}"),
        SplitOutcome::Split { .. } => {
            let width = plan
                .outputs
                .iter()
                .map(|o| o.filename.len())
                .max()
                .unwrap_or(10);
            println!(
                "  {:>3}  {:<9}  {:>5}  {:>6}  {:<width$}  Title",
                "#", "Pages", "Count", "No-OCR", "File"
            );
            println!("  {}", "-".repeat(width + 44));
            for o in &plan.outputs {
                let doc = &o.document;
                println!(
                    "  {:>3}  {:<9}  {:>5}  {:>6}  {:<width$}  {}",
                    o.index + 1,
                    doc.display_range(),
                    doc.page_count(),
                    doc.no_ocr_page_count,
                    o.filename,
                    truncate(doc.title.as_deref().unwrap_or("-"), 60)
                );
            }
        }
    }

    let boundaries: Vec<_> = plan
        .analysis
        .events
        .iter()
        .filter(|e| e.boundary_method().is_some())
        .collect();
    if !boundaries.is_empty() {
        println!("\n  Boundaries:");
        for event in boundaries {
            println!("    {event}");
        }
    }

    let low_text = plan
        .analysis
        .events
        .iter()
        .filter(|e| e.kind == ScanEventKind::LowText)
        .count();
    if low_text > 0 {
        println!("\n  {low_text} page(s) with no OCR text");
    }
}

pub fn print_batch(results: &[FileResult], stats: &BatchStats, dry_run: bool) {
    for (path, result) in results {
        match result {
            Ok(summary) => print_summary(summary, dry_run),
            Err(e) => {
                println!("Processing: {}", file_name(path));
                println!("  ERROR: {e}");
            }
        }
        println!();
    }

    println!("{}", "=".repeat(50));
    println!("Total files processed:    {}", stats.total);
    println!("Files split:              {}", stats.split);
    println!("Single documents:         {}", stats.single);
    println!("Errors:                   {}", stats.errors);
    println!("New files created:        {}", stats.files_created);
}

fn print_planned(output: &NamedOutput) {
    let doc = &output.document;
    println!("  Would create: {}", output.filename);
    println!(
        "    Pages {} ({} pages)",
        doc.display_range(),
        doc.page_count()
    );
    if let Some(title) = &doc.title {
        println!("    Title: {}", truncate(title, 60));
    }
    if doc.has_no_ocr_pages {
        println!("    No-OCR pages: {}", doc.no_ocr_page_count);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
