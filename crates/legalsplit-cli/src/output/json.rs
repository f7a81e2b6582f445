use legalsplit_core::error::SplitError;
use legalsplit_core::SplitPlan;
use serde_json::{json, Value};
use std::path::Path;

use crate::commands::batch::{BatchStats, FileResult};
use crate::commands::split::FileSummary;

pub fn print_summary(summary: &FileSummary) -> Result<(), SplitError> {
    let json = serde_json::to_string_pretty(&summary_value(summary))?;
    println!("{json}");
    Ok(())
}

pub fn print_plan(pdf_file: &Path, plan: &SplitPlan) -> Result<(), SplitError> {
    let value = json!({
        "file": pdf_file.display().to_string(),
        "result": plan.analysis.outcome,
        "outputs": plan.outputs,
        "events": plan.analysis.events,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn print_batch(results: &[FileResult], stats: &BatchStats) -> Result<(), SplitError> {
    let files: Vec<Value> = results
        .iter()
        .map(|(path, result)| match result {
            Ok(summary) => summary_value(summary),
            Err(e) => json!({
                "file": path.display().to_string(),
                "error": e.to_string(),
            }),
        })
        .collect();

    let value = json!({
        "files": files,
        "summary": {
            "total": stats.total,
            "split": stats.split,
            "single": stats.single,
            "errors": stats.errors,
            "files_created": stats.files_created,
        },
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn summary_value(summary: &FileSummary) -> Value {
    json!({
        "file": summary.pdf_file.display().to_string(),
        "output_dir": summary.output_dir.display().to_string(),
        "result": summary.analysis.outcome,
        "outputs": summary.outputs,
        "report": summary.report,
        "deleted_original": summary.deleted_original,
    })
}
