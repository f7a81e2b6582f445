use legalsplit_core::error::SplitError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::commands::load_pattern_set;
use crate::commands::split::{is_pdf, process_file, FileSummary, SplitOptions};
use crate::output;
use crate::PatternArgs;

/// Name marker of files produced by an earlier splitting run.
const SPLIT_MARKER: &str = "_split_";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output root. Each input writes into its own directory below it,
    /// mirroring the input's path relative to the batch directory.
    /// Defaults to the batch directory itself.
    pub output_dir: Option<PathBuf>,
    pub recursive: bool,
    pub include_split: bool,
    pub jobs: usize,
    pub split: SplitOptions,
}

pub type FileResult = (PathBuf, Result<FileSummary, SplitError>);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub split: usize,
    pub single: usize,
    pub errors: usize,
    pub files_created: usize,
}

impl BatchStats {
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut stats = BatchStats {
            total: results.len(),
            ..Default::default()
        };
        for (_, result) in results {
            match result {
                Ok(summary) if summary.outputs.is_empty() => stats.single += 1,
                Ok(summary) => {
                    stats.split += 1;
                    stats.files_created += summary.files_created();
                }
                Err(_) => stats.errors += 1,
            }
        }
        stats
    }
}

pub fn run(
    directory: &Path,
    options: &BatchOptions,
    pattern_args: &PatternArgs,
    output_format: &str,
) -> Result<i32, SplitError> {
    if !directory.is_dir() {
        return Err(SplitError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", directory.display()),
        )));
    }

    let patterns = load_pattern_set(pattern_args)?;
    let files = find_pdf_files(directory, options.recursive, options.include_split)?;
    tracing::info!(directory = %directory.display(), files = files.len(), "batch started");

    let output_root = options.output_dir.as_deref().unwrap_or(directory);
    let results = process_all(&files, options.jobs, |path| {
        let mut split = options.split.clone();
        split.output_dir = Some(input_output_dir(directory, output_root, path));
        let result = process_file(path, &split, &patterns);
        if let Err(e) = &result {
            tracing::warn!(file = %path.display(), error = %e, "file failed");
        }
        result
    })?;
    let stats = BatchStats::from_results(&results);

    match output_format {
        "json" => output::json::print_batch(&results, &stats)?,
        _ => output::table::print_batch(&results, &stats, options.split.dry_run),
    }

    let incomplete = results
        .iter()
        .any(|(_, r)| r.as_ref().map_or(true, |s| !s.is_complete()));
    Ok(if incomplete { 1 } else { 0 })
}

/// PDFs under `directory`, sorted by path. Files carrying the split marker
/// are left out unless `include_split` is set.
pub fn find_pdf_files(
    directory: &Path,
    recursive: bool,
    include_split: bool,
) -> Result<Vec<PathBuf>, SplitError> {
    let mut files = Vec::new();
    let mut pending = vec![directory.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
                continue;
            }
            if !is_pdf(&path) {
                continue;
            }
            let marked = path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().contains(SPLIT_MARKER));
            if marked && !include_split {
                tracing::debug!(file = %path.display(), "skipping already split file");
                continue;
            }
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Output directory of one batch input: its path relative to the batch
/// directory, minus the extension, under `output_root`. `in/x/a.pdf` and
/// `in/y/a.pdf` land in `out/x/a/` and `out/y/a/`.
pub fn input_output_dir(batch_dir: &Path, output_root: &Path, pdf_file: &Path) -> PathBuf {
    let relative = pdf_file
        .strip_prefix(batch_dir)
        .ok()
        .map(Path::to_path_buf)
        .or_else(|| pdf_file.file_name().map(PathBuf::from))
        .unwrap_or_default();
    output_root.join(relative.with_extension(""))
}

/// Run `process` on every file, `jobs` at a time. Each call gets its own
/// scan state and naming counters; results come back in input order
/// whatever the job count.
fn process_all<T, F>(
    files: &[PathBuf],
    jobs: usize,
    process: F,
) -> Result<Vec<(PathBuf, T)>, SplitError>
where
    T: Send,
    F: Fn(&Path) -> T + Sync,
{
    let run_one = |path: &PathBuf| (path.clone(), process(path.as_path()));

    let jobs = jobs.max(1).min(files.len().max(1));
    if jobs == 1 {
        return Ok(files.iter().map(run_one).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| {
            SplitError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("could not start {jobs} worker threads: {e}"),
            ))
        })?;
    Ok(pool.install(|| files.par_iter().map(run_one).collect()))
}
