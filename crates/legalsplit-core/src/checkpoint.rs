//! Crash-resume support for long scans.
//!
//! The scan state is written to a JSON file next to the outputs every few
//! pages. A later run with `resume` picks it up if it was written for the
//! same PDF, and the file is removed once the scan completes.

use crate::detect::state::ScanState;
use crate::detect::{Analysis, BoundaryDetector};
use crate::error::SplitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pdf_path: String,
    pub total_pages: usize,
    /// First page not yet folded into `state`.
    pub next_page: usize,
    pub state: ScanState,
}

impl Checkpoint {
    fn matches(&self, pdf_path: &Path, total_pages: usize) -> bool {
        self.pdf_path == pdf_path.to_string_lossy() && self.total_pages == total_pages
    }
}

/// Where the checkpoint for `pdf_path` lives: `<output_dir>/.<stem>.checkpoint.json`.
pub fn checkpoint_path(pdf_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());
    output_dir.join(format!(".{stem}.checkpoint.json"))
}

pub fn save_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<(), SplitError> {
    let json = serde_json::to_string_pretty(checkpoint)?;
    std::fs::write(path, json)
        .map_err(|e| SplitError::Checkpoint(format!("cannot write {}: {}", path.display(), e)))
}

/// Read a checkpoint. A missing file is `Ok(None)`.
pub fn load_checkpoint(path: &Path) -> Result<Option<Checkpoint>, SplitError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| SplitError::Checkpoint(format!("cannot read {}: {}", path.display(), e)))?;
    let checkpoint = serde_json::from_str(&content)
        .map_err(|e| SplitError::Checkpoint(format!("corrupt {}: {}", path.display(), e)))?;
    Ok(Some(checkpoint))
}

pub fn delete_checkpoint(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not delete checkpoint");
        }
    }
}

/// Options for [`scan_with_checkpoints`].
#[derive(Debug, Clone)]
pub struct CheckpointOptions {
    pub path: PathBuf,
    /// Save after every `interval` pages. Zero disables saving.
    pub interval: usize,
    /// Continue from an existing checkpoint for the same PDF.
    pub resume: bool,
    /// Read an existing checkpoint but never save or delete one.
    pub read_only: bool,
}

/// Scan `pages`, saving progress periodically and resuming from an earlier
/// checkpoint when asked.
///
/// Checkpoint I/O problems never fail the scan; they are logged and the
/// scan carries on (from page 0 if the old checkpoint is unusable).
pub fn scan_with_checkpoints<S: AsRef<str>>(
    detector: &BoundaryDetector<'_>,
    pages: &[S],
    pdf_path: &Path,
    options: &CheckpointOptions,
    cancel: Option<&AtomicBool>,
) -> Result<Analysis, SplitError> {
    let total_pages = pages.len();

    let mut scanner = match resume_point(pdf_path, total_pages, options) {
        Some(checkpoint) => {
            debug!(
                next_page = checkpoint.next_page,
                documents = checkpoint.state.documents.len(),
                "resuming from checkpoint"
            );
            detector.resume(checkpoint.next_page, checkpoint.state)
        }
        None => detector.scanner(),
    };

    while scanner.next_page() < total_pages {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(SplitError::Cancelled {
                page: scanner.next_page(),
            });
        }

        scanner.feed(pages[scanner.next_page()].as_ref());

        let done = scanner.next_page();
        if !options.read_only
            && options.interval > 0
            && done % options.interval == 0
            && done < total_pages
        {
            let checkpoint = Checkpoint {
                pdf_path: pdf_path.to_string_lossy().into_owned(),
                total_pages,
                next_page: done,
                state: scanner.state().clone(),
            };
            match save_checkpoint(&options.path, &checkpoint) {
                Ok(()) => debug!(page = done, "checkpoint saved"),
                Err(e) => warn!(error = %e, "could not save checkpoint"),
            }
        }
    }

    if !options.read_only {
        delete_checkpoint(&options.path);
    }
    Ok(scanner.finish())
}

fn resume_point(
    pdf_path: &Path,
    total_pages: usize,
    options: &CheckpointOptions,
) -> Option<Checkpoint> {
    if !options.resume {
        return None;
    }
    match load_checkpoint(&options.path) {
        Ok(Some(checkpoint))
            if checkpoint.matches(pdf_path, total_pages) && checkpoint.next_page <= total_pages =>
        {
            Some(checkpoint)
        }
        Ok(Some(_)) => {
            warn!(path = %options.path.display(), "checkpoint belongs to a different input; starting over");
            None
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable checkpoint");
            None
        }
    }
}
