use crate::error::SplitError;
use crate::model::NamedOutput;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes page ranges of one opened source PDF to new files.
pub trait PdfWriter: Send + Sync {
    fn page_count(&self) -> usize;

    /// Write pages `start_page..=end_page` (zero-based) to `output`, which
    /// must not exist yet.
    fn write_subset(&self, start_page: usize, end_page: usize, output: &Path)
        -> Result<(), SplitError>;
}

/// `lopdf` backend: each subset is a copy of the source with every other
/// page deleted and the unreachable objects pruned.
pub struct LopdfWriter {
    source: PathBuf,
    document: lopdf::Document,
}

impl LopdfWriter {
    pub fn open(path: &Path) -> Result<Self, SplitError> {
        let document = lopdf::Document::load(path).map_err(|e| SplitError::PdfLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(LopdfWriter {
            source: path.to_path_buf(),
            document,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl PdfWriter for LopdfWriter {
    fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    fn write_subset(
        &self,
        start_page: usize,
        end_page: usize,
        output: &Path,
    ) -> Result<(), SplitError> {
        let write_err = |reason: String| SplitError::Write {
            path: output.to_path_buf(),
            reason,
        };

        let total = self.page_count();
        if start_page > end_page || end_page >= total {
            return Err(write_err(format!(
                "page range {}-{} outside document of {} pages",
                start_page + 1,
                end_page + 1,
                total
            )));
        }

        let mut subset = self.document.clone();
        // lopdf page numbers are 1-based.
        let keep = (start_page as u32 + 1)..=(end_page as u32 + 1);
        let drop: Vec<u32> = subset
            .get_pages()
            .keys()
            .copied()
            .filter(|n| !keep.contains(n))
            .collect();
        subset.delete_pages(&drop);
        subset.prune_objects();
        subset.compress();

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(output)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => write_err("file already exists".into()),
                _ => write_err(e.to_string()),
            })?;
        if let Err(e) = subset.save_to(&mut file) {
            std::mem::drop(file);
            let _ = std::fs::remove_file(output);
            return Err(write_err(e.to_string()));
        }
        Ok(())
    }
}

/// What happened to one planned output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    Written { path: PathBuf, bytes: u64 },
    Failed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    pub output: NamedOutput,
    pub result: WriteResult,
}

/// Per-document results of writing one split.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitReport {
    pub outputs: Vec<OutputReport>,
}

impl SplitReport {
    /// True only when every planned document was written.
    pub fn is_complete(&self) -> bool {
        self.outputs
            .iter()
            .all(|o| matches!(o.result, WriteResult::Written { .. }))
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outputs.iter().filter_map(|o| match &o.result {
            WriteResult::Written { path, .. } => Some(path.as_path()),
            WriteResult::Failed { .. } => None,
        })
    }

    pub fn written_count(&self) -> usize {
        self.written().count()
    }

    pub fn failed_count(&self) -> usize {
        self.outputs.len() - self.written_count()
    }
}

/// Write every planned output into `output_dir`.
///
/// A failed document is recorded in the report and the remaining documents
/// are still written. Existing files are never replaced: a name that is
/// already taken fails that document. Only an unusable output directory
/// aborts.
pub fn write_outputs(
    writer: &dyn PdfWriter,
    outputs: &[NamedOutput],
    output_dir: &Path,
) -> Result<SplitReport, SplitError> {
    std::fs::create_dir_all(output_dir).map_err(|e| SplitError::Write {
        path: output_dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut report = SplitReport::default();
    for output in outputs {
        let path = output_dir.join(&output.filename);
        let doc = &output.document;

        let written = if path.exists() {
            Err(SplitError::Write {
                path: path.clone(),
                reason: "file already exists".into(),
            })
        } else {
            writer.write_subset(doc.start_page, doc.end_page, &path)
        };
        let result = match written {
            Ok(()) => {
                let bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                debug!(
                    file = %output.filename,
                    pages = %doc.display_range(),
                    bytes,
                    "document written"
                );
                WriteResult::Written { path, bytes }
            }
            Err(e) => {
                warn!(file = %output.filename, error = %e, "could not write document");
                WriteResult::Failed {
                    path,
                    reason: e.to_string(),
                }
            }
        };
        report.outputs.push(OutputReport {
            output: output.clone(),
            result,
        });
    }

    Ok(report)
}
