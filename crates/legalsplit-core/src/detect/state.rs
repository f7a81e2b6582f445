use crate::model::{DocumentDescriptor, PageObservation, SingleReason, SplitOutcome};
use crate::trace::{ScanEvent, ScanEventKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the scan remembers between pages.
///
/// Pages must be stepped in order: the standalone and header memories only
/// mean something relative to the page before. The state is plain data so
/// it can be checkpointed and resumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    /// First page of the open span.
    pub current_start: usize,
    pub current_title: Option<String>,
    pub current_no_ocr_count: usize,
    pub prev_standalone_page: Option<u32>,
    pub prev_header_type: Option<String>,
    /// Spans closed so far.
    pub documents: Vec<DocumentDescriptor>,
    #[serde(default)]
    pub events: Vec<ScanEvent>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one page into the state.
    ///
    /// Methods are tried in order of reliability and the first that applies
    /// owns the page: "Page X of Y", then a standalone page-number reset,
    /// then a header type change.
    pub fn step(&mut self, obs: &PageObservation) {
        let p = obs.page_index;

        if obs.is_low_text {
            self.events.push(ScanEvent {
                page_index: p,
                kind: ScanEventKind::LowText,
            });
        }

        if let Some((current, total)) = obs.page_of {
            // The page belongs to the open span whether or not it closes it.
            self.absorb(obs, false);
            if current == total {
                self.close(p);
                self.current_start = p + 1;
                self.prev_standalone_page = None;
                self.prev_header_type = None;
                self.events.push(ScanEvent {
                    page_index: p,
                    kind: ScanEventKind::PageOfClose { current, total },
                });
            }
            return;
        }

        if let Some(n) = obs.standalone {
            let previous = self.prev_standalone_page.replace(n);
            if let Some(previous) = previous.filter(|&prev| n == 1 && prev > 1) {
                if p > self.current_start {
                    self.close(p - 1);
                    self.current_start = p;
                    // New document: this page's header is its baseline.
                    self.prev_header_type = obs.header_type.clone();
                    self.absorb(obs, true);
                    self.events.push(ScanEvent {
                        page_index: p,
                        kind: ScanEventKind::StandaloneReset { previous },
                    });
                    return;
                }
            }
        }

        if let Some(header) = &obs.header_type {
            let from = self
                .prev_header_type
                .as_ref()
                .filter(|prev| *prev != header && p > self.current_start)
                .cloned();
            if let Some(from) = from {
                self.close(p - 1);
                self.current_start = p;
                self.prev_standalone_page = obs.standalone;
                self.events.push(ScanEvent {
                    page_index: p,
                    kind: ScanEventKind::HeaderChange {
                        from,
                        to: header.clone(),
                    },
                });
            }
            self.prev_header_type = Some(header.clone());
        }

        self.absorb(obs, true);
    }

    /// Close the trailing span and decide whether the PDF splits at all.
    ///
    /// Fewer than two resulting documents means there is nothing to split.
    pub fn finish(mut self, total_pages: usize) -> SplitOutcome {
        if total_pages == 0 || self.documents.is_empty() {
            return SplitOutcome::Single {
                total_pages,
                reason: SingleReason::NoBoundaryFound,
            };
        }

        if self.current_start < total_pages {
            self.close(total_pages - 1);
        }

        if self.documents.len() < 2 {
            return SplitOutcome::Single {
                total_pages,
                reason: SingleReason::DegenerateSplit,
            };
        }

        SplitOutcome::Split {
            total_pages,
            documents: self.documents,
        }
    }

    /// Attribute a page to the open span.
    fn absorb(&mut self, obs: &PageObservation, header_as_title: bool) {
        if obs.is_low_text {
            self.current_no_ocr_count += 1;
        }
        if self.current_title.is_none() {
            self.current_title = obs.title.clone().or_else(|| {
                if header_as_title {
                    obs.header_type.clone()
                } else {
                    None
                }
            });
        }
    }

    /// Emit the open span as `[current_start, end_page]` and clear its
    /// accumulators.
    fn close(&mut self, end_page: usize) {
        let doc = DocumentDescriptor {
            start_page: self.current_start,
            end_page,
            title: self.current_title.take(),
            has_no_ocr_pages: self.current_no_ocr_count > 0,
            no_ocr_page_count: self.current_no_ocr_count,
        };
        debug!(
            start = doc.start_page + 1,
            end = doc.end_page + 1,
            title = doc.title.as_deref().unwrap_or("-"),
            no_ocr = doc.no_ocr_page_count,
            "document closed"
        );
        self.documents.push(doc);
        self.current_no_ocr_count = 0;
    }
}
