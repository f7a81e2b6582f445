pub mod matchers;
pub mod state;

use crate::error::SplitError;
use crate::model::SplitOutcome;
use crate::patterns::PatternSet;
use crate::trace::ScanEvent;
use state::ScanState;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of one scan plus the per-page events behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub outcome: SplitOutcome,
    pub events: Vec<ScanEvent>,
}

/// The boundary-detection engine. Generic over the pattern table; holds
/// no scan state of its own, so one detector can serve any number of files.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryDetector<'a> {
    patterns: &'a PatternSet,
}

impl<'a> BoundaryDetector<'a> {
    pub fn new(patterns: &'a PatternSet) -> Self {
        BoundaryDetector { patterns }
    }

    pub fn patterns(&self) -> &'a PatternSet {
        self.patterns
    }

    /// Scan page texts (in page order) and decide where documents split.
    pub fn detect<S: AsRef<str>>(&self, pages: &[S]) -> SplitOutcome {
        self.analyze(pages).outcome
    }

    /// Like [`detect`](Self::detect), keeping the scan events.
    pub fn analyze<S: AsRef<str>>(&self, pages: &[S]) -> Analysis {
        let mut scanner = self.scanner();
        for text in pages {
            scanner.feed(text.as_ref());
        }
        scanner.finish()
    }

    /// Scan with a cancellation flag checked before every page.
    ///
    /// A cancelled scan yields no outcome: the last document is only known
    /// once the final page has been seen.
    pub fn analyze_with_cancel<S: AsRef<str>>(
        &self,
        pages: &[S],
        cancel: &AtomicBool,
    ) -> Result<Analysis, SplitError> {
        let mut scanner = self.scanner();
        for text in pages {
            if cancel.load(Ordering::Relaxed) {
                return Err(SplitError::Cancelled {
                    page: scanner.next_page(),
                });
            }
            scanner.feed(text.as_ref());
        }
        Ok(scanner.finish())
    }

    pub fn scanner(&self) -> Scanner<'a> {
        self.resume(0, ScanState::new())
    }

    /// Continue a scan from saved state; `next_page` is the first page not
    /// yet folded into `state`.
    pub fn resume(&self, next_page: usize, state: ScanState) -> Scanner<'a> {
        Scanner {
            patterns: self.patterns,
            next_page,
            state,
        }
    }
}

/// An in-progress scan over one PDF, fed one page at a time.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    patterns: &'a PatternSet,
    next_page: usize,
    state: ScanState,
}

impl<'a> Scanner<'a> {
    /// Index of the page the next `feed` call will process.
    pub fn next_page(&self) -> usize {
        self.next_page
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Process the next page's text.
    pub fn feed(&mut self, text: &str) {
        let obs = matchers::observe(self.patterns, self.next_page, text);
        self.state.step(&obs);
        self.next_page += 1;
    }

    /// Finish the scan; every page fed so far counts toward the total.
    pub fn finish(self) -> Analysis {
        let events = self.state.events.clone();
        let outcome = self.state.finish(self.next_page);
        Analysis { outcome, events }
    }
}
