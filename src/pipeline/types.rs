//! Shared pipeline types: the scan summary §7 requires in the final
//! report, and the cooperative cancellation signal §5 describes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Counts the final report lists (§7): `files-scanned, files-skipped,
/// scanners-run, findings-emitted, nodes, edges`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub scanners_run: usize,
    pub findings_emitted: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// A cooperative cancellation signal observed by workers between files
/// (§5). Cheap to clone; every clone shares the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a single file contributed to the scan: its findings plus the
/// counters needed to roll up into the final [`ScanSummary`].
#[derive(Debug, Default)]
pub(crate) struct FileOutcome {
    pub findings: Vec<crate::model::Finding>,
    pub scanned: bool,
    pub scanners_run: usize,
}
