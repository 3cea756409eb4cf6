//! Error types for the scan pipeline (§7).
//!
//! Only two things ever propagate out of [`crate::pipeline::Pipeline::scan`]:
//! the root directory being unreadable (`fatal-io`) and cancellation.
//! Every other error kind §7 names (`file-io-error`, `parse-error`,
//! `scanner-error`) is contained within a single file or scanner/file pair
//! and only ever logged (§4.4).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root path '{path}' is unreadable: {source}")]
    FatalIo { path: PathBuf, source: std::io::Error },

    #[error("scan cancelled before completion")]
    Cancelled,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Internal plumbing failures of the orchestrator itself (worker threads,
/// channels) rather than anything a scanner or parser produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a scan worker thread panicked")]
    WorkerPanicked,

    #[error("result channel closed before every discovered file was processed")]
    ChannelClosed,
}
