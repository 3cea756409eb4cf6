//! The pipeline orchestrator (§4.4): discovery, per-file parse+dispatch
//! across worker threads, and a single-thread merge barrier (§5).

mod discover;
mod types;
mod worker;

pub use types::{CancellationToken, ScanSummary};

use crate::config::Config;
use crate::error::{PipelineError, ScanError, ScanResult};
use crate::model::{ArchitectureModel, FindingMerger};
use crate::parsing;
use crate::scanners;
use crossbeam_channel::bounded;
use std::path::Path;
use std::thread;
use types::FileOutcome;

/// Number of file-processing worker threads. Mirrors the teacher's
/// `parse_threads` derivation (CPU count minus headroom for the
/// discovery/merge threads), floored at 1 for single-core environments.
fn worker_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Runs the scan pipeline end to end: discover, parse+dispatch (file-
/// parallel), merge (single thread). Returns the immutable architecture
/// model plus the summary counters §7 requires.
pub fn scan(root: &Path, config: &Config, cancellation: &CancellationToken) -> ScanResult<(ArchitectureModel, ScanSummary)> {
    let excludes = discover::compile_excludes(&config.scan.excludes);
    let files = discover::discover(root, &excludes)?;
    tracing::info!("discovered {} file(s) under '{}'", files.len(), root.display());

    let scanner_registry = scanners::get_registry();
    let parser_registry = parsing::get_registry();
    let enabled = std::sync::Arc::new(scanner_registry.enabled_scanners(
        &config.scanners.groups,
        &config.scanners.enabled,
        &config.scanners.disabled,
    ));

    let (path_tx, path_rx) = bounded::<std::path::PathBuf>(files.len().max(1));
    let (result_tx, result_rx) = bounded::<FileOutcome>(files.len().max(1));

    for file in files {
        // Never blocks: the channel is sized to hold every discovered file.
        path_tx.send(file).expect("path channel has capacity for every discovered file");
    }
    drop(path_tx);

    let handles: Vec<_> = (0..worker_count())
        .map(|_| {
            let path_rx = path_rx.clone();
            let result_tx = result_tx.clone();
            let cancellation = cancellation.clone();
            let scanner_registry = scanner_registry.clone();
            let enabled = enabled.clone();
            thread::spawn(move || {
                while let Ok(path) = path_rx.recv() {
                    if cancellation.is_cancelled() {
                        break;
                    }
                    let outcome = worker::process_file(&path, &scanner_registry, parser_registry, &enabled);
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                }
            })
        })
        .collect();
    drop(result_rx.clone());
    drop(result_tx);

    let mut summary = ScanSummary::default();
    let mut all_findings = Vec::new();
    for outcome in result_rx {
        if outcome.scanned {
            summary.files_scanned += 1;
        } else {
            summary.files_skipped += 1;
        }
        summary.scanners_run += outcome.scanners_run;
        all_findings.extend(outcome.findings);
    }

    for handle in handles {
        handle.join().map_err(|_| ScanError::Pipeline(PipelineError::WorkerPanicked))?;
    }

    if cancellation.is_cancelled() {
        return Err(ScanError::Cancelled);
    }

    summary.findings_emitted = all_findings.len();
    let priority = scanner_registry.priority();
    let model = FindingMerger::new(&priority).merge(all_findings);
    summary.nodes = model.node_count();
    summary.edges = model.edge_count();

    tracing::info!(
        "scan complete: {} file(s) scanned, {} skipped, {} finding(s), {} node(s), {} edge(s)",
        summary.files_scanned,
        summary.files_skipped,
        summary.findings_emitted,
        summary.nodes,
        summary.edges
    );

    Ok((model, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_root_directory_yields_zero_nodes_and_edges() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let token = CancellationToken::new();
        let (model, summary) = scan(dir.path(), &config, &token).unwrap();
        assert_eq!(model.node_count(), 0);
        assert_eq!(model.edge_count(), 0);
        assert_eq!(summary.files_scanned, 0);
    }

    #[test]
    fn scans_a_spring_controller_into_one_component_and_one_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let src = "@RestController\n@RequestMapping(\"/api/v1/orders\")\nclass OrderController {\n    @GetMapping(\"/{id}\")\n    public Order getOrder(String id) {\n        return null;\n    }\n}\n";
        fs::write(dir.path().join("OrderController.java"), src).unwrap();

        let config = Config::default();
        let token = CancellationToken::new();
        let (model, summary) = scan(dir.path(), &config, &token).unwrap();
        assert_eq!(summary.files_scanned, 1);
        assert!(model.node_count() >= 1);
        assert_eq!(model.endpoints().len(), 1);
    }

    #[test]
    fn nonexistent_root_returns_fatal_io_error() {
        let config = Config::default();
        let token = CancellationToken::new();
        let result = scan(Path::new("/nonexistent/scanarch-root"), &config, &token);
        assert!(matches!(result, Err(ScanError::FatalIo { .. })));
    }

    #[test]
    fn pre_cancelled_token_returns_cancelled_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("App.java"), "class App {}").unwrap();
        let config = Config::default();
        let token = CancellationToken::new();
        token.cancel();
        let result = scan(dir.path(), &config, &token);
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }
}
