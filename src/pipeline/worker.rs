//! Per-file parse + dispatch (§4.4 steps 2-3). Parsing precedes scanning
//! and, within one file, scanners run sequentially in registration order
//! so a file's own findings stay in deterministic order regardless of
//! which worker thread processed it (§5).

use super::types::FileOutcome;
use crate::model::Finding;
use crate::parsing::registry::ParserRegistry;
use crate::scanners::registry::ScannerRegistry;
use crate::types::{FileEvidence, LanguageTag};
use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

/// Reads, parses, and dispatches a single file. Parse failures and
/// scanner panics are contained here and logged — never propagated,
/// matching §7's `parse-error`/`scanner-error` containment.
pub(crate) fn process_file(
    path: &Path,
    scanners: &ScannerRegistry,
    parsers: &RwLock<ParserRegistry>,
    enabled: &HashSet<&'static str>,
) -> FileOutcome {
    let content = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("skipping '{}': failed to read file: {err}", path.display());
            return FileOutcome::default();
        }
    };
    let file = FileEvidence::new(path.to_path_buf(), content);

    let candidates: Vec<_> = scanners
        .scanners_for(file.language())
        .into_iter()
        .filter(|d| enabled.contains(d.id) && (d.matches)(path))
        .copied()
        .collect();
    if candidates.is_empty() {
        return FileOutcome::default();
    }

    let (ast, confidence) = match file.language() {
        LanguageTag::Other => (None, crate::parsing::ParseConfidence::High),
        language => {
            let adapter = parsers.read().unwrap().get(language);
            match adapter {
                Some(adapter) => match adapter.parse(&file) {
                    Ok(parsed) => (Some(parsed.ast), parsed.confidence),
                    Err(err) => {
                        tracing::warn!("failed to parse '{}': {err}", path.display());
                        (None, crate::parsing::ParseConfidence::Low)
                    }
                },
                None => (None, crate::parsing::ParseConfidence::High),
            }
        }
    };

    let mut findings: Vec<Finding> = Vec::new();
    let mut scanners_run = 0usize;
    for descriptor in &candidates {
        let scan_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (descriptor.scan)(&file, ast.as_ref(), confidence)));
        scanners_run += 1;
        match scan_result {
            Ok(mut scanner_findings) => findings.append(&mut scanner_findings),
            Err(_) => {
                tracing::warn!("scanner '{}' panicked on '{}'", descriptor.id, path.display());
            }
        }
    }

    FileOutcome {
        findings,
        scanned: true,
        scanners_run,
    }
}
