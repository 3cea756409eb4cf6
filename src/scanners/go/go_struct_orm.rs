//! `go-struct-orm`: structs passed to `db.AutoMigrate(&X{}, ...)` (gorm)
//! become `data_store` findings — the idiomatic way a Go codebase declares
//! which structs are persisted, since struct tags carry no superclass to
//! key off of the way Java/Python ORMs do.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "go-struct-orm",
    language: LanguageTag::Go,
    matches: |path| has_extension(path, "go"),
    scan,
};

fn struct_literals(arguments: &str) -> Vec<String> {
    arguments
        .split(',')
        .filter_map(|arg| {
            let arg = arg.trim().trim_start_matches('&');
            arg.strip_suffix("{}").map(|s| s.to_string())
        })
        .collect()
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Go(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in body.call_sites.iter().filter(|c| c.method == "AutoMigrate") {
        for struct_name in struct_literals(&call.arguments) {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::DataStore,
                fingerprint: Fingerprint::component(FindingKind::DataStore, &struct_name, LanguageTag::Go),
                confidence,
                loc: call.loc.clone(),
                payload: FindingPayload::DataStore { store_kind: "gorm-model".to_string() },
            });
        }
    }
    findings
}
