//! `go-grpc-service`: the second argument to a generated
//! `RegisterXxxServer(grpcServer, impl)` call becomes a `component` finding
//! for the gRPC service implementation.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "go-grpc-service",
    language: LanguageTag::Go,
    matches: |path| has_extension(path, "go"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Go(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in body
        .call_sites
        .iter()
        .filter(|c| c.method.starts_with("Register") && c.method.ends_with("Server"))
    {
        let Some(implementation) = extract_positional(&call.arguments, 1) else { continue };
        let name = implementation.trim_start_matches('&').trim_end_matches("{}").to_string();
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: Fingerprint::component(FindingKind::Component, &name, LanguageTag::Go),
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::Component { name },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn register_server_call_emits_component() {
        let src = "package main\n\nfunc serve() {\n\tpb.RegisterOrderServiceServer(grpcServer, &orderServer{})\n}\n";
        let file = FileEvidence::new("main.go", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Go).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Component { name } => assert_eq!(name, "orderServer"),
            _ => panic!("expected component payload"),
        }
    }
}
