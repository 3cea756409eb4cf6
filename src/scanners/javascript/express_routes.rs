//! `express-routes`: `app.get(...)`/`router.post(...)` style call sites
//! become `endpoint` findings, mirroring `go-http-router`'s call-site
//! scoring but with a fixed Express verb vocabulary (`use`/`all` are
//! middleware/catch-all registrations, not single-verb endpoints, and are
//! skipped). Scoped to `.js` like the rest of the `javascript` group;
//! TypeScript has its own AST facade variant but no scanner in the closed
//! set keys off it, same as Kotlin alongside Java.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "express-routes",
    language: LanguageTag::JavaScript,
    matches: |path| has_extension(path, "js"),
    scan,
};

const VERB_METHODS: &[&str] = &["get", "post", "put", "patch", "delete"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(body) = ast.map(Ast::body) else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in &body.call_sites {
        if !VERB_METHODS.contains(&call.method.as_str()) {
            continue;
        }
        let Some(receiver) = &call.receiver else { continue };
        let Some(path) = extract_positional(&call.arguments, 0) else { continue };
        let verb = call.method.to_uppercase();
        let component = Fingerprint::component(FindingKind::Component, receiver, LanguageTag::JavaScript);
        let Fingerprint::Component(component) = component else { unreachable!() };
        let handler = extract_positional(&call.arguments, 1);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Endpoint,
            fingerprint: Fingerprint::endpoint(component, &verb, &path),
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::Endpoint { verb, path, handler },
        });
    }
    findings
}
