//! `go-http-router`: router registration call sites — `router.GET(...)`,
//! `router.POST(...)` (gin/chi/echo style) and bare `router.HandleFunc(...)`
//! (net/http/gorilla mux style, method-agnostic) — become `endpoint`
//! findings owned by the function that registers them.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "go-http-router",
    language: LanguageTag::Go,
    matches: |path| has_extension(path, "go"),
    scan,
};

const VERB_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];
const GENERIC_METHODS: &[&str] = &["HandleFunc", "Handle"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Go(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in &body.call_sites {
        if call.receiver.is_none() {
            continue;
        }
        let verb = if VERB_METHODS.contains(&call.method.as_str()) {
            call.method.clone()
        } else if GENERIC_METHODS.contains(&call.method.as_str()) {
            "GET".to_string()
        } else {
            continue;
        };
        let Some(path) = extract_positional(&call.arguments, 0) else { continue };
        let component_name = call.caller.clone().unwrap_or_else(|| "main".to_string());
        let component = Fingerprint::component(FindingKind::Component, &component_name, LanguageTag::Go);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn verb_method_call_emits_endpoint() {
        let src = "package main\n\nfunc setupRoutes() {\n\trouter.GET(\"/orders\", listOrders)\n}\n";
        let file = FileEvidence::new("main.go", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Go).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "GET");
                assert_eq!(path, "/orders");
            }
            _ => panic!("expected endpoint payload"),
        }
    }

    #[test]
    fn handlefunc_defaults_to_get() {
        let src = "package main\n\nfunc setupRoutes() {\n\trouter.HandleFunc(\"/orders\", listOrders)\n}\n";
        let file = FileEvidence::new("main.go", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Go).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Endpoint { verb, .. } => assert_eq!(verb, "GET"),
            _ => panic!("expected endpoint payload"),
        }
    }
}
