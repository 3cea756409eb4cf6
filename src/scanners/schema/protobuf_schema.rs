//! `protobuf-schema`: `.proto` IDL files. `message X { ... }` declarations
//! become `schema` findings; `rpc Method(...) returns (...)` entries inside
//! a `service X { ... }` block become `endpoint` findings (verb `RPC`,
//! path `Service.Method`), the protobuf analogue of an HTTP route. Text-
//! only — protobuf has no AST facade variant.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::has_extension;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "protobuf-schema",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "proto"),
    scan,
};

fn message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*message\s+(\w+)").unwrap())
}

fn service_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?ms)^\s*service\s+(\w+)\s*\{(.*?)^\s*\}").unwrap())
}

fn rpc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*rpc\s+(\w+)\s*\(").unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    let mut findings = Vec::new();

    for cap in message_re().captures_iter(&text) {
        let name = cap[1].to_string();
        let loc = file.locatable_at(cap.get(0).unwrap().start());
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Schema,
            fingerprint: Fingerprint::component(FindingKind::Schema, &name, LanguageTag::Other),
            confidence: Confidence::High,
            loc,
            payload: FindingPayload::Schema {
                schema_kind: "protobuf-message".to_string(),
            },
        });
    }

    for service_cap in service_re().captures_iter(&text) {
        let service_name = service_cap[1].to_string();
        let body_start = service_cap.get(2).unwrap().start();
        let service_fp = Fingerprint::component(FindingKind::Component, &service_name, LanguageTag::Other);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: service_fp.clone(),
            confidence: Confidence::High,
            loc: file.locatable_at(service_cap.get(0).unwrap().start()),
            payload: FindingPayload::Component { name: service_name.clone() },
        });
        for rpc_cap in rpc_re().captures_iter(&service_cap[2]) {
            let method = rpc_cap[1].to_string();
            let loc = file.locatable_at(body_start + rpc_cap.get(0).unwrap().start());
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Endpoint,
                fingerprint: Fingerprint::endpoint(
                    service_fp.as_component().unwrap().clone(),
                    "RPC",
                    &format!("{service_name}.{method}"),
                ),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Endpoint {
                    verb: "RPC".to_string(),
                    path: format!("{service_name}.{method}"),
                    handler: Some(method),
                },
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_declaration_emits_schema_finding() {
        let proto = "syntax = \"proto3\";\n\nmessage Order {\n  string id = 1;\n}\n";
        let file = FileEvidence::new("order.proto", proto.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::Schema).count(), 1);
    }

    #[test]
    fn service_with_rpc_emits_component_and_endpoint() {
        let proto = "service OrderService {\n  rpc PlaceOrder (OrderRequest) returns (OrderReply);\n  rpc CancelOrder (CancelRequest) returns (CancelReply);\n}\n";
        let file = FileEvidence::new("order_service.proto", proto.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::Component).count(), 1);
        let endpoints: Vec<_> = findings.iter().filter(|f| f.kind == FindingKind::Endpoint).collect();
        assert_eq!(endpoints.len(), 2);
        match &endpoints[0].payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "RPC");
                assert_eq!(path, "OrderService.PlaceOrder");
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
