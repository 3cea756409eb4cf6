//! `rest-event-flow`: OpenAPI/AsyncAPI documents (`openapi.yaml`,
//! `asyncapi.yaml`, and their `.yml`/`.json` variants) declare operations
//! under `paths:`/`channels:` whose request/message bodies `$ref` a
//! `#/components/schemas/X` definition. Each such reference becomes a
//! `schema-reference` relation finding from a synthesized operation
//! component to the referenced schema. Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is_any;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "rest-event-flow",
    language: LanguageTag::Other,
    matches: |path| {
        file_name_is_any(
            path,
            &[
                "openapi.yaml",
                "openapi.yml",
                "openapi.json",
                "asyncapi.yaml",
                "asyncapi.yml",
                "asyncapi.json",
            ],
        )
    },
    scan,
};

fn operation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s{2,4}(/\S+|\w[\w.\-]*):\s*$").unwrap())
}

fn schema_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\$ref:\s*['"]?#/components/schemas/(\w+)['"]?"#).unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    let operations: Vec<(usize, String)> = operation_re()
        .captures_iter(&text)
        .map(|cap| (cap.get(0).unwrap().start(), cap[1].to_string()))
        .collect();
    if operations.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    for schema_cap in schema_ref_re().captures_iter(&text) {
        let ref_offset = schema_cap.get(0).unwrap().start();
        let schema_name = schema_cap[1].to_string();
        let Some((_, operation_path)) = operations.iter().filter(|(offset, _)| *offset <= ref_offset).last() else {
            continue;
        };
        let operation_fp = Fingerprint::component(FindingKind::Component, operation_path, LanguageTag::Other);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Relation,
            fingerprint: operation_fp,
            confidence: Confidence::High,
            loc: file.locatable_at(ref_offset),
            payload: FindingPayload::Relation {
                to: Fingerprint::component(FindingKind::Schema, &schema_name, LanguageTag::Other),
                relation_kind: RelationKind::SchemaReference,
            },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_referencing_schema_emits_schema_reference_relation() {
        let yaml = "paths:\n  /orders:\n    post:\n      requestBody:\n        content:\n          application/json:\n            schema:\n              $ref: '#/components/schemas/Order'\n";
        let file = FileEvidence::new("openapi.yaml", yaml.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Relation { to, relation_kind } => {
                assert_eq!(*relation_kind, RelationKind::SchemaReference);
                match to.as_component() {
                    Some(c) => assert_eq!(c.canonical_name, "Order"),
                    None => panic!("expected component fingerprint"),
                }
            }
            _ => panic!("expected relation payload"),
        }
        match findings[0].fingerprint.as_component() {
            Some(c) => assert_eq!(c.canonical_name, "/orders"),
            None => panic!("expected component fingerprint"),
        }
    }

    #[test]
    fn document_without_schema_refs_emits_no_findings() {
        let yaml = "paths:\n  /health:\n    get:\n      responses:\n        '200':\n          description: ok\n";
        let file = FileEvidence::new("openapi.yaml", yaml.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert!(findings.is_empty());
    }
}
