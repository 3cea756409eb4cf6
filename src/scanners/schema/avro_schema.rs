//! `avro-schema`: `.avsc` Avro record schemas. Text-only; regex over the
//! raw JSON rather than a full JSON parse, consistent with the other
//! manifest/IDL scanners in this family.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::has_extension;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "avro-schema",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "avsc"),
    scan,
};

fn record_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)"type"\s*:\s*"record"\s*,\s*"name"\s*:\s*"(\w+)"|"name"\s*:\s*"(\w+)"\s*,\s*"type"\s*:\s*"record""#)
            .unwrap()
    })
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    record_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap.get(1).or_else(|| cap.get(2)).unwrap().as_str().to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Schema,
                fingerprint: Fingerprint::component(FindingKind::Schema, &name, LanguageTag::Other),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Schema {
                    schema_kind: "avro-record".to_string(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_schema_emits_schema_finding() {
        let avsc = r#"{"type": "record", "name": "Order", "fields": [{"name": "id", "type": "string"}]}"#;
        let file = FileEvidence::new("order.avsc", avsc.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Schema { schema_kind } => assert_eq!(schema_kind, "avro-record"),
            _ => panic!("expected schema payload"),
        }
        match findings[0].fingerprint.as_component() {
            Some(c) => assert_eq!(c.canonical_name, "Order"),
            None => panic!("expected component fingerprint"),
        }
    }
}
