//! `graphql-schema`: top-level `type`/`input`/`interface`/`enum`/`union`
//! declarations in a `.graphql`/`.gql` SDL document become `schema`
//! findings. Text-only — GraphQL SDL has no AST facade variant.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::has_extension;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "graphql-schema",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "graphql") || has_extension(path, "gql"),
    scan,
};

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(type|input|interface|enum|union|scalar)\s+(\w+)").unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    declaration_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap[2].to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Schema,
                fingerprint: Fingerprint::component(FindingKind::Schema, &name, LanguageTag::Other),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Schema {
                    schema_kind: format!("graphql-{}", &cap[1]),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_input_declarations_emit_schema_findings() {
        let sdl = "type Order {\n  id: ID!\n  total: Float!\n}\n\ninput OrderInput {\n  total: Float!\n}\n";
        let file = FileEvidence::new("schema.graphql", sdl.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 2);
        match &findings[0].payload {
            FindingPayload::Schema { schema_kind } => assert_eq!(schema_kind, "graphql-type"),
            _ => panic!("expected schema payload"),
        }
        match &findings[1].payload {
            FindingPayload::Schema { schema_kind } => assert_eq!(schema_kind, "graphql-input"),
            _ => panic!("expected schema payload"),
        }
    }

    #[test]
    fn nested_field_lines_are_not_mistaken_for_declarations() {
        let sdl = "type Order {\n  id: ID!\n}\n";
        let file = FileEvidence::new("schema.graphql", sdl.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }
}
