//! `spring-component`: classes annotated `@Component`, `@Service`,
//! `@Repository`, or `@Configuration` become `component` findings.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

const STEREOTYPES: &[&str] = &["Component", "Service", "Repository", "Configuration"];

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "spring-component",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    body.types
        .iter()
        .filter(|t| STEREOTYPES.iter().any(|s| t.has_annotation(s)))
        .map(|t| Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: Fingerprint::component(FindingKind::Component, &t.qualified_name, LanguageTag::Java),
            confidence,
            loc: t.loc.clone(),
            payload: FindingPayload::Component { name: t.name.clone() },
        })
        .collect()
}
