//! `jpa-entities`: classes annotated `@Entity` become `data_store` findings
//! (a JPA entity maps to a persisted table); `@OneToMany`/`@ManyToOne`/
//! `@OneToOne`/`@ManyToMany` fields become `persistence` relation findings
//! linking the owning entity to the related type.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "jpa-entities",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

const ASSOCIATION_ANNOTATIONS: &[&str] = &["OneToMany", "ManyToOne", "OneToOne", "ManyToMany"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        if !class.has_annotation("Entity") {
            continue;
        }
        let entity_fp = Fingerprint::component(FindingKind::DataStore, &class.qualified_name, LanguageTag::Java);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::DataStore,
            fingerprint: entity_fp.clone(),
            confidence,
            loc: class.loc.clone(),
            payload: FindingPayload::DataStore { store_kind: "jpa-entity".to_string() },
        });

        for association in ASSOCIATION_ANNOTATIONS {
            for directive in body
                .directives
                .iter()
                .filter(|d| d.owner.as_deref() == Some(class.name.as_str()) && d.name == *association)
            {
                let Some(target_type) = extract_positional(&directive.arguments, 0)
                    .map(|s| s.trim_end_matches(".class").to_string())
                else {
                    continue;
                };
                let target = Fingerprint::component(FindingKind::DataStore, &target_type, LanguageTag::Java);
                findings.push(Finding {
                    scanner_id: DESCRIPTOR.id,
                    kind: FindingKind::Relation,
                    fingerprint: entity_fp.clone(),
                    confidence,
                    loc: directive.loc.clone(),
                    payload: FindingPayload::Relation {
                        to: target,
                        relation_kind: RelationKind::Persistence,
                    },
                });
            }
        }
    }
    findings
}
