//! `django-orm`: classes extending `models.Model` become `data_store`
//! findings; `ForeignKey`/`OneToOneField`/`ManyToManyField` field
//! assignments become `persistence` relation findings to the referenced
//! model.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "django-orm",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

const RELATION_FIELDS: &[&str] = &["ForeignKey", "OneToOneField", "ManyToManyField"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for model in body.types.iter().filter(|t| t.superclass.as_deref().is_some_and(|s| s.ends_with("Model"))) {
        let model_fp = Fingerprint::component(FindingKind::DataStore, &model.qualified_name, LanguageTag::Python);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::DataStore,
            fingerprint: model_fp.clone(),
            confidence,
            loc: model.loc.clone(),
            payload: FindingPayload::DataStore { store_kind: "django-model".to_string() },
        });

        for directive in body
            .directives
            .iter()
            .filter(|d| d.owner.as_deref() == Some(model.name.as_str()) && RELATION_FIELDS.contains(&d.name.as_str()))
        {
            let Some(target) = extract_positional(&directive.arguments, 0) else { continue };
            let target = if target == "self" { model.qualified_name.clone() } else { target };
            let target_fp = Fingerprint::component(FindingKind::DataStore, &target, LanguageTag::Python);
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Relation,
                fingerprint: model_fp.clone(),
                confidence,
                loc: directive.loc.clone(),
                payload: FindingPayload::Relation { to: target_fp, relation_kind: RelationKind::Persistence },
            });
        }
    }
    findings
}
