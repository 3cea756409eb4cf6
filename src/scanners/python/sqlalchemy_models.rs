//! `sqlalchemy-models`: classes extending the declarative `Base` become
//! `data_store` findings; `relationship(...)` field assignments become
//! `persistence` relation findings to the referenced model class.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "sqlalchemy-models",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for model in body.types.iter().filter(|t| t.superclass.as_deref().is_some_and(|s| s.ends_with("Base"))) {
        let model_fp = Fingerprint::component(FindingKind::DataStore, &model.qualified_name, LanguageTag::Python);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::DataStore,
            fingerprint: model_fp.clone(),
            confidence,
            loc: model.loc.clone(),
            payload: FindingPayload::DataStore { store_kind: "sqlalchemy-model".to_string() },
        });

        for directive in body
            .directives
            .iter()
            .filter(|d| d.owner.as_deref() == Some(model.name.as_str()) && d.name == "relationship")
        {
            let Some(target) = extract_positional(&directive.arguments, 0) else { continue };
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, Directive};

    #[test]
    fn declarative_model_with_relationship_emits_datastore_and_relation() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("models.py", b"class Order(Base):\n    pass\n".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "Order".into(),
            qualified_name: "Order".into(),
            superclass: Some("Base".into()),
            annotations: vec![],
        });
        body.directives.push(Directive {
            loc: file.locatable_at_line(2),
            name: "relationship".into(),
            arguments: "\"OrderLine\"".into(),
            owner: Some("Order".into()),
        });
        let ast = Ast::Python(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::DataStore).count(), 1);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::Relation).count(), 1);
    }
}
