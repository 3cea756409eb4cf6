//! `mongodb-repository`: Spring Data MongoDB repository interfaces
//! (`interface FooRepository extends MongoRepository<Foo, String>`) become
//! `data_store` findings, with a `persistence` relation to the managed
//! entity type extracted from the generic argument.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "mongodb-repository",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

const REPOSITORY_BASES: &[&str] = &["MongoRepository", "ReactiveMongoRepository"];

fn entity_type_argument(superclass: &str) -> Option<String> {
    let start = superclass.find('<')? + 1;
    let end = superclass.find('>')?;
    superclass
        .get(start..end)?
        .split(',')
        .next()
        .map(|s| s.trim().to_string())
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for repository in &body.types {
        let Some(superclass) = &repository.superclass else { continue };
        if !REPOSITORY_BASES.iter().any(|base| superclass.contains(base)) {
            continue;
        }
        let repository_fp =
            Fingerprint::component(FindingKind::DataStore, &repository.qualified_name, LanguageTag::Java);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::DataStore,
            fingerprint: repository_fp.clone(),
            confidence,
            loc: repository.loc.clone(),
            payload: FindingPayload::DataStore { store_kind: "mongodb".to_string() },
        });
        if let Some(entity_type) = entity_type_argument(superclass) {
            let target = Fingerprint::component(FindingKind::DataStore, &entity_type, LanguageTag::Java);
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Relation,
                fingerprint: repository_fp.clone(),
                confidence,
                loc: repository.loc.clone(),
                payload: FindingPayload::Relation { to: target, relation_kind: RelationKind::Persistence },
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBody;

    #[test]
    fn repository_interface_emits_datastore_and_persistence_relation() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderRepository.java", b"interface OrderRepository {}".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderRepository".into(),
            qualified_name: "com.example.OrderRepository".into(),
            superclass: Some("MongoRepository<Order, String>".into()),
            annotations: vec![],
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::DataStore).count(), 1);
        let relation = findings.iter().find(|f| f.kind == FindingKind::Relation).unwrap();
        match &relation.payload {
            FindingPayload::Relation { to, .. } => {
                assert_eq!(to.as_component().unwrap().canonical_name, "Order");
            }
            _ => panic!("expected relation payload"),
        }
    }
}
