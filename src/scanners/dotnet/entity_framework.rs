//! `entity-framework`: classes extending `DbContext` become `data_store`
//! findings; each `DbSet<T>` property becomes a `persistence` relation
//! finding from the context to the managed entity type.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "entity-framework",
    language: LanguageTag::CSharp,
    matches: |path| has_extension(path, "cs"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::CSharp(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for context in body.types.iter().filter(|t| t.superclass.as_deref().is_some_and(|s| s.ends_with("DbContext"))) {
        let context_fp = Fingerprint::component(FindingKind::DataStore, &context.qualified_name, LanguageTag::CSharp);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::DataStore,
            fingerprint: context_fp.clone(),
            confidence,
            loc: context.loc.clone(),
            payload: FindingPayload::DataStore { store_kind: "entity-framework-context".to_string() },
        });

        for directive in body
            .directives
            .iter()
            .filter(|d| d.owner.as_deref() == Some(context.name.as_str()) && d.name == "DbSet")
        {
            let Some(entity_type) = directive.arguments.split(',').next().map(|s| s.trim().to_string()) else {
                continue;
            };
            let target_fp = Fingerprint::component(FindingKind::DataStore, &entity_type, LanguageTag::CSharp);
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Relation,
                fingerprint: context_fp.clone(),
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
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn dbcontext_with_dbset_emits_datastore_and_relation() {
        let src = "public class AppDbContext : DbContext {\n    public DbSet<Order> Orders { get; set; }\n}\n";
        let file = FileEvidence::new("AppDbContext.cs", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::CSharp).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::DataStore).count(), 1);
        let relation = findings.iter().find(|f| f.kind == FindingKind::Relation).unwrap();
        match &relation.payload {
            FindingPayload::Relation { to, .. } => assert_eq!(to.as_component().unwrap().canonical_name, "Order"),
            _ => panic!("expected relation payload"),
        }
    }
}
