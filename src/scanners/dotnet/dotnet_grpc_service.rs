//! `dotnet-grpc-service`: classes extending a generated `*.*Base` gRPC
//! service base class become `component` findings.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "dotnet-grpc-service",
    language: LanguageTag::CSharp,
    matches: |path| has_extension(path, "cs"),
    scan,
};

fn is_grpc_base(superclass: &str) -> bool {
    superclass.contains('.') && superclass.ends_with("Base") && !superclass.ends_with("DbContext")
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::CSharp(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    body.types
        .iter()
        .filter(|t| t.superclass.as_deref().is_some_and(is_grpc_base))
        .map(|t| Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: Fingerprint::component(FindingKind::Component, &t.qualified_name, LanguageTag::CSharp),
            confidence,
            loc: t.loc.clone(),
            payload: FindingPayload::Component { name: t.name.clone() },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBody;

    #[test]
    fn service_extending_generated_base_emits_component() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderServiceImpl.cs", b"class OrderServiceImpl {}".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderServiceImpl".into(),
            qualified_name: "OrderServiceImpl".into(),
            superclass: Some("OrderService.OrderServiceBase".into()),
            annotations: vec![],
        });
        let ast = Ast::CSharp(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }
}
