//! `java-grpc-service`: classes extending a generated `*Grpc.*ImplBase`
//! base class become `component` findings tagged as gRPC services.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "java-grpc-service",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

fn is_grpc_base(superclass: &str) -> bool {
    superclass.contains("Grpc.") && superclass.contains("ImplBase")
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    body.types
        .iter()
        .filter(|t| t.superclass.as_deref().is_some_and(is_grpc_base))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBody;

    #[test]
    fn service_extending_impl_base_emits_component() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderServiceImpl.java", b"class OrderServiceImpl {}".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderServiceImpl".into(),
            qualified_name: "com.example.OrderServiceImpl".into(),
            superclass: Some("OrderServiceGrpc.OrderServiceImplBase".into()),
            annotations: vec![],
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }
}
