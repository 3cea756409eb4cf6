//! `dotnet-kafka-streams`: a class decorated
//! `[Topology(Input = "orders", Output = "orders-enriched")]` becomes a
//! `message-consumer` finding on `Input` and a `message-producer` finding
//! on `Output`, the .NET analogue of `kafka-streams`' `.stream()`/`.to()`
//! pair.

use crate::ast::Ast;
use crate::ast::extract_named_argument;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "dotnet-kafka-streams",
    language: LanguageTag::CSharp,
    matches: |path| has_extension(path, "cs"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::CSharp(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        let Some(decorator) = class.annotation("Topology") else { continue };
        if let Some(input) = extract_named_argument(&decorator.arguments, "Input") {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::MessageConsumer,
                fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &class.qualified_name, LanguageTag::CSharp),
                confidence,
                loc: class.loc.clone(),
                payload: FindingPayload::MessageConsumer { channel: input },
            });
        }
        if let Some(output) = extract_named_argument(&decorator.arguments, "Output") {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::MessageProducer,
                fingerprint: Fingerprint::component(FindingKind::MessageProducer, &class.qualified_name, LanguageTag::CSharp),
                confidence,
                loc: class.loc.clone(),
                payload: FindingPayload::MessageProducer { channel: output, target: None },
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, Decorator};

    #[test]
    fn topology_attribute_emits_both_consumer_and_producer() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderTopology.cs", b"class OrderTopology {}".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderTopology".into(),
            qualified_name: "OrderTopology".into(),
            superclass: None,
            annotations: vec![Decorator {
                loc: file.locatable_at_line(1),
                name: "Topology".into(),
                arguments: "Input = \"orders\", Output = \"orders-enriched\"".into(),
            }],
        });
        let ast = Ast::CSharp(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::MessageConsumer).count(), 1);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::MessageProducer).count(), 1);
    }
}
