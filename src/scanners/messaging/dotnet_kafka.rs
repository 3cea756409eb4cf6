//! `dotnet-kafka`: a class decorated `[Topic("orders")]` whose base type
//! names it a consumer or producer (`...Consumer`/`...Producer`) becomes a
//! `message-consumer`/`message-producer` finding on that topic.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::dotnet::attribute_path;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "dotnet-kafka",
    language: LanguageTag::CSharp,
    matches: |path| has_extension(path, "cs"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::CSharp(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        let Some(topic) = class.annotation("Topic").and_then(attribute_path) else { continue };
        let superclass = class.superclass.as_deref().unwrap_or("");
        if superclass.contains("Consumer") {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::MessageConsumer,
                fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &class.qualified_name, LanguageTag::CSharp),
                confidence,
                loc: class.loc.clone(),
                payload: FindingPayload::MessageConsumer { channel: topic },
            });
        } else if superclass.contains("Producer") {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::MessageProducer,
                fingerprint: Fingerprint::component(FindingKind::MessageProducer, &class.qualified_name, LanguageTag::CSharp),
                confidence,
                loc: class.loc.clone(),
                payload: FindingPayload::MessageProducer { channel: topic, target: None },
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
    fn consumer_subclass_with_topic_attribute_emits_message_consumer() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderConsumer.cs", b"class OrderConsumer : KafkaConsumer {}".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderConsumer".into(),
            qualified_name: "OrderConsumer".into(),
            superclass: Some("KafkaConsumer".into()),
            annotations: vec![Decorator {
                loc: file.locatable_at_line(1),
                name: "Topic".into(),
                arguments: "\"orders\"".into(),
            }],
        });
        let ast = Ast::CSharp(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MessageConsumer);
    }
}
