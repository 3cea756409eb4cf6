//! `kafka-consumer`: methods annotated `@KafkaListener(topics = "orders")`
//! become `message-consumer` findings, with the channel resolved from the
//! `topics` attribute (first topic when more than one is listed).

use super::util::first_topic;
use crate::ast::Ast;
use crate::ast::extract_named_argument;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "kafka-consumer",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for method in body.methods.iter().filter(|m| m.has_annotation("KafkaListener")) {
        let decorator = method.annotation("KafkaListener").unwrap();
        let Some(topic) = extract_named_argument(&decorator.arguments, "topics").and_then(|raw| first_topic(&raw))
        else {
            continue;
        };
        let canonical_name = method
            .owner
            .as_deref()
            .map(|owner| format!("{owner}.{}", method.name))
            .unwrap_or_else(|| method.name.clone());
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageConsumer,
            fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &canonical_name, LanguageTag::Java),
            confidence,
            loc: method.loc.clone(),
            payload: FindingPayload::MessageConsumer { channel: topic },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, Decorator};

    #[test]
    fn kafka_listener_emits_message_consumer() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderListener.java", b"class OrderListener {}".to_vec());
        body.methods.push(crate::ast::MethodDecl {
            loc: file.locatable_at_line(2),
            name: "onOrder".into(),
            parameters: vec![],
            is_async: false,
            decorators: vec![Decorator {
                loc: file.locatable_at_line(1),
                name: "KafkaListener".into(),
                arguments: "topics = \"orders\"".into(),
            }],
            owner: Some("OrderListener".into()),
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "orders"),
            _ => panic!("expected message-consumer payload"),
        }
    }

    #[test]
    fn multi_topic_listener_resolves_first_topic() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderListener.java", b"class OrderListener {}".to_vec());
        body.methods.push(crate::ast::MethodDecl {
            loc: file.locatable_at_line(2),
            name: "onEither".into(),
            parameters: vec![],
            is_async: false,
            decorators: vec![Decorator {
                loc: file.locatable_at_line(1),
                name: "KafkaListener".into(),
                arguments: "topics = {\"orders\", \"returns\"}".into(),
            }],
            owner: Some("OrderListener".into()),
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "orders"),
            _ => panic!("expected message-consumer payload"),
        }
    }
}
