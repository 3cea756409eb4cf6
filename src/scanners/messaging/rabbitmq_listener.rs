//! `rabbitmq-listener`: methods annotated
//! `@RabbitListener(queues = "orders.queue")` become `message-consumer`
//! findings, with the channel resolved from the `queues` attribute.

use super::util::first_topic;
use crate::ast::Ast;
use crate::ast::extract_named_argument;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "rabbitmq-listener",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for method in body.methods.iter().filter(|m| m.has_annotation("RabbitListener")) {
        let decorator = method.annotation("RabbitListener").unwrap();
        let Some(queue) = extract_named_argument(&decorator.arguments, "queues").and_then(|raw| first_topic(&raw))
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
            payload: FindingPayload::MessageConsumer { channel: queue },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, Decorator};

    #[test]
    fn rabbit_listener_emits_message_consumer() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderQueueListener.java", b"class OrderQueueListener {}".to_vec());
        body.methods.push(crate::ast::MethodDecl {
            loc: file.locatable_at_line(2),
            name: "onMessage".into(),
            parameters: vec![],
            is_async: false,
            decorators: vec![Decorator {
                loc: file.locatable_at_line(1),
                name: "RabbitListener".into(),
                arguments: "queues = \"orders.queue\"".into(),
            }],
            owner: Some("OrderQueueListener".into()),
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "orders.queue"),
            _ => panic!("expected message-consumer payload"),
        }
    }
}
