//! `faust-streams`: async functions decorated `@app.agent(...)` become
//! `message-consumer` findings, with the topic resolved from the first
//! quoted literal in the decorator's argument text (covers both a direct
//! `@app.agent('orders')` and the more idiomatic
//! `@app.agent(app.topic('orders'))`). A `<name>.send(...)` call site on a
//! `*_topic`-named variable becomes a `message-producer` finding, by the
//! common Faust convention of naming a topic handle `orders_topic`.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "faust-streams",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

fn quoted_literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap())
}

fn topic_literal(args: &str) -> Option<String> {
    quoted_literal_re().captures(args).map(|c| c[1].to_string())
}

fn channel_from_receiver(receiver: &str) -> String {
    receiver.strip_suffix("_topic").unwrap_or(receiver).to_string()
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for method in &body.methods {
        let Some(decorator) = method.decorators.iter().find(|d| d.name == "agent") else { continue };
        let Some(topic) = topic_literal(&decorator.arguments) else { continue };
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageConsumer,
            fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &method.name, LanguageTag::Python),
            confidence,
            loc: method.loc.clone(),
            payload: FindingPayload::MessageConsumer { channel: topic },
        });
    }

    for call in body.call_sites.iter().filter(|c| c.method == "send") {
        let Some(receiver) = &call.receiver else { continue };
        if !receiver.ends_with("_topic") {
            continue;
        }
        let channel = channel_from_receiver(receiver);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageProducer,
            fingerprint: Fingerprint::component(FindingKind::MessageProducer, receiver, LanguageTag::Python),
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::MessageProducer { channel, target: None },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn agent_decorator_with_topic_literal_emits_consumer() {
        let src = "@app.agent(app.topic('orders'))\nasync def process(stream):\n    pass\n";
        let file = FileEvidence::new("streams.py", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Python).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "orders"),
            _ => panic!("expected message-consumer payload"),
        }
    }

    #[test]
    fn send_on_topic_named_variable_emits_producer() {
        let src = "async def publish(order):\n    orders_topic.send(value=order)\n";
        let file = FileEvidence::new("streams.py", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Python).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        let producer = findings.iter().find(|f| f.kind == FindingKind::MessageProducer).unwrap();
        match &producer.payload {
            FindingPayload::MessageProducer { channel, .. } => assert_eq!(channel, "orders"),
            _ => panic!("expected message-producer payload"),
        }
    }
}
