//! `kafka-streams`: a `StreamsBuilder`-style `.stream("input-topic")` call
//! site becomes a `message-consumer` finding, and a chained `.to("output-
//! topic")` becomes a `message-producer` finding, both attributed to the
//! enclosing class of the method the call appears in.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "kafka-streams",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

fn owning_class<'a>(body: &'a crate::ast::AstBody, caller: &Option<String>) -> Option<&'a str> {
    let caller = caller.as_deref()?;
    body.methods.iter().find(|m| m.name == caller).and_then(|m| m.owner.as_deref())
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in &body.call_sites {
        let Some(owner) = owning_class(body, &call.caller) else { continue };
        match call.method.as_str() {
            "stream" => {
                let Some(topic) = extract_positional(&call.arguments, 0) else { continue };
                findings.push(Finding {
                    scanner_id: DESCRIPTOR.id,
                    kind: FindingKind::MessageConsumer,
                    fingerprint: Fingerprint::component(FindingKind::MessageConsumer, owner, LanguageTag::Java),
                    confidence,
                    loc: call.loc.clone(),
                    payload: FindingPayload::MessageConsumer { channel: topic },
                });
            }
            "to" => {
                let Some(topic) = extract_positional(&call.arguments, 0) else { continue };
                findings.push(Finding {
                    scanner_id: DESCRIPTOR.id,
                    kind: FindingKind::MessageProducer,
                    fingerprint: Fingerprint::component(FindingKind::MessageProducer, owner, LanguageTag::Java),
                    confidence,
                    loc: call.loc.clone(),
                    payload: FindingPayload::MessageProducer { channel: topic, target: None },
                });
            }
            _ => {}
        }
    }
    findings
}
