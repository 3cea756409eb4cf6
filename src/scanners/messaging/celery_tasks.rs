//! `celery-tasks` (§4.3, §8 scenario 4): functions decorated
//! `@shared_task`/`@app.task` become `message-consumer` findings, with the
//! queue resolved from a `queue=` argument (default `celery`).
//! `.delay(...)`/`.apply_async(...)` call sites against the task's name
//! become `message-producer` findings on the same queue. The queue is
//! only known precisely when the call site's file also declares the task
//! (same-file resolution); a call site referring to a task declared
//! elsewhere falls back to the default queue, matching Celery's own
//! default routing when no queue override is visible.

use crate::ast::Ast;
use crate::ast::extract_named_argument;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};
use std::collections::HashMap;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "celery-tasks",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

const TASK_DECORATORS: &[&str] = &["shared_task", "task"];
const PRODUCER_METHODS: &[&str] = &["delay", "apply_async"];
const DEFAULT_QUEUE: &str = "celery";

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();
    let mut tasks: HashMap<String, String> = HashMap::new();

    for method in &body.methods {
        let Some(decorator) = method.decorators.iter().find(|d| TASK_DECORATORS.contains(&d.name.as_str())) else {
            continue;
        };
        let queue = extract_named_argument(&decorator.arguments, "queue").unwrap_or_else(|| DEFAULT_QUEUE.to_string());
        tasks.insert(method.name.clone(), queue.clone());
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageConsumer,
            fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &method.name, LanguageTag::Python),
            confidence,
            loc: method.loc.clone(),
            payload: FindingPayload::MessageConsumer { channel: queue },
        });
    }

    for call in body.call_sites.iter().filter(|c| PRODUCER_METHODS.contains(&c.method.as_str())) {
        let Some(receiver) = &call.receiver else { continue };
        let queue = tasks.get(receiver).cloned().unwrap_or_else(|| DEFAULT_QUEUE.to_string());
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageProducer,
            fingerprint: Fingerprint::component(FindingKind::MessageProducer, receiver, LanguageTag::Python),
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::MessageProducer { channel: queue, target: Some(receiver.clone()) },
        });
    }
    findings
}
