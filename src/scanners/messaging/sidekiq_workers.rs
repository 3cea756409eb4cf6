//! `sidekiq-workers`: a class that `include`s `Sidekiq::Worker` and
//! declares a `perform` method becomes a `message-consumer` finding, with
//! the queue resolved from a `sidekiq_options queue: ...` directive
//! (default `default`, Sidekiq's own default queue name).

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "sidekiq-workers",
    language: LanguageTag::Ruby,
    matches: |path| has_extension(path, "rb"),
    scan,
};

const DEFAULT_QUEUE: &str = "default";

fn queue_from_options(args: &str) -> Option<String> {
    let idx = args.find("queue:")?;
    let rest = args[idx + "queue:".len()..].trim();
    let first = rest.split(',').next()?.trim();
    let first = first.trim_start_matches(':').trim_matches(['"', '\'']);
    (!first.is_empty()).then(|| first.to_string())
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Ruby(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        let includes_worker = body
            .directives
            .iter()
            .any(|d| d.owner.as_deref() == Some(class.name.as_str()) && d.name == "include" && d.arguments.contains("Sidekiq::Worker"));
        if !includes_worker {
            continue;
        }
        let has_perform = body
            .methods
            .iter()
            .any(|m| m.owner.as_deref() == Some(class.name.as_str()) && m.name == "perform");
        if !has_perform {
            continue;
        }
        let queue = body
            .directives
            .iter()
            .find(|d| d.owner.as_deref() == Some(class.name.as_str()) && d.name == "sidekiq_options")
            .and_then(|d| queue_from_options(&d.arguments))
            .unwrap_or_else(|| DEFAULT_QUEUE.to_string());
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::MessageConsumer,
            fingerprint: Fingerprint::component(FindingKind::MessageConsumer, &class.qualified_name, LanguageTag::Ruby),
            confidence,
            loc: class.loc.clone(),
            payload: FindingPayload::MessageConsumer { channel: queue },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn worker_with_sidekiq_options_resolves_declared_queue() {
        let src = "class HardWorker\n  include Sidekiq::Worker\n  sidekiq_options queue: :critical\n\n  def perform(id)\n  end\nend\n";
        let file = FileEvidence::new("hard_worker.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "critical"),
            _ => panic!("expected message-consumer payload"),
        }
    }

    #[test]
    fn worker_without_sidekiq_options_defaults_to_default_queue() {
        let src = "class PlainWorker\n  include Sidekiq::Worker\n\n  def perform(id)\n  end\nend\n";
        let file = FileEvidence::new("plain_worker.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        match &findings[0].payload {
            FindingPayload::MessageConsumer { channel } => assert_eq!(channel, "default"),
            _ => panic!("expected message-consumer payload"),
        }
    }

    #[test]
    fn class_without_perform_method_is_not_a_worker() {
        let src = "class NotAWorker\n  include Sidekiq::Worker\nend\n";
        let file = FileEvidence::new("not_a_worker.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert!(findings.is_empty());
    }
}
