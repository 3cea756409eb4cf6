//! `rails-api`: classes whose superclass names a Rails controller base
//! (`ApplicationController`, `ActionController::Base`, ...) become
//! `component` findings. Filter directives (`before_action`, ...) are
//! recovered by the adapter regardless of parse path and require no
//! superclass resolution, so this scanner degrades gracefully when the
//! grammar fails on an unrelated malformed method and falls back to the
//! line-oriented regex recognizer.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "rails-api",
    language: LanguageTag::Ruby,
    matches: |path| has_extension(path, "rb"),
    scan,
};

fn is_controller(superclass: &Option<String>) -> bool {
    superclass.as_deref().is_some_and(|s| s.contains("Controller"))
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Ruby(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);

    body.types
        .iter()
        .filter(|t| is_controller(&t.superclass))
        .map(|t| Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: Fingerprint::component(FindingKind::Component, &t.name, LanguageTag::Ruby),
            confidence,
            loc: t.loc.clone(),
            payload: FindingPayload::Component { name: t.name.clone() },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn controller_subclass_emits_component() {
        let src = "class OrdersController < ApplicationController\n  before_action :authenticate\n\n  def index\n  end\nend\n";
        let file = FileEvidence::new("orders_controller.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Component { name } => assert_eq!(name, "OrdersController"),
            _ => panic!("expected component payload"),
        }
    }

    #[test]
    fn malformed_method_falls_back_to_low_confidence_controller_detection() {
        let src = "class OrdersController < ApplicationController\n  before_action :authenticate\n\n  def index(\nend\n";
        let file = FileEvidence::new("orders_controller.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        assert_eq!(parsed.confidence, ParseConfidence::Low);
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].confidence, crate::model::Confidence::Low);
        let body = parsed.ast.body();
        assert!(body.directives.iter().any(|d| d.name == "before_action"));
    }
}
