//! `flask-routes`: `@app.route(path, methods=[...])` decorators become
//! one `endpoint` finding per HTTP method (defaulting to `GET` when
//! `methods` is omitted, per Flask's own default).

use crate::ast::Ast;
use crate::ast::{extract_named_argument, extract_positional};
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "flask-routes",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

fn methods_from(decorator_args: &str) -> Vec<String> {
    match extract_named_argument(decorator_args, "methods") {
        Some(list) => list
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|s| s.trim().trim_matches(['"', '\'']).to_uppercase())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec!["GET".to_string()],
    }
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for method in &body.methods {
        let Some(decorator) = method.decorators.iter().find(|d| d.name == "route") else { continue };
        let Some(path) = extract_positional(&decorator.arguments, 0) else { continue };
        let component_name = method.owner.clone().unwrap_or_else(|| "app".to_string());
        let component = Fingerprint::component(FindingKind::Component, &component_name, LanguageTag::Python);
        let Fingerprint::Component(component) = component else { unreachable!() };
        for verb in methods_from(&decorator.arguments) {
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Endpoint,
                fingerprint: Fingerprint::endpoint(component.clone(), &verb, &path),
                confidence,
                loc: method.loc.clone(),
                payload: FindingPayload::Endpoint { verb, path: path.clone(), handler: Some(method.name.clone()) },
            });
        }
    }
    findings
}
