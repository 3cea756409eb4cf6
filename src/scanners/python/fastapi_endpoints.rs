//! `fastapi-endpoints`: `APIRouter`/`FastAPI`-style decorators
//! (`@app.get`, `@router.post`, ...) become `endpoint` findings. The
//! router/app variable name, capitalized, stands in for the owning
//! component since FastAPI has no class-based controller.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "fastapi-endpoints",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

const VERBS: &[&str] = &["get", "post", "put", "delete", "patch"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for method in &body.methods {
        let Some(decorator) = method
            .decorators
            .iter()
            .find(|d| VERBS.contains(&d.name.as_str()))
        else {
            continue;
        };
        let Some(path) = extract_positional(&decorator.arguments, 0) else { continue };
        let component_name = method.owner.clone().unwrap_or_else(|| "app".to_string());
        let component = Fingerprint::component(FindingKind::Component, &component_name, LanguageTag::Python);
        let Fingerprint::Component(component) = component else { unreachable!() };
        let verb = decorator.name.to_uppercase();
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Endpoint,
            fingerprint: Fingerprint::endpoint(component, &verb, &path),
            confidence,
            loc: method.loc.clone(),
            payload: FindingPayload::Endpoint { verb, path, handler: Some(method.name.clone()) },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn app_get_decorator_emits_endpoint() {
        let src = "from fastapi import FastAPI\napp = FastAPI()\n\n@app.get(\"/orders/{id}\")\ndef get_order(id: str):\n    return {}\n";
        let file = FileEvidence::new("main.py", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Python).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "GET");
                assert_eq!(path, "/orders/{id}");
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
