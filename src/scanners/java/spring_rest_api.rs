//! `spring-rest-api` (§4.3, §8 scenario 2): classes annotated
//! `@RestController`/`@Controller` become `component` findings; methods
//! annotated `@GetMapping`/`@PostMapping`/`@PutMapping`/`@DeleteMapping`/
//! `@RequestMapping` become `endpoint` findings with the class-level and
//! method-level paths concatenated.

use crate::ast::Ast;
use crate::ast::extract_named_argument;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::java::{annotation_path, join_paths};
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "spring-rest-api",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

const VERB_ANNOTATIONS: &[(&str, &str)] = &[
    ("GetMapping", "GET"),
    ("PostMapping", "POST"),
    ("PutMapping", "PUT"),
    ("DeleteMapping", "DELETE"),
    ("PatchMapping", "PATCH"),
];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        let is_controller = class.has_annotation("RestController") || class.has_annotation("Controller");
        if !is_controller {
            continue;
        }
        let component_fp = Fingerprint::component(FindingKind::Component, &class.qualified_name, LanguageTag::Java);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: component_fp.clone(),
            confidence,
            loc: class.loc.clone(),
            payload: FindingPayload::Component { name: class.name.clone() },
        });
        let component = match &component_fp {
            Fingerprint::Component(c) => c.clone(),
            _ => unreachable!(),
        };
        let class_path = class
            .annotation("RequestMapping")
            .and_then(annotation_path)
            .unwrap_or_default();

        for method in body.methods.iter().filter(|m| m.owner.as_deref() == Some(class.name.as_str())) {
            let verb_annotation = VERB_ANNOTATIONS
                .iter()
                .find(|(name, _)| method.has_annotation(name))
                .map(|(name, verb)| (*name, *verb))
                .or_else(|| method.has_annotation("RequestMapping").then_some(("RequestMapping", "GET")));
            let Some((annotation_name, default_verb)) = verb_annotation else {
                continue;
            };
            let decorator = method.annotation(annotation_name).unwrap();
            let verb = if annotation_name == "RequestMapping" {
                extract_named_argument(&decorator.arguments, "method")
                    .map(|m| m.trim_start_matches("RequestMethod.").to_string())
                    .unwrap_or_else(|| default_verb.to_string())
            } else {
                default_verb.to_string()
            };
            let method_path = annotation_path(decorator).unwrap_or_default();
            let path = join_paths(&class_path, &method_path);
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Endpoint,
                fingerprint: Fingerprint::endpoint(component.clone(), &verb, &path),
                confidence,
                loc: method.loc.clone(),
                payload: FindingPayload::Endpoint {
                    verb,
                    path,
                    handler: Some(method.name.clone()),
                },
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn spring_controller_produces_component_and_endpoint() {
        let src = r#"
package com.example.orders;

@RestController
@RequestMapping("/api/v1/orders")
public class OrderController {
    @GetMapping("/{id}")
    public Order getOrder(String id) {
        return null;
    }
}
"#;
        let file = FileEvidence::new("OrderController.java", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Java).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::Component).count(), 1);
        let endpoint = findings.iter().find(|f| f.kind == FindingKind::Endpoint).unwrap();
        match &endpoint.payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "GET");
                assert_eq!(path, "/api/v1/orders/{id}");
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
