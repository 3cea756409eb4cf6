//! `jaxrs-api`: JAX-RS resource classes annotated `@Path` become `component`
//! findings; methods carrying `@GET`/`@POST`/`@PUT`/`@DELETE` plus an
//! optional method-level `@Path` become `endpoint` findings.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::java::{annotation_path, join_paths};
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "jaxrs-api",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

const VERB_ANNOTATIONS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        let Some(class_path_decorator) = class.annotation("Path") else { continue };
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
        let class_path = annotation_path(class_path_decorator).unwrap_or_default();

        for method in body.methods.iter().filter(|m| m.owner.as_deref() == Some(class.name.as_str())) {
            let Some(verb) = VERB_ANNOTATIONS.iter().find(|v| method.has_annotation(v)) else { continue };
            let method_path = method
                .annotation("Path")
                .and_then(annotation_path)
                .unwrap_or_default();
            let path = join_paths(&class_path, &method_path);
            findings.push(Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Endpoint,
                fingerprint: Fingerprint::endpoint(component.clone(), verb, &path),
                confidence,
                loc: method.loc.clone(),
                payload: FindingPayload::Endpoint {
                    verb: verb.to_string(),
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
    fn jaxrs_resource_produces_component_and_endpoint() {
        let src = r#"
package com.example.orders;

@Path("/orders")
public class OrderResource {
    @GET
    @Path("/{id}")
    public Order getOrder(String id) {
        return null;
    }
}
"#;
        let file = FileEvidence::new("OrderResource.java", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Java).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.iter().filter(|f| f.kind == FindingKind::Component).count(), 1);
        let endpoint = findings.iter().find(|f| f.kind == FindingKind::Endpoint).unwrap();
        match &endpoint.payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "GET");
                assert_eq!(path, "/orders/{id}");
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
