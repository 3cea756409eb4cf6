//! `aspnet-core-api` (§4.3, §8 scenario 3): classes annotated
//! `[ApiController]`/`[Route(...)]` become `component` findings; methods
//! annotated `[HttpGet]`/`[HttpPost]`/`[HttpPut]`/`[HttpDelete]`/`[HttpPatch]`
//! become `endpoint` findings, with `[controller]` in the route template
//! substituted by the class name minus its `Controller` suffix.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::dotnet::attribute_path;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "aspnet-core-api",
    language: LanguageTag::CSharp,
    matches: |path| has_extension(path, "cs"),
    scan,
};

const VERB_ATTRIBUTES: &[(&str, &str)] = &[
    ("HttpGet", "GET"),
    ("HttpPost", "POST"),
    ("HttpPut", "PUT"),
    ("HttpDelete", "DELETE"),
    ("HttpPatch", "PATCH"),
];

fn join_paths(base: &str, rest: &str) -> String {
    let base = base.trim_start_matches('/').trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    match (base.is_empty(), rest.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => format!("/{base}"),
        (true, false) => format!("/{rest}"),
        (false, false) => format!("/{base}/{rest}"),
    }
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::CSharp(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for class in &body.types {
        if !class.has_annotation("ApiController") {
            continue;
        }
        let component_fp = Fingerprint::component(FindingKind::Component, &class.qualified_name, LanguageTag::CSharp);
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
        let controller_token = class.name.strip_suffix("Controller").unwrap_or(&class.name);
        let class_path = class
            .annotation("Route")
            .and_then(attribute_path)
            .unwrap_or_default()
            .replace("[controller]", controller_token);

        for method in body.methods.iter().filter(|m| m.owner.as_deref() == Some(class.name.as_str())) {
            let Some((attr_name, verb)) = VERB_ATTRIBUTES.iter().find(|(name, _)| method.has_annotation(name))
            else {
                continue;
            };
            let decorator = method.annotation(attr_name).unwrap();
            let method_path = attribute_path(decorator).unwrap_or_default();
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
    fn controller_token_is_substituted_and_suffix_stripped() {
        let src = r#"
[ApiController]
[Route("api/v1/[controller]")]
public class ProductController : ControllerBase {
    [HttpGet]
    public Product Get() { return null; }
}
"#;
        let file = FileEvidence::new("ProductController.cs", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::CSharp).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        let endpoint = findings.iter().find(|f| f.kind == FindingKind::Endpoint).unwrap();
        match &endpoint.payload {
            FindingPayload::Endpoint { verb, path, .. } => {
                assert_eq!(verb, "GET");
                assert_eq!(path, "/api/v1/Product");
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
