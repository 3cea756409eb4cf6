//! `rails-routes` (§4.3, §8 scenario 1): expands the routes DSL recovered
//! by the Ruby adapter into `endpoint` findings. `resources :x` expands to
//! the seven RESTful actions; `resource :x` (singular) expands to the same
//! six minus `index`. `namespace :admin` nesting (already resolved to a
//! `/`-joined owner path by the adapter) prefixes both the route path and
//! the handler reference.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::file_name_is};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "rails-routes",
    language: LanguageTag::Ruby,
    matches: |path| file_name_is(path, "routes.rb"),
    scan,
};

struct Action {
    verb: &'static str,
    path_suffix: &'static str,
}

const PLURAL_ACTIONS: &[Action] = &[
    Action { verb: "GET", path_suffix: "" },
    Action { verb: "GET", path_suffix: "/new" },
    Action { verb: "POST", path_suffix: "" },
    Action { verb: "GET", path_suffix: "/:id" },
    Action { verb: "GET", path_suffix: "/:id/edit" },
    Action { verb: "PATCH", path_suffix: "/:id" },
    Action { verb: "DELETE", path_suffix: "/:id" },
];

const SINGULAR_ACTIONS: &[Action] = &[
    Action { verb: "GET", path_suffix: "/new" },
    Action { verb: "POST", path_suffix: "" },
    Action { verb: "GET", path_suffix: "" },
    Action { verb: "GET", path_suffix: "/edit" },
    Action { verb: "PATCH", path_suffix: "" },
    Action { verb: "DELETE", path_suffix: "" },
];

const VERB_DIRECTIVES: &[&str] = &["get", "post", "put", "patch", "delete"];

/// First bare argument of a routes-DSL call, e.g. `:posts` or `"/login"`,
/// with the leading `:` (symbol) or surrounding quotes (string) stripped.
/// Mirrors the Ruby adapter's own `first_bare_argument`, since the adapter
/// hands scanners raw argument text rather than a parsed symbol/string node.
fn bare_argument(arguments: &str) -> Option<String> {
    let trimmed = arguments.trim().trim_start_matches('(').trim_end_matches(')');
    let first = trimmed.split(',').next()?.trim();
    let first = first.trim_start_matches(':');
    let first = first.trim_matches(['"', '\'']);
    (!first.is_empty()).then(|| first.to_string())
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Ruby(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for directive in &body.directives {
        let prefix = directive.owner.as_deref().unwrap_or("");
        match directive.name.as_str() {
            "resources" | "resource" => {
                let Some(resource) = bare_argument(&directive.arguments) else { continue };
                let actions = if directive.name == "resources" { PLURAL_ACTIONS } else { SINGULAR_ACTIONS };
                let handler = if prefix.is_empty() { resource.clone() } else { format!("{prefix}/{resource}") };
                let base_path = format!("/{handler}");
                let component = Fingerprint::component(FindingKind::Component, &handler, LanguageTag::Ruby);
                let Fingerprint::Component(component) = component else { unreachable!() };
                for action in actions {
                    let path = format!("{base_path}{}", action.path_suffix);
                    findings.push(Finding {
                        scanner_id: DESCRIPTOR.id,
                        kind: FindingKind::Endpoint,
                        fingerprint: Fingerprint::endpoint(component.clone(), action.verb, &path),
                        confidence,
                        loc: directive.loc.clone(),
                        payload: FindingPayload::Endpoint {
                            verb: action.verb.to_string(),
                            path,
                            handler: Some(handler.clone()),
                        },
                    });
                }
            }
            name if VERB_DIRECTIVES.contains(&name) => {
                let Some(route_path) = bare_argument(&directive.arguments) else { continue };
                let path = if prefix.is_empty() {
                    format!("/{route_path}")
                } else {
                    format!("/{prefix}/{route_path}")
                };
                let verb = name.to_uppercase();
                let component = Fingerprint::component(FindingKind::Component, &path, LanguageTag::Ruby);
                let Fingerprint::Component(component) = component else { unreachable!() };
                findings.push(Finding {
                    scanner_id: DESCRIPTOR.id,
                    kind: FindingKind::Endpoint,
                    fingerprint: Fingerprint::endpoint(component, &verb, &path),
                    confidence,
                    loc: directive.loc.clone(),
                    payload: FindingPayload::Endpoint { verb, path, handler: None },
                });
            }
            _ => {}
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{ParserAdapter, registry::get_registry};

    #[test]
    fn resources_posts_expands_to_seven_endpoints() {
        let src = "Rails.application.routes.draw do\n  resources :posts\nend\n";
        let file = FileEvidence::new("routes.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        assert_eq!(findings.len(), 7);
        let pairs: Vec<(String, String)> = findings
            .iter()
            .map(|f| match &f.payload {
                FindingPayload::Endpoint { verb, path, .. } => (verb.clone(), path.clone()),
                _ => unreachable!(),
            })
            .collect();
        assert!(pairs.contains(&("GET".to_string(), "/posts".to_string())));
        assert!(pairs.contains(&("GET".to_string(), "/posts/new".to_string())));
        assert!(pairs.contains(&("POST".to_string(), "/posts".to_string())));
        assert!(pairs.contains(&("GET".to_string(), "/posts/:id".to_string())));
        assert!(pairs.contains(&("GET".to_string(), "/posts/:id/edit".to_string())));
        assert!(pairs.contains(&("PATCH".to_string(), "/posts/:id".to_string())));
        assert!(pairs.contains(&("DELETE".to_string(), "/posts/:id".to_string())));
        assert!(findings.iter().all(|f| matches!(&f.payload, FindingPayload::Endpoint { handler, .. } if handler.as_deref() == Some("posts"))));
    }

    #[test]
    fn namespace_prefixes_resources_path_and_handler() {
        let src = "Rails.application.routes.draw do\n  namespace :api do\n    resources :orders\n  end\nend\n";
        let file = FileEvidence::new("routes.rb", src.as_bytes().to_vec());
        let registry = get_registry();
        let adapter = registry.read().unwrap().get(LanguageTag::Ruby).unwrap();
        let parsed = adapter.parse(&file).unwrap();
        let findings = scan(&file, Some(&parsed.ast), parsed.confidence);
        let index = findings
            .iter()
            .find(|f| matches!(&f.payload, FindingPayload::Endpoint { verb, path, .. } if verb == "GET" && path == "/api/orders"))
            .unwrap();
        match &index.payload {
            FindingPayload::Endpoint { handler, .. } => assert_eq!(handler.as_deref(), Some("api/orders")),
            _ => unreachable!(),
        }
    }
}
