//! Ruby parser adapter. Three distinct surfaces matter here: controller
//! classes with filter calls (`before_action`, `skip_before_action`), the
//! routes DSL (`resources`, `namespace`, `get`/`post`/... with a
//! `do...end` block) used by `config/routes.rb`, and Sidekiq worker
//! declarations (`include Sidekiq::Worker`, `sidekiq_options queue: ...`).
//! All three are represented as [`crate::ast::Directive`]s rather than
//! [`crate::ast::RouteDecl`]s because the DSL's nesting
//! (`namespace :api do resources :orders end`) only resolves to paths
//! once the scanner walks sibling directives, not at parse time.

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{line_of, node_text, parameter_names};
use crate::ast::{Ast, AstBody, DeclaredType, Directive, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

const ROUTE_VERBS: &[&str] = &[
    "resources", "resource", "namespace", "scope", "get", "post", "put", "patch", "delete",
    "root", "match", "collection", "member",
];

const FILTER_DIRECTIVES: &[&str] = &[
    "before_action",
    "after_action",
    "around_action",
    "skip_before_action",
    "skip_after_action",
];

/// Class-body calls that declare a mixin or worker configuration rather
/// than a route or filter: `include Sidekiq::Worker`, `sidekiq_options
/// queue: 'critical'`.
const MODULE_DIRECTIVES: &[&str] = &["include", "sidekiq_options"];

pub struct RubyAdapter {
    grammar_ok: bool,
}

impl RubyAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_ruby::LANGUAGE.into()).ok()?;
        let source = file.content();
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }
        let mut body = AstBody::default();
        let mut namespace = Vec::new();
        walk(root, source, file, None, &mut namespace, &mut body);
        Some(body)
    }
}

impl Default for RubyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for RubyAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Ruby
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::Ruby(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::Ruby(body),
                confidence: ParseConfidence::Low,
            }),
            None => Err(ParseError {
                path: file.path().to_path_buf(),
                reason: "neither the grammar nor the regex fallback could recover structure"
                    .to_string(),
            }),
        }
    }
}

fn walk(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    owner: Option<&str>,
    namespace: &mut Vec<String>,
    body: &mut AstBody,
) {
    match node.kind() {
        "class" | "module" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let superclass = node
                .child_by_field_name("superclass")
                .map(|n| node_text(n, source).trim_start_matches('<').trim().to_string());
            body.types.push(DeclaredType {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                qualified_name: name.clone(),
                superclass,
                annotations: Vec::new(),
            });
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, Some(&name), namespace, body);
            }
        }
        "method" | "singleton_method" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let parameters = node
                .child_by_field_name("parameters")
                .map(|p| parameter_names(p, source))
                .unwrap_or_default();
            body.methods.push(MethodDecl {
                loc: file.locatable_at_line(line_of(node)),
                name: node_text(name_node, source).to_string(),
                parameters,
                is_async: false,
                decorators: Vec::new(),
                owner: owner.map(|s| s.to_string()),
            });
        }
        "call" => {
            handle_call(node, source, file, owner, namespace, body);
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, owner, namespace, body);
            }
        }
    }
}

fn handle_call(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    owner: Option<&str>,
    namespace: &mut Vec<String>,
    body: &mut AstBody,
) {
    let Some(method_node) = node.child_by_field_name("method") else {
        return;
    };
    let method = node_text(method_node, source).to_string();
    let arguments = node
        .child_by_field_name("arguments")
        .map(|a| node_text(a, source).to_string())
        .unwrap_or_default();

    let is_route_verb = ROUTE_VERBS.contains(&method.as_str());
    let is_filter = FILTER_DIRECTIVES.contains(&method.as_str());
    let is_module_directive = MODULE_DIRECTIVES.contains(&method.as_str());

    if is_route_verb || is_filter || is_module_directive {
        let owner_path = if is_route_verb && !namespace.is_empty() {
            Some(namespace.join("/"))
        } else {
            owner.map(|s| s.to_string())
        };
        body.directives.push(Directive {
            loc: file.locatable_at_line(line_of(node)),
            name: method.clone(),
            arguments: arguments.clone(),
            owner: owner_path,
        });
    }

    let block = node.child_by_field_name("block");
    if is_route_verb && matches!(method.as_str(), "namespace" | "scope" | "resources") {
        let segment = first_bare_argument(&arguments);
        if let Some(segment) = segment {
            namespace.push(segment);
            if let Some(block) = block {
                walk_block(block, source, file, owner, namespace, body);
            }
            namespace.pop();
            return;
        }
    }
    if let Some(block) = block {
        walk_block(block, source, file, owner, namespace, body);
    }
}

fn walk_block(
    block: Node,
    source: &[u8],
    file: &FileEvidence,
    owner: Option<&str>,
    namespace: &mut Vec<String>,
    body: &mut AstBody,
) {
    let mut cursor = block.walk();
    for child in block.children(&mut cursor) {
        walk(child, source, file, owner, namespace, body);
    }
}

fn first_bare_argument(arguments: &str) -> Option<String> {
    let trimmed = arguments.trim().trim_start_matches('(').trim_end_matches(')');
    let first = trimmed.split(',').next()?.trim();
    let first = first.trim_start_matches(':');
    let first = first.trim_matches(['"', '\'']);
    (!first.is_empty()).then(|| first.to_string())
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*class\s+(\w+)(?:\s*<\s*([\w:]+))?").unwrap())
}

fn def_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*def\s+(?:self\.)?(\w+[?!]?)\s*(?:\(([^)]*)\))?").unwrap())
}

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*(resources|resource|namespace|scope|get|post|put|patch|delete|root|match|before_action|after_action|around_action|skip_before_action|skip_after_action|include|sidekiq_options)\s+(.*)$",
        )
        .unwrap()
    })
}

/// Salvage path: line-oriented recognition of classes, methods, and
/// route/filter directives, with no nesting resolution.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;

    for cap in class_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.types.push(DeclaredType {
            loc: file.locatable_at_line(line),
            name: cap[1].to_string(),
            qualified_name: cap[1].to_string(),
            superclass: cap.get(2).map(|m| m.as_str().to_string()),
            annotations: Vec::new(),
        });
    }

    for cap in def_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.methods.push(MethodDecl {
            loc: file.locatable_at_line(line),
            name: cap[1].to_string(),
            parameters: cap
                .get(2)
                .map(|m| {
                    m.as_str()
                        .split(',')
                        .map(|p| p.trim().trim_start_matches(':').to_string())
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            is_async: false,
            decorators: Vec::new(),
            owner: None,
        });
    }

    for cap in directive_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.directives.push(Directive {
            loc: file.locatable_at_line(line),
            name: cap[1].to_string(),
            arguments: cap[2].trim_end_matches(" do").to_string(),
            owner: None,
        });
    }

    found_any.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_expands_nested_namespace_resources() {
        let adapter = RubyAdapter::new();
        let src = "Rails.application.routes.draw do\n  namespace :api do\n    resources :orders\n  end\nend\n";
        let file = FileEvidence::new("routes.rb", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        let orders = body.directives.iter().find(|d| d.name == "resources").unwrap();
        assert_eq!(orders.owner.as_deref(), Some("api"));
    }

    #[test]
    fn grammar_captures_controller_filter() {
        let adapter = RubyAdapter::new();
        let src = "class OrdersController < ApplicationController\n  before_action :authenticate, only: [:show]\nend\n";
        let file = FileEvidence::new("orders_controller.rb", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        let filter = body.directives.iter().find(|d| d.name == "before_action").unwrap();
        assert_eq!(filter.owner.as_deref(), Some("OrdersController"));
    }

    #[test]
    fn grammar_captures_sidekiq_worker_mixin_and_options() {
        let adapter = RubyAdapter::new();
        let src = "class HardWorker\n  include Sidekiq::Worker\n  sidekiq_options queue: :critical\n\n  def perform(id)\n  end\nend\n";
        let file = FileEvidence::new("hard_worker.rb", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        let include = body.directives.iter().find(|d| d.name == "include").unwrap();
        assert_eq!(include.owner.as_deref(), Some("HardWorker"));
        assert!(include.arguments.contains("Sidekiq::Worker"));
        let options = body.directives.iter().find(|d| d.name == "sidekiq_options").unwrap();
        assert_eq!(options.owner.as_deref(), Some("HardWorker"));
    }
}
