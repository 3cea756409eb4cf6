//! JavaScript parser adapter: Express-style route registration
//! (`app.get(...)`, `router.post(...)`) read as call sites, plus class
//! and method declarations for whatever structure a repo layers on top.

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{line_of, node_text, parameter_names};
use crate::ast::{Ast, AstBody, CallSite, DeclaredType, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

pub struct JavaScriptAdapter {
    grammar_ok: bool,
}

impl JavaScriptAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .ok()?;
        let source = file.content();
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }
        let mut body = AstBody::default();
        walk(root, source, file, None, &mut body);
        Some(body)
    }
}

impl Default for JavaScriptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for JavaScriptAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::JavaScript
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::JavaScript(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::JavaScript(body),
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

pub(super) fn walk(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    current_fn: Option<&str>,
    body: &mut AstBody,
) {
    match node.kind() {
        "class_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let superclass = node
                .child_by_field_name("heritage")
                .and_then(|h| h.named_child(0))
                .map(|n| node_text(n, source).to_string());
            body.types.push(DeclaredType {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                qualified_name: name,
                superclass,
                annotations: Vec::new(),
            });
            if let Some(class_body) = node.child_by_field_name("body") {
                let mut cursor = class_body.walk();
                for child in class_body.children(&mut cursor) {
                    walk(child, source, file, current_fn, body);
                }
            }
        }
        "method_definition" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let is_async = node.child(0).map(|c| c.kind() == "async").unwrap_or(false);
            let parameters = node
                .child_by_field_name("parameters")
                .map(|p| parameter_names(p, source))
                .unwrap_or_default();
            body.methods.push(MethodDecl {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                parameters,
                is_async,
                decorators: Vec::new(),
                owner: None,
            });
            if let Some(fn_body) = node.child_by_field_name("body") {
                let mut cursor = fn_body.walk();
                for child in fn_body.children(&mut cursor) {
                    walk(child, source, file, Some(&name), body);
                }
            }
        }
        "function_declaration" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());
            if let Some(fn_body) = node.child_by_field_name("body") {
                let mut cursor = fn_body.walk();
                for child in fn_body.children(&mut cursor) {
                    walk(child, source, file, name.as_deref(), body);
                }
            }
        }
        "call_expression" => {
            if let Some(call) = call_site(node, source, file, current_fn) {
                body.call_sites.push(call);
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, current_fn, body);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, current_fn, body);
            }
        }
    }
}

pub(super) fn call_site(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    current_fn: Option<&str>,
) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    let (receiver, method) = match function.kind() {
        "member_expression" => {
            let object = function.child_by_field_name("object");
            let property = function.child_by_field_name("property")?;
            (
                object.map(|o| node_text(o, source).to_string()),
                node_text(property, source).to_string(),
            )
        }
        "identifier" => (None, node_text(function, source).to_string()),
        _ => return None,
    };
    let arguments = node
        .child_by_field_name("arguments")
        .map(|a| {
            node_text(a, source)
                .trim_start_matches('(')
                .trim_end_matches(')')
                .to_string()
        })
        .unwrap_or_default();
    Some(CallSite {
        loc: file.locatable_at_line(line_of(node)),
        receiver,
        method,
        arguments,
        caller: current_fn.map(|s| s.to_string()),
    })
}

fn route_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\.(get|post|put|patch|delete|use|all)\s*\(").unwrap())
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*class\s+(\w+)(?:\s+extends\s+(\w+))?").unwrap())
}

/// Salvage path: recognizes `receiver.verb(...)` route registrations and
/// bare class declarations by text shape alone.
pub(super) fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;

    for cap in route_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.call_sites.push(CallSite {
            loc: file.locatable_at_line(line),
            receiver: Some(cap[1].to_string()),
            method: cap[2].to_string(),
            arguments: String::new(),
            caller: None,
        });
    }

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

    found_any.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_captures_express_route_registration() {
        let adapter = JavaScriptAdapter::new();
        let src = "const router = express.Router();\nrouter.get('/orders', listOrders);\n";
        let file = FileEvidence::new("routes.js", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert!(body
            .call_sites
            .iter()
            .any(|c| c.method == "get" && c.receiver.as_deref() == Some("router")));
    }
}
