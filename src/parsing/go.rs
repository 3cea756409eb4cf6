//! Go parser adapter: struct declarations, (method) function
//! declarations, and call sites — the last of these is what the
//! `go-http-router` and `go-grpc-service` scanners pattern-match against
//! (`router.HandleFunc(...)`, `grpc.NewServer(...)`).

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{line_of, node_text, parameter_names};
use crate::ast::{Ast, AstBody, CallSite, DeclaredType, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

pub struct GoAdapter {
    grammar_ok: bool,
}

impl GoAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).ok()?;
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

impl Default for GoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for GoAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Go
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::Go(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::Go(body),
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

fn walk(node: Node, source: &[u8], file: &FileEvidence, current_fn: Option<&str>, body: &mut AstBody) {
    match node.kind() {
        "type_declaration" => {
            let mut cursor = node.walk();
            for spec in node.children(&mut cursor) {
                if spec.kind() != "type_spec" {
                    continue;
                }
                if let Some(name_node) = spec.child_by_field_name("name") {
                    let name = node_text(name_node, source).to_string();
                    body.types.push(DeclaredType {
                        loc: file.locatable_at_line(line_of(spec)),
                        name: name.clone(),
                        qualified_name: name,
                        superclass: None,
                        annotations: Vec::new(),
                    });
                }
            }
        }
        "function_declaration" | "method_declaration" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let parameters = node
                .child_by_field_name("parameters")
                .map(|p| parameter_names(p, source))
                .unwrap_or_default();
            let owner = node
                .child_by_field_name("receiver")
                .and_then(|r| r.named_child(0))
                .and_then(|p| p.child_by_field_name("type"))
                .map(|t| node_text(t, source).trim_start_matches('*').to_string());
            body.methods.push(MethodDecl {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                parameters,
                is_async: false,
                decorators: Vec::new(),
                owner,
            });
            if let Some(fn_body) = node.child_by_field_name("body") {
                let mut cursor = fn_body.walk();
                for child in fn_body.children(&mut cursor) {
                    walk(child, source, file, Some(&name), body);
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

fn call_site(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    current_fn: Option<&str>,
) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    let (receiver, method) = match function.kind() {
        "selector_expression" => {
            let operand = function.child_by_field_name("operand");
            let field = function.child_by_field_name("field")?;
            (
                operand.map(|o| node_text(o, source).to_string()),
                node_text(field, source).to_string(),
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

fn type_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^type\s+(\w+)\s+struct\b").unwrap())
}

fn func_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^func\s*(?:\(\s*\w+\s+\*?(\w+)\s*\))?\s*(\w+)\s*\(([^)]*)\)").unwrap()
    })
}

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\.(\w+)\(").unwrap())
}

/// Salvage path: recognizes struct declarations, function/method
/// signatures, and dotted call sites line by line.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;

    for cap in type_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.types.push(DeclaredType {
            loc: file.locatable_at_line(line),
            name: cap[1].to_string(),
            qualified_name: cap[1].to_string(),
            superclass: None,
            annotations: Vec::new(),
        });
    }

    for cap in func_re().captures_iter(&text) {
        found_any = true;
        let line = file.locatable_at(cap.get(0).unwrap().start()).line;
        body.methods.push(MethodDecl {
            loc: file.locatable_at_line(line),
            name: cap[2].to_string(),
            parameters: cap[3]
                .split(',')
                .filter_map(|p| p.trim().split_whitespace().next())
                .map(|s| s.to_string())
                .collect(),
            is_async: false,
            decorators: Vec::new(),
            owner: cap.get(1).map(|m| m.as_str().to_string()),
        });
    }

    for cap in call_re().captures_iter(&text) {
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

    found_any.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_captures_router_handlefunc_call() {
        let adapter = GoAdapter::new();
        let src = "package main\n\nfunc main() {\n\trouter := mux.NewRouter()\n\trouter.HandleFunc(\"/orders\", listOrders)\n}\n";
        let file = FileEvidence::new("main.go", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert!(body
            .call_sites
            .iter()
            .any(|c| c.method == "HandleFunc" && c.receiver.as_deref() == Some("router")));
    }

    #[test]
    fn grammar_captures_struct_and_method_receiver() {
        let adapter = GoAdapter::new();
        let src = "package main\n\ntype Order struct {\n\tID string\n}\n\nfunc (o *Order) Validate() error {\n\treturn nil\n}\n";
        let file = FileEvidence::new("order.go", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert_eq!(body.types[0].name, "Order");
        assert_eq!(body.methods[0].owner.as_deref(), Some("Order"));
    }
}
