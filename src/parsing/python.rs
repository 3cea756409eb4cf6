//! Python parser adapter. Covers Django, Flask, FastAPI, SQLAlchemy and
//! Celery idioms: class superclasses (`models.Model`, `Base`), decorators
//! (`@app.route`, `@shared_task`), and call sites (`.delay(...)`,
//! `.apply_async(...)`) that the messaging and ORM scanner families key
//! off of.

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{line_of, node_text, parameter_names};
use crate::ast::{Ast, AstBody, CallSite, DeclaredType, Decorator, Directive, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

pub struct PythonAdapter {
    grammar_ok: bool,
}

impl PythonAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::LANGUAGE.into()).ok()?;
        let source = file.content();
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }
        let mut body = AstBody::default();
        walk(root, source, file, None, None, &mut body);
        Some(body)
    }
}

impl Default for PythonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for PythonAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Python
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::Python(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::Python(body),
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
    current_class: Option<&str>,
    current_fn: Option<&str>,
    body: &mut AstBody,
) {
    match node.kind() {
        "decorated_definition" => {
            let decorators = decorator_children(node, source, file);
            if let Some(inner) = node.child_by_field_name("definition") {
                handle_definition(inner, source, file, &decorators, current_class, current_fn, body);
            }
        }
        "class_definition" | "function_definition" => {
            handle_definition(node, source, file, &[], current_class, current_fn, body);
        }
        "call" => {
            if let Some(call) = call_site(node, source, file, current_fn) {
                body.call_sites.push(call);
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, current_class, current_fn, body);
            }
        }
        "assignment" if current_class.is_some() && current_fn.is_none() => {
            if let Some(directive) = field_assignment(node, source, file, current_class.unwrap()) {
                body.directives.push(directive);
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, current_class, current_fn, body);
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, current_class, current_fn, body);
            }
        }
    }
}

/// Recognizes Django/SQLAlchemy class-body field assignments of the shape
/// `field = models.ForeignKey(Target, ...)`, recording the call's callee
/// name (`ForeignKey`) as a directive owned by the enclosing class.
fn field_assignment(node: Node, source: &[u8], file: &FileEvidence, owner: &str) -> Option<Directive> {
    let right = node.child_by_field_name("right")?;
    if right.kind() != "call" {
        return None;
    }
    let function = right.child_by_field_name("function")?;
    let name = last_segment(function, source);
    let arguments = right
        .child_by_field_name("arguments")
        .map(|a| node_text(a, source).trim_start_matches('(').trim_end_matches(')').to_string())
        .unwrap_or_default();
    Some(Directive {
        loc: file.locatable_at_line(line_of(node)),
        name,
        arguments,
        owner: Some(owner.to_string()),
    })
}

fn handle_definition(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    decorators: &[Decorator],
    current_class: Option<&str>,
    current_fn: Option<&str>,
    body: &mut AstBody,
) {
    match node.kind() {
        "class_definition" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let superclass = node
                .child_by_field_name("superclasses")
                .and_then(|args| args.named_child(0))
                .map(|n| node_text(n, source).to_string());
            body.types.push(DeclaredType {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                qualified_name: name.clone(),
                superclass,
                annotations: decorators.to_vec(),
            });
            if let Some(class_body) = node.child_by_field_name("body") {
                let mut cursor = class_body.walk();
                for child in class_body.children(&mut cursor) {
                    walk(child, source, file, Some(&name), current_fn, body);
                }
            }
        }
        "function_definition" => {
            let Some(name_node) = node.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let is_async = node
                .child(0)
                .map(|c| c.kind() == "async")
                .unwrap_or(false);
            let parameters = node
                .child_by_field_name("parameters")
                .map(|p| parameter_names(p, source))
                .unwrap_or_default();
            body.methods.push(MethodDecl {
                loc: file.locatable_at_line(line_of(node)),
                name: name.clone(),
                parameters,
                is_async,
                decorators: decorators.to_vec(),
                owner: current_class.map(|s| s.to_string()),
            });
            if let Some(fn_body) = node.child_by_field_name("body") {
                let mut cursor = fn_body.walk();
                for child in fn_body.children(&mut cursor) {
                    walk(child, source, file, current_class, Some(&name), body);
                }
            }
        }
        _ => {}
    }
}

fn decorator_children(node: Node, source: &[u8], file: &FileEvidence) -> Vec<Decorator> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .filter_map(|d| decorator_info(d, source, file))
        .collect()
}

fn decorator_info(decorator: Node, source: &[u8], file: &FileEvidence) -> Option<Decorator> {
    let expr = decorator.named_child(0)?;
    let (name, arguments) = match expr.kind() {
        "call" => {
            let function = expr.child_by_field_name("function")?;
            let name = last_segment(function, source);
            let args = expr
                .child_by_field_name("arguments")
                .map(|a| {
                    node_text(a, source)
                        .trim_start_matches('(')
                        .trim_end_matches(')')
                        .to_string()
                })
                .unwrap_or_default();
            (name, args)
        }
        "attribute" => (last_segment(expr, source), String::new()),
        _ => (node_text(expr, source).to_string(), String::new()),
    };
    Some(Decorator {
        loc: file.locatable_at_line(line_of(decorator)),
        name,
        arguments,
    })
}

fn last_segment(node: Node, source: &[u8]) -> String {
    if node.kind() == "attribute" {
        if let Some(attr) = node.child_by_field_name("attribute") {
            return node_text(attr, source).to_string();
        }
    }
    node_text(node, source).to_string()
}

fn call_site(
    node: Node,
    source: &[u8],
    file: &FileEvidence,
    current_fn: Option<&str>,
) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    let (receiver, method) = match function.kind() {
        "attribute" => {
            let object = function.child_by_field_name("object");
            let attr = function.child_by_field_name("attribute")?;
            (
                object.map(|o| node_text(o, source).to_string()),
                node_text(attr, source).to_string(),
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

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^class\s+(\w+)\s*(?:\(([^)]*)\))?:").unwrap())
}

fn decorator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^@([\w.]+)(?:\(([^)]*)\))?\s*$").unwrap())
}

fn def_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(async\s+)?def\s+(\w+)\s*\(([^)]*)\)").unwrap())
}

/// Salvage path: recovers classes (with their base, if any), preceding
/// decorator lines, and function signatures without requiring the file to
/// be syntactically valid Python.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;
    let mut pending: Vec<Decorator> = Vec::new();

    for line_start in std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1)) {
        let rest = &text[line_start..];
        let Some(line) = rest.lines().next() else {
            continue;
        };
        if let Some(cap) = decorator_re().captures(line) {
            let line_no = file.locatable_at(line_start).line;
            pending.push(Decorator {
                loc: file.locatable_at_line(line_no),
                name: cap[1].rsplit('.').next().unwrap_or(&cap[1]).to_string(),
                arguments: cap.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            });
            continue;
        }
        if let Some(cap) = class_re().captures(line) {
            found_any = true;
            let line_no = file.locatable_at(line_start).line;
            let name = cap[1].to_string();
            body.types.push(DeclaredType {
                loc: file.locatable_at_line(line_no),
                name: name.clone(),
                qualified_name: name,
                superclass: cap.get(2).and_then(|m| {
                    m.as_str().split(',').next().map(|s| s.trim().to_string())
                }),
                annotations: std::mem::take(&mut pending),
            });
            continue;
        }
        if let Some(cap) = def_re().captures(line) {
            found_any = true;
            let line_no = file.locatable_at(line_start).line;
            body.methods.push(MethodDecl {
                loc: file.locatable_at_line(line_no),
                name: cap[2].to_string(),
                parameters: cap[3]
                    .split(',')
                    .map(|p| p.split(':').next().unwrap_or("").split('=').next().unwrap_or("").trim())
                    .filter(|p| !p.is_empty() && *p != "self")
                    .map(|s| s.to_string())
                    .collect(),
                is_async: cap.get(1).is_some(),
                decorators: std::mem::take(&mut pending),
                owner: None,
            });
            continue;
        }
        pending.clear();
    }

    found_any.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_captures_flask_route_decorator() {
        let adapter = PythonAdapter::new();
        let src = "from flask import Flask\napp = Flask(__name__)\n\n@app.route(\"/orders\", methods=[\"GET\"])\ndef list_orders():\n    return []\n";
        let file = FileEvidence::new("app.py", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert_eq!(body.methods.len(), 1);
        assert_eq!(body.methods[0].name, "list_orders");
        assert!(body.methods[0].has_annotation("route"));
    }

    #[test]
    fn grammar_captures_celery_delay_call() {
        let adapter = PythonAdapter::new();
        let src = "@shared_task(queue='emails')\ndef send_email(order_id):\n    pass\n\ndef place_order():\n    send_email.delay(order_id=1)\n";
        let file = FileEvidence::new("tasks.py", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert!(body.call_sites.iter().any(|c| c.method == "delay"));
    }

    #[test]
    fn regex_fallback_recovers_django_model_base() {
        let src = "class Order(models.Model):\n    pass\n";
        let body = regex_fallback(&FileEvidence::new("models.py", src.as_bytes().to_vec())).unwrap();
        assert_eq!(body.types[0].superclass.as_deref(), Some("models.Model"));
    }

    #[test]
    fn regex_fallback_attaches_a_decorator_on_the_first_line_to_the_following_def() {
        let src = "@shared_task(queue='emails')\ndef send_email(to, subject):\n    pass\n";
        let body = regex_fallback(&FileEvidence::new("tasks.py", src.as_bytes().to_vec())).unwrap();
        assert_eq!(body.methods.len(), 1);
        assert_eq!(body.methods[0].name, "send_email");
        assert!(body.methods[0].has_annotation("shared_task"));
    }

    #[test]
    fn grammar_captures_foreign_key_field_and_method_owner() {
        let adapter = PythonAdapter::new();
        let src = "class Order(models.Model):\n    customer = models.ForeignKey(Customer, on_delete=models.CASCADE)\n\n    def total(self):\n        return 0\n";
        let file = FileEvidence::new("models.py", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert!(body.directives.iter().any(|d| d.name == "ForeignKey" && d.owner.as_deref() == Some("Order")));
        assert_eq!(body.methods[0].owner.as_deref(), Some("Order"));
    }
}
