//! Java parser adapter: tree-sitter-java grammar with a regex salvage
//! fallback for annotation-bearing classes and methods.

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{children_of_kind, line_of, node_text, parameter_names, preceding_siblings_of_kind};
use crate::ast::{Ast, AstBody, CallSite, DeclaredType, Decorator, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

pub struct JavaAdapter {
    grammar_ok: bool,
}

impl JavaAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into()).ok()?;
        let source = file.content();
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }
        let mut body = AstBody::default();
        let package = find_package(root, source);
        walk(root, source, file, &package, &mut body);
        Some(body)
    }
}

impl Default for JavaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for JavaAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Java
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::Java(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::Java(body),
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

fn find_package(root: Node, source: &[u8]) -> String {
    children_of_kind(root, "package_declaration")
        .first()
        .map(|pkg| {
            node_text(*pkg, source)
                .trim_start_matches("package")
                .trim_end_matches(';')
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

fn walk(node: Node, source: &[u8], file: &FileEvidence, package: &str, body: &mut AstBody) {
    match node.kind() {
        "class_declaration" | "interface_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = node_text(name_node, source).to_string();
                let qualified_name = if package.is_empty() {
                    name.clone()
                } else {
                    format!("{package}.{name}")
                };
                let superclass = node
                    .child_by_field_name("superclass")
                    .and_then(|n| n.named_child(0))
                    .map(|n| node_text(n, source).to_string());
                let annotations = annotations_of(node, source, file);
                body.types.push(DeclaredType {
                    loc: file.locatable_at_line(line_of(node)),
                    name: name.clone(),
                    qualified_name,
                    superclass,
                    annotations,
                });
                if let Some(class_body) = node.child_by_field_name("body") {
                    walk_members(class_body, source, file, &name, body);
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, package, body);
            }
        }
    }
}

fn walk_members(
    class_body: Node,
    source: &[u8],
    file: &FileEvidence,
    owner: &str,
    body: &mut AstBody,
) {
    let mut cursor = class_body.walk();
    for member in class_body.children(&mut cursor) {
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                if let Some(name_node) = member.child_by_field_name("name") {
                    let name = node_text(name_node, source).to_string();
                    let parameters = member
                        .child_by_field_name("parameters")
                        .map(|p| parameter_names(p, source))
                        .unwrap_or_default();
                    let decorators = annotations_of(member, source, file);
                    if let Some(method_body) = member.child_by_field_name("body") {
                        call_sites_in(method_body, source, file, &name, &mut body.call_sites);
                    }
                    body.methods.push(MethodDecl {
                        loc: file.locatable_at_line(line_of(member)),
                        name,
                        parameters,
                        is_async: false,
                        decorators,
                        owner: Some(owner.to_string()),
                    });
                }
            }
            "field_declaration" => {
                for decorator in annotations_of(member, source, file) {
                    body.directives.push(crate::ast::Directive {
                        loc: decorator.loc.clone(),
                        name: decorator.name.clone(),
                        arguments: decorator.arguments.clone(),
                        owner: Some(owner.to_string()),
                    });
                }
            }
            "class_declaration" | "interface_declaration" => {
                // Nested types: recurse but keep outer owner context for siblings.
                walk(member, source, file, "", body);
            }
            _ => {}
        }
    }
}

fn call_sites_in(node: Node, source: &[u8], file: &FileEvidence, caller: &str, out: &mut Vec<CallSite>) {
    if node.kind() == "method_invocation" {
        if let Some(name_node) = node.child_by_field_name("name") {
            let receiver = node
                .child_by_field_name("object")
                .map(|n| node_text(n, source).to_string());
            let arguments = node
                .child_by_field_name("arguments")
                .map(|a| node_text(a, source).trim_start_matches('(').trim_end_matches(')').to_string())
                .unwrap_or_default();
            out.push(CallSite {
                loc: file.locatable_at_line(line_of(node)),
                receiver,
                method: node_text(name_node, source).to_string(),
                arguments,
                caller: Some(caller.to_string()),
            });
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        call_sites_in(child, source, file, caller, out);
    }
}

fn annotations_of(node: Node, source: &[u8], file: &FileEvidence) -> Vec<Decorator> {
    let mut out = Vec::new();
    for modifiers in preceding_siblings_of_kind(node, "modifiers")
        .into_iter()
        .chain(children_of_kind(node, "modifiers"))
    {
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            match child.kind() {
                "marker_annotation" => {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        out.push(Decorator {
                            loc: file.locatable_at_line(line_of(child)),
                            name: node_text(name_node, source).to_string(),
                            arguments: String::new(),
                        });
                    }
                }
                "annotation" => {
                    if let Some(name_node) = child.child_by_field_name("name") {
                        let args = child
                            .child_by_field_name("arguments")
                            .map(|a| {
                                node_text(a, source)
                                    .trim_start_matches('(')
                                    .trim_end_matches(')')
                                    .to_string()
                            })
                            .unwrap_or_default();
                        out.push(Decorator {
                            loc: file.locatable_at_line(line_of(child)),
                            name: node_text(name_node, source).to_string(),
                            arguments: args,
                        });
                    }
                }
                _ => {}
            }
        }
    }
    out
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*((?:@\w+(?:\([^)]*\))?\s*)*)\s*(?:public\s+|final\s+)*class\s+(\w+)")
            .unwrap()
    })
}

fn method_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*((?:@\w+(?:\([^)]*\))?\s*)*)\s*(?:public|private|protected)\s+[\w<>\[\],\s]+\s+(\w+)\s*\(([^)]*)\)")
            .unwrap()
    })
}

fn annotation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(\w+)(?:\(([^)]*)\))?").unwrap())
}

fn call_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\.(\w+)\(").unwrap())
}

/// Regex salvage: recognizes annotated classes and methods line by line
/// without requiring the file to parse cleanly as Java.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;

    for cap in class_re().captures_iter(&text) {
        found_any = true;
        let whole = cap.get(0).unwrap();
        let line = file.locatable_at(whole.start()).line;
        let annotations = annotation_re()
            .captures_iter(&cap[1])
            .map(|a| Decorator {
                loc: file.locatable_at_line(line),
                name: a[1].to_string(),
                arguments: a.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
            .collect();
        body.types.push(DeclaredType {
            loc: file.locatable_at_line(line),
            name: cap[2].to_string(),
            qualified_name: cap[2].to_string(),
            superclass: None,
            annotations,
        });
    }

    for cap in method_re().captures_iter(&text) {
        found_any = true;
        let whole = cap.get(0).unwrap();
        let line = file.locatable_at(whole.start()).line;
        let decorators = annotation_re()
            .captures_iter(&cap[1])
            .map(|a| Decorator {
                loc: file.locatable_at_line(line),
                name: a[1].to_string(),
                arguments: a.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            })
            .collect();
        let parameters = cap[3]
            .split(',')
            .filter_map(|p| p.trim().split_whitespace().last())
            .map(|s| s.to_string())
            .collect();
        body.methods.push(MethodDecl {
            loc: file.locatable_at_line(line),
            name: cap[2].to_string(),
            parameters,
            is_async: false,
            decorators,
            owner: None,
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
