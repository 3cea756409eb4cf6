//! C# parser adapter: ASP.NET Core controllers/attributes, Entity
//! Framework `DbContext`/`DbSet<T>` shapes, and gRPC service bases.

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{children_of_kind, line_of, node_text, parameter_names};
use crate::ast::{Ast, AstBody, DeclaredType, Decorator, Directive, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser};

pub struct CSharpAdapter {
    grammar_ok: bool,
}

impl CSharpAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into()).ok()?;
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

impl Default for CSharpAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for CSharpAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::CSharp
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::CSharp(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::CSharp(body),
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

fn walk(node: Node, source: &[u8], file: &FileEvidence, owner: Option<&str>, body: &mut AstBody) {
    match node.kind() {
        "class_declaration" | "interface_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = node_text(name_node, source).to_string();
                let superclass = node
                    .child_by_field_name("bases")
                    .and_then(|n| n.named_child(0))
                    .map(|n| node_text(n, source).to_string());
                body.types.push(DeclaredType {
                    loc: file.locatable_at_line(line_of(node)),
                    name: name.clone(),
                    qualified_name: name.clone(),
                    superclass,
                    annotations: attributes_of(node, source, file),
                });
                if let Some(class_body) = node.child_by_field_name("body") {
                    let mut cursor = class_body.walk();
                    for child in class_body.children(&mut cursor) {
                        walk(child, source, file, Some(&name), body);
                    }
                }
            }
        }
        "method_declaration" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let parameters = node
                    .child_by_field_name("parameters")
                    .map(|p| parameter_names(p, source))
                    .unwrap_or_default();
                body.methods.push(MethodDecl {
                    loc: file.locatable_at_line(line_of(node)),
                    name: node_text(name_node, source).to_string(),
                    parameters,
                    is_async: false,
                    decorators: attributes_of(node, source, file),
                    owner: owner.map(|o| o.to_string()),
                });
            }
        }
        "property_declaration" => {
            if let (Some(type_node), Some(name_node), Some(owner)) =
                (node.child_by_field_name("type"), node.child_by_field_name("name"), owner)
            {
                let type_text = node_text(type_node, source).to_string();
                if let Some(element_type) = dbset_element_type(&type_text) {
                    body.directives.push(Directive {
                        loc: file.locatable_at_line(line_of(node)),
                        name: "DbSet".to_string(),
                        arguments: format!("{element_type}, {}", node_text(name_node, source)),
                        owner: Some(owner.to_string()),
                    });
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, owner, body);
            }
        }
    }
}

fn dbset_element_type(type_text: &str) -> Option<String> {
    let start = type_text.find("DbSet<")? + "DbSet<".len();
    let end = type_text[start..].find('>')? + start;
    Some(type_text[start..end].to_string())
}

fn attributes_of(node: Node, source: &[u8], file: &FileEvidence) -> Vec<Decorator> {
    let mut out = Vec::new();
    for list in children_of_kind(node, "attribute_list") {
        for attr in children_of_kind(list, "attribute") {
            let Some(name_node) = attr.child_by_field_name("name") else {
                continue;
            };
            let args = attr
                .child_by_field_name("args")
                .or_else(|| attr.child_by_field_name("arg_list"))
                .map(|a| {
                    node_text(a, source)
                        .trim_start_matches('(')
                        .trim_end_matches(')')
                        .to_string()
                })
                .unwrap_or_default();
            out.push(Decorator {
                loc: file.locatable_at_line(line_of(attr)),
                name: node_text(name_node, source).to_string(),
                arguments: args,
            });
        }
    }
    out
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*((?:\[\w+(?:\([^)]*\))?\]\s*)*)\s*(?:public\s+|internal\s+)*(?:partial\s+)?class\s+(\w+)(?:\s*:\s*([\w<>,\s]+))?")
            .unwrap()
    })
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\w+)(?:\(([^)]*)\))?\]").unwrap())
}

/// Salvage path: recognizes `[Attribute]`-annotated classes by text shape
/// alone, ignoring method bodies entirely.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;
    for cap in class_re().captures_iter(&text) {
        found_any = true;
        let whole = cap.get(0).unwrap();
        let line = file.locatable_at(whole.start()).line;
        let annotations = attribute_re()
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
            superclass: cap.get(3).map(|m| m.as_str().split(',').next().unwrap_or("").trim().to_string()),
            annotations,
        });
    }
    found_any.then_some(body)
}
