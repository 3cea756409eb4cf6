//! Kotlin parser adapter. No scanner in the closed set keys off Kotlin
//! directly — `scanners_for(Kotlin)` returns an empty list — but JVM
//! repositories mix Kotlin and Java freely, so the AST facade still
//! recognizes Kotlin types and functions for whatever future scanner or
//! cross-file linking wants them (§11).

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::ts_util::{line_of, node_text, parameter_names, preceding_siblings_of_kind};
use crate::ast::{Ast, AstBody, DeclaredType, Decorator, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use tree_sitter::{Node, Parser};

pub struct KotlinAdapter {
    grammar_ok: bool,
}

impl KotlinAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_kotlin::language())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_kotlin::language()).ok()?;
        let source = file.content();
        let tree = parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }
        let mut body = AstBody::default();
        walk(root, source, file, &mut body);
        Some(body)
    }
}

impl Default for KotlinAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for KotlinAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::Kotlin
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::Kotlin(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::Kotlin(body),
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

fn walk(node: Node, source: &[u8], file: &FileEvidence, body: &mut AstBody) {
    match node.kind() {
        "class_declaration" | "object_declaration" => {
            if let Some(name_node) = node
                .child_by_field_name("name")
                .or_else(|| node.child_by_field_name("type"))
            {
                let name = node_text(name_node, source).to_string();
                let annotations = annotations_of(node, source, file);
                body.types.push(DeclaredType {
                    loc: file.locatable_at_line(line_of(node)),
                    name: name.clone(),
                    qualified_name: name,
                    superclass: None,
                    annotations,
                });
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, body);
            }
        }
        "function_declaration" => {
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
                    decorators: annotations_of(node, source, file),
                    owner: None,
                });
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                walk(child, source, file, body);
            }
        }
    }
}

fn annotations_of(node: Node, source: &[u8], file: &FileEvidence) -> Vec<Decorator> {
    let mut out = Vec::new();
    for modifiers in preceding_siblings_of_kind(node, "modifiers") {
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if child.kind() == "annotation" {
                if let Some(name_node) = child.child_by_field_name("name") {
                    out.push(Decorator {
                        loc: file.locatable_at_line(line_of(child)),
                        name: node_text(name_node, source).to_string(),
                        arguments: String::new(),
                    });
                }
            }
        }
    }
    out
}

/// Salvage path keyed on `class`/`fun` keywords; Kotlin has no scanner
/// depending on it so this only needs to recover names, not annotations.
fn regex_fallback(file: &FileEvidence) -> Option<AstBody> {
    let text = file.text();
    let mut body = AstBody::default();
    let mut found_any = false;
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed
            .strip_prefix("class ")
            .or_else(|| trimmed.strip_prefix("object "))
        {
            if let Some(name) = rest.split(|c: char| !c.is_alphanumeric() && c != '_').next() {
                if !name.is_empty() {
                    found_any = true;
                    body.types.push(DeclaredType {
                        loc: file.locatable_at_line(i as u32 + 1),
                        name: name.to_string(),
                        qualified_name: name.to_string(),
                        superclass: None,
                        annotations: Vec::new(),
                    });
                }
            }
        } else if let Some(rest) = trimmed.strip_prefix("fun ") {
            if let Some(name) = rest.split('(').next() {
                let name = name.trim();
                if !name.is_empty() {
                    found_any = true;
                    body.methods.push(MethodDecl {
                        loc: file.locatable_at_line(i as u32 + 1),
                        name: name.to_string(),
                        parameters: Vec::new(),
                        is_async: false,
                        decorators: Vec::new(),
                        owner: None,
                    });
                }
            }
        }
    }
    found_any.then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_recovers_class_and_function_names() {
        let adapter = KotlinAdapter::new();
        let src = "class OrderService {\n    fun place(id: String) {}\n}\n";
        let file = FileEvidence::new("OrderService.kt", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert_eq!(body.types[0].name, "OrderService");
        assert_eq!(body.methods[0].name, "place");
    }
}
