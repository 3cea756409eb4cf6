//! TypeScript parser adapter. Builds on the JavaScript adapter's call-site
//! and class/method walk, adding decorator extraction for NestJS-style
//! annotations (`@Controller`, `@Get`, `@Injectable`).

use super::adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
use super::javascript;
use super::ts_util::{line_of, node_text, parameter_names, preceding_siblings_of_kind};
use crate::ast::{Ast, AstBody, DeclaredType, Decorator, MethodDecl};
use crate::types::{FileEvidence, LanguageTag};
use tree_sitter::{Node, Parser};

pub struct TypeScriptAdapter {
    grammar_ok: bool,
}

impl TypeScriptAdapter {
    pub fn new() -> Self {
        let grammar_ok = Parser::new()
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .is_ok();
        Self { grammar_ok }
    }

    fn grammar_parse(&self, file: &FileEvidence) -> Option<AstBody> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
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

impl Default for TypeScriptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserAdapter for TypeScriptAdapter {
    fn language_tag(&self) -> LanguageTag {
        LanguageTag::TypeScript
    }

    fn is_available(&self) -> bool {
        self.grammar_ok
    }

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError> {
        if self.grammar_ok {
            if let Some(body) = self.grammar_parse(file) {
                return Ok(ParsedAst {
                    ast: Ast::TypeScript(body),
                    confidence: ParseConfidence::High,
                });
            }
        }
        match javascript::regex_fallback(file) {
            Some(body) => Ok(ParsedAst {
                ast: Ast::TypeScript(body),
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
                annotations: decorators_of(node, source, file),
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
                decorators: decorators_of(node, source, file),
                owner: None,
            });
            if let Some(fn_body) = node.child_by_field_name("body") {
                let mut cursor = fn_body.walk();
                for child in fn_body.children(&mut cursor) {
                    walk(child, source, file, Some(&name), body);
                }
            }
        }
        "call_expression" => {
            if let Some(call) = javascript::call_site(node, source, file, current_fn) {
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

fn decorators_of(node: Node, source: &[u8], file: &FileEvidence) -> Vec<Decorator> {
    let mut found = preceding_siblings_of_kind(node, "decorator");
    if found.is_empty() {
        // `export class Foo` / `export default class Foo` wrap the
        // declaration in an export_statement; the decorator sits before
        // that wrapper, not before the class_declaration itself.
        if let Some(parent) = node.parent() {
            if parent.kind() == "export_statement" {
                found = preceding_siblings_of_kind(parent, "decorator");
            }
        }
    }
    found
        .into_iter()
        .filter_map(|d| decorator_info(d, source, file))
        .collect()
}

fn decorator_info(decorator: Node, source: &[u8], file: &FileEvidence) -> Option<Decorator> {
    let expr = decorator.named_child(0)?;
    let (name, arguments) = match expr.kind() {
        "call_expression" => {
            let function = expr.child_by_field_name("function")?;
            let args = expr
                .child_by_field_name("arguments")
                .map(|a| {
                    node_text(a, source)
                        .trim_start_matches('(')
                        .trim_end_matches(')')
                        .to_string()
                })
                .unwrap_or_default();
            (node_text(function, source).to_string(), args)
        }
        _ => (node_text(expr, source).to_string(), String::new()),
    };
    Some(Decorator {
        loc: file.locatable_at_line(line_of(decorator)),
        name,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_captures_nestjs_controller_decorator() {
        let adapter = TypeScriptAdapter::new();
        let src = r#"
@Controller('orders')
export class OrdersController {
    @Get(':id')
    getOrder(id: string) {
        return null;
    }
}
"#;
        let file = FileEvidence::new("orders.controller.ts", src.as_bytes().to_vec());
        let parsed = adapter.parse(&file).unwrap();
        let body = parsed.ast.body();
        assert!(body.types[0].has_annotation("Controller"));
        assert!(body.methods[0].has_annotation("Get"));
    }
}
