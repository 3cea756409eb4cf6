//! Shared tree-sitter traversal helpers used by every grammar-based
//! parser. Argument text is read with plain string slicing rather than
//! walking further into each grammar's own argument sub-tree — that
//! keeps every language's extraction code shaped the same way and lets
//! [`crate::ast::extract_named_argument`] do the rest.

use tree_sitter::Node;

pub fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

pub fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Direct children of `node` whose kind matches `kind`.
pub fn children_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect()
}

/// Preceding siblings of `node` (scanning backward until one doesn't
/// match `kind`), in source order. Used for annotations/attributes that
/// sit as siblings before a declaration rather than as its children
/// (Java `modifiers`, C# `attribute_lists`).
pub fn preceding_siblings_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    let mut current = node.prev_sibling();
    while let Some(sibling) = current {
        if sibling.kind() == kind {
            out.push(sibling);
            current = sibling.prev_sibling();
        } else if sibling.is_extra() || sibling.kind() == "comment" {
            current = sibling.prev_sibling();
        } else {
            break;
        }
    }
    out.reverse();
    out
}

/// Walk every descendant of `node` (depth-first, pre-order) whose kind
/// matches `kind`, without descending into subtrees of the same kind
/// (so a nested class's methods aren't attributed to the outer class).
pub fn descendants_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    collect_descendants(node, kind, &mut cursor, &mut out);
    out
}

fn collect_descendants<'a>(
    node: Node<'a>,
    kind: &str,
    cursor: &mut tree_sitter::TreeCursor<'a>,
    out: &mut Vec<Node<'a>>,
) {
    for child in node.children(cursor) {
        if child.kind() == kind {
            out.push(child);
        }
        let mut child_cursor = child.walk();
        collect_descendants(child, kind, &mut child_cursor, out);
    }
}

/// Extract ordered parameter names from a parameter-list-like node by
/// collecting the text of every identifier-shaped child (covers typed,
/// defaulted, and plain parameters across grammars closely enough for
/// the AST facade's "ordered names" requirement).
pub fn parameter_names(params_node: Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params_node.walk();
    for child in params_node.children(&mut cursor) {
        match child.kind() {
            "identifier" | "simple_identifier" => {
                names.push(node_text(child, source).to_string());
            }
            "," | "(" | ")" | "self" => {}
            _ => {
                // typed_parameter / parameter / required_parameter / etc:
                // take the first identifier-shaped descendant.
                if let Some(name) = first_identifier(child, source) {
                    names.push(name);
                }
            }
        }
    }
    names
}

fn first_identifier(node: Node, source: &[u8]) -> Option<String> {
    if matches!(
        node.kind(),
        "identifier" | "simple_identifier" | "property_identifier"
    ) {
        return Some(node_text(node, source).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(name) = first_identifier(child, source) {
            return Some(name);
        }
    }
    None
}
