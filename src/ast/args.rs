//! Literal-argument extraction from raw call/annotation argument text.
//!
//! Parsers hand scanners the unparsed argument text of a decorator or
//! call (`queue='x', retries=3` or `"/api/v1/orders"`) rather than a
//! sub-tree, since every language's call-argument grammar differs but the
//! shapes scanners care about are always "the Nth positional value" or
//! "the value of keyword argument K". This module covers both.

/// Extract the literal value of a named keyword argument from raw
/// argument text, e.g. `extract_named_argument("queue='emails', retries=3", "queue")`
/// returns `Some("emails")`. Quotes are stripped from string literals.
///
/// This is the Python adapter's `extract_parameter(args_text, name)` helper
/// from the AST facade contract, generalized so every scanner can use it
/// (ASP.NET `[Route(Name = "x")]`, Celery `queue=`, ...).
pub fn extract_named_argument(args_text: &str, name: &str) -> Option<String> {
    for part in split_top_level_commas(args_text) {
        let part = part.trim();
        let Some((key, value)) = part.split_once('=') else { continue };
        if key.trim() == name {
            return Some(strip_quotes(value.trim()));
        }
    }
    None
}

/// Extract the first positional argument (no `=`), typically a path or
/// name literal: `extract_positional("\"/orders\", method=\"get\"")` ==
/// `Some("/orders")`.
pub fn extract_positional(args_text: &str, index: usize) -> Option<String> {
    split_top_level_commas(args_text)
        .into_iter()
        .filter(|part| !part.contains('='))
        .nth(index)
        .map(|part| strip_quotes(part.trim()))
}

fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

fn strip_quotes(value: &str) -> String {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_keyword_argument() {
        assert_eq!(
            extract_named_argument("queue='emails', retries=3", "queue"),
            Some("emails".to_string())
        );
        assert_eq!(
            extract_named_argument("queue=\"emails\"", "queue"),
            Some("emails".to_string())
        );
        assert_eq!(extract_named_argument("retries=3", "queue"), None);
    }

    #[test]
    fn keyword_argument_after_a_leading_positional_is_still_found() {
        assert_eq!(
            extract_named_argument("\"/orders\", methods=[\"GET\", \"POST\"]", "methods"),
            Some("[\"GET\", \"POST\"]".to_string())
        );
    }

    #[test]
    fn extracts_first_positional() {
        assert_eq!(
            extract_positional("\"/orders\", method=\"get\"", 0),
            Some("/orders".to_string())
        );
        assert_eq!(extract_positional("", 0), None);
    }

    #[test]
    fn respects_nested_commas() {
        assert_eq!(
            extract_named_argument("path=\"/x\", tags=[\"a\", \"b\"]", "tags"),
            Some("[\"a\", \"b\"]".to_string())
        );
    }
}
