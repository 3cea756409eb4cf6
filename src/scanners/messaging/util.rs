//! Shared helpers for topic/queue literal extraction across the
//! messaging-family scanners (§6 group `messaging`).

/// First element of a topic/queue attribute's raw text, stripping the
/// array braces Java annotations use for multi-topic listeners
/// (`topics = {"orders", "returns"}`) and any surrounding quotes.
pub fn first_topic(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('{').trim_end_matches('}');
    let first = trimmed.split(',').next()?.trim();
    let first = first.trim_matches(['"', '\'']);
    (!first.is_empty()).then(|| first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_braces_and_quotes_from_first_topic() {
        assert_eq!(first_topic("\"orders\""), Some("orders".to_string()));
        assert_eq!(first_topic("{\"orders\", \"returns\"}"), Some("orders".to_string()));
        assert_eq!(first_topic(""), None);
    }
}
