//! The scanner registry: a bidirectional map of scanner IDs to
//! descriptors, registered once at process startup in a fixed order that
//! determines both dispatch order and merge tie-breaking (§4.2, §9).

use super::groups::group_members;
use crate::model::Finding;
use crate::parsing::ParseConfidence;
use crate::types::{FileEvidence, LanguageTag};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// A scanner's AST input, when its language has a parser adapter. Absent
/// for `LanguageTag::Other` files, which scanners read as raw text.
pub type ScannerAst<'a> = Option<&'a crate::ast::Ast>;

/// `confidence` mirrors the parse strategy that produced `ast` (§4.3):
/// `High` from a successful grammar parse, `Low` from the regex fallback.
/// Text-only scanners over `LanguageTag::Other` files (no adapter exists)
/// always receive `High`, since there is no fallback degradation to track.
pub type ScanFn = fn(&FileEvidence, ScannerAst, ParseConfidence) -> Vec<Finding>;

#[derive(Clone, Copy)]
pub struct ScannerDescriptor {
    pub id: &'static str,
    pub language: LanguageTag,
    /// True when this descriptor's file-name predicate matches `path`.
    pub matches: fn(&Path) -> bool,
    pub scan: ScanFn,
}

pub struct ScannerRegistry {
    order: Vec<ScannerDescriptor>,
    by_id: HashMap<&'static str, usize>,
}

impl ScannerRegistry {
    fn with_defaults() -> Self {
        let mut registry = Self {
            order: Vec::new(),
            by_id: HashMap::new(),
        };
        for descriptor in super::all_descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    fn register(&mut self, descriptor: ScannerDescriptor) {
        let index = self.order.len();
        self.by_id.insert(descriptor.id, index);
        self.order.push(descriptor);
    }

    pub fn descriptor(&self, id: &str) -> Option<&ScannerDescriptor> {
        self.by_id.get(id).map(|&i| &self.order[i])
    }

    fn known_id(&self, id: &str) -> Option<&'static str> {
        self.by_id.keys().find(|known| **known == *id).copied()
    }

    /// Registration-order rank of a scanner ID, used by the merger to
    /// break ties between equal-confidence findings (§4.5, §9).
    pub fn priority(&self) -> HashMap<&'static str, usize> {
        self.order.iter().enumerate().map(|(i, d)| (d.id, i)).collect()
    }

    /// Scanners for `language`, in registration order (§4.2).
    pub fn scanners_for(&self, language: LanguageTag) -> Vec<&ScannerDescriptor> {
        self.order.iter().filter(|d| d.language == language).collect()
    }

    /// Resolves the effective enabled set: union of the configured
    /// groups' scanner IDs, plus explicit enables, minus explicit
    /// disables. Unknown group/scanner names are logged and ignored
    /// (§4.2, §6).
    pub fn enabled_scanners(&self, groups: &[String], enabled: &[String], disabled: &[String]) -> HashSet<&'static str> {
        let mut set: HashSet<&'static str> = HashSet::new();
        for group in groups {
            match group_members(group) {
                Some(members) => set.extend(members.iter().copied()),
                None => tracing::warn!(group = %group, "unknown scanner group, ignoring"),
            }
        }
        for id in enabled {
            match self.known_id(id) {
                Some(known) => {
                    set.insert(known);
                }
                None => tracing::warn!(scanner = %id, "unknown scanner id in scanners.enabled, ignoring"),
            }
        }
        for id in disabled {
            match self.known_id(id) {
                Some(known) => {
                    set.remove(known);
                }
                None => tracing::warn!(scanner = %id, "unknown scanner id in scanners.disabled, ignoring"),
            }
        }
        set
    }
}

static REGISTRY: OnceLock<Arc<ScannerRegistry>> = OnceLock::new();

pub fn get_registry() -> Arc<ScannerRegistry> {
    REGISTRY
        .get_or_init(|| Arc::new(ScannerRegistry::with_defaults()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_all_42_scanners_registered_once() {
        let registry = get_registry();
        assert_eq!(registry.priority().len(), 42);
    }

    #[test]
    fn scanners_for_language_preserve_registration_order() {
        let registry = get_registry();
        let java = registry.scanners_for(LanguageTag::Java);
        let priority = registry.priority();
        let ranks: Vec<usize> = java.iter().map(|d| priority[d.id]).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn enabled_scanners_unions_groups_and_respects_disables() {
        let registry = get_registry();
        let enabled = registry.enabled_scanners(
            &["ruby".to_string(), "messaging".to_string()],
            &[],
            &["sidekiq-workers".to_string()],
        );
        assert!(enabled.contains("rails-routes"));
        assert!(enabled.contains("celery-tasks"));
        assert!(!enabled.contains("sidekiq-workers"));
    }

    #[test]
    fn unknown_group_is_ignored_not_fatal() {
        let registry = get_registry();
        let enabled = registry.enabled_scanners(&["not-a-real-group".to_string()], &[], &[]);
        assert!(enabled.is_empty());
    }
}
