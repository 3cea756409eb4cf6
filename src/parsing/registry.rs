//! The parser registry: a process-wide, read-only-after-init map from
//! language tag to its parser adapter.
//!
//! Mirrors the scanner registry's shape (§4.2) one level down the stack:
//! parser adapters are registered once at process startup and never
//! mutated afterward, so lookups never need more than a read lock.

use super::adapter::ParserAdapter;
use super::{csharp, go, java, javascript, kotlin, python, ruby, typescript};
use crate::types::LanguageTag;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

pub struct ParserRegistry {
    adapters: HashMap<LanguageTag, Arc<dyn ParserAdapter>>,
}

impl ParserRegistry {
    fn with_defaults() -> Self {
        let mut adapters: HashMap<LanguageTag, Arc<dyn ParserAdapter>> = HashMap::new();
        adapters.insert(LanguageTag::Java, Arc::new(java::JavaAdapter::new()));
        adapters.insert(LanguageTag::Kotlin, Arc::new(kotlin::KotlinAdapter::new()));
        adapters.insert(LanguageTag::Python, Arc::new(python::PythonAdapter::new()));
        adapters.insert(LanguageTag::CSharp, Arc::new(csharp::CSharpAdapter::new()));
        adapters.insert(LanguageTag::Go, Arc::new(go::GoAdapter::new()));
        adapters.insert(LanguageTag::Ruby, Arc::new(ruby::RubyAdapter::new()));
        adapters.insert(
            LanguageTag::JavaScript,
            Arc::new(javascript::JavaScriptAdapter::new()),
        );
        adapters.insert(
            LanguageTag::TypeScript,
            Arc::new(typescript::TypeScriptAdapter::new()),
        );
        Self { adapters }
    }

    pub fn get(&self, language: LanguageTag) -> Option<Arc<dyn ParserAdapter>> {
        self.adapters.get(&language).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageTag, &Arc<dyn ParserAdapter>)> {
        self.adapters.iter()
    }
}

static REGISTRY: OnceLock<RwLock<ParserRegistry>> = OnceLock::new();

/// Access the process-wide parser registry, initializing it on first use.
pub fn get_registry() -> &'static RwLock<ParserRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(ParserRegistry::with_defaults()))
}
