//! Parser adapters: one per supported language, each composing a
//! tree-sitter grammar with a regex salvage fallback (§4).

pub mod adapter;
mod csharp;
mod go;
mod java;
mod javascript;
mod kotlin;
mod python;
pub mod registry;
mod ruby;
mod ts_util;
mod typescript;

// Files tagged `LanguageTag::Other` (build manifests, schema files) have no
// grammar and no registered adapter — dependency/schema scanners read their
// `FileEvidence` text directly instead of going through an `Ast`.

pub use adapter::{ParseConfidence, ParseError, ParsedAst, ParserAdapter};
pub use registry::get_registry;
