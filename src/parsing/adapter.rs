//! The parser adapter contract.

use crate::ast::Ast;
use crate::types::{FileEvidence, LanguageTag};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to parse {path}: {reason}")]
pub struct ParseError {
    pub path: PathBuf,
    pub reason: String,
}

/// Which strategy produced an [`Ast`] value: a successful grammar parse
/// (`High`), or the regex salvage path because the grammar was
/// unavailable or produced structural errors (`Low`). Scanners that
/// degrade to text heuristics tag their findings with this (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseConfidence {
    High,
    Low,
}

/// An AST value together with the confidence of the strategy that
/// produced it.
#[derive(Debug, Clone)]
pub struct ParsedAst {
    pub ast: Ast,
    pub confidence: ParseConfidence,
}

/// Common interface every per-language parser adapter implements.
///
/// An adapter internally composes a formal grammar-driven parser and a
/// regex-oriented salvage parser. `is_available()` reflects only whether
/// the grammar parser is usable on this build — the adapter must still
/// succeed via the regex fallback when the grammar is absent, and must
/// never return a [`ParseError`] for structural issues the fallback can
/// tolerate. Line numbers are preserved in both paths.
pub trait ParserAdapter: Send + Sync {
    fn language_tag(&self) -> LanguageTag;

    /// True when the native grammar parser is usable. False forces the
    /// regex fallback for every file, regardless of whether the grammar
    /// would otherwise have succeeded.
    fn is_available(&self) -> bool;

    fn parse(&self, file: &FileEvidence) -> Result<ParsedAst, ParseError>;
}
