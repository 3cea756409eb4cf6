//! Core shared types: language tags, source locations, and file evidence.
//!
//! File evidence is immutable after construction and lives for the
//! duration of a single scan pass (see the Lifecycles note in the data
//! model).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The closed set of language tags a file can be classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageTag {
    Java,
    Kotlin,
    Python,
    CSharp,
    Go,
    Ruby,
    JavaScript,
    TypeScript,
    Other,
}

impl LanguageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Python => "python",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Ruby => "ruby",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Other => "other",
        }
    }

    /// Detect a language tag from a file path. Build/manifest files
    /// (`pom.xml`, `*.csproj`, `go.mod`, `Gemfile`, `package.json`, ...)
    /// fall through to `Other` — scanners that care about them match on
    /// file name, not on language tag.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "java" => Self::Java,
            "kt" | "kts" => Self::Kotlin,
            "py" | "pyi" => Self::Python,
            "cs" => Self::CSharp,
            "go" => Self::Go,
            "rb" | "rake" => Self::Ruby,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Self::TypeScript,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source location: the file it belongs to and a 1-based line number.
///
/// Every AST node and every finding carries one of these so provenance can
/// always be traced back to `(file, line)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locatable {
    pub file: Arc<Path>,
    pub line: u32,
}

impl Locatable {
    pub fn new(file: Arc<Path>, line: u32) -> Self {
        Self {
            file,
            line: line.max(1),
        }
    }
}

/// Immutable evidence for a single discovered file: its path, detected
/// language, raw bytes, and a line index for fast offset-to-line lookups.
#[derive(Debug, Clone)]
pub struct FileEvidence {
    path: Arc<Path>,
    language: LanguageTag,
    content: Arc<[u8]>,
    line_starts: Arc<[usize]>,
}

impl FileEvidence {
    pub fn new(path: impl Into<PathBuf>, content: Vec<u8>) -> Self {
        let path: Arc<Path> = Arc::from(path.into());
        let language = LanguageTag::from_path(&path);
        let line_starts = build_line_index(&content);
        Self {
            path,
            language,
            content: Arc::from(content),
            line_starts: Arc::from(line_starts),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_arc(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    pub fn language(&self) -> LanguageTag {
        self.language
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Lossily decoded UTF-8 text of the file content.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// 1-based line number for a byte offset into `content()`.
    pub fn line_at(&self, byte_offset: usize) -> u32 {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(i) => (i + 1) as u32,
            Err(i) => i.max(1) as u32,
        }
    }

    pub fn locatable_at(&self, byte_offset: usize) -> Locatable {
        Locatable::new(self.path_arc(), self.line_at(byte_offset))
    }

    pub fn locatable_at_line(&self, line: u32) -> Locatable {
        Locatable::new(self.path_arc(), line)
    }
}

fn build_line_index(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, byte) in content.iter().enumerate() {
        if *byte == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_extension() {
        assert_eq!(LanguageTag::from_path(Path::new("Foo.java")), LanguageTag::Java);
        assert_eq!(LanguageTag::from_path(Path::new("app.py")), LanguageTag::Python);
        assert_eq!(LanguageTag::from_path(Path::new("routes.rb")), LanguageTag::Ruby);
        assert_eq!(LanguageTag::from_path(Path::new("Program.cs")), LanguageTag::CSharp);
        assert_eq!(LanguageTag::from_path(Path::new("main.go")), LanguageTag::Go);
        assert_eq!(LanguageTag::from_path(Path::new("index.ts")), LanguageTag::TypeScript);
        assert_eq!(LanguageTag::from_path(Path::new("pom.xml")), LanguageTag::Other);
        assert_eq!(LanguageTag::from_path(Path::new("go.mod")), LanguageTag::Other);
    }

    #[test]
    fn line_at_offset_tracks_newlines() {
        let evidence = FileEvidence::new("test.py", b"a\nb\nc\n".to_vec());
        assert_eq!(evidence.line_at(0), 1);
        assert_eq!(evidence.line_at(2), 2);
        assert_eq!(evidence.line_at(4), 3);
    }

    #[test]
    fn file_name_extracts_basename() {
        let evidence = FileEvidence::new("config/routes.rb", b"".to_vec());
        assert_eq!(evidence.file_name(), "routes.rb");
        assert_eq!(evidence.language(), LanguageTag::Ruby);
    }
}
