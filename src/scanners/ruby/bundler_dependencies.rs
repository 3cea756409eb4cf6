//! `bundler-dependencies`: `gem "x", "~> 1.2"` lines from a `Gemfile`.
//! Text-only, like the `go-modules`/`npm-dependencies` manifest scanners —
//! bundler's `Gemfile` DSL is closer to declarative data than code.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "bundler-dependencies",
    language: LanguageTag::Other,
    matches: |path| file_name_is(path, "Gemfile"),
    scan,
};

fn gem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*gem\s+["']([\w.\-]+)["'](?:\s*,\s*["']([^"']+)["'])?"#).unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    gem_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap[1].to_string();
            let offset = cap.get(0).unwrap().start();
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Dependency,
                fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::Ruby),
                confidence: Confidence::High,
                loc: file.locatable_at(offset),
                payload: FindingPayload::Dependency { name, version: cap.get(2).map(|m| m.as_str().to_string()) },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_gem_with_version_constraint() {
        let file = FileEvidence::new("Gemfile", b"source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 7.0\"\ngem \"pg\"\n".to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 2);
        match &findings[0].payload {
            FindingPayload::Dependency { name, version } => {
                assert_eq!(name, "rails");
                assert_eq!(version.as_deref(), Some("~> 7.0"));
            }
            _ => panic!("expected dependency payload"),
        }
        match &findings[1].payload {
            FindingPayload::Dependency { name, version } => {
                assert_eq!(name, "pg");
                assert_eq!(*version, None);
            }
            _ => panic!("expected dependency payload"),
        }
    }
}
