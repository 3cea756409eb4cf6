//! `go-modules`: `require` directives from `go.mod`, covering both the
//! single-line (`require example.com/x v1.2.3`) and block
//! (`require (\n\texample.com/x v1.2.3\n)`) forms. Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "go-modules",
    language: LanguageTag::Other,
    matches: |path| file_name_is(path, "go.mod"),
    scan,
};

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*([\w.\-/]+)\s+(v[\w.\-+]+)(?:\s+//\s*indirect)?\s*$").unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    let mut findings = Vec::new();
    let mut in_require_block = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("require") && trimmed.ends_with('(') {
            in_require_block = true;
            continue;
        }
        if in_require_block && trimmed == ")" {
            in_require_block = false;
            continue;
        }
        let candidate = if in_require_block {
            trimmed
        } else if let Some(rest) = trimmed.strip_prefix("require ") {
            rest
        } else {
            continue;
        };
        let Some(cap) = require_re().captures(&format!("{candidate}\n")) else { continue };
        let name = cap[1].to_string();
        let offset = text.find(line).unwrap_or(0);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Dependency,
            fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::Go),
            confidence: Confidence::High,
            loc: file.locatable_at(offset),
            payload: FindingPayload::Dependency { name, version: Some(cap[2].to_string()) },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_line_require() {
        let file = FileEvidence::new("go.mod", b"module example.com/orders\n\nrequire github.com/gorilla/mux v1.8.1\n".to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn extracts_block_requires() {
        let src = "module example.com/orders\n\nrequire (\n\tgithub.com/gorilla/mux v1.8.1\n\tgoogle.golang.org/grpc v1.60.0\n)\n";
        let file = FileEvidence::new("go.mod", src.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 2);
    }
}
