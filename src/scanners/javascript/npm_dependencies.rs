//! `npm-dependencies`: `dependencies`/`devDependencies` entries from
//! `package.json`. Text-only — the JSON shape is regular enough that a
//! line-oriented regex is simpler than a JSON parser for this purpose,
//! matching the manifest-scanning style of `go-modules`/`nuget-dependencies`.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "npm-dependencies",
    language: LanguageTag::Other,
    matches: |path| file_name_is(path, "package.json"),
    scan,
};

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([@\w][\w.\-/]*)"\s*:\s*"([^"]+)""#).unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    let mut findings = Vec::new();
    let mut in_dependencies = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("\"dependencies\"") || trimmed.starts_with("\"devDependencies\"") {
            in_dependencies = true;
            continue;
        }
        if in_dependencies && trimmed.starts_with('}') {
            in_dependencies = false;
            continue;
        }
        if !in_dependencies {
            continue;
        }
        let Some(cap) = entry_re().captures(trimmed) else { continue };
        let name = cap[1].to_string();
        let offset = text.find(line).unwrap_or(0);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Dependency,
            fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::JavaScript),
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
    fn extracts_dependency_entries() {
        let src = "{\n  \"name\": \"orders-service\",\n  \"dependencies\": {\n    \"express\": \"^4.18.2\",\n    \"pg\": \"^8.11.0\"\n  },\n  \"devDependencies\": {\n    \"jest\": \"^29.0.0\"\n  }\n}\n";
        let file = FileEvidence::new("package.json", src.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().any(|f| matches!(&f.payload, FindingPayload::Dependency { name, version } if name == "express" && version.as_deref() == Some("^4.18.2"))));
        assert!(findings.iter().any(|f| matches!(&f.payload, FindingPayload::Dependency { name, .. } if name == "jest")));
    }
}
