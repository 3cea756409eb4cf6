//! `pip-poetry-dependencies`: dependency coordinates from `requirements.txt`
//! and the `[tool.poetry.dependencies]`/`[project.dependencies]` tables of
//! `pyproject.toml`. Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is_any;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "pip-poetry-dependencies",
    language: LanguageTag::Other,
    matches: |path| file_name_is_any(path, &["requirements.txt", "pyproject.toml", "Pipfile"]),
    scan,
};

fn requirements_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([A-Za-z][\w.\-]*)\s*(?:==|>=|~=|<=)\s*([\w.\-]+)").unwrap())
}

fn poetry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^([A-Za-z][\w.\-]*)\s*=\s*"\^?([\w.\-]+)""#).unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    let re = if file.path().extension().is_some_and(|e| e == "toml") {
        poetry_re()
    } else {
        requirements_re()
    };
    re.captures_iter(&text)
        .filter(|cap| !cap[1].eq_ignore_ascii_case("python"))
        .map(|cap| {
            let name = cap[1].to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Dependency,
                fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::Python),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Dependency { name, version: Some(cap[2].to_string()) },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pinned_requirements_txt_entry() {
        let file = FileEvidence::new("requirements.txt", b"django==5.0.1\ncelery==5.3.6\n".to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn extracts_poetry_table_entry() {
        let src = "[tool.poetry.dependencies]\npython = \"^3.11\"\nfastapi = \"^0.110.0\"\n";
        let file = FileEvidence::new("pyproject.toml", src.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Dependency { name, .. } => assert_eq!(name, "fastapi"),
            _ => panic!("expected dependency payload"),
        }
    }
}
