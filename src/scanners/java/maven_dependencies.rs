//! `maven-dependencies`: `<dependency>` coordinates from `pom.xml`.
//! Text-only — `pom.xml` carries `LanguageTag::Other`, no AST facade.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "maven-dependencies",
    language: LanguageTag::Other,
    matches: |path| file_name_is(path, "pom.xml"),
    scan,
};

fn dependency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)<dependency>\s*<groupId>([^<]+)</groupId>\s*<artifactId>([^<]+)</artifactId>(?:\s*<version>([^<]+)</version>)?",
        )
        .unwrap()
    })
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    dependency_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = format!("{}:{}", cap[1].trim(), cap[2].trim());
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Dependency,
                fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::Java),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Dependency {
                    name,
                    version: cap.get(3).map(|m| m.as_str().trim().to_string()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_groupid_artifactid_version() {
        let xml = "<project><dependencies><dependency><groupId>org.springframework</groupId><artifactId>spring-web</artifactId><version>6.1.0</version></dependency></dependencies></project>";
        let file = FileEvidence::new("pom.xml", xml.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Dependency { name, version } => {
                assert_eq!(name, "org.springframework:spring-web");
                assert_eq!(version.as_deref(), Some("6.1.0"));
            }
            _ => panic!("expected dependency payload"),
        }
    }
}
