//! `gradle-dependencies`: dependency coordinates from `build.gradle` or
//! `build.gradle.kts` (§11 — Gradle Kotlin DSL recognition). Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::file_name_is_any;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "gradle-dependencies",
    language: LanguageTag::Other,
    matches: |path| file_name_is_any(path, &["build.gradle", "build.gradle.kts"]),
    scan,
};

fn coordinate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*(?:implementation|api|compile|testImplementation|runtimeOnly|testRuntimeOnly)\s*[\("']([\w.\-]+):([\w.\-]+):([\w.\-]+)[\)"']?"#,
        )
        .unwrap()
    })
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    coordinate_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = format!("{}:{}", &cap[1], &cap[2]);
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Dependency,
                fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::Java),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Dependency {
                    name,
                    version: Some(cap[3].to_string()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_both_groovy_and_kotlin_dsl_syntax() {
        assert!((DESCRIPTOR.matches)(std::path::Path::new("build.gradle")));
        assert!((DESCRIPTOR.matches)(std::path::Path::new("build.gradle.kts")));
    }

    #[test]
    fn extracts_implementation_coordinate() {
        let src = "dependencies {\n    implementation(\"org.springframework.boot:spring-boot-starter-web:3.2.0\")\n}\n";
        let file = FileEvidence::new("build.gradle.kts", src.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }
}
