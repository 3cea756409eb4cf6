//! `nuget-dependencies`: `<PackageReference>` entries from `.csproj` files.
//! Text-only — project files carry `LanguageTag::Other`, no AST facade.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::has_extension;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "nuget-dependencies",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "csproj"),
    scan,
};

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<PackageReference\s+Include="([^"]+)"\s+Version="([^"]+)"\s*/?>"#).unwrap()
    })
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    package_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap[1].to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Dependency,
                fingerprint: Fingerprint::component(FindingKind::Dependency, &name, LanguageTag::CSharp),
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
    fn extracts_package_reference_coordinate() {
        let xml = r#"<Project><ItemGroup><PackageReference Include="Microsoft.EntityFrameworkCore" Version="8.0.0" /></ItemGroup></Project>"#;
        let file = FileEvidence::new("App.csproj", xml.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Dependency { name, version } => {
                assert_eq!(name, "Microsoft.EntityFrameworkCore");
                assert_eq!(version.as_deref(), Some("8.0.0"));
            }
            _ => panic!("expected dependency payload"),
        }
    }
}
