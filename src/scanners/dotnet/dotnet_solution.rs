//! `dotnet-solution`: each `Project(...) = "Name", "Path.csproj", "{GUID}"`
//! line in a `.sln` file becomes a `component` finding for that project.
//! Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::has_extension;
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "dotnet-solution",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "sln"),
    scan,
};

fn project_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^Project\("\{[0-9A-Fa-f-]+\}"\)\s*=\s*"([^"]+)",\s*"([^"]+\.csproj)""#).unwrap()
    })
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    project_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap[1].to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::Component,
                fingerprint: Fingerprint::component(FindingKind::Component, &name, LanguageTag::CSharp),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::Component { name },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_project_entry() {
        let sln = "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Orders.Api\", \"src\\Orders.Api\\Orders.Api.csproj\", \"{11111111-1111-1111-1111-111111111111}\"\nEndProject\n";
        let file = FileEvidence::new("Orders.sln", sln.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Component { name } => assert_eq!(name, "Orders.Api"),
            _ => panic!("expected component payload"),
        }
    }
}
