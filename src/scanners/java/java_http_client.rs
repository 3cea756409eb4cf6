//! `java-http-client`: call sites against common outbound HTTP clients
//! (`RestTemplate`, `WebClient`, `OkHttpClient`) become `synchronous_call`
//! relation findings from the enclosing class to the call's target, when a
//! string literal path/URL argument is present.

use crate::ast::Ast;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint, RelationKind};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "java-http-client",
    language: LanguageTag::Java,
    matches: |path| has_extension(path, "java"),
    scan,
};

const CLIENT_METHODS: &[&str] = &[
    "getForObject",
    "getForEntity",
    "postForObject",
    "postForEntity",
    "exchange",
    "put",
    "delete",
];

const CLIENT_RECEIVER_HINTS: &[&str] = &["restTemplate", "webClient", "httpClient", "okHttpClient"];

fn is_http_client_call(receiver: &str, method: &str) -> bool {
    let receiver_lower = receiver.to_lowercase();
    CLIENT_RECEIVER_HINTS.iter().any(|hint| receiver_lower.contains(&hint.to_lowercase()))
        || CLIENT_METHODS.contains(&method)
}

fn first_string_literal(arguments: &str) -> Option<String> {
    let start = arguments.find('"')? + 1;
    let rest = &arguments[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Java(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for call in &body.call_sites {
        let Some(receiver) = &call.receiver else { continue };
        if !is_http_client_call(receiver, &call.method) {
            continue;
        }
        let Some(caller) = &call.caller else { continue };
        let Some(target_path) = first_string_literal(&call.arguments) else { continue };
        let caller_type = body
            .methods
            .iter()
            .find(|m| &m.name == caller)
            .and_then(|m| m.owner.clone())
            .unwrap_or_else(|| caller.clone());
        let from = Fingerprint::component(FindingKind::Component, &caller_type, LanguageTag::Java);
        let to = Fingerprint::component(FindingKind::Component, &target_path, LanguageTag::Java);
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Relation,
            fingerprint: from,
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::Relation { to, relation_kind: RelationKind::SynchronousCall },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, CallSite, MethodDecl};

    #[test]
    fn resttemplate_call_with_literal_path_emits_synchronous_call() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("OrderClient.java", b"class OrderClient {}".to_vec());
        body.methods.push(MethodDecl {
            loc: file.locatable_at_line(1),
            name: "fetch".into(),
            parameters: vec![],
            is_async: false,
            decorators: vec![],
            owner: Some("OrderClient".into()),
        });
        body.call_sites.push(CallSite {
            loc: file.locatable_at_line(2),
            receiver: Some("restTemplate".into()),
            method: "getForObject".into(),
            arguments: "\"/orders/{id}\", Order.class".into(),
            caller: Some("fetch".into()),
        });
        let ast = Ast::Java(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Relation { to, relation_kind } => {
                assert_eq!(*relation_kind, RelationKind::SynchronousCall);
                assert_eq!(to.as_component().unwrap().canonical_name, "/orders/{id}");
            }
            _ => panic!("expected relation payload"),
        }
    }
}
