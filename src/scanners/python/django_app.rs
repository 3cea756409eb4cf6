//! `django-app`: class-based views (`View`, `APIView`, `ViewSet`,
//! `ModelViewSet`, `GenericAPIView` subclasses) become `component`
//! findings; `path(...)`/`re_path(...)` registrations in a `urls.py`
//! become `endpoint` findings attached to the referenced view.

use crate::ast::Ast;
use crate::ast::extract_positional;
use crate::model::{Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::{confidence_of, util::has_extension};
use crate::types::{FileEvidence, LanguageTag};

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "django-app",
    language: LanguageTag::Python,
    matches: |path| has_extension(path, "py"),
    scan,
};

const VIEW_BASES: &[&str] = &["View", "APIView", "ViewSet", "ModelViewSet", "GenericAPIView"];
const ROUTE_FUNCTIONS: &[&str] = &["path", "re_path"];

fn view_name_from_handler(handler: &str) -> String {
    handler
        .trim_end_matches(".as_view()")
        .rsplit('.')
        .next()
        .unwrap_or(handler)
        .to_string()
}

fn scan(file: &FileEvidence, ast: ScannerAst, parse_confidence: ParseConfidence) -> Vec<Finding> {
    let Some(Ast::Python(body)) = ast else { return Vec::new() };
    let confidence = confidence_of(parse_confidence);
    let mut findings = Vec::new();

    for view in body.types.iter().filter(|t| {
        t.superclass.as_deref().is_some_and(|s| VIEW_BASES.iter().any(|base| s.ends_with(base)))
    }) {
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Component,
            fingerprint: Fingerprint::component(FindingKind::Component, &view.qualified_name, LanguageTag::Python),
            confidence,
            loc: view.loc.clone(),
            payload: FindingPayload::Component { name: view.name.clone() },
        });
    }

    for call in body.call_sites.iter().filter(|c| c.receiver.is_none() && ROUTE_FUNCTIONS.contains(&c.method.as_str())) {
        let Some(pattern) = extract_positional(&call.arguments, 0) else { continue };
        let Some(handler) = extract_positional(&call.arguments, 1) else { continue };
        let view_name = view_name_from_handler(&handler);
        let component = Fingerprint::component(FindingKind::Component, &view_name, LanguageTag::Python);
        let Fingerprint::Component(component) = component else { unreachable!() };
        let path = if pattern.starts_with('/') { pattern } else { format!("/{pattern}") };
        findings.push(Finding {
            scanner_id: DESCRIPTOR.id,
            kind: FindingKind::Endpoint,
            fingerprint: Fingerprint::endpoint(component, "GET", &path),
            confidence,
            loc: call.loc.clone(),
            payload: FindingPayload::Endpoint { verb: "GET".to_string(), path, handler: Some(view_name) },
        });
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBody, CallSite};

    #[test]
    fn apiview_subclass_emits_component() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("views.py", b"class OrderView(APIView):\n    pass\n".to_vec());
        body.types.push(crate::ast::DeclaredType {
            loc: file.locatable_at_line(1),
            name: "OrderView".into(),
            qualified_name: "OrderView".into(),
            superclass: Some("APIView".into()),
            annotations: vec![],
        });
        let ast = Ast::Python(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn path_registration_emits_endpoint() {
        let mut body = AstBody::default();
        let file = FileEvidence::new("urls.py", b"urlpatterns = []".to_vec());
        body.call_sites.push(CallSite {
            loc: file.locatable_at_line(1),
            receiver: None,
            method: "path".into(),
            arguments: "\"orders/<int:id>/\", OrderView.as_view()".into(),
            caller: None,
        });
        let ast = Ast::Python(body);
        let findings = scan(&file, Some(&ast), ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::Endpoint { path, handler, .. } => {
                assert_eq!(path, "/orders/<int:id>/");
                assert_eq!(handler.as_deref(), Some("OrderView"));
            }
            _ => panic!("expected endpoint payload"),
        }
    }
}
