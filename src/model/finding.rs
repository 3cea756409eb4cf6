//! The finding model: what a scanner emits, and the fingerprint that
//! gives it a deterministic identity across runs (§3).

use crate::types::{LanguageTag, Locatable};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    Component,
    Endpoint,
    Dependency,
    MessageProducer,
    MessageConsumer,
    DataStore,
    Schema,
    Relation,
}

impl FindingKind {
    fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Component => "component",
            FindingKind::Endpoint => "endpoint",
            FindingKind::Dependency => "dependency",
            FindingKind::MessageProducer => "message-producer",
            FindingKind::MessageConsumer => "message-consumer",
            FindingKind::DataStore => "data-store",
            FindingKind::Schema => "schema",
            FindingKind::Relation => "relation",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence of a finding's provenance: `High` from a successful grammar
/// parse, `Low` from the regex fallback or text heuristics, `Inferred`
/// for a component node the merger synthesized rather than a scanner
/// having emitted it directly (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Low,
    Inferred,
}

/// A component-shaped identity: `(kind, canonical name, language)` (§3).
/// Used directly for component/dependency/data-store/schema/message-*
/// nodes, and embedded inside [`Fingerprint::Endpoint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentFingerprint {
    pub kind: FindingKind,
    pub canonical_name: String,
    pub language: LanguageTag,
}

impl fmt::Display for ComponentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.language, self.canonical_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointFingerprint {
    pub component: ComponentFingerprint,
    pub verb: String,
    pub path: String,
}

impl fmt::Display for EndpointFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.component, self.verb, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fingerprint {
    Component(ComponentFingerprint),
    Endpoint(EndpointFingerprint),
}

impl Fingerprint {
    pub fn component(kind: FindingKind, canonical_name: impl Into<String>, language: LanguageTag) -> Self {
        Fingerprint::Component(ComponentFingerprint {
            kind,
            canonical_name: canonical_name.into(),
            language,
        })
    }

    pub fn endpoint(component: ComponentFingerprint, verb: &str, path: &str) -> Self {
        Fingerprint::Endpoint(EndpointFingerprint {
            component,
            verb: verb.to_ascii_uppercase(),
            path: normalize_path(path),
        })
    }

    pub fn as_component(&self) -> Option<&ComponentFingerprint> {
        match self {
            Fingerprint::Component(c) => Some(c),
            Fingerprint::Endpoint(e) => Some(&e.component),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Component(c) => write!(f, "{c}"),
            Fingerprint::Endpoint(e) => write!(f, "{e}"),
        }
    }
}

/// Collapse consecutive slashes, strip a trailing slash (except the bare
/// root `/`), lowercase a leading `scheme://` if present, and leave
/// path-parameter placeholders (`{id}`, `:id`) untouched (§3).
pub fn normalize_path(path: &str) -> String {
    let (scheme, rest) = match path.split_once("://") {
        Some((scheme, rest)) => (Some(scheme.to_ascii_lowercase()), rest),
        None => (None, path),
    };
    let mut collapsed = String::with_capacity(rest.len());
    let mut prev_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        collapsed.push(c);
    }
    if collapsed.len() > 1 && collapsed.ends_with('/') {
        collapsed.pop();
    }
    match scheme {
        Some(scheme) => format!("{scheme}://{collapsed}"),
        None => collapsed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    SynchronousCall,
    EventPublication,
    EventConsumption,
    SchemaReference,
    Persistence,
}

/// The kind-specific payload of a finding. Each variant mirrors the shape
/// the representative scanner rules in §4.3 describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FindingPayload {
    Component {
        name: String,
    },
    Endpoint {
        verb: String,
        path: String,
        handler: Option<String>,
    },
    Dependency {
        name: String,
        version: Option<String>,
    },
    MessageProducer {
        channel: String,
        /// The consumer-side canonical name this producer targets, when
        /// statically resolvable (e.g. the Celery task's function name).
        target: Option<String>,
    },
    MessageConsumer {
        channel: String,
    },
    DataStore {
        store_kind: String,
    },
    Schema {
        schema_kind: String,
    },
    Relation {
        to: Fingerprint,
        relation_kind: RelationKind,
    },
}

/// The minimal evidentiary record a scanner emits (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub scanner_id: &'static str,
    pub kind: FindingKind,
    pub loc: Locatable,
    pub confidence: Confidence,
    pub fingerprint: Fingerprint,
    pub payload: FindingPayload,
}

impl Finding {
    pub fn sort_key(&self) -> (String, u32, &'static str) {
        (self.loc.file.to_string_lossy().into_owned(), self.loc.line, self.scanner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_consecutive_slashes_and_trailing_slash() {
        assert_eq!(normalize_path("/api//v1/orders/"), "/api/v1/orders");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/orders/{id}"), "/orders/{id}");
    }

    #[test]
    fn lowercases_scheme_only() {
        assert_eq!(normalize_path("HTTP://Example/Path/"), "http://Example/Path");
    }

    #[test]
    fn endpoint_fingerprint_uppercases_verb() {
        let component = ComponentFingerprint {
            kind: FindingKind::Component,
            canonical_name: "OrderController".into(),
            language: LanguageTag::Java,
        };
        let fp = Fingerprint::endpoint(component, "get", "/orders/{id}/");
        match fp {
            Fingerprint::Endpoint(e) => {
                assert_eq!(e.verb, "GET");
                assert_eq!(e.path, "/orders/{id}");
            }
            _ => panic!("expected endpoint fingerprint"),
        }
    }
}
