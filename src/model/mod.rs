//! The canonical architecture model: findings in, a deduplicated,
//! cross-linked component graph out (§3, §4.5).

pub mod finding;
pub mod graph;
pub mod merger;

pub use finding::{
    ComponentFingerprint, Confidence, EndpointFingerprint, Finding, FindingKind, FindingPayload,
    Fingerprint, RelationKind,
};
pub use graph::{ArchitectureModel, ComponentNode, EndpointEdge, Provenance, RelationEdge};
pub use merger::FindingMerger;
