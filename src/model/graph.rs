//! The architecture model: the directed graph the merger produces and
//! renderers consume read-only (§3, §6).

use super::finding::{ComponentFingerprint, Confidence, Fingerprint, RelationKind};
use crate::types::Locatable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One piece of provenance behind a node or edge attribute: which
/// scanner, at which location, contributed it. Ordered by
/// `(file, line, scanner_id)` so a renderer can show why a tie-broken
/// attribute won without re-deriving the ordering (Design Note 1, §11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub scanner_id: &'static str,
    pub loc: Locatable,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentNode {
    pub fingerprint: ComponentFingerprint,
    pub name: String,
    pub confidence: Confidence,
    pub provenance: Vec<Provenance>,
}

/// An `endpoint` finding, attached to its owning component rather than
/// modeled as a graph node of its own (§8 scenario 2: "one `component`
/// node ... and one `endpoint` edge").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointEdge {
    pub component: ComponentFingerprint,
    pub verb: String,
    pub path: String,
    pub handler: Option<String>,
    pub provenance: Vec<Provenance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEdge {
    pub from: ComponentFingerprint,
    pub to: ComponentFingerprint,
    pub relation_kind: RelationKind,
    pub provenance: Vec<Provenance>,
}

/// The merger's immutable output (§3's "architecture model"). Nodes are
/// keyed by [`Fingerprint`] for O(1) lookup during merge; iteration is
/// exposed in the stable orders §6 requires (nodes by fingerprint string,
/// edges by `(src, dst, kind)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureModel {
    nodes: IndexMap<Fingerprint, ComponentNode>,
    endpoints: Vec<EndpointEdge>,
    relations: Vec<RelationEdge>,
}

impl ArchitectureModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, fingerprint: &Fingerprint) -> Option<&ComponentNode> {
        self.nodes.get(fingerprint)
    }

    pub(crate) fn insert_node(&mut self, fingerprint: Fingerprint, node: ComponentNode) {
        self.nodes.insert(fingerprint, node);
    }

    pub(crate) fn node_mut(&mut self, fingerprint: &Fingerprint) -> Option<&mut ComponentNode> {
        self.nodes.get_mut(fingerprint)
    }

    pub(crate) fn push_endpoint(&mut self, endpoint: EndpointEdge) {
        self.endpoints.push(endpoint);
    }

    pub(crate) fn push_relation(&mut self, relation: RelationEdge) {
        self.relations.push(relation);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.endpoints.len() + self.relations.len()
    }

    /// Nodes ordered by fingerprint string, as §6 requires of the
    /// contract exposed to renderers.
    pub fn nodes(&self) -> Vec<&ComponentNode> {
        let mut nodes: Vec<&ComponentNode> = self.nodes.values().collect();
        nodes.sort_by_key(|n| Fingerprint::Component(n.fingerprint.clone()).to_string());
        nodes
    }

    pub fn endpoints(&self) -> Vec<&EndpointEdge> {
        let mut endpoints: Vec<&EndpointEdge> = self.endpoints.iter().collect();
        endpoints.sort_by(|a, b| {
            (a.component.to_string(), &a.verb, &a.path).cmp(&(b.component.to_string(), &b.verb, &b.path))
        });
        endpoints
    }

    /// Relation edges ordered by `(src, dst, kind)` (§6).
    pub fn relations(&self) -> Vec<&RelationEdge> {
        let mut relations: Vec<&RelationEdge> = self.relations.iter().collect();
        relations.sort_by_key(|r| (r.from.to_string(), r.to.to_string(), format!("{:?}", r.relation_kind)));
        relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::finding::FindingKind;
    use crate::types::LanguageTag;

    #[test]
    fn empty_model_has_no_nodes_or_edges() {
        let model = ArchitectureModel::new();
        assert_eq!(model.node_count(), 0);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn nodes_are_ordered_by_fingerprint_string() {
        let mut model = ArchitectureModel::new();
        for name in ["Zebra", "Alpha"] {
            let fingerprint = ComponentFingerprint {
                kind: FindingKind::Component,
                canonical_name: name.to_string(),
                language: LanguageTag::Java,
            };
            model.insert_node(
                Fingerprint::Component(fingerprint.clone()),
                ComponentNode {
                    fingerprint,
                    name: name.to_string(),
                    confidence: Confidence::High,
                    provenance: Vec::new(),
                },
            );
        }
        let names: Vec<&str> = model.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zebra"]);
    }
}
