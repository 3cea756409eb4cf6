//! The finding merger: canonicalizes a flat finding list into an
//! [`ArchitectureModel`] (§4.5). Every finding kind other than `endpoint`
//! and `relation` carries a component-shaped [`Fingerprint`] and becomes
//! (or contributes to) a graph node directly; `endpoint` findings attach
//! to their owning component; `relation` findings, plus producer/consumer
//! pairing, become edges.

use super::finding::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use super::graph::{ArchitectureModel, ComponentNode, EndpointEdge, Provenance, RelationEdge};
use std::collections::HashMap;

fn confidence_rank(c: Confidence) -> u8 {
    match c {
        Confidence::Inferred => 0,
        Confidence::Low => 1,
        Confidence::High => 2,
    }
}

struct EndpointWinner {
    handler: Option<String>,
    confidence: Confidence,
    scanner_rank: usize,
    provenance: Vec<Provenance>,
}

pub struct FindingMerger<'a> {
    /// Scanner registration order, used only to break ties between
    /// equal-confidence findings that disagree on a non-identity
    /// attribute (Design Note 1, §9).
    scanner_priority: &'a HashMap<&'static str, usize>,
}

impl<'a> FindingMerger<'a> {
    pub fn new(scanner_priority: &'a HashMap<&'static str, usize>) -> Self {
        Self { scanner_priority }
    }

    fn rank_of(&self, scanner_id: &str) -> usize {
        self.scanner_priority.get(scanner_id).copied().unwrap_or(usize::MAX)
    }

    pub fn merge(&self, findings: Vec<Finding>) -> ArchitectureModel {
        let mut findings = findings;
        findings.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut model = ArchitectureModel::new();
        let mut endpoint_winners: HashMap<Fingerprint, EndpointWinner> = HashMap::new();
        let mut relations: HashMap<(String, String, &'static str), RelationEdge> = HashMap::new();

        for finding in &findings {
            match finding.kind {
                FindingKind::Endpoint => {
                    self.ensure_node(&mut model, finding, Confidence::Inferred);
                    self.fold_endpoint(&mut endpoint_winners, finding);
                }
                FindingKind::Relation => {
                    self.ensure_node(&mut model, finding, Confidence::Inferred);
                    if let FindingPayload::Relation { to, relation_kind } = &finding.payload {
                        self.ensure_node_for_fingerprint(&mut model, to, finding, Confidence::Inferred);
                        let Some(from) = finding.fingerprint.as_component() else { continue };
                        let Some(to_component) = to.as_component() else { continue };
                        let key = (from.to_string(), to_component.to_string(), relation_kind_key(*relation_kind));
                        relations
                            .entry(key)
                            .and_modify(|edge| edge.provenance.push(provenance_of(finding)))
                            .or_insert_with(|| RelationEdge {
                                from: from.clone(),
                                to: to_component.clone(),
                                relation_kind: *relation_kind,
                                provenance: vec![provenance_of(finding)],
                            });
                    }
                }
                _ => {
                    self.fold_node(&mut model, finding);
                }
            }
        }

        self.pair_producers_and_consumers(&findings, &mut relations);

        for (fingerprint, winner) in endpoint_winners {
            if let Fingerprint::Endpoint(ep) = &fingerprint {
                model.push_endpoint(EndpointEdge {
                    component: ep.component.clone(),
                    verb: ep.verb.clone(),
                    path: ep.path.clone(),
                    handler: winner.handler,
                    provenance: winner.provenance,
                });
            }
        }
        for edge in relations.into_values() {
            model.push_relation(edge);
        }
        model
    }

    fn ensure_node(&self, model: &mut ArchitectureModel, finding: &Finding, synth_confidence: Confidence) {
        self.ensure_node_for_fingerprint(model, &finding.fingerprint, finding, synth_confidence);
    }

    fn ensure_node_for_fingerprint(
        &self,
        model: &mut ArchitectureModel,
        fingerprint: &Fingerprint,
        finding: &Finding,
        synth_confidence: Confidence,
    ) {
        let Some(component) = fingerprint.as_component() else {
            return;
        };
        let key = Fingerprint::Component(component.clone());
        if model.node(&key).is_some() {
            return;
        }
        model.insert_node(
            key,
            ComponentNode {
                fingerprint: component.clone(),
                name: component.canonical_name.clone(),
                confidence: synth_confidence,
                provenance: vec![provenance_of(finding)],
            },
        );
    }

    /// First finding for a fingerprint defines node identity; later
    /// findings with the same fingerprint only add provenance, except a
    /// strictly higher-confidence finding upgrades the recorded
    /// confidence (§4.5).
    fn fold_node(&self, model: &mut ArchitectureModel, finding: &Finding) {
        let Some(component) = finding.fingerprint.as_component() else {
            return;
        };
        let key = Fingerprint::Component(component.clone());
        match model.node_mut(&key) {
            Some(node) => {
                node.provenance.push(provenance_of(finding));
                if confidence_rank(finding.confidence) > confidence_rank(node.confidence) {
                    node.confidence = finding.confidence;
                }
            }
            None => {
                model.insert_node(
                    key,
                    ComponentNode {
                        fingerprint: component.clone(),
                        name: component.canonical_name.clone(),
                        confidence: finding.confidence,
                        provenance: vec![provenance_of(finding)],
                    },
                );
            }
        }
    }

    fn fold_endpoint(&self, winners: &mut HashMap<Fingerprint, EndpointWinner>, finding: &Finding) {
        let handler = match &finding.payload {
            FindingPayload::Endpoint { handler, .. } => handler.clone(),
            _ => None,
        };
        let rank = self.rank_of(finding.scanner_id);
        match winners.get_mut(&finding.fingerprint) {
            Some(winner) => {
                winner.provenance.push(provenance_of(finding));
                let new_rank = confidence_rank(finding.confidence);
                let cur_rank = confidence_rank(winner.confidence);
                if new_rank > cur_rank || (new_rank == cur_rank && rank < winner.scanner_rank) {
                    winner.handler = handler;
                    winner.confidence = finding.confidence;
                    winner.scanner_rank = rank;
                }
            }
            None => {
                winners.insert(
                    finding.fingerprint.clone(),
                    EndpointWinner {
                        handler,
                        confidence: finding.confidence,
                        scanner_rank: rank,
                        provenance: vec![provenance_of(finding)],
                    },
                );
            }
        }
    }

    /// Pairs `message-producer` and `message-consumer` findings on
    /// matching channel name (§4.5), independent of their own
    /// fingerprints' canonical names.
    fn pair_producers_and_consumers(
        &self,
        findings: &[Finding],
        relations: &mut HashMap<(String, String, &'static str), RelationEdge>,
    ) {
        let producers = findings.iter().filter(|f| f.kind == FindingKind::MessageProducer);
        let consumers: Vec<&Finding> = findings
            .iter()
            .filter(|f| f.kind == FindingKind::MessageConsumer)
            .collect();
        for producer in producers {
            let FindingPayload::MessageProducer { channel, .. } = &producer.payload else {
                continue;
            };
            let Some(from) = producer.fingerprint.as_component() else {
                continue;
            };
            for consumer in &consumers {
                let FindingPayload::MessageConsumer { channel: consumer_channel } = &consumer.payload else {
                    continue;
                };
                if !channel.eq_ignore_ascii_case(consumer_channel) {
                    continue;
                }
                let Some(to) = consumer.fingerprint.as_component() else {
                    continue;
                };
                let key = (from.to_string(), to.to_string(), relation_kind_key(super::finding::RelationKind::EventPublication));
                relations
                    .entry(key)
                    .and_modify(|edge| {
                        edge.provenance.push(provenance_of(producer));
                        edge.provenance.push(provenance_of(consumer));
                    })
                    .or_insert_with(|| RelationEdge {
                        from: from.clone(),
                        to: to.clone(),
                        relation_kind: super::finding::RelationKind::EventPublication,
                        provenance: vec![provenance_of(producer), provenance_of(consumer)],
                    });
            }
        }
    }
}

fn relation_kind_key(kind: super::finding::RelationKind) -> &'static str {
    use super::finding::RelationKind::*;
    match kind {
        SynchronousCall => "synchronous-call",
        EventPublication => "event-publication",
        EventConsumption => "event-consumption",
        SchemaReference => "schema-reference",
        Persistence => "persistence",
    }
}

fn provenance_of(finding: &Finding) -> Provenance {
    Provenance {
        scanner_id: finding.scanner_id,
        loc: finding.loc.clone(),
        confidence: finding.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::finding::FindingKind;
    use crate::types::{FileEvidence, LanguageTag};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn loc() -> crate::types::Locatable {
        FileEvidence::new("a.rb", b"x".to_vec()).locatable_at_line(1)
    }

    #[test]
    fn duplicate_fingerprint_contributes_provenance_not_a_new_node() {
        let priority = HashMap::new();
        let merger = FindingMerger::new(&priority);
        let fp = Fingerprint::component(FindingKind::Component, "OrderController", LanguageTag::Java);
        let findings = vec![
            Finding {
                scanner_id: "spring-rest-api",
                kind: FindingKind::Component,
                loc: loc(),
                confidence: Confidence::High,
                fingerprint: fp.clone(),
                payload: FindingPayload::Component { name: "OrderController".into() },
            },
            Finding {
                scanner_id: "spring-rest-api",
                kind: FindingKind::Component,
                loc: loc(),
                confidence: Confidence::High,
                fingerprint: fp.clone(),
                payload: FindingPayload::Component { name: "OrderController".into() },
            },
        ];
        let model = merger.merge(findings);
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.node(&fp).unwrap().provenance.len(), 2);
    }

    #[test]
    fn celery_producer_consumer_pairing_creates_one_relation() {
        let priority = HashMap::new();
        let merger = FindingMerger::new(&priority);
        let consumer_fp = Fingerprint::component(FindingKind::MessageConsumer, "send_email", LanguageTag::Python);
        let producer_fp = Fingerprint::component(FindingKind::MessageProducer, "send_email", LanguageTag::Python);
        let findings = vec![
            Finding {
                scanner_id: "celery-tasks",
                kind: FindingKind::MessageConsumer,
                loc: loc(),
                confidence: Confidence::High,
                fingerprint: consumer_fp,
                payload: FindingPayload::MessageConsumer { channel: "celery".into() },
            },
            Finding {
                scanner_id: "celery-tasks",
                kind: FindingKind::MessageProducer,
                loc: loc(),
                confidence: Confidence::High,
                fingerprint: producer_fp,
                payload: FindingPayload::MessageProducer {
                    channel: "celery".into(),
                    target: Some("send_email".into()),
                },
            },
        ];
        let model = merger.merge(findings);
        assert_eq!(model.relations().len(), 1);
    }
}
