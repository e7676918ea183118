//! Validity rules checked on a candidate (explicit plus entailed) fact set.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::SchemaConfig;
use crate::graph::Graph;
use crate::pattern::{var, TriplePattern};
use crate::term::Term;
use crate::vocab;

fn typed_terms(candidate: &Graph, class: &'static str) -> BTreeSet<Term> {
    candidate
        .select(&TriplePattern::instances_of(class), "x")
        .into_iter()
        .collect()
}

fn object_properties() -> impl Iterator<Item = &'static str> {
    vocab::INVERSE_PAIRS.iter().flat_map(|(a, b)| [*a, *b])
}

/// Returns one message per violated rule instance; empty means valid.
#[must_use]
pub fn diagnose(candidate: &Graph, config: &SchemaConfig) -> Vec<String> {
    let mut out = Vec::new();

    let beliefs = typed_terms(candidate, vocab::BELIEF);
    let justifications = typed_terms(candidate, vocab::JUSTIFICATION);
    for both in beliefs.intersection(&justifications) {
        out.push(format!("{both} is both a Belief and a Justification"));
    }

    for predicate in object_properties() {
        let pattern = TriplePattern::new(var("s"), vocab::iri(predicate), var("o"));
        for t in candidate.matching(&pattern) {
            if t.object.is_literal() {
                out.push(format!("Literal object on <{predicate}>: {t}"));
            }
        }
    }

    let mut held: BTreeMap<Term, BTreeSet<bool>> = BTreeMap::new();
    let pattern = TriplePattern::new(var("s"), vocab::iri(vocab::HAS_STATE), var("o"));
    for t in candidate.matching(&pattern) {
        match t.object.as_literal().and_then(|lit| lit.as_bool()) {
            Some(value) => {
                held.entry(t.subject.clone()).or_default().insert(value);
            }
            None => out.push(format!("hasState must be an xsd:boolean literal: {t}")),
        }
    }
    for (subject, values) in &held {
        if values.len() > 1 {
            out.push(format!("{subject} has both hasState true and hasState false"));
        }
    }

    if config.forbid_premise_contradiction {
        let premises = typed_terms(candidate, vocab::PREMISE);
        let contradictions = typed_terms(candidate, vocab::CONTRADICTION);
        for both in premises.intersection(&contradictions) {
            out.push(format!("{both} is both a Premise and a Contradiction"));
        }
    }

    if config.reject_justification_cycles {
        for entry in cycle_entries(candidate) {
            out.push(format!("Justification cycle through {entry}"));
        }
    }

    out
}

/// Belief-to-belief edges: `b antecedentOf j`, `j justifies c` gives `b -> c`.
fn belief_edges(candidate: &Graph) -> BTreeMap<Term, BTreeSet<Term>> {
    let mut edges: BTreeMap<Term, BTreeSet<Term>> = BTreeMap::new();
    let antecedent_of = TriplePattern::new(var("b"), vocab::iri(vocab::ANTECEDENT_OF), var("j"));
    for t in candidate.matching(&antecedent_of) {
        let justifies = TriplePattern::new(&t.object, vocab::iri(vocab::JUSTIFIES), var("c"));
        for consequent in candidate.select(&justifies, "c") {
            edges.entry(t.subject.clone()).or_default().insert(consequent);
        }
    }
    edges
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Beliefs at which a depth-first walk closes a cycle, sorted.
fn cycle_entries(candidate: &Graph) -> BTreeSet<Term> {
    let edges = belief_edges(candidate);
    let mut marks: BTreeMap<&Term, Mark> = BTreeMap::new();
    let mut entries = BTreeSet::new();

    for root in edges.keys() {
        if marks.contains_key(root) {
            continue;
        }
        let mut stack: Vec<(&Term, Vec<&Term>)> = vec![(root, successors(&edges, root))];
        marks.insert(root, Mark::OnPath);

        while let Some((node, pending)) = stack.last_mut() {
            let Some(next) = pending.pop() else {
                marks.insert(*node, Mark::Done);
                stack.pop();
                continue;
            };
            match marks.get(next) {
                Some(Mark::OnPath) => {
                    entries.insert(next.clone());
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::OnPath);
                    stack.push((next, successors(&edges, next)));
                }
            }
        }
    }
    entries
}

fn successors<'a>(edges: &'a BTreeMap<Term, BTreeSet<Term>>, node: &Term) -> Vec<&'a Term> {
    edges
        .get(node)
        .map(|next| next.iter().rev().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::entail;
    use crate::term::{Iri, Literal, Triple};

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn closed(triples: Vec<Triple>) -> Graph {
        let kb: Graph = triples.into();
        kb.union(&entail(&kb))
    }

    fn typed(s: &str, class: &'static str) -> Triple {
        Triple::new(iri(s), vocab::iri(vocab::RDF_TYPE), vocab::iri(class))
    }

    fn edge(s: &str, p: &'static str, o: &str) -> Triple {
        Triple::new(iri(s), vocab::iri(p), iri(o))
    }

    #[test]
    fn test_well_formed_network_is_valid() {
        let g = closed(vec![
            typed("urn:a", vocab::PREMISE),
            edge("urn:j", vocab::HAS_SUPPORT, "urn:a"),
            edge("urn:j", vocab::JUSTIFIES, "urn:b"),
            Triple::new(iri("urn:b"), vocab::iri(vocab::HAS_STATE), true),
        ]);
        assert!(diagnose(&g, &SchemaConfig::default()).is_empty());
    }

    #[test]
    fn test_belief_justification_disjoint() {
        let g = closed(vec![
            typed("urn:x", vocab::BELIEF),
            typed("urn:x", vocab::JUSTIFICATION),
        ]);
        let d = diagnose(&g, &SchemaConfig::default());
        assert_eq!(d.len(), 1);
        assert!(d[0].contains("both a Belief and a Justification"));
    }

    #[test]
    fn test_disjointness_through_domain_typing() {
        // urn:j justifies urn:b and urn:b justifies urn:c: urn:b is typed both ways.
        let g = closed(vec![
            edge("urn:j", vocab::JUSTIFIES, "urn:b"),
            edge("urn:b", vocab::JUSTIFIES, "urn:c"),
        ]);
        assert!(!diagnose(&g, &SchemaConfig::default()).is_empty());
    }

    #[test]
    fn test_literal_object_rejected() {
        let g = closed(vec![Triple::new(
            iri("urn:j"),
            vocab::iri(vocab::JUSTIFIES),
            Literal::string("oops"),
        )]);
        let d = diagnose(&g, &SchemaConfig::default());
        assert!(d.iter().any(|m| m.starts_with("Literal object")));
    }

    #[test]
    fn test_has_state_must_be_boolean() {
        let g = closed(vec![Triple::new(
            iri("urn:b"),
            vocab::iri(vocab::HAS_STATE),
            Literal::string("maybe"),
        )]);
        assert_eq!(diagnose(&g, &SchemaConfig::default()).len(), 1);

        let g = closed(vec![
            Triple::new(iri("urn:b"), vocab::iri(vocab::HAS_STATE), true),
            Triple::new(iri("urn:b"), vocab::iri(vocab::HAS_STATE), false),
        ]);
        let d = diagnose(&g, &SchemaConfig::default());
        assert_eq!(d, vec!["<urn:b> has both hasState true and hasState false".to_string()]);
    }

    #[test]
    fn test_premise_contradiction_only_when_forbidden() {
        let g = closed(vec![
            typed("urn:b", vocab::PREMISE),
            typed("urn:b", vocab::CONTRADICTION),
        ]);
        assert!(diagnose(&g, &SchemaConfig::default()).is_empty());
        let strict = SchemaConfig {
            forbid_premise_contradiction: true,
            ..SchemaConfig::default()
        };
        assert_eq!(diagnose(&g, &strict).len(), 1);
    }

    #[test]
    fn test_cycles_only_when_rejected() {
        let g = closed(vec![
            edge("urn:j1", vocab::HAS_SUPPORT, "urn:a"),
            edge("urn:j1", vocab::JUSTIFIES, "urn:b"),
            edge("urn:j2", vocab::HAS_OPPOSITION, "urn:b"),
            edge("urn:j2", vocab::JUSTIFIES, "urn:a"),
        ]);
        assert!(diagnose(&g, &SchemaConfig::default()).is_empty());

        let strict = SchemaConfig {
            reject_justification_cycles: true,
            ..SchemaConfig::default()
        };
        let d = diagnose(&g, &strict);
        assert_eq!(d.len(), 1);
        assert!(d[0].starts_with("Justification cycle through"));
    }

    #[test]
    fn test_chain_is_not_a_cycle() {
        let g = closed(vec![
            edge("urn:j1", vocab::HAS_SUPPORT, "urn:a"),
            edge("urn:j1", vocab::JUSTIFIES, "urn:b"),
            edge("urn:j2", vocab::HAS_SUPPORT, "urn:b"),
            edge("urn:j2", vocab::JUSTIFIES, "urn:c"),
            edge("urn:j3", vocab::HAS_SUPPORT, "urn:a"),
            edge("urn:j3", vocab::JUSTIFIES, "urn:c"),
        ]);
        let strict = SchemaConfig {
            reject_justification_cycles: true,
            ..SchemaConfig::default()
        };
        assert!(diagnose(&g, &strict).is_empty());
    }
}
