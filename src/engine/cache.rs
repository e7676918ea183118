//! Typed index of the Reasoner graph.

use std::collections::BTreeMap;

use crate::belief::{Belief, Justification, Node};
use crate::graph::Graph;
use crate::term::Iri;
use crate::vocab;

/// Beliefs and justifications discovered in the Reasoner graph.
///
/// Rebuilt wholesale; never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    beliefs: BTreeMap<Iri, Belief>,
    justifications: BTreeMap<Iri, Justification>,
}

impl Cache {
    /// Indexes every `Belief` and `Justification` instance in `graph`.
    #[must_use]
    pub fn build(graph: &Graph) -> Self {
        let beliefs = graph
            .instances_of(vocab::BELIEF)
            .into_iter()
            .map(|iri| {
                let belief = Belief {
                    premise: graph.has_type(&iri, vocab::PREMISE),
                    contradiction: graph.has_type(&iri, vocab::CONTRADICTION),
                    iri: iri.clone(),
                };
                (iri, belief)
            })
            .collect();

        let justifications = graph
            .instances_of(vocab::JUSTIFICATION)
            .into_iter()
            .map(|iri| {
                let j = Justification {
                    in_list: graph.objects(&iri, vocab::HAS_SUPPORT),
                    out_list: graph.objects(&iri, vocab::HAS_OPPOSITION),
                    consequents: graph.objects(&iri, vocab::JUSTIFIES),
                    iri: iri.clone(),
                };
                (iri, j)
            })
            .collect();

        Self {
            beliefs,
            justifications,
        }
    }

    /// Cached beliefs, sorted by identifier.
    pub fn beliefs(&self) -> impl Iterator<Item = &Belief> {
        self.beliefs.values()
    }

    /// Cached justifications, sorted by identifier.
    pub fn justifications(&self) -> impl Iterator<Item = &Justification> {
        self.justifications.values()
    }

    /// The cached belief named `iri`.
    #[must_use]
    pub fn belief(&self, iri: &Iri) -> Option<&Belief> {
        self.beliefs.get(iri)
    }

    /// The cached justification named `iri`.
    #[must_use]
    pub fn justification(&self, iri: &Iri) -> Option<&Justification> {
        self.justifications.get(iri)
    }

    /// Resolves an identifier to whichever kind of node it names.
    #[must_use]
    pub fn lookup(&self, iri: &Iri) -> Node<'_> {
        if let Some(b) = self.beliefs.get(iri) {
            Node::Belief(b)
        } else if let Some(j) = self.justifications.get(iri) {
            Node::Justification(j)
        } else {
            Node::None
        }
    }

    /// Beliefs that are not the consequent of any justification.
    #[must_use]
    pub fn leaf_beliefs(&self, graph: &Graph) -> Vec<&Belief> {
        self.beliefs()
            .filter(|b| !graph.has_property(&b.iri, vocab::JUSTIFIED_BY))
            .collect()
    }

    /// Justifications with no antecedent at all; they always hold.
    #[must_use]
    pub fn unconditional_justifications(&self, graph: &Graph) -> Vec<&Justification> {
        self.justifications()
            .filter(|j| !graph.has_property(&j.iri, vocab::HAS_ANTECEDENT))
            .collect()
    }

    /// Beliefs plus justifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.beliefs.len() + self.justifications.len()
    }

    /// True if the graph holds neither kind of node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.beliefs.is_empty() && self.justifications.is_empty()
    }
}
