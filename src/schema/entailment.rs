//! Forward-chaining entailment for the JTMS schema.
//!
//! Rules, applied to a fixpoint:
//! - `Premise ⊑ Belief`, `Contradiction ⊑ Belief`
//! - `hasSupport, hasOpposition ⊑ hasAntecedent`; `supports, opposes ⊑ antecedentOf`
//! - inverse pairs (`hasSupport`/`supports`, `hasOpposition`/`opposes`,
//!   `hasAntecedent`/`antecedentOf`, `justifies`/`justifiedBy`)
//! - domains and ranges type both ends of those properties; `hasState`
//!   types its subject as a belief

use std::collections::VecDeque;

use crate::graph::Graph;
use crate::term::{Term, Triple};
use crate::vocab;

fn supers(pairs: &[(&'static str, &'static str)], key: &str) -> Vec<&'static str> {
    pairs
        .iter()
        .filter(|(sub, _)| *sub == key)
        .map(|(_, sup)| *sup)
        .collect()
}

fn inverse_of(predicate: &str) -> Option<&'static str> {
    vocab::INVERSE_PAIRS.iter().find_map(|(a, b)| {
        if *a == predicate {
            Some(*b)
        } else if *b == predicate {
            Some(*a)
        } else {
            None
        }
    })
}

fn typed(subject: Term, class: &'static str) -> Triple {
    Triple::new(subject, vocab::iri(vocab::RDF_TYPE), vocab::iri(class))
}

/// Direct consequences of one triple.
fn consequences(t: &Triple) -> Vec<Triple> {
    let mut out = Vec::new();
    let p = t.predicate.as_str();

    if p == vocab::RDF_TYPE {
        if let Term::Iri(class) = &t.object {
            for sup in supers(&vocab::SUB_CLASSES, class.as_str()) {
                out.push(typed(t.subject.clone(), sup));
            }
        }
        return out;
    }

    if p == vocab::HAS_STATE {
        out.push(typed(t.subject.clone(), vocab::BELIEF));
        return out;
    }

    for sup in supers(&vocab::SUB_PROPERTIES, p) {
        out.push(Triple::new(t.subject.clone(), vocab::iri(sup), t.object.clone()));
    }

    let (domain, range) = if vocab::JUSTIFICATION_TO_BELIEF.contains(&p) {
        (vocab::JUSTIFICATION, vocab::BELIEF)
    } else if vocab::BELIEF_TO_JUSTIFICATION.contains(&p) {
        (vocab::BELIEF, vocab::JUSTIFICATION)
    } else {
        return out;
    };

    out.push(typed(t.subject.clone(), domain));

    // Literal objects violate the schema; the rules report them instead.
    if t.object.is_literal() {
        return out;
    }
    out.push(typed(t.object.clone(), range));
    if let Some(inv) = inverse_of(p) {
        out.push(Triple::new(t.object.clone(), vocab::iri(inv), t.subject.clone()));
    }
    out
}

/// Facts entailed by `explicit` under the JTMS schema, excluding `explicit`
/// itself.
#[must_use]
pub fn entail(explicit: &Graph) -> Graph {
    let mut all = explicit.clone();
    let mut entailed = Graph::new();
    let mut queue: VecDeque<Triple> = explicit.iter().cloned().collect();

    while let Some(t) = queue.pop_front() {
        for derived in consequences(&t) {
            if all.insert(derived.clone()) {
                entailed.insert(derived.clone());
                queue.push_back(derived);
            }
        }
    }
    entailed
}
