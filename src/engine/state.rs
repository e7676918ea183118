//! Belief state and justification activity over a Reasoner graph.
//!
//! `holds` deliberately reads the materialized `hasState` flags rather than
//! recomputing [`state`]: the flags are what propagation has settled so far.

use crate::graph::Graph;
use crate::term::{Iri, Literal, Triple};
use crate::vocab;

fn state_fact(belief: &Iri, value: bool) -> Triple {
    Triple::new(belief, vocab::iri(vocab::HAS_STATE), Literal::boolean(value))
}

/// True iff `belief hasState true` is present.
#[must_use]
pub fn materialized_state(graph: &Graph, belief: &Iri) -> bool {
    graph.contains(&state_fact(belief, true))
}

/// The stored flag, or `None` when the belief has no `hasState` fact.
#[must_use]
pub fn stored_state(graph: &Graph, belief: &Iri) -> Option<bool> {
    if graph.contains(&state_fact(belief, true)) {
        Some(true)
    } else if graph.contains(&state_fact(belief, false)) {
        Some(false)
    } else {
        None
    }
}

/// Replaces the stored flag with `value`; returns the previous one.
pub fn set_state(graph: &mut Graph, belief: &Iri, value: bool) -> Option<bool> {
    let previous = stored_state(graph, belief);
    graph.remove(&state_fact(belief, !value));
    graph.insert(state_fact(belief, value));
    previous
}

/// Premises are held, contradictions are not, anything else is held iff
/// some justification of it holds. Never cached.
#[must_use]
pub fn state(graph: &Graph, belief: &Iri) -> bool {
    if graph.has_type(belief, vocab::PREMISE) {
        return true;
    }
    if graph.has_type(belief, vocab::CONTRADICTION) {
        return false;
    }
    graph
        .subjects(vocab::JUSTIFIES, belief)
        .iter()
        .any(|j| holds(graph, j))
}

/// Whether `justification` is currently active.
///
/// Blocked by an IN-list belief that is a contradiction or is stored as not
/// held (premises excepted), or by an OUT-list belief that is a premise or is
/// stored as held (contradictions excepted). A belief without a `hasState`
/// fact blocks nothing; empty lists never block.
#[must_use]
pub fn holds(graph: &Graph, justification: &Iri) -> bool {
    let in_blocked = graph
        .objects(justification, vocab::HAS_SUPPORT)
        .iter()
        .any(|b| {
            graph.has_type(b, vocab::CONTRADICTION)
                || (graph.contains(&state_fact(b, false)) && !graph.has_type(b, vocab::PREMISE))
        });
    if in_blocked {
        return false;
    }
    !graph
        .objects(justification, vocab::HAS_OPPOSITION)
        .iter()
        .any(|b| {
            graph.has_type(b, vocab::PREMISE)
                || (graph.contains(&state_fact(b, true)) && !graph.has_type(b, vocab::CONTRADICTION))
        })
}
