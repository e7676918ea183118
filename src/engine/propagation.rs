//! Propagation of belief state changes to their consequents.
//!
//! Starting from a belief whose flag was just written, every justification
//! it feeds is re-evaluated. Consequents of a holding justification become
//! IN; consequents left with no holding justification become OUT. All OUT
//! writes of a step, each with its full fallout, happen before any IN write.
//!
//! The walk keeps an explicit frame stack instead of recursing. Within one
//! run a belief is expanded on its first visit and afterwards only when a
//! write actually changes its flag, so acyclic networks cost work linear in
//! their edges. A belief already being expanded further down the stack is
//! written but not expanded again, so justification cycles reach a fixpoint
//! instead of looping. A step budget bounds the total number of writes.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::engine::state::{holds, set_state};
use crate::error::{TmsError, TmsResult};
use crate::graph::Graph;
use crate::term::Iri;
use crate::vocab;

/// One write of a belief's stored flag that changed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The belief whose flag was written.
    pub belief: Iri,
    /// `None` if the belief had no stored flag before.
    pub from: Option<bool>,
    /// The flag after the write.
    pub to: bool,
}

/// What a propagation run (or a whole cache rebuild) did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    /// Flag changes in write order.
    pub transitions: Vec<StateTransition>,
    /// Writes performed, including ones that left the flag unchanged.
    pub steps: usize,
}

impl PropagationReport {
    /// Returns true if no flag changed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Appends another report.
    pub fn absorb(&mut self, other: PropagationReport) {
        self.transitions.extend(other.transitions);
        self.steps += other.steps;
    }

    /// Final flag of `belief` according to this report, if it was written.
    #[must_use]
    pub fn final_state(&self, belief: &Iri) -> Option<bool> {
        self.transitions
            .iter()
            .rev()
            .find(|t| &t.belief == belief)
            .map(|t| t.to)
    }
}

/// Writes flags while counting steps against a budget.
pub(crate) struct Writer<'g> {
    graph: &'g mut Graph,
    max_steps: usize,
    origin: Iri,
    expanded: HashSet<Iri>,
    report: PropagationReport,
}

impl<'g> Writer<'g> {
    pub(crate) fn new(graph: &'g mut Graph, origin: &Iri, max_steps: usize) -> Self {
        Self {
            graph,
            max_steps,
            origin: origin.clone(),
            expanded: HashSet::new(),
            report: PropagationReport::default(),
        }
    }

    /// Writes `value` and returns whether the stored flag changed.
    pub(crate) fn write(&mut self, belief: &Iri, value: bool) -> TmsResult<bool> {
        self.report.steps += 1;
        if self.report.steps > self.max_steps {
            return Err(TmsError::PropagationLimitExceeded {
                origin: self.origin.to_string(),
                max_steps: self.max_steps,
            });
        }
        let from = set_state(self.graph, belief, value);
        let changed = from != Some(value);
        if changed {
            self.report.transitions.push(StateTransition {
                belief: belief.clone(),
                from,
                to: value,
            });
        }
        Ok(changed)
    }

    /// Records an expansion of `belief`; false if it was already expanded
    /// during this run.
    fn first_expansion(&mut self, belief: &Iri) -> bool {
        self.expanded.insert(belief.clone())
    }

    pub(crate) fn graph(&self) -> &Graph {
        &*self.graph
    }

    pub(crate) fn finish(self) -> PropagationReport {
        self.report
    }
}

struct Frame {
    belief: Iri,
    pending: VecDeque<(Iri, bool)>,
}

/// Writes planned by one expansion of `belief`: OUT entries first, then IN.
fn plan(graph: &Graph, belief: &Iri) -> VecDeque<(Iri, bool)> {
    let mut newly_in = Vec::new();
    let mut newly_out = Vec::new();

    for j in graph.subjects(vocab::HAS_ANTECEDENT, belief) {
        let active = holds(graph, &j);
        for c in graph.subjects(vocab::JUSTIFIED_BY, &j) {
            if active {
                newly_in.push(c);
            } else if !graph
                .subjects(vocab::JUSTIFIES, &c)
                .iter()
                .any(|other| holds(graph, other))
            {
                newly_out.push(c);
            }
        }
    }

    newly_out
        .into_iter()
        .map(|b| (b, false))
        .chain(newly_in.into_iter().map(|b| (b, true)))
        .collect()
}

/// Propagates from `origin`, whose flag has already been written.
pub(crate) fn propagate(writer: &mut Writer<'_>, origin: &Iri) -> TmsResult<()> {
    let mut on_path: HashSet<Iri> = HashSet::from([origin.clone()]);
    writer.first_expansion(origin);
    let mut stack = vec![Frame {
        belief: origin.clone(),
        pending: plan(writer.graph(), origin),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some((belief, value)) = frame.pending.pop_front() else {
            on_path.remove(&frame.belief);
            stack.pop();
            continue;
        };

        let changed = writer.write(&belief, value)?;
        if on_path.contains(&belief) {
            tracing::trace!(belief = %belief, "cycle: written without re-expanding");
            continue;
        }
        if !writer.first_expansion(&belief) && !changed {
            continue;
        }
        let pending = plan(writer.graph(), &belief);
        on_path.insert(belief.clone());
        stack.push(Frame { belief, pending });
    }
    Ok(())
}

/// Runs [`propagate`] with a fresh budget and returns what it did.
pub fn propagate_from(graph: &mut Graph, origin: &Iri, max_steps: usize) -> TmsResult<PropagationReport> {
    let mut writer = Writer::new(graph, origin, max_steps);
    propagate(&mut writer, origin)?;
    let report = writer.finish();
    tracing::debug!(
        origin = %origin,
        steps = report.steps,
        transitions = report.transitions.len(),
        "propagation finished"
    );
    Ok(report)
}
