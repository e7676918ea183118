//! The Reasoner: validated derived state and belief maintenance.
//!
//! An update merges the knowledge base with the facts a [`Validator`]
//! entails from it, asks the validator to check the merge and, only if the
//! merge is valid, replaces the Reasoner graph with it. The cache is then
//! rebuilt and every belief's stored `hasState` flag is recomputed by
//! propagation.

mod cache;
mod propagation;
mod state;
mod status;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::belief::{Belief, Justification, Node};
use crate::config::PropagationConfig;
use crate::error::TmsResult;
use crate::graph::Graph;
use crate::schema::{Validator, ValidityReport};
use crate::storage::{self, TripleStore};
use crate::term::{Iri, Term, Triple};
use crate::vocab;

pub use cache::Cache;
pub use propagation::{propagate_from, PropagationReport, StateTransition};
pub use state::{holds, materialized_state, set_state, state, stored_state};

use propagation::{propagate, Writer};

/// Result of [`Reasoner::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The candidate was valid and is now the Reasoner graph.
    Committed(PropagationReport),
    /// The candidate was invalid; nothing changed.
    Rejected {
        /// One entry per violated rule.
        diagnostics: Vec<String>,
    },
}

impl UpdateOutcome {
    /// True for [`UpdateOutcome::Committed`].
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Owner of the Reasoner graph.
pub struct Reasoner {
    store: Arc<dyn TripleStore>,
    validator: Arc<dyn Validator>,
    name: Iri,
    graph: Graph,
    cache: Cache,
    last_report: Option<Vec<String>>,
    config: PropagationConfig,
}

impl std::fmt::Debug for Reasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reasoner")
            .field("name", &self.name)
            .field("triples", &self.graph.len())
            .field("cached", &self.cache.len())
            .field("last_report", &self.last_report)
            .finish_non_exhaustive()
    }
}

impl Reasoner {
    /// Loads the named graph (creating it if missing) and indexes it.
    ///
    /// Stored flags are taken as they are; nothing is propagated until the
    /// first [`Reasoner::update`].
    pub fn open(
        store: Arc<dyn TripleStore>,
        validator: Arc<dyn Validator>,
        name: Iri,
        config: PropagationConfig,
    ) -> TmsResult<Self> {
        let graph = storage::load_or_bootstrap(store.as_ref(), &name)?;
        let cache = Cache::build(&graph);
        Ok(Self {
            store,
            validator,
            name,
            graph,
            cache,
            last_report: None,
            config,
        })
    }

    /// Validity-gated refresh from the knowledge base.
    ///
    /// A rejected candidate leaves the graph and cache untouched and keeps
    /// its diagnostics in [`Reasoner::last_report`]. Validator and store
    /// failures are errors.
    pub fn update(&mut self, knowledge_base: &Graph) -> TmsResult<UpdateOutcome> {
        let entailed = self.validator.entail(knowledge_base)?;
        let candidate = knowledge_base.union(&entailed);

        if let ValidityReport::Invalid { diagnostics } = self.validator.validate(&candidate)? {
            tracing::warn!(
                graph = %self.name,
                conflicts = diagnostics.len(),
                "update rejected by validator"
            );
            for d in &diagnostics {
                tracing::warn!(graph = %self.name, diagnostic = %d, "conflict");
            }
            self.last_report = Some(diagnostics.clone());
            return Ok(UpdateOutcome::Rejected { diagnostics });
        }

        self.last_report = None;
        let mut graph = candidate;
        let (cache, report) = Self::rebuild(&mut graph, &self.name, self.config.max_steps)?;
        self.store.put_graph(&self.name, &graph)?;
        self.graph = graph;
        self.cache = cache;

        tracing::info!(
            graph = %self.name,
            triples = self.graph.len(),
            beliefs = self.cache.beliefs().count(),
            justifications = self.cache.justifications().count(),
            transitions = report.transitions.len(),
            "reasoner updated"
        );
        Ok(UpdateOutcome::Committed(report))
    }

    /// Indexes `graph`, resets every flag to not-held and seeds propagation
    /// from leaf beliefs and unconditional justifications.
    ///
    /// Works on the candidate only; the Reasoner is untouched until it
    /// succeeds.
    fn rebuild(graph: &mut Graph, name: &Iri, max_steps: usize) -> TmsResult<(Cache, PropagationReport)> {
        let cache = Cache::build(graph);
        for b in cache.beliefs() {
            set_state(graph, &b.iri, false);
        }

        let leaves: Vec<Iri> = cache
            .leaf_beliefs(graph)
            .into_iter()
            .map(|b| b.iri.clone())
            .collect();
        let forced: Vec<Iri> = cache
            .unconditional_justifications(graph)
            .into_iter()
            .flat_map(|j| j.consequents.iter())
            .filter(|c| cache.belief(c).is_some())
            .cloned()
            .collect();

        let mut writer = Writer::new(graph, name, max_steps);
        for leaf in &leaves {
            propagate(&mut writer, leaf)?;
        }
        for belief in &forced {
            writer.write(belief, true)?;
            propagate(&mut writer, belief)?;
        }
        Ok((cache, writer.finish()))
    }

    /// Propagates from `belief` after an external change and persists.
    ///
    /// Unknown beliefs are ignored.
    pub fn propagate_from(&mut self, belief: &Iri) -> TmsResult<PropagationReport> {
        if self.cache.belief(belief).is_none() {
            tracing::warn!(belief = %belief, "propagation requested for unknown belief");
            return Ok(PropagationReport::default());
        }
        let report = propagate_from(&mut self.graph, belief, self.config.max_steps)?;
        self.persist()?;
        Ok(report)
    }

    /// Propagates from every antecedent of `justification` and persists.
    pub fn refresh_justification(&mut self, justification: &Iri) -> TmsResult<PropagationReport> {
        let mut report = PropagationReport::default();
        for b in self.antecedents(justification) {
            if self.cache.belief(&b).is_some() {
                report.absorb(propagate_from(&mut self.graph, &b, self.config.max_steps)?);
            }
        }
        self.persist()?;
        Ok(report)
    }

    fn persist(&self) -> TmsResult<()> {
        self.store.put_graph(&self.name, &self.graph)?;
        Ok(())
    }

    /// Name of the graph in the store.
    #[must_use]
    pub fn name(&self) -> &Iri {
        &self.name
    }

    /// Current contents: knowledge base, entailments and stored flags.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Typed index of the graph, rebuilt on every committed update.
    #[must_use]
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Diagnostics of the most recent rejected update; cleared by the next
    /// committed one.
    #[must_use]
    pub fn last_report(&self) -> Option<&[String]> {
        self.last_report.as_deref()
    }

    /// Computed state of `belief` (see [`state()`]).
    #[must_use]
    pub fn state(&self, belief: &Iri) -> bool {
        state(&self.graph, belief)
    }

    /// Stored `hasState` flag of `belief`.
    #[must_use]
    pub fn materialized_state(&self, belief: &Iri) -> bool {
        materialized_state(&self.graph, belief)
    }

    /// Whether `justification` is active (see [`holds()`]).
    #[must_use]
    pub fn holds(&self, justification: &Iri) -> bool {
        holds(&self.graph, justification)
    }

    /// Every cached belief, sorted by identifier.
    #[must_use]
    pub fn beliefs(&self) -> Vec<&Belief> {
        self.cache.beliefs().collect()
    }

    /// Every cached justification, sorted by identifier.
    #[must_use]
    pub fn justifications(&self) -> Vec<&Justification> {
        self.cache.justifications().collect()
    }

    /// Beliefs no justification concludes.
    #[must_use]
    pub fn leaf_beliefs(&self) -> Vec<&Belief> {
        self.cache.leaf_beliefs(&self.graph)
    }

    /// Resolves an identifier; malformed identifiers resolve to
    /// [`Node::None`].
    #[must_use]
    pub fn lookup(&self, id: &str) -> Node<'_> {
        Iri::parse(id).map_or(Node::None, |iri| self.cache.lookup(&iri))
    }

    /// Beliefs on the IN-list of `justification`.
    #[must_use]
    pub fn in_list(&self, justification: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::SUPPORTS, justification)
    }

    /// Beliefs on the OUT-list of `justification`.
    #[must_use]
    pub fn out_list(&self, justification: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::OPPOSES, justification)
    }

    /// Beliefs on either list of `justification`.
    #[must_use]
    pub fn antecedents(&self, justification: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::ANTECEDENT_OF, justification)
    }

    /// Beliefs `justification` justifies.
    #[must_use]
    pub fn consequents(&self, justification: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::JUSTIFIED_BY, justification)
    }

    /// Justifications `belief` is an antecedent of.
    #[must_use]
    pub fn consequences(&self, belief: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::HAS_ANTECEDENT, belief)
    }

    /// Justifications that justify `belief`.
    #[must_use]
    pub fn justifications_of(&self, belief: &Iri) -> Vec<Iri> {
        self.graph.subjects(vocab::JUSTIFIES, belief)
    }

    /// `(justification, antecedent)` pairs over all cached justifications.
    #[must_use]
    pub fn support_list_edges(&self) -> Vec<(Iri, Iri)> {
        self.cache
            .justifications()
            .flat_map(|j| {
                self.antecedents(&j.iri)
                    .into_iter()
                    .map(move |b| (j.iri.clone(), b))
            })
            .collect()
    }

    /// `(belief, justification)` pairs over all cached beliefs.
    #[must_use]
    pub fn justification_edges(&self) -> Vec<(Iri, Iri)> {
        self.cache
            .beliefs()
            .flat_map(|b| {
                self.justifications_of(&b.iri)
                    .into_iter()
                    .map(move |j| (b.iri.clone(), j))
            })
            .collect()
    }

    /// True if `belief` is on some IN- or OUT-list.
    #[must_use]
    pub fn is_in_some_justification_list(&self, belief: &Iri) -> bool {
        self.graph.has_property(belief, vocab::SUPPORTS)
            || self.graph.has_property(belief, vocab::OPPOSES)
    }

    /// Facts about the resources `belief` links to with `rdfs:seeAlso`.
    #[must_use]
    pub fn statements_about(&self, belief: &Iri) -> Vec<Triple> {
        self.graph
            .objects(belief, vocab::RDFS_SEE_ALSO)
            .iter()
            .flat_map(|target| self.graph.triples_about(&Term::from(target)))
            .collect()
    }

    /// Every fact whose subject is a belief.
    #[must_use]
    pub fn belief_statements(&self) -> Vec<Triple> {
        self.graph
            .iter()
            .filter(|t| {
                t.subject
                    .as_iri()
                    .is_some_and(|s| self.graph.has_type(s, vocab::BELIEF))
            })
            .cloned()
            .collect()
    }
}
