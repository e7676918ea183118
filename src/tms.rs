//! Knowledge base and reasoner wired together.
//!
//! [`Tms`] runs each command against the knowledge base and then refreshes
//! the reasoner from it, the way an editor front end drives the engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::belief::BeliefKind;
use crate::config::TmsConfig;
use crate::engine::{PropagationReport, Reasoner, UpdateOutcome};
use crate::enrichment::{Enrichment, NoEnrichment};
use crate::error::TmsResult;
use crate::knowledge_base::KnowledgeBase;
use crate::schema::{JtmsSchema, Validator};
use crate::storage::{InMemoryTripleStore, TripleStore};
use crate::term::{Iri, Triple};

/// Result of a [`Tms`] command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Input was rejected before touching the knowledge base.
    Ignored,
    /// The knowledge base changed and the reasoner accepted it.
    Committed(PropagationReport),
    /// The knowledge base changed but the reasoner rejected the result and
    /// kept its previous state.
    Rejected {
        /// One entry per violated rule.
        diagnostics: Vec<String>,
    },
}

impl CommandOutcome {
    /// True for [`CommandOutcome::Committed`].
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// True for [`CommandOutcome::Rejected`].
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<UpdateOutcome> for CommandOutcome {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Committed(report) => Self::Committed(report),
            UpdateOutcome::Rejected { diagnostics } => Self::Rejected { diagnostics },
        }
    }
}

/// A truth maintenance system over one store.
///
/// # Examples
///
/// ```
/// use jtms::Tms;
///
/// let mut tms = Tms::in_memory().unwrap();
/// let battery = tms.qualify("batteryOk");
/// let power = tms.qualify("havePower");
/// let lights = tms.qualify("lightsOn");
///
/// tms.add_to_in_as_premise(&battery, &power).unwrap();
/// tms.justifies(&power, &lights).unwrap();
///
/// let lights = jtms::Iri::parse(&lights).unwrap();
/// assert!(tms.reasoner().materialized_state(&lights));
/// ```
#[derive(Debug)]
pub struct Tms {
    config: TmsConfig,
    knowledge_base: KnowledgeBase,
    reasoner: Reasoner,
}

impl Tms {
    /// Opens both graphs on `store` and brings the reasoner in line with
    /// the knowledge base.
    pub fn open(
        store: Arc<dyn TripleStore>,
        validator: Arc<dyn Validator>,
        enrichment: Arc<dyn Enrichment>,
        config: TmsConfig,
    ) -> TmsResult<Self> {
        let config = config.validate()?;
        let knowledge_base = KnowledgeBase::open(
            Arc::clone(&store),
            enrichment,
            config.knowledge_base_graph_iri()?,
        )?;
        let reasoner = Reasoner::open(
            store,
            validator,
            config.reasoner_graph_iri()?,
            config.propagation.clone(),
        )?;
        let mut tms = Self {
            config,
            knowledge_base,
            reasoner,
        };
        if let CommandOutcome::Rejected { diagnostics } = tms.update()? {
            tracing::warn!(
                conflicts = diagnostics.len(),
                "stored knowledge base is inconsistent; reasoner keeps its previous state"
            );
        }
        Ok(tms)
    }

    /// An in-memory system with the built-in schema and no auxiliary data.
    pub fn in_memory() -> TmsResult<Self> {
        Self::in_memory_with(TmsConfig::default())
    }

    /// Like [`Tms::in_memory`] with explicit configuration.
    pub fn in_memory_with(config: TmsConfig) -> TmsResult<Self> {
        let validator = Arc::new(JtmsSchema::new(config.schema.clone()));
        Self::open(
            Arc::new(InMemoryTripleStore::new()),
            validator,
            Arc::new(NoEnrichment),
            config,
        )
    }

    /// Configuration the system was opened with, after validation.
    #[must_use]
    pub fn config(&self) -> &TmsConfig {
        &self.config
    }

    /// The user-owned graph and its commands.
    #[must_use]
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Derived state and the read API.
    #[must_use]
    pub fn reasoner(&self) -> &Reasoner {
        &self.reasoner
    }

    /// Prefixes a plain local name with the configured namespace.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        self.config.qualify(name)
    }

    /// Refreshes the reasoner from the current knowledge base.
    pub fn update(&mut self) -> TmsResult<CommandOutcome> {
        Ok(self.reasoner.update(self.knowledge_base.graph())?.into())
    }

    fn after(&mut self, accepted: bool) -> TmsResult<CommandOutcome> {
        if accepted {
            self.update()
        } else {
            Ok(CommandOutcome::Ignored)
        }
    }

    /// Runs a propagation pass from `belief` after a committed update.
    fn settle(&mut self, outcome: CommandOutcome, belief: &str) -> TmsResult<CommandOutcome> {
        let CommandOutcome::Committed(mut report) = outcome else {
            return Ok(outcome);
        };
        if let Ok(iri) = Iri::parse(belief) {
            report.absorb(self.reasoner.propagate_from(&iri)?);
        }
        Ok(CommandOutcome::Committed(report))
    }

    /// Declares `belief` a Belief.
    pub fn add_belief(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_belief(belief)?;
        self.after(accepted)
    }

    /// Removes every fact mentioning `belief`.
    pub fn remove_belief(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.remove_belief(belief)?;
        self.after(accepted)
    }

    /// Declares `justification` a Justification.
    pub fn add_justification(&mut self, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_justification(justification)?;
        self.after(accepted)
    }

    /// Removes every fact mentioning `justification`.
    pub fn remove_justification(&mut self, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.remove_justification(justification)?;
        self.after(accepted)
    }

    /// Adds the edge, updates, then propagates from `belief`.
    pub fn justifies(&mut self, justification: &str, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.justifies(justification, belief)?;
        let outcome = self.after(accepted)?;
        self.settle(outcome, belief)
    }

    /// Puts `belief` on the IN-list of `justification`.
    pub fn add_to_in(&mut self, belief: &str, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_to_in(belief, justification)?;
        self.after(accepted)
    }

    /// Like [`Tms::add_to_in`], also tagging `belief` a premise.
    pub fn add_to_in_as_premise(
        &mut self,
        belief: &str,
        justification: &str,
    ) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_to_in_as_premise(belief, justification)?;
        self.after(accepted)
    }

    /// Puts `belief` on the OUT-list of `justification`.
    pub fn add_to_out(&mut self, belief: &str, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_to_out(belief, justification)?;
        self.after(accepted)
    }

    /// Takes `belief` off the IN-list of `justification`.
    pub fn remove_from_in(&mut self, belief: &str, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.remove_from_in(belief, justification)?;
        self.after(accepted)
    }

    /// Takes `belief` off the OUT-list of `justification`.
    pub fn remove_from_out(&mut self, belief: &str, justification: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.remove_from_out(belief, justification)?;
        self.after(accepted)
    }

    /// Tags `belief` a premise.
    pub fn premise(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.premise(belief)?;
        self.after(accepted)
    }

    /// Drops the premise tag.
    pub fn unpremise(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.unpremise(belief)?;
        self.after(accepted)
    }

    /// Tags `belief` a contradiction.
    pub fn contradict(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.contradict(belief)?;
        self.after(accepted)
    }

    /// Drops the contradiction tag.
    pub fn uncontradict(&mut self, belief: &str) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.uncontradict(belief)?;
        self.after(accepted)
    }

    /// Applies the tag pair of `kind`, updates, then propagates from
    /// `belief`.
    pub fn set_belief_kind(&mut self, belief: &str, kind: BeliefKind) -> TmsResult<CommandOutcome> {
        let (premise, contradiction) = kind.tags();
        let accepted = self.knowledge_base.set_tags(belief, premise, contradiction)?;
        let outcome = self.after(accepted)?;
        self.settle(outcome, belief)
    }

    /// Annotates `belief` (see [`KnowledgeBase::add_statement`]).
    pub fn add_statement(&mut self, belief: &str, statement: Triple) -> TmsResult<CommandOutcome> {
        let accepted = self.knowledge_base.add_statement(belief, statement)?;
        self.after(accepted)
    }

    /// Propagates from every antecedent of `justification`.
    pub fn refresh_justification(&mut self, justification: &str) -> TmsResult<CommandOutcome> {
        let Ok(j) = Iri::parse(justification) else {
            tracing::warn!(justification, "ignoring refresh of invalid identifier");
            return Ok(CommandOutcome::Ignored);
        };
        Ok(CommandOutcome::Committed(self.reasoner.refresh_justification(&j)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;

    #[test]
    fn test_in_memory_opens_consistent() {
        let tms = Tms::in_memory().unwrap();
        assert!(tms.reasoner().beliefs().is_empty());
        assert_eq!(tms.knowledge_base().graph().len(), 1);
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        let mut tms = Tms::in_memory().unwrap();
        assert_eq!(tms.add_belief("").unwrap(), CommandOutcome::Ignored);
        assert_eq!(tms.justifies("urn:j", "no scheme").unwrap(), CommandOutcome::Ignored);
        assert_eq!(tms.refresh_justification("").unwrap(), CommandOutcome::Ignored);
    }

    #[test]
    fn test_set_belief_kind() {
        let mut tms = Tms::in_memory().unwrap();
        let b = Iri::parse("urn:kb#b").unwrap();
        tms.add_belief("urn:kb#b").unwrap();
        assert!(!tms.reasoner().state(&b));

        assert!(tms.set_belief_kind("urn:kb#b", BeliefKind::Premise).unwrap().is_committed());
        assert!(tms.reasoner().state(&b));
        assert!(tms.reasoner().cache().belief(&b).unwrap().premise);

        tms.set_belief_kind("urn:kb#b", BeliefKind::Contradiction).unwrap();
        let cached = tms.reasoner().cache().belief(&b).unwrap();
        assert!(!cached.premise);
        assert!(cached.contradiction);
        assert!(!tms.reasoner().state(&b));
    }

    #[test]
    fn test_refresh_justification_on_settled_network() {
        let mut tms = Tms::in_memory().unwrap();
        tms.add_to_in_as_premise("urn:kb#a", "urn:kb#j").unwrap();
        tms.justifies("urn:kb#j", "urn:kb#b").unwrap();
        let before = tms.reasoner().graph().clone();

        let outcome = tms.refresh_justification("urn:kb#j").unwrap();
        let CommandOutcome::Committed(report) = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert!(report.is_quiet());
        assert!(report.steps > 0);
        assert_eq!(tms.reasoner().graph(), &before);
    }

    #[test]
    fn test_rejected_command_keeps_reasoner() {
        let config = TmsConfig {
            schema: SchemaConfig {
                forbid_premise_contradiction: true,
                ..SchemaConfig::default()
            },
            ..TmsConfig::default()
        };
        let mut tms = Tms::in_memory_with(config).unwrap();
        tms.premise("urn:kb#b").unwrap();
        let before = tms.reasoner().graph().clone();

        let outcome = tms.contradict("urn:kb#b").unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(tms.reasoner().graph(), &before);
        assert!(tms.reasoner().last_report().is_some());
    }
}
