//! Typed views of beliefs and justifications.
//!
//! Both are projections of the Reasoner graph, rebuilt wholesale by the
//! cache after every committed update. The graph stays the source of truth;
//! these structs are snapshots taken at rebuild time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::Iri;

/// A proposition whose held-state the engine maintains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Belief {
    /// Identifier of the belief in both graphs.
    pub iri: Iri,
    /// Tagged `jtms:Premise`: always held.
    pub premise: bool,
    /// Tagged `jtms:Contradiction`: never held.
    pub contradiction: bool,
}

impl Belief {
    /// Creates an untagged belief.
    #[must_use]
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            premise: false,
            contradiction: false,
        }
    }

    /// Local part of the identifier, for display.
    #[must_use]
    pub fn name(&self) -> &str {
        self.iri.local_name()
    }
}

/// A rule: holds when its IN-list is held and its OUT-list is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    /// Identifier of the justification in both graphs.
    pub iri: Iri,
    /// Beliefs that must be held (`hasSupport`), sorted.
    pub in_list: Vec<Iri>,
    /// Beliefs that must not be held (`hasOpposition`), sorted.
    pub out_list: Vec<Iri>,
    /// Beliefs this justification justifies, sorted.
    pub consequents: Vec<Iri>,
}

impl Justification {
    /// Creates a justification with empty lists.
    #[must_use]
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            in_list: Vec::new(),
            out_list: Vec::new(),
            consequents: Vec::new(),
        }
    }

    /// Local part of the identifier, for display.
    #[must_use]
    pub fn name(&self) -> &str {
        self.iri.local_name()
    }

    /// True when both lists are empty; such a justification always holds.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.in_list.is_empty() && self.out_list.is_empty()
    }
}

/// The tag pair a belief can carry, as chosen in a belief editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefKind {
    /// Neither premise nor contradiction.
    #[default]
    Plain,
    /// Premise only.
    Premise,
    /// Contradiction only.
    Contradiction,
}

impl BeliefKind {
    /// Returns `(premise, contradiction)`.
    #[must_use]
    pub const fn tags(self) -> (bool, bool) {
        match self {
            Self::Plain => (false, false),
            Self::Premise => (true, false),
            Self::Contradiction => (false, true),
        }
    }
}

impl fmt::Display for BeliefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Premise => write!(f, "premise"),
            Self::Contradiction => write!(f, "contradiction"),
        }
    }
}

/// Result of resolving an identifier against the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    /// A cached belief.
    Belief(&'a Belief),
    /// A cached justification.
    Justification(&'a Justification),
    /// Not a cached belief or justification.
    None,
}

impl<'a> Node<'a> {
    /// The belief, if this is one.
    #[must_use]
    pub fn as_belief(&self) -> Option<&'a Belief> {
        match self {
            Self::Belief(b) => Some(b),
            _ => None,
        }
    }

    /// The justification, if this is one.
    #[must_use]
    pub fn as_justification(&self) -> Option<&'a Justification> {
        match self {
            Self::Justification(j) => Some(j),
            _ => None,
        }
    }

    /// Returns true for [`Node::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
