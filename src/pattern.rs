//! Triple patterns for the query layer.
//!
//! A [`TriplePattern`] has three positions, each either a bound [`Term`] or a
//! named variable. Queries in the engine always bind two or three positions;
//! the store selects the values of the remaining variable.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::term::{Iri, Term, Triple};
use crate::vocab;

/// One position of a [`TriplePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTerm {
    /// Matches any term and binds it to the variable name.
    Var(String),
    /// Matches exactly this term.
    Bound(Term),
}

impl PatternTerm {
    /// Returns the bound term, if any.
    #[must_use]
    pub fn bound(&self) -> Option<&Term> {
        match self {
            Self::Bound(t) => Some(t),
            Self::Var(_) => None,
        }
    }

    /// Returns the variable name, if any.
    #[must_use]
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Self::Var(v) => Some(v),
            Self::Bound(_) => None,
        }
    }
}

impl From<Term> for PatternTerm {
    fn from(t: Term) -> Self {
        Self::Bound(t)
    }
}

impl From<&Term> for PatternTerm {
    fn from(t: &Term) -> Self {
        Self::Bound(t.clone())
    }
}

impl From<Iri> for PatternTerm {
    fn from(iri: Iri) -> Self {
        Self::Bound(Term::Iri(iri))
    }
}

impl From<&Iri> for PatternTerm {
    fn from(iri: &Iri) -> Self {
        Self::Bound(Term::Iri(iri.clone()))
    }
}

impl From<bool> for PatternTerm {
    fn from(value: bool) -> Self {
        Self::Bound(Term::from(value))
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(v) => write!(f, "?{v}"),
            Self::Bound(t) => write!(f, "{t}"),
        }
    }
}

/// Shorthand for a pattern variable.
#[must_use]
pub fn var(name: &str) -> PatternTerm {
    PatternTerm::Var(name.to_string())
}

/// Variable bindings produced by a match.
pub type Bindings = BTreeMap<String, Term>;

/// A single triple pattern.
///
/// # Examples
///
/// ```
/// use jtms::pattern::{var, TriplePattern};
/// use jtms::vocab;
///
/// // ?b a jtms:Belief
/// let p = TriplePattern::instances_of(vocab::BELIEF);
/// assert_eq!(p.variables(), vec!["x"]);
/// let q = TriplePattern::new(var("j"), vocab::iri(vocab::JUSTIFIES), var("b"));
/// assert_eq!(q.bound_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    /// Subject position.
    pub subject: PatternTerm,
    /// Predicate position.
    pub predicate: PatternTerm,
    /// Object position.
    pub object: PatternTerm,
}

impl TriplePattern {
    /// Creates a new pattern.
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// `?x rdf:type <class>`
    #[must_use]
    pub fn instances_of(class: &'static str) -> Self {
        Self::new(var("x"), vocab::iri(vocab::RDF_TYPE), vocab::iri(class))
    }

    /// `<subject> <predicate> ?o`
    pub fn objects_of(subject: impl Into<PatternTerm>, predicate: &'static str) -> Self {
        Self::new(subject, vocab::iri(predicate), var("o"))
    }

    /// `?s <predicate> <object>`
    pub fn subjects_of(predicate: &'static str, object: impl Into<PatternTerm>) -> Self {
        Self::new(var("s"), vocab::iri(predicate), object)
    }

    /// Number of bound positions.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .iter()
            .filter(|p| p.bound().is_some())
            .count()
    }

    /// Distinct variable names in subject, predicate, object order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in [&self.subject, &self.predicate, &self.object] {
            if let Some(v) = p.var_name() {
                if !out.contains(&v) {
                    out.push(v);
                }
            }
        }
        out
    }

    /// Matches `triple` against this pattern, returning the bindings.
    ///
    /// A variable used in more than one position must bind the same term.
    #[must_use]
    pub fn matches(&self, triple: &Triple) -> Option<Bindings> {
        let predicate = Term::Iri(triple.predicate.clone());
        let mut bindings = Bindings::new();
        for (pattern, term) in [
            (&self.subject, &triple.subject),
            (&self.predicate, &predicate),
            (&self.object, &triple.object),
        ] {
            match pattern {
                PatternTerm::Bound(t) => {
                    if t != term {
                        return None;
                    }
                }
                PatternTerm::Var(v) => match bindings.get(v) {
                    Some(existing) if existing != term => return None,
                    Some(_) => {}
                    None => {
                        bindings.insert(v.clone(), term.clone());
                    }
                },
            }
        }
        Some(bindings)
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} {} {} }}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    #[test]
    fn test_bound_pattern_matches_exactly() {
        let t = Triple::new(iri("urn:a"), iri("urn:p"), iri("urn:b"));
        let p = TriplePattern::new(iri("urn:a"), iri("urn:p"), iri("urn:b"));
        assert_eq!(p.matches(&t), Some(Bindings::new()));

        let miss = TriplePattern::new(iri("urn:a"), iri("urn:p"), iri("urn:c"));
        assert!(miss.matches(&t).is_none());
    }

    #[test]
    fn test_variable_binding() {
        let t = Triple::new(iri("urn:a"), iri("urn:p"), iri("urn:b"));
        let p = TriplePattern::new(var("s"), iri("urn:p"), iri("urn:b"));
        let b = p.matches(&t).unwrap();
        assert_eq!(b.get("s"), Some(&Term::from(iri("urn:a"))));
    }

    #[test]
    fn test_repeated_variable_must_agree() {
        let p = TriplePattern::new(var("x"), iri("urn:p"), var("x"));
        let loop_triple = Triple::new(iri("urn:a"), iri("urn:p"), iri("urn:a"));
        let other = Triple::new(iri("urn:a"), iri("urn:p"), iri("urn:b"));
        assert!(p.matches(&loop_triple).is_some());
        assert!(p.matches(&other).is_none());
        assert_eq!(p.variables(), vec!["x"]);
    }

    #[test]
    fn test_display() {
        let p = TriplePattern::subjects_of(vocab::JUSTIFIES, iri("urn:b"));
        assert_eq!(
            p.to_string(),
            format!("{{ ?s <{}> <urn:b> }}", vocab::JUSTIFIES)
        );
    }
}
