//! Auxiliary datasets consulted when annotating beliefs.
//!
//! [`KnowledgeBase::add_statement`](crate::KnowledgeBase::add_statement)
//! pulls extra facts about an annotation's subject from an [`Enrichment`]
//! source. Lookups are best-effort: the knowledge base logs a failure and
//! carries on without the extra facts.

use std::collections::{BTreeSet, VecDeque};

use crate::error::TmsResult;
use crate::graph::Graph;
use crate::pattern::{var, TriplePattern};
use crate::term::{Iri, Term, Triple};
use crate::vocab;

/// Upper bound on triples returned by one [`Enrichment::linked`] call.
pub const LINKED_LIMIT: usize = 300;

/// A read-only source of facts outside the knowledge base.
pub trait Enrichment: Send + Sync {
    /// Facts with `subject` in subject position.
    fn describe(&self, subject: &Iri) -> TmsResult<Vec<Triple>>;

    /// Facts about every resource linked to `resource` through `owl:sameAs`
    /// (in either direction, `resource` itself included).
    fn linked(&self, resource: &Iri) -> TmsResult<Vec<Triple>>;

    /// The whole dataset.
    fn statements(&self) -> TmsResult<Vec<Triple>>;
}

/// An empty auxiliary dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl Enrichment for NoEnrichment {
    fn describe(&self, _subject: &Iri) -> TmsResult<Vec<Triple>> {
        Ok(Vec::new())
    }

    fn linked(&self, _resource: &Iri) -> TmsResult<Vec<Triple>> {
        Ok(Vec::new())
    }

    fn statements(&self) -> TmsResult<Vec<Triple>> {
        Ok(Vec::new())
    }
}

/// An auxiliary dataset held in memory.
#[derive(Debug, Clone, Default)]
pub struct GraphEnrichment {
    graph: Graph,
    language: Option<String>,
}

impl GraphEnrichment {
    /// Wraps a fact set.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            language: None,
        }
    }

    /// Restricts [`Enrichment::linked`] to literal objects tagged `language`
    /// (compared case-insensitively).
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The wrapped fact set.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn same_as_closure(&self, start: &Iri) -> BTreeSet<Term> {
        let same_as = vocab::iri(vocab::OWL_SAME_AS);
        let mut seen = BTreeSet::from([Term::from(start)]);
        let mut queue = VecDeque::from([Term::from(start)]);

        while let Some(node) = queue.pop_front() {
            let forward = TriplePattern::new(&node, &same_as, var("o"));
            let backward = TriplePattern::new(var("s"), &same_as, &node);
            let next = self
                .graph
                .select(&forward, "o")
                .into_iter()
                .chain(self.graph.select(&backward, "s"));
            for term in next {
                if !term.is_literal() && seen.insert(term.clone()) {
                    queue.push_back(term);
                }
            }
        }
        seen
    }

    fn language_matches(&self, object: &Term) -> bool {
        let Some(wanted) = &self.language else {
            return true;
        };
        object
            .as_literal()
            .and_then(|lit| lit.language.as_deref())
            .is_some_and(|tag| tag.eq_ignore_ascii_case(wanted))
    }
}

impl Enrichment for GraphEnrichment {
    fn describe(&self, subject: &Iri) -> TmsResult<Vec<Triple>> {
        Ok(self.graph.triples_about(&Term::from(subject)))
    }

    fn linked(&self, resource: &Iri) -> TmsResult<Vec<Triple>> {
        let mut out = Vec::new();
        for node in self.same_as_closure(resource) {
            for t in self.graph.triples_about(&node) {
                if t.predicate.as_str() == vocab::OWL_SAME_AS || !self.language_matches(&t.object) {
                    continue;
                }
                out.push(t);
                if out.len() == LINKED_LIMIT {
                    return Ok(out);
                }
            }
        }
        Ok(out)
    }

    fn statements(&self) -> TmsResult<Vec<Triple>> {
        Ok(self.graph.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn dataset() -> Graph {
        vec![
            Triple::new(iri("urn:log:1"), iri("urn:p:speaker"), iri("urn:crew:lovell")),
            Triple::new(iri("urn:log:1"), iri("urn:p:text"), Literal::string("Houston")),
            Triple::new(iri("urn:crew:lovell"), vocab::iri(vocab::OWL_SAME_AS), iri("urn:dbp:Jim_Lovell")),
            Triple::new(iri("urn:dbp:Jim_Lovell"), iri("urn:p:name"), Literal::lang("Jim Lovell", "en")),
            Triple::new(iri("urn:dbp:Jim_Lovell"), iri("urn:p:name"), Literal::lang("Jim Lovell", "de")),
            Triple::new(iri("urn:nasa:lovell"), vocab::iri(vocab::OWL_SAME_AS), iri("urn:crew:lovell")),
            Triple::new(iri("urn:nasa:lovell"), iri("urn:p:missions"), Literal::string("4")),
        ]
        .into()
    }

    #[test]
    fn test_no_enrichment_is_empty() {
        let e = NoEnrichment;
        assert!(e.describe(&iri("urn:x")).unwrap().is_empty());
        assert!(e.linked(&iri("urn:x")).unwrap().is_empty());
        assert!(e.statements().unwrap().is_empty());
    }

    #[test]
    fn test_describe_returns_subject_facts() {
        let e = GraphEnrichment::new(dataset());
        assert_eq!(e.describe(&iri("urn:log:1")).unwrap().len(), 2);
        assert_eq!(e.statements().unwrap().len(), 7);
    }

    #[test]
    fn test_linked_follows_same_as_both_ways() {
        let e = GraphEnrichment::new(dataset());
        let linked = e.linked(&iri("urn:crew:lovell")).unwrap();
        assert_eq!(linked.len(), 3);
        assert!(linked.iter().all(|t| t.predicate.as_str() != vocab::OWL_SAME_AS));
        assert!(linked
            .iter()
            .any(|t| t.subject == Term::from(iri("urn:nasa:lovell"))));
    }

    #[test]
    fn test_linked_language_filter() {
        let e = GraphEnrichment::new(dataset()).with_language("EN");
        let linked = e.linked(&iri("urn:crew:lovell")).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].object, Term::from(Literal::lang("Jim Lovell", "en")));
    }
}
