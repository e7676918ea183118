//! Indexed in-memory fact sets.
//!
//! A [`Graph`] is a set of triples with subject and object indexes. The
//! indexes make pattern queries with a bound subject or object and cascade
//! deletes ([`Graph::remove_resource`]) proportional to the resource's
//! fan-in instead of the graph size.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::pattern::TriplePattern;
use crate::term::{Iri, Term, Triple};
use crate::vocab;

/// A set of triples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Triple>", into = "Vec<Triple>")]
pub struct Graph {
    triples: BTreeSet<Triple>,
    by_subject: HashMap<Term, BTreeSet<Triple>>,
    by_object: HashMap<Term, BTreeSet<Triple>>,
}

fn unindex(index: &mut HashMap<Term, BTreeSet<Triple>>, key: &Term, triple: &Triple) {
    if let Some(set) = index.get_mut(key) {
        set.remove(triple);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph has no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Inserts a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.clone());
        self.triples.insert(triple);
        true
    }

    /// Removes a triple. Returns false if it was absent.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        unindex(&mut self.by_subject, &triple.subject, triple);
        unindex(&mut self.by_object, &triple.object, triple);
        true
    }

    /// Removes every triple mentioning `resource` as subject or object.
    ///
    /// Returns the removed triples in sorted order.
    pub fn remove_resource(&mut self, resource: &Term) -> Vec<Triple> {
        let doomed = self.references(resource);
        for t in &doomed {
            self.remove(t);
        }
        doomed
    }

    /// Triples mentioning `resource` as subject or object, sorted.
    #[must_use]
    pub fn references(&self, resource: &Term) -> Vec<Triple> {
        let mut out: BTreeSet<Triple> = BTreeSet::new();
        if let Some(set) = self.by_subject.get(resource) {
            out.extend(set.iter().cloned());
        }
        if let Some(set) = self.by_object.get(resource) {
            out.extend(set.iter().cloned());
        }
        out.into_iter().collect()
    }

    /// Triples whose subject is `subject`.
    #[must_use]
    pub fn triples_about(&self, subject: &Term) -> Vec<Triple> {
        self.by_subject
            .get(subject)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Removes all triples.
    pub fn clear(&mut self) {
        self.triples.clear();
        self.by_subject.clear();
        self.by_object.clear();
    }

    /// Inserts every triple of `other`.
    pub fn extend_from(&mut self, other: &Graph) {
        for t in other.iter() {
            self.insert(t.clone());
        }
    }

    /// Returns the union of both graphs.
    #[must_use]
    pub fn union(&self, other: &Graph) -> Graph {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// Triples matching `pattern`, sorted.
    #[must_use]
    pub fn matching(&self, pattern: &TriplePattern) -> Vec<Triple> {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> =
            if let Some(s) = pattern.subject.bound() {
                match self.by_subject.get(s) {
                    Some(set) => Box::new(set.iter()),
                    None => return Vec::new(),
                }
            } else if let Some(o) = pattern.object.bound() {
                match self.by_object.get(o) {
                    Some(set) => Box::new(set.iter()),
                    None => return Vec::new(),
                }
            } else {
                Box::new(self.triples.iter())
            };
        candidates
            .filter(|t| pattern.matches(t).is_some())
            .cloned()
            .collect()
    }

    /// Distinct values bound to `var` by matches of `pattern`, sorted.
    ///
    /// Returns an empty list when `var` does not occur in the pattern.
    #[must_use]
    pub fn select(&self, pattern: &TriplePattern, var: &str) -> Vec<Term> {
        let mut out = BTreeSet::new();
        for t in self.matching(pattern) {
            if let Some(bindings) = pattern.matches(&t) {
                if let Some(value) = bindings.get(var) {
                    out.insert(value.clone());
                }
            }
        }
        out.into_iter().collect()
    }

    /// Returns true if any triple matches `pattern`.
    #[must_use]
    pub fn ask(&self, pattern: &TriplePattern) -> bool {
        !self.matching(pattern).is_empty()
    }

    /// IRIs typed with `class`, sorted.
    #[must_use]
    pub fn instances_of(&self, class: &'static str) -> Vec<Iri> {
        iris(self.select(&TriplePattern::instances_of(class), "x"))
    }

    /// IRI objects of `subject predicate ?o`, sorted.
    #[must_use]
    pub fn objects(&self, subject: &Iri, predicate: &'static str) -> Vec<Iri> {
        iris(self.select(&TriplePattern::objects_of(subject, predicate), "o"))
    }

    /// IRI subjects of `?s predicate object`, sorted.
    #[must_use]
    pub fn subjects(&self, predicate: &'static str, object: &Iri) -> Vec<Iri> {
        iris(self.select(&TriplePattern::subjects_of(predicate, object), "s"))
    }

    /// Returns true if `subject predicate ?anything` exists.
    #[must_use]
    pub fn has_property(&self, subject: &Iri, predicate: &'static str) -> bool {
        self.ask(&TriplePattern::objects_of(subject, predicate))
    }

    /// Returns true if `subject rdf:type class` exists.
    #[must_use]
    pub fn has_type(&self, subject: &Iri, class: &'static str) -> bool {
        self.contains(&Triple::new(subject, vocab::iri(vocab::RDF_TYPE), vocab::iri(class)))
    }
}

fn iris(terms: Vec<Term>) -> Vec<Iri> {
    terms
        .into_iter()
        .filter_map(|t| match t {
            Term::Iri(iri) => Some(iri),
            _ => None,
        })
        .collect()
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.triples == other.triples
    }
}

impl Eq for Graph {}

impl From<Vec<Triple>> for Graph {
    fn from(triples: Vec<Triple>) -> Self {
        triples.into_iter().collect()
    }
}

impl From<Graph> for Vec<Triple> {
    fn from(graph: Graph) -> Self {
        graph.triples.into_iter().collect()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut g = Graph::new();
        for t in iter {
            g.insert(t);
        }
        g
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for t in iter {
            self.insert(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::var;
    use crate::term::Literal;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri(p), iri(o))
    }

    #[test]
    fn test_insert_is_set_semantics() {
        let mut g = Graph::new();
        assert!(g.insert(t("urn:a", "urn:p", "urn:b")));
        assert!(!g.insert(t("urn:a", "urn:p", "urn:b")));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_remove_resource_cascades_subject_and_object() {
        let mut g = Graph::new();
        g.insert(t("urn:a", "urn:p", "urn:b"));
        g.insert(t("urn:c", "urn:p", "urn:a"));
        g.insert(t("urn:c", "urn:p", "urn:d"));
        g.insert(t("urn:a", "urn:q", "urn:a"));

        let removed = g.remove_resource(&Term::from(iri("urn:a")));
        assert_eq!(removed.len(), 3);
        assert_eq!(g.len(), 1);
        assert!(g.contains(&t("urn:c", "urn:p", "urn:d")));
        assert!(g.references(&Term::from(iri("urn:a"))).is_empty());
    }

    #[test]
    fn test_select_and_ask() {
        let mut g = Graph::new();
        g.insert(t("urn:j1", vocab::JUSTIFIES, "urn:b"));
        g.insert(t("urn:j2", vocab::JUSTIFIES, "urn:b"));
        g.insert(t("urn:j2", vocab::JUSTIFIES, "urn:c"));

        let js = g.subjects(vocab::JUSTIFIES, &iri("urn:b"));
        assert_eq!(js, vec![iri("urn:j1"), iri("urn:j2")]);

        let p = TriplePattern::new(var("j"), vocab::iri(vocab::JUSTIFIES), var("b"));
        assert_eq!(g.select(&p, "b").len(), 2);
        assert!(g.select(&p, "missing").is_empty());
        assert!(g.ask(&TriplePattern::objects_of(iri("urn:j2"), vocab::JUSTIFIES)));
        assert!(!g.ask(&TriplePattern::objects_of(iri("urn:b"), vocab::JUSTIFIES)));
    }

    #[test]
    fn test_literal_objects_are_indexed() {
        let mut g = Graph::new();
        let st = Triple::new(iri("urn:b"), vocab::iri(vocab::HAS_STATE), Literal::boolean(true));
        g.insert(st.clone());
        assert!(g.ask(&TriplePattern::new(var("b"), vocab::iri(vocab::HAS_STATE), true)));
        assert!(!g.ask(&TriplePattern::new(var("b"), vocab::iri(vocab::HAS_STATE), false)));
        assert!(g.remove(&st));
        assert!(g.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_indexes() {
        let mut g = Graph::new();
        g.insert(t("urn:a", "urn:p", "urn:b"));
        let json = serde_json::to_string(&g).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
        assert_eq!(back.references(&Term::from(iri("urn:b"))).len(), 1);
    }

    #[test]
    fn test_union() {
        let a: Graph = vec![t("urn:a", "urn:p", "urn:b")].into();
        let b: Graph = vec![t("urn:a", "urn:p", "urn:b"), t("urn:x", "urn:p", "urn:y")].into();
        assert_eq!(a.union(&b).len(), 2);
    }
}
