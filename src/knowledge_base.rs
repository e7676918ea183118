//! The user-owned fact graph and the commands that edit it.
//!
//! Every command parses its identifiers, edits a copy of the graph, persists
//! the copy with `put_graph` and only then makes it current. Invalid input is
//! a logged no-op (`Ok(false)`), never an error; store failures propagate.

use std::sync::Arc;

use crate::enrichment::Enrichment;
use crate::error::TmsResult;
use crate::graph::Graph;
use crate::storage::{self, TripleStore};
use crate::term::{Iri, Term, Triple};
use crate::vocab;

fn parse_id(role: &'static str, value: &str) -> Option<Iri> {
    match Iri::parse(value) {
        Ok(iri) => Some(iri),
        Err(e) => {
            tracing::warn!(role, value, error = %e, "ignoring command with invalid identifier");
            None
        }
    }
}

fn typed(subject: &Iri, class: &'static str) -> Triple {
    Triple::new(subject, vocab::iri(vocab::RDF_TYPE), vocab::iri(class))
}

fn edge(subject: &Iri, predicate: &'static str, object: &Iri) -> Triple {
    Triple::new(subject, vocab::iri(predicate), object)
}

/// The KnowledgeBase graph: explicit beliefs, justifications and
/// annotations, written only through these commands.
pub struct KnowledgeBase {
    store: Arc<dyn TripleStore>,
    enrichment: Arc<dyn Enrichment>,
    name: Iri,
    graph: Graph,
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("name", &self.name)
            .field("triples", &self.graph.len())
            .finish_non_exhaustive()
    }
}

impl KnowledgeBase {
    /// Loads the named graph, creating it if the store lacks it.
    pub fn open(
        store: Arc<dyn TripleStore>,
        enrichment: Arc<dyn Enrichment>,
        name: Iri,
    ) -> TmsResult<Self> {
        let graph = storage::load_or_bootstrap(store.as_ref(), &name)?;
        Ok(Self {
            store,
            enrichment,
            name,
            graph,
        })
    }

    /// Name of the graph in the store.
    #[must_use]
    pub fn name(&self) -> &Iri {
        &self.name
    }

    /// Current contents.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Every explicit fact, sorted.
    #[must_use]
    pub fn statements(&self) -> Vec<Triple> {
        self.graph.iter().cloned().collect()
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

    /// The auxiliary dataset, which is not part of the knowledge base.
    pub fn auxiliary_statements(&self) -> TmsResult<Vec<Triple>> {
        self.enrichment.statements()
    }

    /// Adds `belief rdf:type jtms:Belief`.
    pub fn add_belief(&mut self, belief: &str) -> TmsResult<bool> {
        let Some(b) = parse_id("belief", belief) else {
            return Ok(false);
        };
        self.commit("add_belief", |g| {
            g.insert(typed(&b, vocab::BELIEF));
        })
    }

    /// Deletes every fact mentioning `belief`.
    pub fn remove_belief(&mut self, belief: &str) -> TmsResult<bool> {
        let Some(b) = parse_id("belief", belief) else {
            return Ok(false);
        };
        self.commit("remove_belief", |g| {
            g.remove_resource(&Term::from(b));
        })
    }

    /// Adds `justification rdf:type jtms:Justification`.
    pub fn add_justification(&mut self, justification: &str) -> TmsResult<bool> {
        let Some(j) = parse_id("justification", justification) else {
            return Ok(false);
        };
        self.commit("add_justification", |g| {
            g.insert(typed(&j, vocab::JUSTIFICATION));
        })
    }

    /// Deletes every fact mentioning `justification`.
    pub fn remove_justification(&mut self, justification: &str) -> TmsResult<bool> {
        let Some(j) = parse_id("justification", justification) else {
            return Ok(false);
        };
        self.commit("remove_justification", |g| {
            g.remove_resource(&Term::from(j));
        })
    }

    /// Makes `belief` a consequent of `justification`.
    pub fn justifies(&mut self, justification: &str, belief: &str) -> TmsResult<bool> {
        let (Some(j), Some(b)) = (
            parse_id("justification", justification),
            parse_id("belief", belief),
        ) else {
            return Ok(false);
        };
        self.commit("justifies", |g| {
            g.insert(edge(&j, vocab::JUSTIFIES, &b));
        })
    }

    /// Puts `belief` on the IN-list of `justification`.
    pub fn add_to_in(&mut self, belief: &str, justification: &str) -> TmsResult<bool> {
        self.support(belief, justification, false)
    }

    /// Puts `belief` on the IN-list of `justification` and tags it premise.
    pub fn add_to_in_as_premise(&mut self, belief: &str, justification: &str) -> TmsResult<bool> {
        self.support(belief, justification, true)
    }

    fn support(&mut self, belief: &str, justification: &str, premise: bool) -> TmsResult<bool> {
        let (Some(b), Some(j)) = (
            parse_id("belief", belief),
            parse_id("justification", justification),
        ) else {
            return Ok(false);
        };
        self.commit("add_to_in", |g| {
            g.insert(edge(&j, vocab::HAS_SUPPORT, &b));
            if premise {
                g.insert(typed(&b, vocab::PREMISE));
            }
        })
    }

    /// Puts `belief` on the OUT-list of `justification`.
    pub fn add_to_out(&mut self, belief: &str, justification: &str) -> TmsResult<bool> {
        self.list_edge("add_to_out", belief, justification, vocab::HAS_OPPOSITION, true)
    }

    /// Takes `belief` off the IN-list of `justification`.
    pub fn remove_from_in(&mut self, belief: &str, justification: &str) -> TmsResult<bool> {
        self.list_edge("remove_from_in", belief, justification, vocab::HAS_SUPPORT, false)
    }

    /// Takes `belief` off the OUT-list of `justification`.
    pub fn remove_from_out(&mut self, belief: &str, justification: &str) -> TmsResult<bool> {
        self.list_edge("remove_from_out", belief, justification, vocab::HAS_OPPOSITION, false)
    }

    fn list_edge(
        &mut self,
        op: &'static str,
        belief: &str,
        justification: &str,
        predicate: &'static str,
        insert: bool,
    ) -> TmsResult<bool> {
        let (Some(b), Some(j)) = (
            parse_id("belief", belief),
            parse_id("justification", justification),
        ) else {
            return Ok(false);
        };
        let t = edge(&j, predicate, &b);
        self.commit(op, |g| {
            if insert {
                g.insert(t);
            } else {
                g.remove(&t);
            }
        })
    }

    /// Tags `belief` premise.
    pub fn premise(&mut self, belief: &str) -> TmsResult<bool> {
        self.tag("premise", belief, vocab::PREMISE, true)
    }

    /// Removes the premise tag.
    pub fn unpremise(&mut self, belief: &str) -> TmsResult<bool> {
        self.tag("unpremise", belief, vocab::PREMISE, false)
    }

    /// Tags `belief` contradiction.
    pub fn contradict(&mut self, belief: &str) -> TmsResult<bool> {
        self.tag("contradict", belief, vocab::CONTRADICTION, true)
    }

    /// Removes the contradiction tag.
    pub fn uncontradict(&mut self, belief: &str) -> TmsResult<bool> {
        self.tag("uncontradict", belief, vocab::CONTRADICTION, false)
    }

    /// Sets both tags in one write.
    pub fn set_tags(&mut self, belief: &str, premise: bool, contradiction: bool) -> TmsResult<bool> {
        let Some(b) = parse_id("belief", belief) else {
            return Ok(false);
        };
        self.commit("set_tags", |g| {
            for (class, on) in [(vocab::PREMISE, premise), (vocab::CONTRADICTION, contradiction)] {
                let t = typed(&b, class);
                if on {
                    g.insert(t);
                } else {
                    g.remove(&t);
                }
            }
        })
    }

    fn tag(&mut self, op: &'static str, belief: &str, class: &'static str, on: bool) -> TmsResult<bool> {
        let Some(b) = parse_id("belief", belief) else {
            return Ok(false);
        };
        let t = typed(&b, class);
        self.commit(op, |g| {
            if on {
                g.insert(t);
            } else {
                g.remove(&t);
            }
        })
    }

    /// Annotates `belief` with `statement`.
    ///
    /// Inserts the statement, links the belief to its subject with
    /// `rdfs:seeAlso`, copies in the auxiliary dataset's facts about the
    /// subject and, when the subject ends up with a `prov:wasAttributedTo`
    /// IRI, the facts linked to that attribution (see [`Self::fetch_linked`]).
    /// Auxiliary lookups that fail are logged and skipped.
    pub fn add_statement(&mut self, belief: &str, statement: Triple) -> TmsResult<bool> {
        let Some(b) = parse_id("belief", belief) else {
            return Ok(false);
        };
        let Some(subject) = statement.subject.as_iri().cloned() else {
            tracing::warn!(statement = %statement, "ignoring annotation without an IRI subject");
            return Ok(false);
        };
        tracing::debug!(belief = %b, statement = %statement, "adding annotation");

        let mut additions = vec![
            statement,
            edge(&b, vocab::RDFS_SEE_ALSO, &subject),
        ];
        match self.enrichment.describe(&subject) {
            Ok(found) => additions.extend(found),
            Err(e) => tracing::warn!(subject = %subject, error = %e, "auxiliary lookup failed"),
        }

        let prov = vocab::iri(vocab::PROV_WAS_ATTRIBUTED_TO);
        let mut attributions: Vec<Iri> = self.graph.objects(&subject, vocab::PROV_WAS_ATTRIBUTED_TO);
        for t in &additions {
            if t.subject == Term::from(&subject) && t.predicate == prov {
                if let Some(target) = t.object.as_iri() {
                    attributions.push(target.clone());
                }
            }
        }
        attributions.sort();
        attributions.dedup();
        for attribution in &attributions {
            additions.extend(self.linked_facts(attribution));
        }

        self.commit("add_statement", |g| g.extend(additions))
    }

    /// Copies in facts the auxiliary dataset links to `resource` via
    /// `owl:sameAs`, re-homed onto `resource`, and records each linked
    /// resource as `owl:sameAs` it.
    pub fn fetch_linked(&mut self, resource: &str) -> TmsResult<bool> {
        let Some(r) = parse_id("resource", resource) else {
            return Ok(false);
        };
        let additions = self.linked_facts(&r);
        self.commit("fetch_linked", |g| g.extend(additions))
    }

    fn linked_facts(&self, resource: &Iri) -> Vec<Triple> {
        let found = match self.enrichment.linked(resource) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(resource = %resource, error = %e, "linked-data lookup failed");
                return Vec::new();
            }
        };
        let own = Term::from(resource);
        let mut out = Vec::with_capacity(found.len() * 2);
        for t in found {
            if t.subject != own {
                out.push(Triple::new(t.subject.clone(), vocab::iri(vocab::OWL_SAME_AS), resource));
            }
            out.push(Triple::new(resource, t.predicate, t.object));
        }
        out
    }

    /// Applies `edit` to a copy, persists it, then makes it current.
    fn commit(&mut self, op: &'static str, edit: impl FnOnce(&mut Graph)) -> TmsResult<bool> {
        let mut next = self.graph.clone();
        edit(&mut next);
        self.store.put_graph(&self.name, &next)?;
        self.graph = next;
        tracing::debug!(op, graph = %self.name, triples = self.graph.len(), "knowledge base changed");
        Ok(true)
    }
}
