//! Fixed vocabulary of the truth maintenance schema.
//!
//! The JTMS terms live under [`JTMS_NS`]. Writers (the knowledge base
//! commands) use the justification-side properties (`hasSupport`,
//! `hasOpposition`, `justifies`); the schema reasoner entails the
//! belief-side inverses (`supports`, `opposes`, `justifiedBy`,
//! `antecedentOf`) that the engine queries.

use crate::term::{Iri, Term};

/// Namespace of the JTMS vocabulary.
pub const JTMS_NS: &str = "urn:jtms:vocab#";

/// Class of all beliefs.
pub const BELIEF: &str = "urn:jtms:vocab#Belief";
/// Class of all justifications.
pub const JUSTIFICATION: &str = "urn:jtms:vocab#Justification";
/// Beliefs asserted unconditionally true.
pub const PREMISE: &str = "urn:jtms:vocab#Premise";
/// Beliefs asserted unconditionally false.
pub const CONTRADICTION: &str = "urn:jtms:vocab#Contradiction";

/// Materialized held-state of a belief (`xsd:boolean`).
pub const HAS_STATE: &str = "urn:jtms:vocab#hasState";
/// justification → IN-list belief.
pub const HAS_SUPPORT: &str = "urn:jtms:vocab#hasSupport";
/// justification → OUT-list belief.
pub const HAS_OPPOSITION: &str = "urn:jtms:vocab#hasOpposition";
/// justification → any antecedent belief (super-property of the two above).
pub const HAS_ANTECEDENT: &str = "urn:jtms:vocab#hasAntecedent";
/// justification → consequent belief.
pub const JUSTIFIES: &str = "urn:jtms:vocab#justifies";
/// belief → justification whose IN-list it is in.
pub const SUPPORTS: &str = "urn:jtms:vocab#supports";
/// belief → justification whose OUT-list it is in.
pub const OPPOSES: &str = "urn:jtms:vocab#opposes";
/// belief → justification it is an antecedent of.
pub const ANTECEDENT_OF: &str = "urn:jtms:vocab#antecedentOf";
/// belief → justification that justifies it.
pub const JUSTIFIED_BY: &str = "urn:jtms:vocab#justifiedBy";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdfs:seeAlso`; links a belief to the subjects of its annotations.
pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
/// `owl:sameAs`; followed in both directions when fetching linked facts.
pub const OWL_SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
/// `owl:versionInfo`; the single fact of a freshly created graph.
pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
/// `prov:wasAttributedTo`; its IRI objects are looked up for linked facts.
pub const PROV_WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";

/// Object properties of the JTMS vocabulary paired with their inverses.
pub const INVERSE_PAIRS: [(&str, &str); 4] = [
    (HAS_SUPPORT, SUPPORTS),
    (HAS_OPPOSITION, OPPOSES),
    (HAS_ANTECEDENT, ANTECEDENT_OF),
    (JUSTIFIES, JUSTIFIED_BY),
];

/// `(sub, super)` property pairs.
pub const SUB_PROPERTIES: [(&str, &str); 4] = [
    (HAS_SUPPORT, HAS_ANTECEDENT),
    (HAS_OPPOSITION, HAS_ANTECEDENT),
    (SUPPORTS, ANTECEDENT_OF),
    (OPPOSES, ANTECEDENT_OF),
];

/// `(sub, super)` class pairs.
pub const SUB_CLASSES: [(&str, &str); 2] = [(PREMISE, BELIEF), (CONTRADICTION, BELIEF)];

/// Justification-to-belief properties (domain Justification, range Belief).
pub const JUSTIFICATION_TO_BELIEF: [&str; 4] = [HAS_SUPPORT, HAS_OPPOSITION, HAS_ANTECEDENT, JUSTIFIES];

/// Belief-to-justification properties (domain Belief, range Justification).
pub const BELIEF_TO_JUSTIFICATION: [&str; 4] = [SUPPORTS, OPPOSES, ANTECEDENT_OF, JUSTIFIED_BY];

/// Returns a vocabulary term as an [`Iri`].
#[must_use]
pub fn iri(term: &'static str) -> Iri {
    Iri::from_static(term)
}

/// Returns a vocabulary term as a [`Term`].
#[must_use]
pub fn term(term: &'static str) -> Term {
    Term::Iri(Iri::from_static(term))
}
