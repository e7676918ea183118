//! # jtms - Justification-based Truth Maintenance
//!
//! A network of beliefs and justifications kept consistent under JTMS
//! semantics: a belief is held when some justification for it holds, and a
//! justification holds when every belief on its IN-list is held and no
//! belief on its OUT-list is.
//!
//! ## Core Concepts
//!
//! - **KnowledgeBase**: the user-owned fact graph, edited only by commands
//! - **Reasoner**: the validated derived graph; knowledge base plus
//!   entailments plus each belief's stored `hasState` flag
//! - **Validator**: entailment and validity checking that gates every update
//! - **Propagation**: OUT-before-IN re-evaluation of consequents after a
//!   belief's flag changes
//!
//! ## Usage
//!
//! ```rust
//! use jtms::{BeliefKind, Iri, Tms};
//!
//! let mut tms = Tms::in_memory()?;
//! tms.add_to_in("urn:kb#batteryOk", "urn:kb#havePower")?;
//! tms.justifies("urn:kb#havePower", "urn:kb#lightsOn")?;
//! tms.set_belief_kind("urn:kb#batteryOk", BeliefKind::Premise)?;
//!
//! let lights = Iri::parse("urn:kb#lightsOn")?;
//! assert!(tms.reasoner().materialized_state(&lights));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Terms, vocabulary and queries
pub mod error;
pub mod graph;
pub mod pattern;
pub mod term;
pub mod vocab;

// Storage, schema and auxiliary data
pub mod config;
pub mod enrichment;
pub mod schema;
pub mod storage;

// Maintenance
pub mod belief;
pub mod engine;
pub mod knowledge_base;
pub mod tms;

pub use belief::{Belief, BeliefKind, Justification, Node};
pub use config::{PropagationConfig, SchemaConfig, TmsConfig};
pub use engine::{PropagationReport, Reasoner, StateTransition, UpdateOutcome};
pub use enrichment::{Enrichment, GraphEnrichment, NoEnrichment};
pub use error::{FailureKind, TmsError, TmsResult, ValidationError};
pub use graph::Graph;
pub use knowledge_base::KnowledgeBase;
pub use pattern::{PatternTerm, TriplePattern};
pub use schema::{JtmsSchema, Validator, ValidatorError, ValidityReport};
pub use storage::{InMemoryTripleStore, StorageError, TripleStore};
pub use term::{Iri, Literal, Term, Triple};
pub use tms::{CommandOutcome, Tms};
