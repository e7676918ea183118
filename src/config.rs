//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! knowledge_base_graph = "urn:jtms:graph:knowledge-base"
//! reasoner_graph = "urn:jtms:graph:reasoner"
//! namespace = "urn:jtms:kb#"
//!
//! [propagation]
//! max_steps = 1000000
//!
//! [schema]
//! forbid_premise_contradiction = false
//! reject_justification_cycles = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TmsError, TmsResult};
use crate::term::Iri;

/// Default name of the user-owned graph.
pub const DEFAULT_KNOWLEDGE_BASE_GRAPH: &str = "urn:jtms:graph:knowledge-base";
/// Default name of the validated, derived graph.
pub const DEFAULT_REASONER_GRAPH: &str = "urn:jtms:graph:reasoner";
/// Default namespace for unqualified names.
pub const DEFAULT_NAMESPACE: &str = "urn:jtms:kb#";

/// Limits for the propagation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagationConfig {
    /// Upper bound on state writes performed by one propagation run.
    pub max_steps: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self { max_steps: 1_000_000 }
    }
}

/// Optional validity rules of the built-in schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Reject beliefs tagged both premise and contradiction.
    pub forbid_premise_contradiction: bool,
    /// Reject fact graphs whose justification structure contains a cycle.
    pub reject_justification_cycles: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TmsConfig {
    /// Name of the KnowledgeBase graph.
    pub knowledge_base_graph: String,
    /// Name of the Reasoner graph.
    pub reasoner_graph: String,
    /// Prefix applied by [`TmsConfig::qualify`] to plain local names.
    pub namespace: String,
    /// Limits on propagation work.
    pub propagation: PropagationConfig,
    /// Optional rules for the built-in validator.
    pub schema: SchemaConfig,
}

impl Default for TmsConfig {
    fn default() -> Self {
        Self {
            knowledge_base_graph: DEFAULT_KNOWLEDGE_BASE_GRAPH.to_string(),
            reasoner_graph: DEFAULT_REASONER_GRAPH.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            propagation: PropagationConfig::default(),
            schema: SchemaConfig::default(),
        }
    }
}

impl TmsConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> TmsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| TmsError::config(format!("invalid TOML: {e}")))?;
        config.validate()
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> TmsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| TmsError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks graph names, namespace and limits.
    pub fn validate(self) -> TmsResult<Self> {
        let kb = self.knowledge_base_graph_iri()?;
        let reasoner = self.reasoner_graph_iri()?;
        if kb == reasoner {
            return Err(TmsError::config(format!(
                "knowledge_base_graph and reasoner_graph must differ (both {kb})"
            )));
        }
        Iri::parse(&self.namespace)
            .map_err(|e| TmsError::config(format!("namespace: {e}")))?;
        if self.propagation.max_steps == 0 {
            return Err(TmsError::config("propagation.max_steps must be at least 1"));
        }
        Ok(self)
    }

    /// Parsed name of the KnowledgeBase graph.
    pub fn knowledge_base_graph_iri(&self) -> TmsResult<Iri> {
        Iri::parse(&self.knowledge_base_graph)
            .map_err(|e| TmsError::config(format!("knowledge_base_graph: {e}")))
    }

    /// Parsed name of the Reasoner graph.
    pub fn reasoner_graph_iri(&self) -> TmsResult<Iri> {
        Iri::parse(&self.reasoner_graph)
            .map_err(|e| TmsError::config(format!("reasoner_graph: {e}")))
    }

    /// Prefixes a plain local name with the namespace.
    ///
    /// Names that already carry a scheme, and empty names, are returned
    /// unchanged.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() || name.contains(':') {
            name.to_string()
        } else {
            format!("{}{name}", self.namespace)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TmsConfig::default().validate().unwrap();
        assert_eq!(config.propagation.max_steps, 1_000_000);
        assert!(!config.schema.reject_justification_cycles);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TmsConfig::from_toml_str("").unwrap();
        assert_eq!(config, TmsConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = TmsConfig::from_toml_str(
            r#"
            namespace = "http://apollo.example/KB#"

            [schema]
            reject_justification_cycles = true
            "#,
        )
        .unwrap();
        assert!(config.schema.reject_justification_cycles);
        assert!(!config.schema.forbid_premise_contradiction);
        assert_eq!(config.qualify("batteryOk"), "http://apollo.example/KB#batteryOk");
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(TmsConfig::from_toml_str("colour = \"blue\"").is_err());
        assert!(TmsConfig::from_toml_str("reasoner_graph = \"not an iri\"").is_err());
        assert!(TmsConfig::from_toml_str("[propagation]\nmax_steps = 0").is_err());
        let same = format!("reasoner_graph = \"{DEFAULT_KNOWLEDGE_BASE_GRAPH}\"");
        assert!(TmsConfig::from_toml_str(&same).is_err());
    }

    #[test]
    fn test_qualify_leaves_iris_alone() {
        let config = TmsConfig::default();
        assert_eq!(config.qualify("urn:x"), "urn:x");
        assert_eq!(config.qualify(""), "");
        assert_eq!(config.qualify("a"), "urn:jtms:kb#a");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jtms.toml");
        std::fs::write(&path, "[propagation]\nmax_steps = 42\n").unwrap();
        assert_eq!(TmsConfig::load(&path).unwrap().propagation.max_steps, 42);
        assert!(TmsConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
