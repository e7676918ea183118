//! RDF-style terms and triples.
//!
//! Every fact in the engine is a [`Triple`] of [`Term`]s. Identities of
//! beliefs and justifications are [`Iri`]s; held-state flags and annotation
//! values are [`Literal`]s.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// XSD boolean datatype IRI.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// XSD string datatype IRI.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

static IRI_SYNTAX: OnceLock<Regex> = OnceLock::new();

fn iri_syntax() -> &'static Regex {
    IRI_SYNTAX.get_or_init(|| {
        // Scheme followed by a non-empty body free of whitespace and the
        // characters N-Triples forbids inside `<...>`.
        Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]+$"#)
            .unwrap_or_else(|e| unreachable!("static IRI pattern is valid: {e}"))
    })
}

/// An absolute IRI.
///
/// # Examples
///
/// ```
/// use jtms::Iri;
///
/// let iri = Iri::parse("http://example.org/kb#batteryOk").unwrap();
/// assert_eq!(iri.local_name(), "batteryOk");
/// assert!(Iri::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(String);

impl Iri {
    /// Parses and validates an IRI.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if !iri_syntax().is_match(value) {
            return Err(ValidationError::MalformedIri {
                value: value.to_string(),
                reason: "expected scheme:body without whitespace or delimiters".to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    /// Wraps a known-good static IRI (vocabulary constants).
    #[must_use]
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    /// Returns the IRI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the fragment or last path segment.
    #[must_use]
    pub fn local_name(&self) -> &str {
        let cut = self
            .0
            .rfind(['#', '/', ':'])
            .map_or(0, |idx| idx + 1);
        &self.0[cut..]
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Iri {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Iri {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

/// A literal value with optional datatype or language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form.
    pub lexical: String,
    /// Datatype IRI, absent for plain literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Iri>,
    /// Language tag for language-tagged strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// Creates a plain string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Creates an `xsd:boolean` literal.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            lexical: value.to_string(),
            datatype: Some(Iri::from_static(XSD_BOOLEAN)),
            language: None,
        }
    }

    /// Creates a language-tagged string.
    #[must_use]
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// Creates a typed literal.
    #[must_use]
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Returns the boolean value if this is a well-formed `xsd:boolean`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if self.datatype.as_ref().map(Iri::as_str) != Some(XSD_BOOLEAN) {
            return None;
        }
        match self.lexical.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.replace('\\', "\\\\").replace('"', "\\\""))?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^<{dt}>")
        } else {
            Ok(())
        }
    }
}

/// A node in the fact graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Term {
    /// A named resource.
    Iri(Iri),
    /// A blank node, by label.
    Blank(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Creates a fresh blank node with a random label.
    #[must_use]
    pub fn fresh_blank() -> Self {
        Self::Blank(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for literals.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Self::Iri(iri.clone())
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::boolean(value))
    }
}

/// A subject–predicate–object fact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// IRI or blank node in practice; literals are accepted but never
    /// produced by the engine.
    pub subject: Term,
    /// Always an IRI.
    pub predicate: Iri,
    /// Any term.
    pub object: Term,
}

impl Triple {
    /// Creates a new triple.
    pub fn new(subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Parses a triple whose three positions are IRIs.
    pub fn from_iris(subject: &str, predicate: &str, object: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Iri::parse(subject)?, Iri::parse(predicate)?, Iri::parse(object)?))
    }

    /// Returns true if `term` appears as subject or object.
    #[must_use]
    pub fn mentions(&self, term: &Term) -> bool {
        &self.subject == term || &self.object == term
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}
