//! Loading vocabulary graphs into triples.
//!
//! The concept store only needs a flat list of [`Triple`]s. This module
//! provides the [`GraphLoader`] seam plus [`RdfLoader`], which reads
//! N-Triples, Turtle and RDF/XML through the `oxttl` and `oxrdfxml` parsers
//! and converts their statements into the store's own term model.

use std::fmt;
use std::io::Read;
use std::path::Path;

use oxrdfxml::RdfXmlParser;
use oxttl::{NTriplesParser, TurtleParser};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkosError};

/// A node in an RDF graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its document-local label.
    BlankNode(String),
    /// A literal with an optional language tag or datatype IRI.
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    /// Create an IRI term.
    pub fn iri<S: Into<String>>(iri: S) -> Self {
        Term::Iri(iri.into())
    }

    /// Create a plain literal.
    pub fn literal<S: Into<String>>(value: S) -> Self {
        Term::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal.
    pub fn lang_literal<S: Into<String>, L: Into<String>>(value: S, language: L) -> Self {
        Term::Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// The IRI of this term, if it is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Whether this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::BlankNode(label) => write!(f, "_:{label}"),
            Term::Literal {
                value,
                language,
                datatype,
            } => {
                write!(f, "{value:?}")?;
                if let Some(language) = language {
                    write!(f, "@{language}")?;
                } else if let Some(datatype) = datatype {
                    write!(f, "^^<{datatype}>")?;
                }
                Ok(())
            }
        }
    }
}

impl From<oxrdf::Literal> for Term {
    fn from(literal: oxrdf::Literal) -> Self {
        let language = literal.language().map(str::to_string);
        let datatype = if literal.is_plain() {
            None
        } else {
            Some(literal.datatype().as_str().to_string())
        };

        Term::Literal {
            value: literal.value().to_string(),
            language,
            datatype,
        }
    }
}

impl From<oxrdf::Subject> for Term {
    fn from(subject: oxrdf::Subject) -> Self {
        match subject {
            oxrdf::Subject::NamedNode(node) => Term::Iri(node.into_string()),
            oxrdf::Subject::BlankNode(node) => Term::BlankNode(node.into_string()),
            // Quoted triples never name a concept.
            #[allow(unreachable_patterns)]
            other => Term::BlankNode(other.to_string()),
        }
    }
}

impl From<oxrdf::Term> for Term {
    fn from(term: oxrdf::Term) -> Self {
        match term {
            oxrdf::Term::NamedNode(node) => Term::Iri(node.into_string()),
            oxrdf::Term::BlankNode(node) => Term::BlankNode(node.into_string()),
            oxrdf::Term::Literal(literal) => literal.into(),
            #[allow(unreachable_patterns)]
            other => Term::BlankNode(other.to_string()),
        }
    }
}

/// A single (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    /// Create a new triple.
    pub fn new<P: Into<String>>(subject: Term, predicate: P, object: Term) -> Self {
        Triple {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl From<oxrdf::Triple> for Triple {
    fn from(triple: oxrdf::Triple) -> Self {
        Triple {
            subject: triple.subject.into(),
            predicate: triple.predicate.into_string(),
            object: triple.object.into(),
        }
    }
}

/// RDF serializations understood by [`RdfLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RdfFormat {
    /// Line-based N-Triples.
    NTriples,
    /// Turtle, also used for `.n3` files.
    Turtle,
    /// RDF/XML.
    RdfXml,
}

impl RdfFormat {
    /// Pick a format from a file extension.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "nt" => Ok(RdfFormat::NTriples),
            "ttl" | "n3" => Ok(RdfFormat::Turtle),
            "rdf" | "xml" | "owl" => Ok(RdfFormat::RdfXml),
            _ => Err(SkosError::load(format!(
                "unsupported vocabulary serialization: .{extension}"
            ))),
        }
    }

    /// Pick a format from a serialization name such as `TURTLE` or `RDF/XML`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "N-TRIPLES" | "NTRIPLES" | "NT" => Ok(RdfFormat::NTriples),
            "TURTLE" | "TTL" | "N3" => Ok(RdfFormat::Turtle),
            "RDF/XML" | "RDFXML" | "RDF" | "XML" => Ok(RdfFormat::RdfXml),
            _ => Err(SkosError::load(format!(
                "unsupported vocabulary serialization: {name}"
            ))),
        }
    }

    /// Pick a format from the extension of a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                SkosError::load(format!(
                    "cannot infer serialization of {} without a file extension",
                    path.display()
                ))
            })?;
        Self::from_extension(extension)
    }

    /// The conventional name of this serialization.
    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::Turtle => "Turtle",
            RdfFormat::RdfXml => "RDF/XML",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns a serialized vocabulary into triples.
pub trait GraphLoader: Send + Sync {
    /// Parse every statement of `input`.
    fn load(&self, input: &mut dyn Read, format: RdfFormat) -> Result<Vec<Triple>>;
}

/// The built-in loader for N-Triples, Turtle and RDF/XML.
#[derive(Debug, Clone, Default)]
pub struct RdfLoader {
    base_iri: Option<String>,
}

impl RdfLoader {
    pub fn new() -> Self {
        RdfLoader::default()
    }

    /// Resolve relative IRIs in Turtle and RDF/XML documents against `base_iri`.
    pub fn with_base_iri<S: Into<String>>(mut self, base_iri: S) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }

    /// Parse a document that is already in memory.
    pub fn parse_str(&self, document: &str, format: RdfFormat) -> Result<Vec<Triple>> {
        self.load(&mut document.as_bytes(), format)
    }

    fn invalid_base(&self, e: impl fmt::Display) -> SkosError {
        SkosError::load(format!(
            "invalid base IRI {:?}: {e}",
            self.base_iri.as_deref().unwrap_or_default()
        ))
    }
}

impl GraphLoader for RdfLoader {
    fn load(&self, input: &mut dyn Read, format: RdfFormat) -> Result<Vec<Triple>> {
        match format {
            RdfFormat::NTriples => collect(format, NTriplesParser::new().for_reader(input)),
            RdfFormat::Turtle => {
                let mut parser = TurtleParser::new();
                if let Some(base) = &self.base_iri {
                    parser = parser
                        .with_base_iri(base.as_str())
                        .map_err(|e| self.invalid_base(e))?;
                }
                collect(format, parser.for_reader(input))
            }
            RdfFormat::RdfXml => {
                let mut parser = RdfXmlParser::new();
                if let Some(base) = &self.base_iri {
                    parser = parser
                        .with_base_iri(base.as_str())
                        .map_err(|e| self.invalid_base(e))?;
                }
                collect(format, parser.for_reader(input))
            }
        }
    }
}

/// Drain a parser, failing on the first syntax or read error.
fn collect<I, E>(format: RdfFormat, statements: I) -> Result<Vec<Triple>>
where
    I: Iterator<Item = std::result::Result<oxrdf::Triple, E>>,
    E: fmt::Display,
{
    statements
        .map(|statement| {
            statement
                .map(Triple::from)
                .map_err(|e| SkosError::load(format!("invalid {format} vocabulary: {e}")))
        })
        .collect()
}
