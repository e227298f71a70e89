//! # hello-sparql core
//!
//! Shared building blocks for the SPARQL and SHACL pipelines:
//! - RDF text loading with syntax sniffing ([`GraphLoader`])
//! - the response serialization formats ([`SerializationFormat`])
//! - RDF/OWL/SHACL vocabulary and RDF collection helpers

pub mod format;
pub mod list;
pub mod loader;
pub mod term;
pub mod vocab;
pub mod writer;

pub use format::{SerializationFormat, UnknownFormat};
pub use list::{read_list, ListError};
pub use loader::GraphLoader;
pub use writer::{write_triples, GraphSyntax};

// Engine model types, re-exported so downstream crates agree on one version
pub use oxigraph::model::{
    BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Subject, SubjectRef, Term, TermRef,
    Triple, TripleRef,
};

use thiserror::Error;

/// Failure to turn RDF text into a [`Graph`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{syntax} syntax error: {message}")]
    Syntax {
        syntax: &'static str,
        message: String,
    },
}

impl LoadError {
    /// Name of the RDF syntax whose diagnostic is reported
    pub fn syntax(&self) -> &'static str {
        match self {
            LoadError::Syntax { syntax, .. } => syntax,
        }
    }
}
