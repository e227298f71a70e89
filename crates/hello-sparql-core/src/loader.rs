//! RDF text loading with syntax sniffing

use crate::LoadError;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{BlankNode, Graph, Quad, Subject, Term, Triple};
use std::collections::HashMap;
use tracing::debug;

/// Parses RDF text of unknown syntax into a [`Graph`].
///
/// Blank nodes are relabeled `<prefix>0`, `<prefix>1`, ... in document order,
/// so loading the same text twice yields identical graphs.
#[derive(Debug, Clone)]
pub struct GraphLoader {
    blank_node_prefix: String,
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self {
            blank_node_prefix: "b".to_string(),
        }
    }
}

impl GraphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose relabeled blank nodes start with `prefix`
    pub fn with_blank_node_prefix(prefix: impl Into<String>) -> Self {
        Self {
            blank_node_prefix: prefix.into(),
        }
    }

    /// Parse `text`, trying each candidate syntax in turn.
    ///
    /// When no candidate accepts the text the first candidate's diagnostic is
    /// returned, since it is the syntax the text most looks like.
    pub fn load(&self, text: &str) -> Result<Graph, LoadError> {
        let candidates = sniff_candidates(text);
        let mut first_error = None;

        for &format in candidates {
            match self.parse_as(text, format) {
                Ok(graph) => {
                    debug!(syntax = format.name(), triples = graph.len(), "loaded RDF graph");
                    return Ok(graph);
                }
                Err(message) => {
                    debug!(syntax = format.name(), %message, "RDF syntax candidate rejected");
                    first_error.get_or_insert(LoadError::Syntax {
                        syntax: format.name(),
                        message,
                    });
                }
            }
        }

        Err(first_error.unwrap_or(LoadError::Syntax {
            syntax: "RDF",
            message: "no RDF syntax candidate".to_string(),
        }))
    }

    fn parse_as(&self, text: &str, format: RdfFormat) -> Result<Graph, String> {
        let mut graph = Graph::new();
        let mut relabel = BlankNodeRelabeler::new(&self.blank_node_prefix);

        for quad in RdfParser::from_format(format).for_reader(text.as_bytes()) {
            let quad = quad.map_err(|e| e.to_string())?;
            graph.insert(&relabel.triple(quad));
        }

        Ok(graph)
    }
}

/// Candidate syntaxes for `text`, most likely first
pub fn sniff_candidates(text: &str) -> &'static [RdfFormat] {
    let head = text.trim_start();
    if head.starts_with("<?xml") || head.starts_with("<rdf:RDF") {
        &[RdfFormat::RdfXml]
    } else {
        // Turtle also accepts N-Triples; TriG adds named graph blocks
        &[RdfFormat::Turtle, RdfFormat::TriG]
    }
}

struct BlankNodeRelabeler<'a> {
    prefix: &'a str,
    labels: HashMap<String, BlankNode>,
}

impl<'a> BlankNodeRelabeler<'a> {
    fn new(prefix: &'a str) -> Self {
        Self {
            prefix,
            labels: HashMap::new(),
        }
    }

    /// Drop the graph name and relabel blank nodes
    fn triple(&mut self, quad: Quad) -> Triple {
        let subject = match quad.subject {
            Subject::BlankNode(node) => Subject::BlankNode(self.node(&node)),
            other => other,
        };
        let object = match quad.object {
            Term::BlankNode(node) => Term::BlankNode(self.node(&node)),
            other => other,
        };
        Triple::new(subject, quad.predicate, object)
    }

    fn node(&mut self, node: &BlankNode) -> BlankNode {
        let next = self.labels.len();
        let prefix = self.prefix;
        self.labels
            .entry(node.as_str().to_string())
            .or_insert_with(|| BlankNode::new_unchecked(format!("{prefix}{next}")))
            .clone()
    }
}
