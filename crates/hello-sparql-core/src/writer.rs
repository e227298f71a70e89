//! Ordered triple serialization

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::Triple;
use std::io;

/// Graph syntaxes a report graph can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSyntax {
    Turtle,
    RdfXml,
    NTriples,
}

impl GraphSyntax {
    fn rdf_format(self) -> RdfFormat {
        match self {
            GraphSyntax::Turtle => RdfFormat::Turtle,
            GraphSyntax::RdfXml => RdfFormat::RdfXml,
            GraphSyntax::NTriples => RdfFormat::NTriples,
        }
    }
}

/// Write `triples` in the given order.
///
/// Takes a slice rather than a [`oxigraph::model::Graph`] so the caller
/// controls output order.
pub fn write_triples(triples: &[Triple], syntax: GraphSyntax) -> io::Result<String> {
    let mut serializer = RdfSerializer::from_format(syntax.rdf_format()).for_writer(Vec::new());
    for triple in triples {
        serializer.serialize_triple(triple)?;
    }
    let bytes = serializer.finish()?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{Literal, NamedNode};

    fn sample() -> Vec<Triple> {
        vec![Triple::new(
            NamedNode::new_unchecked("http://example.org/Alice"),
            NamedNode::new_unchecked("http://example.org/name"),
            Literal::new_simple_literal("Alice"),
        )]
    }

    #[test]
    fn test_ntriples_output() {
        let text = write_triples(&sample(), GraphSyntax::NTriples).unwrap();
        assert_eq!(
            text.trim(),
            "<http://example.org/Alice> <http://example.org/name> \"Alice\" ."
        );
    }

    #[test]
    fn test_rdfxml_output_is_xml() {
        let text = write_triples(&sample(), GraphSyntax::RdfXml).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("Alice"));
    }
}
