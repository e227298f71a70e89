//! RDF collection (`rdf:first` / `rdf:rest`) reading

use crate::term::as_subject;
use crate::vocab::rdf;
use oxigraph::model::{Graph, Term, TermRef};
use std::collections::HashSet;
use thiserror::Error;

/// A collection that is not a well-formed `rdf:List`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed RDF list at {node}: {reason}")]
pub struct ListError {
    pub node: String,
    pub reason: &'static str,
}

impl ListError {
    fn at(node: TermRef<'_>, reason: &'static str) -> Self {
        Self {
            node: node.to_string(),
            reason,
        }
    }
}

/// Read the members of the collection starting at `head`, in order.
///
/// Every cell must have exactly one `rdf:first` and one `rdf:rest`, and the
/// chain must end in `rdf:nil` without revisiting a cell.
pub fn read_list(graph: &Graph, head: TermRef<'_>) -> Result<Vec<Term>, ListError> {
    let mut members = Vec::new();
    let mut visited = HashSet::new();
    let mut current = head;

    while current != TermRef::from(rdf::NIL) {
        let cell = as_subject(current).ok_or_else(|| ListError::at(current, "literal in list position"))?;
        if !visited.insert(current.into_owned()) {
            return Err(ListError::at(current, "cycle in rdf:rest chain"));
        }

        let mut firsts = graph.objects_for_subject_predicate(cell, rdf::FIRST);
        let first = firsts
            .next()
            .ok_or_else(|| ListError::at(current, "missing rdf:first"))?;
        if firsts.next().is_some() {
            return Err(ListError::at(current, "multiple rdf:first values"));
        }

        let mut rests = graph.objects_for_subject_predicate(cell, rdf::REST);
        let rest = rests
            .next()
            .ok_or_else(|| ListError::at(current, "missing rdf:rest"))?;
        if rests.next().is_some() {
            return Err(ListError::at(current, "multiple rdf:rest values"));
        }

        members.push(first.into_owned());
        current = rest;
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::GraphLoader;
    use oxigraph::model::NamedNode;

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{local}"))
    }

    #[test]
    fn test_read_list_in_order() {
        let graph = GraphLoader::new()
            .load("@prefix ex: <http://example.org/> . ex:s ex:p ( ex:a ex:b ex:c ) .")
            .unwrap();
        let (s, p) = (ex("s"), ex("p"));
        let head = graph
            .object_for_subject_predicate(s.as_ref(), p.as_ref())
            .unwrap();

        let members = read_list(&graph, head).unwrap();
        assert_eq!(
            members,
            vec![Term::from(ex("a")), Term::from(ex("b")), Term::from(ex("c"))]
        );
    }

    #[test]
    fn test_nil_is_empty_list() {
        let graph = Graph::new();
        let members = read_list(&graph, rdf::NIL.into()).unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let graph = GraphLoader::new()
            .load(
                "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
                 @prefix ex: <http://example.org/> .
                 ex:l1 rdf:first ex:a ; rdf:rest ex:l2 .
                 ex:l2 rdf:first ex:b ; rdf:rest ex:l1 .",
            )
            .unwrap();

        let l1 = ex("l1");
        let err = read_list(&graph, l1.as_ref().into()).unwrap_err();
        assert_eq!(err.reason, "cycle in rdf:rest chain");
    }

    #[test]
    fn test_missing_rest_is_rejected() {
        let graph = GraphLoader::new()
            .load(
                "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
                 @prefix ex: <http://example.org/> .
                 ex:l1 rdf:first ex:a .",
            )
            .unwrap();

        let l1 = ex("l1");
        let err = read_list(&graph, l1.as_ref().into()).unwrap_err();
        assert_eq!(err.reason, "missing rdf:rest");
    }
}
