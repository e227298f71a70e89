//! Conversions between term positions

use oxigraph::model::{SubjectRef, TermRef};
use std::fmt::Display;

/// View a term as a triple subject; literals cannot be subjects
pub fn as_subject(term: TermRef<'_>) -> Option<SubjectRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node.into()),
        TermRef::BlankNode(node) => Some(node.into()),
        _ => None,
    }
}

/// Whether the term is an IRI or a blank node
pub fn is_resource(term: TermRef<'_>) -> bool {
    as_subject(term).is_some()
}

/// Sort terms by their N-Triples form
///
/// Graph iteration order follows interned keys, which differ between runs.
pub fn sort_terms<T: Display>(terms: &mut [T]) {
    terms.sort_by_cached_key(ToString::to_string);
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal, NamedNode};

    #[test]
    fn test_literal_is_not_a_subject() {
        let literal = Literal::new_simple_literal("Alice");
        assert!(as_subject(literal.as_ref().into()).is_none());
        assert!(!is_resource(literal.as_ref().into()));
    }

    #[test]
    fn test_nodes_are_subjects() {
        let iri = NamedNode::new_unchecked("http://example.org/Alice");
        let blank = BlankNode::new_unchecked("b0");
        assert!(as_subject(iri.as_ref().into()).is_some());
        assert!(as_subject(blank.as_ref().into()).is_some());
    }

    #[test]
    fn test_sort_terms_is_stable_across_kinds() {
        let mut terms: Vec<oxigraph::model::Term> = vec![
            Literal::new_simple_literal("z").into(),
            BlankNode::new_unchecked("s1").into(),
            NamedNode::new_unchecked("http://example.org/b").into(),
            BlankNode::new_unchecked("s0").into(),
            NamedNode::new_unchecked("http://example.org/a").into(),
        ];
        sort_terms(&mut terms);
        let printed: Vec<String> = terms.iter().map(ToString::to_string).collect();
        assert_eq!(
            printed,
            ["\"z\"", "<http://example.org/a>", "<http://example.org/b>", "_:s0", "_:s1"]
        );
    }
}
