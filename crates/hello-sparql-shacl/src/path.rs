//! SHACL プロパティパス

use crate::ShaclError;
use hello_sparql_core::read_list;
use hello_sparql_core::term::as_subject;
use hello_sparql_core::vocab::{rdf, sh};
use itertools::Itertools;
use oxigraph::model::{BlankNode, Graph, NamedNode, NamedNodeRef, Term, TermRef, Triple};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// Property Path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyPath {
    Predicate(NamedNode),
    Inverse(Box<PropertyPath>),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
}

impl PropertyPath {
    /// シェイプグラフ中のパス表現を読み込む
    pub fn parse(graph: &Graph, node: TermRef<'_>) -> Result<Self, ShaclError> {
        Self::parse_node(graph, node, &mut HashSet::new())
    }

    fn parse_node(graph: &Graph, node: TermRef<'_>, visiting: &mut HashSet<Term>) -> Result<Self, ShaclError> {
        let blank = match node {
            TermRef::NamedNode(predicate) => return Ok(PropertyPath::Predicate(predicate.into_owned())),
            TermRef::BlankNode(blank) => blank,
            _ => return Err(invalid(node, "property path must be an IRI or a blank node")),
        };
        if !visiting.insert(node.into_owned()) {
            return Err(invalid(node, "cyclic property path"));
        }

        let path = if graph.object_for_subject_predicate(blank, rdf::FIRST).is_some() {
            PropertyPath::Sequence(Self::parse_members(graph, node, visiting)?)
        } else if let Some(list) = graph.object_for_subject_predicate(blank, sh::ALTERNATIVE_PATH) {
            PropertyPath::Alternative(Self::parse_members(graph, list, visiting)?)
        } else if let Some(inner) = Self::unary(graph, blank.into(), sh::INVERSE_PATH, visiting)? {
            PropertyPath::Inverse(inner)
        } else if let Some(inner) = Self::unary(graph, blank.into(), sh::ZERO_OR_MORE_PATH, visiting)? {
            PropertyPath::ZeroOrMore(inner)
        } else if let Some(inner) = Self::unary(graph, blank.into(), sh::ONE_OR_MORE_PATH, visiting)? {
            PropertyPath::OneOrMore(inner)
        } else if let Some(inner) = Self::unary(graph, blank.into(), sh::ZERO_OR_ONE_PATH, visiting)? {
            PropertyPath::ZeroOrOne(inner)
        } else {
            return Err(invalid(node, "unrecognized property path"));
        };

        visiting.remove(&node.into_owned());
        Ok(path)
    }

    fn unary(
        graph: &Graph,
        node: TermRef<'_>,
        operator: NamedNodeRef<'static>,
        visiting: &mut HashSet<Term>,
    ) -> Result<Option<Box<Self>>, ShaclError> {
        let Some(subject) = as_subject(node) else { return Ok(None) };
        match graph.object_for_subject_predicate(subject, operator) {
            Some(inner) => Ok(Some(Box::new(Self::parse_node(graph, inner, visiting)?))),
            None => Ok(None),
        }
    }

    fn parse_members(graph: &Graph, list: TermRef<'_>, visiting: &mut HashSet<Term>) -> Result<Vec<Self>, ShaclError> {
        let members = read_list(graph, list)?;
        if members.len() < 2 {
            return Err(invalid(list, "sequence and alternative paths need at least two members"));
        }
        members
            .iter()
            .map(|member| Self::parse_node(graph, member.as_ref(), visiting))
            .collect()
    }

    /// The predicate when the path is a single IRI
    pub fn predicate(&self) -> Option<&NamedNode> {
        match self {
            PropertyPath::Predicate(predicate) => Some(predicate),
            _ => None,
        }
    }

    /// `focus` から到達できる値ノード (発見順、重複なし)
    pub fn values(&self, graph: &Graph, focus: &Term) -> Vec<Term> {
        self.step(graph, focus, true)
    }

    fn step(&self, graph: &Graph, node: &Term, forward: bool) -> Vec<Term> {
        match self {
            PropertyPath::Predicate(predicate) if forward => match as_subject(node.as_ref()) {
                Some(subject) => graph
                    .objects_for_subject_predicate(subject, predicate)
                    .map(TermRef::into_owned)
                    .collect(),
                None => Vec::new(),
            },
            PropertyPath::Predicate(predicate) => graph
                .subjects_for_predicate_object(predicate, node)
                .map(|subject| subject.into_owned().into())
                .collect(),
            PropertyPath::Inverse(inner) => inner.step(graph, node, !forward),
            PropertyPath::Sequence(steps) => {
                let mut current = vec![node.clone()];
                let mut apply = |step: &PropertyPath| {
                    current = current
                        .iter()
                        .flat_map(|n| step.step(graph, n, forward))
                        .unique()
                        .collect();
                };
                if forward {
                    steps.iter().for_each(&mut apply);
                } else {
                    steps.iter().rev().for_each(&mut apply);
                }
                current
            }
            PropertyPath::Alternative(alternatives) => alternatives
                .iter()
                .flat_map(|alternative| alternative.step(graph, node, forward))
                .unique()
                .collect(),
            PropertyPath::ZeroOrMore(inner) => closure(inner, graph, node, forward, true),
            PropertyPath::OneOrMore(inner) => closure(inner, graph, node, forward, false),
            PropertyPath::ZeroOrOne(inner) => std::iter::once(node.clone())
                .chain(inner.step(graph, node, forward))
                .unique()
                .collect(),
        }
    }

    /// Write the path as SHACL path triples, returning the path node
    pub fn to_rdf(&self, triples: &mut Vec<Triple>, fresh: &mut dyn FnMut() -> BlankNode) -> Term {
        let (operator, inner) = match self {
            PropertyPath::Predicate(predicate) => return predicate.clone().into(),
            PropertyPath::Sequence(steps) => return list_to_rdf(steps, triples, fresh),
            PropertyPath::Alternative(alternatives) => {
                let node = fresh();
                let list = list_to_rdf(alternatives, triples, fresh);
                triples.push(Triple::new(node.clone(), sh::ALTERNATIVE_PATH, list));
                return node.into();
            }
            PropertyPath::Inverse(inner) => (sh::INVERSE_PATH, inner),
            PropertyPath::ZeroOrMore(inner) => (sh::ZERO_OR_MORE_PATH, inner),
            PropertyPath::OneOrMore(inner) => (sh::ONE_OR_MORE_PATH, inner),
            PropertyPath::ZeroOrOne(inner) => (sh::ZERO_OR_ONE_PATH, inner),
        };
        let node = fresh();
        let object = inner.to_rdf(triples, fresh);
        triples.push(Triple::new(node.clone(), operator, object));
        node.into()
    }
}

fn invalid(node: TermRef<'_>, reason: &'static str) -> ShaclError {
    ShaclError::InvalidPath {
        node: node.to_string(),
        reason,
    }
}

fn closure(inner: &PropertyPath, graph: &Graph, start: &Term, forward: bool, reflexive: bool) -> Vec<Term> {
    let mut seen = HashSet::new();
    let mut reached = Vec::new();
    if reflexive {
        seen.insert(start.clone());
        reached.push(start.clone());
    }

    let mut queue = VecDeque::from([start.clone()]);
    while let Some(node) = queue.pop_front() {
        for next in inner.step(graph, &node, forward) {
            if seen.insert(next.clone()) {
                reached.push(next.clone());
                queue.push_back(next);
            }
        }
    }
    reached
}

fn list_to_rdf(items: &[PropertyPath], triples: &mut Vec<Triple>, fresh: &mut dyn FnMut() -> BlankNode) -> Term {
    let cells: Vec<BlankNode> = items.iter().map(|_| fresh()).collect();
    for (i, (cell, item)) in cells.iter().zip(items).enumerate() {
        let first = item.to_rdf(triples, fresh);
        let rest: Term = match cells.get(i + 1) {
            Some(next) => next.clone().into(),
            None => rdf::NIL.into_owned().into(),
        };
        triples.push(Triple::new(cell.clone(), rdf::FIRST, first));
        triples.push(Triple::new(cell.clone(), rdf::REST, rest));
    }
    match cells.first() {
        Some(head) => head.clone().into(),
        None => rdf::NIL.into_owned().into(),
    }
}

/// SPARQL property path syntax
impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyPath::Predicate(predicate) => write!(f, "{predicate}"),
            PropertyPath::Inverse(inner) => write!(f, "^{}", Grouped(inner)),
            PropertyPath::Sequence(steps) => write!(f, "{}", steps.iter().map(Grouped).format("/")),
            PropertyPath::Alternative(alternatives) => {
                write!(f, "{}", alternatives.iter().map(Grouped).format("|"))
            }
            PropertyPath::ZeroOrMore(inner) => write!(f, "{}*", Grouped(inner)),
            PropertyPath::OneOrMore(inner) => write!(f, "{}+", Grouped(inner)),
            PropertyPath::ZeroOrOne(inner) => write!(f, "{}?", Grouped(inner)),
        }
    }
}

/// Parenthesizes anything but a bare predicate
struct Grouped<'a>(&'a PropertyPath);

impl fmt::Display for Grouped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PropertyPath::Predicate(_) => write!(f, "{}", self.0),
            path => write!(f, "({path})"),
        }
    }
}
