//! SHACL ShapesGraph 読み込み

use crate::path::PropertyPath;
use crate::report::Severity;
use crate::ShaclError;
use hello_sparql_core::read_list;
use hello_sparql_core::term::{as_subject, sort_terms};
use hello_sparql_core::vocab::{owl, rdf, rdfs, sh};
use oxigraph::model::{Graph, Literal, NamedNode, NamedNodeRef, Term, TermRef};
use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Index of a shape inside its [`ShapesGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

/// Shapes Graph
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    shapes: Vec<Shape>,
}

impl ShapesGraph {
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0]
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Shape (a property shape when `path` is set, otherwise a node shape)
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Term,
    pub path: Option<PropertyPath>,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub deactivated: bool,
    pub severity: Severity,
    pub message: Option<String>,
}

/// Focus node selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Class(Term),
    Node(Term),
    SubjectsOf(NamedNode),
    ObjectsOf(NamedNode),
}

/// Node Kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    BlankNode,
    Iri,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    fn from_iri(iri: NamedNodeRef<'_>) -> Option<Self> {
        Some(match iri {
            i if i == sh::BLANK_NODE => NodeKind::BlankNode,
            i if i == sh::IRI => NodeKind::Iri,
            i if i == sh::LITERAL => NodeKind::Literal,
            i if i == sh::BLANK_NODE_OR_IRI => NodeKind::BlankNodeOrIri,
            i if i == sh::BLANK_NODE_OR_LITERAL => NodeKind::BlankNodeOrLiteral,
            i if i == sh::IRI_OR_LITERAL => NodeKind::IriOrLiteral,
            _ => return None,
        })
    }

    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            NodeKind::BlankNode => sh::BLANK_NODE,
            NodeKind::Iri => sh::IRI,
            NodeKind::Literal => sh::LITERAL,
            NodeKind::BlankNodeOrIri => sh::BLANK_NODE_OR_IRI,
            NodeKind::BlankNodeOrLiteral => sh::BLANK_NODE_OR_LITERAL,
            NodeKind::IriOrLiteral => sh::IRI_OR_LITERAL,
        }
    }

    pub fn matches(self, term: &Term) -> bool {
        matches!(
            (self, term),
            (NodeKind::BlankNode | NodeKind::BlankNodeOrIri | NodeKind::BlankNodeOrLiteral, Term::BlankNode(_))
                | (NodeKind::Iri | NodeKind::BlankNodeOrIri | NodeKind::IriOrLiteral, Term::NamedNode(_))
                | (NodeKind::Literal | NodeKind::BlankNodeOrLiteral | NodeKind::IriOrLiteral, Term::Literal(_))
        )
    }
}

/// Compiled `sh:pattern` with its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub source: String,
    pub flags: Option<String>,
}

/// Constraint components
#[derive(Debug, Clone)]
pub enum Constraint {
    Class(Term),
    Datatype(NamedNode),
    NodeKind(NodeKind),
    MinCount(u64),
    MaxCount(u64),
    MinExclusive(Literal),
    MinInclusive(Literal),
    MaxExclusive(Literal),
    MaxInclusive(Literal),
    MinLength(u64),
    MaxLength(u64),
    Pattern(Pattern),
    LanguageIn(Vec<String>),
    UniqueLang,
    Equals(NamedNode),
    Disjoint(NamedNode),
    LessThan(NamedNode),
    LessThanOrEquals(NamedNode),
    In(Vec<Term>),
    HasValue(Term),
    /// 許可されるプロパティ (`sh:property` の述語と `sh:ignoredProperties`)
    Closed { allowed: Vec<NamedNode> },
    Not(ShapeId),
    And(Vec<ShapeId>),
    Or(Vec<ShapeId>),
    Xone(Vec<ShapeId>),
    Node(ShapeId),
    Property(ShapeId),
    QualifiedValueShape {
        shape: ShapeId,
        min_count: Option<u64>,
        max_count: Option<u64>,
    },
}

/// Builds a [`ShapesGraph`] from a parsed shapes graph
pub struct ShapesLoader<'g> {
    graph: &'g Graph,
    shapes: Vec<Shape>,
    index: HashMap<Term, ShapeId>,
}

impl<'g> ShapesLoader<'g> {
    /// シェイプグラフからすべてのシェイプを読み込む
    pub fn load(graph: &'g Graph) -> Result<ShapesGraph, ShaclError> {
        let mut loader = Self {
            graph,
            shapes: Vec::new(),
            index: HashMap::new(),
        };

        for root in root_shapes(graph) {
            loader.shape(root)?;
        }

        debug!(shapes = loader.shapes.len(), "loaded SHACL shapes");
        Ok(ShapesGraph { shapes: loader.shapes })
    }

    fn shape(&mut self, node: TermRef<'_>) -> Result<ShapeId, ShaclError> {
        if as_subject(node).is_none() {
            return Err(ShaclError::InvalidShape {
                shape: node.to_string(),
                reason: "shape reference must be an IRI or a blank node".to_string(),
            });
        }
        let key = node.into_owned();
        if let Some(id) = self.index.get(&key) {
            return Ok(*id);
        }

        // registered before its constraints so that shape references may cycle
        let path = match self.single(node, sh::PATH)? {
            Some(path) => Some(PropertyPath::parse(self.graph, path)?),
            None => None,
        };
        let id = ShapeId(self.shapes.len());
        self.shapes.push(Shape {
            id: key.clone(),
            path,
            targets: Vec::new(),
            constraints: Vec::new(),
            deactivated: false,
            severity: Severity::Violation,
            message: None,
        });
        self.index.insert(key, id);

        let targets = self.targets(node)?;
        let deactivated = match self.single(node, sh::DEACTIVATED)? {
            Some(value) => boolean(value).ok_or_else(|| self.invalid(node, "sh:deactivated must be a boolean"))?,
            None => false,
        };
        let severity = match self.single(node, sh::SEVERITY)? {
            Some(value) => Severity::from_term(value).ok_or_else(|| self.invalid(node, "unsupported sh:severity"))?,
            None => Severity::Violation,
        };
        let message = self.objects(node, sh::MESSAGE).into_iter().find_map(|m| match m {
            TermRef::Literal(literal) => Some(literal.value().to_string()),
            _ => None,
        });
        let constraints = self.constraints(node)?;

        let shape = &mut self.shapes[id.0];
        shape.targets = targets;
        shape.deactivated = deactivated;
        shape.severity = severity;
        shape.message = message;
        shape.constraints = constraints;
        Ok(id)
    }

    fn targets(&self, node: TermRef<'_>) -> Result<Vec<Target>, ShaclError> {
        let mut targets = Vec::new();
        for class in self.objects(node, sh::TARGET_CLASS) {
            targets.push(Target::Class(class.into_owned()));
        }
        for focus in self.objects(node, sh::TARGET_NODE) {
            targets.push(Target::Node(focus.into_owned()));
        }
        for predicate in self.objects(node, sh::TARGET_SUBJECTS_OF) {
            targets.push(Target::SubjectsOf(self.iri(node, predicate, "sh:targetSubjectsOf")?));
        }
        for predicate in self.objects(node, sh::TARGET_OBJECTS_OF) {
            targets.push(Target::ObjectsOf(self.iri(node, predicate, "sh:targetObjectsOf")?));
        }

        // implicit class target
        let is_class = [rdfs::CLASS, owl::CLASS].into_iter().any(|class| {
            self.objects(node, rdf::TYPE)
                .contains(&TermRef::from(class))
        });
        if is_class {
            targets.push(Target::Class(node.into_owned()));
        }
        Ok(targets)
    }

    fn constraints(&mut self, node: TermRef<'_>) -> Result<Vec<Constraint>, ShaclError> {
        let mut constraints = Vec::new();

        for class in self.objects(node, sh::CLASS) {
            constraints.push(Constraint::Class(class.into_owned()));
        }
        for datatype in self.objects(node, sh::DATATYPE) {
            constraints.push(Constraint::Datatype(self.iri(node, datatype, "sh:datatype")?));
        }
        for kind in self.objects(node, sh::NODE_KIND) {
            let kind = match kind {
                TermRef::NamedNode(iri) => NodeKind::from_iri(iri),
                _ => None,
            };
            constraints.push(Constraint::NodeKind(
                kind.ok_or_else(|| self.invalid(node, "unknown sh:nodeKind"))?,
            ));
        }
        if let Some(count) = self.integer(node, sh::MIN_COUNT)? {
            constraints.push(Constraint::MinCount(count));
        }
        if let Some(count) = self.integer(node, sh::MAX_COUNT)? {
            constraints.push(Constraint::MaxCount(count));
        }

        let bounds: [(NamedNodeRef<'static>, fn(Literal) -> Constraint); 4] = [
            (sh::MIN_EXCLUSIVE, Constraint::MinExclusive),
            (sh::MIN_INCLUSIVE, Constraint::MinInclusive),
            (sh::MAX_EXCLUSIVE, Constraint::MaxExclusive),
            (sh::MAX_INCLUSIVE, Constraint::MaxInclusive),
        ];
        for (parameter, constraint) in bounds {
            if let Some(bound) = self.single(node, parameter)? {
                match bound {
                    TermRef::Literal(literal) => constraints.push(constraint(literal.into_owned())),
                    _ => return Err(self.invalid(node, format!("{parameter} must be a literal"))),
                }
            }
        }

        if let Some(length) = self.integer(node, sh::MIN_LENGTH)? {
            constraints.push(Constraint::MinLength(length));
        }
        if let Some(length) = self.integer(node, sh::MAX_LENGTH)? {
            constraints.push(Constraint::MaxLength(length));
        }
        if let Some(pattern) = self.pattern(node)? {
            constraints.push(Constraint::Pattern(pattern));
        }
        if let Some(list) = self.single(node, sh::LANGUAGE_IN)? {
            let languages = read_list(self.graph, list)?
                .into_iter()
                .map(|language| match language {
                    Term::Literal(literal) => Ok(literal.value().to_string()),
                    _ => Err(self.invalid(node, "sh:languageIn members must be literals")),
                })
                .collect::<Result<_, _>>()?;
            constraints.push(Constraint::LanguageIn(languages));
        }
        if self.flag(node, sh::UNIQUE_LANG)? {
            constraints.push(Constraint::UniqueLang);
        }

        let pairs: [(NamedNodeRef<'static>, fn(NamedNode) -> Constraint); 4] = [
            (sh::EQUALS, Constraint::Equals),
            (sh::DISJOINT, Constraint::Disjoint),
            (sh::LESS_THAN, Constraint::LessThan),
            (sh::LESS_THAN_OR_EQUALS, Constraint::LessThanOrEquals),
        ];
        for (parameter, constraint) in pairs {
            for predicate in self.objects(node, parameter) {
                let predicate = self.iri(node, predicate, parameter.as_str())?;
                constraints.push(constraint(predicate));
            }
        }

        if let Some(list) = self.single(node, sh::IN)? {
            constraints.push(Constraint::In(read_list(self.graph, list)?));
        }
        for value in self.objects(node, sh::HAS_VALUE) {
            constraints.push(Constraint::HasValue(value.into_owned()));
        }

        for negated in self.objects(node, sh::NOT) {
            constraints.push(Constraint::Not(self.shape(negated)?));
        }
        let logical: [(NamedNodeRef<'static>, fn(Vec<ShapeId>) -> Constraint); 3] = [
            (sh::AND, Constraint::And),
            (sh::OR, Constraint::Or),
            (sh::XONE, Constraint::Xone),
        ];
        for (parameter, constraint) in logical {
            for list in self.objects(node, parameter) {
                let members = read_list(self.graph, list)?;
                let ids = members
                    .iter()
                    .map(|member| self.shape(member.as_ref()))
                    .collect::<Result<_, _>>()?;
                constraints.push(constraint(ids));
            }
        }
        for shape in self.objects(node, sh::NODE) {
            constraints.push(Constraint::Node(self.shape(shape)?));
        }

        let mut property_predicates = Vec::new();
        for property in self.objects(node, sh::PROPERTY) {
            let id = self.shape(property)?;
            match &self.shapes[id.0].path {
                Some(path) => property_predicates.extend(path.predicate().cloned()),
                None => return Err(self.invalid(property, "sh:property value has no sh:path")),
            }
            constraints.push(Constraint::Property(id));
        }

        if let Some(shape) = self.single(node, sh::QUALIFIED_VALUE_SHAPE)? {
            let shape = self.shape(shape)?;
            let min_count = self.integer(node, sh::QUALIFIED_MIN_COUNT)?;
            let max_count = self.integer(node, sh::QUALIFIED_MAX_COUNT)?;
            if min_count.is_none() && max_count.is_none() {
                return Err(self.invalid(
                    node,
                    "sh:qualifiedValueShape needs sh:qualifiedMinCount or sh:qualifiedMaxCount",
                ));
            }
            constraints.push(Constraint::QualifiedValueShape {
                shape,
                min_count,
                max_count,
            });
        }

        if self.flag(node, sh::CLOSED)? {
            let mut allowed = property_predicates;
            if let Some(list) = self.single(node, sh::IGNORED_PROPERTIES)? {
                for ignored in read_list(self.graph, list)? {
                    allowed.push(self.iri(node, ignored.as_ref(), "sh:ignoredProperties")?);
                }
            }
            constraints.push(Constraint::Closed { allowed });
        }

        Ok(constraints)
    }

    fn pattern(&self, node: TermRef<'_>) -> Result<Option<Pattern>, ShaclError> {
        let Some(source) = self.single(node, sh::PATTERN)? else {
            return Ok(None);
        };
        let TermRef::Literal(source) = source else {
            return Err(self.invalid(node, "sh:pattern must be a literal"));
        };
        let flags = match self.single(node, sh::FLAGS)? {
            Some(TermRef::Literal(flags)) => Some(flags.value().to_string()),
            Some(_) => return Err(self.invalid(node, "sh:flags must be a literal")),
            None => None,
        };

        let mut builder = RegexBuilder::new(source.value());
        for flag in flags.as_deref().unwrap_or_default().chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                's' => builder.dot_matches_new_line(true),
                'm' => builder.multi_line(true),
                'x' => builder.ignore_whitespace(true),
                other => return Err(self.invalid(node, format!("unsupported sh:flags character '{other}'"))),
            };
        }
        let regex = builder
            .build()
            .map_err(|e| self.invalid(node, format!("invalid sh:pattern: {e}")))?;

        Ok(Some(Pattern {
            regex,
            source: source.value().to_string(),
            flags,
        }))
    }

    fn objects(&self, node: TermRef<'_>, predicate: NamedNodeRef<'static>) -> Vec<TermRef<'g>> {
        match as_subject(node) {
            Some(subject) => {
                let mut objects: Vec<_> = self.graph.objects_for_subject_predicate(subject, predicate).collect();
                sort_terms(&mut objects);
                objects
            }
            None => Vec::new(),
        }
    }

    fn single(&self, node: TermRef<'_>, predicate: NamedNodeRef<'static>) -> Result<Option<TermRef<'g>>, ShaclError> {
        let mut values = self.objects(node, predicate);
        if values.len() > 1 {
            return Err(self.invalid(node, format!("{predicate} must have at most one value")));
        }
        Ok(values.pop())
    }

    fn integer(&self, node: TermRef<'_>, predicate: NamedNodeRef<'static>) -> Result<Option<u64>, ShaclError> {
        match self.single(node, predicate)? {
            Some(TermRef::Literal(literal)) => literal
                .value()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(node, format!("{predicate} must be a non-negative integer"))),
            Some(_) => Err(self.invalid(node, format!("{predicate} must be a non-negative integer"))),
            None => Ok(None),
        }
    }

    fn flag(&self, node: TermRef<'_>, predicate: NamedNodeRef<'static>) -> Result<bool, ShaclError> {
        match self.single(node, predicate)? {
            Some(value) => boolean(value).ok_or_else(|| self.invalid(node, format!("{predicate} must be a boolean"))),
            None => Ok(false),
        }
    }

    fn iri(&self, node: TermRef<'_>, value: TermRef<'_>, parameter: &str) -> Result<NamedNode, ShaclError> {
        match value {
            TermRef::NamedNode(iri) => Ok(iri.into_owned()),
            _ => Err(self.invalid(node, format!("{parameter} must be an IRI"))),
        }
    }

    fn invalid(&self, node: TermRef<'_>, reason: impl Into<String>) -> ShaclError {
        ShaclError::InvalidShape {
            shape: node.to_string(),
            reason: reason.into(),
        }
    }
}

/// Nodes that are shapes on their own: declared, targeted or carrying a path
fn root_shapes(graph: &Graph) -> Vec<TermRef<'_>> {
    let mut seen = HashSet::new();
    let mut roots = Vec::new();

    for triple in graph.iter() {
        let declares_shape = triple.predicate == rdf::TYPE
            && (triple.object == TermRef::from(sh::NODE_SHAPE) || triple.object == TermRef::from(sh::PROPERTY_SHAPE));
        let targets_or_path = [
            sh::TARGET_CLASS,
            sh::TARGET_NODE,
            sh::TARGET_SUBJECTS_OF,
            sh::TARGET_OBJECTS_OF,
            sh::PATH,
        ]
        .contains(&triple.predicate);

        if (declares_shape || targets_or_path) && seen.insert(triple.subject) {
            roots.push(triple.subject.into());
        }
    }
    sort_terms(&mut roots);
    roots
}

fn boolean(term: TermRef<'_>) -> Option<bool> {
    match term {
        TermRef::Literal(literal) => match literal.value() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hello_sparql_core::GraphLoader;

    const PREFIXES: &str = "@prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        @prefix ex: <http://example.org/> .\n";

    fn load(body: &str) -> Result<ShapesGraph, ShaclError> {
        let graph = GraphLoader::with_blank_node_prefix("s")
            .load(&format!("{PREFIXES}{body}"))
            .unwrap();
        ShapesLoader::load(&graph)
    }

    fn ex(local: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.org/{local}")).into()
    }

    fn find<'s>(shapes: &'s ShapesGraph, local: &str) -> &'s Shape {
        let id = ex(local);
        shapes.shapes().iter().find(|shape| shape.id == id).unwrap()
    }

    #[test]
    fn test_node_shape_with_property() {
        let shapes = load(
            "ex:PersonShape a sh:NodeShape ;
                sh:targetClass ex:Person ;
                sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:datatype xsd:string ] .",
        )
        .unwrap();

        let person = find(&shapes, "PersonShape");
        assert_eq!(person.targets, vec![Target::Class(ex("Person"))]);
        assert!(person.path.is_none());
        let [Constraint::Property(property)] = person.constraints.as_slice() else {
            panic!("expected one property constraint, got {:?}", person.constraints);
        };
        let property = shapes.get(*property);
        assert_eq!(property.path.as_ref().and_then(|p| p.predicate()).map(|p| p.as_str()), Some("http://example.org/name"));
        assert!(matches!(property.constraints[..], [Constraint::Datatype(_), Constraint::MinCount(1)]));
    }

    #[test]
    fn test_non_integer_count_is_rejected() {
        let err = load("ex:S sh:targetNode ex:a ; sh:path ex:p ; sh:minCount \"many\" .").unwrap_err();
        assert!(err.to_string().contains("non-negative integer"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = load("ex:S sh:targetNode ex:a ; sh:path ex:p ; sh:pattern \"(unclosed\" .").unwrap_err();
        assert!(err.to_string().contains("invalid sh:pattern"));
    }

    #[test]
    fn test_mutually_referencing_shapes_load() {
        let shapes = load(
            "ex:A a sh:NodeShape ; sh:node ex:B .
             ex:B a sh:NodeShape ; sh:node ex:A ; sh:severity sh:Warning .",
        )
        .unwrap();

        assert_eq!(shapes.len(), 2);
        let (a, b) = (find(&shapes, "A"), find(&shapes, "B"));
        let [Constraint::Node(to_b)] = a.constraints.as_slice() else {
            panic!("expected sh:node constraint, got {:?}", a.constraints);
        };
        let [Constraint::Node(to_a)] = b.constraints.as_slice() else {
            panic!("expected sh:node constraint, got {:?}", b.constraints);
        };
        assert_eq!(shapes.get(*to_b).id, b.id);
        assert_eq!(shapes.get(*to_a).id, a.id);
        assert_eq!(b.severity, Severity::Warning);
    }

    #[test]
    fn test_self_referencing_property_shape_keeps_path() {
        let shapes = load(
            "ex:PersonShape a sh:NodeShape ; sh:targetClass ex:Person ;
                sh:property ex:KnowsShape .
             ex:KnowsShape sh:path ex:knows ; sh:node ex:PersonShape ; sh:property ex:KnowsShape .",
        )
        .unwrap();
        let knows = find(&shapes, "KnowsShape");
        assert!(knows.path.is_some());
        assert_eq!(knows.constraints.len(), 2);
    }

    #[test]
    fn test_property_without_path_is_rejected() {
        let err = load("ex:S a sh:NodeShape ; sh:property [ sh:minCount 1 ] .").unwrap_err();
        assert!(err.to_string().contains("no sh:path"));
    }

    #[test]
    fn test_closed_allows_property_predicates() {
        let shapes = load(
            "ex:S a sh:NodeShape ; sh:targetNode ex:a ; sh:closed true ;
                sh:ignoredProperties ( ex:ignored ) ;
                sh:property [ sh:path ex:name ] .",
        )
        .unwrap();

        let shape = find(&shapes, "S");
        let allowed = shape
            .constraints
            .iter()
            .find_map(|c| match c {
                Constraint::Closed { allowed } => Some(allowed.clone()),
                _ => None,
            })
            .unwrap();
        let allowed: Vec<&str> = allowed.iter().map(|p| p.as_str()).collect();
        assert_eq!(allowed, vec!["http://example.org/name", "http://example.org/ignored"]);
    }

    #[test]
    fn test_implicit_class_target() {
        let shapes = load(
            "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
             ex:Person a rdfs:Class, sh:NodeShape ; sh:closed false .",
        )
        .unwrap();
        let shape = find(&shapes, "Person");
        assert_eq!(shape.targets, vec![Target::Class(ex("Person"))]);
    }
}
