//! SHACL 制約検証

use crate::loader::{Constraint, Shape, ShapeId, ShapesGraph, Target};
use crate::path::PropertyPath;
use crate::report::{ValidationReport, ValidationResult};
use hello_sparql_core::term::{as_subject, sort_terms};
use hello_sparql_core::vocab::{rdf, rdfs, sh, xsd};
use itertools::Itertools;
use oxigraph::model::{Graph, Literal, NamedNode, NamedNodeRef, Term, TermRef};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// SHACL Core validator over one data graph
pub struct ShaclValidator<'a> {
    data: &'a Graph,
    shapes: &'a ShapesGraph,
    /// (shape, focus) pairs on the current validation stack
    in_progress: RefCell<HashSet<(Term, Term)>>,
}

impl<'a> ShaclValidator<'a> {
    pub fn new(data: &'a Graph, shapes: &'a ShapesGraph) -> Self {
        Self {
            data,
            shapes,
            in_progress: RefCell::default(),
        }
    }

    /// すべてのターゲットを検証してレポートを作成
    pub fn validate(&self) -> ValidationReport {
        let mut results = Vec::new();

        for shape in self.shapes.shapes() {
            if shape.deactivated || shape.targets.is_empty() {
                continue;
            }
            let focus_nodes = self.focus_nodes(&shape.targets);
            debug!(shape = %shape.id, focus_nodes = focus_nodes.len(), "validating shape");
            for focus in &focus_nodes {
                results.extend(self.validate_shape(shape, focus));
            }
        }

        let report = ValidationReport::new(results);
        debug!(conforms = report.conforms, results = report.results.len(), "SHACL validation finished");
        report
    }

    fn focus_nodes(&self, targets: &[Target]) -> Vec<Term> {
        let mut nodes: Vec<Term> = targets
            .iter()
            .flat_map(|target| match target {
                Target::Class(class) => self.instances_of(class),
                Target::Node(node) => vec![node.clone()],
                Target::SubjectsOf(predicate) => self
                    .data
                    .triples_for_predicate(predicate)
                    .map(|t| Term::from(t.subject.into_owned()))
                    .collect(),
                Target::ObjectsOf(predicate) => self
                    .data
                    .triples_for_predicate(predicate)
                    .map(|t| t.object.into_owned())
                    .collect(),
            })
            .unique()
            .collect();
        sort_terms(&mut nodes);
        nodes
    }

    /// Instances of `class` or of any `rdfs:subClassOf*` subclass
    fn instances_of(&self, class: &Term) -> Vec<Term> {
        let mut classes = vec![class.clone()];
        let mut seen: HashSet<Term> = HashSet::from([class.clone()]);
        let mut queue = VecDeque::from([class.clone()]);
        while let Some(current) = queue.pop_front() {
            for sub in self.data.subjects_for_predicate_object(rdfs::SUB_CLASS_OF, &current) {
                let sub = Term::from(sub.into_owned());
                if seen.insert(sub.clone()) {
                    classes.push(sub.clone());
                    queue.push_back(sub);
                }
            }
        }

        classes
            .iter()
            .flat_map(|class| {
                self.data
                    .subjects_for_predicate_object(rdf::TYPE, class)
                    .map(|s| Term::from(s.into_owned()))
                    .collect::<Vec<_>>()
            })
            .unique()
            .collect()
    }

    fn is_instance(&self, node: &Term, class: &Term) -> bool {
        let Some(subject) = as_subject(node.as_ref()) else {
            return false;
        };
        let mut seen = HashSet::new();
        let mut queue: VecDeque<Term> = self
            .data
            .objects_for_subject_predicate(subject, rdf::TYPE)
            .map(TermRef::into_owned)
            .collect();
        while let Some(current) = queue.pop_front() {
            if &current == class {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(current) = as_subject(current.as_ref()) {
                queue.extend(
                    self.data
                        .objects_for_subject_predicate(current, rdfs::SUB_CLASS_OF)
                        .map(TermRef::into_owned),
                );
            }
        }
        false
    }

    fn conforms(&self, shape: ShapeId, node: &Term) -> bool {
        self.validate_shape(self.shapes.get(shape), node).is_empty()
    }

    /// 一つのフォーカスノードを一つのシェイプで検証
    ///
    /// 再帰的なシェイプで同じ (シェイプ, フォーカスノード) に戻った場合は適合とみなす
    fn validate_shape(&self, shape: &Shape, focus: &Term) -> Vec<ValidationResult> {
        if shape.deactivated {
            return Vec::new();
        }
        let key = (shape.id.clone(), focus.clone());
        if !self.in_progress.borrow_mut().insert(key.clone()) {
            return Vec::new();
        }
        let results = self.check_all(shape, focus);
        self.in_progress.borrow_mut().remove(&key);
        results
    }

    fn check_all(&self, shape: &Shape, focus: &Term) -> Vec<ValidationResult> {
        let values = match &shape.path {
            Some(path) => {
                let mut values = path.values(self.data, focus);
                sort_terms(&mut values);
                values
            }
            None => vec![focus.clone()],
        };

        let mut results = Vec::new();
        for constraint in &shape.constraints {
            let mut report = Reporter {
                shape,
                focus,
                results: &mut results,
            };
            self.check(constraint, focus, &values, &mut report);
        }
        results
    }

    fn check(&self, constraint: &Constraint, focus: &Term, values: &[Term], report: &mut Reporter<'_>) {
        match constraint {
            Constraint::Class(class) => {
                for value in values.iter().filter(|v| !self.is_instance(v, class)) {
                    report.value(sh::CLASS_CONSTRAINT_COMPONENT, value, format!("Value is not an instance of {class}"));
                }
            }
            Constraint::Datatype(datatype) => {
                for value in values.iter().filter(|v| !has_datatype(v, datatype)) {
                    report.value(sh::DATATYPE_CONSTRAINT_COMPONENT, value, format!("Value does not have datatype {datatype}"));
                }
            }
            Constraint::NodeKind(kind) => {
                for value in values.iter().filter(|v| !kind.matches(v)) {
                    report.value(sh::NODE_KIND_CONSTRAINT_COMPONENT, value, format!("Value is not of node kind {}", kind.iri()));
                }
            }
            Constraint::MinCount(min) => {
                if (values.len() as u64) < *min {
                    report.node(sh::MIN_COUNT_CONSTRAINT_COMPONENT, format!("Less than {min} values"));
                }
            }
            Constraint::MaxCount(max) => {
                if values.len() as u64 > *max {
                    report.node(sh::MAX_COUNT_CONSTRAINT_COMPONENT, format!("More than {max} values"));
                }
            }
            Constraint::MinExclusive(bound) => {
                self.range(report, values, bound, sh::MIN_EXCLUSIVE_CONSTRAINT_COMPONENT, ">", |o| o == Ordering::Greater)
            }
            Constraint::MinInclusive(bound) => {
                self.range(report, values, bound, sh::MIN_INCLUSIVE_CONSTRAINT_COMPONENT, ">=", |o| o != Ordering::Less)
            }
            Constraint::MaxExclusive(bound) => {
                self.range(report, values, bound, sh::MAX_EXCLUSIVE_CONSTRAINT_COMPONENT, "<", |o| o == Ordering::Less)
            }
            Constraint::MaxInclusive(bound) => {
                self.range(report, values, bound, sh::MAX_INCLUSIVE_CONSTRAINT_COMPONENT, "<=", |o| o != Ordering::Greater)
            }
            Constraint::MinLength(min) => {
                for value in values {
                    if !string_value(value).is_some_and(|s| s.chars().count() as u64 >= *min) {
                        report.value(sh::MIN_LENGTH_CONSTRAINT_COMPONENT, value, format!("Value has less than {min} characters"));
                    }
                }
            }
            Constraint::MaxLength(max) => {
                for value in values {
                    if !string_value(value).is_some_and(|s| s.chars().count() as u64 <= *max) {
                        report.value(sh::MAX_LENGTH_CONSTRAINT_COMPONENT, value, format!("Value has more than {max} characters"));
                    }
                }
            }
            Constraint::Pattern(pattern) => {
                for value in values {
                    if !string_value(value).is_some_and(|s| pattern.regex.is_match(s)) {
                        report.value(
                            sh::PATTERN_CONSTRAINT_COMPONENT,
                            value,
                            format!("Value does not match pattern \"{}\"", pattern.source),
                        );
                    }
                }
            }
            Constraint::LanguageIn(languages) => {
                for value in values {
                    let allowed = match value {
                        Term::Literal(literal) => literal
                            .language()
                            .is_some_and(|tag| languages.iter().any(|range| language_matches(tag, range))),
                        _ => false,
                    };
                    if !allowed {
                        report.value(
                            sh::LANGUAGE_IN_CONSTRAINT_COMPONENT,
                            value,
                            format!("Language tag not in [{}]", languages.join(", ")),
                        );
                    }
                }
            }
            Constraint::UniqueLang => {
                let mut counts: HashMap<String, usize> = HashMap::new();
                let tags: Vec<String> = values
                    .iter()
                    .filter_map(|value| match value {
                        Term::Literal(literal) => literal.language().map(str::to_ascii_lowercase),
                        _ => None,
                    })
                    .collect();
                for tag in &tags {
                    *counts.entry(tag.clone()).or_default() += 1;
                }
                for tag in tags.into_iter().unique().filter(|tag| counts[tag] > 1) {
                    report.node(sh::UNIQUE_LANG_CONSTRAINT_COMPONENT, format!("Language \"{tag}\" is used by more than one value"));
                }
            }
            Constraint::Equals(predicate) => {
                let others = self.objects(focus, predicate);
                for value in values.iter().filter(|v| !others.contains(v)) {
                    report.value(sh::EQUALS_CONSTRAINT_COMPONENT, value, format!("Value is not a value of {predicate}"));
                }
                for other in others.iter().filter(|o| !values.contains(o)) {
                    report.value(sh::EQUALS_CONSTRAINT_COMPONENT, other, format!("Value of {predicate} is missing from the path"));
                }
            }
            Constraint::Disjoint(predicate) => {
                let others = self.objects(focus, predicate);
                for value in values.iter().filter(|v| others.contains(v)) {
                    report.value(sh::DISJOINT_CONSTRAINT_COMPONENT, value, format!("Value is also a value of {predicate}"));
                }
            }
            Constraint::LessThan(predicate) => {
                self.compare_with(report, focus, values, predicate, sh::LESS_THAN_CONSTRAINT_COMPONENT, "<", |o| {
                    o == Ordering::Less
                })
            }
            Constraint::LessThanOrEquals(predicate) => self.compare_with(
                report,
                focus,
                values,
                predicate,
                sh::LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT,
                "<=",
                |o| o != Ordering::Greater,
            ),
            Constraint::In(members) => {
                for value in values.iter().filter(|v| !members.contains(v)) {
                    report.value(
                        sh::IN_CONSTRAINT_COMPONENT,
                        value,
                        format!("Value is not in [{}]", members.iter().join(", ")),
                    );
                }
            }
            Constraint::HasValue(expected) => {
                if !values.contains(expected) {
                    report.node(sh::HAS_VALUE_CONSTRAINT_COMPONENT, format!("Missing expected value {expected}"));
                }
            }
            Constraint::Closed { allowed } => {
                for value in values {
                    let Some(subject) = as_subject(value.as_ref()) else { continue };
                    let mut extra: Vec<(NamedNode, Term)> = self
                        .data
                        .triples_for_subject(subject)
                        .filter(|t| !allowed.iter().any(|p| p.as_ref() == t.predicate))
                        .map(|t| (t.predicate.into_owned(), t.object.into_owned()))
                        .collect();
                    extra.sort_by_cached_key(|(p, o)| (p.to_string(), o.to_string()));
                    for (predicate, object) in extra {
                        report.closed(
                            predicate.clone(),
                            object,
                            format!("Predicate {predicate} is not allowed (closed shape)"),
                        );
                    }
                }
            }
            Constraint::Not(shape) => {
                for value in values.iter().filter(|v| self.conforms(*shape, v)) {
                    report.value(
                        sh::NOT_CONSTRAINT_COMPONENT,
                        value,
                        format!("Value conforms to negated shape {}", self.shapes.get(*shape).id),
                    );
                }
            }
            Constraint::And(shapes) => {
                for value in values.iter().filter(|v| !shapes.iter().all(|s| self.conforms(*s, v))) {
                    report.value(sh::AND_CONSTRAINT_COMPONENT, value, "Value does not conform to all shapes".to_string());
                }
            }
            Constraint::Or(shapes) => {
                for value in values.iter().filter(|v| !shapes.iter().any(|s| self.conforms(*s, v))) {
                    report.value(sh::OR_CONSTRAINT_COMPONENT, value, "Value does not conform to any shape".to_string());
                }
            }
            Constraint::Xone(shapes) => {
                for value in values {
                    let conforming = shapes.iter().filter(|s| self.conforms(**s, value)).count();
                    if conforming != 1 {
                        report.value(
                            sh::XONE_CONSTRAINT_COMPONENT,
                            value,
                            format!("Value conforms to {conforming} shapes instead of exactly one"),
                        );
                    }
                }
            }
            Constraint::Node(shape) => {
                for value in values.iter().filter(|v| !self.conforms(*shape, v)) {
                    report.value(
                        sh::NODE_CONSTRAINT_COMPONENT,
                        value,
                        format!("Value does not conform to shape {}", self.shapes.get(*shape).id),
                    );
                }
            }
            Constraint::Property(shape) => {
                let property = self.shapes.get(*shape);
                for value in values {
                    report.results.extend(self.validate_shape(property, value));
                }
            }
            Constraint::QualifiedValueShape {
                shape,
                min_count,
                max_count,
            } => {
                let conforming = values.iter().filter(|v| self.conforms(*shape, v)).count() as u64;
                let id = &self.shapes.get(*shape).id;
                if let Some(min) = min_count.filter(|min| conforming < *min) {
                    report.node(
                        sh::QUALIFIED_MIN_COUNT_CONSTRAINT_COMPONENT,
                        format!("Less than {min} values conform to {id}"),
                    );
                }
                if let Some(max) = max_count.filter(|max| conforming > *max) {
                    report.node(
                        sh::QUALIFIED_MAX_COUNT_CONSTRAINT_COMPONENT,
                        format!("More than {max} values conform to {id}"),
                    );
                }
            }
        }
    }

    fn range(
        &self,
        report: &mut Reporter<'_>,
        values: &[Term],
        bound: &Literal,
        component: NamedNodeRef<'static>,
        operator: &str,
        accept: fn(Ordering) -> bool,
    ) {
        for value in values {
            let ordered = match value {
                Term::Literal(literal) => compare_literals(literal, bound),
                _ => None,
            };
            if !ordered.is_some_and(accept) {
                report.value(component, value, format!("Value is not {operator} {bound}"));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn compare_with(
        &self,
        report: &mut Reporter<'_>,
        focus: &Term,
        values: &[Term],
        predicate: &NamedNode,
        component: NamedNodeRef<'static>,
        operator: &str,
        accept: fn(Ordering) -> bool,
    ) {
        let others = self.objects(focus, predicate);
        for value in values {
            for other in &others {
                let ordered = match (value, other) {
                    (Term::Literal(a), Term::Literal(b)) => compare_literals(a, b),
                    _ => None,
                };
                if !ordered.is_some_and(accept) {
                    report.value(component, value, format!("Value is not {operator} {other}"));
                }
            }
        }
    }

    fn objects(&self, focus: &Term, predicate: &NamedNode) -> Vec<Term> {
        let mut objects: Vec<Term> = match as_subject(focus.as_ref()) {
            Some(subject) => self
                .data
                .objects_for_subject_predicate(subject, predicate)
                .map(TermRef::into_owned)
                .collect(),
            None => Vec::new(),
        };
        sort_terms(&mut objects);
        objects
    }
}

/// Collects results for one shape and focus node
struct Reporter<'r> {
    shape: &'r Shape,
    focus: &'r Term,
    results: &'r mut Vec<ValidationResult>,
}

impl Reporter<'_> {
    fn push(&mut self, component: NamedNodeRef<'_>, path: Option<PropertyPath>, value: Option<Term>, message: String) {
        self.results.push(ValidationResult {
            focus_node: self.focus.clone(),
            result_path: path,
            value,
            source_constraint_component: component.into_owned(),
            source_shape: self.shape.id.clone(),
            severity: self.shape.severity,
            message: self.shape.message.clone().unwrap_or(message),
        });
    }

    fn value(&mut self, component: NamedNodeRef<'_>, value: &Term, message: String) {
        self.push(component, self.shape.path.clone(), Some(value.clone()), message);
    }

    fn node(&mut self, component: NamedNodeRef<'_>, message: String) {
        self.push(component, self.shape.path.clone(), None, message);
    }

    fn closed(&mut self, predicate: NamedNode, object: Term, message: String) {
        self.push(
            sh::CLOSED_CONSTRAINT_COMPONENT,
            Some(PropertyPath::Predicate(predicate)),
            Some(object),
            message,
        );
    }
}

fn string_value(term: &Term) -> Option<&str> {
    match term {
        Term::NamedNode(iri) => Some(iri.as_str()),
        Term::Literal(literal) => Some(literal.value()),
        _ => None,
    }
}

/// BCP 47 basic filtering, as `langMatches`
fn language_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    match tag.get(..range.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(range) => {
            tag.len() == range.len() || tag.as_bytes()[range.len()] == b'-'
        }
        _ => false,
    }
}

const INTEGER_TYPES: [NamedNodeRef<'static>; 7] = [
    xsd::INTEGER,
    xsd::INT,
    xsd::LONG,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
];

fn has_datatype(term: &Term, datatype: &NamedNode) -> bool {
    match term {
        Term::Literal(literal) => literal.datatype() == datatype.as_ref() && well_formed(literal),
        _ => false,
    }
}

/// Lexical form check for the common XSD datatypes
fn well_formed(literal: &Literal) -> bool {
    let datatype = literal.datatype();
    let value = literal.value();
    if INTEGER_TYPES.iter().any(|t| *t == datatype) {
        value.parse::<i128>().is_ok()
    } else if datatype == xsd::DECIMAL {
        !value.contains(['e', 'E']) && value.parse::<f64>().is_ok_and(f64::is_finite)
    } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
        matches!(value, "INF" | "+INF" | "-INF" | "NaN") || value.parse::<f64>().is_ok()
    } else if datatype == xsd::BOOLEAN {
        matches!(value, "true" | "false" | "1" | "0")
    } else {
        true
    }
}

fn numeric(literal: &Literal) -> Option<f64> {
    let datatype = literal.datatype();
    let numeric_type = INTEGER_TYPES.iter().any(|t| *t == datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::DOUBLE
        || datatype == xsd::FLOAT;
    if !numeric_type || !well_formed(literal) {
        return None;
    }
    match literal.value() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        value => value.parse().ok(),
    }
}

/// Order two literals; numbers compare by value, other literals only
/// against the same datatype
pub fn compare_literals(a: &Literal, b: &Literal) -> Option<Ordering> {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        (None, None)
            if a.datatype() == b.datatype() && a.language().is_none() && b.language().is_none() =>
        {
            Some(a.value().cmp(b.value()))
        }
        _ => None,
    }
}
