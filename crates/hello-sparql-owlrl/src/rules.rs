//! OWL 2 RL 規則テーブル
//!
//! 各規則は固定されたグラフを読み、新しいトリプルを [`Derivation`] に出力します。
//! 規則名は OWL 2 Profiles の規則表に従います。

use crate::ReasonerError;
use hello_sparql_core::term::as_subject;
use hello_sparql_core::vocab::{owl, rdf, rdfs};
use hello_sparql_core::read_list;
use oxigraph::model::{Graph, NamedNodeRef, SubjectRef, Term, TermRef, Triple, TripleRef};
use std::collections::HashSet;

/// 推論規則
pub struct Rule {
    pub name: &'static str,
    apply: fn(&mut Derivation<'_>) -> Result<(), ReasonerError>,
}

impl Rule {
    pub fn apply(&self, derivation: &mut Derivation<'_>) -> Result<(), ReasonerError> {
        (self.apply)(derivation)
    }
}

/// 矛盾検出規則
pub struct Check {
    pub name: &'static str,
    detect: fn(&Graph) -> Option<String>,
}

impl Check {
    /// Description of the first violation found, if any
    pub fn detect(&self, graph: &Graph) -> Option<String> {
        (self.detect)(graph)
    }
}

/// 一回の推論ラウンドで導出されたトリプル
pub struct Derivation<'g> {
    graph: &'g Graph,
    derived: Vec<Triple>,
    seen: HashSet<Triple>,
    literal_subjects: usize,
}

impl<'g> Derivation<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            derived: Vec::new(),
            seen: HashSet::new(),
            literal_subjects: 0,
        }
    }

    /// Conclusions skipped because their subject would be a literal
    pub fn literal_subjects(&self) -> usize {
        self.literal_subjects
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.derived
    }

    fn emit(&mut self, subject: TermRef<'_>, predicate: NamedNodeRef<'_>, object: TermRef<'_>) {
        let Some(subject) = as_subject(subject) else {
            self.literal_subjects += 1;
            return;
        };
        let triple = TripleRef::new(subject, predicate, object);
        if self.graph.contains(triple) {
            return;
        }
        let triple = triple.into_owned();
        if self.seen.insert(triple.clone()) {
            self.derived.push(triple);
        }
    }
}

/// 全ての導出規則 (適用順)
pub const RULES: &[Rule] = &[
    Rule { name: "scm-sco", apply: scm_sco },
    Rule { name: "scm-spo", apply: scm_spo },
    Rule { name: "scm-eqc", apply: scm_eqc },
    Rule { name: "scm-eqp", apply: scm_eqp },
    Rule { name: "scm-dom", apply: scm_dom },
    Rule { name: "scm-rng", apply: scm_rng },
    Rule { name: "cax-sco", apply: cax_sco },
    Rule { name: "cax-eqc", apply: cax_eqc },
    Rule { name: "prp-dom", apply: prp_dom },
    Rule { name: "prp-rng", apply: prp_rng },
    Rule { name: "prp-spo1", apply: prp_spo1 },
    Rule { name: "prp-spo2", apply: prp_spo2 },
    Rule { name: "prp-eqp", apply: prp_eqp },
    Rule { name: "prp-inv", apply: prp_inv },
    Rule { name: "prp-symp", apply: prp_symp },
    Rule { name: "prp-trp", apply: prp_trp },
    Rule { name: "prp-fp", apply: prp_fp },
    Rule { name: "prp-ifp", apply: prp_ifp },
    Rule { name: "prp-key", apply: prp_key },
    Rule { name: "cls-hv", apply: cls_hv },
    Rule { name: "cls-svf", apply: cls_svf },
    Rule { name: "cls-avf", apply: cls_avf },
    Rule { name: "cls-int1", apply: cls_int1 },
    Rule { name: "cls-int2", apply: cls_int2 },
    Rule { name: "cls-uni", apply: cls_uni },
    Rule { name: "cls-maxc2", apply: cls_maxc2 },
    Rule { name: "cls-maxqc3", apply: cls_maxqc3 },
    Rule { name: "cls-oo", apply: cls_oo },
    Rule { name: "eq-sym", apply: eq_sym },
    Rule { name: "eq-trans", apply: eq_trans },
    Rule { name: "eq-rep-s", apply: eq_rep_s },
    Rule { name: "eq-rep-o", apply: eq_rep_o },
];

/// 全ての矛盾検出規則
pub const CHECKS: &[Check] = &[
    Check { name: "cax-dw", detect: cax_dw },
    Check { name: "cls-nothing2", detect: cls_nothing2 },
    Check { name: "eq-diff1", detect: eq_diff1 },
    Check { name: "prp-irp", detect: prp_irp },
    Check { name: "prp-asyp", detect: prp_asyp },
    Check { name: "prp-pdw", detect: prp_pdw },
    Check { name: "prp-adp", detect: prp_adp },
    Check { name: "prp-npa1", detect: prp_npa1 },
    Check { name: "prp-npa2", detect: prp_npa2 },
    Check { name: "cax-adc", detect: cax_adc },
    Check { name: "cls-com", detect: cls_com },
    Check { name: "cls-maxc1", detect: cls_maxc1 },
    Check { name: "cls-maxqc1", detect: cls_maxqc1 },
    Check { name: "eq-diff2", detect: eq_diff2 },
    Check { name: "eq-diff3", detect: eq_diff3 },
];

// graph access

fn uses<'a>(graph: &'a Graph, predicate: NamedNodeRef<'a>) -> Vec<(TermRef<'a>, TermRef<'a>)> {
    graph
        .triples_for_predicate(predicate)
        .map(|t| (TermRef::from(t.subject), t.object))
        .collect()
}

fn objects<'a>(graph: &'a Graph, subject: TermRef<'a>, predicate: NamedNodeRef<'a>) -> Vec<TermRef<'a>> {
    match as_subject(subject) {
        Some(subject) => graph.objects_for_subject_predicate(subject, predicate).collect(),
        None => Vec::new(),
    }
}

fn subjects<'a>(graph: &'a Graph, predicate: NamedNodeRef<'a>, object: TermRef<'a>) -> Vec<TermRef<'a>> {
    graph
        .subjects_for_predicate_object(predicate, object)
        .map(TermRef::from)
        .collect()
}

fn has(graph: &Graph, subject: TermRef<'_>, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> bool {
    as_subject(subject).is_some_and(|s| graph.contains(TripleRef::new(s, predicate, object)))
}

fn as_property(term: TermRef<'_>) -> Option<NamedNodeRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(node),
        _ => None,
    }
}

/// Properties declared `rdf:type class`
fn typed<'a>(graph: &'a Graph, class: NamedNodeRef<'a>) -> Vec<NamedNodeRef<'a>> {
    graph
        .subjects_for_predicate_object(rdf::TYPE, class)
        .filter_map(|s| match s {
            SubjectRef::NamedNode(node) => Some(node),
            _ => None,
        })
        .collect()
}

fn on_properties<'a>(graph: &'a Graph, restriction: TermRef<'a>) -> Vec<NamedNodeRef<'a>> {
    objects(graph, restriction, owl::ON_PROPERTY)
        .into_iter()
        .filter_map(as_property)
        .collect()
}

fn members(graph: &Graph, head: TermRef<'_>, rule: &'static str) -> Result<Vec<Term>, ReasonerError> {
    read_list(graph, head).map_err(|source| ReasonerError::MalformedList { rule, source })
}

/// Collection members of every `owner predicate list` where `owner` is typed `class`
fn collections(graph: &Graph, class: NamedNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Vec<Term>> {
    subjects(graph, rdf::TYPE, class.into())
        .into_iter()
        .flat_map(|owner| objects(graph, owner, predicate))
        .filter_map(|list| read_list(graph, list).ok())
        .collect()
}

/// Every unordered pair of distinct positions
fn pairs<'a, T>(items: &'a [T]) -> impl Iterator<Item = (&'a T, &'a T)> + 'a {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| items[i + 1..].iter().map(move |b| (a, b)))
}

fn cardinality(term: TermRef<'_>) -> Option<u64> {
    match term {
        TermRef::Literal(literal) => literal.value().trim().parse().ok(),
        _ => None,
    }
}

fn transitive(d: &mut Derivation<'_>, predicate: NamedNodeRef<'_>) {
    let g = d.graph;
    for (x, y) in uses(g, predicate) {
        for z in objects(g, y, predicate) {
            d.emit(x, predicate, z);
        }
    }
}

// schema rules

fn scm_sco(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    transitive(d, rdfs::SUB_CLASS_OF);
    Ok(())
}

fn scm_spo(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    transitive(d, rdfs::SUB_PROPERTY_OF);
    Ok(())
}

/// scm-eqc1/2 and scm-eqp1/2 share one shape
fn equivalence(d: &mut Derivation<'_>, sub: NamedNodeRef<'_>, equivalent: NamedNodeRef<'_>) {
    let g = d.graph;
    for (a, b) in uses(g, equivalent) {
        d.emit(a, sub, b);
        d.emit(b, sub, a);
    }
    for (a, b) in uses(g, sub) {
        if a != b && has(g, b, sub, a) {
            d.emit(a, equivalent, b);
        }
    }
}

fn scm_eqc(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    equivalence(d, rdfs::SUB_CLASS_OF, owl::EQUIVALENT_CLASS);
    Ok(())
}

fn scm_eqp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    equivalence(d, rdfs::SUB_PROPERTY_OF, owl::EQUIVALENT_PROPERTY);
    Ok(())
}

/// scm-dom1/2 and scm-rng1/2: widen to superclasses, narrow to subproperties
fn widen_axis(d: &mut Derivation<'_>, axis: NamedNodeRef<'_>) {
    let g = d.graph;
    for (p, c) in uses(g, axis) {
        for super_class in objects(g, c, rdfs::SUB_CLASS_OF) {
            d.emit(p, axis, super_class);
        }
        for sub_property in subjects(g, rdfs::SUB_PROPERTY_OF, p) {
            d.emit(sub_property, axis, c);
        }
    }
}

fn scm_dom(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    widen_axis(d, rdfs::DOMAIN);
    Ok(())
}

fn scm_rng(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    widen_axis(d, rdfs::RANGE);
    Ok(())
}

// class axioms

fn cax_sco(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c1, c2) in uses(g, rdfs::SUB_CLASS_OF) {
        for x in subjects(g, rdf::TYPE, c1) {
            d.emit(x, rdf::TYPE, c2);
        }
    }
    Ok(())
}

fn cax_eqc(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c1, c2) in uses(g, owl::EQUIVALENT_CLASS) {
        for x in subjects(g, rdf::TYPE, c1) {
            d.emit(x, rdf::TYPE, c2);
        }
        for x in subjects(g, rdf::TYPE, c2) {
            d.emit(x, rdf::TYPE, c1);
        }
    }
    Ok(())
}

// property rules

fn prp_dom(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p, c) in uses(g, rdfs::DOMAIN) {
        let Some(p) = as_property(p) else { continue };
        for (x, _) in uses(g, p) {
            d.emit(x, rdf::TYPE, c);
        }
    }
    Ok(())
}

fn prp_rng(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p, c) in uses(g, rdfs::RANGE) {
        let Some(p) = as_property(p) else { continue };
        for (_, y) in uses(g, p) {
            d.emit(y, rdf::TYPE, c);
        }
    }
    Ok(())
}

fn prp_spo1(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p1, p2) in uses(g, rdfs::SUB_PROPERTY_OF) {
        let (Some(p1), Some(p2)) = (as_property(p1), as_property(p2)) else { continue };
        for (x, y) in uses(g, p1) {
            d.emit(x, p2, y);
        }
    }
    Ok(())
}

fn named(terms: &[Term]) -> Option<Vec<NamedNodeRef<'_>>> {
    terms.iter().map(|t| as_property(t.as_ref())).collect()
}

/// Follows `p1 ... pn` from every subject of `p1`
fn prp_spo2(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p, list) in uses(g, owl::PROPERTY_CHAIN_AXIOM) {
        let chain = members(g, list, "prp-spo2")?;
        let Some(p) = as_property(p) else { continue };
        let Some(steps) = named(&chain) else { continue };
        let Some((first, rest)) = steps.split_first() else { continue };

        let mut paths = uses(g, *first);
        for step in rest {
            paths = paths
                .into_iter()
                .flat_map(|(x, y)| objects(g, y, *step).into_iter().map(move |z| (x, z)))
                .collect();
        }
        for (x, z) in paths {
            d.emit(x, p, z);
        }
    }
    Ok(())
}

fn prp_eqp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p1, p2) in uses(g, owl::EQUIVALENT_PROPERTY) {
        let (Some(p1), Some(p2)) = (as_property(p1), as_property(p2)) else { continue };
        for (x, y) in uses(g, p1) {
            d.emit(x, p2, y);
        }
        for (x, y) in uses(g, p2) {
            d.emit(x, p1, y);
        }
    }
    Ok(())
}

fn prp_inv(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (p1, p2) in uses(g, owl::INVERSE_OF) {
        let (Some(p1), Some(p2)) = (as_property(p1), as_property(p2)) else { continue };
        for (x, y) in uses(g, p1) {
            d.emit(y, p2, x);
        }
        for (x, y) in uses(g, p2) {
            d.emit(y, p1, x);
        }
    }
    Ok(())
}

fn prp_symp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for p in typed(g, owl::SYMMETRIC_PROPERTY) {
        for (x, y) in uses(g, p) {
            d.emit(y, p, x);
        }
    }
    Ok(())
}

fn prp_trp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for p in typed(g, owl::TRANSITIVE_PROPERTY) {
        transitive(d, p);
    }
    Ok(())
}

fn prp_fp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for p in typed(g, owl::FUNCTIONAL_PROPERTY) {
        for (x, y1) in uses(g, p) {
            for y2 in objects(g, x, p) {
                if y1 != y2 {
                    d.emit(y1, owl::SAME_AS, y2);
                }
            }
        }
    }
    Ok(())
}

fn prp_ifp(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for p in typed(g, owl::INVERSE_FUNCTIONAL_PROPERTY) {
        for (x1, y) in uses(g, p) {
            for x2 in subjects(g, p, y) {
                if x1 != x2 {
                    d.emit(x1, owl::SAME_AS, x2);
                }
            }
        }
    }
    Ok(())
}

fn prp_key(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c, list) in uses(g, owl::HAS_KEY) {
        let keys = members(g, list, "prp-key")?;
        let Some(keys) = named(&keys).filter(|keys| !keys.is_empty()) else { continue };
        let instances = subjects(g, rdf::TYPE, c);
        for x in &instances {
            for y in &instances {
                let same_key = keys
                    .iter()
                    .all(|p| objects(g, *x, *p).into_iter().any(|z| has(g, *y, *p, z)));
                if x != y && same_key {
                    d.emit(*x, owl::SAME_AS, *y);
                }
            }
        }
    }
    Ok(())
}

// class expressions

/// cls-hv1 and cls-hv2
fn cls_hv(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (x, y) in uses(g, owl::HAS_VALUE) {
        for p in on_properties(g, x) {
            for u in subjects(g, rdf::TYPE, x) {
                d.emit(u, p, y);
            }
            for u in subjects(g, p, y) {
                d.emit(u, rdf::TYPE, x);
            }
        }
    }
    Ok(())
}

/// cls-svf1, plus cls-svf2 when the filler is owl:Thing
fn cls_svf(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    let thing = TermRef::from(owl::THING);
    for (x, y) in uses(g, owl::SOME_VALUES_FROM) {
        for p in on_properties(g, x) {
            for (u, v) in uses(g, p) {
                if y == thing || has(g, v, rdf::TYPE, y) {
                    d.emit(u, rdf::TYPE, x);
                }
            }
        }
    }
    Ok(())
}

fn cls_avf(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (x, y) in uses(g, owl::ALL_VALUES_FROM) {
        for p in on_properties(g, x) {
            for u in subjects(g, rdf::TYPE, x) {
                for v in objects(g, u, p) {
                    d.emit(v, rdf::TYPE, y);
                }
            }
        }
    }
    Ok(())
}

fn cls_int1(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c, list) in uses(g, owl::INTERSECTION_OF) {
        let classes = members(g, list, "cls-int1")?;
        let Some((first, rest)) = classes.split_first() else { continue };
        for y in subjects(g, rdf::TYPE, first.as_ref()) {
            if rest.iter().all(|ci| has(g, y, rdf::TYPE, ci.as_ref())) {
                d.emit(y, rdf::TYPE, c);
            }
        }
    }
    Ok(())
}

fn cls_int2(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c, list) in uses(g, owl::INTERSECTION_OF) {
        let classes = members(g, list, "cls-int2")?;
        for y in subjects(g, rdf::TYPE, c) {
            for ci in &classes {
                d.emit(y, rdf::TYPE, ci.as_ref());
            }
        }
    }
    Ok(())
}

fn cls_uni(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c, list) in uses(g, owl::UNION_OF) {
        for ci in members(g, list, "cls-uni")? {
            for y in subjects(g, rdf::TYPE, ci.as_ref()) {
                d.emit(y, rdf::TYPE, c);
            }
        }
    }
    Ok(())
}

/// Values of `p` on members of `x` are all the same individual
fn merge_values(d: &mut Derivation<'_>, x: TermRef<'_>, p: NamedNodeRef<'_>, class: Option<TermRef<'_>>) {
    let g = d.graph;
    for u in subjects(g, rdf::TYPE, x) {
        let values: Vec<_> = objects(g, u, p)
            .into_iter()
            .filter(|y| class.map_or(true, |c| has(g, *y, rdf::TYPE, c)))
            .collect();
        for (y1, y2) in pairs(&values) {
            d.emit(*y1, owl::SAME_AS, *y2);
            d.emit(*y2, owl::SAME_AS, *y1);
        }
    }
}

fn cls_maxc2(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (x, n) in uses(g, owl::MAX_CARDINALITY) {
        if cardinality(n) != Some(1) {
            continue;
        }
        for p in on_properties(g, x) {
            merge_values(d, x, p, None);
        }
    }
    Ok(())
}

/// cls-maxqc3, plus cls-maxqc4 when the class is owl:Thing
fn cls_maxqc3(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    let thing = TermRef::from(owl::THING);
    for (x, n) in uses(g, owl::MAX_QUALIFIED_CARDINALITY) {
        if cardinality(n) != Some(1) {
            continue;
        }
        for c in objects(g, x, owl::ON_CLASS) {
            let class = (c != thing).then_some(c);
            for p in on_properties(g, x) {
                merge_values(d, x, p, class);
            }
        }
    }
    Ok(())
}

fn cls_oo(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (c, list) in uses(g, owl::ONE_OF) {
        for y in members(g, list, "cls-oo")? {
            d.emit(y.as_ref(), rdf::TYPE, c);
        }
    }
    Ok(())
}

// equality

fn eq_sym(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (x, y) in uses(g, owl::SAME_AS) {
        d.emit(y, owl::SAME_AS, x);
    }
    Ok(())
}

fn eq_trans(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    transitive(d, owl::SAME_AS);
    Ok(())
}

fn eq_rep_s(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (s, s2) in uses(g, owl::SAME_AS) {
        let Some(subject) = as_subject(s).filter(|_| s != s2) else { continue };
        for t in g.triples_for_subject(subject) {
            d.emit(s2, t.predicate, t.object);
        }
    }
    Ok(())
}

fn eq_rep_o(d: &mut Derivation<'_>) -> Result<(), ReasonerError> {
    let g = d.graph;
    for (o, o2) in uses(g, owl::SAME_AS) {
        if o == o2 {
            continue;
        }
        for t in g.triples_for_object(o) {
            d.emit(t.subject.into(), t.predicate, o2);
        }
    }
    Ok(())
}

// inconsistency checks

fn cax_dw(g: &Graph) -> Option<String> {
    for (c1, c2) in uses(g, owl::DISJOINT_WITH) {
        if let Some(x) = subjects(g, rdf::TYPE, c1)
            .into_iter()
            .find(|x| has(g, *x, rdf::TYPE, c2))
        {
            return Some(format!("{x} is an instance of disjoint classes {c1} and {c2}"));
        }
    }
    None
}

fn cls_nothing2(g: &Graph) -> Option<String> {
    subjects(g, rdf::TYPE, owl::NOTHING.into())
        .first()
        .map(|x| format!("{x} is an instance of {}", owl::NOTHING))
}

fn eq_diff1(g: &Graph) -> Option<String> {
    uses(g, owl::DIFFERENT_FROM)
        .into_iter()
        .find(|(x, y)| x == y || has(g, *x, owl::SAME_AS, *y))
        .map(|(x, y)| format!("{x} is both the same as and different from {y}"))
}

fn prp_irp(g: &Graph) -> Option<String> {
    for p in typed(g, owl::IRREFLEXIVE_PROPERTY) {
        if let Some((x, _)) = uses(g, p).into_iter().find(|(x, y)| x == y) {
            return Some(format!("{x} is related to itself by irreflexive property {p}"));
        }
    }
    None
}

fn prp_asyp(g: &Graph) -> Option<String> {
    for p in typed(g, owl::ASYMMETRIC_PROPERTY) {
        if let Some((x, y)) = uses(g, p).into_iter().find(|(x, y)| has(g, *y, p, *x)) {
            return Some(format!("{x} and {y} are related both ways by asymmetric property {p}"));
        }
    }
    None
}

fn prp_pdw(g: &Graph) -> Option<String> {
    uses(g, owl::PROPERTY_DISJOINT_WITH)
        .into_iter()
        .filter_map(|(p1, p2)| Some((as_property(p1)?, as_property(p2)?)))
        .find_map(|(p1, p2)| shared_pair(g, p1, p2))
}

fn prp_adp(g: &Graph) -> Option<String> {
    for properties in collections(g, owl::ALL_DISJOINT_PROPERTIES, owl::MEMBERS) {
        for (p1, p2) in pairs(&properties) {
            let (Some(p1), Some(p2)) = (as_property(p1.as_ref()), as_property(p2.as_ref())) else { continue };
            if let Some(detail) = shared_pair(g, p1, p2) {
                return Some(detail);
            }
        }
    }
    None
}

fn shared_pair(g: &Graph, p1: NamedNodeRef<'_>, p2: NamedNodeRef<'_>) -> Option<String> {
    uses(g, p1)
        .into_iter()
        .find(|(x, y)| has(g, *x, p2, *y))
        .map(|(x, y)| format!("{x} and {y} are related by disjoint properties {p1} and {p2}"))
}

/// prp-npa1 and prp-npa2 differ only in the target predicate
fn negative_assertion(g: &Graph, target: NamedNodeRef<'_>) -> Option<String> {
    for x in subjects(g, rdf::TYPE, owl::NEGATIVE_PROPERTY_ASSERTION.into()) {
        for source in objects(g, x, owl::SOURCE_INDIVIDUAL) {
            for p in objects(g, x, owl::ASSERTION_PROPERTY).into_iter().filter_map(as_property) {
                if let Some(value) = objects(g, x, target).into_iter().find(|v| has(g, source, p, *v)) {
                    return Some(format!("{source} {p} {value} is asserted and negated by {x}"));
                }
            }
        }
    }
    None
}

fn prp_npa1(g: &Graph) -> Option<String> {
    negative_assertion(g, owl::TARGET_INDIVIDUAL)
}

fn prp_npa2(g: &Graph) -> Option<String> {
    negative_assertion(g, owl::TARGET_VALUE)
}

fn cax_adc(g: &Graph) -> Option<String> {
    for classes in collections(g, owl::ALL_DISJOINT_CLASSES, owl::MEMBERS) {
        for (c1, c2) in pairs(&classes) {
            if let Some(x) = subjects(g, rdf::TYPE, c1.as_ref())
                .into_iter()
                .find(|x| has(g, *x, rdf::TYPE, c2.as_ref()))
            {
                return Some(format!("{x} is an instance of disjoint classes {c1} and {c2}"));
            }
        }
    }
    None
}

fn cls_com(g: &Graph) -> Option<String> {
    for (c1, c2) in uses(g, owl::COMPLEMENT_OF) {
        if let Some(x) = subjects(g, rdf::TYPE, c1)
            .into_iter()
            .find(|x| has(g, *x, rdf::TYPE, c2))
        {
            return Some(format!("{x} is an instance of {c1} and of its complement {c2}"));
        }
    }
    None
}

/// First member of `x` with a `p` value, restricted to `class` when qualified
fn exceeds_zero(g: &Graph, x: TermRef<'_>, p: NamedNodeRef<'_>, class: Option<TermRef<'_>>) -> Option<String> {
    subjects(g, rdf::TYPE, x).into_iter().find_map(|u| {
        objects(g, u, p)
            .into_iter()
            .find(|y| class.map_or(true, |c| has(g, *y, rdf::TYPE, c)))
            .map(|y| format!("{u} {p} {y} exceeds the zero cardinality of {x}"))
    })
}

fn cls_maxc1(g: &Graph) -> Option<String> {
    for (x, n) in uses(g, owl::MAX_CARDINALITY) {
        if cardinality(n) != Some(0) {
            continue;
        }
        if let Some(detail) = on_properties(g, x).into_iter().find_map(|p| exceeds_zero(g, x, p, None)) {
            return Some(detail);
        }
    }
    None
}

/// cls-maxqc1, plus cls-maxqc2 when the class is owl:Thing
fn cls_maxqc1(g: &Graph) -> Option<String> {
    let thing = TermRef::from(owl::THING);
    for (x, n) in uses(g, owl::MAX_QUALIFIED_CARDINALITY) {
        if cardinality(n) != Some(0) {
            continue;
        }
        for c in objects(g, x, owl::ON_CLASS) {
            let class = (c != thing).then_some(c);
            if let Some(detail) = on_properties(g, x).into_iter().find_map(|p| exceeds_zero(g, x, p, class)) {
                return Some(detail);
            }
        }
    }
    None
}

fn all_different(g: &Graph, predicate: NamedNodeRef<'_>) -> Option<String> {
    for individuals in collections(g, owl::ALL_DIFFERENT, predicate) {
        let same = pairs(&individuals).find(|&(y1, y2)| {
            has(g, y1.as_ref(), owl::SAME_AS, y2.as_ref()) || has(g, y2.as_ref(), owl::SAME_AS, y1.as_ref())
        });
        if let Some((y1, y2)) = same {
            return Some(format!("{y1} and {y2} are declared all different but are the same"));
        }
    }
    None
}

fn eq_diff2(g: &Graph) -> Option<String> {
    all_different(g, owl::MEMBERS)
}

fn eq_diff3(g: &Graph) -> Option<String> {
    all_different(g, owl::DISTINCT_MEMBERS)
}
