//! SHACL 検証レポート

use crate::path::PropertyPath;
use crate::ShaclError;
use hello_sparql_core::vocab::{rdf, sh};
use hello_sparql_core::{write_triples, GraphSyntax, SerializationFormat};
use oxigraph::model::{BlankNode, Literal, NamedNode, NamedNodeRef, Term, TermRef, Triple};
use oxigraph::sparql::Variable;
use serde::Serialize;
use sparesults::{QueryResultsFormat, QueryResultsSerializer};

/// Violation Level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Violation,
}

impl Severity {
    pub fn from_term(term: TermRef<'_>) -> Option<Self> {
        match term {
            TermRef::NamedNode(iri) if iri == sh::INFO => Some(Severity::Info),
            TermRef::NamedNode(iri) if iri == sh::WARNING => Some(Severity::Warning),
            TermRef::NamedNode(iri) if iri == sh::VIOLATION => Some(Severity::Violation),
            _ => None,
        }
    }

    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Severity::Info => sh::INFO,
            Severity::Warning => sh::WARNING,
            Severity::Violation => sh::VIOLATION,
        }
    }
}

/// Validation Result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub result_path: Option<PropertyPath>,
    pub value: Option<Term>,
    pub source_constraint_component: NamedNode,
    pub source_shape: Term,
    pub severity: Severity,
    pub message: String,
}

/// Validation Report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub conforms: bool,
    pub results: Vec<ValidationResult>,
}

const CSV_COLUMNS: [&str; 7] = [
    "focusNode",
    "resultPath",
    "value",
    "sourceConstraintComponent",
    "sourceShape",
    "resultSeverity",
    "resultMessage",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    conforms: bool,
    results: Vec<JsonResult<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonResult<'a> {
    focus_node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    source_constraint_component: &'a str,
    source_shape: String,
    severity: Severity,
    message: &'a str,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>) -> Self {
        Self {
            conforms: results.is_empty(),
            results,
        }
    }

    /// 指定フォーマットでシリアライズ
    pub fn serialize(&self, format: SerializationFormat) -> Result<String, ShaclError> {
        let failed = |message: String| ShaclError::Serialization { format, message };
        match format {
            SerializationFormat::Turtle => {
                write_triples(&self.to_triples(), GraphSyntax::Turtle).map_err(|e| failed(e.to_string()))
            }
            SerializationFormat::Xml => {
                write_triples(&self.to_triples(), GraphSyntax::RdfXml).map_err(|e| failed(e.to_string()))
            }
            SerializationFormat::Json => self.to_json().map_err(|e| failed(e.to_string())),
            SerializationFormat::Csv => self.to_csv().map_err(|e| failed(e.to_string())),
            SerializationFormat::Text => Ok(self.to_simple_string()),
        }
    }

    /// レポートグラフのトリプル (決定的な順序)
    pub fn to_triples(&self) -> Vec<Triple> {
        let mut next = 0usize;
        let mut fresh = move || {
            let node = BlankNode::new_unchecked(format!("r{next}"));
            next += 1;
            node
        };

        let mut triples = Vec::new();
        let report = fresh();
        triples.push(Triple::new(report.clone(), rdf::TYPE, sh::VALIDATION_REPORT.into_owned()));
        triples.push(Triple::new(report.clone(), sh::CONFORMS, Literal::from(self.conforms)));

        for result in &self.results {
            let node = fresh();
            triples.push(Triple::new(report.clone(), sh::RESULT, node.clone()));
            triples.push(Triple::new(node.clone(), rdf::TYPE, sh::VALIDATION_RESULT.into_owned()));
            triples.push(Triple::new(node.clone(), sh::FOCUS_NODE, result.focus_node.clone()));

            let mut path_triples = Vec::new();
            if let Some(path) = &result.result_path {
                let path_node = path.to_rdf(&mut path_triples, &mut fresh);
                triples.push(Triple::new(node.clone(), sh::RESULT_PATH, path_node));
            }
            if let Some(value) = &result.value {
                triples.push(Triple::new(node.clone(), sh::VALUE, value.clone()));
            }
            triples.push(Triple::new(
                node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                result.source_constraint_component.clone(),
            ));
            triples.push(Triple::new(node.clone(), sh::SOURCE_SHAPE, result.source_shape.clone()));
            triples.push(Triple::new(node.clone(), sh::RESULT_SEVERITY, result.severity.iri().into_owned()));
            triples.push(Triple::new(
                node,
                sh::RESULT_MESSAGE,
                Literal::new_simple_literal(&result.message),
            ));
            triples.extend(path_triples);
        }

        triples
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            conforms: self.conforms,
            results: self
                .results
                .iter()
                .map(|result| JsonResult {
                    focus_node: result.focus_node.to_string(),
                    result_path: result.result_path.as_ref().map(ToString::to_string),
                    value: result.value.as_ref().map(ToString::to_string),
                    source_constraint_component: result.source_constraint_component.as_str(),
                    source_shape: result.source_shape.to_string(),
                    severity: result.severity,
                    message: &result.message,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }

    /// One CSV row per result, in SPARQL CSV results syntax
    fn to_csv(&self) -> std::io::Result<String> {
        let variables: Vec<Variable> = CSV_COLUMNS.iter().map(|name| Variable::new_unchecked(*name)).collect();
        let mut writer = QueryResultsSerializer::from_format(QueryResultsFormat::Csv)
            .serialize_solutions_to_writer(Vec::new(), variables.clone())?;

        for result in &self.results {
            let path = result.result_path.as_ref().map(|path| match path.predicate() {
                Some(predicate) => Term::from(predicate.clone()),
                None => Literal::new_simple_literal(path.to_string()).into(),
            });
            let cells: [Option<Term>; 7] = [
                Some(result.focus_node.clone()),
                path,
                result.value.clone(),
                Some(result.source_constraint_component.clone().into()),
                Some(result.source_shape.clone()),
                Some(result.severity.iri().into_owned().into()),
                Some(Literal::new_simple_literal(&result.message).into()),
            ];
            writer.serialize(
                variables
                    .iter()
                    .zip(&cells)
                    .filter_map(|(variable, cell)| cell.as_ref().map(|cell| (variable, cell))),
            )?;
        }

        let bytes = writer.finish()?;
        String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// 人間可読形式で出力
    pub fn to_simple_string(&self) -> String {
        let mut output = format!(
            "Validation Report: {} ({} results)\n",
            if self.conforms { "CONFORMS" } else { "DOES NOT CONFORM" },
            self.results.len()
        );

        for (i, result) in self.results.iter().enumerate() {
            output.push_str(&format!("{:?} {}: {}\n", result.severity, i + 1, result.message));
            output.push_str(&format!("  Focus Node: {}\n", result.focus_node));
            if let Some(path) = &result.result_path {
                output.push_str(&format!("  Path: {path}\n"));
            }
            if let Some(value) = &result.value {
                output.push_str(&format!("  Value: {value}\n"));
            }
            output.push_str(&format!("  Constraint: {}\n", result.source_constraint_component));
            output.push_str(&format!("  Shape: {}\n", result.source_shape));
        }

        output
    }

    /// 違反の数を取得
    pub fn violation_count(&self) -> usize {
        self.count(Severity::Violation)
    }

    /// 警告の数を取得
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// 情報メッセージの数を取得
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }
}
