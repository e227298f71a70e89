//! 結果のシリアライズ

use crate::executor::QueryResult;
use crate::SparqlError;
use hello_sparql_core::SerializationFormat;
use itertools::Itertools;
use oxigraph::model::Term;
use oxigraph::sparql::Variable;
use sparesults::{QueryResultsFormat, QueryResultsSerializer};
use std::io;

/// Serialized body plus the row count reported alongside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedResult {
    pub body: String,
    pub count: usize,
}

/// 結果をネゴシエートされた形式で出力
///
/// ASK の結果は形式に関係なく `true` / `false` のテキストになる。
pub fn serialize(result: &QueryResult, format: SerializationFormat) -> Result<SerializedResult, SparqlError> {
    let count = result.count();
    let body = match result {
        QueryResult::Boolean(value) => value.to_string(),
        QueryResult::Solutions { variables, rows } => {
            let failed = |message: String| SparqlError::Serialization { format, message };
            match format {
                SerializationFormat::Text => text_table(variables, rows),
                SerializationFormat::Json => {
                    results_document(QueryResultsFormat::Json, variables, rows).map_err(|e| failed(e.to_string()))?
                }
                SerializationFormat::Xml => {
                    results_document(QueryResultsFormat::Xml, variables, rows).map_err(|e| failed(e.to_string()))?
                }
                SerializationFormat::Csv => {
                    results_document(QueryResultsFormat::Csv, variables, rows).map_err(|e| failed(e.to_string()))?
                }
                SerializationFormat::Turtle => {
                    return Err(failed("SELECT results are a table, not an RDF graph".to_string()));
                }
            }
        }
    };
    Ok(SerializedResult { body, count })
}

fn results_document(format: QueryResultsFormat, variables: &[Variable], rows: &[Vec<Option<Term>>]) -> io::Result<String> {
    let mut writer =
        QueryResultsSerializer::from_format(format).serialize_solutions_to_writer(Vec::new(), variables.to_vec())?;
    for row in rows {
        writer.serialize(
            variables
                .iter()
                .zip(row)
                .filter_map(|(variable, value)| value.as_ref().map(|value| (variable, value))),
        )?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Aligned plain-text table with N-Triples cells
fn text_table(variables: &[Variable], rows: &[Vec<Option<Term>>]) -> String {
    let header: Vec<String> = variables.iter().map(ToString::to_string).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut output = line(&header);
    output.push('\n');
    output.push_str(&widths.iter().map(|width| "-".repeat(*width)).join("-+-"));
    output.push('\n');
    for row in &cells {
        output.push_str(&line(row));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{Literal, NamedNode};

    fn solutions() -> QueryResult {
        QueryResult::Solutions {
            variables: vec![Variable::new_unchecked("s"), Variable::new_unchecked("label")],
            rows: vec![
                vec![
                    Some(NamedNode::new_unchecked("http://example.org/a").into()),
                    Some(Literal::new_simple_literal("A").into()),
                ],
                vec![Some(NamedNode::new_unchecked("http://example.org/b").into()), None],
            ],
        }
    }

    #[test]
    fn test_text_table_layout() {
        let out = serialize(&solutions(), SerializationFormat::Text).unwrap();
        assert_eq!(out.count, 2);
        assert_eq!(
            out.body,
            "?s                     | ?label\n\
             -----------------------+-------\n\
             <http://example.org/a> | \"A\"\n\
             <http://example.org/b>\n"
        );
    }

    #[test]
    fn test_json_results() {
        let out = serialize(&solutions(), SerializationFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out.body).unwrap();
        assert_eq!(json["head"]["vars"], serde_json::json!(["s", "label"]));
        assert_eq!(json["results"]["bindings"][0]["label"]["value"], "A");
        assert!(json["results"]["bindings"][1].get("label").is_none());
    }

    #[test]
    fn test_csv_and_xml_results() {
        let csv = serialize(&solutions(), SerializationFormat::Csv).unwrap().body;
        assert_eq!(csv.lines().next(), Some("s,label"));
        assert_eq!(csv.lines().count(), 3);

        let xml = serialize(&solutions(), SerializationFormat::Xml).unwrap().body;
        assert!(xml.contains("<variable name=\"label\"/>"));
    }

    #[test]
    fn test_turtle_is_rejected_for_select() {
        let err = serialize(&solutions(), SerializationFormat::Turtle).unwrap_err();
        assert!(matches!(err, SparqlError::Serialization { format: SerializationFormat::Turtle, .. }));
    }

    #[test]
    fn test_ask_body_ignores_format() {
        for format in SerializationFormat::ALL {
            let out = serialize(&QueryResult::Boolean(true), format).unwrap();
            assert_eq!(out.body, "true");
            assert_eq!(out.count, 1);
        }
    }
}
