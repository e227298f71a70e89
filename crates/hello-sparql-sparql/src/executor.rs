//! インメモリストアでのクエリ実行

use crate::compiler::CompiledQuery;
use crate::SparqlError;
use oxigraph::model::{Graph, GraphName, Term};
use oxigraph::sparql::{Query, QueryResults, Variable};
use oxigraph::store::Store;
use tracing::debug;

/// Query Result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Rows are aligned with `variables`; `None` marks an unbound cell
    Solutions {
        variables: Vec<Variable>,
        rows: Vec<Vec<Option<Term>>>,
    },
    Boolean(bool),
}

impl QueryResult {
    /// Number of rows, or 1 for a boolean
    pub fn count(&self) -> usize {
        match self {
            QueryResult::Solutions { rows, .. } => rows.len(),
            QueryResult::Boolean(_) => 1,
        }
    }
}

/// グラフを一時ストアに読み込みクエリを実行
pub fn execute(graph: &Graph, query: &CompiledQuery) -> Result<QueryResult, SparqlError> {
    let failed = |e: &dyn std::fmt::Display| SparqlError::Execution(e.to_string());

    let store = Store::new().map_err(|e| failed(&e))?;
    store
        .extend(graph.iter().map(|t| t.into_owned().in_graph(GraphName::DefaultGraph)))
        .map_err(|e| failed(&e))?;

    let result = match store
        .query(Query::from(query.algebra().clone()))
        .map_err(|e| failed(&e))?
    {
        QueryResults::Solutions(solutions) => {
            let variables = solutions.variables().to_vec();
            let mut rows: Vec<Vec<Option<Term>>> = Vec::new();
            for solution in solutions {
                let solution = solution.map_err(|e| failed(&e))?;
                rows.push(variables.iter().map(|v| solution.get(v).cloned()).collect());
            }
            if !query.is_ordered() {
                // store iteration order is not stable between runs
                rows.sort_by_cached_key(|row| row_key(row));
            }
            if let Some(window) = query.window() {
                rows = window.apply(rows);
            }
            QueryResult::Solutions { variables, rows }
        }
        QueryResults::Boolean(value) => QueryResult::Boolean(value),
        QueryResults::Graph(_) => {
            return Err(SparqlError::Execution("query produced a graph result".to_string()));
        }
    };

    debug!(form = %query.form(), count = result.count(), "executed SPARQL query");
    Ok(result)
}

fn row_key(row: &[Option<Term>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default())
        .collect()
}
