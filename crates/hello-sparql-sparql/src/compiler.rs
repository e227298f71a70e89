//! クエリのコンパイルと形式制限
//!
//! ストアの反復順序は実行ごとに変わるため、`ORDER BY` のない `LIMIT` /
//! `OFFSET` はそのままでは毎回違う行を返します。コンパイル時に次の書き換えを
//! 行い、同じ入力から常に同じ結果が得られるようにします:
//! - 最上位のスライスは外して [`Window`] として保持し、実行後の正規順に適用
//! - サブクエリ内のスライスは射影変数による `ORDER BY` の上に置き直す

use crate::SparqlError;
use spargebra::algebra::{Expression, GraphPattern, OrderExpression};
use spargebra::Query;
use std::fmt;
use tracing::debug;

/// Query forms the service executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryForm {
    Select,
    Ask,
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryForm::Select => f.write_str("SELECT"),
            QueryForm::Ask => f.write_str("ASK"),
        }
    }
}

/// `OFFSET` / `LIMIT` applied by the executor after canonical row sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub length: Option<usize>,
}

impl Window {
    pub fn apply<T>(self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.start)
            .take(self.length.unwrap_or(usize::MAX))
            .collect()
    }
}

/// A parsed query whose form passed the allow-list
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    form: QueryForm,
    algebra: Query,
    ordered: bool,
    window: Option<Window>,
}

impl CompiledQuery {
    pub fn form(&self) -> QueryForm {
        self.form
    }

    /// Rewritten algebra handed to the store
    pub fn algebra(&self) -> &Query {
        &self.algebra
    }

    /// Whether the query fixes its row order with `ORDER BY`
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Top-level slice lifted out of an unordered query
    pub fn window(&self) -> Option<Window> {
        self.window
    }
}

/// クエリを解析し、SELECT と ASK 以外を拒否
pub fn compile(text: &str) -> Result<CompiledQuery, SparqlError> {
    let query = Query::parse(text, None).map_err(|e| SparqlError::InvalidQuery(e.to_string()))?;

    let compiled = match query {
        Query::Select {
            dataset,
            pattern,
            base_iri,
        } => {
            let ordered = has_order_by(&pattern);
            let (pattern, window) = match pattern {
                GraphPattern::Slice { inner, start, length } if !ordered => {
                    (*inner, Some(Window { start, length }))
                }
                pattern => (pattern, None),
            };
            CompiledQuery {
                form: QueryForm::Select,
                algebra: Query::Select {
                    dataset,
                    pattern: order_subqueries(pattern),
                    base_iri,
                },
                ordered,
                window,
            }
        }
        Query::Ask {
            dataset,
            pattern,
            base_iri,
        } => CompiledQuery {
            form: QueryForm::Ask,
            algebra: Query::Ask {
                dataset,
                pattern: order_subqueries(pattern),
                base_iri,
            },
            ordered: true,
            window: None,
        },
        Query::Construct { .. } => return Err(SparqlError::UnsupportedQueryForm("CONSTRUCT")),
        Query::Describe { .. } => return Err(SparqlError::UnsupportedQueryForm("DESCRIBE")),
    };

    debug!(
        form = %compiled.form,
        ordered = compiled.ordered,
        window = ?compiled.window,
        "compiled SPARQL query"
    );
    Ok(compiled)
}

/// `ORDER BY` sits below the solution modifiers applied after it
fn has_order_by(pattern: &GraphPattern) -> bool {
    match pattern {
        GraphPattern::OrderBy { .. } => true,
        GraphPattern::Project { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. } => has_order_by(inner),
        _ => false,
    }
}

/// サブクエリのスライスに正規順を与える
fn order_subqueries(pattern: GraphPattern) -> GraphPattern {
    let rewrite = |inner: Box<GraphPattern>| Box::new(order_subqueries(*inner));
    match pattern {
        GraphPattern::Slice { inner, start, length } => {
            let inner = if has_order_by(&inner) {
                order_subqueries(*inner)
            } else {
                with_projection_order(order_subqueries(*inner))
            };
            GraphPattern::Slice {
                inner: Box::new(inner),
                start,
                length,
            }
        }
        GraphPattern::Join { left, right } => GraphPattern::Join {
            left: rewrite(left),
            right: rewrite(right),
        },
        GraphPattern::LeftJoin { left, right, expression } => GraphPattern::LeftJoin {
            left: rewrite(left),
            right: rewrite(right),
            expression,
        },
        GraphPattern::Union { left, right } => GraphPattern::Union {
            left: rewrite(left),
            right: rewrite(right),
        },
        GraphPattern::Minus { left, right } => GraphPattern::Minus {
            left: rewrite(left),
            right: rewrite(right),
        },
        GraphPattern::Filter { expr, inner } => GraphPattern::Filter {
            expr,
            inner: rewrite(inner),
        },
        GraphPattern::Graph { name, inner } => GraphPattern::Graph {
            name,
            inner: rewrite(inner),
        },
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => GraphPattern::Extend {
            inner: rewrite(inner),
            variable,
            expression,
        },
        GraphPattern::OrderBy { inner, expression } => GraphPattern::OrderBy {
            inner: rewrite(inner),
            expression,
        },
        GraphPattern::Project { inner, variables } => GraphPattern::Project {
            inner: rewrite(inner),
            variables,
        },
        GraphPattern::Distinct { inner } => GraphPattern::Distinct { inner: rewrite(inner) },
        GraphPattern::Reduced { inner } => GraphPattern::Reduced { inner: rewrite(inner) },
        GraphPattern::Group {
            inner,
            variables,
            aggregates,
        } => GraphPattern::Group {
            inner: rewrite(inner),
            variables,
            aggregates,
        },
        other => other,
    }
}

/// Sort a projection by its own variables, ascending
fn with_projection_order(pattern: GraphPattern) -> GraphPattern {
    match pattern {
        GraphPattern::Project { inner, variables } => {
            let expression = variables
                .iter()
                .cloned()
                .map(|v| OrderExpression::Asc(Expression::Variable(v)))
                .collect();
            GraphPattern::Project {
                inner: Box::new(GraphPattern::OrderBy { inner, expression }),
                variables,
            }
        }
        GraphPattern::Distinct { inner } => GraphPattern::Distinct {
            inner: Box::new(with_projection_order(*inner)),
        },
        GraphPattern::Reduced { inner } => GraphPattern::Reduced {
            inner: Box::new(with_projection_order(*inner)),
        },
        other => other,
    }
}
