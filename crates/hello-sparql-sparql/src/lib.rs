//! SPARQL クエリパイプライン
//!
//! このクレートはクエリの処理段階を提供します:
//! - 構文解析とクエリ形式の制限 (Compiler)
//! - インメモリストアでの実行 (Executor)
//! - ネゴシエートされた形式での結果出力 (Results)

pub mod compiler;
pub mod executor;
pub mod results;

// Re-exports
pub use compiler::{compile, CompiledQuery, QueryForm};
pub use executor::{execute, QueryResult};
pub use results::{serialize, SerializedResult};

use hello_sparql_core::SerializationFormat;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparqlError {
    #[error("Invalid SPARQL query: {0}")]
    InvalidQuery(String),

    #[error("{0} queries are not supported; only SELECT and ASK are allowed")]
    UnsupportedQueryForm(&'static str),

    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("Cannot serialize query results as {format}: {message}")]
    Serialization {
        format: SerializationFormat,
        message: String,
    },
}
