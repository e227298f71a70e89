//! SHACL Core 検証エンジン
//!
//! このクレートは W3C SHACL Core の検証を提供します:
//! - ShapesGraph 読み込み (Loader)
//! - プロパティパスの評価 (Path)
//! - 制約検証 (Validator)
//! - 検証レポートとシリアライズ (Report)

pub mod loader;
pub mod path;
pub mod report;
pub mod validator;

// Re-exports
pub use loader::{Constraint, Shape, ShapeId, ShapesGraph, ShapesLoader, Target};
pub use path::PropertyPath;
pub use report::{Severity, ValidationReport, ValidationResult};
pub use validator::ShaclValidator;

use hello_sparql_core::{ListError, SerializationFormat};
use oxigraph::model::Graph;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaclError {
    #[error("invalid shape {shape}: {reason}")]
    InvalidShape { shape: String, reason: String },

    #[error("invalid property path at {node}: {reason}")]
    InvalidPath { node: String, reason: &'static str },

    #[error(transparent)]
    MalformedList(#[from] ListError),

    #[error("cannot write validation report as {format}: {message}")]
    Serialization {
        format: SerializationFormat,
        message: String,
    },
}

impl ShaclError {
    /// Whether the error comes from the shapes graph rather than from writing the report
    pub fn is_shapes_error(&self) -> bool {
        !matches!(self, ShaclError::Serialization { .. })
    }
}

/// シェイプグラフを読み込み、データグラフを検証
pub fn validate(data: &Graph, shapes: &Graph) -> Result<ValidationReport, ShaclError> {
    let shapes = ShapesLoader::load(shapes)?;
    Ok(ShaclValidator::new(data, &shapes).validate())
}
