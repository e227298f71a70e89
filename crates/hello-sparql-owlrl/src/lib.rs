//! OWL 2 RL 推論エンジン
//!
//! このクレートは OWL 2 RL の規則を前向き推論で不動点まで適用します:
//! - スキーマ規則 (scm-*)、クラス公理 (cax-*)
//! - プロパティ規則 (prp-*)、クラス式 (cls-*)
//! - owl:sameAs の等価規則 (eq-*)
//! - 矛盾の検出 (cax-dw, cax-adc, cls-com, cls-maxc1, prp-pdw, prp-npa1/2, eq-diff1/2/3 など)

pub mod reasoner;
pub mod rules;

pub use reasoner::{InferenceStats, OwlRlReasoner, ReasonerConfig};

use hello_sparql_core::ListError;
use thiserror::Error;

/// 推論エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasonerError {
    #[error("closure did not converge within {limit} rounds")]
    IterationLimit { limit: usize },

    #[error("closure exceeded {limit} inferred triples")]
    InferredLimit { limit: usize },

    #[error("{rule}: {source}")]
    MalformedList {
        rule: &'static str,
        #[source]
        source: ListError,
    },

    #[error("inconsistent ontology ({rule}): {detail}")]
    Inconsistent { rule: &'static str, detail: String },
}
