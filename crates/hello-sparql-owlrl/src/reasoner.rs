//! OWL 2 RL 推論器

use crate::rules::{Derivation, CHECKS, RULES};
use crate::ReasonerError;
use oxigraph::model::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 推論器の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// 不動点に達するまでの最大ラウンド数
    pub max_iterations: usize,
    /// 推論で追加できるトリプルの最大数
    pub max_inferred: usize,
    /// 矛盾を検出したらエラーにする
    pub fail_on_inconsistency: bool,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 256,
            max_inferred: 500_000,
            fail_on_inconsistency: false,
        }
    }
}

/// 推論結果の統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub rounds: usize,
    pub inferred: usize,
    /// 検出された矛盾 (規則名, 説明)
    pub inconsistencies: Vec<(&'static str, String)>,
}

/// OWL 2 RL 推論器
#[derive(Debug, Clone, Default)]
pub struct OwlRlReasoner {
    config: ReasonerConfig,
}

impl OwlRlReasoner {
    pub fn new(config: ReasonerConfig) -> Self {
        Self { config }
    }

    /// グラフに OWL 2 RL の閉包を追加する
    ///
    /// On error the graph may hold part of the closure and must be discarded.
    pub fn expand(&self, graph: &mut Graph) -> Result<InferenceStats, ReasonerError> {
        let mut stats = InferenceStats::default();

        loop {
            if stats.rounds == self.config.max_iterations {
                return Err(ReasonerError::IterationLimit {
                    limit: self.config.max_iterations,
                });
            }
            stats.rounds += 1;

            let derived = {
                let mut derivation = Derivation::new(graph);
                for rule in RULES {
                    rule.apply(&mut derivation)?;
                }
                if derivation.literal_subjects() > 0 {
                    debug!(
                        round = stats.rounds,
                        skipped = derivation.literal_subjects(),
                        "skipped conclusions with literal subjects"
                    );
                }
                derivation.into_triples()
            };

            if derived.is_empty() {
                break;
            }

            stats.inferred += derived.len();
            if stats.inferred > self.config.max_inferred {
                return Err(ReasonerError::InferredLimit {
                    limit: self.config.max_inferred,
                });
            }

            debug!(round = stats.rounds, new_triples = derived.len(), "OWL-RL round");
            for triple in &derived {
                graph.insert(triple);
            }
        }

        for check in CHECKS {
            if let Some(detail) = check.detect(graph) {
                if self.config.fail_on_inconsistency {
                    return Err(ReasonerError::Inconsistent {
                        rule: check.name,
                        detail,
                    });
                }
                warn!(rule = check.name, %detail, "inconsistent ontology");
                stats.inconsistencies.push((check.name, detail));
            }
        }

        debug!(
            rounds = stats.rounds,
            inferred = stats.inferred,
            triples = graph.len(),
            "OWL-RL closure complete"
        );
        Ok(stats)
    }
}
