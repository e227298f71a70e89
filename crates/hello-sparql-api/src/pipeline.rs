//! Request pipelines
//!
//! Each stage either succeeds completely or ends the request with a
//! classified [`ApiError`]. Both pipelines are synchronous and CPU-bound.

use crate::error::{ApiError, GraphRole};
use crate::models::{PipelineOutput, ShaclRequest, SparqlRequest};
use crate::negotiation::NegotiatedFormat;
use hello_sparql_core::{Graph, GraphLoader};
use hello_sparql_owlrl::{OwlRlReasoner, ReasonerConfig};
use hello_sparql_shacl::{ShaclValidator, ShapesLoader};
use tracing::{debug, warn};

fn load(text: &str, role: GraphRole) -> Result<Graph, ApiError> {
    let prefix = match role {
        GraphRole::Data => "d",
        GraphRole::Shapes => "s",
    };
    GraphLoader::with_blank_node_prefix(prefix)
        .load(text)
        .map_err(|e| ApiError::InvalidRdfData {
            role,
            message: e.to_string(),
        })
}

/// Load, optionally expand, compile, execute and serialize
pub fn run_sparql(
    request: &SparqlRequest,
    negotiated: NegotiatedFormat,
    reasoner: &ReasonerConfig,
) -> Result<PipelineOutput, ApiError> {
    let mut graph = load(&request.data, GraphRole::Data)?;
    debug!(triples = graph.len(), "loaded data graph");

    if request.inference {
        let stats = OwlRlReasoner::new(reasoner.clone())
            .expand(&mut graph)
            .map_err(|e| ApiError::InferenceError(e.to_string()))?;
        if !stats.inconsistencies.is_empty() {
            warn!(count = stats.inconsistencies.len(), "data graph is inconsistent under OWL-RL");
        }
        debug!(rounds = stats.rounds, inferred = stats.inferred, "expanded data graph");
    }

    let query = hello_sparql_sparql::compile(&request.query)?;
    let result = hello_sparql_sparql::execute(&graph, &query)?;
    let serialized = hello_sparql_sparql::serialize(&result, negotiated.format)?;

    Ok(PipelineOutput {
        body: serialized.body,
        media_type: negotiated.media_type,
        count: serialized.count,
    })
}

/// Load both graphs, validate, serialize the report
pub fn run_shacl(request: &ShaclRequest, negotiated: NegotiatedFormat) -> Result<PipelineOutput, ApiError> {
    let data = load(&request.data, GraphRole::Data)?;
    let shapes_graph = load(&request.shapes, GraphRole::Shapes)?;
    let shapes = ShapesLoader::load(&shapes_graph).map_err(|e| ApiError::InvalidRdfData {
        role: GraphRole::Shapes,
        message: e.to_string(),
    })?;
    debug!(triples = data.len(), shapes = shapes.len(), "loaded data and shapes graphs");

    let report = ShaclValidator::new(&data, &shapes).validate();
    debug!(
        conforms = report.conforms,
        violations = report.violation_count(),
        warnings = report.warning_count(),
        infos = report.info_count(),
        "validated data graph"
    );
    let body = report
        .serialize(negotiated.format)
        .map_err(|e| ApiError::SerializationError {
            format: negotiated.format,
            message: e.to_string(),
        })?;

    Ok(PipelineOutput {
        body,
        media_type: negotiated.media_type,
        count: report.results.len(),
    })
}
