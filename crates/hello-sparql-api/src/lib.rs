//! # hello-sparql API
//!
//! HTTP endpoints for SPARQL querying (`POST /sparql`) and SHACL validation
//! (`POST /shacl`) over RDF sent with each request, plus `GET /health`.
//! Requests are stateless; every graph lives only for its request.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod negotiation;
pub mod pipeline;
pub mod routes;
pub mod server;

pub use config::{ApiConfig, ConfigError, CorsConfig, ServerConfig};
pub use error::{ApiError, GraphRole};
pub use handlers::{AppState, X_RESULT_COUNT};
pub use models::*;
pub use negotiation::{negotiate, NegotiatedFormat};
pub use routes::create_router;
pub use server::{shutdown_signal, ApiServer};
