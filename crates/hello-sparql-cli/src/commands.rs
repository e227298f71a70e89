//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hello_sparql_api::pipeline::{run_shacl, run_sparql};
use hello_sparql_api::{ApiConfig, ApiServer, NegotiatedFormat, ShaclRequest, SparqlRequest};
use hello_sparql_core::SerializationFormat;
use std::path::{Path, PathBuf};
use tracing::info;

/// Main CLI structure
#[derive(Debug, Parser)]
#[command(name = "hello-sparql")]
#[command(about = "SPARQL query and SHACL validation service for RDF data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Log filter, e.g. `info` or `hello_sparql_api=debug`
    #[arg(long, global = true, env = "HELLO_SPARQL_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run a SPARQL query over a local RDF file
    Query {
        /// RDF data file
        #[arg(long)]
        data: PathBuf,

        /// SPARQL query file
        #[arg(long)]
        query: PathBuf,

        /// Output format (text, json, csv, xml, turtle)
        #[arg(short, long, default_value = "text")]
        format: SerializationFormat,

        /// Expand the data with OWL 2 RL inference first
        #[arg(long)]
        inference: bool,
    },

    /// Validate a local RDF file against SHACL shapes
    Validate {
        /// RDF data file
        #[arg(long)]
        data: PathBuf,

        /// SHACL shapes file
        #[arg(long)]
        shapes: PathBuf,

        /// Output format (text, json, csv, xml, turtle)
        #[arg(short, long, default_value = "text")]
        format: SerializationFormat,
    },
}

/// `serve` options; each overrides the config file
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long, env = "HELLO_SPARQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "HELLO_SPARQL_HOST")]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long, env = "HELLO_SPARQL_PORT")]
    pub port: Option<u16>,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "allowed-origin", env = "HELLO_SPARQL_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Allow credentialed CORS requests
    #[arg(long, env = "HELLO_SPARQL_ALLOW_CREDENTIALS", num_args = 0..=1, default_missing_value = "true")]
    pub allow_credentials: Option<bool>,
}

impl ServeArgs {
    /// Config file values, overridden by flags and environment
    pub fn into_config(self) -> Result<ApiConfig> {
        let mut config = match &self.config {
            Some(path) => ApiConfig::from_file(path)?,
            None => ApiConfig::default(),
        };
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if !self.allowed_origins.is_empty() {
            config.cors.allowed_origins = self.allowed_origins;
        }
        if let Some(allow) = self.allow_credentials {
            config.cors.allow_credentials = allow;
        }
        Ok(config)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn negotiated(format: SerializationFormat) -> NegotiatedFormat {
    NegotiatedFormat {
        format,
        media_type: format.media_type(),
    }
}

/// Run the SPARQL pipeline over files and return the serialized body
pub fn run_query(data: &Path, query: &Path, format: SerializationFormat, inference: bool) -> Result<String> {
    let request = SparqlRequest {
        data: read(data)?,
        query: read(query)?,
        inference,
    };
    let output = run_sparql(&request, negotiated(format), &ApiConfig::default().reasoner)?;
    info!(count = output.count, "query finished");
    Ok(output.body)
}

/// Run the SHACL pipeline over files and return the serialized report
pub fn run_validate(data: &Path, shapes: &Path, format: SerializationFormat) -> Result<String> {
    let request = ShaclRequest {
        data: read(data)?,
        shapes: read(shapes)?,
    };
    let output = run_shacl(&request, negotiated(format))?;
    info!(results = output.count, "validation finished");
    Ok(output.body)
}

/// Execute CLI commands
pub async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Serve(args) => {
            let server = ApiServer::new(args.into_config()?);
            server.run_with_shutdown(hello_sparql_api::shutdown_signal()).await
        }
        Commands::Query {
            data,
            query,
            format,
            inference,
        } => {
            print!("{}", run_query(&data, &query, format, inference)?);
            Ok(())
        }
        Commands::Validate { data, shapes, format } => {
            print!("{}", run_validate(&data, &shapes, format)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hello_sparql_api::ApiError;
    use std::fs;

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::try_parse_from([
            "hello-sparql",
            "query",
            "--data",
            "data.ttl",
            "--query",
            "q.rq",
            "--format",
            "csv",
            "--inference",
        ])
        .unwrap();
        match cli.command {
            Commands::Query { format, inference, .. } => {
                assert_eq!(format, SerializationFormat::Csv);
                assert!(inference);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = Cli::try_parse_from(["hello-sparql", "validate", "--data", "a", "--shapes", "b", "-f", "yaml"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello-sparql.toml");
        fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9000\n\n[cors]\nallow_credentials = false\n").unwrap();

        let config = ServeArgs {
            config: Some(path),
            port: Some(9100),
            allowed_origins: vec!["https://ui.example.org".to_string()],
            ..ServeArgs::default()
        }
        .into_config()
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.cors.allowed_origins, ["https://ui.example.org"]);
        assert!(!config.cors.allow_credentials);
    }

    #[test]
    fn test_offline_query_and_validate() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.ttl");
        let query = dir.path().join("query.rq");
        let shapes = dir.path().join("shapes.ttl");
        fs::write(&data, "<http://example.org/a> <http://example.org/p> \"x\" .\n").unwrap();
        fs::write(&query, "SELECT ?o WHERE { ?s ?p ?o }").unwrap();
        fs::write(
            &shapes,
            "@prefix sh: <http://www.w3.org/ns/shacl#> .
             <http://example.org/S> sh:targetNode <http://example.org/a> ;
                 sh:property [ sh:path <http://example.org/q> ; sh:minCount 1 ] .",
        )
        .unwrap();

        let table = run_query(&data, &query, SerializationFormat::Text, false).unwrap();
        assert_eq!(table, "?o\n---\n\"x\"\n");

        let report = run_validate(&data, &shapes, SerializationFormat::Text).unwrap();
        assert!(report.starts_with("Validation Report: DOES NOT CONFORM (1 results)"));
    }

    #[test]
    fn test_pipeline_errors_keep_their_class() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.ttl");
        let query = dir.path().join("query.rq");
        fs::write(&data, "").unwrap();
        fs::write(&query, "CONSTRUCT WHERE { ?s ?p ?o }").unwrap();

        let err = run_query(&data, &query, SerializationFormat::Text, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ApiError>(),
            Some(&ApiError::UnsupportedQueryForm("CONSTRUCT"))
        );
    }
}
