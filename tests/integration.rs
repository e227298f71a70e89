// End-to-end tests across loading, inference, querying, validation and HTTP

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use hello_sparql_api::{create_router, ApiConfig, AppState, X_RESULT_COUNT};
use hello_sparql_core::{Graph, GraphLoader, SerializationFormat};
use hello_sparql_owlrl::OwlRlReasoner;
use http_body_util::BodyExt;
use tower::ServiceExt;

const DATA: &str = "@prefix ex: <http://example.org/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
ex:hasParent rdfs:domain ex:Person ; rdfs:range ex:Person .
ex:alice ex:hasParent ex:carol ;
    ex:name \"Alice\" .
";

const SHAPES: &str = "@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
ex:PersonShape a sh:NodeShape ;
    sh:targetClass ex:Person ;
    sh:property [ sh:path ex:name ; sh:minCount 1 ] .
";

const PERSONS: &str = "SELECT ?p WHERE { ?p a <http://example.org/Person> }";

fn load(text: &str, prefix: &str) -> Graph {
    GraphLoader::with_blank_node_prefix(prefix).load(text).unwrap()
}

fn expanded() -> Graph {
    let mut graph = load(DATA, "d");
    OwlRlReasoner::default().expand(&mut graph).unwrap();
    graph
}

fn query(graph: &Graph, text: &str, format: SerializationFormat) -> (String, usize) {
    let compiled = hello_sparql_sparql::compile(text).unwrap();
    let result = hello_sparql_sparql::execute(graph, &compiled).unwrap();
    let serialized = hello_sparql_sparql::serialize(&result, format).unwrap();
    (serialized.body, serialized.count)
}

#[test]
fn test_inferred_types_are_queryable() {
    let (_, before) = query(&load(DATA, "d"), PERSONS, SerializationFormat::Json);
    assert_eq!(before, 0);

    let (body, after) = query(&expanded(), PERSONS, SerializationFormat::Csv);
    assert_eq!(after, 2);
    assert_eq!(body, "p\r\nhttp://example.org/alice\r\nhttp://example.org/carol\r\n");
}

#[test]
fn test_inferred_types_become_shacl_targets() {
    let shapes = load(SHAPES, "s");

    let plain = hello_sparql_shacl::validate(&load(DATA, "d"), &shapes).unwrap();
    assert!(plain.conforms);

    let report = hello_sparql_shacl::validate(&expanded(), &shapes).unwrap();
    assert!(!report.conforms);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].focus_node.to_string(), "<http://example.org/carol>");
}

#[test]
fn test_report_graph_is_queryable() {
    let shapes = load(SHAPES, "s");
    let report = hello_sparql_shacl::validate(&expanded(), &shapes).unwrap();
    let turtle = report.serialize(SerializationFormat::Turtle).unwrap();

    let graph = load(&turtle, "r");
    let (body, count) = query(
        &graph,
        "PREFIX sh: <http://www.w3.org/ns/shacl#>
         SELECT ?focus WHERE { ?r a sh:ValidationResult ; sh:focusNode ?focus }",
        SerializationFormat::Csv,
    );
    assert_eq!(count, 1);
    assert_eq!(body, "focus\r\nhttp://example.org/carol\r\n");
}

#[tokio::test]
async fn test_concurrent_requests_share_nothing() {
    let app = create_router(AppState::new(ApiConfig::default()));
    let body = serde_json::json!({ "data": DATA, "query": PERSONS, "inference": true }).to_string();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .method("POST")
                .uri("/sparql")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ACCEPT, "text/csv")
                .body(Body::from(body))
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[X_RESULT_COUNT], "2");
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            String::from_utf8(bytes.to_vec()).unwrap()
        }));
    }

    let mut bodies = Vec::new();
    for handle in handles {
        bodies.push(handle.await.unwrap());
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(bodies[0], "p\r\nhttp://example.org/alice\r\nhttp://example.org/carol\r\n");
}

#[tokio::test]
async fn test_validation_over_http_matches_library() {
    let app = create_router(AppState::new(ApiConfig::default()));
    let request = Request::builder()
        .method("POST")
        .uri("/shacl")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(
            serde_json::json!({ "data": DATA, "shapes": SHAPES }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let library = hello_sparql_shacl::validate(&load(DATA, "d"), &load(SHAPES, "s"))
        .unwrap()
        .serialize(SerializationFormat::Json)
        .unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), library);
}
