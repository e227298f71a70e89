use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use hello_sparql_api::{create_router, ApiConfig, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const DATA: &str = "@prefix ex: <http://example.org/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
ex:Alice a ex:Person ; ex:ssn \"987-65-432A\" .
ex:Bob a ex:Person .
ex:Person rdfs:subClassOf ex:Agent .";

const SHAPES: &str = "@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix ex: <http://example.org/> .
ex:PersonShape a sh:NodeShape ;
    sh:targetClass ex:Person ;
    sh:property [
        sh:path ex:ssn ;
        sh:minCount 1 ;
        sh:pattern \"^\\\\d{3}-\\\\d{2}-\\\\d{4}$\"
    ] .";

const ACCEPTS: [(&str, &str); 6] = [
    ("*/*", "text/plain"),
    ("application/json", "application/json"),
    ("text/csv", "text/csv"),
    ("text/xml", "text/xml"),
    ("text/plain", "text/plain"),
    ("text/turtle", "text/turtle"),
];

fn app() -> Router {
    create_router(AppState::new(ApiConfig::default()))
}

fn post(uri: &str, accept: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(request: Request<Body>) -> Response {
    app().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn error_body(response: Response) -> Value {
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn count(response: &Response) -> usize {
    response.headers()["x-result-count"].to_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = send(Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json, json!({"status": "OK"}));
}

#[tokio::test]
async fn test_sparql_content_type_follows_accept() {
    for (accept, media_type) in ACCEPTS {
        // ASK answers in every format; SELECT has no Turtle rendering
        let query = if accept == "text/turtle" {
            "ASK { ?s ?p ?o }"
        } else {
            "SELECT ?s ?p ?o WHERE { ?s ?p ?o }"
        };
        let response = send(post("/sparql", Some(accept), &json!({"data": DATA, "query": query}))).await;
        assert_eq!(response.status(), StatusCode::OK, "{accept}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], media_type);
    }
}

#[tokio::test]
async fn test_shacl_content_type_follows_accept() {
    for (accept, media_type) in ACCEPTS {
        let response = send(post("/shacl", Some(accept), &json!({"data": DATA, "shapes": SHAPES}))).await;
        assert_eq!(response.status(), StatusCode::OK, "{accept}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], media_type);
    }
}

#[tokio::test]
async fn test_unknown_or_missing_accept_is_406() {
    let body = json!({"data": DATA, "query": "SELECT * WHERE { ?s ?p ?o }"});
    for accept in [Some("application/json"), Some("text/*"), None] {
        let response = send(post("/sparql", accept, &body)).await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(error_body(response).await["error"], "UnsupportedAcceptHeader");
    }
    let response = send(post("/shacl", Some("image/png"), &json!({"data": DATA, "shapes": SHAPES}))).await;
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_non_json_body_is_415_before_parsing() {
    let form = Request::builder()
        .method("POST")
        .uri("/sparql")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "text/plain")
        .body(Body::from("query=SELECT&data=%3C%3C%3Cnot+rdf"))
        .unwrap();
    let response = send(form).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error_body(response).await["error"], "UnsupportedContentType");

    let missing = Request::builder()
        .method("POST")
        .uri("/shacl")
        .header(header::ACCEPT, "image/png")
        .body(Body::from("{}"))
        .unwrap();
    assert_eq!(send(missing).await.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_json_with_charset_is_accepted() {
    let request = Request::builder()
        .method("POST")
        .uri("/sparql")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .header(header::ACCEPT, "text/plain")
        .body(Body::from(json!({"data": DATA, "query": "ASK { ?s ?p ?o }"}).to_string()))
        .unwrap();
    assert_eq!(send(request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_select_count_matches_triples() {
    let response = send(post(
        "/sparql",
        Some("application/json"),
        &json!({"data": DATA, "query": "SELECT ?s ?p ?o WHERE { ?s ?p ?o }"}),
    ))
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(count(&response), 4);

    let response = send(post(
        "/sparql",
        Some("text/csv"),
        &json!({"data": DATA, "query": "SELECT ?s WHERE { ?s a <http://example.org/Person> }"}),
    ))
    .await;
    assert_eq!(count(&response), 2);
    assert_eq!(body_text(response).await.lines().count(), 3);
}

#[tokio::test]
async fn test_ask_body_is_literal_boolean() {
    for (query, expected) in [
        ("ASK { <http://example.org/Alice> a <http://example.org/Person> }", "true"),
        ("ASK { <http://example.org/Alice> a <http://example.org/Robot> }", "false"),
    ] {
        for accept in ["application/json", "text/csv", "text/xml"] {
            let response = send(post("/sparql", Some(accept), &json!({"data": DATA, "query": query}))).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(count(&response), 1);
            assert_eq!(body_text(response).await, expected);
        }
    }
}

#[tokio::test]
async fn test_inference_flag() {
    let query = "ASK { <http://example.org/Bob> a <http://example.org/Agent> }";
    let plain = send(post("/sparql", Some("text/plain"), &json!({"data": DATA, "query": query}))).await;
    assert_eq!(body_text(plain).await, "false");

    let inferred = send(post(
        "/sparql",
        Some("text/plain"),
        &json!({"data": DATA, "query": query, "inference": true}),
    ))
    .await;
    assert_eq!(body_text(inferred).await, "true");
}

#[tokio::test]
async fn test_cyclic_owl_list_is_inference_error() {
    let data = "@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix ex: <http://example.org/> .
ex:C owl:unionOf ex:l1 .
ex:l1 rdf:first ex:A ; rdf:rest ex:l1 .
";
    let response = send(post(
        "/sparql",
        Some("application/json"),
        &json!({"data": data, "query": "SELECT * WHERE { ?s ?p ?o }", "inference": true}),
    ))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body["error"], "InferenceError");
    assert!(body["message"].as_str().unwrap().contains("cls-uni"));
}

#[tokio::test]
async fn test_service_clause_is_execution_error() {
    let query = "SELECT * WHERE { SERVICE <http://example.org/sparql> { ?s ?p ?o } }";
    let response = send(post("/sparql", Some("text/csv"), &json!({"data": DATA, "query": query}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body["error"], "QueryExecutionError");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_construct_and_describe_are_501() {
    for query in [
        "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
        "DESCRIBE <http://example.org/Alice>",
    ] {
        let response = send(post("/sparql", Some("text/turtle"), &json!({"data": DATA, "query": query}))).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(error_body(response).await["error"], "UnsupportedQueryForm");
    }
}

#[tokio::test]
async fn test_invalid_query_is_400() {
    let response = send(post(
        "/sparql",
        Some("text/plain"),
        &json!({"data": DATA, "query": "SELECT ?s ?p ?o WHERE "}),
    ))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body["error"], "InvalidQuery");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid SPARQL query"));
}

#[tokio::test]
async fn test_select_as_turtle_is_serialization_error() {
    let response = send(post(
        "/sparql",
        Some("text/turtle"),
        &json!({"data": DATA, "query": "SELECT * WHERE { ?s ?p ?o }"}),
    ))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await["error"], "SerializationError");
}

#[tokio::test]
async fn test_malformed_data_and_shapes_are_distinguished() {
    let broken = "@prefix ex: <http://example.org/> .\nex:Alice a ex:Person ; ex:ssn \"1\"";

    let response = send(post(
        "/sparql",
        Some("text/plain"),
        &json!({"data": broken, "query": "ASK { ?s ?p ?o }"}),
    ))
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = error_body(response).await;
    assert_eq!(body["error"], "InvalidRdfData");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid RDF data:"));

    let response = send(post("/shacl", Some("text/plain"), &json!({"data": broken, "shapes": SHAPES}))).await;
    assert!(error_body(response).await["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid RDF data:"));

    let response = send(post("/shacl", Some("text/plain"), &json!({"data": DATA, "shapes": broken}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_body(response).await["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid SHACL shapes:"));
}

#[tokio::test]
async fn test_non_conforming_report_is_200() {
    let response = send(post("/shacl", Some("application/json"), &json!({"data": DATA, "shapes": SHAPES}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(count(&response), 2);

    let report: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(report["conforms"], false);
    let focus: Vec<&str> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["focusNode"].as_str().unwrap())
        .collect();
    assert_eq!(focus, ["<http://example.org/Alice>", "<http://example.org/Bob>"]);
}

#[tokio::test]
async fn test_conforming_report_has_same_shape() {
    let data = "@prefix ex: <http://example.org/> . ex:Carol a ex:Person ; ex:ssn \"123-45-6789\" .";
    let response = send(post("/shacl", Some("application/json"), &json!({"data": data, "shapes": SHAPES}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(report, json!({"conforms": true, "results": []}));
}

#[tokio::test]
async fn test_repeated_requests_are_byte_identical() {
    for accept in ["text/turtle", "text/xml", "text/csv"] {
        let body = json!({"data": DATA, "shapes": SHAPES});
        let first = body_text(send(post("/shacl", Some(accept), &body)).await).await;
        let second = body_text(send(post("/shacl", Some(accept), &body)).await).await;
        assert_eq!(first, second, "{accept}");
    }

    let body = json!({"data": DATA, "query": "SELECT * WHERE { ?s ?p ?o }", "inference": true});
    let first = body_text(send(post("/sparql", Some("application/json"), &body)).await).await;
    let second = body_text(send(post("/sparql", Some("application/json"), &body)).await).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_field_is_422() {
    let response = send(post("/sparql", Some("text/plain"), &json!({"data": DATA}))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = error_body(response).await;
    assert_eq!(body["error"], "InvalidRequestBody");
    assert!(body["message"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/sparql")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(request).await;
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}
