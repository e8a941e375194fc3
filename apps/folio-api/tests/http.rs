use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use folio_api::{routes, state::AppState};
use folio_config::{
	Config, EmbeddingProviderConfig, Graph, GraphIndexes, RerankProviderConfig, Search, Service,
	Tools,
};
use folio_domain::{QueryTemplate, Row};
use folio_service::{
	BoxFuture, EmbeddingProvider, Error, FolioService, GraphSession, GraphSessionProvider,
	Providers, RerankProvider, Result,
};

const DIMENSIONS: u32 = 4;

struct DummyEmbedding;
impl EmbeddingProvider for DummyEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_model: &'a str,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let vectors = vec![vec![0.5; DIMENSIONS as usize]; texts.len()];

		Box::pin(async move { Ok(vectors) })
	}
}

struct DummyRerank;
impl RerankProvider for DummyRerank {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a RerankProviderConfig,
		_api_key: &'a str,
		_query: &'a str,
		docs: &'a [String],
		top_n: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<usize>>> {
		let order = (0..docs.len()).take(top_n).collect();

		Box::pin(async move { Ok(order) })
	}
}

/// Answers every similarity query with one row and every graph query with two.
struct FixedSessions {
	reachable: bool,
}
impl GraphSessionProvider for FixedSessions {
	fn open(&self) -> BoxFuture<'_, Result<Box<dyn GraphSession>>> {
		let reachable = self.reachable;

		Box::pin(async move {
			if !reachable {
				return Err(Error::connection_init("Connection refused."));
			}

			Ok(Box::new(FixedSession) as Box<dyn GraphSession>)
		})
	}
}

struct FixedSession;
impl GraphSession for FixedSession {
	fn execute<'a>(
		&'a mut self,
		_query: &'a QueryTemplate,
		params: &'a Map<String, Value>,
	) -> BoxFuture<'a, Result<Vec<Row>>> {
		let rows = match params.get("indexName").and_then(Value::as_str) {
			Some("project_embeddings") => vec![row("p-1", 0.8)],
			Some(_) => Vec::new(),
			None => vec![row("p-1", 0.6), row("p-2", 0.5)],
		};

		Box::pin(async move { Ok(rows) })
	}

	fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async { Ok(()) })
	}
}

fn row(id: &str, score: f64) -> Row {
	let mut row = Map::new();

	row.insert("id".to_string(), Value::from(id));
	row.insert("title".to_string(), Value::from(format!("Project {id}")));
	row.insert("score".to_string(), Value::from(score));

	row
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		graph: Graph {
			url: "http://127.0.0.1:1".to_string(),
			database: "neo4j".to_string(),
			username: "neo4j".to_string(),
			password: None,
			timeout_ms: 1_000,
			indexes: GraphIndexes {
				project: "project_embeddings".to_string(),
				employment: "employment_embeddings".to_string(),
			},
		},
		providers: folio_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				dimensions: DIMENSIONS,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			rerank: None,
		},
		search: Search::default(),
		tools: Tools::default(),
	}
}

fn app(reachable: bool) -> Router {
	let service = FolioService::with_providers(
		test_config(),
		Arc::new(FixedSessions { reachable }),
		Providers::new(Arc::new(DummyEmbedding), Arc::new(DummyRerank)),
	);

	routes::router(AppState::from_service(service))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body is not JSON.")
	};

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let request = Request::builder()
		.uri("/health")
		.body(Body::empty())
		.expect("Failed to build request.");
	let (status, _) = send(app(true), request).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lists_registered_tools() {
	let request =
		Request::builder().uri("/v1/tools").body(Body::empty()).expect("Failed to build request.");
	let (status, json) = send(app(true), request).await;

	assert_eq!(status, StatusCode::OK);

	let tools = json["tools"].as_array().expect("tools is an array");

	assert_eq!(tools.len(), 9);
	assert_eq!(tools[0]["name"], "search_knowledge");
	assert!(tools[0].get("strategy").is_none());
	assert!(tools.iter().any(|tool| tool["strategy"] == "education"));
}

#[tokio::test]
async fn search_returns_fused_results() {
	let (status, json) = send(
		app(true),
		post_json(
			"/v1/search",
			r#"{"query":"react dashboards","embeddingModelName":"test-model","topK":5}"#,
		),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["query"], "react dashboards");
	assert_eq!(json["resultCount"], 2);
	assert_eq!(json["results"][0]["id"], "p-1");
	assert_eq!(json["results"][0]["matchType"], "hybrid");
	assert_eq!(json["results"][1]["matchType"], "graph");
}

#[tokio::test]
async fn fixed_strategy_tools_tag_graph_results_as_template() {
	let (status, json) = send(
		app(true),
		post_json(
			"/v1/tools/search_education",
			r#"{"query":"degrees","embeddingModelName":"test-model"}"#,
		),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["results"][1]["id"], "p-2");
	assert_eq!(json["results"][1]["matchType"], "template");
}

#[tokio::test]
async fn invalid_requests_map_to_bad_request() {
	let (status, json) = send(
		app(true),
		post_json("/v1/search", r#"{"query":"  ","embeddingModelName":"test-model"}"#),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");

	let (status, json) = send(app(true), post_json("/v1/search", r#"{"query":"#)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn unknown_tools_map_to_not_found() {
	let (status, json) = send(
		app(true),
		post_json("/v1/tools/search_everything", r#"{"query":"x","embeddingModelName":"m"}"#),
	)
	.await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "unknown_tool");
}

#[tokio::test]
async fn backend_failures_map_to_bad_gateway() {
	let (status, json) = send(
		app(false),
		post_json("/v1/search", r#"{"query":"react","embeddingModelName":"test-model"}"#),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "connection_failed");
}
