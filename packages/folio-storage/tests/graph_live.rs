use std::env;

use serde_json::{Map, Value};

use folio_config::{Graph, GraphIndexes};
use folio_storage::{Error, graph::GraphStore};

fn live_cfg() -> Option<Graph> {
	let url = match env::var("FOLIO_GRAPH_URL") {
		Ok(value) => value,
		Err(_) => {
			eprintln!("Skipping live graph tests; set FOLIO_GRAPH_URL to run this test.");

			return None;
		},
	};

	Some(Graph {
		url,
		database: env::var("FOLIO_GRAPH_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
		username: env::var("FOLIO_GRAPH_USERNAME").unwrap_or_else(|_| "neo4j".to_string()),
		password: env::var("FOLIO_GRAPH_PASSWORD").ok(),
		timeout_ms: 10_000,
		indexes: GraphIndexes {
			project: "project_embeddings".to_string(),
			employment: "employment_embeddings".to_string(),
		},
	})
}

#[tokio::test]
#[ignore = "Requires a running Neo4j server. Set FOLIO_GRAPH_URL to run."]
async fn live_transaction_binds_parameters() {
	let Some(cfg) = live_cfg() else {
		return;
	};
	let store = GraphStore::new(&cfg).expect("Failed to build store.");
	let tx = store.begin().await.expect("Failed to open transaction.");
	let mut params = Map::new();

	params.insert("query".to_string(), Value::from("react' OR 1=1 //"));
	params.insert("limit".to_string(), Value::from(3));

	let rows = tx
		.run("UNWIND range(1, $limit) AS n RETURN n, $query AS query", &params)
		.await
		.expect("Statement failed.");

	assert_eq!(rows.len(), 3);
	assert_eq!(rows[0]["query"], "react' OR 1=1 //");

	tx.release().await.expect("Failed to release transaction.");
}

#[tokio::test]
#[ignore = "Requires a running Neo4j server. Set FOLIO_GRAPH_URL to run."]
async fn live_syntax_errors_are_query_errors() {
	let Some(cfg) = live_cfg() else {
		return;
	};
	let store = GraphStore::new(&cfg).expect("Failed to build store.");
	let tx = store.begin().await.expect("Failed to open transaction.");
	let err = tx.run("MATCH (n RETURN n", &Map::new()).await.expect_err("Expected a syntax error.");

	assert!(matches!(err, Error::Query { ref code, .. } if code.contains("SyntaxError")));

	let _ = tx.release().await;
}
