//! Client for the graph database's HTTP transaction endpoint.
//!
//! A [`GraphTransaction`] is the unit of work the retrieval branches hold: it is opened with a
//! `POST` to `/db/{database}/tx`, runs statements against the URL handed back in `Location`, and
//! is released with a `DELETE` on that URL. Retrieval never writes, so release is a rollback.

use std::time::Duration;

use reqwest::{Client, StatusCode, header::LOCATION};
use serde_json::{Map, Value};

use crate::{Error, Result};

pub type GraphRow = Map<String, Value>;

#[derive(Clone, Debug)]
pub struct GraphStore {
	client: Client,
	base_url: String,
	begin_url: String,
	username: String,
	password: Option<String>,
}
impl GraphStore {
	pub fn new(cfg: &folio_config::Graph) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let base_url = cfg.url.trim_end_matches('/').to_string();
		let begin_url = format!("{base_url}/db/{}/tx", cfg.database);

		Ok(Self {
			client,
			base_url,
			begin_url,
			username: cfg.username.clone(),
			password: cfg.password.clone(),
		})
	}

	pub async fn begin(&self) -> Result<GraphTransaction> {
		let res = self
			.client
			.post(&self.begin_url)
			.basic_auth(&self.username, self.password.as_deref())
			.json(&serde_json::json!({ "statements": [] }))
			.send()
			.await?
			.error_for_status()?;
		let location = res
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.ok_or_else(|| {
				Error::InvalidResponse("Transaction response is missing Location.".to_string())
			})?;
		let url = resolve_location(&self.base_url, location);
		let json: Value = res.json().await?;

		check_errors(&json)?;

		tracing::debug!(url = %url, "Opened graph transaction.");

		Ok(GraphTransaction {
			client: self.client.clone(),
			url,
			username: self.username.clone(),
			password: self.password.clone(),
		})
	}
}

#[derive(Debug)]
pub struct GraphTransaction {
	client: Client,
	url: String,
	username: String,
	password: Option<String>,
}
impl GraphTransaction {
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Runs one parameterised statement and returns its rows keyed by column name.
	pub async fn run(&self, statement: &str, params: &Map<String, Value>) -> Result<Vec<GraphRow>> {
		let res = self
			.client
			.post(&self.url)
			.basic_auth(&self.username, self.password.as_deref())
			.json(&statement_body(statement, params))
			.send()
			.await?
			.error_for_status()?;
		let json: Value = res.json().await?;

		decode_rows(json)
	}

	/// Rolls the transaction back. A transaction the server already expired counts as released.
	pub async fn release(self) -> Result<()> {
		let res = self
			.client
			.delete(&self.url)
			.basic_auth(&self.username, self.password.as_deref())
			.send()
			.await?;

		if res.status() == StatusCode::NOT_FOUND {
			tracing::debug!(url = %self.url, "Graph transaction already expired.");

			return Ok(());
		}

		res.error_for_status()?;

		Ok(())
	}
}

pub(crate) fn statement_body(statement: &str, params: &Map<String, Value>) -> Value {
	serde_json::json!({
		"statements": [{
			"statement": statement,
			"parameters": params,
			"resultDataContents": ["row"],
		}]
	})
}

pub(crate) fn decode_rows(json: Value) -> Result<Vec<GraphRow>> {
	check_errors(&json)?;

	let Some(result) = json.get("results").and_then(Value::as_array).and_then(|r| r.first())
	else {
		return Ok(Vec::new());
	};
	let columns: Vec<&str> = result
		.get("columns")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse("Result is missing columns.".to_string()))?
		.iter()
		.map(|column| column.as_str().unwrap_or_default())
		.collect();
	let data = result
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse("Result is missing data.".to_string()))?;
	let mut rows = Vec::with_capacity(data.len());

	for entry in data {
		let values = entry
			.get("row")
			.and_then(Value::as_array)
			.ok_or_else(|| Error::InvalidResponse("Data entry is missing row.".to_string()))?;

		if values.len() != columns.len() {
			return Err(Error::InvalidResponse(format!(
				"Row has {} values for {} columns.",
				values.len(),
				columns.len()
			)));
		}

		rows.push(
			columns
				.iter()
				.zip(values)
				.map(|(column, value)| ((*column).to_string(), value.clone()))
				.collect(),
		);
	}

	Ok(rows)
}

fn check_errors(json: &Value) -> Result<()> {
	let Some(first) = json.get("errors").and_then(Value::as_array).and_then(|errors| errors.first())
	else {
		return Ok(());
	};

	Err(Error::Query {
		code: first.get("code").and_then(Value::as_str).unwrap_or_default().to_string(),
		message: first.get("message").and_then(Value::as_str).unwrap_or_default().to_string(),
	})
}

fn resolve_location(base_url: &str, location: &str) -> String {
	if location.starts_with("http://") || location.starts_with("https://") {
		location.to_string()
	} else {
		format!("{base_url}/{}", location.trim_start_matches('/'))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rows_are_keyed_by_column() {
		let json = serde_json::json!({
			"results": [{
				"columns": ["id", "score"],
				"data": [{ "row": ["p-1", 0.9], "meta": [null, null] }, { "row": ["p-2", 0.4] }]
			}],
			"errors": []
		});
		let rows = decode_rows(json).expect("decode failed");

		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0]["id"], "p-1");
		assert_eq!(rows[1]["score"], 0.4);
	}

	#[test]
	fn server_errors_become_query_errors() {
		let json = serde_json::json!({
			"results": [],
			"errors": [{ "code": "Neo.ClientError.Statement.SyntaxError", "message": "bad" }]
		});

		match decode_rows(json) {
			Err(Error::Query { code, message }) => {
				assert_eq!(code, "Neo.ClientError.Statement.SyntaxError");
				assert_eq!(message, "bad");
			},
			other => panic!("Unexpected decode result: {other:?}"),
		}
	}

	#[test]
	fn relative_locations_resolve_against_base() {
		assert_eq!(
			resolve_location("http://graph:7474", "/db/neo4j/tx/12"),
			"http://graph:7474/db/neo4j/tx/12"
		);
		assert_eq!(
			resolve_location("http://graph:7474", "http://other:7474/db/neo4j/tx/3"),
			"http://other:7474/db/neo4j/tx/3"
		);
	}

	#[test]
	fn statements_carry_parameters_separately() {
		let mut params = Map::new();

		params.insert("query".to_string(), Value::from("x' OR 1=1"));

		let body = statement_body("RETURN $query AS q", &params);

		assert_eq!(body["statements"][0]["statement"], "RETURN $query AS q");
		assert_eq!(body["statements"][0]["parameters"]["query"], "x' OR 1=1");
	}
}
