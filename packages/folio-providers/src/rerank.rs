use color_eyre::{
	Result,
	eyre::{self, WrapErr},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_config::RerankProviderConfig;

#[derive(Serialize)]
struct RerankRequest<'a> {
	model: &'a str,
	query: &'a str,
	documents: &'a [String],
	top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
	#[serde(alias = "data")]
	results: Vec<RerankItem>,
}

#[derive(Deserialize)]
struct RerankItem {
	index: usize,
	#[serde(alias = "score")]
	relevance_score: f64,
}

/// Asks a Cohere-style `/rerank` endpoint to order `docs` against `query`.
///
/// Returns indexes into `docs`, most relevant first, at most `top_n` long.
pub async fn rerank(
	cfg: &RerankProviderConfig,
	api_key: &str,
	query: &str,
	docs: &[String],
	top_n: usize,
) -> Result<Vec<usize>> {
	let body = RerankRequest { model: &cfg.model, query, documents: docs, top_n };
	let json = crate::post_json(
		cfg.timeout_ms,
		crate::endpoint(&cfg.api_base, &cfg.path),
		crate::auth_headers(api_key, &cfg.default_headers)?,
		&body,
	)
	.await?;
	let mut order = parse_rerank_response(json, docs.len())?;

	order.truncate(top_n);

	Ok(order)
}

fn parse_rerank_response(json: Value, doc_count: usize) -> Result<Vec<usize>> {
	let response: RerankResponse =
		serde_json::from_value(json).wrap_err("Rerank response has an unexpected shape.")?;
	let mut scored = response.results;

	if let Some(item) = scored.iter().find(|item| item.index >= doc_count) {
		return Err(eyre::eyre!(
			"Rerank result index {} is out of range for {doc_count} documents.",
			item.index
		));
	}

	scored.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

	Ok(scored.into_iter().map(|item| item.index).collect())
}
