use color_eyre::{
	Result,
	eyre::{self, WrapErr},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_config::EmbeddingProviderConfig;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
	model: &'a str,
	input: &'a [String],
	dimensions: u32,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
	#[serde(default)]
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// Embeds a batch of texts with an OpenAI-compatible `/embeddings` endpoint.
///
/// The model is chosen per call; vectors come back in input order.
pub async fn embed(
	cfg: &EmbeddingProviderConfig,
	model: &str,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let body = EmbeddingRequest { model, input: texts, dimensions: cfg.dimensions };
	let json = crate::post_json(
		cfg.timeout_ms,
		crate::endpoint(&cfg.api_base, &cfg.path),
		crate::auth_headers(&cfg.api_key, &cfg.default_headers)?,
		&body,
	)
	.await?;

	parse_embedding_response(json, texts.len())
}

/// Places each returned vector at its `index` (position in the reply when absent). Every input
/// must receive exactly one vector.
fn parse_embedding_response(json: Value, input_count: usize) -> Result<Vec<Vec<f32>>> {
	let response: EmbeddingResponse =
		serde_json::from_value(json).wrap_err("Embedding response has an unexpected shape.")?;
	let mut slots: Vec<Option<Vec<f32>>> = vec![None; input_count];

	for (position, item) in response.data.into_iter().enumerate() {
		let index = item.index.unwrap_or(position);
		let slot = slots.get_mut(index).ok_or_else(|| {
			eyre::eyre!("Embedding index {index} is out of range for {input_count} inputs.")
		})?;

		if slot.replace(item.embedding).is_some() {
			return Err(eyre::eyre!("Embedding index {index} appears more than once."));
		}
	}

	slots
		.into_iter()
		.enumerate()
		.map(|(index, slot)| {
			slot.ok_or_else(|| eyre::eyre!("Embedding response has no vector for input {index}."))
		})
		.collect()
}
