use std::{collections::HashMap, sync::Arc};

use serde_json::{Map, Value};
use time::Date;

use crate::{Error, Result, SearchContext, SearchOptions, session::SessionGuard};
use folio_config::Config;
use folio_domain::{MatchType, SearchResult, VectorIndexKind, cypher, normalize_row};

/// Narrowing predicates applied inside the similarity query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorFilters {
	pub include_code: bool,
	pub min_complexity: Option<f64>,
	pub date_range: Option<(Date, Date)>,
	/// Lowercased; a candidate matches when any of its technologies is listed.
	pub technologies: Vec<String>,
}
impl VectorFilters {
	pub fn from_options(options: Option<&SearchOptions>) -> Result<Self> {
		let Some(options) = options else {
			return Ok(Self::default());
		};
		let date_range = options.date_range.as_ref().map(|range| range.parse()).transpose()?;
		let technologies = options
			.technologies
			.iter()
			.flatten()
			.map(|tech| tech.trim().to_lowercase())
			.filter(|tech| !tech.is_empty())
			.collect();

		Ok(Self {
			include_code: options.include_code.unwrap_or(false),
			min_complexity: options.min_complexity.filter(|value| value.is_finite()),
			date_range,
			technologies,
		})
	}
}

/// Similarity search over both vector indexes through one session.
///
/// Results are tagged semantic, de-duplicated by id (best score wins) and sorted by score.
pub(crate) async fn search(
	ctx: Arc<SearchContext>,
	embedding: Arc<[f32]>,
	top_k: u32,
	filters: VectorFilters,
) -> Result<Vec<SearchResult>> {
	let mut session = SessionGuard::open(ctx.sessions.as_ref()).await?;
	let outcome = run_indexes(&ctx, &mut session, &embedding, top_k, &filters).await;

	session.release().await;

	outcome
}

pub(crate) fn index_params(
	cfg: &Config,
	kind: VectorIndexKind,
	embedding: &[f32],
	top_k: u32,
	filters: &VectorFilters,
) -> Map<String, Value> {
	let oversampling = &cfg.search.oversampling;
	let index_name = match kind {
		VectorIndexKind::Project => &cfg.graph.indexes.project,
		VectorIndexKind::Employment => &cfg.graph.indexes.employment,
	};
	let (date_start, date_end) = match filters.date_range {
		Some((start, end)) => (Value::from(start.to_string()), Value::from(end.to_string())),
		None => (Value::Null, Value::Null),
	};
	let mut params = Map::new();

	params.insert(cypher::PARAM_INDEX_NAME.to_string(), Value::from(index_name.as_str()));
	params.insert(
		cypher::PARAM_CANDIDATE_COUNT.to_string(),
		Value::from(oversampling.candidate_count(top_k)),
	);
	params.insert(cypher::PARAM_EMBEDDING.to_string(), Value::from(embedding.to_vec()));
	params.insert(cypher::PARAM_LIMIT.to_string(), Value::from(oversampling.limit(top_k)));
	params.insert(
		cypher::PARAM_MIN_COMPLEXITY.to_string(),
		filters.min_complexity.map(Value::from).unwrap_or(Value::Null),
	);
	params.insert(cypher::PARAM_DATE_START.to_string(), date_start);
	params.insert(cypher::PARAM_DATE_END.to_string(), date_end);
	params.insert(cypher::PARAM_TECHNOLOGIES.to_string(), Value::from(filters.technologies.clone()));
	params.insert(cypher::PARAM_INCLUDE_CODE.to_string(), Value::from(filters.include_code));
	params
		.insert(cypher::PARAM_MAX_SNIPPETS.to_string(), Value::from(cfg.search.max_code_snippets));

	params
}

async fn run_indexes(
	ctx: &SearchContext,
	session: &mut SessionGuard,
	embedding: &[f32],
	top_k: u32,
	filters: &VectorFilters,
) -> Result<Vec<SearchResult>> {
	let max_snippets = ctx.cfg.search.max_code_snippets as usize;
	let mut best: HashMap<String, SearchResult> = HashMap::new();
	let mut order: Vec<String> = Vec::new();

	for kind in VectorIndexKind::ALL {
		let params = index_params(&ctx.cfg, kind, embedding, top_k, filters);
		let rows = session
			.execute(ctx.registry.vector_query(kind), &params)
			.await
			.map_err(|err| match err {
				Error::QueryExecution { message } => Error::vector_search(message),
				other => other,
			})?;

		tracing::debug!(index = kind.as_str(), rows = rows.len(), "Vector index queried.");

		for row in &rows {
			let result = normalize_row(row, MatchType::Semantic, max_snippets);

			match best.get_mut(&result.id) {
				Some(existing) if existing.score >= result.score => {},
				Some(existing) => *existing = result,
				None => {
					order.push(result.id.clone());
					best.insert(result.id.clone(), result);
				},
			}
		}
	}

	let mut results: Vec<SearchResult> =
		order.into_iter().filter_map(|id| best.remove(&id)).collect();

	results.sort_by(|a, b| b.score.total_cmp(&a.score));

	Ok(results)
}
