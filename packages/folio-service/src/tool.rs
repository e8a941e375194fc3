//! Builds search tools: units that turn one request into one ranked response.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{Instrument, field};
use uuid::Uuid;

use crate::{
	Error, RerankCapability, Result, SearchContext, SearchRequest, SearchResponse, VectorFilters,
	graph, rerank_results, vector,
};
use folio_domain::{MatchType, QueryTemplate, StrategyKey, merge_results};

/// The graph query a tool runs for a request.
#[derive(Clone, Debug)]
pub struct GraphSelection {
	pub strategy: StrategyKey,
	pub template: QueryTemplate,
	pub params: Map<String, Value>,
}

/// Picks the graph query for a request. The second argument is the resolved result count.
pub type StrategySelector =
	Arc<dyn Fn(&SearchRequest, u32) -> Result<GraphSelection> + Send + Sync>;
pub type TopKResolver = Arc<dyn Fn(&SearchRequest) -> i64 + Send + Sync>;
pub type OptionsResolver = Arc<dyn Fn(&SearchRequest) -> Result<VectorFilters> + Send + Sync>;

pub struct SearchToolArgs {
	pub name: String,
	pub description: String,
	/// Fixed strategy advertised in tool metadata, if the tool has one.
	pub strategy: Option<StrategyKey>,
	pub select: StrategySelector,
	/// Defaults to the request's `topK`, then `search.top_k`.
	pub top_k: Option<TopKResolver>,
	/// Defaults to no narrowing.
	pub options: Option<OptionsResolver>,
	pub graph_match_type: MatchType,
}

#[derive(Clone)]
pub struct SearchTool {
	ctx: Arc<SearchContext>,
	name: String,
	description: String,
	strategy: Option<StrategyKey>,
	select: StrategySelector,
	top_k: Option<TopKResolver>,
	options: Option<OptionsResolver>,
	graph_match_type: MatchType,
}
impl SearchTool {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn strategy(&self) -> Option<StrategyKey> {
		self.strategy
	}

	pub async fn call(&self, request: SearchRequest) -> Result<SearchResponse> {
		let request_id = Uuid::new_v4();
		let span = tracing::info_span!(
			"search_tool",
			request_id = %request_id,
			tool = %self.name,
			strategy = field::Empty,
			top_k = field::Empty,
		);

		self.run(request).instrument(span).await
	}

	async fn run(&self, request: SearchRequest) -> Result<SearchResponse> {
		request.validate()?;

		let cfg = &self.ctx.cfg;
		let top_k = self.resolve_top_k(&request);
		let selection = (self.select)(&request, top_k)?;
		let filters = match self.options.as_ref() {
			Some(resolve) => resolve(&request)?,
			None => VectorFilters::default(),
		};
		let span = tracing::Span::current();

		span.record("strategy", selection.strategy.as_str());
		span.record("top_k", top_k);

		let embedding = self.embed_query(&request).await?;
		let vector_branch = tokio::spawn(
			vector::search(self.ctx.clone(), embedding, top_k, filters).in_current_span(),
		);
		let graph_branch = tokio::spawn(
			graph::search(self.ctx.clone(), selection, self.graph_match_type).in_current_span(),
		);
		let (vector_results, graph_results) =
			tokio::try_join!(join_branch(vector_branch), join_branch(graph_branch))?;

		tracing::debug!(
			vector = vector_results.len(),
			graph = graph_results.len(),
			"Retrieval branches joined."
		);

		let merged = merge_results(vector_results, graph_results, cfg.search.hybrid_boost);
		let capability = RerankCapability::resolve(cfg, self.ctx.providers.rerank.clone());
		let results = rerank_results(
			&capability,
			&request.query,
			merged,
			top_k as usize,
			cfg.search.rerank_enabled,
		)
		.await;

		tracing::info!(
			result_count = results.len(),
			rerank = capability.is_available(),
			"Search completed."
		);

		Ok(SearchResponse { query: request.query, result_count: results.len(), results })
	}

	fn resolve_top_k(&self, request: &SearchRequest) -> u32 {
		let search = &self.ctx.cfg.search;
		let requested = match self.top_k.as_ref() {
			Some(resolve) => resolve(request),
			None => request.top_k.unwrap_or(i64::from(search.top_k)),
		};

		requested.min(i64::from(search.max_top_k)).max(1) as u32
	}

	async fn embed_query(&self, request: &SearchRequest) -> Result<Arc<[f32]>> {
		let cfg = &self.ctx.cfg.providers.embedding;
		let vector = self
			.ctx
			.providers
			.embedding
			.embed_query(cfg, &request.embedding_model_name, &request.query)
			.await?;

		if vector.is_empty() {
			return Err(Error::Provider {
				message: "Embedding provider returned an empty vector.".to_string(),
			});
		}
		if vector.len() != cfg.dimensions as usize {
			return Err(Error::Provider {
				message: format!(
					"Embedding vector dimension mismatch: expected {}, got {}.",
					cfg.dimensions,
					vector.len()
				),
			});
		}

		Ok(Arc::from(vector))
	}
}

pub fn create_search_tool(ctx: Arc<SearchContext>, args: SearchToolArgs) -> SearchTool {
	let SearchToolArgs { name, description, strategy, select, top_k, options, graph_match_type } =
		args;

	SearchTool { ctx, name, description, strategy, select, top_k, options, graph_match_type }
}

async fn join_branch<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
	handle.await.map_err(|err| Error::Task { message: err.to_string() })?
}
