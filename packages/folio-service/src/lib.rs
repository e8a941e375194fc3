pub mod graph;
pub mod registry;
pub mod rerank;
pub mod search;
pub mod session;
pub mod tool;
pub mod vector;

mod error;

pub use error::{Error, Result};
pub use registry::{SEARCH_KNOWLEDGE, ToolDescriptor, ToolRegistry};
pub use rerank::{RerankCapability, rerank_results};
pub use search::{DateRange, SearchOptions, SearchRequest, SearchResponse};
pub use tool::{
	GraphSelection, OptionsResolver, SearchTool, SearchToolArgs, StrategySelector, TopKResolver,
	create_search_tool,
};
pub use vector::VectorFilters;

use std::{future::Future, pin::Pin, sync::Arc};

use color_eyre::eyre;
use serde_json::{Map, Value};

use folio_config::{Config, EmbeddingProviderConfig, RerankProviderConfig};
use folio_domain::{QueryTemplate, Row, StrategyRegistry};
use folio_providers::{embedding, rerank as rerank_http};
use folio_storage::graph::{GraphStore, GraphTransaction};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		model: &'a str,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;

	/// Single-text embedding on top of the batch call.
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		model: &'a str,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move {
			let batch = [text.to_string()];
			let vectors = self.embed(cfg, model, &batch).await?;

			vectors
				.into_iter()
				.next()
				.ok_or_else(|| eyre::eyre!("Embedding provider returned no vectors."))
		})
	}
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	/// Returns indexes into `docs`, most relevant first.
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		api_key: &'a str,
		query: &'a str,
		docs: &'a [String],
		top_n: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<usize>>>;
}

/// Hands out graph sessions. Opening failures surface as [`Error::ConnectionInit`].
pub trait GraphSessionProvider
where
	Self: Send + Sync,
{
	fn open(&self) -> BoxFuture<'_, Result<Box<dyn GraphSession>>>;
}

/// One unit of graph work owned by a single retrieval branch.
pub trait GraphSession
where
	Self: Send,
{
	fn execute<'a>(
		&'a mut self,
		query: &'a QueryTemplate,
		params: &'a Map<String, Value>,
	) -> BoxFuture<'a, Result<Vec<Row>>>;

	fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, rerank: Arc<dyn RerankProvider>) -> Self {
		Self { embedding, rerank }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), rerank: provider }
	}
}

/// Everything a search tool needs per call. Shared read-only across tools and requests.
pub struct SearchContext {
	pub cfg: Config,
	pub registry: StrategyRegistry,
	pub sessions: Arc<dyn GraphSessionProvider>,
	pub providers: Providers,
}

pub struct FolioService {
	ctx: Arc<SearchContext>,
	tools: ToolRegistry,
}
impl FolioService {
	pub fn new(cfg: Config) -> Result<Self> {
		let store =
			GraphStore::new(&cfg.graph).map_err(|err| Error::connection_init(err.to_string()))?;

		Ok(Self::with_providers(cfg, Arc::new(StoreSessions { store }), Providers::default()))
	}

	pub fn with_providers(
		cfg: Config,
		sessions: Arc<dyn GraphSessionProvider>,
		providers: Providers,
	) -> Self {
		let ctx = Arc::new(SearchContext {
			cfg,
			registry: StrategyRegistry::new(),
			sessions,
			providers,
		});
		let tools = ToolRegistry::new(ctx.clone());

		Self { ctx, tools }
	}

	pub fn config(&self) -> &Config {
		&self.ctx.cfg
	}

	pub fn tools(&self) -> &ToolRegistry {
		&self.tools
	}

	/// Runs the intent-classifying tool.
	pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
		self.call_tool(SEARCH_KNOWLEDGE, request).await
	}

	pub async fn call_tool(&self, name: &str, request: SearchRequest) -> Result<SearchResponse> {
		let tool =
			self.tools.get(name).ok_or_else(|| Error::UnknownTool { name: name.to_string() })?;

		tool.call(request).await
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		model: &'a str,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, model, texts))
	}
}
impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		api_key: &'a str,
		query: &'a str,
		docs: &'a [String],
		top_n: usize,
	) -> BoxFuture<'a, color_eyre::Result<Vec<usize>>> {
		Box::pin(rerank_http::rerank(cfg, api_key, query, docs, top_n))
	}
}

struct StoreSessions {
	store: GraphStore,
}
impl GraphSessionProvider for StoreSessions {
	fn open(&self) -> BoxFuture<'_, Result<Box<dyn GraphSession>>> {
		Box::pin(async move {
			let tx = self
				.store
				.begin()
				.await
				.map_err(|err| Error::connection_init(storage_message(err)))?;

			Ok(Box::new(StoreSession { tx }) as Box<dyn GraphSession>)
		})
	}
}

struct StoreSession {
	tx: GraphTransaction,
}
impl GraphSession for StoreSession {
	fn execute<'a>(
		&'a mut self,
		query: &'a QueryTemplate,
		params: &'a Map<String, Value>,
	) -> BoxFuture<'a, Result<Vec<Row>>> {
		Box::pin(async move {
			self.tx
				.run(query.as_str(), params)
				.await
				.map_err(|err| Error::query_execution(storage_message(err)))
		})
	}

	fn close(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async move {
			self.tx.release().await.map_err(|err| Error::query_execution(storage_message(err)))
		})
	}
}

fn storage_message(err: folio_storage::Error) -> String {
	match err {
		folio_storage::Error::Query { code, message } if code.is_empty() => message,
		folio_storage::Error::Query { code, message } => format!("{code}: {message}"),
		other => other.to_string(),
	}
}
