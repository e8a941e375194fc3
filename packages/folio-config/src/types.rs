use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Default multiplier applied to similarity scores before graph scores are added.
///
/// A tuning knob with no calibrated meaning; `search.hybrid_boost` overrides it.
pub const DEFAULT_HYBRID_BOOST: f64 = 1.2;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub graph: Graph,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub tools: Tools,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Graph {
	/// Base URL of the graph database HTTP endpoint, e.g. "http://localhost:7474".
	pub url: String,
	pub database: String,
	pub username: String,
	pub password: Option<String>,
	pub timeout_ms: u64,
	pub indexes: GraphIndexes,
}

/// Names of the vector indexes queried by the similarity branch.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphIndexes {
	pub project: String,
	pub employment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: Option<RerankProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RerankProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Optional. When absent the key is read from the environment variable named by
	/// `api_key_env`; with neither present reranking is unavailable.
	pub api_key: Option<String>,
	#[serde(default = "default_rerank_api_key_env")]
	pub api_key_env: String,
	pub path: String,
	#[serde(default = "default_rerank_model")]
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub top_k: u32,
	pub max_top_k: u32,
	/// Multiplier applied to similarity scores before graph scores are added on.
	pub hybrid_boost: f64,
	pub rerank_enabled: bool,
	pub max_code_snippets: u32,
	pub oversampling: Oversampling,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			top_k: 10,
			max_top_k: 50,
			hybrid_boost: DEFAULT_HYBRID_BOOST,
			rerank_enabled: true,
			max_code_snippets: 3,
			oversampling: Oversampling::default(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Oversampling {
	pub candidate_multiplier: u32,
	pub candidate_floor: u32,
	pub limit_multiplier: u32,
	pub limit_floor: u32,
}
impl Oversampling {
	/// Raw nearest-neighbour pool requested from each vector index.
	pub fn candidate_count(&self, top_k: u32) -> u32 {
		top_k.saturating_mul(self.candidate_multiplier).max(self.candidate_floor)
	}

	/// Rows kept per index after the narrowing predicates run.
	pub fn limit(&self, top_k: u32) -> u32 {
		top_k.saturating_mul(self.limit_multiplier).max(self.limit_floor)
	}
}
impl Default for Oversampling {
	fn default() -> Self {
		Self { candidate_multiplier: 10, candidate_floor: 100, limit_multiplier: 5, limit_floor: 50 }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tools {
	/// Map keys are registered tool names, e.g. "search_knowledge".
	pub descriptions: HashMap<String, String>,
}
impl Tools {
	pub fn description(&self, tool_name: &str) -> Option<&str> {
		self.descriptions.get(tool_name).map(String::as_str)
	}
}

fn default_rerank_api_key_env() -> String {
	"FOLIO_RERANK_API_KEY".to_string()
}

fn default_rerank_model() -> String {
	"rerank-english-v3.0".to_string()
}
