use std::sync::Arc;

use crate::RerankProvider;
use folio_config::{Config, RerankProviderConfig};
use folio_domain::{SearchResult, build_rerank_document};

/// Whether a rerank call can be attempted for this invocation.
#[derive(Clone)]
pub enum RerankCapability {
	Available { provider: Arc<dyn RerankProvider>, cfg: RerankProviderConfig, api_key: String },
	Unavailable { reason: &'static str },
}
impl RerankCapability {
	pub fn resolve(cfg: &Config, provider: Arc<dyn RerankProvider>) -> Self {
		Self::resolve_with(cfg, provider, |name| std::env::var(name).ok())
	}

	/// Like [`RerankCapability::resolve`] with an injectable environment lookup.
	pub fn resolve_with<F>(cfg: &Config, provider: Arc<dyn RerankProvider>, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let Some(rerank_cfg) = cfg.providers.rerank.as_ref() else {
			return Self::Unavailable { reason: "no rerank provider is configured" };
		};
		let api_key = rerank_cfg
			.api_key
			.clone()
			.or_else(|| lookup(&rerank_cfg.api_key_env))
			.filter(|key| !key.trim().is_empty());

		match api_key {
			Some(api_key) => Self::Available { provider, cfg: rerank_cfg.clone(), api_key },
			None => Self::Unavailable { reason: "no rerank credential is available" },
		}
	}

	pub fn is_available(&self) -> bool {
		matches!(self, Self::Available { .. })
	}
}

/// Reorders `results` by relevance to `query`, keeping at most `top_n`.
///
/// Disabled reranking, an empty list or a list already within `top_n` is returned untouched. When
/// the capability is unavailable or the provider fails, the first `top_n` results are kept in
/// their fused order.
pub async fn rerank_results(
	capability: &RerankCapability,
	query: &str,
	mut results: Vec<SearchResult>,
	top_n: usize,
	enabled: bool,
) -> Vec<SearchResult> {
	if !enabled || results.is_empty() || results.len() <= top_n {
		return results;
	}

	let (provider, cfg, api_key) = match capability {
		RerankCapability::Available { provider, cfg, api_key } => (provider, cfg, api_key),
		RerankCapability::Unavailable { reason } => {
			tracing::warn!(reason, "Rerank unavailable. Keeping fused order.");

			results.truncate(top_n);

			return results;
		},
	};
	let docs: Vec<String> = results.iter().map(build_rerank_document).collect();

	match provider.rerank(cfg, api_key, query, &docs, top_n).await {
		Ok(order) => match reorder(&mut results, &order, top_n) {
			Some(reordered) => reordered,
			None => {
				tracing::warn!(
					candidates = results.len(),
					"Rerank returned unusable indexes. Keeping fused order."
				);

				results.truncate(top_n);

				results
			},
		},
		Err(err) => {
			tracing::warn!(error = %err, "Rerank failed. Keeping fused order.");

			results.truncate(top_n);

			results
		},
	}
}

/// Moves the results named by `order` out of `results`. Repeated indexes are skipped. Returns
/// `None`, leaving `results` untouched, when an index is out of range or nothing was selected.
fn reorder(
	results: &mut Vec<SearchResult>,
	order: &[usize],
	top_n: usize,
) -> Option<Vec<SearchResult>> {
	if order.is_empty() || order.iter().any(|&index| index >= results.len()) {
		return None;
	}

	let mut slots: Vec<Option<SearchResult>> = results.drain(..).map(Some).collect();

	Some(order.iter().filter_map(|&index| slots[index].take()).take(top_n).collect())
}
