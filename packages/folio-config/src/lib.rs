mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_HYBRID_BOOST, EmbeddingProviderConfig, Graph, GraphIndexes, Oversampling,
	Providers, RerankProviderConfig, Search, Service, Tools,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, value) in [
		("graph.url", &cfg.graph.url),
		("graph.database", &cfg.graph.database),
		("graph.username", &cfg.graph.username),
		("graph.indexes.project", &cfg.graph.indexes.project),
		("graph.indexes.employment", &cfg.graph.indexes.employment),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.graph.indexes.project == cfg.graph.indexes.employment {
		return Err(Error::Validation {
			message: "graph.indexes.project and graph.indexes.employment must differ.".to_string(),
		});
	}
	if cfg.graph.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "graph.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider embedding api_key must be non-empty.".to_string(),
		});
	}

	if let Some(rerank) = cfg.providers.rerank.as_ref() {
		if rerank.model.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.rerank.model must be non-empty.".to_string(),
			});
		}
		if rerank.api_key.is_none() && rerank.api_key_env.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.rerank.api_key_env must be non-empty when api_key is unset."
					.to_string(),
			});
		}
	}

	let search = &cfg.search;

	if search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if search.max_top_k < search.top_k {
		return Err(Error::Validation {
			message: "search.max_top_k must be greater than or equal to search.top_k.".to_string(),
		});
	}
	if !search.hybrid_boost.is_finite() {
		return Err(Error::Validation {
			message: "search.hybrid_boost must be a finite number.".to_string(),
		});
	}
	if search.hybrid_boost <= 0.0 {
		return Err(Error::Validation {
			message: "search.hybrid_boost must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("search.oversampling.candidate_multiplier", search.oversampling.candidate_multiplier),
		("search.oversampling.candidate_floor", search.oversampling.candidate_floor),
		("search.oversampling.limit_multiplier", search.oversampling.limit_multiplier),
		("search.oversampling.limit_floor", search.oversampling.limit_floor),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (name, description) in &cfg.tools.descriptions {
		if description.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("tools.descriptions.{name} must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.graph.password.as_deref().map(|password| password.is_empty()).unwrap_or(false) {
		cfg.graph.password = None;
	}
	if let Some(rerank) = cfg.providers.rerank.as_mut()
		&& rerank.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		rerank.api_key = None;
	}
}
