use std::sync::Arc;

use serde::Serialize;

use crate::{
	GraphSelection, OptionsResolver, Result, SearchContext, SearchRequest, SearchTool,
	SearchToolArgs, StrategySelector, VectorFilters, create_search_tool,
};
use folio_domain::{MatchType, StrategyKey, classify_intent};

/// Name of the tool that classifies intent when no strategy is given.
pub const SEARCH_KNOWLEDGE: &str = "search_knowledge";

const SEARCH_KNOWLEDGE_DESCRIPTION: &str = "Search the knowledge graph with a natural-language \
	query. Combines semantic similarity with a graph strategy chosen from the query, or from \
	strategyKey when given.";

/// Tool metadata as advertised to callers.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
	pub name: String,
	pub description: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub strategy: Option<StrategyKey>,
}

pub struct ToolRegistry {
	tools: Vec<SearchTool>,
}
impl ToolRegistry {
	/// Registers `search_knowledge` and one `search_<strategy>` tool per strategy key.
	pub fn new(ctx: Arc<SearchContext>) -> Self {
		let mut tools = Vec::with_capacity(StrategyKey::ALL.len() + 1);

		tools.push(create_search_tool(ctx.clone(), SearchToolArgs {
			name: SEARCH_KNOWLEDGE.to_string(),
			description: describe(&ctx, SEARCH_KNOWLEDGE, SEARCH_KNOWLEDGE_DESCRIPTION),
			strategy: None,
			select: classifying_selector(ctx.clone()),
			top_k: None,
			options: Some(request_filters()),
			graph_match_type: MatchType::Graph,
		}));

		for key in StrategyKey::ALL {
			let name = tool_name(key);
			let description = describe(&ctx, &name, ctx.registry.get(key).description);

			tools.push(create_search_tool(ctx.clone(), SearchToolArgs {
				name,
				description,
				strategy: Some(key),
				select: fixed_selector(ctx.clone(), key),
				top_k: None,
				options: narrows_projects(key).then(request_filters),
				graph_match_type: MatchType::Template,
			}));
		}

		Self { tools }
	}

	pub fn get(&self, name: &str) -> Option<&SearchTool> {
		self.tools.iter().find(|tool| tool.name() == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &SearchTool> {
		self.tools.iter()
	}

	pub fn len(&self) -> usize {
		self.tools.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tools.is_empty()
	}

	pub fn descriptors(&self) -> Vec<ToolDescriptor> {
		self.iter()
			.map(|tool| ToolDescriptor {
				name: tool.name().to_string(),
				description: tool.description().to_string(),
				strategy: tool.strategy(),
			})
			.collect()
	}
}

pub fn tool_name(key: StrategyKey) -> String {
	format!("search_{}", key.as_str())
}

fn describe(ctx: &SearchContext, name: &str, fallback: &str) -> String {
	ctx.cfg.tools.description(name).unwrap_or(fallback).to_string()
}

/// Work-history tools search roles rather than projects, so the project filters do not apply.
fn narrows_projects(key: StrategyKey) -> bool {
	!matches!(
		key,
		StrategyKey::Employment
			| StrategyKey::Achievement
			| StrategyKey::Education
			| StrategyKey::Leadership
	)
}

fn select(ctx: &SearchContext, key: StrategyKey, query: &str, top_k: u32) -> GraphSelection {
	GraphSelection {
		strategy: key,
		template: ctx.registry.get(key).query.clone(),
		params: ctx.registry.params(key, query, top_k),
	}
}

fn classifying_selector(ctx: Arc<SearchContext>) -> StrategySelector {
	Arc::new(move |request: &SearchRequest, top_k: u32| -> Result<GraphSelection> {
		let key = match request.explicit_strategy()? {
			Some(key) => key,
			None => classify_intent(&request.query),
		};

		Ok(select(&ctx, key, &request.query, top_k))
	})
}

fn fixed_selector(ctx: Arc<SearchContext>, key: StrategyKey) -> StrategySelector {
	Arc::new(move |request: &SearchRequest, top_k: u32| -> Result<GraphSelection> {
		Ok(select(&ctx, key, &request.query, top_k))
	})
}

fn request_filters() -> OptionsResolver {
	Arc::new(|request: &SearchRequest| {
		VectorFilters::from_options(request.search_options.as_ref())
	})
}
