pub mod cypher;
pub mod document;
pub mod merge;
pub mod normalize;
pub mod result;
pub mod strategy;

pub use document::build_rerank_document;
pub use merge::merge_results;
pub use normalize::{NumericValue, Row, coerce_date, coerce_number, normalize_row};
pub use result::{CodeSnippet, MatchType, SearchResult};
pub use strategy::{
	QueryTemplate, StrategyDefinition, StrategyKey, StrategyRegistry, UnknownStrategyKey,
	VectorIndexKind, classify_intent, query_keywords,
};
