use serde::{Deserialize, Serialize};

/// Provenance of a result: which retrieval path(s) produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
	Semantic,
	#[default]
	Graph,
	Hybrid,
	Template,
}
impl MatchType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Semantic => "semantic",
			Self::Graph => "graph",
			Self::Hybrid => "hybrid",
			Self::Template => "template",
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
	#[serde(default)]
	pub language: String,
	pub code: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_path: Option<String>,
}

/// One retrieved entity in its canonical shape.
///
/// `score` is an opaque ranking signal produced by fusion. It is not a probability and is not
/// comparable across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
	pub id: String,
	pub title: String,
	pub description: String,
	pub role: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub impact: Option<String>,
	pub completed_date: String,
	pub complexity: Option<f64>,
	pub file_count: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub live_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub github_url: Option<String>,
	pub technologies: Vec<String>,
	pub skills: Vec<String>,
	pub patterns: Vec<String>,
	/// Always serialized so the payload shape does not depend on the include-code flag.
	pub code_snippets: Option<Vec<CodeSnippet>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub company: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub position: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub achievements: Option<Vec<String>>,
	pub score: f64,
	pub match_type: MatchType,
	pub result_type: String,
}
impl Default for SearchResult {
	fn default() -> Self {
		Self {
			id: String::new(),
			title: String::new(),
			description: String::new(),
			role: String::new(),
			impact: None,
			completed_date: String::new(),
			complexity: None,
			file_count: None,
			live_url: None,
			github_url: None,
			technologies: Vec::new(),
			skills: Vec::new(),
			patterns: Vec::new(),
			code_snippets: None,
			company: None,
			position: None,
			achievements: None,
			score: 0.0,
			match_type: MatchType::default(),
			result_type: DEFAULT_RESULT_TYPE.to_string(),
		}
	}
}

pub const DEFAULT_RESULT_TYPE: &str = "project";
