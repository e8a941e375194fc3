use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cypher;

/// Keyword groups tested in order by [`classify_intent`]. The first group with a hit wins, so
/// "work experience with react" resolves to employment before technology is considered.
const INTENT_KEYWORDS: [(StrategyKey, &[&str]); 8] = [
	(
		StrategyKey::Employment,
		&[
			"experience",
			"employment",
			"employer",
			"job",
			"worked",
			"work at",
			"work history",
			"company",
			"companies",
			"career",
			"position",
			"role at",
		],
	),
	(
		StrategyKey::Achievement,
		&["achievement", "accomplish", "award", "impact", "proud", "success", "metric"],
	),
	(
		StrategyKey::Education,
		&[
			"education",
			"degree",
			"university",
			"college",
			"school",
			"studied",
			"certification",
			"certificate",
			"course",
		],
	),
	(StrategyKey::Leadership, &["leadership", "lead", "mentor", "manage", "team"]),
	(
		StrategyKey::Technology,
		&[
			"technology",
			"technologies",
			"tech stack",
			"framework",
			"language",
			"library",
			"database",
			"react",
			"typescript",
			"javascript",
			"python",
			"rust",
			"node",
			"next.js",
			"graphql",
			"postgres",
			"neo4j",
			"docker",
			"kubernetes",
			"aws",
		],
	),
	(StrategyKey::Skill, &["skill", "abilities", "ability", "expertise", "proficient", "good at"]),
	(
		StrategyKey::Pattern,
		&["pattern", "architecture", "microservice", "event-driven", "mvc", "design approach"],
	),
	(
		StrategyKey::General,
		&["code", "project", "built", "build", "implementation", "example", "github", "repo"],
	),
];

const STOP_WORDS: &[&str] = &[
	"a", "about", "an", "and", "any", "are", "as", "at", "be", "by", "can", "did", "do", "does",
	"for", "from", "has", "have", "how", "i", "in", "is", "it", "me", "of", "on", "or", "show",
	"tell", "that", "the", "their", "them", "there", "they", "this", "to", "used", "using", "was",
	"were", "what", "when", "where", "which", "who", "with", "you", "your",
];

/// Substrings of achievement text that signal leadership.
const LEADERSHIP_TERMS: &[&str] = &["lead", "mentor", "manag", "coach", "team", "hired", "onboard"];

const LEADERSHIP_SKILL_CATEGORY: &str = "leadership";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKey {
	Technology,
	Skill,
	Pattern,
	Employment,
	Achievement,
	Education,
	Leadership,
	General,
}
impl StrategyKey {
	pub const ALL: [Self; 8] = [
		Self::Technology,
		Self::Skill,
		Self::Pattern,
		Self::Employment,
		Self::Achievement,
		Self::Education,
		Self::Leadership,
		Self::General,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Technology => "technology",
			Self::Skill => "skill",
			Self::Pattern => "pattern",
			Self::Employment => "employment",
			Self::Achievement => "achievement",
			Self::Education => "education",
			Self::Leadership => "leadership",
			Self::General => "general",
		}
	}

	fn index(self) -> usize {
		self as usize
	}

	fn description(self) -> &'static str {
		match self {
			Self::Technology =>
				"Find projects by the technologies, languages and frameworks they were built with.",
			Self::Skill => "Find projects that demonstrate a particular skill.",
			Self::Pattern =>
				"Find projects that implement an architectural or design pattern.",
			Self::Employment =>
				"Search work history: companies, positions and what was done there.",
			Self::Achievement => "Search notable achievements and measurable impact from past roles.",
			Self::Education => "Search degrees, institutions, courses and certifications.",
			Self::Leadership => "Find roles that involved leading, mentoring or managing people.",
			Self::General => "General search across projects by title and description.",
		}
	}

	fn template(self) -> String {
		match self {
			Self::Technology =>
				cypher::project_by_relation(cypher::REL_USES_TECHNOLOGY, cypher::LABEL_TECHNOLOGY),
			Self::Skill =>
				cypher::project_by_relation(cypher::REL_DEMONSTRATES_SKILL, cypher::LABEL_SKILL),
			Self::Pattern =>
				cypher::project_by_relation(cypher::REL_IMPLEMENTS_PATTERN, cypher::LABEL_PATTERN),
			Self::Employment => cypher::employment_by_text(),
			Self::Achievement => cypher::employment_by_achievement(),
			Self::Education => cypher::education_by_text(),
			Self::Leadership => cypher::employment_by_leadership(),
			Self::General => cypher::project_general(),
		}
	}

	/// Bound values a template needs beyond the common `query`, `keywords` and `limit`.
	fn extra_params(self, params: &mut Map<String, Value>) {
		if self == Self::Leadership {
			params.insert(
				cypher::PARAM_LEADERSHIP_TERMS.to_string(),
				Value::from(LEADERSHIP_TERMS.to_vec()),
			);
			params.insert(
				cypher::PARAM_SKILL_CATEGORY.to_string(),
				Value::from(LEADERSHIP_SKILL_CATEGORY),
			);
		}
	}
}
impl fmt::Display for StrategyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for StrategyKey {
	type Err = UnknownStrategyKey;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let normalized = raw.trim().to_lowercase();

		Self::ALL
			.into_iter()
			.find(|key| key.as_str() == normalized)
			.ok_or_else(|| UnknownStrategyKey(raw.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy key {0:?}; expected one of technology, skill, pattern, employment, achievement, education, leadership, general.")]
pub struct UnknownStrategyKey(pub String);

/// Query text assembled from trusted constants. It cannot be built from request data outside
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate(Arc<str>);
impl QueryTemplate {
	pub(crate) fn new(text: String) -> Self {
		Self(Arc::from(text))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

#[derive(Debug, Clone)]
pub struct StrategyDefinition {
	pub key: StrategyKey,
	pub description: &'static str,
	pub query: QueryTemplate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorIndexKind {
	Project,
	Employment,
}
impl VectorIndexKind {
	pub const ALL: [Self; 2] = [Self::Project, Self::Employment];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Project => "project",
			Self::Employment => "employment",
		}
	}
}

/// Read-only table of every query the engine can run. Build once and share.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
	strategies: Vec<StrategyDefinition>,
	project_vector: QueryTemplate,
	employment_vector: QueryTemplate,
}
impl StrategyRegistry {
	pub fn new() -> Self {
		let strategies = StrategyKey::ALL
			.into_iter()
			.map(|key| StrategyDefinition {
				key,
				description: key.description(),
				query: QueryTemplate::new(key.template()),
			})
			.collect();

		Self {
			strategies,
			project_vector: QueryTemplate::new(cypher::project_vector_search()),
			employment_vector: QueryTemplate::new(cypher::employment_vector_search()),
		}
	}

	pub fn get(&self, key: StrategyKey) -> &StrategyDefinition {
		&self.strategies[key.index()]
	}

	pub fn iter(&self) -> impl Iterator<Item = &StrategyDefinition> {
		self.strategies.iter()
	}

	pub fn vector_query(&self, kind: VectorIndexKind) -> &QueryTemplate {
		match kind {
			VectorIndexKind::Project => &self.project_vector,
			VectorIndexKind::Employment => &self.employment_vector,
		}
	}

	/// Parameters for a strategy template. The raw query text is bound as-is.
	pub fn params(&self, key: StrategyKey, query: &str, limit: u32) -> Map<String, Value> {
		let mut params = Map::new();

		params.insert(cypher::PARAM_QUERY.to_string(), Value::from(query));
		params.insert(cypher::PARAM_KEYWORDS.to_string(), Value::from(query_keywords(query)));
		params.insert(cypher::PARAM_LIMIT.to_string(), Value::from(limit));

		key.extra_params(&mut params);

		params
	}
}
impl Default for StrategyRegistry {
	fn default() -> Self {
		Self::new()
	}
}

pub fn classify_intent(query: &str) -> StrategyKey {
	let lowered = query.to_lowercase();
	let terms: Vec<&str> = terms(&lowered).collect();
	let joined = format!(" {} ", terms.join(" "));

	INTENT_KEYWORDS
		.iter()
		.find(|(_, keywords)| {
			keywords.iter().any(|keyword| matches_keyword(&terms, &joined, keyword))
		})
		.map(|(key, _)| *key)
		.unwrap_or(StrategyKey::General)
}

/// Lowercased, de-duplicated query terms with stop words removed.
pub fn query_keywords(query: &str) -> Vec<String> {
	let lowered = query.to_lowercase();
	let mut keywords: Vec<String> = Vec::new();

	for term in terms(&lowered) {
		if term.chars().count() < 2 || STOP_WORDS.contains(&term) {
			continue;
		}
		if keywords.iter().any(|existing| existing == term) {
			continue;
		}

		keywords.push(term.to_string());
	}

	keywords
}

fn terms(lowered: &str) -> impl Iterator<Item = &str> {
	lowered
		.split(|ch: char| !(ch.is_alphanumeric() || matches!(ch, '.' | '+' | '#' | '-')))
		.map(|term| term.trim_matches(|ch: char| matches!(ch, '.' | '-')))
		.filter(|term| !term.is_empty())
}

/// Words match at the start of a term, so "lead" finds "leading" but not "misleading". Phrases
/// match starting on a term boundary.
fn matches_keyword(terms: &[&str], joined: &str, keyword: &str) -> bool {
	if keyword.contains(' ') {
		joined.contains(&format!(" {keyword}"))
	} else {
		terms.iter().any(|term| term.starts_with(keyword))
	}
}
