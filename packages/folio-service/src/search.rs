use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{Error, Result};
use folio_domain::{SearchResult, StrategyKey};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub query: String,
	pub embedding_model_name: String,
	#[serde(default)]
	pub top_k: Option<i64>,
	/// Explicit strategy selection; when absent the query text is classified.
	#[serde(default)]
	pub strategy_key: Option<String>,
	#[serde(default)]
	pub search_options: Option<SearchOptions>,
}
impl SearchRequest {
	pub fn new(query: impl Into<String>, embedding_model_name: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			embedding_model_name: embedding_model_name.into(),
			..Default::default()
		}
	}

	/// Checks the fields every tool depends on.
	pub(crate) fn validate(&self) -> Result<()> {
		if self.query.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}
		if self.embedding_model_name.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "embeddingModelName must be non-empty.".to_string(),
			});
		}
		if let Some(range) =
			self.search_options.as_ref().and_then(|options| options.date_range.as_ref())
		{
			range.parse()?;
		}

		Ok(())
	}

	pub(crate) fn explicit_strategy(&self) -> Result<Option<StrategyKey>> {
		self.strategy_key
			.as_deref()
			.map(|raw| {
				raw.parse::<StrategyKey>()
					.map_err(|err| Error::InvalidRequest { message: err.to_string() })
			})
			.transpose()
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
	#[serde(default)]
	pub include_code: Option<bool>,
	#[serde(default)]
	pub min_complexity: Option<f64>,
	#[serde(default)]
	pub date_range: Option<DateRange>,
	#[serde(default)]
	pub technologies: Option<Vec<String>>,
}

/// Inclusive ISO-8601 date bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateRange {
	pub start: String,
	pub end: String,
}
impl DateRange {
	pub(crate) fn parse(&self) -> Result<(Date, Date)> {
		let start = parse_date("dateRange.start", &self.start)?;
		let end = parse_date("dateRange.end", &self.end)?;

		if start > end {
			return Err(Error::InvalidRequest {
				message: "dateRange.start must not be after dateRange.end.".to_string(),
			});
		}

		Ok((start, end))
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
	pub query: String,
	pub results: Vec<SearchResult>,
	pub result_count: usize,
}

fn parse_date(label: &str, raw: &str) -> Result<Date> {
	let raw = raw.trim();

	if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
		return Ok(date);
	}

	OffsetDateTime::parse(raw, &Rfc3339).map(OffsetDateTime::date).map_err(|_| {
		Error::InvalidRequest { message: format!("{label} must be an ISO-8601 date, got {raw:?}.") }
	})
}
