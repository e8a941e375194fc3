//! Coercion of raw graph rows into [`SearchResult`].
//!
//! Backends disagree on how they encode the same logical field: numbers arrive as JSON numbers,
//! as 64-bit integers split into `{ low, high }` halves, or as text; dates arrive as strings or
//! as `{ year, month, day, ... }` objects. Everything here is total: malformed input degrades to
//! a default instead of failing the row.

use serde_json::{Map, Value};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::result::{CodeSnippet, DEFAULT_RESULT_TYPE, MatchType, SearchResult};

pub type Row = Map<String, Value>;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// The representations a numeric field may take in a raw row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue<'a> {
	Number(f64),
	/// A 64-bit integer encoded as two signed 32-bit halves.
	Int64 { low: i64, high: i64 },
	Text(&'a str),
	Other(&'a Value),
}
impl<'a> NumericValue<'a> {
	pub fn classify(value: &'a Value) -> Self {
		match value {
			Value::Number(number) => match number.as_f64() {
				Some(number) => Self::Number(number),
				None => Self::Other(value),
			},
			Value::String(text) => Self::Text(text),
			Value::Object(fields) => {
				let low = fields.get("low").and_then(Value::as_i64);
				let high = fields.get("high").and_then(Value::as_i64);

				match (low, high) {
					(Some(low), Some(high)) => Self::Int64 { low, high },
					_ => Self::Other(value),
				}
			},
			_ => Self::Other(value),
		}
	}

	/// Always finite; anything that cannot be read as a number becomes `0.0`.
	pub fn to_f64(self) -> f64 {
		let number = match self {
			Self::Number(number) => number,
			Self::Int64 { low, high } => (high as f64) * TWO_POW_32 + f64::from(low as i32 as u32),
			Self::Text(text) => parse_number(text),
			Self::Other(value) => parse_number(&value.to_string()),
		};

		if number.is_finite() { number } else { 0.0 }
	}
}

pub fn coerce_number(value: Option<&Value>) -> f64 {
	match value {
		None | Some(Value::Null) => 0.0,
		Some(value) => NumericValue::classify(value).to_f64(),
	}
}

pub fn coerce_optional_number(value: Option<&Value>) -> Option<f64> {
	match value {
		None | Some(Value::Null) => None,
		Some(value) => Some(NumericValue::classify(value).to_f64()),
	}
}

/// Renders a date-like value as ISO-8601.
///
/// Date objects become `YYYY-MM-DD`; objects that also carry a time of day become RFC 3339.
/// Strings pass through untouched and other non-null values are stringified.
pub fn coerce_date(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(text)) => text.clone(),
		Some(Value::Object(fields)) => date_object_to_iso(fields).unwrap_or_else(|| {
			Value::Object(fields.clone()).to_string()
		}),
		Some(other) => other.to_string(),
	}
}

pub fn normalize_row(row: &Row, match_type: MatchType, max_code_snippets: usize) -> SearchResult {
	SearchResult {
		id: coerce_id(row.get("id")),
		title: coerce_string(row.get("title")),
		description: coerce_string(row.get("description")),
		role: coerce_string(row.get("role")),
		impact: coerce_optional_string(row.get("impact")),
		completed_date: coerce_date(row.get("completedDate")),
		complexity: coerce_optional_number(row.get("complexity")),
		file_count: coerce_optional_number(row.get("fileCount")),
		live_url: coerce_optional_string(row.get("liveUrl")),
		github_url: coerce_optional_string(row.get("githubUrl")),
		technologies: coerce_string_list(row.get("technologies")),
		skills: coerce_string_list(row.get("skills")),
		patterns: coerce_string_list(row.get("patterns")),
		code_snippets: coerce_code_snippets(row.get("codeSnippets"), max_code_snippets),
		company: coerce_optional_string(row.get("company")),
		position: coerce_optional_string(row.get("position")),
		achievements: match row.get("achievements") {
			None | Some(Value::Null) => None,
			value => Some(coerce_string_list(value)),
		},
		score: coerce_number(row.get("score")),
		match_type,
		result_type: coerce_optional_string(row.get("resultType"))
			.unwrap_or_else(|| DEFAULT_RESULT_TYPE.to_string()),
	}
}

fn parse_number(text: &str) -> f64 {
	text.trim().parse::<f64>().unwrap_or(0.0)
}

fn coerce_id(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(text)) => text.clone(),
		Some(value) => match NumericValue::classify(value) {
			NumericValue::Int64 { low, high } => ((high << 32) | i64::from(low as u32)).to_string(),
			_ => value.to_string(),
		},
	}
}

fn coerce_string(value: Option<&Value>) -> String {
	coerce_optional_string(value).unwrap_or_default()
}

fn coerce_optional_string(value: Option<&Value>) -> Option<String> {
	let text = match value? {
		Value::Null => return None,
		Value::String(text) => text.clone(),
		other => other.to_string(),
	};

	if text.trim().is_empty() { None } else { Some(text) }
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
	let Some(Value::Array(items)) = value else {
		return Vec::new();
	};

	items.iter().filter_map(|item| coerce_optional_string(Some(item))).collect()
}

fn coerce_code_snippets(value: Option<&Value>, max: usize) -> Option<Vec<CodeSnippet>> {
	let items = match value? {
		Value::Array(items) => items,
		_ => return None,
	};
	let snippets = items
		.iter()
		.filter_map(|item| match item {
			Value::String(code) => Some(CodeSnippet { code: code.clone(), ..Default::default() }),
			Value::Object(fields) => Some(CodeSnippet {
				language: coerce_string(fields.get("language")),
				code: coerce_optional_string(fields.get("code"))?,
				description: coerce_optional_string(fields.get("description")),
				file_path: coerce_optional_string(fields.get("filePath")),
			}),
			_ => None,
		})
		.take(max)
		.collect();

	Some(snippets)
}

fn date_object_to_iso(fields: &Map<String, Value>) -> Option<String> {
	let component = |key: &str| fields.get(key).map(|value| coerce_number(Some(value)) as i64);
	let year = i32::try_from(component("year")?).ok()?;
	let month = Month::try_from(u8::try_from(component("month")?).ok()?).ok()?;
	let day = u8::try_from(component("day")?).ok()?;
	let date = Date::from_calendar_date(year, month, day).ok()?;
	let Some(hour) = component("hour") else {
		return Some(date.to_string());
	};
	let time = Time::from_hms_nano(
		u8::try_from(hour).ok()?,
		u8::try_from(component("minute").unwrap_or(0)).ok()?,
		u8::try_from(component("second").unwrap_or(0)).ok()?,
		u32::try_from(component("nanosecond").unwrap_or(0)).ok()?,
	)
	.ok()?;
	let offset_seconds = i32::try_from(component("timeZoneOffsetSeconds").unwrap_or(0)).ok()?;
	let offset = UtcOffset::from_whole_seconds(offset_seconds).ok()?;
	let datetime: OffsetDateTime = PrimitiveDateTime::new(date, time).assume_offset(offset);

	datetime.format(&time::format_description::well_known::Rfc3339).ok()
}
