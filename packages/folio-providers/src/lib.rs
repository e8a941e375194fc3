pub mod embedding;
pub mod rerank;

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Bearer credential plus the provider's extra headers. Non-string header values are rejected.
pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::with_capacity(default_headers.len() + 1);

	headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {api_key}"))?);

	for (name, value) in default_headers {
		let value = value
			.as_str()
			.ok_or_else(|| eyre::eyre!("Default header {name} must be a string."))?;

		headers.insert(HeaderName::from_bytes(name.as_bytes())?, HeaderValue::from_str(value)?);
	}

	Ok(headers)
}

/// POSTs `body` and returns the decoded JSON reply. Non-2xx statuses are errors.
pub(crate) async fn post_json<B>(
	timeout_ms: u64,
	url: String,
	headers: HeaderMap,
	body: &B,
) -> Result<Value>
where
	B: Serialize + ?Sized,
{
	let client = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
	let res = client.post(url).headers(headers).json(body).send().await?;

	Ok(res.error_for_status()?.json().await?)
}

pub(crate) fn endpoint(api_base: &str, path: &str) -> String {
	format!("{}{}", api_base.trim_end_matches('/'), path)
}
