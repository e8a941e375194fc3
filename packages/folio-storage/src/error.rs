#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("Graph query failed with {code}: {message}")]
	Query { code: String, message: String },
	#[error("Invalid graph response: {0}")]
	InvalidResponse(String),
}
