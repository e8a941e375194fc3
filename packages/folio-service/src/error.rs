pub type Result<T, E = Error> = std::result::Result<T, E>;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unknown tool: {name}")]
	UnknownTool { name: String },
	#[error("Graph connection failed: {message}")]
	ConnectionInit { message: String },
	#[error("Graph query failed: {message}")]
	QueryExecution { message: String },
	#[error("Vector search failed: {message}")]
	VectorSearch { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Task failed: {message}")]
	Task { message: String },
}
impl Error {
	pub fn connection_init(message: impl Into<String>) -> Self {
		Self::ConnectionInit { message: or_unknown(message.into()) }
	}

	pub fn query_execution(message: impl Into<String>) -> Self {
		Self::QueryExecution { message: or_unknown(message.into()) }
	}

	pub fn vector_search(message: impl Into<String>) -> Self {
		Self::VectorSearch { message: or_unknown(message.into()) }
	}
}
impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: or_unknown(err.to_string()) }
	}
}

fn or_unknown(message: String) -> String {
	if message.trim().is_empty() { UNKNOWN_ERROR.to_string() } else { message }
}
