use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use folio_service::{Error, SearchRequest, SearchResponse, ToolDescriptor};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/tools", get(tools))
		.route("/v1/search", post(search))
		.route("/v1/tools/{name}", post(call_tool))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
	tools: Vec<ToolDescriptor>,
}

async fn tools(State(state): State<AppState>) -> Json<ToolsResponse> {
	Json(ToolsResponse { tools: state.service.tools().descriptors() })
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(request) = payload?;
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn call_tool(
	State(state): State<AppState>,
	Path(name): Path<String>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	if state.service.tools().get(&name).is_none() {
		return Err(Error::UnknownTool { name }.into());
	}

	let Json(request) = payload?;
	let response = state.service.call_tool(&name, request).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::UnknownTool { .. } => Self::new(StatusCode::NOT_FOUND, "unknown_tool", message),
			Error::ConnectionInit { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "connection_failed", message),
			Error::QueryExecution { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "query_failed", message),
			Error::VectorSearch { .. } =>
				Self::new(StatusCode::BAD_GATEWAY, "vector_search_failed", message),
			Error::Provider { .. } => Self::new(StatusCode::BAD_GATEWAY, "provider_failed", message),
			Error::Task { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message),
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", err.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_server_error() {
			tracing::error!(
				status = self.status.as_u16(),
				error_code = self.error_code,
				message = %self.message,
				"Request failed."
			);
		}

		let body = ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
