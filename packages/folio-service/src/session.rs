use serde_json::{Map, Value};
use tokio::runtime::Handle;

use crate::{Error, GraphSession, GraphSessionProvider, Result};
use folio_domain::{QueryTemplate, Row};

/// Owns one graph session for the lifetime of a retrieval branch.
///
/// Call [`SessionGuard::release`] on every normal exit. If the guard is dropped instead (the branch
/// panicked or its task was aborted) the close is handed to the runtime.
pub(crate) struct SessionGuard {
	session: Option<Box<dyn GraphSession>>,
}
impl SessionGuard {
	pub(crate) async fn open(provider: &dyn GraphSessionProvider) -> Result<Self> {
		let session = provider.open().await?;

		Ok(Self { session: Some(session) })
	}

	pub(crate) async fn execute(
		&mut self,
		query: &QueryTemplate,
		params: &Map<String, Value>,
	) -> Result<Vec<Row>> {
		let Some(session) = self.session.as_mut() else {
			return Err(Error::connection_init("Graph session is already released."));
		};

		session.execute(query, params).await
	}

	/// Closes the session. Close failures are logged, never returned.
	pub(crate) async fn release(mut self) {
		if let Some(session) = self.session.take() {
			close_logged(session).await;
		}
	}
}
impl Drop for SessionGuard {
	fn drop(&mut self) {
		let Some(session) = self.session.take() else {
			return;
		};

		match Handle::try_current() {
			Ok(handle) => {
				handle.spawn(close_logged(session));
			},
			Err(_) => {
				tracing::warn!("Graph session dropped outside a runtime; it was not closed.");
			},
		}
	}
}

async fn close_logged(session: Box<dyn GraphSession>) {
	if let Err(err) = session.close().await {
		tracing::warn!(error = %err, "Failed to close graph session.");
	}
}
