use std::sync::Arc;

use folio_service::FolioService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FolioService>,
}
impl AppState {
	pub fn new(config: folio_config::Config) -> color_eyre::Result<Self> {
		let service = FolioService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: FolioService) -> Self {
		Self { service: Arc::new(service) }
	}
}
