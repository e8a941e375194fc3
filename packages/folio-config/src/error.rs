use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read folio config {}: {source}", path.display())]
	ReadConfig {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("Invalid TOML in folio config {}: {source}", path.display())]
	ParseConfig {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
	/// A value parsed but is unusable, e.g. an empty index name or a zero `top_k`.
	#[error("Invalid folio config: {message}")]
	Validation { message: String },
}
