//! Error types shared by the API client, loader and configuration.

use thiserror::Error;

/// Failures talking to the people API.
#[derive(Debug, Error)]
pub enum ApiError {
	/// Transport-level failure (network down, CORS, aborted request...).
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),
	/// The server answered with a non-success status.
	#[error("{url} returned HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Requested URL.
		url: String,
	},
	/// The body could not be decoded into the expected records.
	#[error("failed to decode response from {url}: {message}")]
	Decode {
		/// Requested URL.
		url: String,
		/// Decoder error text.
		message: String,
	},
}

/// The two user-visible ways a person page can fail to load.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The subject identifier has no matching record.
	#[error("no person with id {id:?}")]
	NotFound {
		/// The identifier that was looked up.
		id: String,
	},
	/// One of the underlying fetches failed.
	#[error("failed to load person network: {0}")]
	Failed(#[from] ApiError),
}

impl LoadError {
	/// True for the "not found" kind.
	pub fn is_not_found(&self) -> bool {
		matches!(self, LoadError::NotFound { .. })
	}
}

/// Malformed application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The config element does not hold valid JSON for [`crate::config::AppConfig`].
	#[error("invalid configuration JSON: {0}")]
	Json(#[from] serde_json::Error),
}
