//! Application configuration, read from the host page at startup.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

use crate::error::ConfigError;

/// Id of the inline `<script type="application/json">` element holding the config.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

const DEFAULT_API_BASE_URL: &str = "/api";

fn default_api_base_url() -> String {
	DEFAULT_API_BASE_URL.to_string()
}

/// Runtime settings for the application.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	/// Base URL of the people API, without a trailing slash.
	#[serde(default = "default_api_base_url")]
	pub api_base_url: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: default_api_base_url(),
		}
	}
}

impl AppConfig {
	/// Parse configuration from JSON, filling in defaults for missing keys.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let mut config: AppConfig = serde_json::from_str(json)?;
		config.normalize();
		Ok(config)
	}

	/// Load the configuration from the host page, falling back to defaults.
	///
	/// A relative API base URL is resolved against the page origin, since the
	/// HTTP client only accepts absolute URLs.
	pub fn load() -> Self {
		let config = match read_config_element() {
			None => {
				info!("config: no #{} element, using defaults", CONFIG_ELEMENT_ID);
				Self::default()
			}
			Some(json) => Self::from_json(&json).unwrap_or_else(|e| {
				warn!("config: {}, using defaults", e);
				Self::default()
			}),
		};
		let config = match page_origin() {
			Some(origin) => config.with_origin(&origin),
			None => config,
		};
		info!("config: api base url {}", config.api_base_url);
		config
	}

	/// Prefix a relative API base URL with `origin`. Absolute URLs are kept.
	pub fn with_origin(mut self, origin: &str) -> Self {
		if !self.api_base_url.contains("://") {
			self.api_base_url = format!("{}{}", origin.trim_end_matches('/'), self.api_base_url);
		}
		self
	}

	fn normalize(&mut self) {
		let trimmed = self.api_base_url.trim().trim_end_matches('/');
		self.api_base_url = if trimmed.is_empty() && !self.api_base_url.contains('/') {
			default_api_base_url()
		} else {
			trimmed.to_string()
		};
	}
}

fn read_config_element() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn page_origin() -> Option<String> {
	web_sys::window()?.location().origin().ok()
}
