//! HTTP client for the people API.

use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::PersonApi;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::model::{Person, Relationship};

/// [`PersonApi`] over JSON/HTTP, rooted at [`AppConfig::api_base_url`].
#[derive(Clone, Debug)]
pub struct HttpPersonApi {
	client: Client,
	base_url: String,
}

impl HttpPersonApi {
	/// Create a client for the given base URL.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			client: Client::new(),
			base_url: base_url.into(),
		}
	}

	/// Create a client around an already configured [`Client`].
	pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
		Self {
			client,
			base_url: base_url.into(),
		}
	}

	/// Create a client from the application configuration.
	pub fn from_config(config: &AppConfig) -> Self {
		Self::new(config.api_base_url.clone())
	}

	/// URL of a single person record.
	pub fn person_url(&self, id: &str) -> String {
		format!("{}/persons/{}", self.base_url, urlencoding::encode(id))
	}

	/// URL of a person's relationships.
	pub fn relationships_url(&self, id: &str) -> String {
		format!("{}/relationships", self.person_url(id))
	}

	/// URL of the full roster.
	pub fn roster_url(&self) -> String {
		format!("{}/persons", self.base_url)
	}

	/// GET `url` and decode its JSON body. A 404 yields `Ok(None)`.
	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError> {
		debug!("api: GET {}", url);
		let response = self.client.get(url).send().await?;

		if !has_body(response.status(), url)? {
			return Ok(None);
		}

		response
			.json::<T>()
			.await
			.map(Some)
			.map_err(|e| ApiError::Decode {
				url: url.to_string(),
				message: e.to_string(),
			})
	}

	/// Like [`Self::get_json`], but a 404 is an error.
	async fn get_required<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
		require(self.get_json(url).await?, url)
	}
}

/// `Ok(true)` for a success status, `Ok(false)` for 404, otherwise an error.
fn has_body(status: StatusCode, url: &str) -> Result<bool, ApiError> {
	if status == StatusCode::NOT_FOUND {
		return Ok(false);
	}
	if !status.is_success() {
		return Err(ApiError::Status {
			status: status.as_u16(),
			url: url.to_string(),
		});
	}
	Ok(true)
}

/// Turn an absent resource into a 404 error.
fn require<T>(found: Option<T>, url: &str) -> Result<T, ApiError> {
	found.ok_or_else(|| ApiError::Status {
		status: StatusCode::NOT_FOUND.as_u16(),
		url: url.to_string(),
	})
}

impl PersonApi for HttpPersonApi {
	async fn person_by_id(&self, id: &str) -> Result<Option<Person>, ApiError> {
		self.get_json(&self.person_url(id)).await
	}

	async fn person_relationships(&self, id: &str) -> Result<Vec<Relationship>, ApiError> {
		// Unknown people have no relationships rather than a failed page.
		Ok(self
			.get_json(&self.relationships_url(id))
			.await?
			.unwrap_or_default())
	}

	async fn all_persons(&self) -> Result<Vec<Person>, ApiError> {
		self.get_required(&self.roster_url()).await
	}
}


/// The trait methods against a throwaway HTTP server on localhost.
#[cfg(all(test, not(target_arch = "wasm32")))]
mod http_tests {
	use std::io::{BufRead, BufReader, Write};
	use std::net::TcpListener;
	use std::thread;

	use super::*;

	/// Serve `routes` as (path, status, body) until the test process exits.
	/// Unknown paths get a 404.
	fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		thread::spawn(move || {
			for stream in listener.incoming() {
				let Ok(mut stream) = stream else {
					break;
				};
				let mut reader = BufReader::new(stream.try_clone().unwrap());
				let mut request_line = String::new();
				if reader.read_line(&mut request_line).is_err() {
					continue;
				}
				loop {
					let mut header = String::new();
					match reader.read_line(&mut header) {
						Ok(n) if n > 2 => {}
						_ => break,
					}
				}
				let path = request_line.split_whitespace().nth(1).unwrap_or_default();
				let (status, body) = routes
					.iter()
					.find(|(p, ..)| *p == path)
					.map(|&(_, s, b)| (s, b))
					.unwrap_or((404, ""));
				let response = format!(
					"HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
					status,
					body.len(),
					body
				);
				let _ = stream.write_all(response.as_bytes());
			}
		});
		format!("http://{}", addr)
	}

	fn api(base_url: String) -> HttpPersonApi {
		let client = Client::builder().no_proxy().build().unwrap();
		HttpPersonApi::with_client(client, base_url)
	}

	#[tokio::test]
	async fn known_person_is_decoded() {
		let api = api(serve(vec![(
			"/persons/P1",
			200,
			r#"{"id":"P1","name":"Alice","alternateNames":["Ally"]}"#,
		)]));
		let person = api.person_by_id("P1").await.unwrap().unwrap();
		assert_eq!(person.name, "Alice");
		assert_eq!(person.tooltip(), Some("Ally"));
	}

	#[tokio::test]
	async fn unknown_person_is_none_not_error() {
		let api = api(serve(vec![]));
		assert!(api.person_by_id("P9").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn missing_relationships_are_empty() {
		let api = api(serve(vec![]));
		assert!(api.person_relationships("P9").await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn relationships_are_decoded() {
		let api = api(serve(vec![(
			"/persons/P1/relationships",
			200,
			r#"[{"id":"R1","person1Id":"P1","person2Id":"P2","description":"friend"}]"#,
		)]));
		let rels = api.person_relationships("P1").await.unwrap();
		assert_eq!(rels, vec![Relationship::new("R1", "P1", "P2", "friend")]);
	}

	#[tokio::test]
	async fn missing_roster_is_an_error() {
		let api = api(serve(vec![]));
		let err = api.all_persons().await.unwrap_err();
		assert!(matches!(err, ApiError::Status { status: 404, .. }));
	}

	#[tokio::test]
	async fn server_errors_are_status_errors() {
		let api = api(serve(vec![
			("/persons", 500, ""),
			("/persons/P1", 503, ""),
			("/persons/P1/relationships", 403, ""),
		]));
		assert!(matches!(
			api.all_persons().await.unwrap_err(),
			ApiError::Status { status: 500, .. }
		));
		assert!(matches!(
			api.person_by_id("P1").await.unwrap_err(),
			ApiError::Status { status: 503, .. }
		));
		assert!(matches!(
			api.person_relationships("P1").await.unwrap_err(),
			ApiError::Status { status: 403, .. }
		));
	}

	#[tokio::test]
	async fn malformed_body_is_a_decode_error() {
		let api = api(serve(vec![("/persons", 200, r#"{"not":"a list"}"#)]));
		assert!(matches!(
			api.all_persons().await.unwrap_err(),
			ApiError::Decode { .. }
		));
	}
}
