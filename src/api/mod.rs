//! Read access to person records and their relationships.
//!
//! [`PersonApi`] is the seam the loader is written against; [`HttpPersonApi`]
//! is the implementation used by the pages.

mod client;

pub use client::HttpPersonApi;

use crate::error::ApiError;
use crate::model::{Person, Relationship};

/// The three read operations a person page depends on.
#[allow(async_fn_in_trait)]
pub trait PersonApi {
	/// Fetch one person. `Ok(None)` when the id is unknown.
	async fn person_by_id(&self, id: &str) -> Result<Option<Person>, ApiError>;

	/// Every relationship naming `id` as either endpoint.
	async fn person_relationships(&self, id: &str) -> Result<Vec<Relationship>, ApiError>;

	/// The complete roster of known people.
	async fn all_persons(&self) -> Result<Vec<Person>, ApiError>;
}
