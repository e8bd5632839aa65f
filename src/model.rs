//! Person and relationship records as served by the people API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A known person.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
	/// Unique, stable identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Alternate names; the first one is used as a tooltip.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub alternate_names: Vec<String>,
	/// Remaining profile fields, carried through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Person {
	/// Create a person with no alternate names or extra profile fields.
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			alternate_names: Vec::new(),
			extra: Map::new(),
		}
	}

	/// Builder-style helper to attach alternate names.
	pub fn with_alternate_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.alternate_names = names.into_iter().map(Into::into).collect();
		self
	}

	/// Tooltip text: the first alternate name, if any.
	pub fn tooltip(&self) -> Option<&str> {
		self.alternate_names.first().map(String::as_str)
	}
}

/// An unordered pair of people plus a human-readable description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	/// Relationship identifier.
	pub id: String,
	/// First endpoint.
	#[serde(rename = "person1Id")]
	pub person1_id: String,
	/// Second endpoint.
	#[serde(rename = "person2Id")]
	pub person2_id: String,
	/// Description, e.g. "friend" or "sister of".
	pub description: String,
}

impl Relationship {
	/// Create a new relationship record.
	pub fn new(
		id: impl Into<String>,
		person1_id: impl Into<String>,
		person2_id: impl Into<String>,
		description: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			person1_id: person1_id.into(),
			person2_id: person2_id.into(),
			description: description.into(),
		}
	}
}
