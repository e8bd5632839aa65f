//! Loading a person's network from the API.
//!
//! The three reads are issued together and joined; the first failure wins.
//! [`LoadGeneration`] hands out tickets so that only the most recently
//! started load may publish its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::try_join;
use log::{debug, info, warn};

use crate::api::PersonApi;
use crate::error::LoadError;
use crate::network::{self, PersonNetwork};

/// Observable state of a page load.
#[derive(Debug, Default)]
pub enum LoadState {
	/// Requests are in flight.
	#[default]
	Loading,
	/// Everything loaded and projected.
	Ready(PersonNetwork),
	/// The subject is unknown or a request failed.
	Failed(LoadError),
}

impl LoadState {
	/// Wrap the outcome of [`load_network`].
	pub fn from_result(result: Result<PersonNetwork, LoadError>) -> Self {
		match result {
			Ok(network) => LoadState::Ready(network),
			Err(e) => LoadState::Failed(e),
		}
	}

	/// True while requests are in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self, LoadState::Loading)
	}
}

/// Fetch the subject, their relationships and the roster, then project them.
pub async fn load_network<A: PersonApi>(api: &A, id: &str) -> Result<PersonNetwork, LoadError> {
	let (subject, relationships, roster) = try_join!(
		api.person_by_id(id),
		api.person_relationships(id),
		api.all_persons(),
	)?;

	let Some(subject) = subject else {
		warn!("loader: person {} not found", id);
		return Err(LoadError::NotFound { id: id.to_string() });
	};

	let network = network::project(&subject, &relationships, &roster);
	info!("loader: {}", summary(&network, relationships.len()));
	Ok(network)
}

fn summary(network: &PersonNetwork, relationship_count: usize) -> String {
	format!(
		"{} has {} relationships, {} nodes, {} edges, {} related",
		network.subject.id,
		relationship_count,
		network.graph.nodes.len(),
		network.graph.links.len(),
		network.related.len()
	)
}

/// Identifies one load cycle. Only the latest ticket is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
	/// Sequence number of the cycle, starting at 1.
	pub fn generation(&self) -> u64 {
		self.0
	}
}

/// Shared counter of started load cycles.
#[derive(Clone, Debug, Default)]
pub struct LoadGeneration(Arc<AtomicU64>);

impl LoadGeneration {
	/// A counter with no cycle started yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a new cycle, invalidating every earlier ticket.
	pub fn begin(&self) -> LoadTicket {
		LoadTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
	}

	/// True when no newer cycle has begun since `ticket` was issued.
	pub fn is_current(&self, ticket: LoadTicket) -> bool {
		self.0.load(Ordering::SeqCst) == ticket.0
	}

	/// Hand `value` to `apply` only if `ticket` is still current.
	///
	/// Returns whether the value was applied.
	pub fn apply_if_current<T>(&self, ticket: LoadTicket, value: T, apply: impl FnOnce(T)) -> bool {
		if self.is_current(ticket) {
			apply(value);
			true
		} else {
			debug!(
				"loader: dropping stale result of generation {}",
				ticket.generation()
			);
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::collections::HashMap;

	use futures::executor::block_on;

	use super::*;
	use crate::error::ApiError;
	use crate::model::{Person, Relationship};

	#[derive(Default)]
	struct FakeApi {
		people: HashMap<String, Person>,
		relationships: Vec<Relationship>,
		roster_fails: bool,
		calls: Cell<u32>,
	}

	impl FakeApi {
		fn new(people: Vec<Person>, relationships: Vec<Relationship>) -> Self {
			Self {
				people: people.into_iter().map(|p| (p.id.clone(), p)).collect(),
				relationships,
				..Default::default()
			}
		}
	}

	impl PersonApi for FakeApi {
		async fn person_by_id(&self, id: &str) -> Result<Option<Person>, ApiError> {
			self.calls.set(self.calls.get() + 1);
			Ok(self.people.get(id).cloned())
		}

		async fn person_relationships(&self, id: &str) -> Result<Vec<Relationship>, ApiError> {
			self.calls.set(self.calls.get() + 1);
			Ok(self
				.relationships
				.iter()
				.filter(|r| r.person1_id == id || r.person2_id == id)
				.cloned()
				.collect())
		}

		async fn all_persons(&self) -> Result<Vec<Person>, ApiError> {
			self.calls.set(self.calls.get() + 1);
			if self.roster_fails {
				return Err(ApiError::Status {
					status: 503,
					url: "/api/persons".into(),
				});
			}
			Ok(self.people.values().cloned().collect())
		}
	}

	fn alice_and_bob() -> FakeApi {
		FakeApi::new(
			vec![Person::new("P1", "Alice"), Person::new("P2", "Bob")],
			vec![Relationship::new("R1", "P1", "P2", "friend")],
		)
	}

	#[test]
	fn loads_and_projects_network() {
		let api = alice_and_bob();
		let network = block_on(load_network(&api, "P1")).unwrap();

		assert_eq!(api.calls.get(), 3);
		assert_eq!(network.subject.name, "Alice");
		assert_eq!(network.graph.nodes.len(), 2);
		assert_eq!(network.related[0].person.name, "Bob");
	}

	#[test]
	fn unknown_subject_is_not_found() {
		let api = alice_and_bob();
		let err = block_on(load_network(&api, "P7")).unwrap_err();
		assert!(err.is_not_found());
	}

	#[test]
	fn any_failed_fetch_fails_the_load() {
		let api = FakeApi {
			roster_fails: true,
			..alice_and_bob()
		};
		let err = block_on(load_network(&api, "P1")).unwrap_err();

		assert!(matches!(err, LoadError::Failed(ApiError::Status { status: 503, .. })));
		assert!(matches!(
			LoadState::from_result(Err(err)),
			LoadState::Failed(_)
		));
	}

	#[test]
	fn only_latest_ticket_is_current() {
		let generation = LoadGeneration::new();
		let first = generation.begin();
		assert!(generation.is_current(first));

		let second = generation.clone().begin();
		assert!(!generation.is_current(first));
		assert!(generation.is_current(second));
		assert_eq!(second.generation(), first.generation() + 1);
	}

	#[test]
	fn stale_results_are_not_applied() {
		let generation = LoadGeneration::new();
		let applied = Cell::new(None);

		let slow = generation.begin();
		let fast = generation.begin();
		assert!(generation.apply_if_current(fast, "P2", |v| applied.set(Some(v))));
		assert!(!generation.apply_if_current(slow, "P1", |v| applied.set(Some(v))));

		assert_eq!(applied.get(), Some("P2"));
	}

	#[test]
	fn summary_reports_every_count() {
		let api = FakeApi::new(
			vec![Person::new("P1", "Alice"), Person::new("P2", "Bob")],
			vec![
				Relationship::new("R1", "P1", "P2", "friend"),
				Relationship::new("R2", "P2", "P1", "colleague"),
				Relationship::new("R3", "P1", "P9", "pen pal"),
			],
		);
		let network = block_on(load_network(&api, "P1")).unwrap();

		assert_eq!(
			summary(&network, 3),
			"P1 has 3 relationships, 2 nodes, 2 edges, 2 related"
		);
	}

	#[test]
	fn default_state_is_loading() {
		assert!(LoadState::default().is_loading());
	}
}
