//! Projection of a person's relationships into a renderable network.
//!
//! [`project`] is a pure function of the subject, their relationship records
//! and the roster. It produces the diagram input ([`GraphData`]) and the
//! sidebar list ([`RelatedPerson`]s) in one pass:
//!
//! - the subject is the single [`NodeKind::Center`] node, always first;
//! - each relationship contributes an edge `subject -> counterpart`, labeled
//!   with its description, and a [`NodeKind::Related`] node for the
//!   counterpart unless one already exists;
//! - relationships whose counterpart is not in the roster contribute nothing;
//! - relationships that do not connect the subject to someone else are
//!   excluded with a warning.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::components::force_graph::{GraphData, GraphLink, GraphNode, NodeKind};
use crate::model::{Person, Relationship};

/// Which endpoint of a relationship is the other person.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counterpart<'a> {
	/// The endpoint that is not the subject.
	Other(&'a str),
	/// Both endpoints are the subject.
	SelfLoop,
	/// Neither endpoint is the subject.
	Unrelated,
}

/// Resolve the counterpart of `relationship` relative to `subject_id`.
///
/// Endpoint order carries no meaning; whichever endpoint is not the subject
/// is the counterpart.
pub fn counterpart<'a>(relationship: &'a Relationship, subject_id: &str) -> Counterpart<'a> {
	let (a, b) = (
		relationship.person1_id.as_str(),
		relationship.person2_id.as_str(),
	);
	match (a == subject_id, b == subject_id) {
		(true, true) => Counterpart::SelfLoop,
		(true, false) => Counterpart::Other(b),
		(false, true) => Counterpart::Other(a),
		(false, false) => Counterpart::Unrelated,
	}
}

/// A sidebar entry: a relationship and the resolved counterpart.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedPerson {
	/// The record naming both people.
	pub relationship: Relationship,
	/// The other person in `relationship`.
	pub person: Person,
}

impl RelatedPerson {
	/// Selecting a sidebar entry always navigates to the counterpart.
	pub fn selection_target(&self) -> &str {
		&self.person.id
	}
}

/// Everything a person page renders once loading succeeded.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonNetwork {
	/// The person the page is about.
	pub subject: Person,
	/// Diagram input, subject first.
	pub graph: GraphData,
	/// Sidebar entries in relationship order.
	pub related: Vec<RelatedPerson>,
}

fn node_for(person: &Person, kind: NodeKind) -> GraphNode {
	GraphNode {
		id: person.id.clone(),
		label: person.name.clone(),
		tooltip: person.tooltip().map(str::to_string),
		kind,
	}
}

/// Build the network view of `subject` from its relationships and the roster.
pub fn project(subject: &Person, relationships: &[Relationship], roster: &[Person]) -> PersonNetwork {
	let by_id: HashMap<&str, &Person> = roster.iter().map(|p| (p.id.as_str(), p)).collect();

	let mut nodes = vec![node_for(subject, NodeKind::Center)];
	let mut seen: HashSet<&str> = HashSet::from([subject.id.as_str()]);
	let mut links = Vec::new();
	let mut related = Vec::new();

	for rel in relationships {
		let other_id = match counterpart(rel, &subject.id) {
			Counterpart::Other(id) => id,
			Counterpart::SelfLoop => {
				warn!(
					"network: relationship {} links {} to itself, skipping",
					rel.id, subject.id
				);
				continue;
			}
			Counterpart::Unrelated => {
				warn!(
					"network: relationship {} ({} - {}) does not involve {}, skipping",
					rel.id, rel.person1_id, rel.person2_id, subject.id
				);
				continue;
			}
		};
		let Some(&other) = by_id.get(other_id) else {
			continue;
		};

		if seen.insert(other.id.as_str()) {
			nodes.push(node_for(other, NodeKind::Related));
		}
		links.push(GraphLink {
			id: rel.id.clone(),
			source: subject.id.clone(),
			target: other.id.clone(),
			label: Some(rel.description.clone()),
		});
		related.push(RelatedPerson {
			relationship: rel.clone(),
			person: other.clone(),
		});
	}

	PersonNetwork {
		subject: subject.clone(),
		graph: GraphData { nodes, links },
		related,
	}
}

/// Route of a person's page.
pub fn person_path(id: &str) -> String {
	format!("/person/{}", urlencoding::encode(id))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn alice() -> Person {
		Person::new("P1", "Alice")
	}

	fn roster() -> Vec<Person> {
		vec![
			alice(),
			Person::new("P2", "Bob").with_alternate_names(["Bobby"]),
			Person::new("P3", "Carol"),
		]
	}

	#[test]
	fn counterpart_ignores_endpoint_order() {
		let forward = Relationship::new("R1", "P1", "P2", "friend");
		let backward = Relationship::new("R2", "P2", "P1", "friend");
		assert_eq!(counterpart(&forward, "P1"), Counterpart::Other("P2"));
		assert_eq!(counterpart(&backward, "P1"), Counterpart::Other("P2"));
	}

	#[test]
	fn counterpart_flags_integrity_errors() {
		let self_loop = Relationship::new("R1", "P1", "P1", "self");
		let unrelated = Relationship::new("R2", "P2", "P3", "cousin");
		assert_eq!(counterpart(&self_loop, "P1"), Counterpart::SelfLoop);
		assert_eq!(counterpart(&unrelated, "P1"), Counterpart::Unrelated);
	}

	#[test]
	fn subject_is_single_center_node() {
		let rels = vec![
			Relationship::new("R1", "P1", "P2", "friend"),
			Relationship::new("R2", "P3", "P1", "sister"),
		];
		let net = project(&alice(), &rels, &roster());

		let centers: Vec<_> = net
			.graph
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Center)
			.collect();
		assert_eq!(centers.len(), 1);
		assert_eq!(centers[0].id, "P1");
		assert_eq!(net.graph.nodes[0].id, "P1");
	}

	#[test]
	fn edges_point_from_subject_in_input_order() {
		let rels = vec![
			Relationship::new("R2", "P3", "P1", "sister"),
			Relationship::new("R1", "P1", "P2", "friend"),
		];
		let net = project(&alice(), &rels, &roster());

		let edges: Vec<_> = net
			.graph
			.links
			.iter()
			.map(|l| (l.id.as_str(), l.source.as_str(), l.target.as_str(), l.label.as_deref()))
			.collect();
		assert_eq!(
			edges,
			vec![
				("R2", "P1", "P3", Some("sister")),
				("R1", "P1", "P2", Some("friend")),
			]
		);
		let ids: Vec<_> = net.graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["P1", "P3", "P2"]);
	}

	#[test]
	fn duplicate_counterpart_gets_one_node_but_every_edge() {
		let rels = vec![
			Relationship::new("R1", "P1", "P2", "friend"),
			Relationship::new("R2", "P2", "P1", "colleague"),
		];
		let net = project(&alice(), &rels, &roster());

		assert_eq!(net.graph.nodes.len(), 2);
		assert_eq!(net.graph.links.len(), 2);
		assert_eq!(net.related.len(), 2);
		assert_eq!(net.related[1].relationship.description, "colleague");
	}

	#[test]
	fn unknown_counterparts_are_dropped_everywhere() {
		let rels = vec![
			Relationship::new("R1", "P1", "P9", "pen pal"),
			Relationship::new("R2", "P1", "P2", "friend"),
		];
		let net = project(&alice(), &rels, &roster());

		assert!(net.graph.node("P9").is_none());
		assert_eq!(net.graph.links.len(), 1);
		assert_eq!(net.related.len(), 1);
		assert_eq!(net.related[0].person.name, "Bob");
	}

	#[test]
	fn integrity_errors_are_excluded() {
		let rels = vec![
			Relationship::new("R1", "P1", "P1", "self"),
			Relationship::new("R2", "P2", "P3", "cousin"),
		];
		let net = project(&alice(), &rels, &roster());

		assert_eq!(net.graph.nodes.len(), 1);
		assert!(net.graph.links.is_empty());
		assert!(net.related.is_empty());
	}

	#[test]
	fn tooltip_is_first_alternate_name() {
		let rels = vec![Relationship::new("R1", "P1", "P2", "friend")];
		let net = project(&alice(), &rels, &roster());

		assert_eq!(net.graph.node("P2").unwrap().tooltip.as_deref(), Some("Bobby"));
		assert_eq!(net.graph.node("P1").unwrap().tooltip, None);
	}

	#[test]
	fn subject_missing_from_roster_is_still_center() {
		let rels = vec![Relationship::new("R1", "P1", "P2", "friend")];
		let roster = vec![Person::new("P2", "Bob")];
		let net = project(&alice(), &rels, &roster);

		assert_eq!(net.graph.center().map(|n| n.id.as_str()), Some("P1"));
		assert_eq!(net.graph.links.len(), 1);
	}

	#[test]
	fn selection_skips_center_node() {
		let rels = vec![Relationship::new("R1", "P1", "P2", "friend")];
		let net = project(&alice(), &rels, &roster());

		assert_eq!(net.graph.selection_target("P1"), None);
		assert_eq!(net.graph.selection_target("P2"), Some("P2"));
		assert_eq!(net.graph.selection_target("P404"), None);
		assert_eq!(net.related[0].selection_target(), "P2");
	}

	#[test]
	fn person_path_encodes_id() {
		assert_eq!(person_path("P1"), "/person/P1");
		assert_eq!(person_path("a b/c"), "/person/a%20b%2Fc");
	}

	#[test]
	fn person_path_round_trips_through_one_unescape() {
		for id in ["50%25off", "a b/c", "100%", "P1"] {
			let path = person_path(id);
			let segment = path.strip_prefix("/person/").unwrap();
			assert_eq!(urlencoding::decode(segment).unwrap(), id);
		}
	}
}
