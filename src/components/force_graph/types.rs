//! Graph data structures for input to the force graph component.

/// How a node relates to the person being viewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// The subject of the page.
	Center,
	/// One hop away from the subject.
	Related,
}

/// A node in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display label drawn next to the node.
	pub label: String,
	/// Text shown while the node is hovered.
	pub tooltip: Option<String>,
	/// Center or related; decides styling and whether selection navigates.
	pub kind: NodeKind,
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Unique identifier for this edge.
	pub id: String,
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional text drawn at the middle of the edge.
	pub label: Option<String>,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Nodes, unique by id.
	pub nodes: Vec<GraphNode>,
	/// Links between nodes in `nodes`.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// The node classified as [`NodeKind::Center`], if any.
	pub fn center(&self) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.kind == NodeKind::Center)
	}

	/// Where selecting `node_id` should navigate to.
	///
	/// The center node and unknown ids yield `None`.
	pub fn selection_target(&self, node_id: &str) -> Option<&str> {
		self.node(node_id)
			.filter(|n| n.kind != NodeKind::Center)
			.map(|n| n.id.as_str())
	}
}
