//! Simulation state and pointer interaction for the network diagram.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, NodeKind};

const CENTER_COLOR: &str = "#ff7f0e";
const RELATED_COLORS: &[&str] = &[
	"#1f77b4", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf", "#bcbd22",
];

pub const NODE_RADIUS: f64 = 7.0;
pub const CENTER_RADIUS: f64 = 11.0;
pub const HIT_RADIUS: f64 = 14.0;
/// Initial distance of related nodes from the center node.
const RING_RADIUS: f64 = 120.0;
/// Pointer travel (screen pixels) beyond which a press becomes a drag.
pub const CLICK_TOLERANCE: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub tooltip: Option<String>,
	pub kind: NodeKind,
	pub color: String,
}

impl NodeInfo {
	pub fn radius(&self) -> f64 {
		match self.kind {
			NodeKind::Center => CENTER_RADIUS,
			NodeKind::Related => NODE_RADIUS,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer has travelled past [`CLICK_TOLERANCE`].
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	/// Edge labels keyed by (source, target); parallel links share one entry.
	edge_labels: HashMap<(DefaultNodeIdx, DefaultNodeIdx), String>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 250.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let mut edge_labels: HashMap<(DefaultNodeIdx, DefaultNodeIdx), String> = HashMap::new();

		let ring_count = data
			.nodes
			.iter()
			.filter(|n| n.kind == NodeKind::Related)
			.count()
			.max(1);
		let mut ring_slot = 0;

		for node in &data.nodes {
			if id_to_idx.contains_key(&node.id) {
				continue;
			}
			let (x, y, color) = match node.kind {
				// The subject sits at the origin, which the view transform centers.
				NodeKind::Center => (0.0, 0.0, CENTER_COLOR.to_string()),
				NodeKind::Related => {
					let angle = (ring_slot as f64) * 2.0 * PI / ring_count as f64;
					let color = RELATED_COLORS[ring_slot % RELATED_COLORS.len()].to_string();
					ring_slot += 1;
					(
						(RING_RADIUS * angle.cos()) as f32,
						(RING_RADIUS * angle.sin()) as f32,
						color,
					)
				}
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: node.kind == NodeKind::Center,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					tooltip: node.tooltip.clone(),
					kind: node.kind,
					color,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			else {
				continue;
			};
			let label = link.label.clone().unwrap_or_default();
			match edge_labels.get_mut(&(src, tgt)) {
				Some(existing) => {
					if !label.is_empty() {
						if !existing.is_empty() {
							existing.push_str(", ");
						}
						existing.push_str(&label);
					}
				}
				None => {
					graph.add_edge(src, tgt, EdgeData::default());
					edges.push((src, tgt));
					edge_labels.insert((src, tgt), label);
				}
			}
		}

		Self {
			graph,
			edges,
			edge_labels,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		let mut best = f64::INFINITY;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if dist < HIT_RADIUS.max(node.data.user_data.radius()) && dist < best {
				best = dist;
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut info = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				info = Some(node.data.user_data.clone());
			}
		});
		info
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x(), node.y()));
			}
		});
		pos
	}

	pub fn edge_label(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> Option<&str> {
		self.edge_labels
			.get(&(src, tgt))
			.map(String::as_str)
			.filter(|l| !l.is_empty())
	}

	/// Tooltip of the currently hovered node.
	pub fn hovered_tooltip(&self) -> Option<String> {
		self.hover
			.node
			.and_then(|idx| self.node_info(idx))
			.and_then(|info| info.tooltip)
	}

	/// Begin a press at screen position (x, y): grab a node or start panning.
	pub fn press(&mut self, x: f64, y: f64) {
		self.drag.moved = false;
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			if let Some((nx, ny)) = self.node_position(idx) {
				self.drag.node_start_x = nx;
				self.drag.node_start_y = ny;
			}
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	/// Pointer moved to screen position (x, y).
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (sx, sy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && (sx * sx + sy * sy).sqrt() <= CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
			let (dx, dy) = (sx / self.transform.k, sy / self.transform.k);
			let (nx, ny) = (
				self.drag.node_start_x + dx as f32,
				self.drag.node_start_y + dy as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// End the current press. Returns the id of the clicked node when the
	/// press grabbed a node and did not turn into a drag.
	pub fn release(&mut self) -> Option<String> {
		let clicked = match (self.drag.active, self.drag.moved, self.drag.node_idx) {
			(true, false, Some(idx)) => self.node_info(idx).map(|info| info.id),
			_ => None,
		};
		self.cancel_pointer();
		clicked
	}

	/// Abort any drag or pan without producing a click.
	pub fn cancel_pointer(&mut self) {
		self.drag.active = false;
		self.drag.moved = false;
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
