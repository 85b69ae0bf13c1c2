//! Normalised crawl graph: deduplicated pages, symmetric adjacency and a
//! pinned root.

use std::collections::{BTreeSet, HashSet};

use log::debug;

use super::error::{GraphError, Result};
use super::types::CrawlDocument;

/// Position of a node in the normalised node list. Stable while a graph is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkIdx(pub usize);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Root,
	Keyword,
	Page,
}

#[derive(Clone, Debug)]
pub struct Node {
	pub idx: NodeIdx,
	/// Identity carried by the crawl document.
	pub index: usize,
	pub title: String,
	pub url: String,
	pub kind: NodeKind,
	pinned: bool,
	neighbors: BTreeSet<NodeIdx>,
	position: Option<Point>,
}

impl Node {
	pub fn is_root(&self) -> bool {
		self.kind == NodeKind::Root
	}

	pub fn is_pinned(&self) -> bool {
		self.pinned
	}

	pub fn neighbors(&self) -> &BTreeSet<NodeIdx> {
		&self.neighbors
	}

	/// Last position reported by the layout. `None` until the first tick for
	/// every node but the root.
	pub fn position(&self) -> Option<Point> {
		self.position
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub idx: LinkIdx,
	pub source: NodeIdx,
	pub target: NodeIdx,
}

#[derive(Clone, Debug)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	incident: Vec<Vec<LinkIdx>>,
}

impl Graph {
	/// Normalise a crawl document into a graph.
	///
	/// Duplicate node indices keep their first occurrence. Self-loops and
	/// repeated edges are dropped. The first node is the root: it is pinned and
	/// placed at `center`. Fails when there are no nodes, when an edge points
	/// past the node list, or when a later node claims to be the root.
	pub fn build(doc: &CrawlDocument, center: Point) -> Result<Self> {
		if doc.nodes.is_empty() {
			return Err(GraphError::InvalidGraph("crawl contains no nodes".into()));
		}

		let mut seen = HashSet::new();
		let mut nodes = Vec::with_capacity(doc.nodes.len());
		for raw in &doc.nodes {
			if !seen.insert(raw.index) {
				debug!("Dropping duplicate node index {}", raw.index);
				continue;
			}
			let idx = NodeIdx(nodes.len());
			if raw.is_root && idx.0 != 0 {
				return Err(GraphError::InvalidGraph(format!(
					"node {} is marked as root but the root must come first",
					raw.index
				)));
			}
			let kind = if idx.0 == 0 {
				NodeKind::Root
			} else if raw.is_keyword {
				NodeKind::Keyword
			} else {
				NodeKind::Page
			};
			nodes.push(Node {
				idx,
				index: raw.index,
				title: raw.title.clone(),
				url: raw.url.clone(),
				kind,
				pinned: idx.0 == 0,
				neighbors: BTreeSet::new(),
				position: (idx.0 == 0).then_some(center),
			});
		}

		let mut links = Vec::with_capacity(doc.edges.len());
		let mut incident = vec![Vec::new(); nodes.len()];
		let mut pairs = HashSet::new();
		for edge in &doc.edges {
			for end in [edge.source, edge.target] {
				if end >= nodes.len() {
					return Err(GraphError::InvalidGraph(format!(
						"edge {} -> {} references node {} but only {} nodes exist",
						edge.source,
						edge.target,
						end,
						nodes.len()
					)));
				}
			}
			if edge.source == edge.target {
				debug!("Dropping self-loop on node {}", edge.source);
				continue;
			}
			let key = (edge.source.min(edge.target), edge.source.max(edge.target));
			if !pairs.insert(key) {
				debug!("Dropping repeated edge {} -> {}", edge.source, edge.target);
				continue;
			}
			let (source, target) = (NodeIdx(edge.source), NodeIdx(edge.target));
			let idx = LinkIdx(links.len());
			links.push(Link {
				idx,
				source,
				target,
			});
			incident[source.0].push(idx);
			incident[target.0].push(idx);
			nodes[source.0].neighbors.insert(target);
			nodes[target.0].neighbors.insert(source);
		}

		Ok(Self {
			nodes,
			links,
			incident,
		})
	}

	pub fn root(&self) -> NodeIdx {
		NodeIdx(0)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
		self.nodes.get(idx.0)
	}

	pub fn link(&self, idx: LinkIdx) -> Option<&Link> {
		self.links.get(idx.0)
	}

	pub fn contains(&self, idx: NodeIdx) -> bool {
		idx.0 < self.nodes.len()
	}

	/// Links with `idx` as either endpoint.
	pub fn incident_links(&self, idx: NodeIdx) -> &[LinkIdx] {
		self.incident.get(idx.0).map(Vec::as_slice).unwrap_or(&[])
	}

	pub(super) fn set_pinned(&mut self, idx: NodeIdx, pinned: bool) {
		if let Some(node) = self.nodes.get_mut(idx.0) {
			node.pinned = pinned;
		}
	}

	pub(super) fn set_text(&mut self, idx: NodeIdx, title: String, url: String) {
		if let Some(node) = self.nodes.get_mut(idx.0) {
			node.title = title;
			node.url = url;
		}
	}

	pub(super) fn set_position(&mut self, idx: NodeIdx, position: Point) {
		if let Some(node) = self.nodes.get_mut(idx.0) {
			node.position = Some(position);
		}
	}
}
