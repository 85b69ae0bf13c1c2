//! Per-element state flags, the dirty set, and the pure mapping from flags to
//! drawable style.
//!
//! Flags are independent: a node can be next to the hovered node and next to
//! an expanded one at the same time. Style is taken from the highest flag set,
//! in the order `Base < HoverAdjacent < ActiveAdjacent < Hover < Active`.

use std::collections::BTreeSet;

use bitflags::bitflags;

use super::config::GraphConfig;
use super::model::{LinkIdx, Node, NodeIdx};

bitflags! {
	#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct NodeFlags: u8 {
		const HOVER_ADJACENT  = 0b0001;
		const ACTIVE_ADJACENT = 0b0010;
		const HOVER           = 0b0100;
		const ACTIVE          = 0b1000;
	}
}

bitflags! {
	#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct LinkFlags: u8 {
		const HOVER_ADJACENT  = 0b0001;
		const ACTIVE_ADJACENT = 0b0010;
		const HOVER           = 0b0100;
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emphasis {
	Base,
	HoverAdjacent,
	ActiveAdjacent,
	Hover,
	Active,
}

impl NodeFlags {
	pub fn emphasis(self) -> Emphasis {
		if self.contains(Self::ACTIVE) {
			Emphasis::Active
		} else if self.contains(Self::HOVER) {
			Emphasis::Hover
		} else if self.contains(Self::ACTIVE_ADJACENT) {
			Emphasis::ActiveAdjacent
		} else if self.contains(Self::HOVER_ADJACENT) {
			Emphasis::HoverAdjacent
		} else {
			Emphasis::Base
		}
	}
}

impl LinkFlags {
	pub fn emphasis(self) -> Emphasis {
		if self.contains(Self::HOVER) {
			Emphasis::Hover
		} else if self.contains(Self::ACTIVE_ADJACENT) {
			Emphasis::ActiveAdjacent
		} else if self.contains(Self::HOVER_ADJACENT) {
			Emphasis::HoverAdjacent
		} else {
			Emphasis::Base
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
	Node(NodeIdx),
	Link(LinkIdx),
}

/// Flags for every node and link of one graph plus the set of elements whose
/// style is stale.
#[derive(Clone, Debug, Default)]
pub struct VisualState {
	nodes: Vec<NodeFlags>,
	links: Vec<LinkFlags>,
	dirty: BTreeSet<ElementId>,
}

impl VisualState {
	/// Everything starts unmarked and dirty so the first redraw styles it all.
	pub fn new(node_count: usize, link_count: usize) -> Self {
		let mut state = Self {
			nodes: vec![NodeFlags::empty(); node_count],
			links: vec![LinkFlags::empty(); link_count],
			dirty: BTreeSet::new(),
		};
		state.mark_all_dirty();
		state
	}

	pub fn node(&self, idx: NodeIdx) -> NodeFlags {
		self.nodes.get(idx.0).copied().unwrap_or_default()
	}

	pub fn link(&self, idx: LinkIdx) -> LinkFlags {
		self.links.get(idx.0).copied().unwrap_or_default()
	}

	/// Set or clear `flag` on a node. Marks it dirty if anything changed.
	pub fn set_node(&mut self, idx: NodeIdx, flag: NodeFlags, on: bool) -> bool {
		let Some(flags) = self.nodes.get_mut(idx.0) else {
			return false;
		};
		let before = *flags;
		flags.set(flag, on);
		let changed = before != *flags;
		if changed {
			self.dirty.insert(ElementId::Node(idx));
		}
		changed
	}

	pub fn set_link(&mut self, idx: LinkIdx, flag: LinkFlags, on: bool) -> bool {
		let Some(flags) = self.links.get_mut(idx.0) else {
			return false;
		};
		let before = *flags;
		flags.set(flag, on);
		let changed = before != *flags;
		if changed {
			self.dirty.insert(ElementId::Link(idx));
		}
		changed
	}

	pub fn mark_dirty(&mut self, id: ElementId) {
		self.dirty.insert(id);
	}

	pub fn mark_all_dirty(&mut self) {
		self.dirty
			.extend((0..self.nodes.len()).map(|i| ElementId::Node(NodeIdx(i))));
		self.dirty
			.extend((0..self.links.len()).map(|i| ElementId::Link(LinkIdx(i))));
	}

	pub fn is_dirty(&self, id: ElementId) -> bool {
		self.dirty.contains(&id)
	}

	pub fn dirty_count(&self) -> usize {
		self.dirty.len()
	}

	/// Hand the dirty set to the redraw pass and start a fresh one.
	pub fn take_dirty(&mut self) -> BTreeSet<ElementId> {
		std::mem::take(&mut self.dirty)
	}

	pub fn active_nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
		self.nodes_with(NodeFlags::ACTIVE)
	}

	pub fn nodes_with(&self, flag: NodeFlags) -> impl Iterator<Item = NodeIdx> + '_ {
		self.nodes
			.iter()
			.enumerate()
			.filter(move |(_, f)| f.contains(flag))
			.map(|(i, _)| NodeIdx(i))
	}

	pub fn links_with(&self, flag: LinkFlags) -> impl Iterator<Item = LinkIdx> + '_ {
		self.links
			.iter()
			.enumerate()
			.filter(move |(_, f)| f.contains(flag))
			.map(|(i, _)| LinkIdx(i))
	}
}

/// Resolved appearance of a node, in layout units.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub emphasis: Emphasis,
	pub fill: String,
	pub stroke: String,
	pub stroke_width: f64,
	/// Distance from the node centre to the rounded rectangle's top-left corner.
	pub inset: f64,
	pub width: f64,
	pub height: f64,
	pub corner_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	pub emphasis: Emphasis,
	pub color: String,
	pub width: f64,
	pub opacity: f64,
}

/// Map a node's flags to its style. `panel_height` is the expanded height at
/// the current scale, used only while the node is active.
pub fn resolve_node_style(
	node: &Node,
	flags: NodeFlags,
	panel_height: Option<f64>,
	config: &GraphConfig,
	scale: f64,
) -> NodeStyle {
	let emphasis = flags.emphasis();
	let palette = config.palette(node.kind);
	let radius = config.radius(node.kind) / scale;
	let fill = match emphasis {
		Emphasis::Active => &config.active_fill,
		Emphasis::Hover => &palette.hover_fill,
		_ => &palette.fill,
	};
	let (width, height) = match (emphasis, panel_height) {
		(Emphasis::Active, Some(height)) => (config.panel_max_width / scale, height),
		_ => (radius * 2.0, radius * 2.0),
	};
	NodeStyle {
		emphasis,
		fill: fill.clone(),
		stroke: config.node_stroke.get(emphasis).clone(),
		stroke_width: config.node_stroke_width.get(emphasis) / scale,
		inset: radius,
		width,
		height,
		corner_radius: radius,
	}
}

pub fn resolve_link_style(flags: LinkFlags, config: &GraphConfig, scale: f64) -> LinkStyle {
	let emphasis = flags.emphasis();
	LinkStyle {
		emphasis,
		color: config.link_color.get(emphasis).clone(),
		width: config.link_width.get(emphasis) / scale,
		opacity: *config.link_opacity.get(emphasis),
	}
}
