//! Pointer transitions over the visual state.
//!
//! Each transition takes an [`InteractionContext`] borrowing the pieces of the
//! engine it may touch. Panel creation is left to the caller, which reads it
//! from the returned [`ClickOutcome`].

use bitflags::bitflags;
use log::debug;

use super::config::GraphConfig;
use super::layout::LayoutAdapter;
use super::model::{Graph, LinkIdx, NodeIdx, Point};
use super::scale::Viewport;
use super::visual::{LinkFlags, NodeFlags, VisualState};

bitflags! {
	/// Modifier keys held during a click.
	#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct Modifiers: u8 {
		const SHIFT = 0b0001;
		const CTRL  = 0b0010;
		const ALT   = 0b0100;
		const META  = 0b1000;
	}
}

/// The single element under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	Node(NodeIdx),
	Link(LinkIdx),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	/// Pointer is down on a node but has not travelled far enough to drag.
	Pressed {
		node: NodeIdx,
		origin: Point,
		node_origin: Point,
	},
	Dragging {
		node: NodeIdx,
		origin: Point,
		node_origin: Point,
	},
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	hover: Option<HoverTarget>,
	gesture: Gesture,
	suppress_click: bool,
}

impl InteractionState {
	pub fn hovered(&self) -> Option<HoverTarget> {
		self.hover
	}

	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.gesture, Gesture::Dragging { .. })
	}

	/// Whether the next click will be swallowed because it ends a drag.
	pub fn click_suppressed(&self) -> bool {
		self.suppress_click
	}

	/// A fresh press: whatever the last gesture was, the next click counts.
	pub(super) fn arm_click(&mut self) {
		self.suppress_click = false;
	}

	/// Swallow the next click, as after a background pan.
	pub(super) fn suppress_click(&mut self) {
		self.suppress_click = true;
	}

	fn dragged_node(&self) -> Option<NodeIdx> {
		match self.gesture {
			Gesture::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}
}

pub struct InteractionContext<'a> {
	pub graph: &'a mut Graph,
	pub visual: &'a mut VisualState,
	pub layout: &'a mut LayoutAdapter,
	pub state: &'a mut InteractionState,
	pub viewport: &'a Viewport,
	pub config: &'a GraphConfig,
}

/// What a click changed, for the caller to mirror in panels and draw order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickOutcome {
	pub clicked: Option<NodeIdx>,
	pub activated: Option<NodeIdx>,
	pub deactivated: Vec<NodeIdx>,
	pub pin_toggled: bool,
	pub ignored: bool,
}

pub fn pointer_enter(ctx: &mut InteractionContext, node: NodeIdx) {
	if !ctx.graph.contains(node) || ctx.state.hover == Some(HoverTarget::Node(node)) {
		return;
	}
	clear_hover(ctx);
	mark_node_hover(ctx, node, true);
	ctx.state.hover = Some(HoverTarget::Node(node));
}

pub fn pointer_leave(ctx: &mut InteractionContext, node: NodeIdx) {
	if ctx.state.hover != Some(HoverTarget::Node(node)) {
		return;
	}
	mark_node_hover(ctx, node, false);
	ctx.state.hover = None;
}

pub fn pointer_enter_link(ctx: &mut InteractionContext, link: LinkIdx) {
	if ctx.graph.link(link).is_none() || ctx.state.hover == Some(HoverTarget::Link(link)) {
		return;
	}
	clear_hover(ctx);
	mark_link_hover(ctx, link, true);
	ctx.state.hover = Some(HoverTarget::Link(link));
}

pub fn pointer_leave_link(ctx: &mut InteractionContext, link: LinkIdx) {
	if ctx.state.hover != Some(HoverTarget::Link(link)) {
		return;
	}
	mark_link_hover(ctx, link, false);
	ctx.state.hover = None;
}

/// Leave whatever is hovered.
pub fn clear_hover(ctx: &mut InteractionContext) {
	match ctx.state.hover {
		Some(HoverTarget::Node(node)) => pointer_leave(ctx, node),
		Some(HoverTarget::Link(link)) => pointer_leave_link(ctx, link),
		None => {}
	}
}

fn mark_node_hover(ctx: &mut InteractionContext, node: NodeIdx, on: bool) {
	ctx.visual.set_node(node, NodeFlags::HOVER, on);
	let Some(data) = ctx.graph.node(node) else {
		return;
	};
	for &neighbor in data.neighbors() {
		ctx.visual.set_node(neighbor, NodeFlags::HOVER_ADJACENT, on);
	}
	for &link in ctx.graph.incident_links(node) {
		ctx.visual.set_link(link, LinkFlags::HOVER_ADJACENT, on);
	}
}

fn mark_link_hover(ctx: &mut InteractionContext, link: LinkIdx, on: bool) {
	let Some(&data) = ctx.graph.link(link) else {
		return;
	};
	ctx.visual.set_link(link, LinkFlags::HOVER, on);
	ctx.visual.set_node(data.source, NodeFlags::HOVER_ADJACENT, on);
	ctx.visual.set_node(data.target, NodeFlags::HOVER_ADJACENT, on);
}

/// Ctrl toggles the pin. A click that ends a drag is swallowed. Otherwise the
/// node toggles between expanded and collapsed; without shift every other
/// expanded node collapses first.
pub fn click(ctx: &mut InteractionContext, node: NodeIdx, modifiers: Modifiers) -> ClickOutcome {
	let mut outcome = ClickOutcome::default();
	if !ctx.graph.contains(node) {
		outcome.ignored = true;
		return outcome;
	}
	if modifiers.contains(Modifiers::CTRL) {
		toggle_pin(ctx, node);
		outcome.pin_toggled = true;
		return outcome;
	}
	if std::mem::take(&mut ctx.state.suppress_click) {
		outcome.ignored = true;
		return outcome;
	}

	outcome.clicked = Some(node);
	let was_active = ctx.visual.node(node).contains(NodeFlags::ACTIVE);
	if ctx.visual.active_nodes().next().is_some() {
		if !modifiers.contains(Modifiers::SHIFT) {
			outcome.deactivated = deactivate_all(ctx);
		} else if was_active {
			deactivate(ctx, node);
			outcome.deactivated.push(node);
		}
	}
	if !was_active {
		activate(ctx, node);
		outcome.activated = Some(node);
	}
	outcome
}

pub fn toggle_pin(ctx: &mut InteractionContext, node: NodeIdx) {
	let Some(pinned) = ctx.graph.node(node).map(|n| !n.is_pinned()) else {
		return;
	};
	ctx.graph.set_pinned(node, pinned);
	if pinned {
		ctx.layout.pin(node);
	} else if ctx.state.dragged_node() != Some(node) {
		ctx.layout.unpin(node);
	}
	debug!("Node {} pinned: {}", node.0, pinned);
}

pub fn activate(ctx: &mut InteractionContext, node: NodeIdx) {
	let Some(data) = ctx.graph.node(node) else {
		return;
	};
	ctx.visual.set_node(node, NodeFlags::ACTIVE, true);
	for &neighbor in data.neighbors() {
		ctx.visual.set_node(neighbor, NodeFlags::ACTIVE_ADJACENT, true);
	}
	for &link in ctx.graph.incident_links(node) {
		ctx.visual.set_link(link, LinkFlags::ACTIVE_ADJACENT, true);
	}
	debug!("Activated node {}", node.0);
}

/// Collapse one node. Neighbours and links keep `ACTIVE_ADJACENT` when some
/// other expanded node still touches them.
pub fn deactivate(ctx: &mut InteractionContext, node: NodeIdx) {
	let Some(data) = ctx.graph.node(node) else {
		return;
	};
	ctx.visual.set_node(node, NodeFlags::ACTIVE, false);
	for &neighbor in data.neighbors() {
		let still_adjacent = ctx.graph.node(neighbor).is_some_and(|n| {
			n.neighbors()
				.iter()
				.any(|&m| ctx.visual.node(m).contains(NodeFlags::ACTIVE))
		});
		ctx.visual
			.set_node(neighbor, NodeFlags::ACTIVE_ADJACENT, still_adjacent);
	}
	for &link in ctx.graph.incident_links(node) {
		let still_adjacent = ctx.graph.link(link).is_some_and(|l| {
			ctx.visual.node(l.source).contains(NodeFlags::ACTIVE)
				|| ctx.visual.node(l.target).contains(NodeFlags::ACTIVE)
		});
		ctx.visual
			.set_link(link, LinkFlags::ACTIVE_ADJACENT, still_adjacent);
	}
	debug!("Deactivated node {}", node.0);
}

/// Collapse every expanded node, returning the ones that were expanded.
pub fn deactivate_all(ctx: &mut InteractionContext) -> Vec<NodeIdx> {
	let active: Vec<_> = ctx.visual.active_nodes().collect();
	for &node in &active {
		ctx.visual.set_node(node, NodeFlags::ACTIVE, false);
	}
	let adjacent: Vec<_> = ctx.visual.nodes_with(NodeFlags::ACTIVE_ADJACENT).collect();
	for node in adjacent {
		ctx.visual.set_node(node, NodeFlags::ACTIVE_ADJACENT, false);
	}
	let links: Vec<_> = ctx.visual.links_with(LinkFlags::ACTIVE_ADJACENT).collect();
	for link in links {
		ctx.visual.set_link(link, LinkFlags::ACTIVE_ADJACENT, false);
	}
	active
}

/// Pointer went down on `node` at screen position `at`.
pub fn drag_start(ctx: &mut InteractionContext, node: NodeIdx, at: Point) {
	let Some(node_origin) = ctx.graph.node(node).and_then(|n| n.position()) else {
		return;
	};
	ctx.state.suppress_click = false;
	ctx.state.gesture = Gesture::Pressed {
		node,
		origin: at,
		node_origin,
	};
}

/// Returns true while a drag is moving a node.
pub fn drag_move(ctx: &mut InteractionContext, at: Point) -> bool {
	let (node, origin, node_origin) = match ctx.state.gesture {
		Gesture::Idle => return false,
		Gesture::Pressed {
			node,
			origin,
			node_origin,
		} => {
			if origin.distance(at) <= ctx.config.drag_threshold {
				return false;
			}
			ctx.state.gesture = Gesture::Dragging {
				node,
				origin,
				node_origin,
			};
			ctx.state.suppress_click = true;
			ctx.layout.pin(node);
			(node, origin, node_origin)
		}
		Gesture::Dragging {
			node,
			origin,
			node_origin,
		} => (node, origin, node_origin),
	};
	let k = ctx.viewport.raw_scale();
	let target = Point::new(
		node_origin.x + (at.x - origin.x) / k,
		node_origin.y + (at.y - origin.y) / k,
	);
	ctx.layout.place(node, target);
	ctx.graph.set_position(node, target);
	true
}

/// Pointer released. Returns true when it finished a drag, in which case the
/// click that follows is swallowed.
pub fn drag_end(ctx: &mut InteractionContext) -> bool {
	let gesture = std::mem::take(&mut ctx.state.gesture);
	let Gesture::Dragging { node, .. } = gesture else {
		return false;
	};
	if ctx.graph.node(node).is_some_and(|n| !n.is_pinned()) {
		ctx.layout.unpin(node);
	}
	true
}
