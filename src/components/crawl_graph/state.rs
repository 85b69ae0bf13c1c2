use std::collections::BTreeMap;

use log::{debug, info, warn};

use super::config::GraphConfig;
use super::error::{GraphError, Result};
use super::interaction::{
	self, ClickOutcome, Gesture, HoverTarget, InteractionContext, InteractionState, Modifiers,
};
use super::label::{PanelLayout, TextMeasure};
use super::layout::{LayoutAdapter, LayoutTick, scatter};
use super::model::{Graph, LinkIdx, NodeIdx, Point};
use super::scale::Viewport;
use super::types::CrawlDocument;
use super::visual::{
	ElementId, Emphasis, LinkStyle, NodeFlags, NodeStyle, VisualState, resolve_link_style,
	resolve_node_style,
};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Text panel of an expanded node. `progress` runs from 0 to 1 while the node
/// grows; text stays hidden until it reaches 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedPanel {
	pub layout: PanelLayout,
	pub progress: f64,
}

impl ExpandedPanel {
	pub fn text_visible(&self) -> bool {
		self.progress >= 1.0
	}
}

/// What the pointer went down on. A click only reaches a node when it was
/// pressed on that same node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressTarget {
	Node(NodeIdx),
	Background,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: Point,
	pub pan_start: Point,
}

/// Current rounded rectangle of a node in layout units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub corner_radius: f64,
}

impl NodeGeometry {
	fn contains(&self, p: Point) -> bool {
		let r = self.corner_radius;
		if self.width <= 2.0 * r + f64::EPSILON && self.height <= 2.0 * r + f64::EPSILON {
			return Point::new(self.x + r, self.y + r).distance(p) <= r;
		}
		(self.x..=self.x + self.width).contains(&p.x) && (self.y..=self.y + self.height).contains(&p.y)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult {
	Nothing,
	/// The click landed on the URL of an expanded node.
	OpenUrl(String),
	Node(ClickOutcome),
}

pub struct SceneLink<'a> {
	pub from: Point,
	pub to: Point,
	pub style: &'a LinkStyle,
}

pub struct ScenePanel<'a> {
	pub origin: Point,
	pub layout: &'a PanelLayout,
	pub text_visible: bool,
}

pub struct SceneNode<'a> {
	pub idx: NodeIdx,
	pub geometry: NodeGeometry,
	pub style: &'a NodeStyle,
	pub panel: Option<ScenePanel<'a>>,
}

/// Everything the renderer needs for one frame, nodes in draw order.
pub struct Scene<'a> {
	pub pan: Point,
	pub scale: f64,
	pub config: &'a GraphConfig,
	pub links: Vec<SceneLink<'a>>,
	pub nodes: Vec<SceneNode<'a>>,
}

/// One loaded crawl graph and everything needed to explore it.
pub struct CrawlGraphState {
	config: GraphConfig,
	graph: Graph,
	visual: VisualState,
	layout: LayoutAdapter,
	viewport: Viewport,
	interaction: InteractionState,
	pan: PanState,
	pressed: Option<PressTarget>,
	panels: BTreeMap<NodeIdx, ExpandedPanel>,
	node_styles: Vec<NodeStyle>,
	link_styles: Vec<LinkStyle>,
	draw_order: Vec<NodeIdx>,
	measure: Box<dyn TextMeasure>,
	generation: u64,
	pub width: f64,
	pub height: f64,
}

impl CrawlGraphState {
	pub fn new(
		data: &CrawlDocument,
		config: GraphConfig,
		width: f64,
		height: f64,
		measure: Box<dyn TextMeasure>,
	) -> Result<Self> {
		config.validate()?;
		let center = Point::new(width / 2.0, height / 2.0);
		let graph = Graph::build(data, center)?;
		let mut state = Self {
			layout: LayoutAdapter::new(&config, center),
			viewport: Viewport::new(&config),
			config,
			graph,
			visual: VisualState::default(),
			interaction: InteractionState::default(),
			pan: PanState::default(),
			pressed: None,
			panels: BTreeMap::new(),
			node_styles: Vec::new(),
			link_styles: Vec::new(),
			draw_order: Vec::new(),
			measure,
			generation: 0,
			width,
			height,
		};
		state.start();
		Ok(state)
	}

	/// Replace the graph with a new crawl. On error the current graph stays.
	pub fn load(&mut self, data: &CrawlDocument) -> Result<()> {
		let graph = Graph::build(data, self.center())?;
		info!("Replacing crawl graph generation {}", self.generation);
		self.graph = graph;
		self.start();
		Ok(())
	}

	fn start(&mut self) {
		self.panels.clear();
		self.interaction = InteractionState::default();
		self.pan = PanState::default();
		self.pressed = None;
		self.viewport.reset();

		let seeds = scatter(&self.graph, self.center(), self.config.initial_scatter);
		self.generation = self.layout.load(&self.graph, &seeds);
		for (i, seed) in seeds.into_iter().enumerate() {
			self.graph.set_position(NodeIdx(i), seed);
		}

		let (nodes, links) = (self.graph.nodes().len(), self.graph.links().len());
		self.visual = VisualState::new(nodes, links);
		self.draw_order = (0..nodes).map(NodeIdx).collect();
		let scale = self.viewport.effective_scale();
		self.node_styles = self
			.graph
			.nodes()
			.iter()
			.map(|n| resolve_node_style(n, NodeFlags::empty(), None, &self.config, scale))
			.collect();
		self.link_styles = vec![resolve_link_style(Default::default(), &self.config, scale); links];
		self.redraw();
		info!(
			"Loaded crawl graph generation {}: {} nodes, {} links",
			self.generation, nodes, links
		);
	}

	fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn visual(&self) -> &VisualState {
		&self.visual
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Set when the simulation could not start and nodes sit on a grid.
	pub fn layout_fallback(&self) -> Option<&GraphError> {
		self.layout.fallback()
	}

	pub fn set_layout_running(&mut self, running: bool) {
		self.layout.running = running;
	}

	pub fn panel(&self, idx: NodeIdx) -> Option<&ExpandedPanel> {
		self.panels.get(&idx)
	}

	pub fn node_style(&self, idx: NodeIdx) -> Option<&NodeStyle> {
		self.node_styles.get(idx.0)
	}

	pub fn link_style(&self, idx: LinkIdx) -> Option<&LinkStyle> {
		self.link_styles.get(idx.0)
	}

	pub fn draw_order(&self) -> &[NodeIdx] {
		&self.draw_order
	}

	fn ctx(&mut self) -> InteractionContext<'_> {
		InteractionContext {
			graph: &mut self.graph,
			visual: &mut self.visual,
			layout: &mut self.layout,
			state: &mut self.interaction,
			viewport: &self.viewport,
			config: &self.config,
		}
	}

	// Simulation

	/// Advance the simulation one step and return its positions without
	/// applying them.
	pub fn step_layout(&mut self, dt: f32) -> LayoutTick {
		self.layout.tick(dt)
	}

	/// Copy simulated positions onto the nodes. Ticks from a graph that has
	/// since been replaced are dropped.
	pub fn apply_tick(&mut self, tick: LayoutTick) -> bool {
		if tick.generation != self.generation {
			warn!(
				"Dropping layout tick for generation {} (current {})",
				tick.generation, self.generation
			);
			return false;
		}
		for (i, position) in tick.positions.into_iter().enumerate() {
			self.graph.set_position(NodeIdx(i), position);
		}
		true
	}

	/// One animation frame: simulation step plus panel expansion.
	pub fn tick(&mut self, dt: f32) {
		let tick = self.step_layout(dt);
		self.apply_tick(tick);
		let step = if self.config.expand_duration > 0.0 {
			dt as f64 / self.config.expand_duration
		} else {
			1.0
		};
		for panel in self.panels.values_mut() {
			panel.progress = (panel.progress + step).min(1.0);
		}
	}

	// Style

	/// Restyle the elements marked dirty since the last pass. Returns how many
	/// were restyled.
	pub fn redraw(&mut self) -> usize {
		let dirty = self.visual.take_dirty();
		let scale = self.viewport.effective_scale();
		for id in &dirty {
			match *id {
				ElementId::Node(idx) => {
					let (Some(node), Some(slot)) =
						(self.graph.node(idx), self.node_styles.get_mut(idx.0))
					else {
						continue;
					};
					let panel_height = self.panels.get(&idx).map(|p| p.layout.height);
					*slot = resolve_node_style(
						node,
						self.visual.node(idx),
						panel_height,
						&self.config,
						scale,
					);
				}
				ElementId::Link(idx) => {
					if let Some(slot) = self.link_styles.get_mut(idx.0) {
						*slot = resolve_link_style(self.visual.link(idx), &self.config, scale);
					}
				}
			}
		}
		dirty.len()
	}

	fn layout_panel(&self, idx: NodeIdx) -> Option<PanelLayout> {
		let node = self.graph.node(idx)?;
		Some(PanelLayout::compute(
			&node.title,
			&node.url,
			self.config.radius(node.kind),
			&self.config,
			self.viewport.effective_scale(),
			self.measure.as_ref(),
		))
	}

	fn open_panel(&mut self, idx: NodeIdx) {
		let Some(layout) = self.layout_panel(idx) else {
			return;
		};
		let progress = if self.config.expand_duration > 0.0 { 0.0 } else { 1.0 };
		self.panels.insert(idx, ExpandedPanel { layout, progress });
		self.visual.mark_dirty(ElementId::Node(idx));
	}

	fn relayout_panels(&mut self) {
		let ids: Vec<_> = self.panels.keys().copied().collect();
		for idx in ids {
			if let Some(layout) = self.layout_panel(idx)
				&& let Some(panel) = self.panels.get_mut(&idx)
			{
				panel.layout = layout;
			}
		}
	}

	/// Change a node's text. Its panel, if open, is wrapped again.
	pub fn update_node_text(&mut self, idx: NodeIdx, title: String, url: String) {
		if !self.graph.contains(idx) {
			return;
		}
		self.graph.set_text(idx, title, url);
		if let Some(layout) = self.layout_panel(idx)
			&& let Some(panel) = self.panels.get_mut(&idx)
		{
			panel.layout = layout;
			self.visual.mark_dirty(ElementId::Node(idx));
		}
	}

	// Viewport

	fn rescaled(&mut self, changed: bool) {
		if changed {
			self.relayout_panels();
			self.visual.mark_all_dirty();
		}
	}

	pub fn set_scale(&mut self, raw_scale: f64) {
		let changed = self.viewport.set_scale(raw_scale);
		self.rescaled(changed);
	}

	/// Wheel zoom around a screen point.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
		let changed = self.viewport.zoom_at(anchor, factor);
		self.rescaled(changed);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	// Hit testing

	pub fn node_geometry(&self, idx: NodeIdx) -> Option<NodeGeometry> {
		let pos = self.graph.node(idx)?.position()?;
		let style = self.node_styles.get(idx.0)?;
		let collapsed = style.inset * 2.0;
		let (width, height) = match self.panels.get(&idx) {
			Some(panel) if style.emphasis == Emphasis::Active => {
				let t = ease_out_cubic(panel.progress);
				(
					collapsed + (style.width - collapsed) * t,
					collapsed + (style.height - collapsed) * t,
				)
			}
			_ => (collapsed, collapsed),
		};
		Some(NodeGeometry {
			x: pos.x - style.inset,
			y: pos.y - style.inset,
			width,
			height,
			corner_radius: style.corner_radius,
		})
	}

	/// Top-most node under a screen point.
	pub fn node_at(&self, screen: Point) -> Option<NodeIdx> {
		let p = self.viewport.screen_to_graph(screen);
		self.draw_order
			.iter()
			.rev()
			.copied()
			.find(|&idx| self.node_geometry(idx).is_some_and(|g| g.contains(p)))
	}

	pub fn link_at(&self, screen: Point) -> Option<LinkIdx> {
		let p = self.viewport.screen_to_graph(screen);
		let tolerance = self.config.link_hit_tolerance / self.viewport.effective_scale();
		self.graph.links().iter().find_map(|link| {
			let a = self.graph.node(link.source)?.position()?;
			let b = self.graph.node(link.target)?.position()?;
			let half_width = self.link_styles.get(link.idx.0).map_or(0.0, |s| s.width / 2.0);
			(segment_distance(p, a, b) <= tolerance + half_width).then_some(link.idx)
		})
	}

	/// URL under a screen point, if it falls on the visible URL text of an
	/// expanded node that is not covered by another node.
	pub fn panel_link_at(&self, screen: Point) -> Option<&str> {
		let idx = self.node_at(screen)?;
		let panel = self.panels.get(&idx).filter(|p| p.text_visible())?;
		let node = self.graph.node(idx)?;
		let pos = node.position()?;
		let p = self.viewport.screen_to_graph(screen);
		panel
			.layout
			.url_contains(p.x - pos.x, p.y - pos.y)
			.then_some(node.url.as_str())
	}

	// Pointer input

	pub fn set_hover(&mut self, target: Option<HoverTarget>) {
		let mut ctx = self.ctx();
		match target {
			None => interaction::clear_hover(&mut ctx),
			Some(HoverTarget::Node(idx)) => interaction::pointer_enter(&mut ctx, idx),
			Some(HoverTarget::Link(idx)) => interaction::pointer_enter_link(&mut ctx, idx),
		}
	}

	pub fn pointer_down(&mut self, screen: Point) {
		self.interaction.arm_click();
		if let Some(idx) = self.node_at(screen) {
			self.pressed = Some(PressTarget::Node(idx));
			interaction::drag_start(&mut self.ctx(), idx, screen);
		} else {
			self.pressed = Some(PressTarget::Background);
			self.pan = PanState {
				active: true,
				start: screen,
				pan_start: self.viewport.pan(),
			};
		}
	}

	pub fn pointer_move(&mut self, screen: Point) {
		if self.pan.active {
			let pan = Point::new(
				self.pan.pan_start.x + (screen.x - self.pan.start.x),
				self.pan.pan_start.y + (screen.y - self.pan.start.y),
			);
			self.viewport.set_pan(pan);
			if self.pan.start.distance(screen) > self.config.drag_threshold {
				self.interaction.suppress_click();
			}
			return;
		}
		if self.interaction.gesture() == Gesture::Idle {
			let target = self
				.node_at(screen)
				.map(HoverTarget::Node)
				.or_else(|| self.link_at(screen).map(HoverTarget::Link));
			self.set_hover(target);
		} else {
			interaction::drag_move(&mut self.ctx(), screen);
		}
	}

	pub fn pointer_up(&mut self) {
		interaction::drag_end(&mut self.ctx());
		self.pan.active = false;
	}

	/// Pointer left the canvas: end any gesture and drop the hover.
	pub fn pointer_exit(&mut self) {
		self.pointer_up();
		self.set_hover(None);
	}

	pub fn click_at(&mut self, screen: Point, modifiers: Modifiers) -> ClickResult {
		let hit = self.node_at(screen);
		let released_elsewhere = match self.pressed.take() {
			Some(PressTarget::Node(idx)) => hit != Some(idx),
			Some(PressTarget::Background) => hit.is_some(),
			None => false,
		};
		if released_elsewhere {
			debug!("Click released away from where it was pressed");
			self.interaction.arm_click();
			return ClickResult::Nothing;
		}
		if !self.interaction.click_suppressed()
			&& !modifiers.contains(Modifiers::CTRL)
			&& let Some(url) = self.panel_link_at(screen)
		{
			return ClickResult::OpenUrl(url.to_owned());
		}
		match hit {
			Some(idx) => ClickResult::Node(self.click_node(idx, modifiers)),
			None => {
				self.interaction.arm_click();
				ClickResult::Nothing
			}
		}
	}

	pub fn click_node(&mut self, idx: NodeIdx, modifiers: Modifiers) -> ClickOutcome {
		let outcome = interaction::click(&mut self.ctx(), idx, modifiers);
		for node in &outcome.deactivated {
			self.panels.remove(node);
		}
		if let Some(node) = outcome.activated {
			self.open_panel(node);
		}
		if let Some(node) = outcome.clicked {
			self.bring_to_front(node);
		}
		outcome
	}

	fn bring_to_front(&mut self, idx: NodeIdx) {
		if let Some(at) = self.draw_order.iter().position(|&n| n == idx) {
			self.draw_order.remove(at);
			self.draw_order.push(idx);
		}
	}

	// Output

	pub fn scene(&self) -> Scene<'_> {
		let links = self
			.graph
			.links()
			.iter()
			.filter_map(|link| {
				Some(SceneLink {
					from: self.graph.node(link.source)?.position()?,
					to: self.graph.node(link.target)?.position()?,
					style: self.link_styles.get(link.idx.0)?,
				})
			})
			.collect();
		let nodes = self
			.draw_order
			.iter()
			.filter_map(|&idx| {
				let geometry = self.node_geometry(idx)?;
				let origin = self.graph.node(idx)?.position()?;
				Some(SceneNode {
					idx,
					geometry,
					style: self.node_styles.get(idx.0)?,
					panel: self.panels.get(&idx).map(|panel| ScenePanel {
						origin,
						layout: &panel.layout,
						text_visible: panel.text_visible(),
					}),
				})
			})
			.collect();
		Scene {
			pan: self.viewport.pan(),
			scale: self.viewport.raw_scale(),
			config: &self.config,
			links,
			nodes,
		}
	}
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
	use super::super::label::FixedAdvance;
	use super::super::types::parse_document;
	use super::*;

	const DOC: &str = r#"{
		"nodes": [
			{"index": 0, "title": "Start", "url": "http://start.example"},
			{"index": 1, "title": "One", "url": "http://one.example", "isKeyword": true},
			{"index": 2, "title": "Two", "url": "http://two.example"}
		],
		"edges": [{"source": 0, "target": 1}, {"source": 0, "target": 2}]
	}"#;

	fn state() -> CrawlGraphState {
		let doc = parse_document(DOC).unwrap();
		let mut state = CrawlGraphState::new(
			&doc,
			GraphConfig::default(),
			960.0,
			960.0,
			Box::new(FixedAdvance::default()),
		)
		.unwrap();
		state.set_layout_running(false);
		state
	}

	fn screen_of(state: &CrawlGraphState, idx: usize) -> Point {
		let pos = state.graph().node(NodeIdx(idx)).unwrap().position().unwrap();
		state.viewport().graph_to_screen(pos)
	}

	#[test]
	fn first_redraw_styles_everything_then_nothing() {
		let mut state = state();
		assert_eq!(state.redraw(), 0);
		state.set_hover(Some(HoverTarget::Node(NodeIdx(1))));
		// Node 1, the root and the link between them.
		assert_eq!(state.redraw(), 3);
		assert_eq!(state.node_style(NodeIdx(1)).unwrap().fill, "green");
		assert_eq!(state.redraw(), 0);
	}

	#[test]
	fn zoom_restyles_all_and_rewraps_panels() {
		let mut state = state();
		state.click_node(NodeIdx(0), Modifiers::empty());
		state.redraw();
		let before = state.panel(NodeIdx(0)).unwrap().layout.height;
		state.zoom_at(Point::new(480.0, 480.0), 2.0);
		assert_eq!(state.redraw(), 5);
		let after = state.panel(NodeIdx(0)).unwrap().layout.height;
		assert!(after < before);
		let style = state.node_style(NodeIdx(0)).unwrap();
		assert_eq!(style.height, after);
	}

	#[test]
	fn panel_text_waits_for_expansion() {
		let mut state = state();
		state.click_node(NodeIdx(2), Modifiers::empty());
		assert!(!state.panel(NodeIdx(2)).unwrap().text_visible());
		for _ in 0..20 {
			state.tick(0.016);
		}
		assert!(state.panel(NodeIdx(2)).unwrap().text_visible());
	}

	#[test]
	fn stale_ticks_are_dropped() {
		let mut state = state();
		let stale = state.step_layout(0.016);
		state.load(&parse_document(DOC).unwrap()).unwrap();
		assert!(!state.apply_tick(stale));
		let fresh = state.step_layout(0.016);
		assert!(state.apply_tick(fresh));
	}

	#[test]
	fn replacing_the_graph_resets_everything() {
		let mut state = state();
		state.click_node(NodeIdx(1), Modifiers::empty());
		state.zoom_at(Point::new(0.0, 0.0), 3.0);
		state.load(&parse_document(DOC).unwrap()).unwrap();
		assert_eq!(state.viewport().raw_scale(), 1.0);
		assert!(state.panel(NodeIdx(1)).is_none());
		assert_eq!(state.visual().active_nodes().count(), 0);
	}

	#[test]
	fn invalid_reload_keeps_current_graph() {
		let mut state = state();
		let generation = state.generation();
		let bad = parse_document(r#"{"nodes": [], "edges": []}"#).unwrap();
		assert!(matches!(state.load(&bad), Err(GraphError::InvalidGraph(_))));
		assert_eq!(state.generation(), generation);
		assert_eq!(state.graph().nodes().len(), 3);
	}

	#[test]
	fn clicked_node_moves_to_front() {
		let mut state = state();
		state.click_node(NodeIdx(0), Modifiers::empty());
		assert_eq!(state.draw_order().last(), Some(&NodeIdx(0)));
	}

	#[test]
	fn pointer_click_on_node_activates_it() {
		let mut state = state();
		let at = screen_of(&state, 1);
		state.pointer_down(at);
		state.pointer_up();
		let result = state.click_at(at, Modifiers::empty());
		assert!(matches!(result, ClickResult::Node(ClickOutcome { activated: Some(NodeIdx(1)), .. })));
	}

	#[test]
	fn click_on_visible_url_opens_it() {
		let mut state = state();
		state.click_node(NodeIdx(0), Modifiers::empty());
		state.tick(1.0);
		state.redraw();
		let panel = state.panel(NodeIdx(0)).unwrap().layout.clone();
		let pos = state.graph().node(NodeIdx(0)).unwrap().position().unwrap();
		let on_url = Point::new(pos.x + 2.0, pos.y + panel.url_offset + 2.0);
		let screen = state.viewport().graph_to_screen(on_url);
		assert_eq!(
			state.click_at(screen, Modifiers::empty()),
			ClickResult::OpenUrl("http://start.example".into())
		);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = state();
		state.pointer_down(Point::new(5.0, 5.0));
		state.pointer_move(Point::new(25.0, 15.0));
		state.pointer_up();
		assert_eq!(state.viewport().pan(), Point::new(20.0, 10.0));
	}

	#[test]
	fn background_pan_swallows_the_click() {
		let mut state = state();
		state.pointer_down(Point::new(5.0, 5.0));
		state.pointer_move(Point::new(45.0, 5.0));
		assert!(state.interaction().click_suppressed());
		state.pointer_up();
	}

	#[test]
	fn click_released_on_another_node_does_nothing() {
		let mut state = state();
		state.pointer_down(screen_of(&state, 1));
		state.pointer_up();
		let result = state.click_at(screen_of(&state, 2), Modifiers::empty());
		assert_eq!(result, ClickResult::Nothing);
		assert_eq!(state.visual().active_nodes().count(), 0);

		// The next press starts over.
		let at = screen_of(&state, 2);
		state.pointer_down(at);
		state.pointer_up();
		assert!(matches!(state.click_at(at, Modifiers::empty()), ClickResult::Node(_)));
	}

	#[test]
	fn collapsed_node_hit_tests_small_before_redraw() {
		let mut state = state();
		state.click_node(NodeIdx(1), Modifiers::empty());
		state.redraw();
		state.tick(1.0);
		let inset = state.node_style(NodeIdx(1)).unwrap().inset;
		assert!(state.node_geometry(NodeIdx(1)).unwrap().height > 2.0 * inset);

		state.click_node(NodeIdx(1), Modifiers::empty());
		assert!(state.panel(NodeIdx(1)).is_none());
		let geometry = state.node_geometry(NodeIdx(1)).unwrap();
		assert_eq!(geometry.width, 2.0 * inset);
		assert_eq!(geometry.height, 2.0 * inset);
	}

	#[test]
	fn text_change_rewraps_open_panel() {
		let mut state = state();
		state.click_node(NodeIdx(2), Modifiers::empty());
		let long = "x".repeat(200);
		state.update_node_text(NodeIdx(2), long, String::new());
		assert!(state.panel(NodeIdx(2)).unwrap().layout.title.lines.len() > 1);
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		let a = Point::new(0.0, 0.0);
		let b = Point::new(10.0, 0.0);
		assert_eq!(segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
		assert_eq!(segment_distance(Point::new(13.0, 4.0), a, b), 5.0);
	}
}
