//! End-to-end scenarios driven through `CrawlGraphState` without a canvas.

use crawl_graph_canvas::components::crawl_graph::interaction::{HoverTarget, Modifiers};
use crawl_graph_canvas::components::crawl_graph::label::{FixedAdvance, wrap_text};
use crawl_graph_canvas::components::crawl_graph::model::{LinkIdx, NodeIdx, Point};
use crawl_graph_canvas::components::crawl_graph::visual::{LinkFlags, NodeFlags};
use crawl_graph_canvas::components::crawl_graph::{
	CrawlGraphState, GraphConfig, GraphError, parse_document,
};
use rstest::{fixture, rstest};

/// Root 0 with leaves 1, 2 and 3; link `i - 1` joins the root to leaf `i`.
const STAR: &str = r#"{
	"nodes": [
		{"index": 0, "title": "Root page", "url": "https://root.example/"},
		{"index": 1, "title": "Leaf one", "url": "https://root.example/1"},
		{"index": 2, "title": "Leaf two", "url": "https://root.example/2", "isKeyword": true},
		{"index": 3, "title": "", "url": "https://root.example/3"}
	],
	"edges": [
		{"source": 0, "target": 1},
		{"source": 0, "target": 2},
		{"source": 0, "target": 3}
	]
}"#;

const ROOT: NodeIdx = NodeIdx(0);
const LEAF1: NodeIdx = NodeIdx(1);
const LEAF2: NodeIdx = NodeIdx(2);
const LEAF3: NodeIdx = NodeIdx(3);

fn with_config(config: GraphConfig) -> CrawlGraphState {
	let doc = parse_document(STAR).unwrap();
	let mut state =
		CrawlGraphState::new(&doc, config, 960.0, 960.0, Box::new(FixedAdvance::default()))
			.unwrap();
	state.set_layout_running(false);
	state
}

#[fixture]
fn star() -> CrawlGraphState {
	with_config(GraphConfig::default())
}

fn screen_of(state: &CrawlGraphState, idx: NodeIdx) -> Point {
	let pos = state.graph().node(idx).unwrap().position().unwrap();
	state.viewport().graph_to_screen(pos)
}

#[rstest]
fn hovering_a_leaf_marks_only_its_root_and_link(mut star: CrawlGraphState) {
	star.set_hover(Some(HoverTarget::Node(LEAF1)));
	let visual = star.visual();
	assert!(visual.node(LEAF1).contains(NodeFlags::HOVER));
	assert!(visual.node(ROOT).contains(NodeFlags::HOVER_ADJACENT));
	assert!(visual.link(LinkIdx(0)).contains(LinkFlags::HOVER_ADJACENT));
	assert!(visual.node(LEAF2).is_empty());
	assert!(visual.node(LEAF3).is_empty());
	assert!(visual.link(LinkIdx(1)).is_empty());
	assert!(visual.link(LinkIdx(2)).is_empty());

	// Only the touched elements are restyled.
	assert_eq!(star.redraw(), 3);

	star.set_hover(None);
	assert!(star.visual().node(ROOT).is_empty());
	assert!(star.visual().link(LinkIdx(0)).is_empty());
}

#[rstest]
fn clicking_a_leaf_after_the_root_moves_the_expansion(mut star: CrawlGraphState) {
	star.click_node(ROOT, Modifiers::empty());
	assert!(star.visual().node(ROOT).contains(NodeFlags::ACTIVE));

	star.click_node(LEAF1, Modifiers::empty());
	let visual = star.visual();
	assert!(!visual.node(ROOT).contains(NodeFlags::ACTIVE));
	assert!(visual.node(LEAF1).contains(NodeFlags::ACTIVE));
	assert!(visual.node(ROOT).contains(NodeFlags::ACTIVE_ADJACENT));
	assert!(visual.node(LEAF2).is_empty());
	assert!(visual.node(LEAF3).is_empty());
	assert!(star.panel(ROOT).is_none());
	assert!(star.panel(LEAF1).is_some());
}

#[rstest]
fn shift_keeps_several_panels_open(mut star: CrawlGraphState) {
	star.click_node(LEAF1, Modifiers::empty());
	star.click_node(LEAF2, Modifiers::SHIFT);
	assert_eq!(star.visual().active_nodes().count(), 2);

	star.click_node(LEAF1, Modifiers::SHIFT);
	assert_eq!(star.visual().active_nodes().collect::<Vec<_>>(), vec![LEAF2]);
	assert!(star.visual().node(ROOT).contains(NodeFlags::ACTIVE_ADJACENT));
	assert!(!star.visual().link(LinkIdx(0)).contains(LinkFlags::ACTIVE_ADJACENT));
	assert!(star.visual().link(LinkIdx(1)).contains(LinkFlags::ACTIVE_ADJACENT));
}

#[rstest]
fn empty_title_wraps_to_one_empty_line(mut star: CrawlGraphState) {
	assert_eq!(
		wrap_text("", 1.0, 16.0, &FixedAdvance::default()),
		vec![String::new()]
	);
	star.click_node(LEAF3, Modifiers::empty());
	let panel = star.panel(LEAF3).unwrap();
	assert_eq!(panel.layout.title.lines, vec![String::new()]);
	assert_eq!(panel.layout.url_offset, panel.layout.title.line_height);
}

#[rstest]
fn panel_height_stacks_both_blocks_and_the_diameter(mut star: CrawlGraphState) {
	star.click_node(LEAF1, Modifiers::empty());
	let layout = &star.panel(LEAF1).unwrap().layout;
	let diameter = 2.0 * star.config().node_radius / star.viewport().effective_scale();
	assert_eq!(
		layout.height,
		layout.title.height() + layout.url.height() + diameter
	);
	assert_eq!(layout.url_offset, layout.title.height());
}

#[test]
fn missing_edges_is_invalid_and_builds_nothing() {
	let err = parse_document(r#"{"nodes": []}"#).unwrap_err();
	assert!(matches!(err, GraphError::InvalidGraph(_)));
}

#[rstest]
fn root_starts_pinned_and_ctrl_click_toggles(mut star: CrawlGraphState) {
	assert!(star.graph().node(ROOT).unwrap().is_pinned());
	let outcome = star.click_node(LEAF2, Modifiers::CTRL);
	assert!(outcome.pin_toggled);
	assert!(star.graph().node(LEAF2).unwrap().is_pinned());
	assert_eq!(star.visual().active_nodes().count(), 0);
}

#[rstest]
fn dragging_a_pinned_node_keeps_it_pinned(mut star: CrawlGraphState) {
	let start = screen_of(&star, ROOT);
	star.pointer_down(start);
	star.pointer_move(Point::new(start.x + 40.0, start.y));
	assert!(star.interaction().is_dragging());
	star.pointer_up();
	assert!(star.graph().node(ROOT).unwrap().is_pinned());
	let moved = star.graph().node(ROOT).unwrap().position().unwrap();
	assert!((moved.x - (480.0 + 40.0)).abs() < 1e-9);

	// The click the browser sends after the drag does nothing.
	let at = screen_of(&star, ROOT);
	star.click_at(at, Modifiers::empty());
	assert_eq!(star.visual().active_nodes().count(), 0);
}

#[rstest]
fn open_panel_follows_its_node(mut star: CrawlGraphState) {
	star.click_node(LEAF1, Modifiers::empty());
	let start = screen_of(&star, LEAF1);
	star.pointer_down(start);
	star.pointer_move(Point::new(start.x, start.y + 25.0));
	star.redraw();
	let scene = star.scene();
	let node = scene.nodes.iter().find(|n| n.idx == LEAF1).unwrap();
	let panel = node.panel.as_ref().unwrap();
	let pos = star.graph().node(LEAF1).unwrap().position().unwrap();
	assert_eq!(panel.origin, pos);
}

#[rstest]
fn zooming_in_shrinks_element_sizes(mut star: CrawlGraphState) {
	let before = star.link_style(LinkIdx(0)).unwrap().width;
	star.set_scale(4.0);
	star.redraw();
	let after = star.link_style(LinkIdx(0)).unwrap().width;
	assert!(after < before);
	let expected = 2.0 / star.viewport().effective_scale();
	assert!((after - expected).abs() < 1e-9);
}

#[test]
fn broken_simulation_falls_back_to_grid() {
	let mut config = GraphConfig::default();
	config.simulation.node_mass = -1.0;
	let mut state = with_config(config);
	assert!(matches!(
		state.layout_fallback(),
		Some(GraphError::LayoutUnavailable(_))
	));
	state.tick(0.016);
	let at = screen_of(&state, LEAF2);
	state.pointer_down(at);
	state.pointer_up();
	state.click_at(at, Modifiers::empty());
	assert!(state.visual().node(LEAF2).contains(NodeFlags::ACTIVE));
}

#[test]
fn invalid_config_is_rejected() {
	let doc = parse_document(STAR).unwrap();
	let config = GraphConfig {
		zoom_factor: 0.0,
		..GraphConfig::default()
	};
	let result = CrawlGraphState::new(
		&doc,
		config,
		960.0,
		960.0,
		Box::new(FixedAdvance::default()),
	);
	assert!(matches!(result, Err(GraphError::InvalidConfig(_))));
}

#[rstest]
fn panning_onto_a_node_does_not_expand_it(mut star: CrawlGraphState) {
	// Start left of the root, well clear of every node.
	let start = Point::new(40.0, 480.0);
	assert!(star.node_at(start).is_none());
	star.pointer_down(start);
	star.pointer_move(Point::new(140.0, 480.0));
	star.pointer_up();
	assert_eq!(star.viewport().pan(), Point::new(100.0, 0.0));

	let root = screen_of(&star, ROOT);
	assert_eq!(star.node_at(root), Some(ROOT));
	star.click_at(root, Modifiers::empty());
	assert_eq!(star.visual().active_nodes().count(), 0);
	assert!(star.panel(ROOT).is_none());
}

#[rstest]
fn press_and_release_on_different_nodes_is_not_a_click(mut star: CrawlGraphState) {
	star.pointer_down(screen_of(&star, LEAF1));
	star.pointer_up();
	star.click_at(screen_of(&star, LEAF2), Modifiers::empty());
	assert_eq!(star.visual().active_nodes().count(), 0);
}
