//! Bridge to the physics simulation that owns node positions.
//!
//! The rest of the engine never moves a node itself: it seeds the layout,
//! pins and places nodes through it, and applies the positions each tick
//! reports. A [`GridLayout`] stands in when the simulation cannot start.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::config::{GraphConfig, SimulationConfig};
use super::error::{GraphError, Result};
use super::model::{Graph, NodeIdx, Point};

/// Positions produced by one simulation step for one loaded graph.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTick {
	pub generation: u64,
	pub positions: Vec<Point>,
}

/// Something that can place the nodes of a graph.
pub trait LayoutEngine {
	/// Replace whatever was loaded. `seeds[i]` is the start position of node `i`.
	fn load(&mut self, seeds: &[Point], links: &[(NodeIdx, NodeIdx)], pinned: &[bool]);
	fn step(&mut self, dt: f32);
	fn positions(&self) -> Vec<Point>;
	fn pin(&mut self, node: NodeIdx);
	fn unpin(&mut self, node: NodeIdx);
	/// Move a node to `at` regardless of forces.
	fn place(&mut self, node: NodeIdx, at: Point);
}

pub struct ForceLayout {
	parameters: SimulationConfig,
	graph: ForceGraph<usize, ()>,
	handles: Vec<DefaultNodeIdx>,
}

impl ForceLayout {
	pub fn new(parameters: &SimulationConfig) -> Result<Self> {
		let values = [
			parameters.force_charge,
			parameters.force_spring,
			parameters.force_max,
			parameters.node_speed,
			parameters.damping_factor,
			parameters.node_mass,
		];
		if values.iter().any(|v| !v.is_finite()) {
			return Err(GraphError::LayoutUnavailable(
				"simulation parameters must be finite".into(),
			));
		}
		if parameters.node_mass <= 0.0 {
			return Err(GraphError::LayoutUnavailable(format!(
				"node mass must be positive, got {}",
				parameters.node_mass
			)));
		}
		Ok(Self {
			parameters: parameters.clone(),
			graph: ForceGraph::new(Self::simulation(parameters)),
			handles: Vec::new(),
		})
	}

	fn simulation(parameters: &SimulationConfig) -> SimulationParameters {
		SimulationParameters {
			force_charge: parameters.force_charge,
			force_spring: parameters.force_spring,
			force_max: parameters.force_max,
			node_speed: parameters.node_speed,
			damping_factor: parameters.damping_factor,
		}
	}

	fn with_node(&mut self, node: NodeIdx, f: impl Fn(&mut NodeData<usize>)) {
		let Some(&handle) = self.handles.get(node.0) else {
			return;
		};
		self.graph.visit_nodes_mut(|n| {
			if n.index() == handle {
				f(&mut n.data);
			}
		});
	}
}

impl LayoutEngine for ForceLayout {
	fn load(&mut self, seeds: &[Point], links: &[(NodeIdx, NodeIdx)], pinned: &[bool]) {
		self.graph = ForceGraph::new(Self::simulation(&self.parameters));
		self.handles = seeds
			.iter()
			.enumerate()
			.map(|(i, seed)| {
				self.graph.add_node(NodeData {
					x: seed.x as f32,
					y: seed.y as f32,
					mass: self.parameters.node_mass,
					is_anchor: pinned.get(i).copied().unwrap_or(false),
					user_data: i,
				})
			})
			.collect();
		for &(source, target) in links {
			if let (Some(&src), Some(&tgt)) = (self.handles.get(source.0), self.handles.get(target.0)) {
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
	}

	fn step(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	fn positions(&self) -> Vec<Point> {
		let mut positions = vec![Point::default(); self.handles.len()];
		self.graph.visit_nodes(|node| {
			if let Some(slot) = positions.get_mut(node.data.user_data) {
				*slot = Point::new(node.x() as f64, node.y() as f64);
			}
		});
		positions
	}

	fn pin(&mut self, node: NodeIdx) {
		self.with_node(node, |data| data.is_anchor = true);
	}

	fn unpin(&mut self, node: NodeIdx) {
		self.with_node(node, |data| data.is_anchor = false);
	}

	fn place(&mut self, node: NodeIdx, at: Point) {
		self.with_node(node, |data| {
			data.x = at.x as f32;
			data.y = at.y as f32;
		});
	}
}

/// Static rows-and-columns placement around a centre point.
#[derive(Clone, Debug, Default)]
pub struct GridLayout {
	center: Point,
	spacing: f64,
	positions: Vec<Point>,
}

impl GridLayout {
	pub fn new(center: Point, spacing: f64) -> Self {
		Self {
			center,
			spacing,
			positions: Vec::new(),
		}
	}
}

impl LayoutEngine for GridLayout {
	fn load(&mut self, seeds: &[Point], _links: &[(NodeIdx, NodeIdx)], _pinned: &[bool]) {
		let columns = (seeds.len() as f64).sqrt().ceil().max(1.0) as usize;
		let rows = seeds.len().div_ceil(columns);
		let (x0, y0) = (
			self.center.x - (columns - 1) as f64 * self.spacing / 2.0,
			self.center.y - rows.saturating_sub(1) as f64 * self.spacing / 2.0,
		);
		self.positions = (0..seeds.len())
			.map(|i| {
				Point::new(
					x0 + (i % columns) as f64 * self.spacing,
					y0 + (i / columns) as f64 * self.spacing,
				)
			})
			.collect();
	}

	fn step(&mut self, _dt: f32) {}

	fn positions(&self) -> Vec<Point> {
		self.positions.clone()
	}

	fn pin(&mut self, _node: NodeIdx) {}

	fn unpin(&mut self, _node: NodeIdx) {}

	fn place(&mut self, node: NodeIdx, at: Point) {
		if let Some(slot) = self.positions.get_mut(node.0) {
			*slot = at;
		}
	}
}

/// Owns the layout engine for whichever graph is loaded and stamps every tick
/// with that graph's generation.
pub struct LayoutAdapter {
	engine: Box<dyn LayoutEngine>,
	generation: u64,
	fallback: Option<GraphError>,
	pub running: bool,
}

impl LayoutAdapter {
	/// Start the force simulation, or fall back to a grid when it refuses to.
	pub fn new(config: &GraphConfig, center: Point) -> Self {
		match ForceLayout::new(&config.simulation) {
			Ok(force) => Self::with_engine(Box::new(force)),
			Err(err) => {
				warn!("{err}; falling back to grid placement");
				let mut adapter = Self::with_engine(Box::new(GridLayout::new(
					center,
					config.root_radius * 6.0,
				)));
				adapter.fallback = Some(err);
				adapter
			}
		}
	}

	pub fn with_engine(engine: Box<dyn LayoutEngine>) -> Self {
		Self {
			engine,
			generation: 0,
			fallback: None,
			running: true,
		}
	}

	/// The error that forced the grid fallback, if any.
	pub fn fallback(&self) -> Option<&GraphError> {
		self.fallback.as_ref()
	}

	/// Feed a new graph to the engine. Ticks from earlier loads become stale.
	pub fn load(&mut self, graph: &Graph, seeds: &[Point]) -> u64 {
		self.generation += 1;
		let links: Vec<_> = graph.links().iter().map(|l| (l.source, l.target)).collect();
		let pinned: Vec<_> = graph.nodes().iter().map(|n| n.is_pinned()).collect();
		self.engine.load(seeds, &links, &pinned);
		self.running = true;
		debug!(
			"Layout generation {} loaded with {} nodes",
			self.generation,
			seeds.len()
		);
		self.generation
	}

	pub fn tick(&mut self, dt: f32) -> LayoutTick {
		if self.running {
			self.engine.step(dt);
		}
		LayoutTick {
			generation: self.generation,
			positions: self.engine.positions(),
		}
	}

	pub fn pin(&mut self, node: NodeIdx) {
		self.engine.pin(node);
	}

	pub fn unpin(&mut self, node: NodeIdx) {
		self.engine.unpin(node);
	}

	pub fn place(&mut self, node: NodeIdx, at: Point) {
		self.engine.place(node, at);
	}
}

/// Start positions: nodes that already have one keep it, the rest sit on a
/// circle of `radius` around `center`.
pub fn scatter(graph: &Graph, center: Point, radius: f64) -> Vec<Point> {
	let count = graph.nodes().len().max(1) as f64;
	graph
		.nodes()
		.iter()
		.enumerate()
		.map(|(i, node)| {
			node.position().unwrap_or_else(|| {
				let angle = i as f64 * 2.0 * PI / count;
				Point::new(
					center.x + radius * angle.cos(),
					center.y + radius * angle.sin(),
				)
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::super::types::{CrawlDocument, CrawlEdge, CrawlNode};
	use super::*;

	fn star(leaves: usize) -> Graph {
		let nodes = (0..=leaves)
			.map(|index| CrawlNode {
				index,
				title: String::new(),
				url: String::new(),
				is_root: index == 0,
				is_keyword: false,
			})
			.collect();
		let edges = (1..=leaves)
			.map(|target| CrawlEdge { source: 0, target })
			.collect();
		Graph::build(&CrawlDocument { nodes, edges }, Point::new(480.0, 480.0)).unwrap()
	}

	#[test]
	fn scatter_keeps_root_at_center() {
		let graph = star(3);
		let seeds = scatter(&graph, Point::new(480.0, 480.0), 100.0);
		assert_eq!(seeds[0], Point::new(480.0, 480.0));
		assert!((seeds[2].distance(Point::new(480.0, 480.0)) - 100.0).abs() < 1e-9);
	}

	#[test]
	fn pinned_root_does_not_move() {
		let graph = star(3);
		let seeds = scatter(&graph, Point::new(480.0, 480.0), 100.0);
		let mut adapter = LayoutAdapter::new(&GraphConfig::default(), Point::new(480.0, 480.0));
		adapter.load(&graph, &seeds);
		for _ in 0..20 {
			adapter.tick(0.016);
		}
		let tick = adapter.tick(0.016);
		assert!(tick.positions[0].distance(seeds[0]) < 1e-3);
		assert_eq!(tick.positions.len(), 4);
	}

	#[test]
	fn placed_node_reports_new_position() {
		let graph = star(2);
		let seeds = scatter(&graph, Point::default(), 50.0);
		let mut adapter = LayoutAdapter::new(&GraphConfig::default(), Point::default());
		adapter.load(&graph, &seeds);
		adapter.running = false;
		adapter.place(NodeIdx(1), Point::new(7.0, 8.0));
		assert_eq!(adapter.tick(0.016).positions[1], Point::new(7.0, 8.0));
	}

	#[test]
	fn broken_parameters_fall_back_to_grid() {
		let mut config = GraphConfig::default();
		config.simulation.force_charge = f32::NAN;
		let mut adapter = LayoutAdapter::new(&config, Point::new(100.0, 100.0));
		assert!(matches!(
			adapter.fallback(),
			Some(GraphError::LayoutUnavailable(_))
		));
		let graph = star(3);
		adapter.load(&graph, &scatter(&graph, Point::default(), 10.0));
		let positions = adapter.tick(0.016).positions;
		assert_eq!(positions.len(), 4);
		assert_ne!(positions[0], positions[1]);
	}

	#[test]
	fn every_load_bumps_generation() {
		let graph = star(1);
		let mut adapter = LayoutAdapter::new(&GraphConfig::default(), Point::default());
		let first = adapter.load(&graph, &scatter(&graph, Point::default(), 10.0));
		let second = adapter.load(&graph, &scatter(&graph, Point::default(), 10.0));
		assert!(second > first);
		assert_eq!(adapter.tick(0.016).generation, second);
	}
}
