//! Immutable engine configuration.
//!
//! Defaults are sized for a 960px stage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{GraphError, Result};
use super::model::NodeKind;
use super::visual::Emphasis;

const STAGE: f64 = 960.0;

/// One value per [`Emphasis`] level, looked up by the highest flag an element
/// carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmphasisTable<T> {
	pub base: T,
	pub hover_adjacent: T,
	pub active_adjacent: T,
	pub hover: T,
	pub active: T,
}

impl<T: Clone> EmphasisTable<T> {
	/// `base` for unmarked elements, `emphasised` for every other level.
	pub fn emphasised(base: T, emphasised: T) -> Self {
		Self {
			base,
			hover_adjacent: emphasised.clone(),
			active_adjacent: emphasised.clone(),
			hover: emphasised.clone(),
			active: emphasised,
		}
	}
}

impl<T> EmphasisTable<T> {
	pub fn get(&self, emphasis: Emphasis) -> &T {
		match emphasis {
			Emphasis::Base => &self.base,
			Emphasis::HoverAdjacent => &self.hover_adjacent,
			Emphasis::ActiveAdjacent => &self.active_adjacent,
			Emphasis::Hover => &self.hover,
			Emphasis::Active => &self.active,
		}
	}
}

/// Resting and hovered fill of one kind of node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePalette {
	pub fill: String,
	pub hover_fill: String,
}

impl NodePalette {
	fn new(fill: &str, hover_fill: &str) -> Self {
		Self {
			fill: fill.into(),
			hover_fill: hover_fill.into(),
		}
	}
}

/// Parameters handed to the `force_graph` simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub root_radius: f64,
	pub node_radius: f64,
	pub root_palette: NodePalette,
	pub keyword_palette: NodePalette,
	pub page_palette: NodePalette,
	/// Fill of an expanded node, whatever its kind.
	pub active_fill: String,
	pub node_stroke: EmphasisTable<String>,
	pub node_stroke_width: EmphasisTable<f64>,
	pub link_color: EmphasisTable<String>,
	pub link_width: EmphasisTable<f64>,
	pub link_opacity: EmphasisTable<f64>,
	/// Damping applied to zoom before it reaches element sizes. Must be >= 1.
	pub zoom_factor: f64,
	pub text_size: f64,
	/// Width of an expanded panel at scale 1, text wraps inside it.
	pub panel_max_width: f64,
	pub text_color: String,
	pub url_color: String,
	pub background: String,
	pub min_scale: f64,
	pub max_scale: f64,
	/// Pointer travel (screen px) that turns a press into a drag.
	pub drag_threshold: f64,
	/// Seconds a panel takes to grow to its full size.
	pub expand_duration: f64,
	/// Radius of the circle non-root nodes are scattered on before the first tick.
	pub initial_scatter: f64,
	/// Distance (layout px at scale 1) within which the pointer is over a link.
	pub link_hit_tolerance: f64,
	pub simulation: SimulationConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		let node_radius = STAGE / 100.0;
		Self {
			root_radius: STAGE / 70.0,
			node_radius,
			root_palette: NodePalette::new("lightsteelblue", "steelblue"),
			keyword_palette: NodePalette::new("lightgreen", "green"),
			page_palette: NodePalette::new("lightgray", "gray"),
			active_fill: "whitesmoke".into(),
			node_stroke: EmphasisTable::emphasised("gray".into(), "gray".into()),
			node_stroke_width: EmphasisTable::emphasised(1.0, 2.0),
			link_color: EmphasisTable::emphasised("gray".into(), "gray".into()),
			link_width: EmphasisTable::emphasised(2.0, 3.0),
			link_opacity: EmphasisTable::emphasised(0.4, 0.8),
			zoom_factor: 5.0,
			text_size: 16.0,
			panel_max_width: node_radius * 30.0,
			text_color: "black".into(),
			url_color: "blue".into(),
			background: "white".into(),
			min_scale: 0.1,
			max_scale: 10.0,
			drag_threshold: 3.0,
			expand_duration: 0.25,
			initial_scatter: 100.0,
			link_hit_tolerance: 4.0,
			simulation: SimulationConfig::default(),
		}
	}
}

impl GraphConfig {
	/// Parse a partial override; missing keys keep their defaults at any
	/// depth, so `{"link_width": {"base": 1.0}}` only touches that one entry.
	pub fn from_json(json: &str) -> Result<Self> {
		let invalid = |e: serde_json::Error| GraphError::InvalidConfig(e.to_string());
		let overrides: Value = serde_json::from_str(json).map_err(invalid)?;
		let mut merged = serde_json::to_value(Self::default()).map_err(invalid)?;
		merge(&mut merged, overrides);
		let config: Self = serde_json::from_value(merged).map_err(invalid)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if !(self.zoom_factor >= 1.0) {
			return Err(GraphError::InvalidConfig(format!(
				"zoom_factor must be >= 1, got {}",
				self.zoom_factor
			)));
		}
		for (name, value) in [
			("root_radius", self.root_radius),
			("node_radius", self.node_radius),
			("text_size", self.text_size),
			("panel_max_width", self.panel_max_width),
			("min_scale", self.min_scale),
		] {
			if !(value > 0.0) {
				return Err(GraphError::InvalidConfig(format!(
					"{name} must be positive, got {value}"
				)));
			}
		}
		if self.min_scale > self.max_scale {
			return Err(GraphError::InvalidConfig(format!(
				"min_scale {} exceeds max_scale {}",
				self.min_scale, self.max_scale
			)));
		}
		Ok(())
	}

	pub fn palette(&self, kind: NodeKind) -> &NodePalette {
		match kind {
			NodeKind::Root => &self.root_palette,
			NodeKind::Keyword => &self.keyword_palette,
			NodeKind::Page => &self.page_palette,
		}
	}

	/// Unscaled radius of a collapsed node.
	pub fn radius(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Root => self.root_radius,
			NodeKind::Keyword | NodeKind::Page => self.node_radius,
		}
	}
}

fn merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) => {
			for (key, value) in overrides {
				match base.get_mut(&key) {
					Some(slot) => merge(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(slot, value) => *slot = value,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = GraphConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.panel_max_width, 288.0);
		assert_eq!(*config.link_width.get(Emphasis::Base), 2.0);
		assert_eq!(*config.link_width.get(Emphasis::Hover), 3.0);
	}

	#[test]
	fn partial_override_keeps_defaults() {
		let config = GraphConfig::from_json(r#"{"zoom_factor": 2.0, "text_size": 12}"#).unwrap();
		assert_eq!(config.zoom_factor, 2.0);
		assert_eq!(config.text_size, 12.0);
		assert_eq!(config.node_radius, GraphConfig::default().node_radius);
	}

	#[test]
	fn nested_override_keeps_sibling_entries() {
		let config = GraphConfig::from_json(
			r#"{"link_width": {"base": 1.0}, "simulation": {"node_mass": 4.0}}"#,
		)
		.unwrap();
		let defaults = GraphConfig::default();
		assert_eq!(config.link_width.base, 1.0);
		assert_eq!(config.link_width.hover, 3.0);
		assert_eq!(config.link_width.active_adjacent, 3.0);
		assert_eq!(config.link_opacity, defaults.link_opacity);
		assert_eq!(config.simulation.node_mass, 4.0);
		assert_eq!(config.simulation.force_charge, defaults.simulation.force_charge);
		assert_eq!(config.root_radius, defaults.root_radius);
	}

	#[test]
	fn rejects_wrongly_typed_override() {
		let err = GraphConfig::from_json(r#"{"link_width": {"base": "wide"}}"#).unwrap_err();
		assert!(matches!(err, GraphError::InvalidConfig(_)));
	}

	#[test]
	fn rejects_damping_below_one() {
		let err = GraphConfig::from_json(r#"{"zoom_factor": 0.5}"#).unwrap_err();
		assert!(matches!(err, GraphError::InvalidConfig(_)));
	}

	#[test]
	fn rejects_inverted_scale_range() {
		let config = GraphConfig {
			min_scale: 4.0,
			max_scale: 2.0,
			..GraphConfig::default()
		};
		assert!(config.validate().is_err());
	}
}
