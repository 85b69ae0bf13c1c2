//! Zoom/pan transform and the damped scale factor applied to element sizes.
//!
//! Positions follow the raw zoom so the graph spreads out, while radii,
//! strokes, text and panels are divided by the effective factor
//! `(raw - 1) / zoom_factor + 1`. The factor saturates at
//! `1 + (zoom_factor - 1) / zoom_factor`.

use super::config::GraphConfig;
use super::model::Point;

/// Damped scale for `raw_scale`, never above [`scale_ceiling`].
pub fn effective_scale_factor(raw_scale: f64, zoom_factor: f64) -> f64 {
	((raw_scale - 1.0) / zoom_factor + 1.0).min(scale_ceiling(zoom_factor))
}

pub fn scale_ceiling(zoom_factor: f64) -> f64 {
	1.0 + (zoom_factor - 1.0) / zoom_factor
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pan: Point,
	raw_scale: f64,
	zoom_factor: f64,
	min_scale: f64,
	max_scale: f64,
}

impl Viewport {
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			pan: Point::default(),
			raw_scale: 1.0,
			zoom_factor: config.zoom_factor,
			min_scale: config.min_scale,
			max_scale: config.max_scale,
		}
	}

	pub fn pan(&self) -> Point {
		self.pan
	}

	pub fn raw_scale(&self) -> f64 {
		self.raw_scale
	}

	pub fn effective_scale(&self) -> f64 {
		effective_scale_factor(self.raw_scale, self.zoom_factor)
	}

	/// Back to identity: no pan, raw scale 1.
	pub fn reset(&mut self) {
		self.pan = Point::default();
		self.raw_scale = 1.0;
	}

	/// Returns true when the effective scale changed, which means every
	/// element needs restyling.
	pub fn set_scale(&mut self, raw_scale: f64) -> bool {
		let before = self.effective_scale();
		self.raw_scale = raw_scale.clamp(self.min_scale, self.max_scale);
		self.effective_scale() != before
	}

	/// Multiply the raw scale by `factor`, keeping the graph point under
	/// `anchor` (screen px) where it is.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> bool {
		let old_k = self.raw_scale;
		let changed = self.set_scale(old_k * factor);
		let ratio = self.raw_scale / old_k;
		self.pan.x = anchor.x - (anchor.x - self.pan.x) * ratio;
		self.pan.y = anchor.y - (anchor.y - self.pan.y) * ratio;
		changed
	}

	pub fn set_pan(&mut self, pan: Point) {
		self.pan = pan;
	}

	pub fn screen_to_graph(&self, screen: Point) -> Point {
		Point::new(
			(screen.x - self.pan.x) / self.raw_scale,
			(screen.y - self.pan.y) / self.raw_scale,
		)
	}

	pub fn graph_to_screen(&self, graph: Point) -> Point {
		Point::new(
			graph.x * self.raw_scale + self.pan.x,
			graph.y * self.raw_scale + self.pan.y,
		)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(1.0, 5.0, 1.0)]
	#[case(3.0, 5.0, 1.4)]
	#[case(5.0, 5.0, 1.8)]
	#[case(50.0, 5.0, 1.8)]
	#[case(0.5, 5.0, 0.9)]
	#[case(4.0, 1.0, 1.0)]
	fn damped_factor(#[case] raw: f64, #[case] zoom_factor: f64, #[case] expected: f64) {
		assert!((effective_scale_factor(raw, zoom_factor) - expected).abs() < 1e-9);
	}

	#[test]
	fn panning_leaves_scale_alone() {
		let mut viewport = Viewport::new(&GraphConfig::default());
		viewport.set_scale(2.0);
		let before = viewport.effective_scale();
		viewport.set_pan(Point::new(40.0, -12.0));
		assert_eq!(viewport.effective_scale(), before);
		assert_eq!(viewport.pan(), Point::new(40.0, -12.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut viewport = Viewport::new(&GraphConfig::default());
		let anchor = Point::new(200.0, 150.0);
		let before = viewport.screen_to_graph(anchor);
		assert!(viewport.zoom_at(anchor, 1.1));
		let after = viewport.screen_to_graph(anchor);
		assert!(before.distance(after) < 1e-9);
	}

	#[test]
	fn scale_is_clamped() {
		let mut viewport = Viewport::new(&GraphConfig::default());
		viewport.set_scale(1000.0);
		assert_eq!(viewport.raw_scale(), 10.0);
		viewport.set_scale(0.0);
		assert_eq!(viewport.raw_scale(), 0.1);
	}

	#[test]
	fn reset_restores_identity() {
		let mut viewport = Viewport::new(&GraphConfig::default());
		viewport.zoom_at(Point::new(10.0, 10.0), 3.0);
		viewport.reset();
		assert_eq!(viewport.raw_scale(), 1.0);
		assert_eq!(viewport.effective_scale(), 1.0);
		let p = Point::new(7.0, 9.0);
		assert_eq!(viewport.graph_to_screen(p), p);
	}
}
