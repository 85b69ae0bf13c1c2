use web_sys::CanvasRenderingContext2d;

use super::label::{TextBlock, TextMeasure};
use super::model::Point;
use super::state::{CrawlGraphState, NodeGeometry, Scene, ScenePanel};

fn font(size: f64) -> String {
	format!("{size}px sans-serif")
}

/// Text widths from the canvas the graph is drawn on.
pub struct CanvasMeasure {
	ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl TextMeasure for CanvasMeasure {
	fn width(&self, text: &str, font_size: f64) -> f64 {
		self.ctx.set_font(&font(font_size));
		self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
	}
}

pub fn render(state: &CrawlGraphState, ctx: &CanvasRenderingContext2d) {
	let scene = state.scene();
	ctx.set_fill_style_str(&scene.config.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(scene.pan.x, scene.pan.y);
	let _ = ctx.scale(scene.scale, scene.scale);
	draw_links(&scene, ctx);
	draw_nodes(&scene, ctx);
	ctx.restore();
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for link in &scene.links {
		ctx.set_global_alpha(link.style.opacity);
		ctx.set_stroke_style_str(&link.style.color);
		ctx.set_line_width(link.style.width);
		ctx.begin_path();
		ctx.move_to(link.from.x, link.from.y);
		ctx.line_to(link.to.x, link.to.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	for node in &scene.nodes {
		rounded_rect(ctx, &node.geometry);
		ctx.set_fill_style_str(&node.style.fill);
		ctx.fill();
		ctx.set_stroke_style_str(&node.style.stroke);
		ctx.set_line_width(node.style.stroke_width);
		ctx.stroke();

		if let Some(panel) = &node.panel
			&& panel.text_visible
		{
			draw_panel_text(scene, panel, ctx);
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, g: &NodeGeometry) {
	let r = g.corner_radius.min(g.width / 2.0).min(g.height / 2.0);
	let (x0, y0, x1, y1) = (g.x, g.y, g.x + g.width, g.y + g.height);
	ctx.begin_path();
	ctx.move_to(x0 + r, y0);
	let _ = ctx.arc_to(x1, y0, x1, y1, r);
	let _ = ctx.arc_to(x1, y1, x0, y1, r);
	let _ = ctx.arc_to(x0, y1, x0, y0, r);
	let _ = ctx.arc_to(x0, y0, x1, y0, r);
	ctx.close_path();
}

fn draw_panel_text(scene: &Scene, panel: &ScenePanel, ctx: &CanvasRenderingContext2d) {
	let layout = panel.layout;
	draw_block(ctx, &layout.title, panel.origin, &scene.config.text_color);
	let url_origin = Point::new(panel.origin.x, panel.origin.y + layout.url_offset);
	draw_block(ctx, &layout.url, url_origin, &scene.config.url_color);
}

fn draw_block(ctx: &CanvasRenderingContext2d, block: &TextBlock, origin: Point, color: &str) {
	ctx.set_fill_style_str(color);
	ctx.set_font(&font(block.font_size));
	for (i, line) in block.lines.iter().enumerate() {
		let baseline = origin.y + (i + 1) as f64 * block.line_height;
		let _ = ctx.fill_text(line, origin.x, baseline);
	}
}
