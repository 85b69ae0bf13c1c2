//! Greedy text wrapping and the two-block layout of an expanded node.

use unicode_segmentation::UnicodeSegmentation;

use super::config::GraphConfig;

/// Measures rendered text width. The canvas implements this with
/// `measureText`; headless callers use [`FixedAdvance`].
pub trait TextMeasure {
	fn width(&self, text: &str, font_size: f64) -> f64;
}

/// Every grapheme is `em * font_size` wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
	pub em: f64,
}

impl Default for FixedAdvance {
	fn default() -> Self {
		Self { em: 0.6 }
	}
}

impl TextMeasure for FixedAdvance {
	fn width(&self, text: &str, font_size: f64) -> f64 {
		text.graphemes(true).count() as f64 * font_size * self.em
	}
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Graphemes are appended one at a time; when the line overflows the last one
/// moves to a fresh line. A grapheme wider than `max_width` on its own stays
/// on its line. Always returns at least one (possibly empty) line.
pub fn wrap_text(
	text: &str,
	max_width: f64,
	font_size: f64,
	measure: &dyn TextMeasure,
) -> Vec<String> {
	let mut lines = Vec::new();
	let mut line = String::new();
	for grapheme in text.graphemes(true) {
		let kept = line.len();
		line.push_str(grapheme);
		if kept > 0 && measure.width(&line, font_size) > max_width {
			line.truncate(kept);
			lines.push(std::mem::take(&mut line));
			line.push_str(grapheme);
		}
	}
	lines.push(line);
	lines
}

/// A wrapped block of text. Lines are `line_height` apart.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
	pub lines: Vec<String>,
	pub font_size: f64,
	pub line_height: f64,
}

impl TextBlock {
	pub fn height(&self) -> f64 {
		self.lines.len() as f64 * self.line_height
	}
}

/// Title stacked over URL inside an expanded node, in layout units relative
/// to the node centre.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelLayout {
	pub title: TextBlock,
	pub url: TextBlock,
	/// Top of the URL block, directly under the title block.
	pub url_offset: f64,
	pub wrap_width: f64,
	pub width: f64,
	/// Both blocks plus the node's own diameter.
	pub height: f64,
}

impl PanelLayout {
	/// Lay out a panel for a node of unscaled `radius` at effective `scale`.
	pub fn compute(
		title: &str,
		url: &str,
		radius: f64,
		config: &GraphConfig,
		scale: f64,
		measure: &dyn TextMeasure,
	) -> Self {
		let font_size = config.text_size / scale;
		let wrap_width = (config.panel_max_width - 2.0 * radius) / scale;
		let block = |text: &str| TextBlock {
			lines: wrap_text(text, wrap_width, font_size, measure),
			font_size,
			line_height: font_size,
		};
		let title = block(title);
		let url = block(url);
		let url_offset = title.height();
		let height = url_offset + url.height() + 2.0 * radius / scale;
		Self {
			title,
			url,
			url_offset,
			wrap_width,
			width: config.panel_max_width / scale,
			height,
		}
	}

	/// Whether a point relative to the node centre lies on the URL text.
	pub fn url_contains(&self, dx: f64, dy: f64) -> bool {
		(0.0..=self.wrap_width).contains(&dx)
			&& (self.url_offset..=self.url_offset + self.url.height()).contains(&dy)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	const MONO: FixedAdvance = FixedAdvance { em: 0.5 };

	#[test]
	fn empty_text_is_one_empty_line() {
		assert_eq!(wrap_text("", 1.0, 16.0, &MONO), vec![String::new()]);
	}

	#[test]
	fn wraps_at_width() {
		// 8px per glyph, 4 glyphs per 32px line.
		let lines = wrap_text("abcdefghij", 32.0, 16.0, &MONO);
		assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
	}

	#[rstest]
	#[case("exactly8", 64.0, 1)]
	#[case("exactly8!", 64.0, 2)]
	#[case("https://example.com/a/very/long/path", 80.0, 4)]
	fn line_counts(#[case] text: &str, #[case] width: f64, #[case] lines: usize) {
		assert_eq!(wrap_text(text, width, 16.0, &MONO).len(), lines);
	}

	#[test]
	fn oversized_glyph_keeps_its_own_line() {
		let lines = wrap_text("abc", 4.0, 16.0, &MONO);
		assert_eq!(lines, vec!["a", "b", "c"]);
	}

	#[test]
	fn combining_marks_stay_with_their_base() {
		let text = "e\u{301}e\u{301}e\u{301}";
		let lines = wrap_text(text, 16.0, 16.0, &MONO);
		assert_eq!(lines, vec!["e\u{301}e\u{301}", "e\u{301}"]);
	}

	#[test]
	fn panel_stacks_url_under_title() {
		let config = GraphConfig::default();
		let radius = config.node_radius;
		let panel = PanelLayout::compute("Title", "http://u", radius, &config, 1.0, &MONO);
		assert_eq!(panel.title.lines, vec!["Title"]);
		assert_eq!(panel.url_offset, config.text_size);
		assert_eq!(panel.height, 2.0 * config.text_size + 2.0 * radius);
		assert_eq!(panel.wrap_width, config.panel_max_width - 2.0 * radius);
		assert!(panel.url_contains(1.0, config.text_size + 1.0));
		assert!(!panel.url_contains(1.0, 1.0));
	}

	#[test]
	fn panel_shrinks_with_scale_but_keeps_breaks() {
		let config = GraphConfig::default();
		let title = "A page title that is far too long to fit on a single panel line";
		let at_one = PanelLayout::compute(title, "", config.node_radius, &config, 1.0, &MONO);
		let at_two = PanelLayout::compute(title, "", config.node_radius, &config, 2.0, &MONO);
		assert_eq!(at_one.title.lines, at_two.title.lines);
		assert!((at_two.height * 2.0 - at_one.height).abs() < 1e-9);
		assert_eq!(at_two.width, config.panel_max_width / 2.0);
	}
}
