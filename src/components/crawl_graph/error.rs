use thiserror::Error;

/// Failures the crawl graph engine can surface.
///
/// Interaction edge cases (re-activating an active node, dragging a pinned
/// node, ...) are never errors; only loading, layout start-up and mounting
/// can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	/// The crawl document is malformed. Shown as a banner, nothing is drawn.
	#[error("invalid crawl graph: {0}")]
	InvalidGraph(String),
	/// The force simulation could not be started. The engine falls back to a
	/// static grid so the graph stays explorable.
	#[error("layout simulation unavailable: {0}")]
	LayoutUnavailable(String),
	/// The canvas to draw into does not exist. Fatal at mount time.
	#[error("render target missing: {0}")]
	RenderTargetMissing(String),
	/// A [`GraphConfig`](super::config::GraphConfig) value is out of range.
	#[error("invalid graph configuration: {0}")]
	InvalidConfig(String),
}

impl From<serde_json::Error> for GraphError {
	fn from(err: serde_json::Error) -> Self {
		GraphError::InvalidGraph(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, GraphError>;
