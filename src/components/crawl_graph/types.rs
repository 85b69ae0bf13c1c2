use serde::Deserialize;

use super::error::Result;

/// A crawled page as delivered by the crawler.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlNode {
	pub index: usize,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(default, alias = "root")]
	pub is_root: bool,
	#[serde(default, alias = "keyword")]
	pub is_keyword: bool,
}

/// A hyperlink between two pages. Endpoints are positions in the node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct CrawlEdge {
	pub source: usize,
	pub target: usize,
}

/// One crawl result. Both fields are required.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CrawlDocument {
	pub nodes: Vec<CrawlNode>,
	pub edges: Vec<CrawlEdge>,
}

/// Decode a crawl document, failing with
/// [`GraphError::InvalidGraph`](super::error::GraphError::InvalidGraph) when it
/// is not valid JSON or lacks `nodes`/`edges`.
pub fn parse_document(json: &str) -> Result<CrawlDocument> {
	Ok(serde_json::from_str(json)?)
}
