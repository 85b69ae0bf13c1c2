//! Force-directed view of a web crawl.

mod component;
pub mod config;
pub mod error;
pub mod interaction;
pub mod label;
pub mod layout;
pub mod model;
mod render;
pub mod scale;
pub mod state;
pub mod types;
pub mod visual;

pub use component::CrawlGraphCanvas;
pub use config::GraphConfig;
pub use error::GraphError;
pub use state::CrawlGraphState;
pub use types::{CrawlDocument, CrawlEdge, CrawlNode, parse_document};
