pub mod crawl_graph;
