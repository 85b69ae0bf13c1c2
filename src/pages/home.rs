use leptos::prelude::*;

use crate::components::crawl_graph::{
	CrawlDocument, CrawlEdge, CrawlGraphCanvas, CrawlNode, parse_document,
};

/// Generate a sample crawl: a start page with a random link tree below it.
fn generate_sample_crawl(n: usize) -> CrawlDocument {
	let nodes: Vec<CrawlNode> = (0..n)
		.map(|i| CrawlNode {
			index: i,
			title: if i == 0 {
				"Example Domain".into()
			} else {
				format!("Example page {} with a title long enough to need wrapping", i)
			},
			url: if i == 0 {
				"https://example.com/".into()
			} else {
				format!("https://example.com/section/{}/article/{}", i % 7, i)
			},
			is_root: i == 0,
			is_keyword: i % 9 == 4,
		})
		.collect();

	let edges: Vec<CrawlEdge> = (1..n)
		.map(|i| CrawlEdge {
			source: (rand_simple(i) * (i as f64)) as usize,
			target: i,
		})
		.collect();

	CrawlDocument { nodes, edges }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let crawl = RwSignal::new(generate_sample_crawl(40));
	let pasted = RwSignal::new(String::new());
	let load_error = RwSignal::new(None::<String>);

	let load = move |_| match parse_document(&pasted.get()) {
		Ok(doc) => {
			load_error.set(None);
			crawl.set(doc);
		}
		Err(err) => load_error.set(Some(err.to_string())),
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<CrawlGraphCanvas data=crawl fullscreen=true />
				<div class="graph-overlay">
					<h1>"Crawl Graph"</h1>
					<p class="subtitle">
						"Click a page to expand it. Shift+click expands several. Ctrl+click pins. Drag to reposition, scroll to zoom, drag the background to pan."
					</p>
					<textarea
						class="crawl-input"
						placeholder="Paste a crawl result ({\"nodes\": [...], \"edges\": [...]})"
						prop:value=move || pasted.get()
						on:input=move |ev| pasted.set(event_target_value(&ev))
					/>
					<button on:click=load>"Load crawl"</button>
					{move || load_error.get().map(|msg| view! { <p class="graph-error">{msg}</p> })}
				</div>
			</div>
		</ErrorBoundary>
	}
}
