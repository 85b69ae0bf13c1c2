use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::error::{GraphError, Result};
use super::interaction::Modifiers;
use super::model::Point;
use super::render::{self, CanvasMeasure};
use super::state::{ClickResult, CrawlGraphState};
use super::types::CrawlDocument;

type SharedState = Rc<RefCell<Option<CrawlGraphState>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(960.0),
		window
			.inner_height()
			.ok()
			.and_then(|h| h.as_f64())
			.unwrap_or(960.0),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
		.ok_or_else(|| GraphError::RenderTargetMissing("canvas has no 2d context".into()))
}

fn pointer(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Run `f` with the pointer position in canvas pixels, if the graph is up.
fn with_pointer<R>(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	state: &SharedState,
	ev: &MouseEvent,
	f: impl FnOnce(&mut CrawlGraphState, Point) -> R,
) -> Option<R> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let at = pointer(&canvas, ev);
	state.borrow_mut().as_mut().map(|s| f(s, at))
}

fn modifiers(ev: &MouseEvent) -> Modifiers {
	let mut mods = Modifiers::empty();
	mods.set(Modifiers::SHIFT, ev.shift_key());
	mods.set(Modifiers::CTRL, ev.ctrl_key());
	mods.set(Modifiers::ALT, ev.alt_key());
	mods.set(Modifiers::META, ev.meta_key());
	mods
}

#[component]
pub fn CrawlGraphCanvas(
	#[prop(into)] data: Signal<CrawlDocument>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let banner = RwSignal::new(None::<String>);
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let doc = data.get();
		if let Some(ref mut s) = *state_init.borrow_mut() {
			match s.load(&doc) {
				Ok(()) => banner.set(None),
				Err(err) => {
					error!("{err}");
					banner.set(Some(err.to_string()));
				}
			}
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let mount = || -> Result<(Window, CanvasRenderingContext2d, CrawlGraphState)> {
			let window = web_sys::window()
				.ok_or_else(|| GraphError::RenderTargetMissing("no browser window".into()))?;
			let (w, h) = if fullscreen {
				window_size(&window)
			} else {
				let parent = canvas.parent_element();
				(
					width.unwrap_or_else(|| {
						parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)
					}),
					height.unwrap_or_else(|| {
						parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)
					}),
				)
			};
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let ctx = context_2d(&canvas)?;
			let measure = Box::new(CanvasMeasure::new(ctx.clone()));
			let graph = CrawlGraphState::new(&doc, config.clone(), w, h, measure)?;
			if let Some(err) = graph.layout_fallback() {
				warn!("Graph shown on a static grid: {err}");
			}
			Ok((window, ctx, graph))
		};
		let (window, ctx, graph) = match mount() {
			Ok(mounted) => mounted,
			Err(err) => {
				error!("{err}");
				banner.set(Some(err.to_string()));
				return;
			}
		};
		banner.set(None);
		*state_init.borrow_mut() = Some(graph);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				s.redraw();
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		with_pointer(canvas_ref, &state_md, &ev, |s, at| s.pointer_down(at));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		with_pointer(canvas_ref, &state_mm, &ev, |s, at| s.pointer_move(at));
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_exit();
		}
	};

	let state_cl = state.clone();
	let on_click = move |ev: MouseEvent| {
		let mods = modifiers(&ev);
		match with_pointer(canvas_ref, &state_cl, &ev, |s, at| s.click_at(at, mods)) {
			Some(ClickResult::OpenUrl(url)) => {
				if let Some(win) = web_sys::window() {
					let _ = win.open_with_url_and_target(&url, "_blank");
				}
			}
			Some(ClickResult::Node(outcome)) if outcome.pin_toggled => ev.stop_propagation(),
			_ => {}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		with_pointer(canvas_ref, &state_wh, &ev, |s, at| s.zoom_at(at, factor));
	};

	view! {
		<div class="crawl-graph">
			<canvas
				node_ref=canvas_ref
				class="crawl-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || {
				banner.get().map(|msg| view! { <div class="graph-error" role="alert">{msg}</div> })
			}}
		</div>
	}
}
