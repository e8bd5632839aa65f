use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything one mounted diagram holds on to outside of Rust: the animation
/// frame loop and the window resize listener.
///
/// Dropping the session releases all of it, so replacing or clearing the
/// session is the only way a diagram is torn down.
struct CanvasSession {
	window: Window,
	animate: FrameCallback,
	frame_id: Rc<Cell<Option<i32>>>,
	resize_cb: Option<Closure<dyn FnMut()>>,
}

impl CanvasSession {
	fn start(
		window: Window,
		canvas: HtmlCanvasElement,
		ctx: CanvasRenderingContext2d,
		state: Rc<RefCell<Option<ForceGraphState>>>,
	) -> Self {
		let (state_resize, canvas_resize) = (state.clone(), canvas);
		let resize_cb: Closure<dyn FnMut()> = Closure::new(move || {
			let Some((w, h)) = container_size(&canvas_resize) else {
				return;
			};
			canvas_resize.set_width(w as u32);
			canvas_resize.set_height(h as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(w, h);
			}
		});
		if window
			.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
			.is_err()
		{
			warn!("force_graph: could not listen for window resize");
		}

		let animate: FrameCallback = Rc::new(RefCell::new(None));
		let frame_id = Rc::new(Cell::new(None));
		let (animate_inner, frame_inner) = (animate.clone(), frame_id.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			frame_inner.set(None);
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}

		debug!("force_graph: session started");
		Self {
			window,
			animate,
			frame_id,
			resize_cb: Some(resize_cb),
		}
	}
}

impl Drop for CanvasSession {
	fn drop(&mut self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		if let Some(cb) = self.resize_cb.take() {
			let _ = self
				.window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		// The frame closure holds a handle to itself.
		self.animate.borrow_mut().take();
		debug!("force_graph: session released");
	}
}

/// Size of the canvas' parent element, or a fallback when detached.
fn container_size(canvas: &HtmlCanvasElement) -> Option<(f64, f64)> {
	let parent = canvas.parent_element()?;
	let (w, h) = (parent.client_width() as f64, parent.client_height() as f64);
	Some((
		if w > 0.0 { w } else { 800.0 },
		if h > 0.0 { h } else { 600.0 },
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn local_position(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive node-link diagram drawn on a canvas that fills its parent.
///
/// Clicking a node (press and release without dragging) calls `on_select`
/// with the node id, except for the center node. The diagram is rebuilt from
/// scratch whenever `data` changes.
#[component]
pub fn ForceGraphCanvas<F>(#[prop(into)] data: Signal<GraphData>, on_select: F) -> impl IntoView
where
	F: Fn(String) + 'static,
{
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let session = StoredValue::new_local(None::<CanvasSession>);
	let state_init = state.clone();

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		// Release the previous diagram before building its replacement.
		session.try_update_value(Option::take);

		let (Some(window), Some(ctx)) = (web_sys::window(), context_2d(&canvas)) else {
			warn!("force_graph: no window or 2d context, not rendering");
			return;
		};
		let (w, h) = container_size(&canvas).unwrap_or((800.0, 600.0));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*state_init.borrow_mut() = Some(ForceGraphState::new(&graph, w, h));
		let started = CanvasSession::start(window, canvas, ctx, state_init.clone());
		session.try_update_value(|s| *s = Some(started));
	});

	on_cleanup(move || {
		session.try_update_value(Option::take);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let tooltip = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.pointer_move(x, y);
				s.hovered_tooltip()
			}
			None => None,
		};
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			canvas.set_title(tooltip.as_deref().unwrap_or_default());
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().as_mut().and_then(|s| s.release());
		let target = clicked
			.and_then(|id| data.with_untracked(|d| d.selection_target(&id).map(str::to_string)));
		if let Some(id) = target {
			debug!("force_graph: selected {}", id);
			on_select(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_pointer();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y() <= 0.0);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
