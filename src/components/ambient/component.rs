//! Leptos component hosting the ambient background.
//!
//! The component renders the hero section with a canvas behind its content
//! and wires browser events into an [`AnimationSession`]: pointer movement on
//! the hero, window resize and (passive) scroll, the logo image load, and a
//! `requestAnimationFrame` loop. Unmounting tears all of it down.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent,
	Window,
};

use super::config::SimulationConfig;
use super::driver::{HostHandle, HostScheduler};
use super::error::MountError;
use super::image::ImageLoader;
use super::state::{AnimationSession, SessionRng, SurfaceSize};
use super::theme::Theme;
use super::viewport::ViewFlags;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type Session = Rc<RefCell<AnimationSession<BrowserScheduler>>>;

/// `requestAnimationFrame` / `setTimeout` bound to fixed callbacks.
struct BrowserScheduler {
	window: Window,
	frame_cb: Callback,
	settle_cb: Callback,
}

impl HostScheduler for BrowserScheduler {
	fn request_frame(&mut self) -> Option<HostHandle> {
		let guard = self.frame_cb.borrow();
		let cb = guard.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&mut self, handle: HostHandle) {
		let _ = self.window.cancel_animation_frame(handle);
	}

	fn set_timeout(&mut self, delay_ms: i32) -> Option<HostHandle> {
		let guard = self.settle_cb.borrow();
		let cb = guard.as_ref()?;
		self.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms)
			.ok()
	}

	fn clear_timeout(&mut self, handle: HostHandle) {
		self.window.clear_timeout_with_handle(handle);
	}
}

/// Everything created on mount that must be released on unmount.
struct Mounted {
	window: Window,
	host: HtmlElement,
	session: Session,
	loader: ImageLoader,
	frame_cb: Callback,
	settle_cb: Callback,
	listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl Mounted {
	fn teardown(self) {
		self.session.borrow_mut().teardown();
		for (event, cb) in &self.listeners {
			let _ = self
				.window
				.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
		self.loader.release();
		// Breaks the session <-> callback reference cycles.
		self.frame_cb.borrow_mut().take();
		self.settle_cb.borrow_mut().take();
	}
}

/// Surface size from the host's on-screen box, in whole canvas pixels.
fn measure(host: &HtmlElement) -> SurfaceSize {
	let rect = host.get_bounding_client_rect();
	SurfaceSize {
		width: rect.width().floor().max(0.0),
		height: rect.height().floor().max(0.0),
	}
}

fn fit_canvas(canvas: &HtmlCanvasElement, size: SurfaceSize) {
	canvas.set_width(size.width as u32);
	canvas.set_height(size.height as u32);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MountError> {
	canvas
		.get_context("2d")
		.map_err(|e| MountError::Context(format!("{e:?}")))?
		.ok_or(MountError::NoContext)?
		.dyn_into()
		.map_err(|_| MountError::NoContext)
}

/// Pushes view flags to the page only when they change.
fn publish(flags: RwSignal<ViewFlags>, next: ViewFlags) {
	if flags.get_untracked() != next {
		flags.set(next);
	}
}

fn mount(
	canvas: HtmlCanvasElement,
	host: HtmlElement,
	config: SimulationConfig,
	theme: Theme,
	logo_src: &str,
	flags: RwSignal<ViewFlags>,
) -> Result<Mounted, MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	if !host.is_connected() {
		return Err(MountError::NoHost);
	}
	let surface = measure(&host);
	fit_canvas(&canvas, surface);
	let ctx = context_2d(&canvas)?;

	let (frame_cb, settle_cb): (Callback, Callback) = (Rc::default(), Rc::default());
	let scheduler = BrowserScheduler {
		window: window.clone(),
		frame_cb: frame_cb.clone(),
		settle_cb: settle_cb.clone(),
	};
	let session: Session = Rc::new(RefCell::new(AnimationSession::create(
		config,
		theme,
		scheduler,
		SessionRng::from_entropy(),
		surface,
	)));
	let loader = ImageLoader::new(logo_src);

	let (session_f, loader_f, canvas_f) = (session.clone(), loader.clone(), canvas.clone());
	*frame_cb.borrow_mut() = Some(Closure::new(move || {
		let image = loader_f.image();
		let ctx = canvas_f.is_connected().then_some(&ctx);
		session_f.borrow_mut().frame(ctx, image.as_ref());
	}));

	let (session_s, host_s, window_s) = (session.clone(), host.clone(), window.clone());
	*settle_cb.borrow_mut() = Some(Closure::new(move || {
		let scroll_y = window_s.scroll_y().unwrap_or(0.0);
		let hero_height = host_s.get_bounding_client_rect().height();
		let next = session_s
			.borrow_mut()
			.on_scroll_settled(scroll_y, hero_height);
		publish(flags, next);
	}));

	let (session_sc, host_sc, window_sc) = (session.clone(), host.clone(), window.clone());
	let on_scroll: Closure<dyn FnMut()> = Closure::new(move || {
		let scroll_y = window_sc.scroll_y().unwrap_or(0.0);
		let hero_height = host_sc.get_bounding_client_rect().height();
		let next = session_sc.borrow_mut().on_scroll(scroll_y, hero_height);
		publish(flags, next);
	});
	let passive = AddEventListenerOptions::new();
	passive.set_passive(true);
	let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
		"scroll",
		on_scroll.as_ref().unchecked_ref(),
		&passive,
	);

	let (session_r, host_r) = (session.clone(), host.clone());
	let on_resize: Closure<dyn FnMut()> = Closure::new(move || {
		let size = measure(&host_r);
		fit_canvas(&canvas, size);
		session_r.borrow_mut().on_resize(size);
	});
	let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());

	let session_i = session.clone();
	loader.load(move || session_i.borrow_mut().on_image_settled());

	info!(
		"ambient: mounted on {}x{} surface",
		surface.width, surface.height
	);

	Ok(Mounted {
		window,
		host,
		session,
		loader,
		frame_cb,
		settle_cb,
		listeners: vec![("scroll", on_scroll), ("resize", on_resize)],
	})
}

/// Hero section with the animated particle field behind its content.
///
/// `flags` receives the scroll-derived view state (nav styling, paused) and
/// is only written when a flag actually flips. `config` overrides the
/// default simulation constants and `theme` the default brand styling.
#[component]
pub fn AmbientHero(
	#[prop(into)] logo_src: String,
	flags: RwSignal<ViewFlags>,
	#[prop(optional)] config: Option<SimulationConfig>,
	#[prop(optional)] theme: Option<Theme>,
	children: Children,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Section>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<Mounted>>> = Rc::new(RefCell::new(None));
	let config = config.unwrap_or_default();
	let theme = theme.unwrap_or_default();

	let mounted_init = mounted.clone();
	Effect::new(move |_| {
		let (Some(canvas), Some(host)) = (canvas_ref.get(), host_ref.get()) else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		match mount(canvas, host, config.clone(), theme.clone(), &logo_src, flags) {
			Ok(m) => *mounted_init.borrow_mut() = Some(m),
			Err(e) => warn!("ambient: background disabled: {}", e),
		}
	});

	let mounted_mm = mounted.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let guard = mounted_mm.borrow();
		let Some(m) = guard.as_ref() else {
			return;
		};
		let rect = m.host.get_bounding_client_rect();
		m.session.borrow_mut().on_pointer_move(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
	};

	let mounted_cleanup = SendWrapper::new(mounted);
	on_cleanup(move || {
		let taken = mounted_cleanup.borrow_mut().take();
		if let Some(m) = taken {
			m.teardown();
		}
	});

	view! {
		<section node_ref=host_ref class="hero" on:mousemove=on_mousemove>
			{children()}
			<div class="hero-background">
				<canvas node_ref=canvas_ref class="particle-canvas" />
			</div>
		</section>
	}
}
