//! Logo bitmap loading.
//!
//! The bitmap is fetched and decoded at most once. Every caller of
//! [`ImageLoader::load`] shares the same fetch and is notified when it
//! settles. A decode failure also settles the waiters: the resource then
//! simply never becomes ready and sprites keep their fallback look.

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Loading state of a single resource.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
	Unloaded,
	Loading,
	Ready(T),
	Failed,
}

/// What the caller of [`ResourceGate::request`] must do next.
pub enum Request {
	/// First caller: start the fetch. The waiter is queued.
	Fetch,
	/// A fetch is in flight. The waiter is queued.
	Queued,
	/// Already settled. The waiter is handed back to run immediately.
	Settled(Box<dyn FnOnce()>),
}

/// Readiness gate shared by all callers of a resource.
pub struct ResourceGate<T> {
	state: LoadState<T>,
	waiters: Vec<Box<dyn FnOnce()>>,
}

impl<T> Default for ResourceGate<T> {
	fn default() -> Self {
		Self {
			state: LoadState::Unloaded,
			waiters: Vec::new(),
		}
	}
}

impl<T> ResourceGate<T> {
	pub fn request(&mut self, waiter: Box<dyn FnOnce()>) -> Request {
		match self.state {
			LoadState::Unloaded => {
				self.state = LoadState::Loading;
				self.waiters.push(waiter);
				Request::Fetch
			}
			LoadState::Loading => {
				self.waiters.push(waiter);
				Request::Queued
			}
			LoadState::Ready(_) | LoadState::Failed => Request::Settled(waiter),
		}
	}

	/// Marks the resource ready. Returns the waiters to run once the gate is
	/// no longer borrowed.
	#[must_use]
	pub fn resolve(&mut self, value: T) -> Vec<Box<dyn FnOnce()>> {
		self.state = LoadState::Ready(value);
		std::mem::take(&mut self.waiters)
	}

	/// Marks the resource permanently unavailable.
	#[must_use]
	pub fn fail(&mut self) -> Vec<Box<dyn FnOnce()>> {
		self.state = LoadState::Failed;
		std::mem::take(&mut self.waiters)
	}

	pub fn get(&self) -> Option<&T> {
		match &self.state {
			LoadState::Ready(value) => Some(value),
			_ => None,
		}
	}

	pub fn state(&self) -> &LoadState<T> {
		&self.state
	}
}

type ImageCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Loads one `HtmlImageElement` behind a [`ResourceGate`].
#[derive(Clone)]
pub struct ImageLoader {
	src: Rc<str>,
	gate: Rc<RefCell<ResourceGate<HtmlImageElement>>>,
	element: Rc<RefCell<Option<HtmlImageElement>>>,
	on_load: ImageCallback,
	on_error: ImageCallback,
}

impl ImageLoader {
	pub fn new(src: &str) -> Self {
		Self {
			src: src.into(),
			gate: Rc::default(),
			element: Rc::default(),
			on_load: Rc::default(),
			on_error: Rc::default(),
		}
	}

	/// Runs `on_settled` once the bitmap has loaded or failed to load.
	pub fn load(&self, on_settled: impl FnOnce() + 'static) {
		let request = self.gate.borrow_mut().request(Box::new(on_settled));
		match request {
			Request::Fetch => self.fetch(),
			Request::Queued => {}
			Request::Settled(waiter) => waiter(),
		}
	}

	/// The decoded bitmap, once ready.
	pub fn image(&self) -> Option<HtmlImageElement> {
		self.gate.borrow().get().cloned()
	}

	fn fetch(&self) {
		let Ok(img) = HtmlImageElement::new() else {
			warn!("ambient: could not create image element");
			self.settle(None);
			return;
		};

		let (loader_ok, img_ok) = (self.clone(), img.clone());
		*self.on_load.borrow_mut() = Some(Closure::new(move || {
			info!("ambient: logo image ready");
			loader_ok.settle(Some(img_ok.clone()));
		}));

		let (loader_err, src) = (self.clone(), self.src.clone());
		*self.on_error.borrow_mut() = Some(Closure::new(move || {
			warn!("ambient: failed to decode logo image {}", src);
			loader_err.settle(None);
		}));

		if let Some(ref cb) = *self.on_load.borrow() {
			img.set_onload(Some(cb.as_ref().unchecked_ref()));
		}
		if let Some(ref cb) = *self.on_error.borrow() {
			img.set_onerror(Some(cb.as_ref().unchecked_ref()));
		}
		img.set_src(&self.src);
		*self.element.borrow_mut() = Some(img);
	}

	fn settle(&self, image: Option<HtmlImageElement>) {
		let waiters = {
			let mut gate = self.gate.borrow_mut();
			match image {
				Some(img) => gate.resolve(img),
				None => gate.fail(),
			}
		};
		for waiter in waiters {
			waiter();
		}
	}

	/// Drops the element callbacks. Any in-flight load settles nothing.
	pub fn release(&self) {
		if let Some(img) = self.element.borrow_mut().take() {
			img.set_onload(None);
			img.set_onerror(None);
		}
		self.on_load.borrow_mut().take();
		self.on_error.borrow_mut().take();
	}
}
