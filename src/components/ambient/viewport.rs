//! Scroll-driven suspend/resume decisions.
//!
//! Scrolling past the threshold pauses immediately. Resuming only happens
//! once scrolling has been quiet for the settle period, and each new scroll
//! event supersedes the previous settle timer.

use super::config::ViewportParams;
use super::driver::{HostHandle, HostScheduler};

/// Small, infrequently changing flags surfaced to the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewFlags {
	/// Scrolled far enough to restyle the navigation bar.
	pub scrolled: bool,
	/// The animation is suspended.
	pub paused: bool,
}

/// Outcome of evaluating the scroll position against the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollVerdict {
	pub beyond_threshold: bool,
	pub scrolled_past_nav: bool,
}

#[derive(Debug)]
pub struct ViewportCoordinator {
	params: ViewportParams,
	settle_timer: Option<HostHandle>,
	flags: ViewFlags,
}

impl ViewportCoordinator {
	pub fn new(params: ViewportParams) -> Self {
		Self {
			params,
			settle_timer: None,
			flags: ViewFlags::default(),
		}
	}

	/// Scroll offset past which the animation is suspended.
	pub fn threshold(&self, hero_height: f64) -> f64 {
		self.params
			.min_threshold
			.max(hero_height * self.params.hero_fraction)
	}

	pub fn evaluate(&self, scroll_y: f64, hero_height: f64) -> ScrollVerdict {
		ScrollVerdict {
			beyond_threshold: scroll_y > self.threshold(hero_height),
			scrolled_past_nav: scroll_y > self.params.nav_offset,
		}
	}

	/// Handles a raw scroll event: arms (or re-arms) the settle timer.
	pub fn on_scroll<S: HostScheduler>(
		&mut self,
		scheduler: &mut S,
		scroll_y: f64,
		hero_height: f64,
	) -> ScrollVerdict {
		let verdict = self.evaluate(scroll_y, hero_height);
		self.flags = ViewFlags {
			scrolled: verdict.scrolled_past_nav,
			paused: verdict.beyond_threshold,
		};

		if let Some(handle) = self.settle_timer.take() {
			scheduler.clear_timeout(handle);
		}
		self.settle_timer = scheduler.set_timeout(self.params.settle_ms);
		verdict
	}

	/// Handles the settle timer firing. Returns whether scrolling came to rest
	/// within the interactive zone.
	pub fn on_settled(&mut self, scroll_y: f64, hero_height: f64) -> bool {
		self.settle_timer = None;
		let within = !self.evaluate(scroll_y, hero_height).beyond_threshold;
		self.flags.paused = !within;
		within
	}

	pub fn flags(&self) -> ViewFlags {
		self.flags
	}

	pub fn has_pending_settle(&self) -> bool {
		self.settle_timer.is_some()
	}

	pub fn teardown<S: HostScheduler>(&mut self, scheduler: &mut S) {
		if let Some(handle) = self.settle_timer.take() {
			scheduler.clear_timeout(handle);
		}
	}
}
