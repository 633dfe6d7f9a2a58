//! Animation session: the single owner of all per-mount state.
//!
//! Holds the particle store, pointer and activity flags, the frame driver,
//! and the scroll coordinator behind one explicit `create`/`teardown`
//! lifecycle. Browser events call the `on_*` handlers between frames and a
//! frame callback calls [`AnimationSession::frame`]. Nothing here touches the
//! DOM directly; that goes through [`HostScheduler`] and [`Canvas2d`].

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::SimulationConfig;
use super::driver::{AnimationDriver, FrameStep, HostScheduler};
#[cfg(test)]
use super::driver::DriverState;
use super::particles::ParticleStore;
use super::physics::{self, FrameInput};
use super::render::{self, Canvas2d};
use super::theme::Theme;
use super::viewport::{ViewFlags, ViewportCoordinator};

/// Drawable size of the animation surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
	pub width: f64,
	pub height: f64,
}

/// Last known pointer position relative to the surface origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	pub interaction_enabled: bool,
}

impl Default for PointerState {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			interaction_enabled: true,
		}
	}
}

impl PointerState {
	fn snapshot(&self) -> FrameInput {
		FrameInput {
			pointer: self.interaction_enabled.then_some((self.x, self.y)),
		}
	}
}

/// Randomness sources: one for simulation, one for cosmetic jitter.
pub struct SessionRng {
	pub physics: StdRng,
	pub jitter: StdRng,
}

impl SessionRng {
	pub fn from_entropy() -> Self {
		Self {
			physics: StdRng::from_entropy(),
			jitter: StdRng::from_entropy(),
		}
	}

	#[cfg(test)]
	pub fn seeded(physics: u64, jitter: u64) -> Self {
		Self {
			physics: StdRng::seed_from_u64(physics),
			jitter: StdRng::seed_from_u64(jitter),
		}
	}
}

pub struct AnimationSession<S: HostScheduler> {
	config: SimulationConfig,
	theme: Theme,
	scheduler: S,
	rng: SessionRng,
	surface: SurfaceSize,
	store: Option<ParticleStore>,
	pointer: PointerState,
	active: bool,
	driver: AnimationDriver,
	viewport: ViewportCoordinator,
	torn_down: bool,
}

impl<S: HostScheduler> AnimationSession<S> {
	pub fn create(
		config: SimulationConfig,
		theme: Theme,
		scheduler: S,
		rng: SessionRng,
		surface: SurfaceSize,
	) -> Self {
		let viewport = ViewportCoordinator::new(config.viewport.clone());
		Self {
			config,
			theme,
			scheduler,
			rng,
			surface,
			store: None,
			pointer: PointerState::default(),
			active: true,
			driver: AnimationDriver::new(),
			viewport,
			torn_down: false,
		}
	}

	/// The image resource has settled: build the store and start the loop.
	pub fn on_image_settled(&mut self) {
		if self.torn_down {
			return;
		}
		self.reinitialize();
		self.driver.start(&mut self.scheduler, self.active);
	}

	/// New surface size: the store is discarded and rebuilt, paused or not.
	pub fn on_resize(&mut self, surface: SurfaceSize) {
		if self.torn_down {
			return;
		}
		debug!(
			"ambient: resize to {}x{}",
			surface.width, surface.height
		);
		self.surface = surface;
		self.reinitialize();
	}

	pub fn on_pointer_move(&mut self, x: f64, y: f64) {
		self.pointer.x = x;
		self.pointer.y = y;
	}

	/// Raw scroll event. Pauses immediately when past the threshold.
	pub fn on_scroll(&mut self, scroll_y: f64, hero_height: f64) -> ViewFlags {
		if self.torn_down {
			return self.viewport.flags();
		}
		let verdict = self
			.viewport
			.on_scroll(&mut self.scheduler, scroll_y, hero_height);
		self.pointer.interaction_enabled = !verdict.beyond_threshold;
		if verdict.beyond_threshold {
			self.active = false;
			self.driver.pause(&mut self.scheduler);
		}
		self.viewport.flags()
	}

	/// Settle timer fired: resume if scrolling came to rest near the top.
	pub fn on_scroll_settled(&mut self, scroll_y: f64, hero_height: f64) -> ViewFlags {
		if self.torn_down {
			return self.viewport.flags();
		}
		let within = self.viewport.on_settled(scroll_y, hero_height);
		self.pointer.interaction_enabled = within;
		self.active = within;
		if within {
			self.driver.resume(&mut self.scheduler);
		}
		self.viewport.flags()
	}

	/// Body of the frame callback.
	///
	/// `ctx` is `None` when the drawing surface is gone; the loop then stops
	/// quietly instead of drawing into a detached canvas.
	pub fn frame<C: Canvas2d>(&mut self, ctx: Option<&C>, image: Option<&C::Image>) {
		if self.driver.begin_frame(self.active) == FrameStep::Halt {
			return;
		}
		let Some(ctx) = ctx else {
			self.driver.halt(&mut self.scheduler);
			return;
		};

		// Flags are read once here; handlers running later only affect the
		// next frame.
		let input = self.pointer.snapshot();
		if let Some(store) = self.store.as_mut() {
			physics::step(store, input, &self.config, &mut self.rng.physics);
			render::render(store, ctx, image, &self.theme, &mut self.rng.jitter);
		}

		self.driver.end_frame(&mut self.scheduler);
	}

	/// Cancels the pending frame and settle timer. Further events are ignored.
	pub fn teardown(&mut self) {
		self.driver.teardown(&mut self.scheduler);
		self.viewport.teardown(&mut self.scheduler);
		self.torn_down = true;
		info!("ambient: session torn down");
	}

	fn reinitialize(&mut self) {
		let SurfaceSize { width, height } = self.surface;
		let store = ParticleStore::initialize(&self.config, width, height, &mut self.rng.physics);
		debug!("ambient: store initialized with {} entities", store.len());
		self.store = Some(store);
	}

	#[cfg(test)]
	pub fn store(&self) -> Option<&ParticleStore> {
		self.store.as_ref()
	}

	#[cfg(test)]
	pub fn pointer(&self) -> PointerState {
		self.pointer
	}

	#[cfg(test)]
	pub fn is_active(&self) -> bool {
		self.active
	}

	#[cfg(test)]
	pub fn driver_state(&self) -> DriverState {
		self.driver.state()
	}

	#[cfg(test)]
	pub fn scheduler(&self) -> &S {
		&self.scheduler
	}

	#[cfg(test)]
	pub fn scheduler_mut(&mut self) -> &mut S {
		&mut self.scheduler
	}
}

#[cfg(test)]
mod tests {
	use super::super::driver::tests::FakeHost;
	use super::super::particles::{Entity, EntityKind};
	use super::super::render::tests::Recorder;
	use super::*;

	const HERO: f64 = 900.0;

	fn session() -> AnimationSession<FakeHost> {
		AnimationSession::create(
			SimulationConfig::default(),
			Theme::default(),
			FakeHost::default(),
			SessionRng::seeded(1, 2),
			SurfaceSize {
				width: 800.0,
				height: 600.0,
			},
		)
	}

	/// Fires the pending frame (if any) against `ctx`, like the browser would.
	fn pump(s: &mut AnimationSession<FakeHost>, ctx: &Recorder) -> bool {
		if !s.scheduler_mut().fire_frame() {
			return false;
		}
		s.frame(Some(ctx), None);
		true
	}

	#[test]
	fn idle_until_image_settles() {
		let mut s = session();
		assert_eq!(s.driver_state(), DriverState::Idle);
		assert!(s.store().is_none());
		assert!(s.scheduler().frames.is_empty());

		s.on_image_settled();
		assert_eq!(s.driver_state(), DriverState::Running);
		assert_eq!(s.store().map(ParticleStore::len), Some(1250));
		assert_eq!(s.scheduler().frames.len(), 1);
	}

	#[test]
	fn frames_draw_and_reschedule() {
		let mut s = session();
		let ctx = Recorder::default();
		s.on_image_settled();

		for _ in 0..3 {
			assert!(pump(&mut s, &ctx));
		}
		assert_eq!(ctx.clears(), 3);
		assert_eq!(s.scheduler().frames.len(), 1);
	}

	#[test]
	fn deactivation_keeps_last_frame() {
		let mut s = session();
		let ctx = Recorder::default();
		s.on_image_settled();
		assert!(pump(&mut s, &ctx));
		let drawn = ctx.len();

		// Activity flips off between scheduling and firing.
		s.active = false;
		assert!(pump(&mut s, &ctx));
		assert_eq!(ctx.len(), drawn);
		assert_eq!(ctx.clears(), 1);
		assert_eq!(s.driver_state(), DriverState::Paused);
		assert!(!pump(&mut s, &ctx));
	}

	#[test]
	fn scrolling_away_cancels_pending_frame() {
		let mut s = session();
		let ctx = Recorder::default();
		s.on_image_settled();
		assert!(pump(&mut s, &ctx));

		let flags = s.on_scroll(600.0, HERO);
		assert!(flags.paused && flags.scrolled);
		assert!(!s.pointer().interaction_enabled);
		assert!(!s.is_active());
		assert!(s.scheduler().frames.is_empty());
		assert!(!pump(&mut s, &ctx));
		assert_eq!(ctx.clears(), 1);
	}

	#[test]
	fn settling_near_top_resumes_exactly_once() {
		let mut s = session();
		let ctx = Recorder::default();
		s.on_image_settled();
		s.on_scroll(600.0, HERO);
		s.on_scroll(100.0, HERO);
		// Still pending the quiet period.
		assert!(s.scheduler().frames.is_empty());
		assert!(s.pointer().interaction_enabled);

		assert!(s.scheduler_mut().fire_timer());
		let flags = s.on_scroll_settled(100.0, HERO);
		assert!(!flags.paused);
		assert!(s.is_active());
		assert_eq!(s.driver_state(), DriverState::Running);
		assert_eq!(s.scheduler().frames.len(), 1);

		// A second settle while a frame is pending does not double-schedule.
		s.on_scroll_settled(100.0, HERO);
		assert_eq!(s.scheduler().frames.len(), 1);
		assert!(pump(&mut s, &ctx));
	}

	#[test]
	fn settling_far_down_stays_paused() {
		let mut s = session();
		s.on_image_settled();
		s.on_scroll(700.0, HERO);
		assert!(s.scheduler_mut().fire_timer());
		let flags = s.on_scroll_settled(700.0, HERO);
		assert!(flags.paused);
		assert!(s.scheduler().frames.is_empty());
	}

	#[test]
	fn pointer_toggle_takes_effect_next_frame() {
		let mut s = session();
		let ctx = Recorder::default();
		s.on_image_settled();
		s.store = Some(ParticleStore::from_entities(
			vec![Entity::drift_at(420.0, 300.0, 0.0, 0.0)],
			800.0,
			600.0,
		));
		s.on_pointer_move(400.0, 300.0);
		let vx = |s: &AnimationSession<FakeHost>| s.store().unwrap().entities()[0].vx;

		// Pushed away from the pointer, then damped.
		assert!(pump(&mut s, &ctx));
		let pushed = 0.08 * 0.98;
		assert!((vx(&s) - pushed).abs() < 1e-9);

		// Disabled before the next frame: damping only.
		s.pointer.interaction_enabled = false;
		assert!(pump(&mut s, &ctx));
		assert!((vx(&s) - pushed * 0.98).abs() < 1e-9);

		// Re-enabled: the field applies again on the following frame.
		let coasting = vx(&s);
		s.on_scroll(0.0, HERO);
		assert!(s.pointer().interaction_enabled);
		assert!(pump(&mut s, &ctx));
		assert!(vx(&s) > coasting * 0.98 + 1e-6);
	}

	#[test]
	fn resize_rebuilds_store_while_paused() {
		let mut s = session();
		s.on_image_settled();
		s.on_scroll(600.0, HERO);

		s.on_resize(SurfaceSize {
			width: 1280.0,
			height: 720.0,
		});
		let store = s.store().unwrap();
		assert_eq!(store.len(), 1250);
		assert_eq!(store.count(EntityKind::FallingSprite), 50);
		assert_eq!(store.width(), 1280.0);
		assert_eq!(s.driver_state(), DriverState::Paused);
	}

	#[test]
	fn missing_surface_stops_quietly() {
		let mut s = session();
		s.on_image_settled();
		assert!(s.scheduler_mut().fire_frame());
		s.frame::<Recorder>(None, None);
		assert!(s.scheduler().frames.is_empty());
		assert_eq!(s.driver_state(), DriverState::Paused);
	}

	#[test]
	fn teardown_cancels_everything() {
		let mut s = session();
		s.on_image_settled();
		s.on_scroll(10.0, HERO);
		assert_eq!(s.scheduler().timers.len(), 1);

		s.teardown();
		assert!(s.scheduler().frames.is_empty());
		assert!(s.scheduler().timers.is_empty());

		s.on_scroll(10.0, HERO);
		s.on_image_settled();
		assert!(s.scheduler().frames.is_empty());
		assert!(s.scheduler().timers.is_empty());
	}
}
