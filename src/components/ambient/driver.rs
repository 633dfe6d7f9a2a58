//! Frame scheduling state machine.
//!
//! ```text
//!   Idle ──start──▶ Running ──frame (active)──▶ Running
//!                     │  ▲
//!      frame (inactive)  │ resume (no frame pending)
//!         or pause     ▼  │
//!                    Paused
//! ```
//!
//! At most one frame is ever pending. Teardown cancels it from any state.

use log::debug;

/// Handle returned by the host for a scheduled frame or timeout.
pub type HostHandle = i32;

/// Host-provided deferred execution: animation frames and one-shot timers.
///
/// The browser implementation wraps `requestAnimationFrame` and `setTimeout`;
/// each always invokes the same registered callback.
pub trait HostScheduler {
	fn request_frame(&mut self) -> Option<HostHandle>;
	fn cancel_frame(&mut self, handle: HostHandle);
	fn set_timeout(&mut self, delay_ms: i32) -> Option<HostHandle>;
	fn clear_timeout(&mut self, handle: HostHandle);
}

/// Lifecycle of the animation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	/// Never started.
	Idle,
	/// A frame is scheduled (or executing) and the loop continues.
	Running,
	/// Not scheduling; the last drawn frame stays on the surface.
	Paused,
}

/// What a frame callback should do once it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStep {
	/// Simulate and draw, then call [`AnimationDriver::end_frame`].
	Draw,
	/// Do nothing: no clear, no draw, no reschedule.
	Halt,
}

#[derive(Debug)]
pub struct AnimationDriver {
	state: DriverState,
	pending: Option<HostHandle>,
}

impl Default for AnimationDriver {
	fn default() -> Self {
		Self::new()
	}
}

impl AnimationDriver {
	pub fn new() -> Self {
		Self {
			state: DriverState::Idle,
			pending: None,
		}
	}

	pub fn state(&self) -> DriverState {
		self.state
	}

	pub fn has_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// `Idle -> Running`. Starting an already started driver is a no-op.
	pub fn start<S: HostScheduler>(&mut self, scheduler: &mut S, active: bool) {
		if self.state != DriverState::Idle {
			return;
		}
		if active {
			self.state = DriverState::Running;
			self.schedule(scheduler);
		} else {
			// Mounted while scrolled away; wait for the viewport to resume us.
			self.state = DriverState::Paused;
		}
		debug!("ambient: driver started ({:?})", self.state);
	}

	/// Called first thing in a frame callback.
	pub fn begin_frame(&mut self, active: bool) -> FrameStep {
		self.pending = None;
		if self.state != DriverState::Running {
			return FrameStep::Halt;
		}
		if !active {
			self.state = DriverState::Paused;
			return FrameStep::Halt;
		}
		FrameStep::Draw
	}

	/// Schedules the next frame after a drawn one.
	pub fn end_frame<S: HostScheduler>(&mut self, scheduler: &mut S) {
		if self.state == DriverState::Running {
			self.schedule(scheduler);
		}
	}

	/// Stops the loop without touching the surface.
	pub fn pause<S: HostScheduler>(&mut self, scheduler: &mut S) {
		self.cancel(scheduler);
		if self.state == DriverState::Running {
			self.state = DriverState::Paused;
			debug!("ambient: paused");
		}
	}

	/// `Paused -> Running`, scheduling exactly one frame if none is pending.
	pub fn resume<S: HostScheduler>(&mut self, scheduler: &mut S) {
		if self.state == DriverState::Idle || self.pending.is_some() {
			return;
		}
		if self.state == DriverState::Paused {
			debug!("ambient: resumed");
		}
		self.state = DriverState::Running;
		self.schedule(scheduler);
	}

	/// Ends the loop: the driver behaves as paused and nothing stays pending.
	pub fn halt<S: HostScheduler>(&mut self, scheduler: &mut S) {
		self.cancel(scheduler);
		if self.state != DriverState::Idle {
			self.state = DriverState::Paused;
		}
	}

	/// Cancels any pending frame unconditionally.
	pub fn teardown<S: HostScheduler>(&mut self, scheduler: &mut S) {
		self.cancel(scheduler);
		self.state = DriverState::Idle;
	}

	fn schedule<S: HostScheduler>(&mut self, scheduler: &mut S) {
		if self.pending.is_none() {
			self.pending = scheduler.request_frame();
		}
	}

	fn cancel<S: HostScheduler>(&mut self, scheduler: &mut S) {
		if let Some(handle) = self.pending.take() {
			scheduler.cancel_frame(handle);
		}
	}
}
