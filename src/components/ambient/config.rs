//! Simulation constants for the ambient background.
//!
//! Every number the physics, spawn, and viewport logic depends on lives here
//! so the look can be tuned from an inline JSON block without a rebuild. Any
//! field left out of the JSON keeps its default, at every nesting level.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A closed numeric interval sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
	pub min: f64,
	pub max: f64,
}

impl Span {
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Symmetric interval `[-half, half]`.
	pub const fn symmetric(half: f64) -> Self {
		Self {
			min: -half,
			max: half,
		}
	}

	/// Uniform draw in `[min, max)`. A degenerate span returns `min`.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
		self.min + rng.r#gen::<f64>() * (self.max - self.min)
	}

	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value <= self.max
	}
}

/// Pointer repulsion field: active inside `radius`, scaled by `strength`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repulsion {
	pub radius: f64,
	pub strength: f64,
}

/// Parameters for the drifting background particles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
	pub count: usize,
	/// Per-axis initial velocity range.
	pub velocity: Span,
	pub size: Span,
	pub repulsion: Repulsion,
	/// Per-tick velocity multiplier on both axes.
	pub damping: f64,
	/// Velocity multiplier applied on the axis that crossed an edge.
	pub bounce: f64,
}

impl Default for DriftParams {
	fn default() -> Self {
		Self {
			count: 1200,
			velocity: Span::symmetric(0.25),
			size: Span::new(1.0, 4.0),
			repulsion: Repulsion {
				radius: 100.0,
				strength: 0.1,
			},
			damping: 0.98,
			bounce: -0.5,
		}
	}
}

/// Parameters for the falling, rotating logo sprites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteParams {
	pub count: usize,
	/// Spawn height above the surface (negative = above the top edge).
	pub spawn_y: Span,
	pub velocity_x: Span,
	/// Fall speed; also the floor below which fall speed is redrawn.
	pub velocity_y: Span,
	pub size: Span,
	pub rotation_speed: Span,
	pub repulsion: Repulsion,
	/// Horizontal per-tick damping. Vertical speed is never damped.
	pub damping_x: f64,
	/// Distance below the bottom edge at which a sprite is recycled.
	pub recycle_margin: f64,
	/// Horizontal overshoot allowed before wrapping to the other side.
	pub wrap_margin: f64,
}

impl Default for SpriteParams {
	fn default() -> Self {
		Self {
			count: 50,
			spawn_y: Span::new(-250.0, -50.0),
			velocity_x: Span::symmetric(0.1),
			velocity_y: Span::new(0.3, 0.8),
			size: Span::new(12.0, 20.0),
			rotation_speed: Span::symmetric(0.025),
			repulsion: Repulsion {
				radius: 120.0,
				strength: 0.15,
			},
			damping_x: 0.97,
			recycle_margin: 50.0,
			wrap_margin: 50.0,
		}
	}
}

/// Scroll thresholds that suspend and resume the animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportParams {
	/// Lower bound on the pause threshold, in pixels.
	pub min_threshold: f64,
	/// Fraction of the hero height past which the animation pauses.
	pub hero_fraction: f64,
	/// Scroll offset that flips the navigation bar style.
	pub nav_offset: f64,
	/// Quiet period after the last scroll event before resuming.
	pub settle_ms: i32,
}

impl Default for ViewportParams {
	fn default() -> Self {
		Self {
			min_threshold: 50.0,
			hero_fraction: 0.5,
			nav_offset: 50.0,
			settle_ms: 150,
		}
	}
}

/// Complete simulation configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	pub drift: DriftParams,
	pub sprite: SpriteParams,
	pub viewport: ViewportParams,
}

impl SimulationConfig {
	/// Total entities a freshly initialized store holds.
	pub fn entity_count(&self) -> usize {
		self.drift.count + self.sprite.count
	}

	/// Parses a JSON override on top of the defaults.
	///
	/// Objects are merged key by key, so `{"drift":{"size":{"max":6}}}` only
	/// replaces `drift.size.max`. Anything else replaces the default outright.
	pub fn from_overrides(json: &str) -> Result<Self, serde_json::Error> {
		let overrides: Value = serde_json::from_str(json)?;
		let mut merged = serde_json::to_value(Self::default())?;
		merge(&mut merged, overrides);
		serde_json::from_value(merged)
	}
}

fn merge(base: &mut Value, patch: Value) {
	match (base, patch) {
		(Value::Object(base), Value::Object(patch)) => {
			for (key, value) in patch {
				merge(base.entry(key).or_insert(Value::Null), value);
			}
		}
		(slot, patch) => *slot = patch,
	}
}
