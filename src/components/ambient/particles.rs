//! Particle store: the drifting dots and falling logo sprites.
//!
//! The store is rebuilt from scratch on every resize. Entities never survive
//! a reinitialization, so there is no proportional rescaling of positions.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::{DriftParams, SimulationConfig, SpriteParams};

/// Which rule set an entity follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	DriftParticle,
	FallingSprite,
}

/// Kind-specific payload.
#[derive(Clone, Debug, PartialEq)]
pub(super) enum Body {
	Drift,
	Sprite { rotation: f64, rotation_speed: f64 },
}

/// A single simulated entity.
///
/// The variant of `body` is picked at spawn time and never reassigned.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub(super) body: Body,
}

impl Entity {
	pub(super) fn spawn_drift<R: Rng>(
		params: &DriftParams,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		Self {
			x: rng.r#gen::<f64>() * width,
			y: rng.r#gen::<f64>() * height,
			vx: params.velocity.sample(rng),
			vy: params.velocity.sample(rng),
			size: params.size.sample(rng),
			body: Body::Drift,
		}
	}

	pub(super) fn spawn_sprite<R: Rng>(
		params: &SpriteParams,
		width: f64,
		rng: &mut R,
	) -> Self {
		Self {
			x: rng.r#gen::<f64>() * width,
			y: params.spawn_y.sample(rng),
			vx: params.velocity_x.sample(rng),
			vy: params.velocity_y.sample(rng),
			size: params.size.sample(rng),
			body: Body::Sprite {
				rotation: rng.r#gen::<f64>() * TAU,
				rotation_speed: params.rotation_speed.sample(rng),
			},
		}
	}

	/// Test-only constructor for a drift particle at a known state.
	#[cfg(test)]
	pub(super) fn drift_at(x: f64, y: f64, vx: f64, vy: f64) -> Self {
		Self {
			x,
			y,
			vx,
			vy,
			size: 2.0,
			body: Body::Drift,
		}
	}

	/// Test-only constructor for a sprite at a known state.
	#[cfg(test)]
	pub(super) fn sprite_at(x: f64, y: f64, vx: f64, vy: f64) -> Self {
		Self {
			x,
			y,
			vx,
			vy,
			size: 16.0,
			body: Body::Sprite {
				rotation: 0.0,
				rotation_speed: 0.01,
			},
		}
	}

	pub fn kind(&self) -> EntityKind {
		match self.body {
			Body::Drift => EntityKind::DriftParticle,
			Body::Sprite { .. } => EntityKind::FallingSprite,
		}
	}

	/// Current rotation in radians, for sprites only.
	pub fn rotation(&self) -> Option<f64> {
		match self.body {
			Body::Drift => None,
			Body::Sprite { rotation, .. } => Some(rotation),
		}
	}
}

/// Owns every entity for one surface size.
pub struct ParticleStore {
	pub(super) entities: Vec<Entity>,
	pub(super) width: f64,
	pub(super) height: f64,
}

impl ParticleStore {
	/// Build a fresh store: all drift particles first, then all sprites.
	pub fn initialize<R: Rng>(
		config: &SimulationConfig,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let mut entities = Vec::with_capacity(config.entity_count());

		for _ in 0..config.drift.count {
			entities.push(Entity::spawn_drift(&config.drift, width, height, rng));
		}
		for _ in 0..config.sprite.count {
			entities.push(Entity::spawn_sprite(&config.sprite, width, rng));
		}

		Self {
			entities,
			width,
			height,
		}
	}

	#[cfg(test)]
	pub(super) fn from_entities(entities: Vec<Entity>, width: f64, height: f64) -> Self {
		Self {
			entities,
			width,
			height,
		}
	}

	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	pub fn count(&self, kind: EntityKind) -> usize {
		self.entities.iter().filter(|e| e.kind() == kind).count()
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn initialize_produces_fixed_mix() {
		let mut rng = StdRng::seed_from_u64(1);
		let config = SimulationConfig::default();
		let store = ParticleStore::initialize(&config, 800.0, 600.0, &mut rng);

		assert_eq!(store.len(), 1250);
		assert_eq!(store.count(EntityKind::DriftParticle), 1200);
		assert_eq!(store.count(EntityKind::FallingSprite), 50);
		// Store order: drift block, then sprite block.
		assert_eq!(store.entities()[1199].kind(), EntityKind::DriftParticle);
		assert_eq!(store.entities()[1200].kind(), EntityKind::FallingSprite);
	}

	#[test]
	fn initialize_twice_differs_only_in_layout() {
		let mut rng = StdRng::seed_from_u64(2);
		let config = SimulationConfig::default();
		let a = ParticleStore::initialize(&config, 800.0, 600.0, &mut rng);
		let b = ParticleStore::initialize(&config, 800.0, 600.0, &mut rng);

		assert_eq!(a.len(), b.len());
		assert_eq!(
			a.count(EntityKind::FallingSprite),
			b.count(EntityKind::FallingSprite)
		);
		assert_ne!(a.entities()[0], b.entities()[0]);
	}

	#[test]
	fn spawn_ranges() {
		let mut rng = StdRng::seed_from_u64(3);
		let config = SimulationConfig::default();
		let store = ParticleStore::initialize(&config, 1024.0, 300.0, &mut rng);

		for e in store.entities() {
			match e.kind() {
				EntityKind::DriftParticle => {
					assert!((0.0..1024.0).contains(&e.x));
					assert!((0.0..300.0).contains(&e.y));
					assert!(config.drift.velocity.contains(e.vx));
					assert!(config.drift.velocity.contains(e.vy));
					assert!(config.drift.size.contains(e.size));
					assert_eq!(e.rotation(), None);
				}
				EntityKind::FallingSprite => {
					assert!((0.0..1024.0).contains(&e.x));
					assert!(e.y >= -250.0 && e.y < -50.0);
					assert!(config.sprite.velocity_x.contains(e.vx));
					assert!(config.sprite.velocity_y.contains(e.vy));
					assert!(config.sprite.size.contains(e.size));
					let rotation = e.rotation().unwrap();
					assert!((0.0..TAU).contains(&rotation));
					let Body::Sprite { rotation_speed, .. } = e.body else {
						unreachable!();
					};
					assert!(config.sprite.rotation_speed.contains(rotation_speed));
					assert!((-0.025..=0.025).contains(&rotation_speed));
				}
			}
		}
	}
}
