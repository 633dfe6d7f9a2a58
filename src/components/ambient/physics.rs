//! Per-frame physics for the ambient background.
//!
//! Entities never interact with each other. The only external force is a
//! repulsive field centred on the pointer, and it is only applied when the
//! frame's input snapshot says interaction is enabled.

use rand::Rng;

use super::config::{DriftParams, Repulsion, SimulationConfig, SpriteParams};
use super::particles::{Body, Entity, EntityKind, ParticleStore};

/// Pointer input captured once at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
	/// Pointer position, or `None` when interaction is disabled.
	pub pointer: Option<(f64, f64)>,
}

/// Advance every entity by one tick.
pub fn step<R: Rng>(
	store: &mut ParticleStore,
	input: FrameInput,
	config: &SimulationConfig,
	rng: &mut R,
) {
	let (w, h) = (store.width, store.height);
	for e in &mut store.entities {
		match e.kind() {
			EntityKind::DriftParticle => step_drift(e, w, h, input.pointer, &config.drift),
			EntityKind::FallingSprite => {
				step_sprite(e, w, h, input.pointer, &config.sprite, rng)
			}
		}
	}
}

/// Velocity delta pushing `(x, y)` away from the pointer.
fn repel(x: f64, y: f64, pointer: Option<(f64, f64)>, field: &Repulsion) -> (f64, f64) {
	let Some((px, py)) = pointer else {
		return (0.0, 0.0);
	};
	let (dx, dy) = (x - px, y - py);
	let distance = (dx * dx + dy * dy).sqrt();
	if distance >= field.radius {
		return (0.0, 0.0);
	}
	let force = (field.radius - distance) / field.radius;
	let angle = dy.atan2(dx);
	(
		angle.cos() * force * field.strength,
		angle.sin() * force * field.strength,
	)
}

fn step_drift(e: &mut Entity, w: f64, h: f64, pointer: Option<(f64, f64)>, p: &DriftParams) {
	let (fx, fy) = repel(e.x, e.y, pointer, &p.repulsion);
	e.vx = (e.vx + fx) * p.damping;
	e.vy = (e.vy + fy) * p.damping;

	e.x += e.vx;
	e.y += e.vy;

	if e.x < 0.0 || e.x > w {
		e.vx *= p.bounce;
	}
	if e.y < 0.0 || e.y > h {
		e.vy *= p.bounce;
	}
	e.x = e.x.clamp(0.0, w.max(0.0));
	e.y = e.y.clamp(0.0, h.max(0.0));
}

fn step_sprite<R: Rng>(
	e: &mut Entity,
	w: f64,
	h: f64,
	pointer: Option<(f64, f64)>,
	p: &SpriteParams,
	rng: &mut R,
) {
	let (fx, fy) = repel(e.x, e.y, pointer, &p.repulsion);
	e.vx = (e.vx + fx) * p.damping_x;
	e.vy += fy;
	// Keep a minimum fall speed so sprites never stall or drift upward.
	if e.vy < p.velocity_y.min {
		e.vy = p.velocity_y.sample(rng);
	}

	e.x += e.vx;
	e.y += e.vy;
	if let Body::Sprite {
		rotation,
		rotation_speed,
	} = &mut e.body
	{
		*rotation += *rotation_speed;
	}

	if e.y > h + p.recycle_margin {
		e.y = p.spawn_y.sample(rng);
		e.x = rng.r#gen::<f64>() * w;
		e.vx = p.velocity_x.sample(rng);
		e.vy = p.velocity_y.sample(rng);
	}

	if e.x < -p.wrap_margin {
		e.x = w + p.wrap_margin;
	} else if e.x > w + p.wrap_margin {
		e.x = -p.wrap_margin;
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(42)
	}

	fn near(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn pointer_repels_drift_particle() {
		let config = SimulationConfig::default();
		let mut store = ParticleStore::from_entities(
			vec![
				Entity::drift_at(420.0, 300.0, 0.0, 0.0),
				Entity::drift_at(380.0, 300.0, 0.0, 0.0),
			],
			800.0,
			600.0,
		);
		let input = FrameInput {
			pointer: Some((400.0, 300.0)),
		};
		step(&mut store, input, &config, &mut rng());

		// force = (100 - 20) / 100 * 0.1 = 0.08, then damped by 0.98
		let right = &store.entities()[0];
		assert!(near(right.vx, 0.08 * 0.98));
		assert!(near(right.vy, 0.0));
		assert!(near(right.x, 420.0 + 0.08 * 0.98));

		let left = &store.entities()[1];
		assert!(left.vx < 0.0);
		assert!(near(left.vx, -0.08 * 0.98));
	}

	#[test]
	fn pointer_outside_radius_has_no_effect() {
		let config = SimulationConfig::default();
		let mut store =
			ParticleStore::from_entities(vec![Entity::drift_at(550.0, 300.0, 0.0, 0.0)], 800.0, 600.0);
		let input = FrameInput {
			pointer: Some((400.0, 300.0)),
		};
		step(&mut store, input, &config, &mut rng());
		assert_eq!(store.entities()[0].vx, 0.0);
	}

	#[test]
	fn disabled_interaction_only_damps() {
		let config = SimulationConfig::default();
		let (vx0, vy0) = (0.2, -0.15);
		let mut store =
			ParticleStore::from_entities(vec![Entity::drift_at(400.0, 300.0, vx0, vy0)], 800.0, 600.0);
		let mut rng = rng();

		for n in 1..=50 {
			step(&mut store, FrameInput::default(), &config, &mut rng);
			let e = &store.entities()[0];
			let decay = 0.98f64.powi(n);
			assert!(near(e.vx, vx0 * decay));
			assert!(near(e.vy, vy0 * decay));
		}
	}

	#[test]
	fn drift_bounces_and_clamps() {
		let config = SimulationConfig::default();
		let mut store =
			ParticleStore::from_entities(vec![Entity::drift_at(799.9, 0.05, 1.0, -1.0)], 800.0, 600.0);
		step(&mut store, FrameInput::default(), &config, &mut rng());

		let e = &store.entities()[0];
		assert_eq!(e.x, 800.0);
		assert_eq!(e.y, 0.0);
		assert!(near(e.vx, 0.98 * -0.5));
		assert!(near(e.vy, -0.98 * -0.5));
	}

	#[test]
	fn sprite_recycles_above_surface() {
		let config = SimulationConfig::default();
		let mut store =
			ParticleStore::from_entities(vec![Entity::sprite_at(100.0, 651.0, 0.0, 0.5)], 800.0, 600.0);
		step(&mut store, FrameInput::default(), &config, &mut rng());

		let e = &store.entities()[0];
		assert!(e.y >= -250.0 && e.y < -50.0);
		assert!((0.0..800.0).contains(&e.x));
		assert!(config.sprite.velocity_y.contains(e.vy));
		assert_eq!(e.kind(), EntityKind::FallingSprite);
	}

	#[test]
	fn sprite_keeps_vertical_speed_and_rotates() {
		let config = SimulationConfig::default();
		let mut store =
			ParticleStore::from_entities(vec![Entity::sprite_at(100.0, 100.0, 0.1, 0.5)], 800.0, 600.0);
		step(&mut store, FrameInput::default(), &config, &mut rng());

		let e = &store.entities()[0];
		assert!(near(e.vy, 0.5));
		assert!(near(e.vx, 0.1 * 0.97));
		assert!(near(e.y, 100.5));
		assert!(near(e.rotation().unwrap(), 0.01));
	}

	#[test]
	fn stalled_sprite_gets_fresh_fall_speed() {
		let config = SimulationConfig::default();
		let mut store =
			ParticleStore::from_entities(vec![Entity::sprite_at(100.0, 100.0, 0.0, 0.1)], 800.0, 600.0);
		step(&mut store, FrameInput::default(), &config, &mut rng());
		assert!(config.sprite.velocity_y.contains(store.entities()[0].vy));
	}

	#[test]
	fn sprite_wraps_horizontally() {
		let config = SimulationConfig::default();
		let mut store = ParticleStore::from_entities(
			vec![
				Entity::sprite_at(-49.95, 100.0, -0.1, 0.5),
				Entity::sprite_at(849.95, 100.0, 0.1, 0.5),
			],
			800.0,
			600.0,
		);
		step(&mut store, FrameInput::default(), &config, &mut rng());
		assert_eq!(store.entities()[0].x, 850.0);
		assert_eq!(store.entities()[1].x, -50.0);
	}

	#[test]
	fn bounds_hold_over_long_runs() {
		let config = SimulationConfig::default();
		let mut rng = rng();
		let mut store = ParticleStore::initialize(&config, 640.0, 360.0, &mut rng);

		for tick in 0..2000 {
			// Sweep the pointer across the surface to exercise the force field.
			let t = tick as f64 * 0.01;
			let input = FrameInput {
				pointer: Some((320.0 + 300.0 * t.cos(), 180.0 + 170.0 * (t * 1.3).sin())),
			};
			step(&mut store, input, &config, &mut rng);

			for e in store.entities() {
				assert!(e.x.is_finite() && e.y.is_finite());
				match e.kind() {
					EntityKind::DriftParticle => {
						assert!((0.0..=640.0).contains(&e.x));
						assert!((0.0..=360.0).contains(&e.y));
					}
					EntityKind::FallingSprite => {
						assert!((-50.0..=690.0).contains(&e.x));
					}
				}
			}
		}
	}
}
