//! Canvas rendering for the ambient background.
//!
//! Entities are drawn in store order with no z-sorting, so sprites always
//! land on top of the drift particles. The surface is cleared first on every
//! drawn frame. A paused frame never reaches this module, which is what keeps
//! the last image on screen.

use std::f64::consts::TAU;

use rand::Rng;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::particles::{Entity, EntityKind, ParticleStore};
use super::theme::{Glow, Theme};

/// The 2D drawing operations the renderer needs.
///
/// Mirrors the subset of `CanvasRenderingContext2d` in use, so the renderer
/// can be driven against a recording surface.
pub trait Canvas2d {
	/// Decoded bitmap type accepted by [`Canvas2d::draw_image`].
	type Image;

	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn rotate(&self, angle: f64);
	fn fill_circle(&self, x: f64, y: f64, radius: f64);
	fn set_fill_style(&self, css: &str);
	fn set_shadow(&self, blur: f64, css: &str);
	fn set_global_alpha(&self, alpha: f64);
	fn draw_image(&self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64);
}

impl Canvas2d for CanvasRenderingContext2d {
	type Image = HtmlImageElement;

	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.fill();
	}

	fn set_fill_style(&self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn set_shadow(&self, blur: f64, css: &str) {
		self.set_shadow_blur(blur);
		self.set_shadow_color(css);
	}

	fn set_global_alpha(&self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn draw_image(&self, image: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
		let _ = self.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h);
	}
}

/// Renders one frame of the store.
///
/// `image` is `None` until the logo bitmap is ready (or forever, if it failed
/// to decode); sprites then fall back to plain circles. `jitter` feeds only
/// the cosmetic alpha shimmer and never touches simulation state.
pub fn render<C: Canvas2d, R: Rng>(
	store: &ParticleStore,
	ctx: &C,
	image: Option<&C::Image>,
	theme: &Theme,
	jitter: &mut R,
) {
	ctx.clear_rect(0.0, 0.0, store.width(), store.height());

	for e in store.entities() {
		match e.kind() {
			EntityKind::DriftParticle => draw_drift(ctx, e, theme, jitter),
			EntityKind::FallingSprite => draw_sprite(ctx, e, image, theme, jitter),
		}
	}
}

fn apply_glow<C: Canvas2d>(ctx: &C, glow: &Glow) {
	ctx.set_shadow(glow.blur, &glow.color.to_css());
}

fn draw_drift<C: Canvas2d, R: Rng>(ctx: &C, e: &Entity, theme: &Theme, jitter: &mut R) {
	let style = &theme.drift;
	let alpha = style.alpha.sample(jitter);
	ctx.set_fill_style(&style.color.with_alpha(alpha).to_css());
	apply_glow(ctx, &style.glow);
	ctx.fill_circle(e.x, e.y, e.size);
}

fn draw_sprite<C: Canvas2d, R: Rng>(
	ctx: &C,
	e: &Entity,
	image: Option<&C::Image>,
	theme: &Theme,
	jitter: &mut R,
) {
	let style = &theme.sprite;

	ctx.save();
	ctx.translate(e.x, e.y);
	ctx.rotate(e.rotation().unwrap_or(0.0));
	apply_glow(ctx, &style.glow);

	match image {
		Some(image) => {
			ctx.set_global_alpha(style.image_alpha.sample(jitter));
			let half = e.size / 2.0;
			ctx.draw_image(image, -half, -half, e.size, e.size);
			ctx.set_global_alpha(1.0);
		}
		None => {
			let alpha = style.fallback_alpha.sample(jitter);
			ctx.set_fill_style(&style.fallback_color.with_alpha(alpha).to_css());
			ctx.fill_circle(0.0, 0.0, e.size / 2.0);
		}
	}

	ctx.restore();
}
