//! Visual styling for the ambient background.
//!
//! Colors and glow settings for both entity kinds. Alpha ranges are sampled
//! per frame by the renderer for a shimmering look.

use super::config::Span;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Soft shadow drawn around a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
	pub blur: f64,
	pub color: Color,
}

/// Drift particle style.
#[derive(Clone, Debug)]
pub struct DriftStyle {
	pub color: Color,
	/// Per-frame alpha jitter range
	pub alpha: Span,
	pub glow: Glow,
}

/// Falling sprite style.
#[derive(Clone, Debug)]
pub struct SpriteStyle {
	/// Per-frame alpha jitter range for the bitmap
	pub image_alpha: Span,
	/// Circle color used until the bitmap is ready
	pub fallback_color: Color,
	pub fallback_alpha: Span,
	pub glow: Glow,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub drift: DriftStyle,
	pub sprite: SpriteStyle,
}

/// Brand green shared by particles, fallback sprites, and glows.
const GNOME_GREEN: Color = Color::rgb(74, 154, 90);

impl Theme {
	/// Brand green on a transparent canvas (default)
	pub fn forest() -> Self {
		Self {
			drift: DriftStyle {
				color: GNOME_GREEN,
				alpha: Span::new(0.6, 1.0),
				glow: Glow {
					blur: 10.0,
					color: GNOME_GREEN,
				},
			},
			sprite: SpriteStyle {
				image_alpha: Span::new(0.8, 1.0),
				fallback_color: GNOME_GREEN,
				fallback_alpha: Span::new(0.7, 1.0),
				glow: Glow {
					blur: 15.0,
					color: GNOME_GREEN,
				},
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::forest()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(GNOME_GREEN.to_css(), "#4a9a5a");
		assert_eq!(
			GNOME_GREEN.with_alpha(0.75).to_css(),
			"rgba(74, 154, 90, 0.75)"
		);
	}

	#[test]
	fn forest_glows_in_brand_green() {
		let theme = Theme::default();
		assert_eq!(theme.drift.glow.color, GNOME_GREEN);
		assert_eq!(theme.sprite.glow.color, GNOME_GREEN);
		assert_eq!(theme.drift.glow.blur, 10.0);
		assert_eq!(theme.sprite.glow.blur, 15.0);
	}
}
