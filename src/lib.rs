//! gtg-ambient: the Gnome Trading Group landing page hero.
//!
//! This crate provides a WASM-based hero section with an animated ambient
//! particle field and falling logo sprites that react to the pointer and
//! pause themselves when the hero scrolls out of view.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

// Selects the `js` entropy backend used by `rand` on wasm.
use getrandom as _;

pub mod components;

pub use components::ambient::{AmbientHero, SimulationConfig, ViewFlags};

/// Static logo asset shared by the nav bar and the falling sprites.
const LOGO_SRC: &str = "/assets/logo.svg";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("gtg-ambient: logging initialized");
}

/// Load simulation overrides from a script element with id="ambient-config".
/// Expected format: JSON matching [`SimulationConfig`], any subset of fields
/// at any depth.
fn load_simulation_config() -> Option<SimulationConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("ambient-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match SimulationConfig::from_overrides(&json_text) {
		Ok(config) => {
			info!(
				"gtg-ambient: loaded config ({} particles, {} sprites)",
				config.drift.count, config.sprite.count
			);
			Some(config)
		}
		Err(e) => {
			warn!("gtg-ambient: failed to parse ambient config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Renders the nav bar and the animated hero.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_simulation_config().unwrap_or_default();
	let flags = RwSignal::new(ViewFlags::default());
	let app_class = move || if flags.get().paused { "app paused" } else { "app" };
	let nav_class = move || {
		if flags.get().scrolled {
			"nav nav-scrolled"
		} else {
			"nav"
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Gnome Trading Group" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class=app_class>
			<nav class=nav_class>
				<div class="nav-container">
					<img src=LOGO_SRC class="nav-logo" alt="Gnome Trading Group" />
					<div class="nav-title">"Gnome Trading Group"</div>
				</div>
			</nav>
			<AmbientHero logo_src=LOGO_SRC flags=flags config=config>
				<div class="hero-content">
					<h1 class="hero-title">"GTG"</h1>
				</div>
			</AmbientHero>
		</div>
	}
}
