//! Ambient particle background for the landing page hero.
//!
//! Renders two populations on a full-bleed canvas behind the hero content:
//! - Drifting dots that bounce softly off the surface edges
//! - Falling, rotating logo sprites that wrap horizontally and recycle at the
//!   bottom
//!
//! Both are pushed away by the pointer. The loop suspends itself once the
//! hero is scrolled out of view and resumes after scrolling settles back near
//! the top.
//!
//! # Example
//!
//! ```ignore
//! use gtg_ambient::components::ambient::{AmbientHero, ViewFlags};
//!
//! let flags = RwSignal::new(ViewFlags::default());
//! view! {
//!     <AmbientHero logo_src="/assets/logo.svg" flags=flags>
//!         <h1>"GTG"</h1>
//!     </AmbientHero>
//! }
//! ```

mod component;
pub mod config;
mod driver;
mod error;
mod image;
mod particles;
mod physics;
mod render;
mod state;
pub mod theme;
mod viewport;

pub use component::AmbientHero;
pub use config::SimulationConfig;
pub use error::MountError;
pub use theme::Theme;
pub use viewport::ViewFlags;
