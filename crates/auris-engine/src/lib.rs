//! Auris Engine
//!
//! A screen reader simulator for HTML documents, for accessibility education
//! and testing.
//!
//! # Goals
//! - Approximate what a screen reader announces (role, name, state, value, position)
//! - Deterministic timing: every timer is driven by a caller-supplied `Instant`
//! - Never disturb the page: failures degrade the narration, not the document
//!
//! # Example
//! ```rust,ignore
//! use auris_engine::{Config, Direction, Engine, Rotor};
//!
//! let engine = Engine::new(Config::default())?;
//! let mut page = engine.load_html("<h1>Welcome</h1><a href=\"/\">Home</a>")?;
//! page.enable();
//! page.seek(Direction::Next, Rotor::Links);
//! assert_eq!(page.last_spoken(), Some("\"Home\", link"));
//! ```

mod config;
mod engine;
mod page;

pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineError};
pub use page::Page;

pub use auris_a11y::{
    AccessibleNode, Direction, Filter, NarrationKind, Role, Rotor, Snapshot, State, WatchEvent,
};

// Re-export sub-crates for advanced usage
pub use auris_dom as dom;
pub use auris_html as html;
pub use auris_a11y as a11y;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
