//! Auris Accessibility
//!
//! Screen reader simulation over an `auris_dom::Document`.
//!
//! Features:
//! - Semantic node classification (role, name, description, states, value,
//!   set position, table coordinates)
//! - Filtered snapshot building across shadow roots with label de-duplication
//! - Mutation watching: live-region alerts and debounced rebuilds
//! - Virtual cursor navigation with rotor seeking, activation and focus sync
//! - Canonical announcement phrases and a bounded narration log

pub mod role;
pub mod state;
pub mod classifier;
pub mod tree;
pub mod timer;
pub mod live_region;
pub mod format;
pub mod rotor;
pub mod sink;
pub mod config;
pub mod screen_reader;

pub use role::{Role, NodeKind, Politeness};
pub use state::{State, StateSet};
pub use classifier::{Classifier, Position, Coords, PASSWORD_MASK};
pub use tree::{AccessibleNode, Snapshot, TreeBuilder, build_tree};
pub use timer::{Debounce, KeyedDebounce};
pub use live_region::{MutationWatcher, WatchEvent};
pub use format::{Formatter, Phrase};
pub use rotor::{Direction, Filter, Rotor};
pub use sink::{
    HighlightSink, SpeechSink, NarrateOptions, NarrationLog, NarrationKind, LogEntry,
    SpeechRecorder, Utterance, HighlightRecorder,
};
pub use config::ScreenReaderConfig;
pub use screen_reader::{ScreenReader, EngineState};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Mutation observation unavailable: {0}")]
    ObservationUnavailable(#[source] auris_dom::DomError),
}
