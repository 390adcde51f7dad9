//! Engine Configuration

use std::time::Duration;

use auris_a11y::ScreenReaderConfig;

/// Engine configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL given to documents loaded from strings
    pub base_url: String,

    /// Quiet period before a structural change rebuilds the snapshot
    pub rebuild_debounce: Duration,

    /// Settle time before a live region is read
    pub live_settle: Duration,

    /// Quiet period before an edited field's value is echoed
    pub typing_debounce: Duration,

    /// Narration log entries kept
    pub log_capacity: usize,

    /// Characters kept in an accessible name before truncation
    pub name_limit: usize,

    /// Joins phrase parts
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        let reader = ScreenReaderConfig::default();
        Self {
            base_url: "about:blank".to_string(),
            rebuild_debounce: reader.rebuild_debounce,
            live_settle: reader.live_settle,
            typing_debounce: reader.typing_debounce,
            log_capacity: reader.log_capacity,
            name_limit: reader.name_limit,
            separator: reader.separator,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_rebuild_debounce(mut self, delay: Duration) -> Self {
        self.rebuild_debounce = delay;
        self
    }

    pub fn with_live_settle(mut self, delay: Duration) -> Self {
        self.live_settle = delay;
        self
    }

    pub fn with_typing_debounce(mut self, delay: Duration) -> Self {
        self.typing_debounce = delay;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_name_limit(mut self, limit: usize) -> Self {
        self.name_limit = limit;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Reject settings the screen reader cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        if self.name_limit == 0 {
            return Err(ConfigError::ZeroNameLimit);
        }
        Ok(())
    }

    /// Settings handed to each page's screen reader
    pub fn reader_config(&self) -> ScreenReaderConfig {
        ScreenReaderConfig::new()
            .with_rebuild_debounce(self.rebuild_debounce)
            .with_live_settle(self.live_settle)
            .with_typing_debounce(self.typing_debounce)
            .with_log_capacity(self.log_capacity)
            .with_name_limit(self.name_limit)
            .with_separator(self.separator.clone())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Narration log capacity must be at least 1")]
    ZeroLogCapacity,

    #[error("Name limit must be at least 1 character")]
    ZeroNameLimit,
}
