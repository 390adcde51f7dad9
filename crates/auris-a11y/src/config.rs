//! Screen Reader Configuration

use std::time::Duration;

use crate::classifier::DEFAULT_NAME_LIMIT;

/// Screen reader timing and output settings
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenReaderConfig {
    /// Coalescing window for tree rebuilds
    pub rebuild_debounce: Duration,
    /// Delay before a changed live region is read
    pub live_settle: Duration,
    /// Delay before an edited field's value is echoed
    pub typing_debounce: Duration,
    /// Narration log entries kept
    pub log_capacity: usize,
    /// Accessible name length before truncation
    pub name_limit: usize,
    /// Joins phrase parts
    pub separator: String,
}

impl Default for ScreenReaderConfig {
    fn default() -> Self {
        Self {
            rebuild_debounce: Duration::from_millis(500),
            live_settle: Duration::from_millis(100),
            typing_debounce: Duration::from_millis(750),
            log_capacity: 50,
            name_limit: DEFAULT_NAME_LIMIT,
            separator: ", ".to_string(),
        }
    }
}

impl ScreenReaderConfig {
    pub fn new() -> Self {
        Self::default()
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
}
