//! Output Sinks
//!
//! Speech and highlight collaborators, recording implementations for tests
//! and demos, and the bounded narration log.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use auris_dom::NodeId;
use serde::Serialize;

/// Narration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NarrateOptions {
    /// Cancel in-flight speech before speaking
    pub interrupt: bool,
}

impl NarrateOptions {
    pub fn interrupt() -> Self {
        Self { interrupt: true }
    }

    pub fn queued() -> Self {
        Self { interrupt: false }
    }
}

/// Speech synthesis collaborator. Fire-and-forget.
pub trait SpeechSink {
    fn narrate(&mut self, text: &str, options: NarrateOptions);

    /// Cancel in-flight speech
    fn cancel(&mut self);
}

/// Visual indicator collaborator. At most one node is highlighted; `None`
/// clears the indicator.
pub trait HighlightSink {
    fn highlight(&mut self, target: Option<NodeId>);
}

/// One recorded speech call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Spoken { text: String, interrupt: bool },
    Cancelled,
}

/// Speech sink that records into a shared buffer
#[derive(Debug, Clone, Default)]
pub struct SpeechRecorder {
    utterances: Rc<RefCell<Vec<Utterance>>>,
}

impl SpeechRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn utterances(&self) -> Vec<Utterance> {
        self.utterances.borrow().clone()
    }

    /// Spoken texts only, in order
    pub fn spoken(&self) -> Vec<String> {
        self.utterances.borrow()
            .iter()
            .filter_map(|u| match u {
                Utterance::Spoken { text, .. } => Some(text.clone()),
                Utterance::Cancelled => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.utterances.borrow_mut().clear();
    }
}

impl SpeechSink for SpeechRecorder {
    fn narrate(&mut self, text: &str, options: NarrateOptions) {
        self.utterances.borrow_mut().push(Utterance::Spoken {
            text: text.to_string(),
            interrupt: options.interrupt,
        });
    }

    fn cancel(&mut self) {
        self.utterances.borrow_mut().push(Utterance::Cancelled);
    }
}

/// Highlight sink that records every call
#[derive(Debug, Clone, Default)]
pub struct HighlightRecorder {
    calls: Rc<RefCell<Vec<Option<NodeId>>>>,
}

impl HighlightRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Option<NodeId>> {
        self.calls.borrow().clone()
    }

    /// Currently highlighted node, from the last call
    pub fn current(&self) -> Option<NodeId> {
        self.calls.borrow().last().copied().flatten()
    }
}

impl HighlightSink for HighlightRecorder {
    fn highlight(&mut self, target: Option<NodeId>) {
        self.calls.borrow_mut().push(target);
    }
}

/// Why something was narrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationKind {
    /// Cursor movement, activation, focus sync
    Navigation,
    /// Live region announcement
    Alert,
    /// Fallbacks, typing echo and other feedback
    Hint,
}

/// Narration log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub text: String,
    pub kind: NarrationKind,
    pub interrupt: bool,
}

/// Bounded log, most recent first
#[derive(Debug, Clone)]
pub struct NarrationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl NarrationLog {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Texts, most recent first
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> LogEntry {
        LogEntry { text: text.to_string(), kind: NarrationKind::Navigation, interrupt: true }
    }

    #[test]
    fn test_log_most_recent_first_and_bounded() {
        let mut log = NarrationLog::new(2);
        log.push(entry("one"));
        log.push(entry("two"));
        log.push(entry("three"));
        assert_eq!(log.texts(), vec!["three", "two"]);
        assert_eq!(log.latest().map(|e| e.text.as_str()), Some("three"));
    }

    #[test]
    fn test_recorder_shares_buffer() {
        let recorder = SpeechRecorder::new();
        let mut sink: Box<dyn SpeechSink> = Box::new(recorder.clone());
        sink.narrate("Hello", NarrateOptions::interrupt());
        sink.cancel();
        assert_eq!(recorder.spoken(), vec!["Hello"]);
        assert_eq!(recorder.utterances().last(), Some(&Utterance::Cancelled));
    }
}
