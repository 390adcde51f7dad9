//! Page - A loaded document with its screen reader session

use std::time::Instant;

use auris_a11y::{Direction, Filter, NarrationLog, ScreenReader, Snapshot, WatchEvent};
use auris_dom::{Document, NodeId};

use crate::EngineError;

/// A loaded page
#[derive(Debug)]
pub struct Page {
    document: Document,
    reader: ScreenReader,
}

impl Page {
    /// Pair a document with a (not yet enabled) screen reader
    pub fn new(document: Document, reader: ScreenReader) -> Self {
        Self { document, reader }
    }

    pub fn url(&self) -> &str {
        self.document.url()
    }

    /// Get the page title
    pub fn title(&self) -> String {
        self.document.title()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn reader(&self) -> &ScreenReader {
        &self.reader
    }

    /// Look up an element by id in the document scope
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.get_element_by_id(id)
    }

    // ========================================================================
    // Session
    // ========================================================================

    pub fn enable(&mut self) {
        self.reader.enable(&mut self.document);
    }

    pub fn disable(&mut self) {
        self.reader.disable(&mut self.document);
    }

    pub fn next(&mut self) -> bool {
        self.reader.next(&self.document)
    }

    pub fn previous(&mut self) -> bool {
        self.reader.previous(&self.document)
    }

    pub fn first(&mut self) -> bool {
        self.reader.first(&self.document)
    }

    pub fn last(&mut self) -> bool {
        self.reader.last(&self.document)
    }

    pub fn seek(&mut self, direction: Direction, filter: impl Into<Filter>) -> bool {
        self.reader.seek(&self.document, direction, filter)
    }

    pub fn activate(&mut self, now: Instant) -> bool {
        self.reader.activate(&mut self.document, now)
    }

    pub fn escape(&mut self) {
        self.reader.escape(&mut self.document);
    }

    // ========================================================================
    // Page-side input
    // ========================================================================

    /// Move native focus, as a user tabbing would, and let the cursor follow
    pub fn focus(&mut self, target: NodeId) -> bool {
        if !self.document.focus(target) {
            return false;
        }
        self.reader.sync_focus(&self.document)
    }

    /// Replace a field's value, as a user typing would
    pub fn type_text(&mut self, target: NodeId, text: &str, now: Instant) -> Result<(), EngineError> {
        self.document.set_value(target, text)?;
        self.reader.on_input(target, now);
        Ok(())
    }

    /// Run a page script against the document, then deliver its mutations
    pub fn mutate<R>(&mut self, now: Instant, script: impl FnOnce(&mut Document) -> R) -> R {
        let result = script(&mut self.document);
        self.reader.handle_mutations(&mut self.document, now);
        result
    }

    /// Fire due timers
    pub fn poll(&mut self, now: Instant) -> Vec<WatchEvent> {
        self.reader.poll(&mut self.document, now)
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn snapshot(&self) -> &Snapshot {
        self.reader.snapshot()
    }

    /// Pretty-printed JSON dump of the current snapshot
    pub fn snapshot_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self.reader.snapshot())?)
    }

    pub fn log(&self) -> &NarrationLog {
        self.reader.log()
    }

    /// Most recent narration
    pub fn last_spoken(&self) -> Option<&str> {
        self.reader.log().latest().map(|entry| entry.text.as_str())
    }
}
