//! Navigation Engine
//!
//! Owns the snapshot, the virtual cursor and the highlighted node, and turns
//! user commands, focus changes and watcher events into narration.

use std::fmt;
use std::time::Instant;

use auris_dom::{collapse_whitespace, ActivationOutcome, Document, NodeId, SubmitOutcome};

use crate::classifier::{Classifier, PASSWORD_MASK};
use crate::config::ScreenReaderConfig;
use crate::format::Formatter;
use crate::live_region::{MutationWatcher, WatchEvent};
use crate::role::{Politeness, Role};
use crate::state::State;
use crate::rotor::{Direction, Filter};
use crate::sink::{HighlightSink, LogEntry, NarrateOptions, NarrationKind, NarrationLog, SpeechSink};
use crate::timer::KeyedDebounce;
use crate::tree::{AccessibleNode, Snapshot, TreeBuilder};

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No snapshot, cursor unset
    Idle,
    /// Snapshot present
    Ready,
}

/// Screen reader session over one document
pub struct ScreenReader {
    config: ScreenReaderConfig,
    builder: TreeBuilder,
    formatter: Formatter,
    watcher: MutationWatcher,
    typing: KeyedDebounce<NodeId>,

    snapshot: Snapshot,
    generation: u64,
    cursor: Option<usize>,
    highlighted: Option<NodeId>,
    enabled: bool,
    /// Focus we caused ourselves; its focus event is not re-announced
    own_focus: Option<NodeId>,
    /// Host focus as of the last sync
    seen_focus: Option<NodeId>,

    speech: Option<Box<dyn SpeechSink>>,
    highlight: Option<Box<dyn HighlightSink>>,
    log: NarrationLog,
}

impl fmt::Debug for ScreenReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenReader")
            .field("state", &self.state())
            .field("nodes", &self.snapshot.len())
            .field("generation", &self.generation)
            .field("cursor", &self.cursor)
            .field("highlighted", &self.highlighted)
            .finish_non_exhaustive()
    }
}

impl Default for ScreenReader {
    fn default() -> Self {
        Self::new(ScreenReaderConfig::default())
    }
}

impl ScreenReader {
    pub fn new(config: ScreenReaderConfig) -> Self {
        Self {
            builder: TreeBuilder::new(Classifier::new(config.name_limit)),
            formatter: Formatter::new(config.separator.clone()),
            watcher: MutationWatcher::new(config.rebuild_debounce, config.live_settle),
            typing: KeyedDebounce::new(config.typing_debounce),
            snapshot: Snapshot::default(),
            generation: 0,
            cursor: None,
            highlighted: None,
            enabled: false,
            own_focus: None,
            seen_focus: None,
            speech: None,
            highlight: None,
            log: NarrationLog::new(config.log_capacity),
            config,
        }
    }

    /// Attach a speech collaborator. Without one, narration is only logged.
    pub fn with_speech(mut self, speech: Box<dyn SpeechSink>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Attach a highlight collaborator
    pub fn with_highlight(mut self, highlight: Box<dyn HighlightSink>) -> Self {
        self.highlight = Some(highlight);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Take the initial snapshot and start watching the document
    pub fn enable(&mut self, doc: &mut Document) {
        self.enabled = true;
        self.cursor = None;
        self.seen_focus = doc.active_element();
        self.build(doc);
        if self.watcher.connect(doc).is_err() {
            tracing::info!("screen reader running on a static snapshot");
        }
        tracing::info!(nodes = self.snapshot.len(), observing = self.watcher.is_observing(), "screen reader enabled");
    }

    /// Tear down: cancel timers and speech, stop watching, clear the highlight
    pub fn disable(&mut self, doc: &mut Document) {
        self.watcher.disconnect(doc);
        self.typing.cancel_all();
        if let Some(speech) = self.speech.as_mut() {
            speech.cancel();
        }
        self.set_highlight(None);
        self.snapshot = Snapshot::default();
        self.cursor = None;
        self.own_focus = None;
        self.seen_focus = None;
        self.enabled = false;
        tracing::info!("screen reader disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> EngineState {
        if self.enabled { EngineState::Ready } else { EngineState::Idle }
    }

    pub fn config(&self) -> &ScreenReaderConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Node under the cursor, as of the last build
    pub fn current(&self) -> Option<&AccessibleNode> {
        self.snapshot.get(self.cursor?)
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    pub fn log(&self) -> &NarrationLog {
        &self.log
    }

    pub fn is_observing(&self) -> bool {
        self.watcher.is_observing()
    }

    /// Earliest instant at which `poll` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.watcher.next_deadline(), self.typing.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    /// Move to `index` (clamped) and announce the node's live state
    pub fn move_to(&mut self, doc: &Document, index: usize) -> bool {
        if !self.enabled || self.snapshot.is_empty() {
            return false;
        }
        let index = index.min(self.snapshot.len() - 1);
        self.cursor = Some(index);
        self.own_focus = None;
        self.announce_current(doc, None);
        true
    }

    /// Next node; from an unset cursor, the first
    pub fn next(&mut self, doc: &Document) -> bool {
        let index = self.cursor.map_or(0, |i| i + 1);
        self.move_to(doc, index)
    }

    /// Previous node; from an unset cursor, the first
    pub fn previous(&mut self, doc: &Document) -> bool {
        let index = self.cursor.map_or(0, |i| i.saturating_sub(1));
        self.move_to(doc, index)
    }

    pub fn first(&mut self, doc: &Document) -> bool {
        self.move_to(doc, 0)
    }

    pub fn last(&mut self, doc: &Document) -> bool {
        self.move_to(doc, self.snapshot.len().saturating_sub(1))
    }

    /// Move to the nearest node past the cursor matching `filter`. When
    /// nothing matches the cursor stays put and a fallback is spoken.
    pub fn seek(&mut self, doc: &Document, direction: Direction, filter: impl Into<Filter>) -> bool {
        let filter = filter.into();
        if !self.enabled {
            return false;
        }
        let nodes = self.snapshot.nodes();
        let found = match direction {
            Direction::Next => {
                let start = self.cursor.map_or(0, |i| i + 1);
                nodes.iter().enumerate().skip(start).find(|(_, n)| filter.matches(n)).map(|(i, _)| i)
            }
            Direction::Previous => {
                let end = self.cursor.unwrap_or(nodes.len());
                nodes[..end.min(nodes.len())].iter().rposition(|n| filter.matches(n))
            }
        };
        match found {
            Some(index) => self.move_to(doc, index),
            None => {
                self.own_focus = None;
                tracing::debug!(?direction, label = %filter.label(), "seek found nothing");
                self.narrate(&filter.not_found(direction), NarrationKind::Hint, NarrateOptions::interrupt());
                false
            }
        }
    }

    // ========================================================================
    // Activation and escape
    // ========================================================================

    /// Activate the node under the cursor: focus text fields, submit forms,
    /// click everything else.
    pub fn activate(&mut self, doc: &mut Document, now: Instant) -> bool {
        let Some((index, node)) = self.cursor.and_then(|i| Some((i, self.snapshot.get(i)?.clone()))) else {
            return false;
        };
        let Some(node) = node.refreshed(doc, self.builder.classifier()) else {
            tracing::debug!(element = ?node.element, "activation target is gone");
            self.rebuild(doc);
            self.announce_current(doc, None);
            return false;
        };
        let el = node.element;

        let text_entry = node.role.is_editable() || (node.role == Role::Combobox && doc.is_text_entry(el));
        if text_entry {
            if doc.focus(el) {
                self.own_focus = Some(el);
                self.seen_focus = Some(el);
            }
            let text = if node.name.is_empty() {
                "edit field".to_string()
            } else {
                format!("{}{}edit field", node.name, self.config.separator)
            };
            self.narrate(&text, NarrationKind::Navigation, NarrateOptions::interrupt());
            return true;
        }

        if doc.is_submit_button(el) {
            if let Some(form) = doc.form_owner(el) {
                let outcome = doc.request_submit(form);
                self.watcher.collect(doc, now);
                self.after_submit(doc, outcome);
                return true;
            }
        }

        let outcome = doc.click(el);
        tracing::debug!(?el, ?outcome, "activated");
        self.watcher.collect(doc, now);
        if let ActivationOutcome::Submit(submit) = outcome {
            self.after_submit(doc, submit);
            return true;
        }

        // the click may have rewritten the page
        self.rebuild(doc);
        self.watcher.cancel_rebuild();
        let target = self.snapshot.index_of(el).unwrap_or(index);
        self.move_to(doc, target);
        self.sync_focus(doc);
        true
    }

    fn after_submit(&mut self, doc: &Document, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Invalid { control, message } => {
                if self.snapshot.index_of(control).is_some() {
                    self.on_focus(doc, control);
                } else {
                    self.narrate(&message, NarrationKind::Hint, NarrateOptions::interrupt());
                }
            }
            SubmitOutcome::Submitted(form) => {
                tracing::debug!(?form, "form submitted");
                let element = self.current().map(|n| n.element);
                self.rebuild(doc);
                self.watcher.cancel_rebuild();
                let index = element.and_then(|el| self.snapshot.index_of(el)).or(self.cursor).unwrap_or(0);
                self.move_to(doc, index);
            }
        }
    }

    /// Silence speech; leave a text field if one has focus
    pub fn escape(&mut self, doc: &mut Document) {
        if let Some(speech) = self.speech.as_mut() {
            speech.cancel();
        }
        let editing = doc.active_element().is_some_and(|el| doc.is_text_entry(el));
        if editing {
            doc.blur();
            self.own_focus = None;
            self.seen_focus = None;
            let target = self.current().map(|n| n.element);
            self.set_highlight(target);
        } else {
            self.set_highlight(None);
        }
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Host focus moved to `target`: snap the cursor to it and announce,
    /// validation message first.
    pub fn on_focus(&mut self, doc: &Document, target: NodeId) -> bool {
        if self.own_focus.take() == Some(target) {
            self.seen_focus = Some(target);
            return false;
        }
        let Some(index) = self.snapshot.index_of(target) else {
            return false;
        };
        self.seen_focus = Some(target);
        self.cursor = Some(index);
        let invalid = self.snapshot.get(index)
            .and_then(|n| n.refreshed(doc, self.builder.classifier()))
            .is_some_and(|n| n.states.contains(State::Invalid));
        match doc.validation_message(target).filter(|m| invalid && !m.is_empty()) {
            Some(message) => {
                self.narrate(&message, NarrationKind::Navigation, NarrateOptions::interrupt());
                self.announce(doc, NarrateOptions::queued(), false);
            }
            None => self.announce_current(doc, None),
        }
        true
    }

    /// Follow the host's focus if it sits on a node other than the cursor's
    pub fn sync_focus(&mut self, doc: &Document) -> bool {
        let Some(active) = doc.active_element() else {
            self.seen_focus = None;
            return false;
        };
        if self.current().is_some_and(|n| n.element == active) {
            self.seen_focus = Some(active);
            return false;
        }
        self.on_focus(doc, active)
    }

    /// Sync only when host focus moved since the last sync, so a field the
    /// user navigated away from does not pull the cursor back.
    fn follow_focus(&mut self, doc: &Document) {
        if doc.active_element() != self.seen_focus {
            self.sync_focus(doc);
        }
    }

    /// The user typed into `target`; its value is echoed once typing pauses
    pub fn on_input(&mut self, target: NodeId, now: Instant) {
        if self.enabled {
            self.typing.schedule(target, now);
        }
    }

    /// Feed pending document mutations to the watcher
    pub fn handle_mutations(&mut self, doc: &mut Document, now: Instant) {
        if self.enabled {
            self.watcher.collect(doc, now);
            self.follow_focus(doc);
        }
    }

    /// Drain mutations and fire due timers
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> Vec<WatchEvent> {
        if !self.enabled {
            return Vec::new();
        }
        self.watcher.collect(doc, now);
        let events = self.watcher.poll(doc, now);
        for event in &events {
            match event {
                WatchEvent::Alert { text, politeness, .. } => {
                    let options = NarrateOptions { interrupt: *politeness == Politeness::Assertive };
                    self.narrate(text, NarrationKind::Alert, options);
                }
                WatchEvent::Rebuild => self.rebuild(doc),
            }
        }
        // focus may have landed on a node the rebuild just added
        self.follow_focus(doc);
        for target in self.typing.take_due(now) {
            if doc.is_connected(target) {
                let echo = typed_value(doc, target);
                self.narrate(&echo, NarrationKind::Hint, NarrateOptions::interrupt());
            }
        }
        events
    }

    /// Replace the snapshot, keeping the cursor on the same element when
    /// it survived, else on the same index (re-clamped).
    pub fn rebuild(&mut self, doc: &Document) {
        if !self.enabled {
            return;
        }
        let previous = self.current().map(|n| n.element);
        let old_index = self.cursor;
        self.build(doc);

        self.cursor = if self.snapshot.is_empty() {
            None
        } else {
            previous
                .and_then(|el| self.snapshot.index_of(el))
                .or_else(|| old_index.map(|i| i.min(self.snapshot.len() - 1)))
        };
        if let Some(el) = self.highlighted {
            if self.snapshot.index_of(el).is_none() || !doc.is_connected(el) {
                self.set_highlight(None);
            }
        }
        tracing::debug!(generation = self.generation, cursor = ?self.cursor, "rebuilt");
    }

    fn build(&mut self, doc: &Document) {
        self.generation += 1;
        self.snapshot = self.builder.build(doc, self.generation);
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Re-classify the cursor node, highlight it and speak its phrase
    fn announce_current(&mut self, doc: &Document, options: Option<NarrateOptions>) {
        self.announce(doc, options.unwrap_or_else(NarrateOptions::interrupt), true);
    }

    fn announce(&mut self, doc: &Document, options: NarrateOptions, with_message: bool) {
        let Some(node) = self.current().cloned() else {
            return;
        };
        let live = node.refreshed(doc, self.builder.classifier()).unwrap_or(node);
        self.set_highlight(Some(live.element));
        let phrase = if with_message {
            self.formatter.format(doc, &live)
        } else {
            self.formatter.format_after_message(doc, &live)
        };
        self.narrate(&phrase.to_string(), NarrationKind::Navigation, options);
    }

    /// Exclusive highlight: the previous one is cleared first
    fn set_highlight(&mut self, target: Option<NodeId>) {
        if let Some(sink) = self.highlight.as_mut() {
            if self.highlighted.is_some() {
                sink.highlight(None);
            }
            if target.is_some() {
                sink.highlight(target);
            }
        }
        self.highlighted = target;
    }

    fn narrate(&mut self, text: &str, kind: NarrationKind, options: NarrateOptions) {
        if text.is_empty() {
            return;
        }
        tracing::debug!(?kind, interrupt = options.interrupt, %text, "narrate");
        self.log.push(LogEntry { text: text.to_string(), kind, interrupt: options.interrupt });
        if let Some(speech) = self.speech.as_mut() {
            speech.narrate(text, options);
        }
    }
}

/// Full value of an edited field, masked for passwords
fn typed_value(doc: &Document, target: NodeId) -> String {
    let value = match doc.tag_name(target) {
        Some("input" | "textarea") => doc.value(target),
        _ => collapse_whitespace(&doc.text_content(target)),
    };
    if value.is_empty() {
        "blank".to_string()
    } else if doc.tag_name(target) == Some("input") && doc.input_type(target) == "password" {
        PASSWORD_MASK.to_string()
    } else {
        value
    }
}
