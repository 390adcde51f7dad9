//! Mutation Watcher
//!
//! Splits one mutation record stream into two concerns: live region alerts
//! (after a short settle window) and tree invalidation (coalesced into one
//! debounced rebuild).

use std::time::{Duration, Instant};

use auris_dom::{Document, MutationObserverInit, MutationRecord, MutationType, NodeId};

use crate::classifier::{resolve_role, text_from_subtree};
use crate::role::Politeness;
use crate::timer::{Debounce, KeyedDebounce};
use crate::A11yError;

/// Attributes whose change can alter the snapshot
const RELEVANT_ATTRIBUTES: &[&str] = &[
    "hidden", "aria-hidden", "inert", "class", "style", "role",
    "aria-expanded", "aria-checked", "aria-invalid", "aria-selected",
    "aria-pressed", "aria-disabled", "disabled", "aria-label",
    "aria-labelledby", "tabindex", "href", "open", "type", "alt",
];

/// Something the watcher wants the engine to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The snapshot is stale
    Rebuild,
    /// A live region settled with new text
    Alert {
        region: NodeId,
        text: String,
        politeness: Politeness,
    },
}

/// Mutation watcher
#[derive(Debug)]
pub struct MutationWatcher {
    rebuild: Debounce,
    settle: KeyedDebounce<NodeId>,
    observing: bool,
}

impl MutationWatcher {
    pub fn new(rebuild_delay: Duration, settle_delay: Duration) -> Self {
        Self {
            rebuild: Debounce::new(rebuild_delay),
            settle: KeyedDebounce::new(settle_delay),
            observing: false,
        }
    }

    /// Subscribe to the whole document. Fails soft: without observation the
    /// caller keeps working on its initial snapshot.
    pub fn connect(&mut self, doc: &mut Document) -> Result<(), A11yError> {
        match doc.observe(NodeId::ROOT, MutationObserverInit::all()) {
            Ok(()) => {
                self.observing = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "mutation observation unavailable; live regions and auto-rebuild disabled");
                self.observing = false;
                Err(A11yError::ObservationUnavailable(err))
            }
        }
    }

    pub fn disconnect(&mut self, doc: &mut Document) {
        if self.observing {
            doc.disconnect();
        }
        self.observing = false;
        self.cancel_all();
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Cancel every pending timer
    pub fn cancel_all(&mut self) {
        self.rebuild.cancel();
        self.settle.cancel_all();
    }

    /// Drop a pending rebuild (one was just done eagerly)
    pub fn cancel_rebuild(&mut self) {
        self.rebuild.cancel();
    }

    pub fn rebuild_pending(&self) -> bool {
        self.rebuild.is_pending()
    }

    /// Earliest pending deadline, for hosts that sleep between polls
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.rebuild.deadline(), self.settle.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drain the document's queued records and handle them
    pub fn collect(&mut self, doc: &mut Document, now: Instant) {
        if !self.observing {
            return;
        }
        let records = doc.take_records();
        self.handle_records(doc, &records, now);
    }

    /// Classify a batch of records into settle and rebuild timers
    pub fn handle_records(&mut self, doc: &Document, records: &[MutationRecord], now: Instant) {
        let mut invalidated = false;
        for record in records {
            let busy_cleared = record.mutation_type == MutationType::Attributes
                && record.attribute_name.as_deref() == Some("aria-busy")
                && !is_busy(doc, record.target);

            let mut touched = vec![record.target];
            touched.extend(record.added_nodes.iter().copied());
            for node in touched {
                let Some((region, politeness)) = live_region_of(doc, node) else {
                    continue;
                };
                if is_busy(doc, region) {
                    tracing::trace!(?region, "live region busy");
                    continue;
                }
                tracing::trace!(?region, ?politeness, busy_cleared, "live region changed");
                self.settle.schedule(region, now);
            }

            invalidated |= match record.mutation_type {
                MutationType::ChildList => true,
                MutationType::Attributes => record.attribute_name.as_deref()
                    .is_some_and(|name| RELEVANT_ATTRIBUTES.contains(&name)),
                MutationType::CharacterData => false,
            };
        }
        if invalidated {
            self.rebuild.schedule(now);
        }
    }

    /// Fire due timers
    pub fn poll(&mut self, doc: &Document, now: Instant) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        for region in self.settle.take_due(now) {
            if let Some(event) = settle(doc, region) {
                events.push(event);
            }
        }
        if self.rebuild.fire_if_due(now) {
            events.push(WatchEvent::Rebuild);
        }
        events
    }
}

/// Read a settled region, unless it is gone, busy, focused or empty
fn settle(doc: &Document, region: NodeId) -> Option<WatchEvent> {
    if !doc.is_connected(region) || is_busy(doc, region) {
        return None;
    }
    // the user is already looking at it
    if doc.focus_within(region) {
        tracing::trace!(?region, "live region has focus; alert suppressed");
        return None;
    }
    let (_, politeness) = live_region_of(doc, region)?;
    let text = text_from_subtree(doc, region, false);
    if text.is_empty() {
        return None;
    }
    Some(WatchEvent::Alert { region, text, politeness })
}

fn is_busy(doc: &Document, el: NodeId) -> bool {
    doc.attr(el, "aria-busy").is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Nearest enclosing live region and its politeness. An explicit
/// `aria-live` wins over an implicit live role; "off" ends the search.
pub fn live_region_of(doc: &Document, node: NodeId) -> Option<(NodeId, Politeness)> {
    let start = if doc.is_element(node) { node } else { doc.parent_element(node)? };
    let mut current = Some(start);
    while let Some(el) = current {
        if let Some(live) = doc.attr(el, "aria-live") {
            return match Politeness::parse(live) {
                Politeness::Off => None,
                politeness => Some((el, politeness)),
            };
        }
        match resolve_role(doc, el).implicit_live_region() {
            Some(Politeness::Off) => return None,
            Some(politeness) => return Some((el, politeness)),
            None => {}
        }
        current = doc.parent_element(el);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn watcher() -> MutationWatcher {
        MutationWatcher::new(500 * MS, 100 * MS)
    }

    fn region(doc: &mut Document, attr: (&str, &str)) -> NodeId {
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div).unwrap();
        doc.set_attribute(div, attr.0, attr.1).unwrap();
        div
    }

    #[test]
    fn test_live_region_lookup() {
        let mut doc = Document::default();
        let alert = region(&mut doc, ("role", "alert"));
        let inner = doc.create_element("span");
        doc.append_child(alert, inner).unwrap();
        assert_eq!(live_region_of(&doc, inner), Some((alert, Politeness::Assertive)));

        doc.set_attribute(alert, "aria-live", "polite").unwrap();
        assert_eq!(live_region_of(&doc, inner), Some((alert, Politeness::Polite)));

        doc.set_attribute(inner, "aria-live", "off").unwrap();
        assert_eq!(live_region_of(&doc, inner), None);
    }

    #[test]
    fn test_settle_coalesces_and_reads_final_text() {
        let mut doc = Document::default();
        let status = region(&mut doc, ("aria-live", "polite"));
        let mut watcher = watcher();
        watcher.connect(&mut doc).unwrap();
        let start = Instant::now();

        doc.set_text_content(status, "Saving").unwrap();
        watcher.collect(&mut doc, start);
        doc.set_text_content(status, "Saved").unwrap();
        watcher.collect(&mut doc, start + 40 * MS);

        assert!(watcher.poll(&doc, start + 100 * MS).is_empty());
        let events = watcher.poll(&doc, start + 140 * MS);
        assert_eq!(events, vec![WatchEvent::Alert {
            region: status,
            text: "Saved".to_string(),
            politeness: Politeness::Polite,
        }]);
    }

    #[test]
    fn test_rebuild_debounced() {
        let mut doc = Document::default();
        let mut watcher = watcher();
        watcher.connect(&mut doc).unwrap();
        let start = Instant::now();

        for i in 0..5 {
            let p = doc.create_element("p");
            doc.append_child(doc.body(), p).unwrap();
            watcher.collect(&mut doc, start + (i * 100) * MS);
        }
        assert!(watcher.poll(&doc, start + 800 * MS).is_empty());
        assert_eq!(watcher.poll(&doc, start + 900 * MS), vec![WatchEvent::Rebuild]);
        assert!(watcher.poll(&doc, start + 2000 * MS).is_empty());
    }

    #[test]
    fn test_irrelevant_attribute_does_not_invalidate() {
        let mut doc = Document::default();
        let div = region(&mut doc, ("data-x", "1"));
        let mut watcher = watcher();
        watcher.connect(&mut doc).unwrap();
        let start = Instant::now();
        doc.set_attribute(div, "data-x", "2").unwrap();
        watcher.collect(&mut doc, start);
        assert!(!watcher.rebuild_pending());
        doc.set_attribute(div, "aria-expanded", "true").unwrap();
        watcher.collect(&mut doc, start);
        assert!(watcher.rebuild_pending());
    }

    #[test]
    fn test_busy_region_waits_until_cleared() {
        let mut doc = Document::default();
        let log = region(&mut doc, ("role", "log"));
        doc.set_attribute(log, "aria-busy", "true").unwrap();
        let mut watcher = watcher();
        watcher.connect(&mut doc).unwrap();
        let start = Instant::now();

        doc.set_text_content(log, "Line 1").unwrap();
        watcher.collect(&mut doc, start);
        assert!(watcher.poll(&doc, start + 200 * MS).iter().all(|e| *e == WatchEvent::Rebuild));

        doc.set_attribute(log, "aria-busy", "false").unwrap();
        watcher.collect(&mut doc, start + 300 * MS);
        let events = watcher.poll(&doc, start + 400 * MS);
        assert!(events.contains(&WatchEvent::Alert {
            region: log,
            text: "Line 1".to_string(),
            politeness: Politeness::Polite,
        }));
    }

    #[test]
    fn test_connect_fails_soft() {
        let mut doc = Document::default();
        doc.set_observation_supported(false);
        let mut watcher = watcher();
        let err = watcher.connect(&mut doc).unwrap_err();
        assert!(matches!(err, A11yError::ObservationUnavailable(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!watcher.is_observing());
        watcher.collect(&mut doc, Instant::now());
        assert!(watcher.poll(&doc, Instant::now()).is_empty());
    }
}
