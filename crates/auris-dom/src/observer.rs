//! Mutation Observation
//!
//! A single observer registration per document. Mutating `Document` calls
//! queue records; the owner drains them with `take_records`.

use crate::{Document, DomError, NodeId};

/// Mutation observer options
#[derive(Debug, Clone, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Everything, over the whole subtree
    pub fn all() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
            attribute_old_value: true,
            attribute_filter: None,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            attribute_name: None,
            old_value: None,
        }
    }

    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_ascii_lowercase()),
            old_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Active registration
#[derive(Debug)]
struct MutationObserver {
    target: NodeId,
    options: MutationObserverInit,
    records: Vec<MutationRecord>,
}

/// Per-document observation state
#[derive(Debug)]
pub(crate) struct Observation {
    supported: bool,
    observer: Option<MutationObserver>,
}

impl Default for Observation {
    fn default() -> Self {
        Self { supported: true, observer: None }
    }
}

impl Document {
    /// Simulate a host without mutation observation
    pub fn set_observation_supported(&mut self, supported: bool) {
        self.observation.supported = supported;
        if !supported {
            self.observation.observer = None;
        }
    }

    /// Start observing `target`. Replaces any previous registration.
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> Result<(), DomError> {
        if !self.observation.supported {
            return Err(DomError::NotSupported("MutationObserver"));
        }
        if self.tree.get(target).is_none() {
            return Err(DomError::NotFound(target));
        }
        self.observation.observer = Some(MutationObserver {
            target,
            options,
            records: Vec::new(),
        });
        Ok(())
    }

    /// Stop observing and drop queued records
    pub fn disconnect(&mut self) {
        self.observation.observer = None;
    }

    /// Whether an observer is registered
    pub fn is_observed(&self) -> bool {
        self.observation.observer.is_some()
    }

    /// Drain queued records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        self.observation.observer.as_mut()
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    pub(crate) fn queue_record(&mut self, mut record: MutationRecord) {
        let Some(observer) = self.observation.observer.as_ref() else {
            return;
        };
        let options = &observer.options;
        let wanted = match record.mutation_type {
            MutationType::ChildList => options.child_list,
            MutationType::CharacterData => options.character_data,
            MutationType::Attributes => options.attributes && match (&options.attribute_filter, &record.attribute_name) {
                (Some(filter), Some(name)) => filter.iter().any(|f| f.eq_ignore_ascii_case(name)),
                _ => true,
            },
        };
        if !wanted {
            return;
        }
        let in_scope = record.target == observer.target
            || (options.subtree && self.contains_composed(observer.target, record.target));
        if !in_scope {
            return;
        }
        if record.mutation_type == MutationType::Attributes && !options.attribute_old_value {
            record.old_value = None;
        }
        if let Some(observer) = self.observation.observer.as_mut() {
            observer.records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_queued_in_order() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.observe(body, MutationObserverInit::all()).unwrap();

        let p = doc.create_element("p");
        doc.append_child(body, p).unwrap();
        doc.set_attribute(p, "class", "note").unwrap();
        doc.set_attribute(p, "class", "alert").unwrap();

        let records = doc.take_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].mutation_type, MutationType::ChildList);
        assert_eq!(records[0].added_nodes, vec![p]);
        assert_eq!(records[2].old_value.as_deref(), Some("note"));
        assert!(doc.take_records().is_empty());
    }

    #[test]
    fn test_out_of_scope_and_filtered() {
        let mut doc = Document::default();
        let watched = doc.create_element("div");
        let other = doc.create_element("div");
        doc.append_child(doc.body(), watched).unwrap();
        doc.append_child(doc.body(), other).unwrap();
        doc.observe(watched, MutationObserverInit {
            attributes: true,
            subtree: true,
            attribute_filter: Some(vec!["aria-hidden".into()]),
            ..Default::default()
        }).unwrap();

        doc.set_attribute(other, "aria-hidden", "true").unwrap();
        doc.set_attribute(watched, "title", "x").unwrap();
        doc.set_attribute(watched, "aria-hidden", "true").unwrap();

        let records = doc.take_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].attribute_name.as_deref(), Some("aria-hidden"));
        assert_eq!(records[0].old_value, None);
    }

    #[test]
    fn test_unsupported_observation() {
        let mut doc = Document::default();
        doc.set_observation_supported(false);
        let body = doc.body();
        assert!(matches!(
            doc.observe(body, MutationObserverInit::all()),
            Err(DomError::NotSupported(_))
        ));
        assert!(!doc.is_observed());
    }
}
