//! Change-event dispatch.
//!
//! The replication feed delivers one JSON event per changed table, carrying
//! the affected key values. The dispatcher looks up the table's chain,
//! resolves the impact, and applies the partial-failure policy: a per-event
//! error (unknown table, malformed keys) is logged and the event skipped, so
//! one bad event never stops the stream.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::impact::{resolve, ChangeKeys, Impact, ImpactError};
use crate::index_graph::ChainRegistry;

/// One replication event: rows with the given key values changed in `table`.
///
/// `keys` accepts a single integer or an array of integers:
/// `{"table": "work_alias", "keys": 7}` or
/// `{"table": "artist", "keys": [1, 2, 3]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    pub keys: Value,
}

impl ChangeEvent {
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Validate the raw key payload into [`ChangeKeys`].
    pub fn change_keys(&self) -> Result<ChangeKeys, ImpactError> {
        match &self.keys {
            Value::Array(values) => ChangeKeys::from_json(values),
            other => ChangeKeys::from_json(std::slice::from_ref(other)),
        }
    }
}

/// Resolves change events against a frozen [`ChainRegistry`].
#[derive(Debug, Clone)]
pub struct ReplicationDispatcher {
    registry: Arc<ChainRegistry>,
}

impl ReplicationDispatcher {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve one event, or `None` if it was skipped.
    ///
    /// Unknown tables and malformed keys are logged at warn level and
    /// skipped; subsequent events are unaffected.
    pub fn dispatch(&self, event: &ChangeEvent) -> Option<Impact> {
        let node = match self.registry.lookup(&event.table) {
            Ok(node) => node,
            Err(e) => {
                log::warn!("skipping change event: {e}");
                return None;
            }
        };
        let keys = match event.change_keys() {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("skipping change event for '{}': {e}", event.table);
                return None;
            }
        };
        match resolve(node, &keys) {
            Ok(impact) => {
                match &impact {
                    Impact::HeadIds => {
                        log::debug!("'{}' is a head entity; keys {} are head ids", event.table, keys)
                    }
                    Impact::Query(sql) => log::debug!("resolved '{}' to: {sql}", event.table),
                }
                Some(impact)
            }
            Err(e) => {
                log::warn!("skipping change event for '{}': {e}", event.table);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_graph::SchemaConfig;

    const WORK_SCHEMA: &str = r#"
schema:
  tables:
    - table: work
    - table: work_alias
      link: { next: work, local_column: id, remote_column: work }
"#;

    fn dispatcher() -> ReplicationDispatcher {
        let registry = SchemaConfig::from_yaml_str(WORK_SCHEMA).unwrap().build().unwrap();
        ReplicationDispatcher::new(Arc::new(registry))
    }

    #[test]
    fn dispatches_a_linked_table_event() {
        let event = ChangeEvent::from_json_line(r#"{"table": "work_alias", "keys": 7}"#).unwrap();
        let impact = dispatcher().dispatch(&event).unwrap();
        assert_eq!(
            impact,
            Impact::Query("SELECT work.id FROM work WHERE work.work IN (7)".to_string())
        );
    }

    #[test]
    fn dispatches_a_head_table_event_to_the_sentinel() {
        let event = ChangeEvent::from_json_line(r#"{"table": "work", "keys": [5]}"#).unwrap();
        assert_eq!(dispatcher().dispatch(&event), Some(Impact::HeadIds));
    }

    #[test]
    fn key_array_is_accepted() {
        let event =
            ChangeEvent::from_json_line(r#"{"table": "work_alias", "keys": [3, 1, 2]}"#).unwrap();
        let impact = dispatcher().dispatch(&event).unwrap();
        assert_eq!(
            impact,
            Impact::Query("SELECT work.id FROM work WHERE work.work IN (1,2,3)".to_string())
        );
    }

    #[test]
    fn unknown_table_is_skipped() {
        let event = ChangeEvent::from_json_line(r#"{"table": "url", "keys": 1}"#).unwrap();
        assert_eq!(dispatcher().dispatch(&event), None);
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let event =
            ChangeEvent::from_json_line(r#"{"table": "work_alias", "keys": ["7"]}"#).unwrap();
        assert_eq!(dispatcher().dispatch(&event), None);
    }

    #[test]
    fn empty_key_array_is_skipped() {
        let event = ChangeEvent::from_json_line(r#"{"table": "work_alias", "keys": []}"#).unwrap();
        assert_eq!(dispatcher().dispatch(&event), None);
    }

    #[test]
    fn skipped_event_does_not_affect_the_next_one() {
        let d = dispatcher();
        let bad = ChangeEvent::from_json_line(r#"{"table": "url", "keys": 1}"#).unwrap();
        let good = ChangeEvent::from_json_line(r#"{"table": "work_alias", "keys": 7}"#).unwrap();
        assert_eq!(d.dispatch(&bad), None);
        assert!(d.dispatch(&good).is_some());
    }
}
