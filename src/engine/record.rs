// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::binding::SourceIdentity;
use crate::errors::SourceError;
use crate::key::JoinKey;
use crate::sources::Item;

/// Per-source values of a completed record, in the merge's [`OutputShape`].
///
/// Both shapes keep input order. `Named` serializes as a JSON object whose keys
/// follow the order the sources were given in.
///
/// [`OutputShape`]: crate::engine::OutputShape
#[derive(Debug, Clone, PartialEq)]
pub enum Slots<T> {
    Ordered(Vec<T>),
    Named(Vec<(String, T)>),
}

impl<T: Serialize> Serialize for Slots<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slots::Ordered(values) => values.serialize(serializer),
            Slots::Named(values) => {
                let mut map = serializer.serialize_map(Some(values.len()))?;
                for (name, value) in values {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl<T> Slots<T> {
    pub fn get(&self, identity: &SourceIdentity) -> Option<&T> {
        match (self, identity) {
            (Slots::Ordered(values), SourceIdentity::Index(index)) => values.get(*index),
            (Slots::Named(_), identity) => self.by_name(&identity.label()),
            (Slots::Ordered(_), SourceIdentity::Name(_)) => None,
        }
    }

    pub fn by_index(&self, index: usize) -> Option<&T> {
        match self {
            Slots::Ordered(values) => values.get(index),
            Slots::Named(_) => None,
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&T> {
        match self {
            Slots::Named(values) => values.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Slots::Ordered(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Slots::Ordered(values) => values.len(),
            Slots::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Slots::Named(_))
    }
}

/// One combined record: every source contributed an item for `key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRecord {
    pub key: JoinKey,
    pub data: Slots<Item>,
    pub pos: Slots<u64>,
}

/// A group that never completed, as reported at end of input.
///
/// Only the sources that contributed an item appear in `data` and `pos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialGroup {
    pub key: JoinKey,
    pub data: BTreeMap<SourceIdentity, Item>,
    pub pos: BTreeMap<SourceIdentity, u64>,
}

/// Keys that never aligned across all sources, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    pub keys: Vec<JoinKey>,
    pub groups: BTreeMap<JoinKey, PartialGroup>,
}

impl MissingReport {
    pub fn from_groups(groups: Vec<PartialGroup>) -> Self {
        let keys = groups.iter().map(|g| g.key.clone()).collect();
        let groups = groups.into_iter().map(|g| (g.key.clone(), g)).collect();
        Self { keys, groups }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Everything a merge reports, in order.
///
/// `Record`s come first, then at most one of `Missing` or `Error`, then exactly
/// one `End`. A closed merge reports nothing further, not even `End`.
#[derive(Debug, Clone)]
pub enum MergeEvent {
    Record(MergedRecord),
    Missing(MissingReport),
    Error(SourceError),
    End,
}

impl MergeEvent {
    pub fn into_record(self) -> Option<MergedRecord> {
        match self {
            MergeEvent::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, MergeEvent::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ordered_records_serialize_as_arrays() {
        let record = MergedRecord {
            key: JoinKey::from("1"),
            data: Slots::Ordered(vec![json!(["1", "Martin"]), json!(["1", "Heidegger"])]),
            pos: Slots::Ordered(vec![0, 0]),
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"key": "1", "data": [["1", "Martin"], ["1", "Heidegger"]], "pos": [0, 0]})
        );
    }

    #[test]
    fn named_records_serialize_as_objects() {
        let record = MergedRecord {
            key: JoinKey::Int(1),
            data: Slots::Named(vec![
                ("bus".to_string(), json!([1, "omni"])),
                ("bar".to_string(), json!([1, "foo"])),
            ]),
            pos: Slots::Named(vec![("bus".to_string(), 0), ("bar".to_string(), 0)]),
        };

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"key":1,"data":{"bus":[1,"omni"],"bar":[1,"foo"]},"pos":{"bus":0,"bar":0}}"#
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"key": 1, "data": {"bus": [1, "omni"], "bar": [1, "foo"]}, "pos": {"bus": 0, "bar": 0}})
        );
        assert_eq!(record.data.by_name("bus"), Some(&json!([1, "omni"])));
        assert_eq!(record.data.get(&SourceIdentity::Name("bar".into())), Some(&json!([1, "foo"])));
        assert_eq!(record.data.by_index(0), None);
    }

    #[test]
    fn partial_groups_serialize_sparse() {
        let group = PartialGroup {
            key: JoinKey::Int(2),
            data: BTreeMap::from([(SourceIdentity::Index(1), json!([2]))]),
            pos: BTreeMap::from([(SourceIdentity::Index(1), 1)]),
        };

        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            json!({"key": 2, "data": {"1": [2]}, "pos": {"1": 1}})
        );
    }

    #[test]
    fn missing_report_keeps_given_order() {
        let group = |k: i64| PartialGroup {
            key: JoinKey::Int(k),
            data: BTreeMap::new(),
            pos: BTreeMap::new(),
        };
        let report = MissingReport::from_groups(vec![group(5), group(2)]);

        assert_eq!(report.keys, vec![JoinKey::Int(5), JoinKey::Int(2)]);
        assert_eq!(report.len(), 2);
        assert!(report.groups.contains_key(&JoinKey::Int(2)));
    }
}
