// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-progress groups keyed by join key.
//!
//! A group is created on the first item for its key and removed the moment every
//! source has filled its slot; it is never revisited after that. Groups that never
//! complete stay in the table until end of input. The table is unbounded: a key
//! that some source never produces is held until the merge finishes.

use std::collections::{BTreeMap, HashMap};

use crate::engine::binding::{OutputShape, SourceIdentity};
use crate::engine::record::{MergedRecord, PartialGroup, Slots};
use crate::key::JoinKey;
use crate::sources::Item;

/// Items sharing one join key, one slot per source.
#[derive(Debug, Clone)]
pub struct Group {
    key: JoinKey,
    slots: Vec<Option<Item>>,
    positions: Vec<Option<u64>>,
    filled: usize,
    created: u64,
}

impl Group {
    fn new(key: JoinKey, width: usize, created: u64) -> Self {
        Self {
            key,
            slots: vec![None; width],
            positions: vec![None; width],
            filled: 0,
            created,
        }
    }

    /// Store `item` in the source's slot. A repeat from the same source overwrites
    /// the slot without counting towards completion.
    fn fill(&mut self, source: usize, item: Item, position: u64) {
        let previous = self.slots[source].replace(item);
        self.positions[source] = Some(position);
        if previous.is_none() {
            self.filled += 1;
        }
    }

    pub fn key(&self) -> &JoinKey {
        &self.key
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    pub fn slot(&self, source: usize) -> Option<&Item> {
        self.slots.get(source).and_then(|s| s.as_ref())
    }

    /// Convert a complete group into an output record.
    pub fn into_record(self, shape: OutputShape, identities: &[SourceIdentity]) -> MergedRecord {
        let (data, pos) = match shape {
            OutputShape::Ordered => (
                Slots::Ordered(self.slots.into_iter().flatten().collect()),
                Slots::Ordered(self.positions.into_iter().flatten().collect()),
            ),
            OutputShape::Named => (
                Slots::Named(labelled(identities, self.slots)),
                Slots::Named(labelled(identities, self.positions)),
            ),
        };

        MergedRecord {
            key: self.key,
            data,
            pos,
        }
    }

    /// Snapshot of the filled slots of an incomplete group.
    pub fn into_partial(self, identities: &[SourceIdentity]) -> PartialGroup {
        PartialGroup {
            key: self.key,
            data: by_identity(identities, self.slots),
            pos: by_identity(identities, self.positions),
        }
    }
}

fn labelled<T>(identities: &[SourceIdentity], values: Vec<Option<T>>) -> Vec<(String, T)> {
    identities
        .iter()
        .zip(values)
        .filter_map(|(identity, value)| value.map(|v| (identity.label(), v)))
        .collect()
}

fn by_identity<T>(
    identities: &[SourceIdentity],
    values: Vec<Option<T>>,
) -> BTreeMap<SourceIdentity, T> {
    identities
        .iter()
        .zip(values)
        .filter_map(|(identity, value)| value.map(|v| (identity.clone(), v)))
        .collect()
}

/// Mapping from join key to its in-progress [`Group`].
#[derive(Debug)]
pub struct JoinTable {
    groups: HashMap<JoinKey, Group>,
    width: usize,
    next_created: u64,
}

impl JoinTable {
    /// A table for `width` sources.
    pub fn new(width: usize) -> Self {
        Self {
            groups: HashMap::new(),
            width,
            next_created: 0,
        }
    }

    /// Put `item` from `source` into the group for `key`.
    ///
    /// Returns the group, already removed from the table, when this item filled its
    /// last missing slot.
    pub fn insert(&mut self, key: JoinKey, source: usize, item: Item, position: u64) -> Option<Group> {
        if source >= self.width {
            return None;
        }

        let width = self.width;
        let next_created = &mut self.next_created;
        let group = self.groups.entry(key.clone()).or_insert_with(|| {
            let created = *next_created;
            *next_created += 1;
            Group::new(key.clone(), width, created)
        });

        group.fill(source, item, position);
        if group.is_complete() {
            self.groups.remove(&key)
        } else {
            None
        }
    }

    pub fn get(&self, key: &JoinKey) -> Option<&Group> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Remove every remaining group, oldest first.
    pub fn drain(&mut self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.drain().map(|(_, g)| g).collect();
        groups.sort_by_key(|g| g.created);
        groups
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
