// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Source descriptors and ready-made sources.
//!
//! A source is any `Stream<Item = Result<Item, SourceFault>>`: each `Ok` is an item,
//! an `Err` is the source's (fatal) error signal, and exhaustion is its end signal.
//! The helpers here cover in-memory lists, push-driven channels and JSON Lines files.

pub mod jsonl;
pub mod memory;

use futures::stream::{BoxStream, Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{KeyResolutionError, SourceFault};
use crate::key::{JoinKey, KeyDescriptor, KeyField, KeySpec};
use crate::traits::KeyResolver;

pub use jsonl::{JsonLineError, JsonLinesInput};
pub use memory::{channel, failing, from_items, from_results, pending, SourceSender};

/// Items are opaque JSON values, inspected only by key resolvers.
pub type Item = serde_json::Value;

/// Boxed source stream as consumed by the merge.
pub type ItemStream = BoxStream<'static, Result<Item, SourceFault>>;

/// Caller-supplied description of one merge input.
pub struct SourceDescriptor {
    pub(crate) source: ItemStream,
    pub(crate) name: Option<String>,
    pub(crate) key: KeySpec,
}

impl SourceDescriptor {
    pub fn new<S>(source: S) -> Self
    where
        S: Stream<Item = Result<Item, SourceFault>> + Send + 'static,
    {
        Self {
            source: source.boxed(),
            name: None,
            key: KeySpec::Default,
        }
    }

    /// Give the source an explicit identity. Naming any source switches the merge
    /// output from ordered sequences to name-keyed mappings.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Key items by a field name or array index.
    pub fn keyed_by(mut self, field: impl Into<KeyField>) -> Self {
        self.key = KeySpec::Field(field.into());
        self
    }

    /// Key items with a function of `(item, position_in_source)`.
    pub fn keyed_with<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Item, u64) -> Result<JoinKey, KeyResolutionError> + Send + Sync + 'static,
    {
        self.key = KeySpec::Custom(Arc::new(resolver));
        self
    }

    pub fn resolved_by(mut self, resolver: Arc<dyn KeyResolver>) -> Self {
        self.key = KeySpec::Custom(resolver);
        self
    }

    pub fn with_key(mut self, key: KeySpec) -> Self {
        self.key = key;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn key(&self) -> &KeySpec {
        &self.key
    }
}

impl std::fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Snapshot of a [`SourceDescriptor`] without its stream.
///
/// The stream is consumed by the merge; this is what error envelopes carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceInfo {
    pub index: usize,
    pub name: Option<String>,
    pub key: KeyDescriptor,
}

impl SourceInfo {
    pub fn new(index: usize, name: Option<String>, key: &KeySpec) -> Self {
        Self {
            index,
            name,
            key: key.descriptor(),
        }
    }

    /// Label used in logs: the name when present, otherwise `#index`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.index),
        }
    }
}
