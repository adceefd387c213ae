// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The merge state machine.
//!
//! [`MergeEngine`] owns the join table and every counter of one merge. It consumes
//! one [`SourceEvent`] at a time and answers with a [`Step`] telling the driver what
//! to report. It does no I/O of its own, so it can be exercised synchronously.
//!
//! ```text
//! Running ──all sources ended──▶ Finalizing ──End sent──▶ Done
//!    │
//!    ├──source error / key failure──▶ Aborted
//!    └──close()──────────────────────▶ Closed
//! ```
//!
//! Once out of `Running`, every further event is ignored.

use std::sync::Arc;

use crate::engine::binding::{OutputShape, SourceBinding, SourceIdentity};
use crate::engine::join_table::JoinTable;
use crate::engine::record::{MergedRecord, MissingReport};
use crate::errors::{SourceError, SourceFault};
use crate::observability::messages::engine::SourceEnded;
use crate::observability::messages::source::KeyResolutionFailed;
use crate::observability::messages::StructuredLog;
use crate::sources::{Item, SourceInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Running,
    Finalizing,
    Done,
    Aborted,
    Closed,
}

impl MergeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MergeState::Done | MergeState::Aborted | MergeState::Closed)
    }
}

/// What a source reported.
#[derive(Debug)]
pub enum SourceSignal {
    Item(Item),
    End,
    Error(SourceFault),
}

/// A notification from the source at ordinal position `source`.
#[derive(Debug)]
pub struct SourceEvent {
    pub source: usize,
    pub signal: SourceSignal,
}

impl SourceEvent {
    pub fn item(source: usize, item: Item) -> Self {
        Self {
            source,
            signal: SourceSignal::Item(item),
        }
    }

    pub fn end(source: usize) -> Self {
        Self {
            source,
            signal: SourceSignal::End,
        }
    }

    pub fn error(source: usize, fault: SourceFault) -> Self {
        Self {
            source,
            signal: SourceSignal::Error(fault),
        }
    }
}

/// The engine's answer to one event.
#[derive(Debug)]
pub enum Step {
    /// Nothing to report.
    Continue,
    /// A group completed.
    Emit(MergedRecord),
    /// Every source ended; report the missing keys (if any) and then end.
    Finalize(Option<MissingReport>),
    /// A source failed; report the error and then end.
    Abort(SourceError),
}

/// Instance-scoped state of one merge.
pub struct MergeEngine {
    bindings: Vec<SourceBinding>,
    identities: Vec<SourceIdentity>,
    shape: OutputShape,
    inputs: Arc<[SourceInfo]>,
    table: JoinTable,
    positions: Vec<u64>,
    ended: Vec<bool>,
    ended_count: usize,
    emitted: u64,
    state: MergeState,
}

impl MergeEngine {
    pub fn new(bindings: Vec<SourceBinding>, shape: OutputShape, inputs: Arc<[SourceInfo]>) -> Self {
        let width = bindings.len();
        let identities = bindings.iter().map(|b| b.identity.clone()).collect();
        Self {
            bindings,
            identities,
            shape,
            inputs,
            table: JoinTable::new(width),
            positions: vec![0; width],
            ended: vec![false; width],
            ended_count: 0,
            emitted: 0,
            state: MergeState::Running,
        }
    }

    /// Called once before any event. A merge over zero sources finalizes here.
    pub fn begin(&mut self) -> Step {
        if self.state == MergeState::Running && self.bindings.is_empty() {
            self.state = MergeState::Finalizing;
            return Step::Finalize(None);
        }
        Step::Continue
    }

    pub fn on_event(&mut self, event: SourceEvent) -> Step {
        if self.state != MergeState::Running || event.source >= self.bindings.len() {
            return Step::Continue;
        }

        match event.signal {
            SourceSignal::Item(item) => self.on_item(event.source, item),
            SourceSignal::End => self.on_end(event.source),
            SourceSignal::Error(fault) => self.abort(event.source, fault),
        }
    }

    fn on_item(&mut self, source: usize, item: Item) -> Step {
        let position = self.positions[source];
        let key = match self.bindings[source].resolver.resolve(&item, position) {
            Ok(key) => key,
            Err(error) => {
                KeyResolutionFailed {
                    source: &self.bindings[source].info.label(),
                    position,
                    error: &error,
                }
                .log();
                return self.abort(source, SourceFault::from(error));
            }
        };
        self.positions[source] += 1;

        match self.table.insert(key, source, item, position) {
            Some(group) => {
                self.emitted += 1;
                Step::Emit(group.into_record(self.shape, &self.identities))
            }
            None => Step::Continue,
        }
    }

    fn on_end(&mut self, source: usize) -> Step {
        if !self.ended[source] {
            self.ended[source] = true;
            self.ended_count += 1;
        }

        SourceEnded {
            source: &self.bindings[source].info.label(),
            ended: self.ended_count,
            total: self.bindings.len(),
        }
        .log();

        if self.ended_count < self.bindings.len() {
            return Step::Continue;
        }

        self.state = MergeState::Finalizing;
        let remaining: Vec<_> = self
            .table
            .drain()
            .into_iter()
            .map(|group| group.into_partial(&self.identities))
            .collect();

        if remaining.is_empty() {
            Step::Finalize(None)
        } else {
            Step::Finalize(Some(MissingReport::from_groups(remaining)))
        }
    }

    fn abort(&mut self, source: usize, fault: SourceFault) -> Step {
        self.state = MergeState::Aborted;
        self.table.clear();
        let input = self.bindings[source].info.clone();
        Step::Abort(SourceError::new(fault, input, self.inputs.clone()))
    }

    /// Finalization has been reported; the merge is over.
    pub fn complete(&mut self) {
        if self.state == MergeState::Finalizing {
            self.state = MergeState::Done;
        }
    }

    /// Caller-initiated cancellation. Pending groups are discarded unreported.
    pub fn close(&mut self) -> usize {
        if self.state.is_terminal() {
            return 0;
        }
        self.state = MergeState::Closed;
        let pending = self.table.len();
        self.table.clear();
        pending
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    pub fn source_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn source_label(&self, source: usize) -> String {
        self.bindings
            .get(source)
            .map(|b| b.info.label())
            .unwrap_or_else(|| format!("#{}", source))
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn pending_groups(&self) -> usize {
        self.table.len()
    }
}
