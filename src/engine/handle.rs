// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Running a merge and reading its events.
//!
//! [`merge`] binds the inputs, subscribes to every source and returns a
//! [`MergeHandle`]. A single driver task owns the [`MergeEngine`]: it takes source
//! events off one queue in arrival order, so join-table updates never overlap.
//!
//! Teardown paths:
//! - **finalize**: every source ended; listeners are released, then `Missing` (if
//!   any keys never aligned) and `End` are sent
//! - **abort**: a source failed; the failing listener is released first, then the
//!   rest, then `Error` and `End` are sent. Events other sources had already queued
//!   are dropped with the queue and never reported
//! - **close**: the caller cancelled; listeners are cancelled and nothing more is sent

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::binding::{MergePlan, OutputShape};
use crate::engine::merge::{MergeEngine, SourceEvent, Step};
use crate::engine::record::{MergeEvent, MergedRecord, MissingReport};
use crate::engine::subscription::{Subscriptions, Teardown};
use crate::errors::{ConfigurationError, SourceError};
use crate::observability::messages::engine::{
    MergeAborted, MergeClosed, MergeFinalized, MergeStarted, MissingKeysReported, RecordEmitted,
};
use crate::observability::messages::StructuredLog;
use crate::sources::SourceDescriptor;

/// Merge `inputs` by join key.
///
/// Configuration problems are returned here, before any source is touched. All
/// other outcomes arrive through the returned handle.
///
/// # Panics
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```
/// use keyed_merge::engine::{merge, MergeEvent};
/// use keyed_merge::sources::{from_items, SourceDescriptor};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut handle = merge(vec![
///     SourceDescriptor::new(from_items(vec![json!(["1", "Martin"])])),
///     SourceDescriptor::new(from_items(vec![json!(["1", "Heidegger"])])),
/// ])
/// .unwrap();
///
/// let outcome = handle.collect_outcome().await;
/// assert_eq!(outcome.records.len(), 1);
/// assert!(outcome.ended);
/// # }
/// ```
pub fn merge(inputs: Vec<SourceDescriptor>) -> Result<MergeHandle, ConfigurationError> {
    let plan = MergePlan::bind(inputs)?;
    Ok(MergeHandle::spawn(plan))
}

/// Caller's side of a running merge.
///
/// Dropping the handle closes the merge.
pub struct MergeHandle {
    events: mpsc::UnboundedReceiver<MergeEvent>,
    cancel: CancellationToken,
    shape: OutputShape,
    closed: bool,
}

impl MergeHandle {
    /// Start the driver for an already-bound plan.
    pub fn spawn(plan: MergePlan) -> Self {
        let (output, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let shape = plan.shape();

        let shape_label = shape.to_string();
        let span = MergeStarted {
            source_count: plan.source_count(),
            shape: &shape_label,
        }
        .span("merge");

        let driver = MergeDriver::new(plan, output, cancel.clone());
        tokio::spawn(driver.run().instrument(span));

        Self {
            events,
            cancel,
            shape,
            closed: false,
        }
    }

    /// Next event, or `None` once the merge is over (after `End`) or closed.
    pub async fn next_event(&mut self) -> Option<MergeEvent> {
        if self.closed {
            return None;
        }
        self.events.recv().await
    }

    /// Next completed record, skipping nothing: returns `None` at the first
    /// non-record event.
    pub async fn next_record(&mut self) -> Option<MergedRecord> {
        self.next_event().await.and_then(MergeEvent::into_record)
    }

    /// Cancel the merge without reporting anything further. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.events.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    /// Drain every event into a [`MergeOutcome`].
    pub async fn collect_outcome(&mut self) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        while let Some(event) = self.next_event().await {
            match event {
                MergeEvent::Record(record) => outcome.records.push(record),
                MergeEvent::Missing(report) => outcome.missing = Some(report),
                MergeEvent::Error(error) => outcome.error = Some(error),
                MergeEvent::End => {
                    outcome.ended = true;
                    break;
                }
            }
        }
        outcome
    }
}

impl Drop for MergeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Stream for MergeHandle {
    type Item = MergeEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(None);
        }
        this.events.poll_recv(cx)
    }
}

/// Everything a finished merge reported.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub records: Vec<MergedRecord>,
    pub missing: Option<MissingReport>,
    pub error: Option<SourceError>,
    /// Whether `End` was received (false only for a closed merge).
    pub ended: bool,
}

impl MergeOutcome {
    pub fn into_result(self) -> Result<(Vec<MergedRecord>, Option<MissingReport>), SourceError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok((self.records, self.missing)),
        }
    }
}

struct MergeDriver {
    engine: MergeEngine,
    subscriptions: Subscriptions,
    queue: mpsc::UnboundedReceiver<SourceEvent>,
    output: mpsc::UnboundedSender<MergeEvent>,
    cancel: CancellationToken,
    started: Instant,
}

impl MergeDriver {
    fn new(
        plan: MergePlan,
        output: mpsc::UnboundedSender<MergeEvent>,
        cancel: CancellationToken,
    ) -> Self {
        let (bindings, shape, inputs, streams) = plan.into_parts();
        let labels = bindings.iter().map(|b| b.info.label()).collect();
        let (queue_tx, queue) = mpsc::unbounded_channel();

        let subscriptions = Subscriptions::spawn_all(streams, labels, queue_tx, &cancel);
        let engine = MergeEngine::new(bindings, shape, inputs);

        Self {
            engine,
            subscriptions,
            queue,
            output,
            cancel,
            started: Instant::now(),
        }
    }

    async fn run(mut self) {
        MergeStarted {
            source_count: self.engine.source_count(),
            shape: &self.engine.shape().to_string(),
        }
        .log();

        if let Step::Finalize(missing) = self.engine.begin() {
            self.finalize(missing).await;
            return;
        }

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                event = self.queue.recv() => event,
            };

            let Some(event) = event else {
                self.shut_down();
                return;
            };

            match self.engine.on_event(event) {
                Step::Continue => {}
                Step::Emit(record) => {
                    RecordEmitted {
                        key: &record.key,
                        emitted: self.engine.emitted(),
                    }
                    .log();
                    if self.output.send(MergeEvent::Record(record)).is_err() {
                        self.shut_down();
                        return;
                    }
                }
                Step::Finalize(missing) => {
                    self.finalize(missing).await;
                    return;
                }
                Step::Abort(error) => {
                    self.abort(error).await;
                    return;
                }
            }
        }
    }

    async fn finalize(&mut self, missing: Option<MissingReport>) {
        self.subscriptions.release_all(None, Teardown::Finalized).await;

        let missing_count = missing.as_ref().map(MissingReport::len).unwrap_or(0);
        if let Some(report) = missing {
            MissingKeysReported {
                missing: report.len(),
            }
            .log();
            let _ = self.output.send(MergeEvent::Missing(report));
        }
        let _ = self.output.send(MergeEvent::End);
        self.engine.complete();

        MergeFinalized {
            emitted: self.engine.emitted(),
            missing: missing_count,
            duration: self.started.elapsed(),
        }
        .log();
    }

    async fn abort(&mut self, error: SourceError) {
        self.subscriptions
            .release_all(Some(error.source_index), Teardown::Aborted)
            .await;
        self.queue.close();

        MergeAborted {
            source: &self.engine.source_label(error.source_index),
            source_index: error.source_index,
            error: &error,
        }
        .log();

        let _ = self.output.send(MergeEvent::Error(error));
        let _ = self.output.send(MergeEvent::End);
    }

    fn shut_down(&mut self) {
        let pending_groups = self.engine.close();
        self.subscriptions.detach_all(None, Teardown::Closed);
        MergeClosed { pending_groups }.log();
    }
}
