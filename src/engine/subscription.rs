// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One listener task per source, feeding a single merge queue.
//!
//! Each task forwards its source's items, end and error into an unbounded channel
//! read by the merge driver, which is the only place the join table is touched.
//! A task stops after forwarding its source's end or first error, or as soon as its
//! cancellation token fires. Stopping drops the source stream.
//!
//! Detaching is guarded: each source's [`Subscription`] lives in an `Option` slot
//! that is taken on first detach, so every subscription is torn down exactly once
//! no matter how many teardown paths run.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::merge::SourceEvent;
use crate::observability::messages::source::SubscriptionDetached;
use crate::observability::messages::StructuredLog;
use crate::sources::ItemStream;

/// Why subscriptions are being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Finalized,
    Aborted,
    Closed,
}

impl Teardown {
    fn as_str(self) -> &'static str {
        match self {
            Teardown::Finalized => "finalized",
            Teardown::Aborted => "aborted",
            Teardown::Closed => "closed",
        }
    }
}

/// A running listener task for one source.
pub struct Subscription {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Spawn the listener for `stream`, tagging its events with `source`.
    pub fn spawn(
        source: usize,
        mut stream: ItemStream,
        queue: mpsc::UnboundedSender<SourceEvent>,
        token: CancellationToken,
    ) -> Self {
        let cancelled = token.clone();
        let task = tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    next = stream.next() => next,
                };

                match next {
                    Some(Ok(item)) => {
                        if queue.send(SourceEvent::item(source, item)).is_err() {
                            break;
                        }
                    }
                    Some(Err(fault)) => {
                        let _ = queue.send(SourceEvent::error(source, fault));
                        break;
                    }
                    None => {
                        let _ = queue.send(SourceEvent::end(source));
                        break;
                    }
                }
            }
        });

        Self { token, task }
    }

    fn detach(self) -> JoinHandle<()> {
        self.token.cancel();
        self.task
    }
}

/// Subscription slots of one merge, indexed by source.
pub struct Subscriptions {
    slots: Vec<Option<Subscription>>,
    labels: Vec<String>,
}

impl Subscriptions {
    /// Subscribe to every stream. Each listener gets a child of `parent`, so
    /// cancelling `parent` stops them all.
    pub fn spawn_all(
        streams: Vec<ItemStream>,
        labels: Vec<String>,
        queue: mpsc::UnboundedSender<SourceEvent>,
        parent: &CancellationToken,
    ) -> Self {
        let slots = streams
            .into_iter()
            .enumerate()
            .map(|(source, stream)| {
                Some(Subscription::spawn(
                    source,
                    stream,
                    queue.clone(),
                    parent.child_token(),
                ))
            })
            .collect();

        Self { slots, labels }
    }

    /// Detach one source. Returns `None` if it was already detached.
    pub fn detach(&mut self, source: usize, reason: Teardown) -> Option<JoinHandle<()>> {
        let subscription = self.slots.get_mut(source)?.take()?;
        SubscriptionDetached {
            source: self.labels.get(source).map(String::as_str).unwrap_or("?"),
            reason: reason.as_str(),
        }
        .log();
        Some(subscription.detach())
    }

    /// Detach every remaining source, `first` ahead of the others.
    pub fn detach_all(&mut self, first: Option<usize>, reason: Teardown) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(handle) = first.and_then(|source| self.detach(source, reason)) {
            handles.push(handle);
        }
        for source in 0..self.slots.len() {
            if let Some(handle) = self.detach(source, reason) {
                handles.push(handle);
            }
        }
        handles
    }

    /// Detach every remaining source and wait until each listener has dropped its
    /// stream.
    pub async fn release_all(&mut self, first: Option<usize>, reason: Teardown) {
        for handle in self.detach_all(first, reason) {
            let _ = handle.await;
        }
    }

    pub fn active(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
