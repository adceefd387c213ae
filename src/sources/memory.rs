// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use futures::channel::mpsc;
use futures::stream::{self, StreamExt};

use crate::errors::SourceFault;
use crate::sources::{Item, ItemStream};

/// Source that yields the given items and then ends.
pub fn from_items<I>(items: I) -> ItemStream
where
    I: IntoIterator<Item = Item>,
    I::IntoIter: Send + 'static,
{
    stream::iter(items.into_iter().map(Ok)).boxed()
}

/// Source that replays a fixed script of items and faults.
pub fn from_results(events: Vec<Result<Item, SourceFault>>) -> ItemStream {
    stream::iter(events).boxed()
}

/// Source that fails immediately.
pub fn failing(fault: SourceFault) -> ItemStream {
    stream::once(async move { Err::<Item, SourceFault>(fault) }).boxed()
}

/// Source that never yields and never ends.
pub fn pending() -> ItemStream {
    stream::pending::<Result<Item, SourceFault>>().boxed()
}

/// Push-driven source: the returned sender feeds the returned stream.
///
/// Dropping the sender (or calling [`SourceSender::end`]) ends the source.
pub fn channel() -> (SourceSender, ItemStream) {
    let (tx, rx) = mpsc::unbounded();
    (SourceSender { tx }, rx.boxed())
}

/// Producer half of [`channel`].
#[derive(Debug, Clone)]
pub struct SourceSender {
    tx: mpsc::UnboundedSender<Result<Item, SourceFault>>,
}

impl SourceSender {
    /// Returns `false` once the merge has let go of the source.
    pub fn push(&self, item: Item) -> bool {
        self.tx.unbounded_send(Ok(item)).is_ok()
    }

    pub fn fail(&self, fault: SourceFault) -> bool {
        self.tx.unbounded_send(Err(fault)).is_ok()
    }

    pub fn end(self) {
        self.tx.close_channel();
    }

    /// Whether the consuming side has been dropped.
    pub fn is_detached(&self) -> bool {
        self.tx.is_closed()
    }
}
