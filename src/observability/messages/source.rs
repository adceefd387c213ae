// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-source events.

use crate::errors::KeyResolutionError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A source's subscription was torn down.
///
/// # Log Level
/// `trace!`
pub struct SubscriptionDetached<'a> {
    pub source: &'a str,
    pub reason: &'a str,
}

impl Display for SubscriptionDetached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Detached source '{}' ({})", self.source, self.reason)
    }
}

impl StructuredLog for SubscriptionDetached<'_> {
    fn log(&self) {
        tracing::trace!(source = self.source, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("subscription", span_name = name, source = self.source)
    }
}

/// A key resolver rejected an item; the source is treated as failed.
///
/// # Log Level
/// `warn!` - the abort itself is logged separately at `error!`
pub struct KeyResolutionFailed<'a> {
    pub source: &'a str,
    pub position: u64,
    pub error: &'a KeyResolutionError,
}

impl Display for KeyResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Source '{}' item #{} has no usable key: {}",
            self.source, self.position, self.error
        )
    }
}

impl StructuredLog for KeyResolutionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            source = self.source,
            position = self.position,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "key_resolution",
            span_name = name,
            source = self.source,
            position = self.position,
        )
    }
}
