// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for merge lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Merge startup and output shape selection
//! * Record emission and source end-of-input
//! * Finalization and missing-key reporting
//! * Abort on source failure and caller cancellation

use crate::key::JoinKey;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Merge started and subscribed to its sources.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use keyed_merge::observability::messages::engine::MergeStarted;
///
/// let msg = MergeStarted {
///     source_count: 3,
///     shape: "named",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct MergeStarted<'a> {
    pub source_count: usize,
    pub shape: &'a str,
}

impl Display for MergeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting merge over {} sources with {} output",
            self.source_count, self.shape
        )
    }
}

impl StructuredLog for MergeStarted<'_> {
    fn log(&self) {
        tracing::info!(
            source_count = self.source_count,
            shape = self.shape,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "merge",
            span_name = name,
            source_count = self.source_count,
            shape = self.shape,
        )
    }
}

/// A group completed and was emitted as a record.
///
/// # Log Level
/// `trace!` - Per-record detail
pub struct RecordEmitted<'a> {
    pub key: &'a JoinKey,
    pub emitted: u64,
}

impl Display for RecordEmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Emitted record for key '{}' ({} so far)", self.key, self.emitted)
    }
}

impl StructuredLog for RecordEmitted<'_> {
    fn log(&self) {
        tracing::trace!(
            key = %self.key,
            emitted = self.emitted,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "record_emitted",
            span_name = name,
            key = %self.key,
        )
    }
}

/// A source signalled end of input.
///
/// # Log Level
/// `debug!` - Progress detail
///
/// # Example
/// ```
/// use keyed_merge::observability::messages::engine::SourceEnded;
///
/// let msg = SourceEnded {
///     source: "orders",
///     ended: 1,
///     total: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct SourceEnded<'a> {
    pub source: &'a str,
    pub ended: usize,
    pub total: usize,
}

impl Display for SourceEnded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Source '{}' ended ({}/{} sources done)",
            self.source, self.ended, self.total
        )
    }
}

impl StructuredLog for SourceEnded<'_> {
    fn log(&self) {
        tracing::debug!(
            source = self.source,
            ended = self.ended,
            total = self.total,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "source_ended",
            span_name = name,
            source = self.source,
        )
    }
}

/// Keys that never aligned across all sources were found at end of input.
///
/// # Log Level
/// `warn!` - Data quality signal
pub struct MissingKeysReported {
    pub missing: usize,
}

impl Display for MissingKeysReported {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} keys did not align across all sources by end of input",
            self.missing
        )
    }
}

impl StructuredLog for MissingKeysReported {
    fn log(&self) {
        tracing::warn!(missing = self.missing, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("missing_keys", span_name = name, missing = self.missing)
    }
}

/// Every source ended and the merge completed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use keyed_merge::observability::messages::engine::MergeFinalized;
/// use std::time::Duration;
///
/// let msg = MergeFinalized {
///     emitted: 10,
///     missing: 2,
///     duration: Duration::from_millis(40),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct MergeFinalized {
    pub emitted: u64,
    pub missing: usize,
    pub duration: std::time::Duration,
}

impl Display for MergeFinalized {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Merge completed: {} records, {} missing keys in {:?}",
            self.emitted, self.missing, self.duration
        )
    }
}

impl StructuredLog for MergeFinalized {
    fn log(&self) {
        tracing::info!(
            emitted = self.emitted,
            missing = self.missing,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "merge_finalized",
            span_name = name,
            emitted = self.emitted,
            missing = self.missing,
            duration = ?self.duration,
        )
    }
}

/// A source failed and the merge aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use keyed_merge::observability::messages::engine::MergeAborted;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
/// let msg = MergeAborted {
///     source: "orders",
///     source_index: 1,
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct MergeAborted<'a> {
    pub source: &'a str,
    pub source_index: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for MergeAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Merge aborted by source '{}' (input #{}): {}",
            self.source, self.source_index, self.error
        )
    }
}

impl StructuredLog for MergeAborted<'_> {
    fn log(&self) {
        tracing::error!(
            source = self.source,
            source_index = self.source_index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "merge_aborted",
            span_name = name,
            source = self.source,
            source_index = self.source_index,
            error = %self.error,
        )
    }
}

/// The caller closed the merge before it finished.
///
/// # Log Level
/// `debug!` - Caller-initiated, not a failure
pub struct MergeClosed {
    pub pending_groups: usize,
}

impl Display for MergeClosed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Merge closed by caller, discarding {} pending groups",
            self.pending_groups
        )
    }
}

impl StructuredLog for MergeClosed {
    fn log(&self) {
        tracing::debug!(pending_groups = self.pending_groups, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "merge_closed",
            span_name = name,
            pending_groups = self.pending_groups,
        )
    }
}
