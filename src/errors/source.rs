// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Source failures and the envelope a merge reports them in.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::consts::NULL_ERROR_MESSAGE;
use crate::sources::SourceInfo;

/// Shared, clonable error cause.
pub type SharedError = Arc<dyn Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
#[error("{0}")]
struct FaultMessage(String);

/// A failure reported by a source stream.
///
/// The cause is optional: a source may fail without saying why, in which case the
/// merge reports [`NULL_ERROR_MESSAGE`].
#[derive(Debug, Clone, Default)]
pub struct SourceFault {
    cause: Option<SharedError>,
}

impl SourceFault {
    /// A fault with no cause at all.
    pub fn null() -> Self {
        Self { cause: None }
    }

    /// A fault whose cause is a bare message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            cause: Some(Arc::new(FaultMessage(message.into()))),
        }
    }

    pub fn cause(&self) -> Option<&SharedError> {
        self.cause.as_ref()
    }

    pub fn into_cause(self) -> Option<SharedError> {
        self.cause
    }
}

impl<E> From<E> for SourceFault
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            cause: Some(Arc::new(error)),
        }
    }
}

/// Envelope describing the source failure that aborted a merge.
///
/// Carries the original cause, a snapshot of the failing source's descriptor, its
/// ordinal position among all inputs, and the snapshots of every input.
#[derive(Debug, Clone)]
pub struct SourceError {
    pub message: String,
    pub cause: Option<SharedError>,
    pub input: SourceInfo,
    pub source_index: usize,
    pub all_inputs: Arc<[SourceInfo]>,
}

impl SourceError {
    pub fn new(fault: SourceFault, input: SourceInfo, all_inputs: Arc<[SourceInfo]>) -> Self {
        let cause = fault.into_cause();
        let message = cause
            .as_ref()
            .map(|c| c.to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NULL_ERROR_MESSAGE.to_string());

        Self {
            message,
            cause,
            source_index: input.index,
            input,
            all_inputs,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[SourceError input#{} message: {}]",
            self.source_index, self.message
        )
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}
