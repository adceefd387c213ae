// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure to derive a join key from an item.
///
/// A resolver failure is fatal to the source that produced the item, so this
/// error ends up as the cause of a [`SourceError`](crate::errors::SourceError).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyResolutionError {
    /// The selected value is an object or array.
    #[error("key value must be a scalar, found {found}")]
    NotScalar { found: &'static str },

    /// A caller-supplied resolver rejected the item.
    #[error("key resolver failed: {0}")]
    Rejected(String),
}

impl KeyResolutionError {
    pub fn rejected(message: impl Into<String>) -> Self {
        KeyResolutionError::Rejected(message.into())
    }
}
