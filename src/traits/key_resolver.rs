// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::KeyResolutionError;
use crate::key::JoinKey;
use crate::sources::Item;

/// Derives the join key of an item from the item and its position in its source.
///
/// Resolution must be deterministic for a given `(item, position)`. Returning an
/// error aborts the whole merge, attributed to the source the item came from.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, item: &Item, position: u64) -> Result<JoinKey, KeyResolutionError>;

    /// Short label used in logs and source snapshots.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> KeyResolver for F
where
    F: Fn(&Item, u64) -> Result<JoinKey, KeyResolutionError> + Send + Sync,
{
    fn resolve(&self, item: &Item, position: u64) -> Result<JoinKey, KeyResolutionError> {
        self(item, position)
    }
}
