// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::SourceFault;
use crate::sources::ItemStream;

/// Something that can be opened into a source stream, such as a file on disk.
///
/// Opening happens before the merge is set up; once a stream is handed to the
/// merge, later failures travel through the stream itself.
#[async_trait]
pub trait InputOpener: Send + Sync {
    async fn open(&self) -> Result<ItemStream, SourceFault>;

    /// Human-readable description of the input, for logs.
    fn describe(&self) -> String;
}
