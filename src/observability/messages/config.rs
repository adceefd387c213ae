// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Configuration file loaded and validated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use keyed_merge::observability::messages::config::ConfigLoaded;
/// use std::path::Path;
///
/// let msg = ConfigLoaded {
///     path: Path::new("merge.yaml"),
///     input_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a Path,
    pub input_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded configuration '{}' with {} inputs",
            self.path.display(),
            self.input_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config",
            span_name = name,
            path = %self.path.display(),
        )
    }
}

/// Configuration rejected before any input was opened.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConfigRejected<'a> {
    pub path: &'a Path,
    pub error: &'a dyn std::error::Error,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration '{}' rejected: {}",
            self.path.display(),
            self.error
        )
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(
            path = %self.path.display(),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            path = %self.path.display(),
        )
    }
}
