// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for its human-readable text and
//! [`StructuredLog`] to emit itself with structured fields at its own level.
//!
//! # Organization
//!
//! * `engine` - merge lifecycle events
//! * `source` - subscription and key resolution events
//! * `config` - configuration loading events

use std::fmt::Display;
use tracing::Span;

pub mod config;
pub mod engine;
pub mod source;

/// A message that knows its log level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
