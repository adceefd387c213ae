// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for the diagnostic and operational
//! logging of a merge. Message types follow a struct-based pattern with a `Display`
//! implementation so log text lives in one place instead of being scattered through
//! the engine as format strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - merge lifecycle: start, records, finalization, abort, close
//! * `messages::source` - per-source subscription and key resolution events
//! * `messages::config` - configuration loading for the command-line runner
//!
//! # Usage
//!
//! ```rust
//! use keyed_merge::observability::messages::engine::MergeStarted;
//! use keyed_merge::observability::messages::StructuredLog;
//!
//! let msg = MergeStarted {
//!     source_count: 2,
//!     shape: "ordered",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
