// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // file-backed merge configuration
pub mod engine;     // keyed merge engine and handle
pub mod errors;     // error handling
pub mod key;        // join keys and resolvers
pub mod observability;
pub mod sources;    // source descriptors and ready-made sources
pub mod traits;     // unified abstractions
