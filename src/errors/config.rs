// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Setup-time errors.
//!
//! These are raised synchronously, before any source is subscribed, and are never
//! delivered through a merge's event channel.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A source was given a name that is empty or only whitespace.
    #[error("source #{index} has a blank name")]
    BlankSourceName { index: usize },

    /// Two sources resolve to the same identity token.
    #[error("source #{index} reuses the identity '{name}' of source #{first}")]
    DuplicateSourceName {
        name: String,
        index: usize,
        first: usize,
    },

    /// A config file lists no inputs.
    #[error("configuration '{}' defines no inputs", .path.display())]
    NoInputs { path: PathBuf },

    /// The config file extension is not one we can parse.
    #[error("unsupported configuration format '{}': expected .yaml, .yml or .toml", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
