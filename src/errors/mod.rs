// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod key;
mod source;

pub use config::ConfigurationError;
pub use key::KeyResolutionError;
pub use source::{SourceError, SourceFault};
