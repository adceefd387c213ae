// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Join keys and how sources derive them.

mod join_key;
mod rules;
mod spec;

pub use join_key::{is_falsy, JoinKey};
pub use rules::{KeyRule, ResolverChain};
pub use spec::{KeyDescriptor, KeyField, KeySpec};
