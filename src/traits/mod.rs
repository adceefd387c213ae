// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod input;
pub mod key_resolver;

pub use input::InputOpener;
pub use key_resolver::KeyResolver;
