// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Prioritized key resolution.
//!
//! A [`ResolverChain`] walks its [`KeyRule`]s in order. The first rule that applies
//! to an item decides its key; when none applies, the item's position within its
//! source becomes the key.
//!
//! The default chain is:
//!
//! 1. first element of an array item
//! 2. field `key`
//! 3. field `code`
//! 4. field `id`
//! 5. position
//!
//! A source keyed by an explicit field uses `[field] -> position` instead.

use crate::config::consts::DEFAULT_KEY_FIELDS;
use crate::errors::KeyResolutionError;
use crate::key::join_key::{is_falsy, JoinKey};
use crate::key::spec::KeyField;
use crate::sources::Item;
use crate::traits::KeyResolver;

/// One step of a [`ResolverChain`].
#[derive(Debug, Clone, PartialEq)]
pub enum KeyRule {
    /// Applies to every array. The first element is used even when falsy or null;
    /// an empty array is keyed as [`JoinKey::Absent`].
    FirstElement,
    /// Applies when the field exists and is not falsy.
    Field(KeyField),
}

impl KeyRule {
    /// `None` means the rule does not apply and the next one should be tried.
    pub fn apply(&self, item: &Item) -> Option<Result<JoinKey, KeyResolutionError>> {
        match self {
            KeyRule::FirstElement => item.as_array().map(|elements| match elements.first() {
                Some(first) => JoinKey::from_value(first),
                None => Ok(JoinKey::Absent),
            }),
            KeyRule::Field(field) => field
                .lookup(item)
                .filter(|value| !is_falsy(value))
                .map(JoinKey::from_value),
        }
    }
}

/// Ordered list of [`KeyRule`]s with a positional fallback.
#[derive(Debug, Clone)]
pub struct ResolverChain {
    rules: Vec<KeyRule>,
    label: &'static str,
}

impl ResolverChain {
    pub fn new(rules: Vec<KeyRule>) -> Self {
        Self {
            rules,
            label: "chain",
        }
    }

    /// First element, then `key`, `code`, `id`, then position.
    pub fn default_chain() -> Self {
        let mut rules = vec![KeyRule::FirstElement];
        rules.extend(
            DEFAULT_KEY_FIELDS
                .iter()
                .map(|name| KeyRule::Field(KeyField::from(*name))),
        );
        Self {
            rules,
            label: "default",
        }
    }

    /// The named field, then position.
    pub fn for_field(field: KeyField) -> Self {
        Self {
            rules: vec![KeyRule::Field(field)],
            label: "field",
        }
    }

    pub fn rules(&self) -> &[KeyRule] {
        &self.rules
    }
}

impl KeyResolver for ResolverChain {
    fn resolve(&self, item: &Item, position: u64) -> Result<JoinKey, KeyResolutionError> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(item))
            .unwrap_or_else(|| Ok(JoinKey::position(position)))
    }

    fn name(&self) -> &'static str {
        self.label
    }
}
