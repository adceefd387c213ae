// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::key::rules::ResolverChain;
use crate::sources::Item;
use crate::traits::KeyResolver;

/// A field selector: an object field name or an array position.
///
/// `Name` on an array is accepted when the name is a decimal index, and `Index` on
/// an object looks up the field named by the decimal index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyField {
    Index(usize),
    Name(String),
}

impl KeyField {
    pub fn lookup<'a>(&self, item: &'a Item) -> Option<&'a Value> {
        match (self, item) {
            (KeyField::Name(name), Value::Object(fields)) => fields.get(name),
            (KeyField::Name(name), Value::Array(elements)) => name
                .parse::<usize>()
                .ok()
                .and_then(|index| elements.get(index)),
            (KeyField::Index(index), Value::Array(elements)) => elements.get(*index),
            (KeyField::Index(index), Value::Object(fields)) => fields.get(&index.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyField::Index(index) => write!(f, "{}", index),
            KeyField::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for KeyField {
    fn from(name: &str) -> Self {
        KeyField::Name(name.to_string())
    }
}

impl From<String> for KeyField {
    fn from(name: String) -> Self {
        KeyField::Name(name)
    }
}

impl From<usize> for KeyField {
    fn from(index: usize) -> Self {
        KeyField::Index(index)
    }
}

/// How a source derives join keys.
#[derive(Clone, Default)]
pub enum KeySpec {
    /// First element, `key`, `code`, `id`, then position.
    #[default]
    Default,
    /// A single field, falling back to position when the field is falsy.
    Field(KeyField),
    /// Caller-supplied resolver, used verbatim.
    Custom(Arc<dyn KeyResolver>),
}

impl KeySpec {
    pub fn into_resolver(self) -> Arc<dyn KeyResolver> {
        match self {
            KeySpec::Default => Arc::new(ResolverChain::default_chain()),
            KeySpec::Field(field) => Arc::new(ResolverChain::for_field(field)),
            KeySpec::Custom(resolver) => resolver,
        }
    }

    pub fn descriptor(&self) -> KeyDescriptor {
        match self {
            KeySpec::Default => KeyDescriptor::Default,
            KeySpec::Field(field) => KeyDescriptor::Field(field.clone()),
            KeySpec::Custom(resolver) => KeyDescriptor::Custom(resolver.name()),
        }
    }
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.descriptor(), f)
    }
}

/// Plain-data description of a [`KeySpec`], kept in source snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyDescriptor {
    Default,
    Field(KeyField),
    Custom(&'static str),
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDescriptor::Default => write!(f, "default"),
            KeyDescriptor::Field(field) => write!(f, "field '{}'", field),
            KeyDescriptor::Custom(name) => write!(f, "{} resolver", name),
        }
    }
}
