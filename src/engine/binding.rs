// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turning caller-supplied descriptors into immutable per-source bindings.
//!
//! Binding runs synchronously before anything is subscribed. It fixes each source's
//! identity token, its key resolver, and the output shape of the whole merge:
//!
//! * no source named: records carry ordered sequences indexed by source position
//! * any source named: records carry mappings keyed by identity, where unnamed
//!   sources use their ordinal index (as text) as their name

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::ConfigurationError;
use crate::sources::{ItemStream, SourceDescriptor, SourceInfo};
use crate::traits::KeyResolver;

/// Identity token of a source inside groups and records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum SourceIdentity {
    Index(usize),
    Name(String),
}

impl SourceIdentity {
    pub fn label(&self) -> String {
        match self {
            SourceIdentity::Index(index) => index.to_string(),
            SourceIdentity::Name(name) => name.clone(),
        }
    }
}

impl fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceIdentity::Index(index) => write!(f, "#{}", index),
            SourceIdentity::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Representation of per-source data in emitted records, fixed at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    Ordered,
    Named,
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputShape::Ordered => write!(f, "ordered"),
            OutputShape::Named => write!(f, "named"),
        }
    }
}

/// Immutable per-source configuration used by the engine.
pub struct SourceBinding {
    pub identity: SourceIdentity,
    pub resolver: Arc<dyn KeyResolver>,
    pub info: SourceInfo,
}

impl fmt::Debug for SourceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBinding")
            .field("identity", &self.identity)
            .field("resolver", &self.resolver.name())
            .field("info", &self.info)
            .finish()
    }
}

/// Everything needed to start a merge: bindings, shape and the source streams.
pub struct MergePlan {
    bindings: Vec<SourceBinding>,
    shape: OutputShape,
    inputs: Arc<[SourceInfo]>,
    streams: Vec<ItemStream>,
}

/// Fix the output shape and every source's identity from the optional names, in
/// input order. Blank names and duplicate identities are rejected.
pub fn assign_identities(
    names: &[Option<&str>],
) -> Result<(OutputShape, Vec<SourceIdentity>), ConfigurationError> {
    let shape = if names.iter().any(Option::is_some) {
        OutputShape::Named
    } else {
        OutputShape::Ordered
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut identities = Vec::with_capacity(names.len());

    for (index, name) in names.iter().enumerate() {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(ConfigurationError::BlankSourceName { index });
            }
        }

        let identity = match shape {
            OutputShape::Ordered => SourceIdentity::Index(index),
            OutputShape::Named => SourceIdentity::Name(
                name.map(str::to_string).unwrap_or_else(|| index.to_string()),
            ),
        };

        if let Some(first) = seen.insert(identity.label(), index) {
            return Err(ConfigurationError::DuplicateSourceName {
                name: identity.label(),
                index,
                first,
            });
        }
        identities.push(identity);
    }

    Ok((shape, identities))
}

impl MergePlan {
    /// Bind every descriptor, rejecting blank or duplicate identities.
    pub fn bind(descriptors: Vec<SourceDescriptor>) -> Result<Self, ConfigurationError> {
        let names: Vec<Option<&str>> = descriptors.iter().map(SourceDescriptor::name).collect();
        let (shape, identities) = assign_identities(&names)?;

        let mut bindings = Vec::with_capacity(descriptors.len());
        let mut streams = Vec::with_capacity(descriptors.len());

        for (index, (descriptor, identity)) in descriptors.into_iter().zip(identities).enumerate() {
            let info = SourceInfo::new(index, descriptor.name.clone(), &descriptor.key);
            bindings.push(SourceBinding {
                identity,
                resolver: descriptor.key.into_resolver(),
                info,
            });
            streams.push(descriptor.source);
        }

        let inputs: Arc<[SourceInfo]> = bindings.iter().map(|b| b.info.clone()).collect();

        Ok(Self {
            bindings,
            shape,
            inputs,
            streams,
        })
    }

    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    pub fn source_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn bindings(&self) -> &[SourceBinding] {
        &self.bindings
    }

    pub fn inputs(&self) -> &Arc<[SourceInfo]> {
        &self.inputs
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Vec<SourceBinding>, OutputShape, Arc<[SourceInfo]>, Vec<ItemStream>) {
        (self.bindings, self.shape, self.inputs, self.streams)
    }
}
