// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Input names follow the same identity rules the merge applies when it binds its
//! sources, so a configuration that validates here never fails to bind later:
//!
//! - a name may not be empty or whitespace
//! - once any input is named, unnamed inputs take their ordinal index (as text) as
//!   their name, and every resulting name must be unique

use crate::config::loader::MergeConfig;
use crate::engine::binding::assign_identities;
use crate::errors::ConfigurationError;

/// Check every input identity of `cfg`. Returns the first problem found, in input
/// order.
pub fn validate_config(cfg: &MergeConfig) -> Result<(), ConfigurationError> {
    let names: Vec<Option<&str>> = cfg.inputs.iter().map(|i| i.name.as_deref()).collect();
    assign_identities(&names).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::InputConfig;
    use std::path::PathBuf;

    fn input(name: Option<&str>) -> InputConfig {
        InputConfig {
            path: PathBuf::from("in.jsonl"),
            name: name.map(str::to_string),
            key: None,
        }
    }

    fn config(names: &[Option<&str>]) -> MergeConfig {
        MergeConfig {
            inputs: names.iter().map(|n| input(*n)).collect(),
            fail_on_missing: false,
        }
    }

    #[test]
    fn test_unnamed_inputs_are_valid() {
        assert!(validate_config(&config(&[None, None, None])).is_ok());
    }

    #[test]
    fn test_distinct_names_are_valid() {
        assert!(validate_config(&config(&[Some("left"), Some("right"), None])).is_ok());
    }

    #[test]
    fn test_duplicate_names_are_reported() {
        let result = validate_config(&config(&[Some("a"), None, Some("a")]));
        match result {
            Err(ConfigurationError::DuplicateSourceName { name, index, first }) => {
                assert_eq!(name, "a");
                assert_eq!(index, 2);
                assert_eq!(first, 0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_name_clashing_with_an_ordinal_is_reported() {
        let result = validate_config(&config(&[None, Some("0")]));
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateSourceName { index: 1, first: 0, .. })
        ));
    }

    #[test]
    fn test_blank_names_are_reported() {
        let result = validate_config(&config(&[Some("ok"), Some("")]));
        assert!(matches!(
            result,
            Err(ConfigurationError::BlankSourceName { index: 1 })
        ));
    }
}
