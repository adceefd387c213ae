// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::loader::MergeConfig;
use crate::errors::SourceError;
use crate::sources::{JsonLinesInput, SourceDescriptor, SourceInfo};
use crate::traits::InputOpener;

/// Opens the inputs of a [`MergeConfig`] as merge sources.
///
/// Every input is opened before the merge starts. An input that cannot be opened
/// is reported with the same envelope a failing source would produce, so callers
/// see one error shape whether a file is missing or turns out to be malformed.
///
/// # Examples
///
/// ```no_run
/// use keyed_merge::config::{load_and_validate_config, RuntimeBuilder};
/// use keyed_merge::engine::merge;
///
/// # async fn run() -> anyhow::Result<()> {
/// let cfg = load_and_validate_config("merge.yaml")?;
/// let descriptors = RuntimeBuilder::from_config(&cfg).await?;
/// let outcome = merge(descriptors)?.collect_outcome().await;
/// # Ok(())
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    pub async fn from_config(cfg: &MergeConfig) -> Result<Vec<SourceDescriptor>, SourceError> {
        let openers: Vec<JsonLinesInput> = cfg
            .inputs
            .iter()
            .map(|input| JsonLinesInput::new(input.path.clone()))
            .collect();
        let openers: Vec<&dyn InputOpener> = openers.iter().map(|o| o as &dyn InputOpener).collect();
        Self::open_all(cfg, &openers).await
    }

    /// Open one opener per configured input, in order.
    pub async fn open_all(
        cfg: &MergeConfig,
        openers: &[&dyn InputOpener],
    ) -> Result<Vec<SourceDescriptor>, SourceError> {
        let inputs: Arc<[SourceInfo]> = cfg
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| SourceInfo::new(index, input.name.clone(), &input.key_spec()))
            .collect();

        let mut descriptors = Vec::with_capacity(openers.len());
        for ((index, input), opener) in cfg.inputs.iter().enumerate().zip(openers) {
            tracing::debug!(input = %opener.describe(), index, "Opening input");
            let stream = opener
                .open()
                .await
                .map_err(|fault| SourceError::new(fault, inputs[index].clone(), inputs.clone()))?;

            let mut descriptor = SourceDescriptor::new(stream).with_key(input.key_spec());
            if let Some(name) = &input.name {
                descriptor = descriptor.named(name.clone());
            }
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::InputConfig;
    use crate::engine::merge;
    use crate::key::{JoinKey, KeyField};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn jsonl(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_merges_configured_files() {
        let people = jsonl(&[r#"{"id": 1, "name": "Martin"}"#, r#"{"id": 2, "name": "Nikolai"}"#]);
        let surnames = jsonl(&[r#"[2, "Tesla"]"#, r#"[1, "Heidegger"]"#]);

        let cfg = MergeConfig {
            inputs: vec![
                InputConfig {
                    path: people.path().to_path_buf(),
                    name: Some("people".into()),
                    key: Some(KeyField::from("id")),
                },
                InputConfig {
                    path: surnames.path().to_path_buf(),
                    name: Some("surnames".into()),
                    key: None,
                },
            ],
            fail_on_missing: false,
        };

        let descriptors = RuntimeBuilder::from_config(&cfg).await.unwrap();
        let mut records = merge(descriptors).unwrap().collect_outcome().await.records;
        records.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, JoinKey::Int(1));
        assert_eq!(
            records[0].data.by_name("surnames"),
            Some(&serde_json::json!([1, "Heidegger"]))
        );
    }

    #[tokio::test]
    async fn test_unopenable_input_reports_its_index() {
        let present = jsonl(&["[1]"]);
        let cfg = MergeConfig {
            inputs: vec![
                InputConfig {
                    path: present.path().to_path_buf(),
                    name: None,
                    key: None,
                },
                InputConfig {
                    path: PathBuf::from("/definitely/not/here.jsonl"),
                    name: None,
                    key: None,
                },
            ],
            fail_on_missing: false,
        };

        let error = RuntimeBuilder::from_config(&cfg).await.unwrap_err();
        assert_eq!(error.source_index, 1);
        assert_eq!(error.all_inputs.len(), 2);
        assert!(error.message.contains("/definitely/not/here.jsonl"));
    }
}
