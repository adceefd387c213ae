// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON Lines file sources: one JSON value per line, blank lines skipped.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::errors::SourceFault;
use crate::sources::{Item, ItemStream};
use crate::traits::InputOpener;

/// A line that is not valid JSON.
#[derive(Error, Debug)]
#[error("{}:{line}: {source}", .path.display())]
pub struct JsonLineError {
    pub path: PathBuf,
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Failure to open a JSON Lines file.
#[derive(Error, Debug)]
#[error("cannot open {}: {source}", .path.display())]
pub struct JsonLinesOpenError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A JSON Lines file opened lazily as a source.
#[derive(Debug, Clone)]
pub struct JsonLinesInput {
    path: PathBuf,
}

impl JsonLinesInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InputOpener for JsonLinesInput {
    async fn open(&self) -> Result<ItemStream, SourceFault> {
        let file = File::open(&self.path).await.map_err(|source| JsonLinesOpenError {
            path: self.path.clone(),
            source,
        })?;
        Ok(json_lines(BufReader::new(file), self.path.clone()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Stream the JSON values of a line-oriented reader.
///
/// The first malformed line or read failure is yielded as a fault and ends the stream.
pub fn json_lines<R>(reader: BufReader<R>, path: PathBuf) -> ItemStream
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let lines = reader.lines();
    stream::unfold(Some((lines, 0usize, path)), |state| async move {
        let (mut lines, mut line_no, path) = match state {
            Some(state) => state,
            None => return None,
        };
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    return match serde_json::from_str::<Item>(&line) {
                        Ok(item) => Some((Ok(item), Some((lines, line_no, path)))),
                        Err(source) => {
                            let fault = SourceFault::from(JsonLineError {
                                path,
                                line: line_no,
                                source,
                            });
                            Some((Err(fault), None))
                        }
                    };
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(SourceFault::from(e)), None)),
            }
        }
    })
    .boxed()
}
