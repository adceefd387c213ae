// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keyed_merge::config::consts::DEFAULT_LOG_FILTER;
use keyed_merge::config::{load_and_validate_config, RuntimeBuilder};
use keyed_merge::engine::{merge, MergeEvent};
use keyed_merge::observability::messages::config::{ConfigLoaded, ConfigRejected};
use keyed_merge::observability::messages::StructuredLog;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml|config.toml>", args[0]);
        eprintln!("Example: {} demos/configs/people.yaml", args[0]);
        std::process::exit(2);
    }

    let path = Path::new(&args[1]);
    let cfg = match load_and_validate_config(path) {
        Ok(cfg) => cfg,
        Err(error) => {
            ConfigRejected {
                path,
                error: &error,
            }
            .log();
            return Err(error.into());
        }
    };
    ConfigLoaded {
        path,
        input_count: cfg.inputs.len(),
    }
    .log();

    let descriptors = RuntimeBuilder::from_config(&cfg)
        .await
        .context("failed to open inputs")?;
    let mut handle = merge(descriptors)?;

    // Records go to stdout as JSON lines; everything else goes to stderr.
    let mut out = BufWriter::new(io::stdout().lock());
    let mut missing = None;
    let mut failure = None;

    while let Some(event) = handle.next_event().await {
        match event {
            MergeEvent::Record(record) => {
                serde_json::to_writer(&mut out, &record)?;
                writeln!(out)?;
            }
            MergeEvent::Missing(report) => {
                eprintln!(
                    "{} key(s) never aligned: {}",
                    report.len(),
                    serde_json::to_string(&report.keys)?
                );
                for key in &report.keys {
                    if let Some(group) = report.groups.get(key) {
                        eprintln!("  {}", serde_json::to_string(group)?);
                    }
                }
                missing = Some(report);
            }
            MergeEvent::Error(error) => failure = Some(error),
            MergeEvent::End => break,
        }
    }
    out.flush()?;

    if let Some(error) = failure {
        return Err(anyhow::Error::new(error).context("merge aborted"));
    }
    if let Some(report) = missing {
        if cfg.fail_on_missing {
            bail!("{} key(s) never aligned across all inputs", report.len());
        }
    }

    Ok(())
}
