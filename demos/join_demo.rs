use serde_json::json;
use std::env;
use std::time::Duration;

use keyed_merge::config::{load_and_validate_config, RuntimeBuilder};
use keyed_merge::engine::{merge, MergeEvent};
use keyed_merge::errors::SourceFault;
use keyed_merge::sources::{channel, from_items, SourceDescriptor};

/// Demo: merge in-memory and push-driven sources, then optionally a config file.
/// Usage: cargo run --example join_demo [config_file]
async fn run_in_memory_demo() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== In-memory merge ===\n");

    let mut handle = merge(vec![
        SourceDescriptor::new(from_items(vec![json!(["1", "Martin"]), json!(["2", "Nikolai"])]))
            .named("first"),
        SourceDescriptor::new(from_items(vec![json!(["1", "Heidegger"]), json!(["2", "Tesla"])]))
            .named("last"),
        SourceDescriptor::new(from_items(vec![json!({ "id": "2", "born": 1856 })])).named("born"),
    ])?;

    while let Some(event) = handle.next_event().await {
        match event {
            MergeEvent::Record(record) => println!("record  {}", serde_json::to_string(&record)?),
            MergeEvent::Missing(report) => {
                println!("missing {}", serde_json::to_string(&report.keys)?)
            }
            MergeEvent::Error(error) => println!("error   {}", error),
            MergeEvent::End => println!("end"),
        }
    }
    Ok(())
}

async fn run_push_demo() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Push-driven sources with a failure ===\n");

    let (orders, orders_stream) = channel();
    let (invoices, invoices_stream) = channel();
    let mut handle = merge(vec![
        SourceDescriptor::new(orders_stream).keyed_by("order"),
        SourceDescriptor::new(invoices_stream).keyed_by("order"),
    ])?;

    orders.push(json!({ "order": 7, "item": "lamp" }));
    invoices.push(json!({ "order": 7, "total": 40 }));
    if let Some(record) = handle.next_record().await {
        println!("record  {}", serde_json::to_string(&record)?);
    }

    orders.push(json!({ "order": 8, "item": "desk" }));
    invoices.fail(SourceFault::message("invoice feed disconnected"));

    while let Some(event) = handle.next_event().await {
        match event {
            MergeEvent::Error(error) => println!("error   {}", error),
            MergeEvent::End => println!("end"),
            other => println!("other   {:?}", other),
        }
    }

    tokio::time::sleep(Duration::from_millis(10)).await;
    println!("orders released: {}", orders.is_detached());
    Ok(())
}

async fn run_config_demo(config_file: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Configured merge: {} ===\n", config_file);

    let cfg = load_and_validate_config(config_file)?;
    println!("- Inputs: {}", cfg.inputs.len());
    println!("- Fail on missing: {}", cfg.fail_on_missing);

    let descriptors = RuntimeBuilder::from_config(&cfg).await?;
    let outcome = merge(descriptors)?.collect_outcome().await;
    for record in &outcome.records {
        println!("record  {}", serde_json::to_string(record)?);
    }
    if let Some(report) = &outcome.missing {
        println!("missing {}", serde_json::to_string(&report.keys)?);
    }
    if let Some(error) = &outcome.error {
        println!("error   {}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_in_memory_demo().await?;
    run_push_demo().await?;

    if let Some(config_file) = env::args().nth(1) {
        run_config_demo(&config_file).await?;
    }
    Ok(())
}
