//! Uppe dispatcher - reads check events and fans them out to the metric and
//! queue writers.

mod bus;
mod config;
mod dispatch;
mod ingest;
mod registry;
mod sink;
mod ticker;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use crate::bus::Bus;
use crate::config::Config;
use crate::dispatch::{DispatchSettings, Dispatcher};
use crate::sink::{LogSink, MemorySink};

#[derive(Debug, Parser)]
#[command(version, about = "Routes Uppe check events to metrics and the result queue")]
struct Args {
    /// Path to the config file (defaults to $XDG_CONFIG_HOME/uppe/dispatcher.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Keep metric points and queue messages in memory instead of writing
    /// them out, and report how many were produced
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        Config::from_config(args.config.as_deref()).context("Failed to load configuration")?;
    if args.print_config {
        print!("{config}");
        return Ok(());
    }

    logger::init_with_level(&config.log.level);

    let (bus, receiver) = Bus::new(config.bus.capacity);
    let settings = DispatchSettings::from(&config);
    let memory = Arc::new(MemorySink::default());
    let dispatcher = if args.dry_run {
        Dispatcher::new(settings, memory.clone(), memory.clone())
    } else {
        let sink = Arc::new(LogSink);
        Dispatcher::new(settings, sink.clone(), sink)
    };
    let dispatch_task = tokio::spawn(dispatcher.run(receiver));

    let ticker = config.ping.interval().map(|every| ticker::spawn(bus.clone(), every));

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        forwarded = ingest::forward_lines(stdin, &bus) => {
            forwarded.context("Failed to read events from stdin")?;
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    if let Some(ticker) = ticker {
        ticker.abort();
        // The aborted task drops its bus handle
        let _ = ticker.await;
    }
    drop(bus);

    let dispatcher = dispatch_task.await.context("Dispatcher task failed")?;
    let stats = dispatcher.stats();
    info!(
        checks = dispatcher.registry().len(),
        results = stats.results,
        encode_failures = stats.encode_failures,
        sink_failures = stats.sink_failures,
        last_ping = ?dispatcher.registry().last_ping(),
        "Dispatcher finished"
    );

    if args.dry_run {
        println!(
            "dry run: {} metric points, {} queue messages",
            memory.points().len(),
            memory.messages().len()
        );
    }

    Ok(())
}
