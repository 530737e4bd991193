//! Push message service binary
//!
//! Reads hex-encoded chunk writes from stdin, one per line, reassembles
//! them per connection and forwards completed messages.
//!
//! Usage:
//!   push_message_service --config config/push_message.toml < writes.txt
//!   push_message_service --completion coverage --dry-run < writes.txt

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use extmsg_codec::CompletionStrategy;
use extmsg_config::{load_config, ServiceConfig};
use extmsg_push_service::{parse_line, EndpointRegistry, EndpointSettings, WriteOutcome};
use extmsg_sink::{ChannelRouter, Delivery, LoggingRouter, MessageRouter};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "push_message_service")]
#[command(about = "Reassembles push message chunk writes and forwards them")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,

    /// Completion detection strategy; overrides the config file
    #[arg(long, value_enum)]
    completion: Option<CompletionArg>,

    /// Log deliveries instead of queueing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CompletionArg {
    ByteCount,
    Coverage,
}

impl From<CompletionArg> for CompletionStrategy {
    fn from(arg: CompletionArg) -> Self {
        match arg {
            CompletionArg::ByteCount => CompletionStrategy::ByteCount,
            CompletionArg::Coverage => CompletionStrategy::Coverage,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    init_logging(&config);

    info!("Starting push message service");
    info!(
        completion = ?config.reassembly.completion,
        size_change = ?config.reassembly.size_change,
        reserved_prefix = %config.frame.reserved_destination_prefix,
        "Loaded configuration"
    );

    let settings = EndpointSettings::from_config(&config);
    let addressing = config.router.addressing();

    if args.dry_run {
        let router = Arc::new(LoggingRouter::new(addressing));
        let registry = EndpointRegistry::new(router.clone(), settings);
        run(registry).await?;
        info!(delivered = router.delivered(), "Dry run finished");
        return Ok(());
    }

    let (router, receiver) = ChannelRouter::new(addressing, config.router.channel_capacity);
    let delivery_task = tokio::spawn(deliver_messages(receiver));

    // The registry owns the only sender; dropping it lets the task drain and exit
    let registry = EndpointRegistry::new(router, settings);
    run(registry).await?;

    let delivered = delivery_task.await.context("Delivery task failed")?;
    info!(delivered, "Push message service stopped");
    Ok(())
}

fn apply_overrides(config: &mut ServiceConfig, args: &Args) {
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json = true;
    }
    if let Some(completion) = args.completion {
        config.reassembly.completion = completion.into();
    }
}

fn init_logging(config: &ServiceConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Feed stdin lines into the registry until EOF
async fn run<R: MessageRouter + Clone>(mut registry: EndpointRegistry<R>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_number = 0u64;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        line_number += 1;
        let write = match parse_line(&line) {
            Ok(Some(write)) => write,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping unreadable input line");
                continue;
            }
        };

        if let WriteOutcome::Delivered {
            source,
            destination,
        } = registry.write_value(write.connection, &write.chunk)
        {
            info!(
                connection = write.connection,
                %source,
                %destination,
                "Message complete"
            );
        }
    }

    info!(connections = registry.len(), "Input closed");
    registry.clear();
    Ok(())
}

/// Drain queued deliveries; returns how many were handled
async fn deliver_messages(mut receiver: mpsc::Receiver<Delivery>) -> u64 {
    let mut delivered = 0u64;
    while let Some(delivery) = receiver.recv().await {
        info!(
            address = %delivery.address,
            source = %delivery.source,
            payload_size = delivery.size(),
            "Delivering message"
        );
        delivered += 1;
    }
    delivered
}
