//! Demonstration binary for `meshframe`.
//!
//! Chunks a message, replays the chunks through the inbound dispatcher in the
//! requested order, and prints whatever the listener receives.

mod cli;

use std::process::ExitCode;

use bytes::Bytes;
use clap::Parser;
use meshframe::{
    ChunkingConfig,
    CompletionPolicy,
    DispatchConfig,
    Dispatcher,
    MeshPacket,
    Outbound,
    PayloadId,
    SenderId,
};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("meshframe: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<(), BoxError> {
    #[cfg(feature = "metrics")]
    let exporter = if cli.metrics {
        Some(metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };
    #[cfg(not(feature = "metrics"))]
    if cli.metrics {
        tracing::warn!("built without the `metrics` feature; ignoring --metrics");
    }

    let message = match cli.message {
        Some(text) => text.into_bytes(),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };

    let config = ChunkingConfig::for_chunk_length(cli.chunk_length)
        .ok_or("chunk length must leave room for at least one payload byte")?;
    let mut outbound = Outbound::new(&config, Vec::new());
    let count = outbound.send(message)?;
    let wire = outbound.into_sink();
    println!("split into {count} chunk(s)");

    let policy = if cli.all_slots {
        CompletionPolicy::AllSlots
    } else {
        CompletionPolicy::LastIndex
    };
    let (dispatcher, worker) =
        Dispatcher::new(DispatchConfig::builder().completion_policy(policy).build()?);
    dispatcher.add_listener(|id: PayloadId, bytes: &Bytes| {
        println!(
            "message {id} ({} bytes): {}",
            bytes.len(),
            String::from_utf8_lossy(bytes)
        );
    });
    let worker = worker.spawn();

    let sender = SenderId::new(cli.sender);
    for (n, index) in delivery_schedule(&cli.order, &cli.drop, count)?
        .into_iter()
        .enumerate()
    {
        let Some(bytes) = wire.get(usize::from(index)) else {
            continue;
        };
        let payload_id = PayloadId::new(u32::try_from(n)?);
        let packet = MeshPacket::opaque(sender.clone(), payload_id, bytes.clone());
        match dispatcher.handle_packet(packet) {
            Ok(ingest) => println!("chunk {index}: {ingest:?}"),
            Err(err) => println!("chunk {index}: {err}"),
        }
    }

    dispatcher.shutdown();
    if worker.await? == 0 {
        println!("no message delivered");
    }

    #[cfg(feature = "metrics")]
    if let Some(handle) = exporter {
        print!("{}", handle.render());
    }
    Ok(())
}

/// Resolve the order in which chunk indices are delivered.
fn delivery_schedule(order: &[u8], withheld: &[u8], count: usize) -> Result<Vec<u8>, BoxError> {
    let total = u8::try_from(count)?;
    let order: Vec<u8> = if order.is_empty() {
        (0..total).collect()
    } else {
        order.to_vec()
    };
    if let Some(bad) = order.iter().find(|index| **index >= total) {
        return Err(format!("chunk index {bad} out of range for {count} chunk(s)").into());
    }
    Ok(order
        .into_iter()
        .filter(|index| !withheld.contains(index))
        .collect())
}
