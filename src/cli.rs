//! Command line interface for the `meshframe` binary.
//!
//! The binary pushes one message through the chunker and the inbound
//! pipeline, optionally reordering or withholding chunks, to show how the
//! receiver behaves on a lossy link.

use clap::Parser;

/// Command line arguments for the `meshframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "meshframe",
    version,
    about = "Chunk a message for a mesh radio link and reassemble it"
)]
pub struct Cli {
    /// Message text. Read from stdin when omitted.
    pub message: Option<String>,

    /// Maximum bytes per radio packet, including the chunk header.
    #[arg(short = 'l', long, default_value_t = 200)]
    pub chunk_length: usize,

    /// Delivery order of chunk indices, e.g. `1,0,2`. Defaults to index order.
    #[arg(short, long, value_delimiter = ',')]
    pub order: Vec<u8>,

    /// Chunk indices to withhold, simulating packet loss.
    #[arg(short, long, value_delimiter = ',')]
    pub drop: Vec<u8>,

    /// Sender identifier attached to every packet.
    #[arg(short, long, default_value = "!local")]
    pub sender: String,

    /// Assemble once every slot is filled instead of on the last index.
    #[arg(long)]
    pub all_slots: bool,

    /// Print the collected metrics in Prometheus text format on exit.
    #[arg(long)]
    pub metrics: bool,
}
