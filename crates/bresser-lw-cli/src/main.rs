//! Command-line frontend for the Bresser weather station payload codec.
//!
//! Usage:
//!   bresser-lw decode-uplink --port 1 07ee2a...
//!   bresser-lw decode-downlink --port 0x31 012c
//!   bresser-lw encode-downlink '{"sleep_interval": 300}'
//!
//! Output is the JSON result object on stdout; decode/encode failures are
//! reported inside the result's `errors` field, so the exit code reflects
//! usage errors only.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bresser_lw_codec::{
    decode_downlink, decode_uplink_with, encode_downlink, DecodeOptions, Frame,
};

#[derive(Parser)]
#[command(name = "bresser-lw", version, about = "Bresser weather station LoRaWAN payload codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode an uplink frame to a JSON record.
    DecodeUplink {
        /// Uplink port (decimal or 0x-prefixed hex).
        #[arg(long)]
        port: String,
        /// Payload bytes as a hex string.
        payload: String,
        /// Omit fields carrying the no-reading sentinel (0xFF / 0xFFFF).
        #[arg(long)]
        skip_invalid: bool,
    },
    /// Decode a downlink frame back to its command record.
    DecodeDownlink {
        /// Downlink port (decimal or 0x-prefixed hex).
        #[arg(long)]
        port: String,
        /// Payload bytes as a hex string.
        payload: String,
    },
    /// Encode a JSON command record to downlink bytes and port.
    EncodeDownlink {
        /// Command record, e.g. '{"sleep_interval": 300}'.
        record: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::DecodeUplink {
            port,
            payload,
            skip_invalid,
        } => {
            let frame = parse_frame(&port, &payload)?;
            let result = decode_uplink_with(&frame, &DecodeOptions { skip_invalid });
            print_json(&result)
        }
        Command::DecodeDownlink { port, payload } => {
            let frame = parse_frame(&port, &payload)?;
            print_json(&decode_downlink(&frame))
        }
        Command::EncodeDownlink { record } => {
            let record: serde_json::Value =
                serde_json::from_str(&record).context("record is not valid JSON")?;
            print_json(&encode_downlink(&record))
        }
    }
}

fn parse_frame(port: &str, payload: &str) -> Result<Frame> {
    let port = parse_port(port)?;
    let bytes = hex::decode(payload.trim())
        .with_context(|| format!("invalid hex payload {payload:?}"))?;
    tracing::debug!(port, len = bytes.len(), "parsed frame");
    Ok(Frame::new(bytes, port))
}

fn parse_port(s: &str) -> Result<u8> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    match parsed {
        Ok(port) => Ok(port),
        Err(_) => bail!("invalid port {s:?}"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
