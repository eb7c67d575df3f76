//! Bresser Weather Station LoRaWAN Payload Codec
//!
//! This crate converts the compact byte frames exchanged with a
//! Bresser-based LoRaWAN weather station node into structured JSON records
//! and back. Frames are identified by their port ("FPort"): port 1 carries
//! periodic sensor data, the remaining ports carry configuration commands
//! and their responses.
//!
//! # Overview
//!
//! - **Uplink** (device → network): [`decode_uplink`] decodes telemetry
//!   and configuration responses via a port-to-schema table.
//! - **Downlink** (network → device): [`encode_downlink`] builds a command
//!   frame from a JSON record, selecting the command by which keys are
//!   present; [`decode_downlink`] decodes a queued command frame back into
//!   a record.
//!
//! All entry points are pure and synchronous; failures are reported in the
//! `errors` field of the result rather than returned as `Err`, matching
//! the LoRaWAN payload-codec API.
//!
//! # Example
//!
//! ```rust
//! use bresser_lw_codec::{decode_downlink, encode_downlink, Frame};
//! use serde_json::json;
//!
//! let encoded = encode_downlink(&json!({"sleep_interval": 300}));
//! assert_eq!(encoded.bytes, vec![0x01, 0x2C]);
//! assert_eq!(encoded.port, 0x31);
//!
//! let decoded = decode_downlink(&Frame::new(encoded.bytes, encoded.port));
//! assert_eq!(decoded.data, json!({"sleep_interval": 300}));
//! ```

mod commands;
mod constants;
mod downlink;
mod error;
mod field;
mod frame;
mod schema;
mod uplink;

pub use commands::*;
pub use constants::*;
pub use downlink::*;
pub use error::*;
pub use field::*;
pub use frame::*;
pub use schema::*;
pub use uplink::*;
