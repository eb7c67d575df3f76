//! Frame and result types exchanged with the network-server host.
//!
//! These mirror the LoRaWAN payload-codec API: the host hands the codec a
//! `{bytes, fPort}` frame and receives `{data, warnings, errors}` back;
//! encoding returns `{bytes, fPort, warnings, errors}`. Failures are
//! reported through `errors` instead of being raised, so a malformed frame
//! can never take the host down.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CodecError;

/// A raw frame: payload bytes plus the port that selects the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Payload bytes as received from (or to be sent over) the radio.
    pub bytes: Vec<u8>,
    /// Port number selecting the command or telemetry schema.
    #[serde(rename = "fPort")]
    pub port: u8,
}

impl Frame {
    /// Create a frame from payload bytes and a port.
    pub fn new(bytes: impl Into<Vec<u8>>, port: u8) -> Self {
        Frame {
            bytes: bytes.into(),
            port,
        }
    }
}

/// Result of decoding an uplink or downlink frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedPayload {
    /// Decoded record, or an empty object when decoding failed.
    pub data: Value,
    /// Reserved; always empty for the current schemas.
    pub warnings: Vec<String>,
    /// Decode failures, rendered as strings.
    pub errors: Vec<String>,
}

impl DecodedPayload {
    /// Successful decode result.
    pub fn ok(data: Value) -> Self {
        DecodedPayload {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Failed decode result with an empty data object.
    pub fn err(error: &CodecError) -> Self {
        DecodedPayload {
            data: Value::Object(Default::default()),
            warnings: Vec::new(),
            errors: vec![error.to_string()],
        }
    }
}

/// Result of encoding a downlink command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDownlink {
    /// Encoded payload bytes; empty when encoding failed.
    pub bytes: Vec<u8>,
    /// Port the command must be sent on.
    #[serde(rename = "fPort")]
    pub port: u8,
    /// Reserved; always empty for the current schemas.
    pub warnings: Vec<String>,
    /// Encode failures, rendered as strings.
    pub errors: Vec<String>,
}

impl EncodedDownlink {
    /// Successful encode result.
    pub fn ok(bytes: Vec<u8>, port: u8) -> Self {
        EncodedDownlink {
            bytes,
            port,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Failed encode result.
    ///
    /// Every encode error carries the telemetry port, deliberately
    /// normalizing the wire shape: hosts dispatch on `errors`, so the
    /// port of a failed encode has no meaning, and one shape with
    /// `fPort` always present is simpler to consume than a field that
    /// comes and goes with the error kind.
    pub fn err(error: &CodecError) -> Self {
        EncodedDownlink {
            bytes: Vec::new(),
            port: crate::constants::PORT_TELEMETRY,
            warnings: Vec::new(),
            errors: vec![error.to_string()],
        }
    }
}
