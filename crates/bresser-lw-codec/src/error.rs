//! Error types for bresser-lw-codec.
//!
//! The public `decode_uplink`/`decode_downlink`/`encode_downlink` entry
//! points never propagate these errors; they render them into the
//! `errors: [...]` field of the result. Error display strings on the
//! boundary are part of the wire contract and must not change.

use thiserror::Error;

/// Errors that can occur while decoding or encoding payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A field codec received a slice not matching its fixed width.
    #[error("{what} must have exactly {expected} bytes, got {actual}")]
    WrongLength {
        /// Name of the field codec.
        what: &'static str,
        /// Width the codec consumes.
        expected: usize,
        /// Length of the slice it was given.
        actual: usize,
    },

    /// The payload ended before all schema fields were consumed.
    #[error("payload too short: need {needed} bytes, have {available}")]
    PayloadTooShort {
        /// Bytes required up to and including the current field.
        needed: usize,
        /// Bytes available in the payload.
        available: usize,
    },

    /// No command schema is registered for the port.
    #[error("unknown FPort")]
    UnknownPort(u8),

    /// No command key set matched the input record.
    #[error("Unknown command")]
    UnknownCommand,

    /// A hex-encoded input value was missing its `0x` prefix or contained
    /// invalid digits.
    #[error("{}Invalid hex value", .field.map(|f| format!("'{f}': ")).unwrap_or_default())]
    InvalidHexValue {
        /// Record key the value came from, if any.
        field: Option<&'static str>,
    },

    /// A fixed-length array input had the wrong number of entries.
    #[error("<{field}>: expected {expected} bytes, got {actual}")]
    BadArrayLength {
        /// Record key the array came from.
        field: &'static str,
        /// Required entry count.
        expected: usize,
        /// Actual entry count.
        actual: usize,
    },

    /// An integer input does not fit the wire field.
    #[error("'{field}': value {value} out of range (max {max})")]
    ValueOutOfRange {
        /// Record key the value came from.
        field: &'static str,
        /// Offending value.
        value: u64,
        /// Largest encodable value.
        max: u64,
    },

    /// A record key held a value of the wrong JSON type.
    #[error("'{field}': unexpected value type")]
    InvalidValueType {
        /// Record key the value came from.
        field: &'static str,
    },

    /// A wire value fell outside its enumeration table.
    #[error("{what}: no table entry for value {value}")]
    UnknownEnumValue {
        /// Name of the enumeration.
        what: &'static str,
        /// Offending wire value.
        value: u8,
    },
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    /// Create an invalid-hex error without a field name.
    pub fn invalid_hex() -> Self {
        CodecError::InvalidHexValue { field: None }
    }

    /// Create an invalid-hex error tagged with the record key.
    pub fn invalid_hex_in(field: &'static str) -> Self {
        CodecError::InvalidHexValue { field: Some(field) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_error_strings() {
        assert_eq!(CodecError::UnknownPort(0xFF).to_string(), "unknown FPort");
        assert_eq!(CodecError::UnknownCommand.to_string(), "Unknown command");
        assert_eq!(CodecError::invalid_hex().to_string(), "Invalid hex value");
        assert_eq!(
            CodecError::invalid_hex_in("bresser").to_string(),
            "'bresser': Invalid hex value"
        );
        assert_eq!(
            CodecError::BadArrayLength {
                field: "bresser",
                expected: 16,
                actual: 3
            }
            .to_string(),
            "<bresser>: expected 16 bytes, got 3"
        );
    }
}
