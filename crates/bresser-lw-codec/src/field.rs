//! Typed field codecs.
//!
//! Every value on the wire is produced by one of the codecs in
//! [`FieldType`]. A codec consumes a fixed number of bytes (or, for the
//! list codecs, the remainder of the payload in fixed-size chunks) and
//! produces one JSON value. Fixed-point quantities are rendered as decimal
//! strings with exactly one fractional digit so that decoded records
//! round-trip without floating-point noise.

use chrono::{TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::constants::*;
use crate::error::{CodecError, CodecResult};

/// Sentinel for a missing 8-bit reading.
pub const NO_READING_U8: u8 = 0xFF;
/// Sentinel for a missing 16-bit reading.
pub const NO_READING_U16: u16 = 0xFFFF;

/// Decoder configuration.
///
/// The device encodes "sensor absent / no reading" as an all-ones bit
/// pattern. With `skip_invalid` set, fields holding the sentinel are
/// omitted from the decoded record instead of surfacing the raw value.
/// [`FieldType::Bits8`] is exempt: for configuration bitmasks 0xFF is a
/// legitimate value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Omit fields carrying the no-reading sentinel.
    pub skip_invalid: bool,
}

/// Number of bytes a field codec consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// Exactly this many bytes.
    Fixed(usize),
    /// The remainder of the payload, in chunks of this many bytes.
    Chunked(usize),
}

/// The field codecs used by the command schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unsigned 8-bit integer; subject to the no-reading sentinel.
    Uint8,
    /// Unsigned 8-bit integer; never treated as a sentinel.
    Bits8,
    /// Unsigned 8-bit integer scaled by 0.1, one fractional digit.
    Uint8Fp1,
    /// Unsigned 8-bit integer rendered as `0x..` (no zero padding).
    Uint8Hex,
    /// Unsigned 16-bit little-endian integer; subject to the sentinel.
    Uint16,
    /// Unsigned 16-bit little-endian integer scaled by 0.1.
    Uint16Fp1,
    /// Unsigned 16-bit big-endian integer.
    Uint16Be,
    /// Unsigned 32-bit big-endian integer.
    Uint32Be,
    /// Unsigned 32-bit big-endian integer rendered as `0x..` (no padding).
    Uint32HexBe,
    /// Two's-complement 16-bit big-endian value in 1/100 units,
    /// one fractional digit.
    Temperature,
    /// IEEE-754 single-precision value from 4 little-endian bytes,
    /// one fractional digit.
    RawFloat,
    /// Little-endian 32-bit Unix epoch, decoded to `{time, timestamp}`.
    UnixTime,
    /// RTC synchronization source enumeration.
    RtcSource,
    /// Two raw bytes as a `0x`-prefixed 4-digit hex string.
    Hex16,
    /// Four raw bytes as a `0x`-prefixed 8-digit hex string.
    Hex32,
    /// List of 48-bit MAC addresses, 6 bytes each.
    Mac48,
    /// List of 32-bit sensor IDs, 4 bytes each.
    Id32,
    /// 16 per-sensor-type channel bitmaps.
    BresserBitmaps,
    /// Aggregate sensor status block (Bresser bitmaps + BLE status).
    SensorStatus,
    /// List of sensor-scan result entries, 9 bytes each.
    FoundSensors,
}

impl FieldType {
    /// Bytes this codec consumes.
    pub fn width(&self) -> FieldWidth {
        use FieldType::*;
        match self {
            Uint8 | Bits8 | Uint8Fp1 | Uint8Hex | RtcSource => FieldWidth::Fixed(1),
            Uint16 | Uint16Fp1 | Uint16Be | Temperature | Hex16 => FieldWidth::Fixed(2),
            Uint32Be | Uint32HexBe | RawFloat | UnixTime | Hex32 => FieldWidth::Fixed(4),
            BresserBitmaps => FieldWidth::Fixed(BRESSER_BITMAP_COUNT),
            SensorStatus => FieldWidth::Fixed(SENSOR_STATUS_SIZE),
            Mac48 => FieldWidth::Chunked(6),
            Id32 => FieldWidth::Chunked(4),
            FoundSensors => FieldWidth::Chunked(SCAN_ENTRY_SIZE),
        }
    }

    /// Codec name used in error messages.
    fn name(&self) -> &'static str {
        use FieldType::*;
        match self {
            Uint8 => "uint8",
            Bits8 => "bits8",
            Uint8Fp1 => "uint8fp1",
            Uint8Hex => "uint8hex",
            Uint16 => "uint16",
            Uint16Fp1 => "uint16fp1",
            Uint16Be => "uint16BE",
            Uint32Be => "uint32BE",
            Uint32HexBe => "uint32hexBE",
            Temperature => "temperature",
            RawFloat => "rawfloat",
            UnixTime => "unixtime",
            RtcSource => "rtc_source",
            Hex16 => "hex16",
            Hex32 => "hex32",
            Mac48 => "mac48",
            Id32 => "id32",
            BresserBitmaps => "bresser_bitmaps",
            SensorStatus => "sensor_status",
            FoundSensors => "found_sensors",
        }
    }

    /// Verify the slice length against the codec width.
    fn check_len(&self, bytes: &[u8]) -> CodecResult<()> {
        match self.width() {
            FieldWidth::Fixed(n) if bytes.len() != n => Err(CodecError::WrongLength {
                what: self.name(),
                expected: n,
                actual: bytes.len(),
            }),
            FieldWidth::Chunked(c) if bytes.len() % c != 0 => Err(CodecError::WrongLength {
                what: self.name(),
                expected: c,
                actual: bytes.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Decode one value from `bytes`.
    ///
    /// Returns `Ok(None)` when the field carries the no-reading sentinel
    /// and sentinel suppression is enabled.
    pub fn decode(&self, bytes: &[u8], opts: &DecodeOptions) -> CodecResult<Option<Value>> {
        self.check_len(bytes)?;
        let value = match self {
            FieldType::Uint8 | FieldType::Uint8Fp1 if opts.skip_invalid && bytes[0] == NO_READING_U8 => {
                return Ok(None);
            }
            FieldType::Uint16 | FieldType::Uint16Fp1
                if opts.skip_invalid && u16::from_le_bytes([bytes[0], bytes[1]]) == NO_READING_U16 =>
            {
                return Ok(None);
            }
            FieldType::Uint8 | FieldType::Bits8 => json!(bytes[0]),
            FieldType::Uint8Fp1 => json!(format_fp1(bytes[0] as f64 * 0.1)),
            FieldType::Uint8Hex => json!(format!("0x{:x}", bytes[0])),
            FieldType::Uint16 => json!(u16::from_le_bytes([bytes[0], bytes[1]])),
            FieldType::Uint16Fp1 => {
                json!(format_fp1(u16::from_le_bytes([bytes[0], bytes[1]]) as f64 * 0.1))
            }
            FieldType::Uint16Be => json!(u16::from_be_bytes([bytes[0], bytes[1]])),
            FieldType::Uint32Be => {
                json!(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            FieldType::Uint32HexBe => json!(format!(
                "0x{:x}",
                u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            )),
            FieldType::Temperature => json!(decode_temperature(bytes[0], bytes[1])),
            FieldType::RawFloat => json!(decode_rawfloat(bytes)),
            FieldType::UnixTime => {
                let ts = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                let mut event = Map::new();
                event.insert("time".to_string(), json!(format_iso8601(ts)));
                event.insert("timestamp".to_string(), json!(ts));
                Value::Object(event)
            }
            FieldType::RtcSource => {
                let source = RTC_SOURCES.get(bytes[0] as usize).ok_or(
                    CodecError::UnknownEnumValue {
                        what: "rtc_source",
                        value: bytes[0],
                    },
                )?;
                json!(source)
            }
            FieldType::Hex16 => json!(format!("0x{:02x}{:02x}", bytes[0], bytes[1])),
            FieldType::Hex32 => json!(format!(
                "0x{:02x}{:02x}{:02x}{:02x}",
                bytes[0], bytes[1], bytes[2], bytes[3]
            )),
            FieldType::Mac48 => Value::Array(
                bytes
                    .chunks_exact(6)
                    .map(|c| {
                        json!(format!(
                            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                            c[0], c[1], c[2], c[3], c[4], c[5]
                        ))
                    })
                    .collect(),
            ),
            FieldType::Id32 => Value::Array(
                bytes
                    .chunks_exact(4)
                    .map(|c| json!(format!("0x{:02x}{:02x}{:02x}{:02x}", c[0], c[1], c[2], c[3])))
                    .collect(),
            ),
            FieldType::BresserBitmaps => decode_bresser_bitmaps(bytes),
            FieldType::SensorStatus => {
                let mut status = Map::new();
                status.insert(
                    "bresser".to_string(),
                    decode_bresser_bitmaps(&bytes[..BRESSER_BITMAP_COUNT]),
                );
                // Bytes 16..24 carry onewire/analog/digital status and are
                // not surfaced; the BLE status word follows them.
                status.insert(
                    "ble".to_string(),
                    json!(format!("0x{:02x}{:02x}", bytes[24], bytes[25])),
                );
                Value::Object(status)
            }
            FieldType::FoundSensors => {
                let mut entries = Vec::new();
                for chunk in bytes.chunks_exact(SCAN_ENTRY_SIZE) {
                    entries.push(decode_scan_entry(chunk)?);
                }
                Value::Array(entries)
            }
        };
        Ok(Some(value))
    }
}

/// Render a value with exactly one fractional digit.
///
/// Exact decimal ties round up in magnitude (1.25 renders as "1.3", not
/// "1.2"). Quarter-step rain totals hit exact ties and hosts rely on the
/// upward result.
fn format_fp1(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    // f64::round resolves ties away from zero; on the magnitude that is
    // always upward.
    let scaled = (value.abs() * 10.0).round();
    format!("{sign}{:.1}", scaled / 10.0)
}

/// Decode a two's-complement 16-bit big-endian temperature in 1/100 units.
fn decode_temperature(hi: u8, lo: u8) -> String {
    let raw = u16::from_be_bytes([hi, lo]);
    // Sign bit set: invert-and-increment to recover the magnitude.
    let hundredths = if raw & 0x8000 != 0 {
        -((!raw).wrapping_add(1) as i32)
    } else {
        raw as i32
    };
    format_fp1(hundredths as f64 / 100.0)
}

/// Reconstruct an IEEE-754 single-precision value from 4 bytes in
/// little-endian field order (byte 0 is least significant).
fn decode_rawfloat(bytes: &[u8]) -> String {
    let bits = (bytes[3] as u32) << 24 | (bytes[2] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[0] as u32;
    let sign = if bits >> 31 == 0 { 1.0 } else { -1.0 };
    let e = (bits >> 23 & 0xFF) as i32;
    let m = if e == 0 {
        (bits & 0x7F_FFFF) << 1
    } else {
        bits & 0x7F_FFFF | 0x80_0000
    };
    format_fp1(sign * m as f64 * 2f64.powi(e - 150))
}

/// Render a Unix epoch second count as an ISO-8601 UTC timestamp with
/// millisecond precision.
fn format_iso8601(ts: u32) -> String {
    // Every u32 epoch value maps to a valid chrono timestamp.
    let dt = Utc.timestamp_opt(ts as i64, 0).unwrap();
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn decode_bresser_bitmaps(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| json!(format!("0x{:02x}", b))).collect())
}

/// Decode one 9-byte sensor-scan result entry.
fn decode_scan_entry(chunk: &[u8]) -> CodecResult<Value> {
    let decoder_idx = (chunk[4] >> 4) as usize;
    let type_idx = (chunk[4] & 0x0F) as usize;
    let decoder = SCAN_DECODERS
        .get(decoder_idx)
        .ok_or(CodecError::UnknownEnumValue {
            what: "scan decoder",
            value: chunk[4] >> 4,
        })?;
    let mut entry = Map::new();
    entry.insert(
        "id".to_string(),
        json!(format!(
            "0x{:02x}{:02x}{:02x}{:02x}",
            chunk[0], chunk[1], chunk[2], chunk[3]
        )),
    );
    entry.insert("decoder".to_string(), json!(decoder));
    entry.insert("type".to_string(), json!(SENSOR_TYPES[type_idx]));
    entry.insert("ch".to_string(), json!(chunk[5]));
    entry.insert(
        "flags".to_string(),
        json!(format!("0x{:02x}{:02x}", chunk[7], chunk[6])),
    );
    entry.insert("rssi".to_string(), json!(-(chunk[8] as i64)));
    Ok(Value::Object(entry))
}

// ============================================================================
// Inverse parsers (encode direction)
// ============================================================================

/// Parse a `0x`-prefixed hex string into exactly `width` bytes.
///
/// Errors carry `field` so the boundary can report which record key was
/// malformed. Digits beyond `width` pairs are ignored, shorter input is
/// an error.
pub fn parse_hex_bytes(s: &str, field: &'static str, width: usize) -> CodecResult<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(CodecError::invalid_hex_in(field))?;
    if digits.len() < width * 2 {
        return Err(CodecError::invalid_hex_in(field));
    }
    hex::decode(&digits[..width * 2]).map_err(|_| CodecError::invalid_hex_in(field))
}

/// Parse a colon-separated MAC address string into 6 bytes.
pub fn parse_mac48(s: &str, field: &'static str) -> CodecResult<Vec<u8>> {
    let compact: String = s.chars().filter(|c| *c != ':').collect();
    if compact.len() != 12 {
        return Err(CodecError::invalid_hex_in(field));
    }
    hex::decode(&compact).map_err(|_| CodecError::invalid_hex_in(field))
}
