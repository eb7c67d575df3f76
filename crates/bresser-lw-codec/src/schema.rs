//! Command schemas and the frame dispatch algorithm.
//!
//! A [`CommandSchema`] describes the exact byte layout of one port as an
//! ordered list of (codec, field name) pairs. Decoding walks the payload
//! with an offset cursor, handing each codec its fixed-width slice; the
//! list codecs take the remainder. Trailing unconsumed bytes are ignored
//! so newer firmware can append fields without breaking older decoders.

use serde_json::{Map, Value};

use crate::error::{CodecError, CodecResult};
use crate::field::{DecodeOptions, FieldType, FieldWidth};

/// One (codec, output field name) pair in a command layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key the decoded value is stored under.
    pub name: &'static str,
    /// Codec producing the value.
    pub field: FieldType,
}

/// The byte layout of one command port.
#[derive(Debug, Clone, Copy)]
pub struct CommandSchema {
    /// Port ("FPort") the schema applies to.
    pub port: u8,
    /// Ordered field layout. Empty for pure "get" queries, which carry a
    /// canonical one-byte zero payload.
    pub fields: &'static [FieldSpec],
}

/// Shorthand for building schema tables.
pub(crate) const fn field(name: &'static str, field: FieldType) -> FieldSpec {
    FieldSpec { name, field }
}

/// Look up the schema for a port in an ordered table.
pub fn find_schema(table: &'static [CommandSchema], port: u8) -> CodecResult<&'static CommandSchema> {
    table
        .iter()
        .find(|schema| schema.port == port)
        .ok_or(CodecError::UnknownPort(port))
}

/// Apply a field list to a payload, in order, with an offset cursor.
///
/// Fields suppressed by the sentinel policy still consume their bytes;
/// they are only omitted from the output record.
pub fn decode_fields(
    bytes: &[u8],
    fields: &[FieldSpec],
    opts: &DecodeOptions,
) -> CodecResult<Map<String, Value>> {
    let mut record = Map::new();
    let mut offset = 0;
    for spec in fields {
        let slice = match spec.field.width() {
            FieldWidth::Fixed(n) => {
                if offset + n > bytes.len() {
                    return Err(CodecError::PayloadTooShort {
                        needed: offset + n,
                        available: bytes.len(),
                    });
                }
                let slice = &bytes[offset..offset + n];
                offset += n;
                slice
            }
            FieldWidth::Chunked(_) => {
                let slice = &bytes[offset..];
                offset = bytes.len();
                slice
            }
        };
        if let Some(value) = spec.field.decode(slice, opts)? {
            record.insert(spec.name.to_string(), value);
        }
    }
    Ok(record)
}
