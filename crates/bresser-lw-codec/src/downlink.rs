//! Downlink encoding and decoding.
//!
//! Encoding turns a JSON record into `(bytes, port)` via the key-presence
//! dispatch in [`crate::commands`]. Decoding is the network-server-side
//! check of a queued downlink: "set" commands decode through the schema
//! table below, "get" commands decode to the literal array `[0]`, the
//! shape existing hosts expect for a query payload.

use serde_json::{json, Value};

use crate::commands::DownlinkCommand;
use crate::constants::*;
use crate::error::{CodecError, CodecResult};
use crate::field::{DecodeOptions, FieldType};
use crate::frame::{DecodedPayload, EncodedDownlink, Frame};
use crate::schema::{decode_fields, field, find_schema, CommandSchema, FieldSpec};

/// Ports carrying pure "get" queries (one-byte zero payload).
const GET_PORTS: &[u8] = &[
    CMD_GET_DATETIME,
    CMD_GET_LW_CONFIG,
    CMD_GET_LW_STATUS,
    CMD_GET_WS_TIMEOUT,
    CMD_GET_WS_POSTPROC,
    CMD_GET_APP_STATUS_INTERVAL,
    CMD_GET_SENSORS_STAT,
    CMD_GET_SENSORS_INC,
    CMD_GET_SENSORS_EXC,
    CMD_GET_SENSORS_CFG,
    CMD_GET_APP_PAYLOAD_CFG,
    CMD_GET_BLE_ADDR,
    CMD_GET_BLE_CONFIG,
];

/// Downlink "set" port-to-layout table.
const SET_SCHEMAS: &[CommandSchema] = &[
    CommandSchema {
        port: CMD_SET_DATETIME,
        fields: &[field("unixtime", FieldType::Uint32HexBe)],
    },
    CommandSchema {
        port: CMD_SET_SLEEP_INTERVAL,
        fields: &[field("sleep_interval", FieldType::Uint16Be)],
    },
    CommandSchema {
        port: CMD_SET_SLEEP_INTERVAL_LONG,
        fields: &[field("sleep_interval_long", FieldType::Uint16Be)],
    },
    CommandSchema {
        port: CMD_SET_LW_STATUS_INTERVAL,
        fields: &[field("lw_status_interval", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_SET_WS_TIMEOUT,
        fields: &[field("ws_timeout", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_SET_WS_POSTPROC,
        fields: &[field("update_interval", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_RESET_WS_POSTPROC,
        fields: &[field("reset_flags", FieldType::Uint8Hex)],
    },
    CommandSchema {
        port: CMD_SCAN_SENSORS,
        fields: &[field("ws_scantime", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_SET_APP_STATUS_INTERVAL,
        fields: &[field("app_status_interval", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_SET_SENSORS_INC,
        fields: &[field("sensors_inc", FieldType::Id32)],
    },
    CommandSchema {
        port: CMD_SET_SENSORS_EXC,
        fields: &[field("sensors_exc", FieldType::Id32)],
    },
    CommandSchema {
        port: CMD_SET_SENSORS_CFG,
        fields: &[
            field("max_sensors", FieldType::Bits8),
            field("rx_flags", FieldType::Bits8),
            field("en_decoders", FieldType::Bits8),
        ],
    },
    CommandSchema {
        port: CMD_SET_APP_PAYLOAD_CFG,
        fields: &[
            field("bresser", FieldType::BresserBitmaps),
            field("onewire", FieldType::Hex16),
            field("analog", FieldType::Hex16),
            field("digital", FieldType::Hex32),
        ],
    },
    CommandSchema {
        port: CMD_SET_BLE_ADDR,
        fields: &[field("ble_addr", FieldType::Mac48)],
    },
    CommandSchema {
        port: CMD_SET_BLE_CONFIG,
        fields: &[
            field("ble_active", FieldType::Bits8),
            field("ble_scantime", FieldType::Bits8),
        ],
    },
];

fn decode(frame: &Frame) -> CodecResult<Value> {
    if GET_PORTS.contains(&frame.port) {
        return Ok(json!([0]));
    }
    let schema = find_schema(SET_SCHEMAS, frame.port)?;
    let record = decode_fields(&frame.bytes, schema.fields, &DecodeOptions::default())?;
    Ok(Value::Object(record))
}

/// Decode a downlink frame against the downlink command table.
pub fn decode_downlink(frame: &Frame) -> DecodedPayload {
    match decode(frame) {
        Ok(data) => DecodedPayload::ok(data),
        Err(err) => DecodedPayload::err(&err),
    }
}

/// Encode a command record into a downlink frame.
///
/// The command is selected by which keys are present in `data`; see
/// [`DownlinkCommand::from_record`] for the priority order.
pub fn encode_downlink(data: &Value) -> EncodedDownlink {
    let record = match data.as_object() {
        Some(record) => record,
        None => return EncodedDownlink::err(&CodecError::UnknownCommand),
    };
    match DownlinkCommand::from_record(record) {
        Ok(command) => {
            let (bytes, port) = command.encode();
            EncodedDownlink::ok(bytes, port)
        }
        Err(err) => EncodedDownlink::err(&err),
    }
}
