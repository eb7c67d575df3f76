//! Uplink decoding.
//!
//! Port 1 carries the periodic sensor-data frame; every other uplink port
//! is the response to a configuration request and arrives on the request's
//! port. Decoding is a pure table lookup followed by the cursor walk in
//! [`crate::schema`].

use serde_json::Value;

use crate::constants::*;
use crate::error::CodecResult;
use crate::field::{DecodeOptions, FieldType};
use crate::frame::{DecodedPayload, Frame};
use crate::schema::{decode_fields, field, find_schema, CommandSchema, FieldSpec};

/// Layout of the periodic sensor-data frame (all sensors enabled).
///
/// Fields are packed back to back; a missing sensor is signalled by the
/// no-reading sentinel, never by skipping bytes.
const TELEMETRY: &[FieldSpec] = &[
    field("ws_temp_c", FieldType::Temperature),
    field("ws_humidity", FieldType::Uint8),
    field("ws_rain_mm", FieldType::RawFloat),
    field("ws_wind_gust_ms", FieldType::Uint16Fp1),
    field("ws_wind_avg_ms", FieldType::Uint16Fp1),
    field("ws_wind_dir_deg", FieldType::Uint16Fp1),
    field("ws_rain_hourly_mm", FieldType::RawFloat),
    field("ws_rain_daily_mm", FieldType::RawFloat),
    field("ws_rain_weekly_mm", FieldType::RawFloat),
    field("ws_rain_monthly_mm", FieldType::RawFloat),
    field("th1_temp_c", FieldType::Temperature),
    field("th1_humidity", FieldType::Uint8),
    field("soil1_temp_c", FieldType::Temperature),
    field("soil1_moisture", FieldType::Uint8),
    field("lgt_ev_time", FieldType::UnixTime),
    field("lgt_ev_events", FieldType::Uint16),
    field("lgt_ev_dist_km", FieldType::Uint8),
    field("ow0_temp_c", FieldType::Temperature),
    field("a0_voltage_mv", FieldType::Uint16),
    field("ble0_temp_c", FieldType::Temperature),
    field("ble0_humidity", FieldType::Uint8),
];

/// Uplink port-to-layout table.
const UPLINK_SCHEMAS: &[CommandSchema] = &[
    CommandSchema {
        port: PORT_TELEMETRY,
        fields: TELEMETRY,
    },
    CommandSchema {
        port: CMD_GET_DATETIME,
        fields: &[
            field("unixtime", FieldType::Uint32Be),
            field("rtc_source", FieldType::RtcSource),
        ],
    },
    CommandSchema {
        port: CMD_GET_LW_CONFIG,
        fields: &[
            field("sleep_interval", FieldType::Uint16Be),
            field("sleep_interval_long", FieldType::Uint16Be),
            field("lw_status_interval", FieldType::Bits8),
        ],
    },
    CommandSchema {
        port: CMD_GET_LW_STATUS,
        fields: &[
            field("ubatt_mv", FieldType::Uint16),
            field("long_sleep", FieldType::Bits8),
        ],
    },
    CommandSchema {
        port: CMD_GET_APP_STATUS_INTERVAL,
        fields: &[field("app_status_interval", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_GET_SENSORS_STAT,
        fields: &[field("sensor_status", FieldType::SensorStatus)],
    },
    CommandSchema {
        port: CMD_GET_APP_PAYLOAD_CFG,
        fields: &[
            field("bresser", FieldType::BresserBitmaps),
            field("onewire", FieldType::Hex16),
            field("analog", FieldType::Hex16),
            field("digital", FieldType::Hex32),
        ],
    },
    CommandSchema {
        port: CMD_GET_WS_TIMEOUT,
        fields: &[field("ws_timeout", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_SCAN_SENSORS,
        fields: &[field("found_sensors", FieldType::FoundSensors)],
    },
    CommandSchema {
        port: CMD_GET_SENSORS_INC,
        fields: &[field("sensors_inc", FieldType::Id32)],
    },
    CommandSchema {
        port: CMD_GET_SENSORS_EXC,
        fields: &[field("sensors_exc", FieldType::Id32)],
    },
    CommandSchema {
        port: CMD_GET_SENSORS_CFG,
        fields: &[
            field("max_sensors", FieldType::Bits8),
            field("rx_flags", FieldType::Bits8),
            field("en_decoders", FieldType::Bits8),
        ],
    },
    CommandSchema {
        port: CMD_GET_WS_POSTPROC,
        fields: &[field("update_interval", FieldType::Bits8)],
    },
    CommandSchema {
        port: CMD_GET_BLE_CONFIG,
        fields: &[
            field("ble_active", FieldType::Bits8),
            field("ble_scantime", FieldType::Bits8),
        ],
    },
    CommandSchema {
        port: CMD_GET_BLE_ADDR,
        fields: &[field("ble_addr", FieldType::Mac48)],
    },
];

fn decode(frame: &Frame, opts: &DecodeOptions) -> CodecResult<Value> {
    let schema = find_schema(UPLINK_SCHEMAS, frame.port)?;
    let record = decode_fields(&frame.bytes, schema.fields, opts)?;
    Ok(Value::Object(record))
}

/// Decode an uplink frame with explicit decoder options.
pub fn decode_uplink_with(frame: &Frame, opts: &DecodeOptions) -> DecodedPayload {
    match decode(frame, opts) {
        Ok(data) => DecodedPayload::ok(data),
        Err(err) => DecodedPayload::err(&err),
    }
}

/// Decode an uplink frame (sentinel suppression off).
pub fn decode_uplink(frame: &Frame) -> DecodedPayload {
    decode_uplink_with(frame, &DecodeOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datetime_response() {
        let result = decode_uplink(&Frame::new(vec![0x64, 0x7E, 0xD4, 0x80, 0x01], 0x20));
        assert!(result.errors.is_empty());
        assert_eq!(
            result.data,
            json!({"unixtime": 1686033536u32, "rtc_source": "RTC"})
        );
    }

    #[test]
    fn test_lw_config_response() {
        let result = decode_uplink(&Frame::new(vec![0x01, 0x2C, 0x02, 0x58, 0x80], 0x36));
        assert_eq!(
            result.data,
            json!({"sleep_interval": 300, "sleep_interval_long": 600, "lw_status_interval": 128})
        );
    }

    #[test]
    fn test_lw_status_response() {
        let result = decode_uplink(&Frame::new(vec![0x74, 0x0E, 0x00], 0x38));
        assert_eq!(result.data, json!({"ubatt_mv": 3700, "long_sleep": 0}));
    }

    #[test]
    fn test_ws_timeout_response_accepts_0xff() {
        let result = decode_uplink(&Frame::new(vec![0xFF], 0xC0));
        assert_eq!(result.data, json!({"ws_timeout": 255}));
    }

    #[test]
    fn test_unknown_port() {
        let result = decode_uplink(&Frame::new(vec![0x00], 0xFF));
        assert_eq!(result.errors, vec!["unknown FPort".to_string()]);
        assert_eq!(result.data, json!({}));
    }

    #[test]
    fn test_ble_addr_response() {
        let result = decode_uplink(&Frame::new(
            vec![0xAA, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF],
            0xD2,
        ));
        assert_eq!(
            result.data,
            json!({"ble_addr": ["aa:ab:ac:ad:ae:af", "ba:bb:bc:bd:be:bf"]})
        );
    }
}
