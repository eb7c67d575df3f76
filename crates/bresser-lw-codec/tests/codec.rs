//! End-to-end codec tests against the reference fixtures captured from the
//! device firmware.

use bresser_lw_codec::{
    decode_downlink, decode_uplink, decode_uplink_with, encode_downlink, DecodeOptions, Frame,
};
use serde_json::json;

/// The 49-byte sensor-data frame with every payload feature enabled.
#[rustfmt::skip]
const TELEMETRY_FRAME: &[u8] = &[
    7, 238, 42,                               // ws_temp_c, ws_humidity
    0x66, 0x66, 0x67, 0x44,                   // ws_rain_mm
    7, 0, 7, 0, 168, 7,                       // wind gust, avg, direction
    0x00, 0x00, 0x00, 0x00,                   // ws_rain_hourly_mm
    0x00, 0x00, 0x80, 0xBF,                   // ws_rain_daily_mm
    0x00, 0x00, 0x80, 0xBF,                   // ws_rain_weekly_mm
    0x00, 0x00, 0x80, 0xBF,                   // ws_rain_monthly_mm
    0x0B, 0xB4, 0x32,                         // th1_temp_c, th1_humidity
    0x0A, 0x00, 0x28,                         // soil1_temp_c, soil1_moisture
    0x83, 0xD5, 0xB9, 0x68, 0x10, 0x00, 0x08, // lightning event
    0x12, 0x00,                               // ow0_temp_c
    0x49, 0x10,                               // a0_voltage_mv
    0x0C, 0x00, 0x1E,                         // ble0_temp_c, ble0_humidity
];

#[test]
fn decode_uplink_telemetry_frame() {
    let result = decode_uplink(&Frame::new(TELEMETRY_FRAME.to_vec(), 0x01));
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
    assert_eq!(
        result.data,
        json!({
            "ws_temp_c": "20.3",
            "ws_humidity": 42,
            "ws_rain_mm": "925.6",
            "ws_wind_gust_ms": "0.7",
            "ws_wind_avg_ms": "0.7",
            "ws_wind_dir_deg": "196.0",
            "ws_rain_hourly_mm": "0.0",
            "ws_rain_daily_mm": "-1.0",
            "ws_rain_weekly_mm": "-1.0",
            "ws_rain_monthly_mm": "-1.0",
            "th1_temp_c": "30.0",
            "th1_humidity": 50,
            "soil1_temp_c": "25.6",
            "soil1_moisture": 40,
            "lgt_ev_time": {
                "time": "2025-09-04T18:08:03.000Z",
                "timestamp": 1757009283u32
            },
            "lgt_ev_events": 16,
            "lgt_ev_dist_km": 8,
            "ow0_temp_c": "46.1",
            "a0_voltage_mv": 4169,
            "ble0_temp_c": "30.7",
            "ble0_humidity": 30
        })
    );
}

#[test]
fn decode_uplink_telemetry_quarter_step_rain() {
    // a rain counter landing on an exact quarter fraction rounds up
    let mut frame = TELEMETRY_FRAME.to_vec();
    frame[3..7].copy_from_slice(&[0x00, 0x00, 0xA0, 0x3F]); // f32 1.25
    let result = decode_uplink(&Frame::new(frame, 0x01));
    assert!(result.errors.is_empty());
    assert_eq!(result.data["ws_rain_mm"], json!("1.3"));
}

#[test]
fn decode_uplink_telemetry_sentinel_suppression() {
    let mut frame = TELEMETRY_FRAME.to_vec();
    frame[2] = 0xFF; // ws_humidity
    frame[44] = 0xFF; // a0_voltage_mv
    frame[45] = 0xFF;

    let skipped = decode_uplink_with(
        &Frame::new(frame.clone(), 0x01),
        &DecodeOptions { skip_invalid: true },
    );
    assert!(skipped.errors.is_empty());
    assert!(skipped.data.get("ws_humidity").is_none());
    assert!(skipped.data.get("a0_voltage_mv").is_none());
    // following fields still decode from their original offsets
    assert_eq!(skipped.data["ble0_humidity"], json!(30));

    // policy off: sentinels surface as plain numbers
    let raw = decode_uplink(&Frame::new(frame, 0x01));
    assert_eq!(raw.data["ws_humidity"], json!(255));
    assert_eq!(raw.data["a0_voltage_mv"], json!(65535));
}

#[test]
fn decode_uplink_datetime_all_sources() {
    for (code, source) in [
        (0x00, "GPS"),
        (0x01, "RTC"),
        (0x02, "LORA"),
        (0x03, "unsynched"),
        (0x04, "set (source unknown)"),
    ] {
        let result = decode_uplink(&Frame::new(vec![0x64, 0x7E, 0xD4, 0x80, code], 0x20));
        assert_eq!(
            result.data,
            json!({"unixtime": 1686033536u32, "rtc_source": source})
        );
    }
}

#[test]
fn decode_uplink_sensor_status() {
    let result = decode_uplink(&Frame::new(
        vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F, 0x10, 0x11, 0x20, 0x21, 0x30, 0x31, 0x32, 0x33, 0x40, 0x41, 0x42, 0x43,
            0x50, 0x51,
        ],
        0x42,
    ));
    assert_eq!(
        result.data,
        json!({
            "sensor_status": {
                "bresser": [
                    "0x00", "0x01", "0x02", "0x03", "0x04", "0x05", "0x06", "0x07",
                    "0x08", "0x09", "0x0a", "0x0b", "0x0c", "0x0d", "0x0e", "0x0f"
                ],
                "ble": "0x4041"
            }
        })
    );
}

#[test]
fn decode_uplink_scan_result() {
    let result = decode_uplink(&Frame::new(
        vec![0xFE, 0xED, 0xBE, 0xEF, 0x12, 0x01, 0x34, 0x12, 0x55],
        0xC4,
    ));
    assert_eq!(
        result.data,
        json!({
            "found_sensors": [{
                "id": "0xfeedbeef",
                "decoder": "6-in-1",
                "type": "Thermo-/Hygro-Sensor",
                "ch": 1,
                "flags": "0x1234",
                "rssi": -85
            }]
        })
    );
}

#[test]
fn decode_uplink_sensor_lists() {
    let inc = decode_uplink(&Frame::new(
        vec![0x00, 0x01, 0x02, 0x03, 0x10, 0x11, 0x12, 0x13],
        0xC6,
    ));
    assert_eq!(inc.data, json!({"sensors_inc": ["0x00010203", "0x10111213"]}));

    let exc = decode_uplink(&Frame::new(
        vec![0x20, 0x21, 0x22, 0x23, 0x30, 0x31, 0x32, 0x33],
        0xC8,
    ));
    assert_eq!(exc.data, json!({"sensors_exc": ["0x20212223", "0x30313233"]}));
}

#[test]
fn decode_uplink_config_responses() {
    let cfg = decode_uplink(&Frame::new(vec![0x04, 0x0F, 0x0A], 0xCA));
    assert_eq!(
        cfg.data,
        json!({"max_sensors": 4, "rx_flags": 15, "en_decoders": 10})
    );

    let ble = decode_uplink(&Frame::new(vec![0x01, 0x20], 0xD0));
    assert_eq!(ble.data, json!({"ble_active": 1, "ble_scantime": 32}));

    let postproc = decode_uplink(&Frame::new(vec![0x06], 0xCC));
    assert_eq!(postproc.data, json!({"update_interval": 6}));

    let interval = decode_uplink(&Frame::new(vec![0x40], 0x40));
    assert_eq!(interval.data, json!({"app_status_interval": 64}));
}

#[test]
fn encode_downlink_get_commands() {
    let expected = [
        ("CMD_GET_DATETIME", 0x20u8),
        ("CMD_GET_LW_CONFIG", 0x36),
        ("CMD_GET_LW_STATUS", 0x38),
        ("CMD_GET_APP_STATUS_INTERVAL", 0x40),
        ("CMD_GET_SENSORS_STAT", 0x42),
        ("CMD_GET_APP_PAYLOAD_CFG", 0x46),
        ("CMD_GET_WS_TIMEOUT", 0xC0),
        ("CMD_GET_SENSORS_INC", 0xC6),
        ("CMD_GET_SENSORS_EXC", 0xC8),
        ("CMD_GET_SENSORS_CFG", 0xCA),
        ("CMD_GET_WS_POSTPROC", 0xCC),
        ("CMD_GET_BLE_CONFIG", 0xD0),
        ("CMD_GET_BLE_ADDR", 0xD2),
    ];
    for (cmd, port) in expected {
        let result = encode_downlink(&json!({"cmd": cmd}));
        assert!(result.errors.is_empty(), "encode failed for {cmd}");
        assert_eq!(result.bytes, vec![0x00], "bad payload for {cmd}");
        assert_eq!(result.port, port, "bad port for {cmd}");
    }
}

#[test]
fn encode_downlink_set_commands() {
    let cases = [
        (json!({"epoch": 1757009283u32}), vec![0x68, 0xB9, 0xD5, 0x83], 0x21u8),
        (json!({"sleep_interval": 300}), vec![0x01, 0x2C], 0x31),
        (json!({"sleep_interval_long": 600}), vec![0x02, 0x58], 0x33),
        (json!({"lw_status_interval": 30}), vec![0x1E], 0x35),
        (json!({"app_status_interval": 60}), vec![0x3C], 0x41),
        (json!({"ws_timeout": 128}), vec![0x80], 0xC1),
        (json!({"reset_flags": 15}), vec![0x0F], 0xC3),
        (json!({"ws_scantime": 180}), vec![0xB4], 0xC4),
        (
            json!({"sensors_inc": ["0x10111213", "0x20212223"]}),
            vec![0x10, 0x11, 0x12, 0x13, 0x20, 0x21, 0x22, 0x23],
            0xC7,
        ),
        (
            json!({"sensors_exc": ["0x30313233", "0x40414243"]}),
            vec![0x30, 0x31, 0x32, 0x33, 0x40, 0x41, 0x42, 0x43],
            0xC9,
        ),
        (
            json!({"max_sensors": 4, "rx_flags": 10, "en_decoders": 15}),
            vec![0x04, 0x0A, 0x0F],
            0xCB,
        ),
        (
            json!({"ble_addr": ["A0:B0:C0:D0:E0:F0", "0A:0B:0C:0D:0E:0F"]}),
            vec![0xA0, 0xB0, 0xC0, 0xD0, 0xE0, 0xF0, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F],
            0xD3,
        ),
        (
            json!({"ble_active": 1, "ble_scantime": 20}),
            vec![0x01, 0x14],
            0xD1,
        ),
    ];
    for (record, bytes, port) in cases {
        let result = encode_downlink(&record);
        assert!(result.errors.is_empty(), "encode failed for {record}");
        assert_eq!(result.bytes, bytes, "bad payload for {record}");
        assert_eq!(result.port, port, "bad port for {record}");
    }
}

#[test]
fn encode_downlink_payload_cfg() {
    let result = encode_downlink(&json!({
        "bresser": [
            "0x00", "0x01", "0x02", "0x03", "0x04", "0x05", "0x06", "0x07",
            "0x08", "0x09", "0x0A", "0x0B", "0x0C", "0x0D", "0x0E", "0x0F"
        ],
        "onewire": "0x1011",
        "analog": "0x2021",
        "digital": "0x30313233"
    }));
    assert!(result.errors.is_empty());
    assert_eq!(result.port, 0x47);
    assert_eq!(
        result.bytes,
        vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F, 0x10, 0x11, 0x20, 0x21, 0x30, 0x31, 0x32, 0x33
        ]
    );
}

#[test]
fn encode_downlink_errors() {
    let unknown = encode_downlink(&json!({"no_such_key": 1}));
    assert_eq!(unknown.errors, vec!["Unknown command".to_string()]);
    assert!(unknown.bytes.is_empty());

    let bad_hex = encode_downlink(&json!({"epoch": "deadbeef"}));
    assert_eq!(bad_hex.errors, vec!["Invalid hex value".to_string()]);

    let bad_bresser = encode_downlink(&json!({
        "bresser": ["0x00"],
        "onewire": "0x1011",
        "analog": "0x2021",
        "digital": "0x30313233"
    }));
    assert_eq!(
        bad_bresser.errors,
        vec!["<bresser>: expected 16 bytes, got 1".to_string()]
    );
}

#[test]
fn decode_downlink_fixtures() {
    let get = decode_downlink(&Frame::new(vec![0x00], 0x36));
    assert_eq!(get.data, json!([0]));

    let sleep = decode_downlink(&Frame::new(vec![0x01, 0x2C], 0x31));
    assert_eq!(sleep.data, json!({"sleep_interval": 300}));

    let cfg = decode_downlink(&Frame::new(
        vec![
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F, 0x10, 0x11, 0x20, 0x21, 0x30, 0x31, 0x32, 0x33,
        ],
        0x47,
    ));
    assert_eq!(
        cfg.data,
        json!({
            "bresser": [
                "0x00", "0x01", "0x02", "0x03", "0x04", "0x05", "0x06", "0x07",
                "0x08", "0x09", "0x0a", "0x0b", "0x0c", "0x0d", "0x0e", "0x0f"
            ],
            "onewire": "0x1011",
            "analog": "0x2021",
            "digital": "0x30313233"
        })
    );

    let unknown = decode_downlink(&Frame::new(vec![0x01, 0x02], 0xFF));
    assert_eq!(unknown.errors, vec!["unknown FPort".to_string()]);
    assert_eq!(unknown.data, json!({}));
}

#[test]
fn decode_downlink_payload_too_short() {
    let result = decode_downlink(&Frame::new(vec![0x01], 0x31));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("payload too short"));
    assert_eq!(result.data, json!({}));
}
