//! Downlink commands.
//!
//! A downlink is selected by which keys are present in the input record,
//! not by port. [`DownlinkCommand::from_record`] performs that dispatch in
//! a fixed priority order and the first matching key set wins; keeping the
//! order identical to the device firmware is what makes encodings
//! bit-compatible when a record could satisfy more than one command.
//! Commands with several keys (receiver configuration, payload
//! configuration, BLE configuration) require all of their keys.

use serde_json::{Map, Value};

use crate::constants::*;
use crate::error::{CodecError, CodecResult};
use crate::field::{parse_hex_bytes, parse_mac48};

/// A downlink command with its payload fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownlinkCommand {
    /// Request date/time and RTC source.
    GetDateTime,
    /// Request the LoRaWAN configuration.
    GetLwConfig,
    /// Request the LoRaWAN layer status.
    GetLwStatus,
    /// Request the weather sensor timeout.
    GetWsTimeout,
    /// Request the post-processing update interval.
    GetWsPostproc,
    /// Request the app status uplink interval.
    GetAppStatusInterval,
    /// Request the sensor status bitmaps.
    GetSensorsStat,
    /// Request the sensor include list.
    GetSensorsInc,
    /// Request the sensor exclude list.
    GetSensorsExc,
    /// Request the sensor receiver configuration.
    GetSensorsCfg,
    /// Request the app payload configuration.
    GetAppPayloadCfg,
    /// Request the known BLE addresses.
    GetBleAddr,
    /// Request the BLE scan configuration.
    GetBleConfig,
    /// Set the sleep interval in seconds.
    SetSleepInterval(u16),
    /// Set the long sleep interval in seconds.
    SetSleepIntervalLong(u16),
    /// Set the LoRaWAN status uplink interval in frames.
    SetLwStatusInterval(u8),
    /// Set the date/time from a Unix epoch value.
    SetDateTime(u32),
    /// Set the weather sensor receive timeout in seconds.
    SetWsTimeout(u8),
    /// Set the post-processing update interval in minutes.
    SetWsPostproc(u8),
    /// Reset post-processing state (bit 0: hourly, 1: daily, 2: weekly,
    /// 3: monthly).
    ResetWsPostproc(u8),
    /// Scan for sensors for the given number of seconds.
    ScanSensors(u8),
    /// Set the app status uplink interval in frames.
    SetAppStatusInterval(u8),
    /// Set the sensor include list.
    SetSensorsInc(Vec<[u8; 4]>),
    /// Set the sensor exclude list.
    SetSensorsExc(Vec<[u8; 4]>),
    /// Set the sensor receiver configuration.
    SetSensorsCfg {
        /// Max sensors per receive cycle.
        max_sensors: u8,
        /// Receiver flags.
        rx_flags: u8,
        /// Enabled decoders.
        en_decoders: u8,
    },
    /// Set the app payload configuration bitmaps.
    SetAppPayloadCfg {
        /// Per-sensor-type channel bitmaps.
        bresser: [u8; BRESSER_BITMAP_COUNT],
        /// 1-Wire sensor bitmap.
        onewire: [u8; 2],
        /// Analog input channel bitmap.
        analog: [u8; 2],
        /// Digital input channel bitmap.
        digital: [u8; 4],
    },
    /// Set the known BLE sensor addresses.
    SetBleAddr(Vec<[u8; 6]>),
    /// Set the BLE scan configuration.
    SetBleConfig {
        /// Scan mode (0: passive, 1: active).
        ble_active: u8,
        /// Scan time in seconds.
        ble_scantime: u8,
    },
}

impl DownlinkCommand {
    /// Port this command is sent on.
    pub fn port(&self) -> u8 {
        use DownlinkCommand::*;
        match self {
            GetDateTime => CMD_GET_DATETIME,
            GetLwConfig => CMD_GET_LW_CONFIG,
            GetLwStatus => CMD_GET_LW_STATUS,
            GetWsTimeout => CMD_GET_WS_TIMEOUT,
            GetWsPostproc => CMD_GET_WS_POSTPROC,
            GetAppStatusInterval => CMD_GET_APP_STATUS_INTERVAL,
            GetSensorsStat => CMD_GET_SENSORS_STAT,
            GetSensorsInc => CMD_GET_SENSORS_INC,
            GetSensorsExc => CMD_GET_SENSORS_EXC,
            GetSensorsCfg => CMD_GET_SENSORS_CFG,
            GetAppPayloadCfg => CMD_GET_APP_PAYLOAD_CFG,
            GetBleAddr => CMD_GET_BLE_ADDR,
            GetBleConfig => CMD_GET_BLE_CONFIG,
            SetSleepInterval(_) => CMD_SET_SLEEP_INTERVAL,
            SetSleepIntervalLong(_) => CMD_SET_SLEEP_INTERVAL_LONG,
            SetLwStatusInterval(_) => CMD_SET_LW_STATUS_INTERVAL,
            SetDateTime(_) => CMD_SET_DATETIME,
            SetWsTimeout(_) => CMD_SET_WS_TIMEOUT,
            SetWsPostproc(_) => CMD_SET_WS_POSTPROC,
            ResetWsPostproc(_) => CMD_RESET_WS_POSTPROC,
            ScanSensors(_) => CMD_SCAN_SENSORS,
            SetAppStatusInterval(_) => CMD_SET_APP_STATUS_INTERVAL,
            SetSensorsInc(_) => CMD_SET_SENSORS_INC,
            SetSensorsExc(_) => CMD_SET_SENSORS_EXC,
            SetSensorsCfg { .. } => CMD_SET_SENSORS_CFG,
            SetAppPayloadCfg { .. } => CMD_SET_APP_PAYLOAD_CFG,
            SetBleAddr(_) => CMD_SET_BLE_ADDR,
            SetBleConfig { .. } => CMD_SET_BLE_CONFIG,
        }
    }

    /// Select a command from the keys present in a record.
    ///
    /// Tests keys in the table's priority order; the first match wins and
    /// only one command can be produced per call.
    pub fn from_record(data: &Map<String, Value>) -> CodecResult<Self> {
        use DownlinkCommand::*;

        if let Some(cmd) = data.get("cmd").and_then(Value::as_str) {
            match cmd {
                "CMD_GET_DATETIME" => return Ok(GetDateTime),
                "CMD_GET_LW_CONFIG" => return Ok(GetLwConfig),
                "CMD_GET_LW_STATUS" => return Ok(GetLwStatus),
                "CMD_GET_WS_TIMEOUT" => return Ok(GetWsTimeout),
                "CMD_GET_WS_POSTPROC" => return Ok(GetWsPostproc),
                "CMD_GET_APP_STATUS_INTERVAL" => return Ok(GetAppStatusInterval),
                "CMD_GET_SENSORS_STAT" => return Ok(GetSensorsStat),
                "CMD_GET_SENSORS_INC" => return Ok(GetSensorsInc),
                "CMD_GET_SENSORS_EXC" => return Ok(GetSensorsExc),
                "CMD_GET_SENSORS_CFG" => return Ok(GetSensorsCfg),
                "CMD_GET_APP_PAYLOAD_CFG" => return Ok(GetAppPayloadCfg),
                "CMD_GET_BLE_ADDR" => return Ok(GetBleAddr),
                "CMD_GET_BLE_CONFIG" => return Ok(GetBleConfig),
                // an unrecognized cmd string falls through to the value keys
                _ => {}
            }
        }
        if data.contains_key("sleep_interval") {
            return Ok(SetSleepInterval(uint_value(data, "sleep_interval")?));
        }
        if data.contains_key("sleep_interval_long") {
            return Ok(SetSleepIntervalLong(uint_value(data, "sleep_interval_long")?));
        }
        if data.contains_key("lw_status_interval") {
            return Ok(SetLwStatusInterval(uint_value(data, "lw_status_interval")?));
        }
        if data.contains_key("epoch") {
            return Ok(SetDateTime(int_or_hex_value(data, "epoch")?));
        }
        if data.contains_key("ws_timeout") {
            return Ok(SetWsTimeout(uint_value(data, "ws_timeout")?));
        }
        if data.contains_key("update_interval") {
            return Ok(SetWsPostproc(uint_value(data, "update_interval")?));
        }
        if data.contains_key("reset_flags") {
            return Ok(ResetWsPostproc(int_or_hex_value(data, "reset_flags")?));
        }
        if data.contains_key("ws_scantime") {
            return Ok(ScanSensors(uint_value(data, "ws_scantime")?));
        }
        if data.contains_key("app_status_interval") {
            return Ok(SetAppStatusInterval(uint_value(data, "app_status_interval")?));
        }
        if data.contains_key("sensors_inc") {
            return Ok(SetSensorsInc(id_list(data, "sensors_inc")?));
        }
        if data.contains_key("sensors_exc") {
            return Ok(SetSensorsExc(id_list(data, "sensors_exc")?));
        }
        if data.contains_key("max_sensors")
            && data.contains_key("rx_flags")
            && data.contains_key("en_decoders")
        {
            return Ok(SetSensorsCfg {
                max_sensors: uint_value(data, "max_sensors")?,
                rx_flags: uint_value(data, "rx_flags")?,
                en_decoders: uint_value(data, "en_decoders")?,
            });
        }
        if data.contains_key("bresser")
            && data.contains_key("onewire")
            && data.contains_key("analog")
            && data.contains_key("digital")
        {
            return payload_cfg(data);
        }
        if data.contains_key("ble_addr") {
            return Ok(SetBleAddr(mac_list(data, "ble_addr")?));
        }
        if data.contains_key("ble_active") && data.contains_key("ble_scantime") {
            return Ok(SetBleConfig {
                ble_active: uint_value(data, "ble_active")?,
                ble_scantime: uint_value(data, "ble_scantime")?,
            });
        }
        Err(CodecError::UnknownCommand)
    }

    /// Encode this command to payload bytes plus its port.
    ///
    /// "Get" queries carry the canonical one-byte zero payload.
    pub fn encode(&self) -> (Vec<u8>, u8) {
        use DownlinkCommand::*;
        let bytes = match self {
            GetDateTime | GetLwConfig | GetLwStatus | GetWsTimeout | GetWsPostproc
            | GetAppStatusInterval | GetSensorsStat | GetSensorsInc | GetSensorsExc
            | GetSensorsCfg | GetAppPayloadCfg | GetBleAddr | GetBleConfig => vec![0x00],
            SetSleepInterval(secs) => secs.to_be_bytes().to_vec(),
            SetSleepIntervalLong(secs) => secs.to_be_bytes().to_vec(),
            SetLwStatusInterval(frames) => vec![*frames],
            SetDateTime(epoch) => epoch.to_be_bytes().to_vec(),
            SetWsTimeout(secs) => vec![*secs],
            SetWsPostproc(minutes) => vec![*minutes],
            ResetWsPostproc(flags) => vec![*flags],
            ScanSensors(secs) => vec![*secs],
            SetAppStatusInterval(frames) => vec![*frames],
            SetSensorsInc(ids) | SetSensorsExc(ids) => {
                ids.iter().flatten().copied().collect()
            }
            SetSensorsCfg {
                max_sensors,
                rx_flags,
                en_decoders,
            } => vec![*max_sensors, *rx_flags, *en_decoders],
            SetAppPayloadCfg {
                bresser,
                onewire,
                analog,
                digital,
            } => {
                let mut buf = Vec::with_capacity(BRESSER_BITMAP_COUNT + 8);
                buf.extend_from_slice(bresser);
                buf.extend_from_slice(onewire);
                buf.extend_from_slice(analog);
                buf.extend_from_slice(digital);
                buf
            }
            SetBleAddr(addrs) => addrs.iter().flatten().copied().collect(),
            SetBleConfig {
                ble_active,
                ble_scantime,
            } => vec![*ble_active, *ble_scantime],
        };
        (bytes, self.port())
    }
}

/// Read an unsigned integer record value, range-checked for the target
/// integer width.
fn uint_value<T>(data: &Map<String, Value>, key: &'static str) -> CodecResult<T>
where
    T: TryFrom<u64> + num_max::Max,
{
    let value = data
        .get(key)
        .and_then(Value::as_u64)
        .ok_or(CodecError::InvalidValueType { field: key })?;
    T::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
        field: key,
        value,
        max: T::MAX_VALUE,
    })
}

/// Integer widths usable in downlink payload fields.
mod num_max {
    pub trait Max {
        const MAX_VALUE: u64;
    }
    impl Max for u8 {
        const MAX_VALUE: u64 = u8::MAX as u64;
    }
    impl Max for u16 {
        const MAX_VALUE: u64 = u16::MAX as u64;
    }
    impl Max for u32 {
        const MAX_VALUE: u64 = u32::MAX as u64;
    }
}

/// Read a record value given either as an integer or as a `0x`-prefixed
/// hex string.
fn int_or_hex_value<T>(data: &Map<String, Value>, key: &'static str) -> CodecResult<T>
where
    T: TryFrom<u64> + num_max::Max,
{
    match data.get(key) {
        Some(Value::String(s)) => {
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .ok_or(CodecError::invalid_hex())?;
            let value =
                u64::from_str_radix(digits, 16).map_err(|_| CodecError::invalid_hex())?;
            T::try_from(value).map_err(|_| CodecError::ValueOutOfRange {
                field: key,
                value,
                max: T::MAX_VALUE,
            })
        }
        _ => uint_value(data, key),
    }
}

/// Parse a string-array record value of `0x`-prefixed 32-bit IDs.
fn id_list(data: &Map<String, Value>, key: &'static str) -> CodecResult<Vec<[u8; 4]>> {
    let entries = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or(CodecError::InvalidValueType { field: key })?;
    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let s = entry
            .as_str()
            .ok_or(CodecError::InvalidValueType { field: key })?;
        let bytes = parse_hex_bytes(s, key, 4)?;
        ids.push([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    Ok(ids)
}

/// Parse a string-array record value of colon-separated MAC addresses.
fn mac_list(data: &Map<String, Value>, key: &'static str) -> CodecResult<Vec<[u8; 6]>> {
    let entries = data
        .get(key)
        .and_then(Value::as_array)
        .ok_or(CodecError::InvalidValueType { field: key })?;
    let mut addrs = Vec::with_capacity(entries.len());
    for entry in entries {
        let s = entry
            .as_str()
            .ok_or(CodecError::InvalidValueType { field: key })?;
        let bytes = parse_mac48(s, key)?;
        addrs.push([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]);
    }
    Ok(addrs)
}

/// Assemble the four-key payload-configuration command.
fn payload_cfg(data: &Map<String, Value>) -> CodecResult<DownlinkCommand> {
    let entries = data
        .get("bresser")
        .and_then(Value::as_array)
        .ok_or(CodecError::InvalidValueType { field: "bresser" })?;
    if entries.len() != BRESSER_BITMAP_COUNT {
        return Err(CodecError::BadArrayLength {
            field: "bresser",
            expected: BRESSER_BITMAP_COUNT,
            actual: entries.len(),
        });
    }
    let mut bresser = [0u8; BRESSER_BITMAP_COUNT];
    for (slot, entry) in bresser.iter_mut().zip(entries) {
        let s = entry
            .as_str()
            .ok_or(CodecError::InvalidValueType { field: "bresser" })?;
        *slot = parse_hex_bytes(s, "bresser", 1)?[0];
    }
    let hex_field = |key: &'static str, width: usize| -> CodecResult<Vec<u8>> {
        let s = data
            .get(key)
            .and_then(Value::as_str)
            .ok_or(CodecError::InvalidValueType { field: key })?;
        parse_hex_bytes(s, key, width)
    };
    let onewire = hex_field("onewire", 2)?;
    let analog = hex_field("analog", 2)?;
    let digital = hex_field("digital", 4)?;
    Ok(DownlinkCommand::SetAppPayloadCfg {
        bresser,
        onewire: [onewire[0], onewire[1]],
        analog: [analog[0], analog[1]],
        digital: [digital[0], digital[1], digital[2], digital[3]],
    })
}
