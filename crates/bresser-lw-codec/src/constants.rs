//! Protocol constants
//!
//! Port numbers ("FPort") select which command or telemetry schema applies
//! to a frame. Uplink responses to configuration requests are sent on the
//! same port as the request.

/// Port used for periodic sensor-data uplinks.
pub const PORT_TELEMETRY: u8 = 0x01;

// ============================================================================
// Command Ports (downlink request / uplink response)
// ============================================================================

/// Request the current date/time and RTC sync source.
pub const CMD_GET_DATETIME: u8 = 0x20;
/// Set the date/time from a Unix epoch value.
pub const CMD_SET_DATETIME: u8 = 0x21;
/// Set the regular sleep interval in seconds.
pub const CMD_SET_SLEEP_INTERVAL: u8 = 0x31;
/// Set the long sleep interval (low battery) in seconds.
pub const CMD_SET_SLEEP_INTERVAL_LONG: u8 = 0x33;
/// Set the LoRaWAN status uplink interval in frames.
pub const CMD_SET_LW_STATUS_INTERVAL: u8 = 0x35;
/// Request the LoRaWAN configuration.
pub const CMD_GET_LW_CONFIG: u8 = 0x36;
/// Request the LoRaWAN layer status (battery voltage, sleep mode).
pub const CMD_GET_LW_STATUS: u8 = 0x38;
/// Request the app status uplink interval.
pub const CMD_GET_APP_STATUS_INTERVAL: u8 = 0x40;
/// Set the app status uplink interval in frames.
pub const CMD_SET_APP_STATUS_INTERVAL: u8 = 0x41;
/// Request the sensor status bitmaps.
pub const CMD_GET_SENSORS_STAT: u8 = 0x42;
/// Request the app payload configuration bitmaps.
pub const CMD_GET_APP_PAYLOAD_CFG: u8 = 0x46;
/// Set the app payload configuration bitmaps.
pub const CMD_SET_APP_PAYLOAD_CFG: u8 = 0x47;
/// Request the weather sensor receive timeout.
pub const CMD_GET_WS_TIMEOUT: u8 = 0xC0;
/// Set the weather sensor receive timeout in seconds.
pub const CMD_SET_WS_TIMEOUT: u8 = 0xC1;
/// Reset rain gauge / lightning post-processing state.
pub const CMD_RESET_WS_POSTPROC: u8 = 0xC3;
/// Run a sensor scan for the given number of seconds.
pub const CMD_SCAN_SENSORS: u8 = 0xC4;
/// Request the sensor include list.
pub const CMD_GET_SENSORS_INC: u8 = 0xC6;
/// Set the sensor include list (sensor IDs).
pub const CMD_SET_SENSORS_INC: u8 = 0xC7;
/// Request the sensor exclude list.
pub const CMD_GET_SENSORS_EXC: u8 = 0xC8;
/// Set the sensor exclude list (sensor IDs).
pub const CMD_SET_SENSORS_EXC: u8 = 0xC9;
/// Request the sensor receiver configuration.
pub const CMD_GET_SENSORS_CFG: u8 = 0xCA;
/// Set the sensor receiver configuration.
pub const CMD_SET_SENSORS_CFG: u8 = 0xCB;
/// Request the post-processing update interval.
pub const CMD_GET_WS_POSTPROC: u8 = 0xCC;
/// Set the post-processing update interval in minutes (0: auto).
pub const CMD_SET_WS_POSTPROC: u8 = 0xCD;
/// Request the BLE scan configuration.
pub const CMD_GET_BLE_CONFIG: u8 = 0xD0;
/// Set the BLE scan configuration (mode, scan time).
pub const CMD_SET_BLE_CONFIG: u8 = 0xD1;
/// Request the list of known BLE sensor addresses.
pub const CMD_GET_BLE_ADDR: u8 = 0xD2;
/// Set the list of known BLE sensor addresses.
pub const CMD_SET_BLE_ADDR: u8 = 0xD3;

// ============================================================================
// Lookup Tables
// ============================================================================

/// Source of the real-time clock setting, indexed by wire value.
pub const RTC_SOURCES: [&str; 5] = [
    "GPS",
    "RTC",
    "LORA",
    "unsynched",
    "set (source unknown)",
];

/// Radio decoder names reported by a sensor scan, indexed by the upper
/// nibble of the info byte.
pub const SCAN_DECODERS: [&str; 5] = ["5-in-1", "6-in-1", "7-in-1", "Lightning", "Leakage"];

/// Sensor type names reported by a sensor scan, indexed by the lower
/// nibble of the info byte.
pub const SENSOR_TYPES: [&str; 16] = [
    "Weather Sensor",
    "Weather Sensor",
    "Thermo-/Hygro-Sensor",
    "Pool / Spa Thermometer",
    "Soil Temperature and Moisture Sensor",
    "Water Leakage Sensor",
    "reserved",
    "reserved",
    "Air Quality Sensor (PM)",
    "Lightning Sensor",
    "CO2 Sensor",
    "Air Quality Sensor (HCHO/VOC)",
    "CO Sensor",
    "reserved",
    "reserved",
    "reserved",
];

/// Number of per-type channel bitmaps in the payload configuration.
pub const BRESSER_BITMAP_COUNT: usize = 16;

/// Size of one sensor-scan result entry in bytes.
pub const SCAN_ENTRY_SIZE: usize = 9;

/// Size of the sensor status block in bytes.
pub const SENSOR_STATUS_SIZE: usize = 26;
