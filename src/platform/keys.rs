//! Platform vocabulary: state-store keys, values, subscription topics and the
//! small enumerations reported by platform services.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys of the platform key-value state store
///
/// Serialized with the platform's own key names so event scripts can use them
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKey {
    /// Bitmask of connected bluetooth profiles (`bt_device` constants)
    #[serde(rename = "memory/bluetooth/device")]
    BtDevice,
    /// Wi-Fi Direct state (`WifiDirectState`)
    #[serde(rename = "memory/wifi_direct/state")]
    WifiDirectState,
    /// Battery capacity in percent
    #[serde(rename = "memory/sysman/battery_capacity")]
    BatteryCapacity,
    /// Whether the charger is feeding the battery
    #[serde(rename = "memory/sysman/battery_charge_now")]
    BatteryCharging,
    /// Wi-Fi connection state (`WifiState`)
    #[serde(rename = "memory/wifi/state")]
    WifiState,
    /// Wi-Fi signal strength, 0-4
    #[serde(rename = "memory/wifi/strength")]
    WifiStrength,
    /// Cellular signal strength of the first SIM, 0-5, negative without service
    #[serde(rename = "memory/telephony/rssi")]
    RssiSim1,
    /// Cellular signal strength of the second SIM
    #[serde(rename = "memory/telephony/rssi2")]
    RssiSim2,
    /// Whether a USB host is connected
    #[serde(rename = "memory/sysman/usb_status")]
    UsbConnected,
    /// Region time format, 1 = 12 hour, 2 = 24 hour
    #[serde(rename = "db/menu_widget/regionformat_time1224")]
    TimeFormat,
    /// Current display language, e.g. `en_US.UTF-8`
    #[serde(rename = "db/menu_widget/language")]
    Language,
    /// Current region format, e.g. `en_US.UTF-8`
    #[serde(rename = "db/menu_widget/regionformat")]
    Region,
    /// Lock screen state (`LockState`)
    #[serde(rename = "db/idle_lock/state")]
    LockState,
}

impl StateKey {
    /// Platform name of the key
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BtDevice => "memory/bluetooth/device",
            Self::WifiDirectState => "memory/wifi_direct/state",
            Self::BatteryCapacity => "memory/sysman/battery_capacity",
            Self::BatteryCharging => "memory/sysman/battery_charge_now",
            Self::WifiState => "memory/wifi/state",
            Self::WifiStrength => "memory/wifi/strength",
            Self::RssiSim1 => "memory/telephony/rssi",
            Self::RssiSim2 => "memory/telephony/rssi2",
            Self::UsbConnected => "memory/sysman/usb_status",
            Self::TimeFormat => "db/menu_widget/regionformat_time1224",
            Self::Language => "db/menu_widget/language",
            Self::Region => "db/menu_widget/regionformat",
            Self::LockState => "db/idle_lock/state",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held by the state store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i32),
    /// String value
    Str(String),
}

/// Identity of a notification subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Changes of a state-store key
    Key(StateKey),
    /// NFC activation changes
    NfcActivation,
    /// Call-manager mute status changes
    CallMute,
    /// Call-manager audio route changes
    CallAudio,
    /// Notification area overflow changes
    NotificationOverflow,
    /// Minute ticks of the wall clock
    TimeTick,
    /// Display power state changes
    DisplayState,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "key {key}"),
            Self::NfcActivation => f.write_str("nfc activation"),
            Self::CallMute => f.write_str("call mute status"),
            Self::CallAudio => f.write_str("call audio state"),
            Self::NotificationOverflow => f.write_str("notification overflow"),
            Self::TimeTick => f.write_str("time tick"),
            Self::DisplayState => f.write_str("display state"),
        }
    }
}

/// Bluetooth device-connection bits carried by `StateKey::BtDevice`
pub mod bt_device {
    /// No device connected
    pub const NONE: i32 = 0x0000;
    /// Hands-free headset connected
    pub const HEADSET_CONNECTED: i32 = 0x0004;
    /// A2DP stereo headset connected
    pub const A2DP_HEADSET_CONNECTED: i32 = 0x0008;
    /// HID device connected
    pub const HID_CONNECTED: i32 = 0x0010;
    /// PAN device connected
    pub const PAN_CONNECTED: i32 = 0x0020;
    /// SIM access profile connected
    pub const SAP_CONNECTED: i32 = 0x0040;
    /// Phone book access profile connected
    pub const PBAP_CONNECTED: i32 = 0x0080;
}

/// Bluetooth adapter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterState {
    /// Adapter powered off
    Disabled,
    /// Adapter powered on
    Enabled,
}

/// Wi-Fi Direct states as stored under `StateKey::WifiDirectState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiDirectState {
    /// Off
    Deactivated,
    /// On, idle
    Activated,
    /// Scanning for peers
    Discovering,
    /// Connected to a peer
    Connected,
    /// Acting as group owner
    GroupOwner,
    /// Turning on
    Activating,
    /// Turning off
    Deactivating,
    /// Connecting to a peer
    Connecting,
    /// Disconnecting from a peer
    Disconnecting,
}

impl WifiDirectState {
    /// Decode the raw store value
    pub const fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Deactivated,
            1 => Self::Activated,
            2 => Self::Discovering,
            3 => Self::Connected,
            4 => Self::GroupOwner,
            5 => Self::Activating,
            6 => Self::Deactivating,
            7 => Self::Connecting,
            8 => Self::Disconnecting,
            _ => return None,
        })
    }
}

/// Wi-Fi connection state as stored under `StateKey::WifiState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    /// Radio off
    Off,
    /// Radio on, not associated
    Unconnected,
    /// Associated with an access point
    Connected,
}

impl WifiState {
    /// Decode the raw store value
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::Unconnected),
            2 => Some(Self::Connected),
            _ => None,
        }
    }
}

/// Region time format as stored under `StateKey::TimeFormat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// 12-hour clock with meridiem
    #[default]
    Hour12,
    /// 24-hour clock
    Hour24,
}

impl TimeFormat {
    /// Decode the raw store value, anything but 2 is treated as 12 hour
    pub const fn from_raw(raw: i32) -> Self {
        if raw == 2 { Self::Hour24 } else { Self::Hour12 }
    }
}

/// Lock screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Device unlocked
    Unlock,
    /// Lock screen shown
    Lock,
    /// Lock screen being launched
    LaunchingLock,
}

impl LockState {
    /// Decode the raw store value
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Unlock),
            1 => Some(Self::Lock),
            2 => Some(Self::LaunchingLock),
            _ => None,
        }
    }
}

/// Call-manager mute status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuteStatus {
    /// Microphone muted
    On,
    /// Microphone live
    Off,
}

/// Call-manager audio route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioState {
    /// No active route
    None,
    /// Handset receiver
    Receiver,
    /// Loudspeaker
    Speaker,
    /// Wired earjack
    Earjack,
    /// Bluetooth audio
    Bluetooth,
}

/// Display power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// Screen on at full brightness
    Normal,
    /// Screen dimmed
    Dim,
    /// Screen off
    ScreenOff,
}

/// Mini-controller lifecycle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinictrlAction {
    /// A mini-controller appeared
    Start,
    /// A mini-controller went away
    Stop,
    /// A mini-controller changed size
    Resize,
    /// A mini-controller asked for attention
    Request,
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
}
