//! Platform integration module
//!
//! This module describes everything the indicator needs from the device: the
//! key-value state store, service queries (bluetooth adapter, NFC, clock),
//! the call-manager session, and notification subscriptions.
//!
//! # Overview
//!
//! - **`Platform` trait**: synchronous, non-blocking queries and fire-and-forget
//!   subscriptions. Implementations must be `Send + Sync` because producers and
//!   the shell loop live on different threads.
//! - **`PlatformEvent`**: the typed payload of a notification. A subscription to a
//!   `Topic` makes the platform deliver matching events over the event channel.
//! - **`MemoryPlatform`**: an in-memory implementation with failure injection,
//!   used by the binary's script runner and by tests.
//!
//! # Event Flow
//!
//! ```text
//! state change → Platform (subscribed?) → PlatformEvent → IndicatorShell → Registry → Module
//! ```

pub mod keys;
pub mod memory;

pub use keys::{
    AdapterState, AudioState, ClockTime, DisplayState, LockState, MinictrlAction, MuteStatus,
    StateKey, StateValue, TimeFormat, Topic, WifiDirectState, WifiState, bt_device,
};
pub use memory::MemoryPlatform;

use crate::error::Result;

/// Typed notification delivered for a subscribed `Topic`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// A state-store key changed
    KeyChanged {
        /// Key that changed
        key: StateKey,
        /// New value
        value: StateValue,
    },
    /// NFC was switched on or off
    NfcActivationChanged(bool),
    /// Call mute status changed
    CallMuteChanged(MuteStatus),
    /// Call audio route changed
    CallAudioChanged(AudioState),
    /// The notification area started or stopped overflowing
    NotificationOverflow(bool),
    /// The wall clock crossed a minute boundary
    TimeTick,
    /// The display power state changed
    DisplayStateChanged(DisplayState),
}

impl PlatformEvent {
    /// Topic under which this event is delivered
    pub fn topic(&self) -> Topic {
        match self {
            Self::KeyChanged { key, .. } => Topic::Key(*key),
            Self::NfcActivationChanged(_) => Topic::NfcActivation,
            Self::CallMuteChanged(_) => Topic::CallMute,
            Self::CallAudioChanged(_) => Topic::CallAudio,
            Self::NotificationOverflow(_) => Topic::NotificationOverflow,
            Self::TimeTick => Topic::TimeTick,
            Self::DisplayStateChanged(_) => Topic::DisplayState,
        }
    }
}

/// Device services used by the indicator modules
pub trait Platform: Send + Sync {
    /// Read an integer key
    fn get_int(&self, key: StateKey) -> Result<i32>;

    /// Read a boolean key
    fn get_bool(&self, key: StateKey) -> Result<bool>;

    /// Read a string key
    fn get_str(&self, key: StateKey) -> Result<String>;

    /// Start delivering events for `topic`
    fn subscribe(&self, topic: Topic) -> Result<()>;

    /// Stop delivering events for `topic`
    fn unsubscribe(&self, topic: Topic) -> Result<()>;

    /// Current bluetooth adapter state
    fn bluetooth_adapter_state(&self) -> Result<AdapterState>;

    /// Whether NFC is activated
    fn nfc_activated(&self) -> Result<bool>;

    /// Open the call-manager client session
    fn call_manager_open(&self) -> Result<()>;

    /// Close the call-manager client session
    fn call_manager_close(&self) -> Result<()>;

    /// Local wall-clock time
    fn local_time(&self) -> Result<ClockTime>;
}
