//! Event scripts
//!
//! A script is a JSON-lines stream of commands that stand in for the device:
//! most commands mutate the `MemoryPlatform` (which then notifies the shell
//! through its event channel), the rest become `ShellEvent`s. Blank lines and
//! lines starting with `#` are ignored.
//!
//! ```text
//! {"op":"display","state":"screen_off"}
//! {"op":"set","key":"memory/bluetooth/device","value":4}
//! {"op":"display","state":"normal"}
//! {"op":"terminate"}
//! ```

use super::ShellEvent;
use crate::error::{IndicatorError, Result};
use crate::platform::{
    AdapterState, AudioState, ClockTime, DisplayState, MemoryPlatform, MinictrlAction,
    MuteStatus, StateKey, StateValue,
};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::debug;

/// One script command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCommand {
    /// Write a state-store key
    Set {
        /// Key to write
        key: StateKey,
        /// New value
        value: StateValue,
    },
    /// Change the bluetooth adapter state
    Adapter {
        /// New adapter state
        state: AdapterState,
    },
    /// Switch NFC
    Nfc {
        /// Whether NFC is on
        activated: bool,
    },
    /// Report a call mute change
    CallMute {
        /// New mute status
        status: MuteStatus,
    },
    /// Report a call audio route change
    CallAudio {
        /// New audio route
        state: AudioState,
    },
    /// Report a notification overflow change
    Overflow {
        /// Whether the notification area overflows
        show: bool,
    },
    /// Report a display power change
    Display {
        /// New display state
        state: DisplayState,
    },
    /// Pin the wall clock and tick
    Time {
        /// Hour, 0-23
        hour: u8,
        /// Minute, 0-59
        minute: u8,
    },
    /// Deliver a minute tick
    Tick,
    /// Change the display language
    Language {
        /// Locale, e.g. `ko_KR.UTF-8`
        value: String,
    },
    /// Change the region format
    Region {
        /// Locale, e.g. `en_GB.UTF-8`
        value: String,
    },
    /// Report a mini-controller change
    Minictrl {
        /// What happened
        action: MinictrlAction,
        /// Owner of the controller
        name: String,
    },
    /// Make reads of a key fail
    FailKey {
        /// Key whose reads fail
        key: StateKey,
    },
    /// Remove injected failures
    ClearFailures,
    /// Stop the indicator
    Terminate,
}

impl ScriptCommand {
    /// Parse one script line
    ///
    /// Returns `Ok(None)` for blank and comment lines. `line` is the 1-based
    /// line number used in error messages.
    pub fn parse(text: &str, line: usize) -> Result<Option<Self>> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }
        let command: Self =
            serde_json::from_str(text).map_err(|e| IndicatorError::InvalidScript {
                line,
                reason: e.to_string(),
            })?;

        if let Self::Time { hour, minute } = command
            && (hour > 23 || minute > 59)
        {
            return Err(IndicatorError::InvalidScript {
                line,
                reason: format!("time {hour}:{minute:02} out of range"),
            });
        }
        Ok(Some(command))
    }

    /// Apply the command
    ///
    /// Platform commands are applied to `platform` directly; the rest are
    /// returned as the shell event to deliver.
    pub fn apply(self, platform: &MemoryPlatform) -> Option<ShellEvent> {
        debug!("Script: {:?}", self);
        match self {
            Self::Set { key, value } => platform.set(key, value),
            Self::Adapter { state } => platform.set_bluetooth_adapter(state),
            Self::Nfc { activated } => platform.set_nfc_activated(activated),
            Self::CallMute { status } => platform.set_call_mute(status),
            Self::CallAudio { state } => platform.set_call_audio(state),
            Self::Overflow { show } => platform.post_notification_overflow(show),
            Self::Display { state } => platform.set_display_state(state),
            Self::Time { hour, minute } => platform.set_time(ClockTime { hour, minute }),
            Self::Tick => platform.tick(),
            Self::Language { value } => {
                platform.set(StateKey::Language, StateValue::Str(value));
                return Some(ShellEvent::LanguageChanged);
            }
            Self::Region { value } => {
                platform.set(StateKey::Region, StateValue::Str(value));
                return Some(ShellEvent::RegionChanged);
            }
            Self::Minictrl { action, name } => {
                return Some(ShellEvent::Minictrl { action, name });
            }
            Self::FailKey { key } => platform.fail_key(key),
            Self::ClearFailures => platform.clear_failures(),
            Self::Terminate => return Some(ShellEvent::Terminate),
        }
        None
    }
}

/// Parse a whole script, stopping at the first invalid line
pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        if let Some(command) = ScriptCommand::parse(&line?, index + 1)? {
            commands.push(command);
        }
    }
    Ok(commands)
}
