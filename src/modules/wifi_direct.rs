//! Wi-Fi Direct icon
//!
//! Mirrors the Wi-Fi Direct state key. Every notification is applied as it
//! arrives; the theme is told through `indicator.wifidirect.show/hide` so it
//! can make room for the icon.

use super::{Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, SIGNAL_SOURCE, priority};
use crate::platform::{PlatformEvent, StateKey, StateValue, Topic, WifiDirectState};
use tracing::{debug, warn};

const ICON_CONNECTED: &str = "Bluetooth, NFC, GPS/b03_wi_fi_direct_on_connected.png";
const ICON_NOT_CONNECTED: &str = "Bluetooth, NFC, GPS/b03_wi-fi_direct_on_not_connected.png";

const TOPICS: &[Topic] = &[Topic::Key(StateKey::WifiDirectState)];

/// Image for a Wi-Fi Direct state, `None` when the icon should be hidden
pub fn icon_for_state(state: WifiDirectState) -> Option<&'static str> {
    match state {
        WifiDirectState::Connected | WifiDirectState::GroupOwner => Some(ICON_CONNECTED),
        WifiDirectState::Activated
        | WifiDirectState::Discovering
        | WifiDirectState::Activating
        | WifiDirectState::Deactivating
        | WifiDirectState::Connecting
        | WifiDirectState::Disconnecting => Some(ICON_NOT_CONNECTED),
        WifiDirectState::Deactivated => None,
    }
}

/// Wi-Fi Direct module
#[derive(Debug)]
pub struct WifiDirect {
    descriptor: IconDescriptor,
}

impl Default for WifiDirect {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiDirect {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            descriptor: IconDescriptor::image("wifi-direct", IconArea::Fixed, priority::FIXED8),
        }
    }

    fn update(&mut self, raw: i32, ctx: &ModuleContext) {
        let image = WifiDirectState::from_raw(raw).and_then(icon_for_state);
        match image {
            Some(image) => {
                debug!("Wi-Fi Direct on: {}", image);
                self.descriptor.image = Some(image);
                self.descriptor.obj_exist = true;
                ctx.presenter().show(&self.descriptor);
                ctx.presenter()
                    .signal_emit("indicator.wifidirect.show", SIGNAL_SOURCE);
            }
            None => {
                debug!("Wi-Fi Direct off (state {})", raw);
                ctx.presenter().hide(&self.descriptor);
                self.descriptor.obj_exist = false;
                ctx.presenter()
                    .signal_emit("indicator.wifidirect.hide", SIGNAL_SOURCE);
            }
        }
    }
}

impl Module for WifiDirect {
    fn descriptor(&self) -> &IconDescriptor {
        &self.descriptor
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        subscribe_all(ctx, TOPICS)?;

        let state = match ctx.platform().get_int(StateKey::WifiDirectState) {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to read Wi-Fi Direct state: {}", e);
                unsubscribe_all(ctx, TOPICS);
                return Err(e);
            }
        };
        self.update(state, ctx);
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, TOPICS);
        Ok(())
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        if let PlatformEvent::KeyChanged {
            key: StateKey::WifiDirectState,
            value,
        } = event
        {
            match value {
                StateValue::Int(raw) => self.update(*raw, ctx),
                other => warn!("Unexpected Wi-Fi Direct state value {:?}", other),
            }
        }
    }

    fn accessibility_description(&self) -> Option<String> {
        if !self.descriptor.obj_exist {
            return None;
        }
        let state = if self.descriptor.image == Some(ICON_CONNECTED) {
            "Wi-Fi Direct connected"
        } else {
            "Wi-Fi Direct on"
        };
        Some(format!("{state}, Status bar item"))
    }
}
