//! Wi-Fi signal icon

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{PlatformEvent, StateKey, Topic, WifiState};
use tracing::{debug, warn};

const ICON_PATHS: &[&str] = &[
    "Connection/b03_wifi_connected_00.png",
    "Connection/b03_wifi_connected_01.png",
    "Connection/b03_wifi_connected_02.png",
    "Connection/b03_wifi_connected_03.png",
    "Connection/b03_wifi_connected_04.png",
];

const TOPICS: &[Topic] = &[
    Topic::Key(StateKey::WifiState),
    Topic::Key(StateKey::WifiStrength),
];

/// Wi-Fi module
#[derive(Debug)]
pub struct Wifi {
    icon: LevelIcon,
}

impl Default for Wifi {
    fn default() -> Self {
        Self::new()
    }
}

impl Wifi {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image("wifi", IconArea::Fixed, priority::FIXED3),
                ICON_PATHS,
            ),
        }
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        let state = match ctx.platform().get_int(StateKey::WifiState) {
            Ok(raw) => WifiState::from_raw(raw),
            Err(e) => {
                warn!("Failed to read Wi-Fi state: {}", e);
                self.icon.hide(ctx);
                return;
            }
        };
        if state != Some(WifiState::Connected) {
            debug!("Wi-Fi not connected ({:?})", state);
            self.icon.hide(ctx);
            return;
        }

        match ctx.platform().get_int(StateKey::WifiStrength) {
            // Negative strengths land out of range and clamp to the lowest level
            Ok(strength) => {
                let level = usize::try_from(strength).unwrap_or(usize::MAX);
                self.icon.show(level, ctx);
            }
            Err(e) => {
                warn!("Failed to read Wi-Fi strength: {}", e);
                self.icon.hide(ctx);
            }
        }
    }
}

impl Module for Wifi {
    fn descriptor(&self) -> &IconDescriptor {
        self.icon.descriptor()
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        subscribe_all(ctx, TOPICS)?;
        self.refresh(ctx);
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, TOPICS);
        Ok(())
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        if let PlatformEvent::KeyChanged {
            key: StateKey::WifiState | StateKey::WifiStrength,
            ..
        } = event
        {
            self.refresh(ctx);
        }
    }

    fn wake_up(&mut self, ctx: &ModuleContext) -> Result<()> {
        if self.icon.resync_pending() {
            self.refresh(ctx);
        }
        Ok(())
    }

    fn accessibility_description(&self) -> Option<String> {
        self.icon.level().map(|level| {
            format!(
                "Wi-Fi signal strength {} of {}, Status bar item",
                level,
                ICON_PATHS.len() - 1
            )
        })
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}
