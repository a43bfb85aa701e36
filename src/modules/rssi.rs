//! Cellular signal icons, one per SIM slot

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{PlatformEvent, StateKey, Topic};
use tracing::{debug, warn};

const ICON_PATHS: &[&str] = &[
    "RSSI/b03_rssi_00.png",
    "RSSI/b03_rssi_01.png",
    "RSSI/b03_rssi_02.png",
    "RSSI/b03_rssi_03.png",
    "RSSI/b03_rssi_04.png",
    "RSSI/b03_rssi_05.png",
];

/// Signal strength module for one SIM
#[derive(Debug)]
pub struct Rssi {
    icon: LevelIcon,
    key: StateKey,
}

impl Rssi {
    /// First SIM slot
    pub const fn sim1() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image("rssi", IconArea::Fixed, priority::FIXED4),
                ICON_PATHS,
            ),
            key: StateKey::RssiSim1,
        }
    }

    /// Second SIM slot
    pub const fn sim2() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image("rssi2", IconArea::Fixed, priority::FIXED5),
                ICON_PATHS,
            ),
            key: StateKey::RssiSim2,
        }
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        match ctx.platform().get_int(self.key) {
            Ok(strength) => match usize::try_from(strength) {
                Ok(level) => {
                    self.icon.show(level, ctx);
                }
                Err(_) => {
                    debug!("{}: no SIM ({})", self.icon.descriptor().name, strength);
                    self.icon.hide(ctx);
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", self.key, e);
                self.icon.hide(ctx);
            }
        }
    }
}

impl Module for Rssi {
    fn descriptor(&self) -> &IconDescriptor {
        self.icon.descriptor()
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        subscribe_all(ctx, &[Topic::Key(self.key)])?;
        self.refresh(ctx);
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, &[Topic::Key(self.key)]);
        Ok(())
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        if let PlatformEvent::KeyChanged { key, .. } = event
            && *key == self.key
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
                "Signal strength {} of {}, Status bar item",
                level,
                ICON_PATHS.len() - 1
            )
        })
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}
