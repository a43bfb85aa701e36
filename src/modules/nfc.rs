//! NFC icon
//!
//! Shown while NFC is activated. Driven by the NFC manager's activation
//! callback; the manager is queried directly on init and on wake-up.

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{PlatformEvent, Topic};
use tracing::{debug, warn};

const NFC_ON: usize = 0;

const ICON_PATHS: &[&str] = &["Bluetooth, NFC, GPS/b03_nfc_on.png"];

const TOPICS: &[Topic] = &[Topic::NfcActivation];

/// NFC module
#[derive(Debug)]
pub struct Nfc {
    icon: LevelIcon,
}

impl Default for Nfc {
    fn default() -> Self {
        Self::new()
    }
}

impl Nfc {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image("nfc", IconArea::Noti, priority::NOTI_2),
                ICON_PATHS,
            ),
        }
    }

    fn apply(&mut self, activated: bool, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        debug!(
            "NFC is {}",
            if activated { "activated" } else { "not activated" }
        );
        if activated {
            self.icon.show(NFC_ON, ctx);
        } else {
            self.icon.hide(ctx);
        }
    }
}

impl Module for Nfc {
    fn descriptor(&self) -> &IconDescriptor {
        self.icon.descriptor()
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        subscribe_all(ctx, TOPICS)?;

        let activated = match ctx.platform().nfc_activated() {
            Ok(activated) => activated,
            Err(e) => {
                unsubscribe_all(ctx, TOPICS);
                return Err(e);
            }
        };
        self.apply(activated, ctx);
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, TOPICS);
        Ok(())
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        if let PlatformEvent::NfcActivationChanged(activated) = event {
            self.apply(*activated, ctx);
        }
    }

    fn wake_up(&mut self, ctx: &ModuleContext) -> Result<()> {
        if !self.icon.resync_pending() {
            return Ok(());
        }
        match ctx.platform().nfc_activated() {
            Ok(activated) => {
                self.apply(activated, ctx);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to query NFC activation: {}", e);
                self.icon.hide(ctx);
                Err(e)
            }
        }
    }

    fn accessibility_description(&self) -> Option<String> {
        self.icon
            .level()
            .map(|_| "NFC activated, Status bar item".to_string())
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}
