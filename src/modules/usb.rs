//! USB connection icon

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{PlatformEvent, StateKey, Topic};
use tracing::warn;

const USB_CONNECTED: usize = 0;

const ICON_PATHS: &[&str] = &["Connection/b03_usb.png"];

const TOPICS: &[Topic] = &[Topic::Key(StateKey::UsbConnected)];

/// USB module
#[derive(Debug)]
pub struct Usb {
    icon: LevelIcon,
}

impl Default for Usb {
    fn default() -> Self {
        Self::new()
    }
}

impl Usb {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image(
                    "usb",
                    IconArea::ConnectionSystem,
                    priority::CONNECTION_SYSTEM_2,
                ),
                ICON_PATHS,
            ),
        }
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        match ctx.platform().get_bool(StateKey::UsbConnected) {
            Ok(true) => {
                self.icon.show(USB_CONNECTED, ctx);
            }
            Ok(false) => self.icon.hide(ctx),
            Err(e) => {
                warn!("Failed to read USB status: {}", e);
                self.icon.hide(ctx);
            }
        }
    }
}

impl Module for Usb {
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
            key: StateKey::UsbConnected,
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
        self.icon
            .level()
            .map(|_| "USB connected, Status bar item".to_string())
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}
