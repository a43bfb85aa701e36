//! Battery icon
//!
//! Six charge buckets, each with a plain and a charging image.

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{PlatformEvent, StateKey, Topic};
use tracing::{debug, warn};

/// Number of charge buckets
pub const BATTERY_LEVELS: usize = 6;

const ICON_PATHS: &[&str] = &[
    "Power/b03_battery_0.png",
    "Power/b03_battery_1.png",
    "Power/b03_battery_2.png",
    "Power/b03_battery_3.png",
    "Power/b03_battery_4.png",
    "Power/b03_battery_5.png",
    "Power/b03_battery_charge_0.png",
    "Power/b03_battery_charge_1.png",
    "Power/b03_battery_charge_2.png",
    "Power/b03_battery_charge_3.png",
    "Power/b03_battery_charge_4.png",
    "Power/b03_battery_charge_5.png",
];

const TOPICS: &[Topic] = &[
    Topic::Key(StateKey::BatteryCapacity),
    Topic::Key(StateKey::BatteryCharging),
];

/// Map a capacity percentage and charging flag to an image level
///
/// Capacities outside 0..=100 fall back to the lowest bucket.
pub fn level_for(capacity: i32, charging: bool) -> usize {
    let bucket = usize::try_from(capacity)
        .ok()
        .filter(|capacity| *capacity <= 100)
        .map_or(0, |capacity| (capacity / 20).min(BATTERY_LEVELS - 1));
    if charging {
        bucket + BATTERY_LEVELS
    } else {
        bucket
    }
}

/// Battery module
#[derive(Debug)]
pub struct Battery {
    icon: LevelIcon,
}

impl Default for Battery {
    fn default() -> Self {
        Self::new()
    }
}

impl Battery {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image("battery", IconArea::Fixed, priority::FIXED2),
                ICON_PATHS,
            ),
        }
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        let capacity = ctx.platform().get_int(StateKey::BatteryCapacity);
        let charging = ctx.platform().get_bool(StateKey::BatteryCharging);
        match (capacity, charging) {
            (Ok(capacity), Ok(charging)) => {
                debug!("Battery {}% charging={}", capacity, charging);
                self.icon.show(level_for(capacity, charging), ctx);
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to read battery state: {}", e);
                self.icon.hide(ctx);
            }
        }
    }
}

impl Module for Battery {
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
            key: StateKey::BatteryCapacity | StateKey::BatteryCharging,
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
        let level = self.icon.level()?;
        let bucket = level % BATTERY_LEVELS;
        let charging = if level >= BATTERY_LEVELS { ", charging" } else { "" };
        Some(format!(
            "Battery {} percent{}, Status bar item",
            bucket * 20,
            charging
        ))
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}
