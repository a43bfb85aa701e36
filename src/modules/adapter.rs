//! Leveled icon state shared by the module adapters
//!
//! An icon is either hidden or shown at one level of a fixed image table.
//! While the display is off, changes are only recorded; the owning module
//! re-queries and applies the latest state once on wake-up.

use super::ModuleContext;
use crate::icon::IconDescriptor;
use tracing::debug;

/// Hidden/shown(level) icon with de-duplication and display-off deferral
#[derive(Debug, Clone)]
pub struct LevelIcon {
    descriptor: IconDescriptor,
    levels: &'static [&'static str],
    prev_level: Option<usize>,
    updated_while_lcd_off: bool,
}

impl LevelIcon {
    /// Wrap `descriptor` with its image table, one path per level
    pub const fn new(descriptor: IconDescriptor, levels: &'static [&'static str]) -> Self {
        Self {
            descriptor,
            levels,
            prev_level: None,
            updated_while_lcd_off: false,
        }
    }

    /// Descriptor as last presented
    pub fn descriptor(&self) -> &IconDescriptor {
        &self.descriptor
    }

    /// Level currently shown, `None` while hidden
    pub fn level(&self) -> Option<usize> {
        self.prev_level
    }

    /// Whether a change arrived while the display was off
    pub fn resync_pending(&self) -> bool {
        self.updated_while_lcd_off
    }

    /// Record the change and return `true` if the display is off
    ///
    /// Returns `false` (and clears the pending flag) when the caller should
    /// apply the change now.
    pub fn defer_while_display_off(&mut self, ctx: &ModuleContext) -> bool {
        if !ctx.update_gate().is_open() {
            self.updated_while_lcd_off = true;
            debug!("{}: update deferred until wake-up", self.descriptor.name);
            return true;
        }
        self.updated_while_lcd_off = false;
        false
    }

    /// Show `level`, clamping out-of-range levels to the minimum
    ///
    /// Returns `false` without touching the presenter if that level is
    /// already shown.
    pub fn show(&mut self, level: usize, ctx: &ModuleContext) -> bool {
        let level = if level < self.levels.len() { level } else { 0 };
        if self.prev_level == Some(level) {
            debug!("{}: level {} already shown", self.descriptor.name, level);
            return false;
        }

        if let Some(path) = self.levels.get(level) {
            self.descriptor.image = Some(*path);
        }
        self.descriptor.obj_exist = true;
        ctx.presenter().show(&self.descriptor);
        self.prev_level = Some(level);
        true
    }

    /// Hide the icon and forget the shown level
    pub fn hide(&mut self, ctx: &ModuleContext) {
        ctx.presenter().hide(&self.descriptor);
        self.descriptor.obj_exist = false;
        self.prev_level = None;
    }
}
