//! Clock text icon
//!
//! Renders the wall-clock time in the user's 12/24-hour format. The label is
//! rebuilt on every minute tick, on a format change, and whenever the display
//! language or region format changes.

use super::{Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{ClockTime, PlatformEvent, StateKey, TimeFormat, Topic};
use tracing::{debug, warn};

const TOPICS: &[Topic] = &[Topic::Key(StateKey::TimeFormat), Topic::TimeTick];

/// Ante/post meridiem markers for a language, and whether they lead the time
fn meridiem(language: &str) -> (&'static str, &'static str, bool) {
    match language.get(..2) {
        Some("ko") => ("오전", "오후", true),
        Some("ja") => ("午前", "午後", true),
        Some("zh") => ("上午", "下午", true),
        _ => ("AM", "PM", false),
    }
}

/// Format `time` the way the status bar shows it
pub fn format_time(time: ClockTime, format: TimeFormat, language: &str) -> String {
    match format {
        TimeFormat::Hour24 => format!("{:02}:{:02}", time.hour, time.minute),
        TimeFormat::Hour12 => {
            let (am, pm, leading) = meridiem(language);
            let marker = if time.hour < 12 { am } else { pm };
            let hour = match time.hour % 12 {
                0 => 12,
                h => h,
            };
            if leading {
                format!("{marker} {hour}:{:02}", time.minute)
            } else {
                format!("{hour}:{:02} {marker}", time.minute)
            }
        }
    }
}

/// Clock module
#[derive(Debug)]
pub struct Clock {
    descriptor: IconDescriptor,
    updated_while_lcd_off: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create the module with no label
    pub const fn new() -> Self {
        Self {
            descriptor: IconDescriptor::text("clock", IconArea::Fixed, priority::FIXED1)
                .always_on_top(),
            updated_while_lcd_off: false,
        }
    }

    /// Label currently shown
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if !ctx.update_gate().is_open() {
            self.updated_while_lcd_off = true;
            return;
        }
        self.updated_while_lcd_off = false;

        let time = match ctx.platform().local_time() {
            Ok(time) => time,
            Err(e) => {
                warn!("Failed to read the clock: {}", e);
                ctx.presenter().hide(&self.descriptor);
                self.descriptor.label = None;
                self.descriptor.obj_exist = false;
                return;
            }
        };
        let format = ctx
            .platform()
            .get_int(StateKey::TimeFormat)
            .map(TimeFormat::from_raw)
            .unwrap_or_else(|e| {
                warn!("Failed to read time format: {}", e);
                TimeFormat::default()
            });
        let language = ctx
            .platform()
            .get_str(StateKey::Language)
            .unwrap_or_else(|e| {
                warn!("Failed to read display language: {}", e);
                String::new()
            });

        let label = format_time(time, format, &language);
        if self.descriptor.label.as_deref() == Some(label.as_str()) {
            return;
        }
        debug!("Clock label: {}", label);
        self.descriptor.label = Some(label);
        self.descriptor.obj_exist = true;
        ctx.presenter().show(&self.descriptor);
    }
}

impl Module for Clock {
    fn descriptor(&self) -> &IconDescriptor {
        &self.descriptor
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
        match event {
            PlatformEvent::TimeTick
            | PlatformEvent::KeyChanged {
                key: StateKey::TimeFormat,
                ..
            } => self.refresh(ctx),
            _ => {}
        }
    }

    fn language_changed(&mut self, ctx: &ModuleContext) {
        self.refresh(ctx);
    }

    fn region_changed(&mut self, ctx: &ModuleContext) {
        self.refresh(ctx);
    }

    fn wake_up(&mut self, ctx: &ModuleContext) -> Result<()> {
        if self.updated_while_lcd_off {
            self.refresh(ctx);
        }
        Ok(())
    }

    fn accessibility_description(&self) -> Option<String> {
        self.label().map(|label| format!("{label}, Clock"))
    }
}
