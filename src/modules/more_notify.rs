//! "More notifications" marker
//!
//! The marker object lives in its own layout part for the module's whole
//! lifetime; overflow changes only toggle its visibility through theme
//! signals.

use super::{Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, SIGNAL_SOURCE, priority};
use crate::platform::{PlatformEvent, Topic};
use tracing::debug;

/// Layout part the marker is swallowed into
pub const PART_NAME_MORE_NOTI: &str = "elm.swallow.more_noti";

const TOPICS: &[Topic] = &[Topic::NotificationOverflow];

/// "More notifications" module
#[derive(Debug)]
pub struct MoreNotify {
    descriptor: IconDescriptor,
    showing: bool,
}

impl Default for MoreNotify {
    fn default() -> Self {
        Self::new()
    }
}

impl MoreNotify {
    /// Create the module; the marker object is created on init
    pub const fn new() -> Self {
        Self {
            descriptor: IconDescriptor::image("more_notify", IconArea::MoreNoti, priority::NOTI_MIN)
                .with_image("Notify/b03_notify_more.png")
                .always_on_top(),
            showing: false,
        }
    }

    /// Whether the marker is currently signalled visible
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    fn icon_change(&mut self, show: bool, ctx: &ModuleContext) {
        debug!("Show 'more notify' icon: {}", show);
        let emission = if show {
            "indicator.more_noti.show"
        } else {
            "indicator.more_noti.hide"
        };
        ctx.presenter().signal_emit(emission, SIGNAL_SOURCE);
        self.showing = show;
    }
}

impl Module for MoreNotify {
    fn descriptor(&self) -> &IconDescriptor {
        &self.descriptor
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        subscribe_all(ctx, TOPICS)?;
        ctx.presenter().swallow(PART_NAME_MORE_NOTI, &self.descriptor);
        self.descriptor.obj_exist = true;
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, TOPICS);
        ctx.presenter().unswallow(PART_NAME_MORE_NOTI);
        self.descriptor.obj_exist = false;
        self.showing = false;
        Ok(())
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        if let PlatformEvent::NotificationOverflow(show) = event {
            self.icon_change(*show, ctx);
        }
    }

    fn accessibility_description(&self) -> Option<String> {
        self.showing
            .then(|| "More notifications, Status bar item".to_string())
    }
}
