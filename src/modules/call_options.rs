//! In-call option icons (mute, speaker)
//!
//! Both icons are fed by the same call-manager client session. The session is
//! opened by whichever module initializes first and closed when the last one
//! shuts down.

use super::{Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, priority};
use crate::platform::{AudioState, MinictrlAction, MuteStatus, PlatformEvent, Topic};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Mini-controller name of the call application
pub const CALL_APP_NAME: &str = "org.tizen.call-ui";

/// Reference-counted call-manager client session
#[derive(Debug, Default)]
pub struct CallManagerSession {
    users: Mutex<usize>,
}

impl CallManagerSession {
    /// A session shared by several modules
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a user, opening the session for the first one
    pub fn acquire(&self, ctx: &ModuleContext) -> Result<()> {
        let mut users = self.users.lock();
        if *users == 0 {
            ctx.platform().call_manager_open()?;
            info!("Call-manager session opened");
        }
        *users += 1;
        Ok(())
    }

    /// Drop a user, closing the session after the last one
    pub fn release(&self, ctx: &ModuleContext) -> Result<()> {
        let mut users = self.users.lock();
        match *users {
            0 => return Ok(()),
            1 => {
                ctx.platform().call_manager_close()?;
                info!("Call-manager session closed");
            }
            _ => {}
        }
        *users -= 1;
        Ok(())
    }

    /// Number of modules holding the session
    pub fn users(&self) -> usize {
        *self.users.lock()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallOptionKind {
    Mute,
    Speaker,
}

impl CallOptionKind {
    const fn topic(self) -> Topic {
        match self {
            Self::Mute => Topic::CallMute,
            Self::Speaker => Topic::CallAudio,
        }
    }
}

/// One in-call option icon
#[derive(Debug)]
pub struct CallOption {
    kind: CallOptionKind,
    descriptor: IconDescriptor,
    session: Arc<CallManagerSession>,
}

impl CallOption {
    /// Microphone-muted icon
    pub fn mute(session: Arc<CallManagerSession>) -> Self {
        Self {
            kind: CallOptionKind::Mute,
            descriptor: IconDescriptor::image(
                "call_options_mute",
                IconArea::Minictrl,
                priority::MINICTRL2,
            )
            .with_image("Call/b03_call_mute.png"),
            session,
        }
    }

    /// Speakerphone icon
    pub fn speaker(session: Arc<CallManagerSession>) -> Self {
        Self {
            kind: CallOptionKind::Speaker,
            descriptor: IconDescriptor::image(
                "call_options_speaker",
                IconArea::Minictrl,
                priority::MINICTRL3,
            )
            .with_image("Call/b03_call_speaker_on.png"),
            session,
        }
    }

    fn set_visible(&mut self, visible: bool, ctx: &ModuleContext) {
        if visible {
            self.descriptor.obj_exist = true;
            ctx.presenter().show(&self.descriptor);
        } else {
            ctx.presenter().hide(&self.descriptor);
            self.descriptor.obj_exist = false;
        }
    }
}

impl Module for CallOption {
    fn descriptor(&self) -> &IconDescriptor {
        &self.descriptor
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<()> {
        self.session.acquire(ctx)?;
        if let Err(e) = subscribe_all(ctx, &[self.kind.topic()]) {
            self.session.release(ctx)?;
            return Err(e);
        }
        Ok(())
    }

    fn fini(&mut self, ctx: &ModuleContext) -> Result<()> {
        unsubscribe_all(ctx, &[self.kind.topic()]);
        self.session.release(ctx)
    }

    fn handle_event(&mut self, event: &PlatformEvent, ctx: &ModuleContext) {
        match (self.kind, event) {
            (CallOptionKind::Mute, PlatformEvent::CallMuteChanged(status)) => {
                debug!("Call mute status: {:?}", status);
                self.set_visible(*status == MuteStatus::On, ctx);
            }
            (CallOptionKind::Speaker, PlatformEvent::CallAudioChanged(audio)) => {
                debug!("Call audio state: {:?}", audio);
                self.set_visible(*audio == AudioState::Speaker, ctx);
            }
            _ => {}
        }
    }

    fn minictrl_control(&mut self, action: MinictrlAction, name: &str, ctx: &ModuleContext) {
        if action == MinictrlAction::Stop && name == CALL_APP_NAME && self.descriptor.obj_exist {
            debug!("Call ended, hiding {}", self.descriptor.name);
            self.set_visible(false, ctx);
        }
    }

    fn accessibility_description(&self) -> Option<String> {
        if !self.descriptor.obj_exist {
            return None;
        }
        let text = match self.kind {
            CallOptionKind::Mute => "Call muted, Status bar item",
            CallOptionKind::Speaker => "Speaker on, Status bar item",
        };
        Some(text.to_string())
    }
}
