//! Status icon modules
//!
//! Each module adapts one platform status source to one status-bar icon. The
//! `Registry` holds the modules in a fixed order and broadcasts lifecycle
//! events to them.
//!
//! # Overview
//!
//! - **`Module` trait**: the capability set {init, fini, language changed,
//!   region changed, mini-controller control, wake-up, accessibility text}
//!   plus `handle_event` for typed platform events. Everything except `init`
//!   defaults to a no-op, so a module only implements what it reacts to.
//! - **`ModuleContext`**: the shared collaborators handed to every callback
//!   (platform, presenter, display update gate).
//! - **`LevelIcon`**: the hidden/shown(level) state with de-duplication and
//!   display-off deferral that most adapters are built on.
//!
//! # Wake-up Resync
//!
//! While the display is off the shell closes the `UpdateGate`. Modules keep
//! receiving notifications but only remember that something changed. When the
//! display comes back the shell broadcasts `wake_up`, and every module with a
//! pending change re-queries the platform and applies the result once.

pub mod adapter;
pub mod battery;
pub mod bluetooth;
pub mod call_options;
pub mod clock;
pub mod more_notify;
pub mod nfc;
pub mod registry;
pub mod rssi;
pub mod usb;
pub mod wifi;
pub mod wifi_direct;

pub use adapter::LevelIcon;
pub use registry::{FIRST_STAGE_MODULES, Registry};

use crate::error::Result;
use crate::icon::{IconDescriptor, Presenter};
use crate::platform::{MinictrlAction, Platform, PlatformEvent, Topic};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Process-wide "display is on" flag
///
/// Closed while the screen is off or dimmed; modules defer visible updates
/// while it is closed.
#[derive(Debug, Clone)]
pub struct UpdateGate(Arc<AtomicBool>);

impl Default for UpdateGate {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl UpdateGate {
    /// Whether visible updates are allowed
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Suspend visible updates
    pub fn close(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Allow visible updates, returning `true` if the gate was closed
    pub fn open(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

/// Collaborators shared by all modules
#[derive(Clone)]
pub struct ModuleContext {
    platform: Arc<dyn Platform>,
    presenter: Arc<dyn Presenter>,
    update_gate: UpdateGate,
}

impl ModuleContext {
    /// Create a context with an open update gate
    pub fn new(platform: Arc<dyn Platform>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            platform,
            presenter,
            update_gate: UpdateGate::default(),
        }
    }

    /// Platform services
    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    /// Presentation surface
    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    /// Display update gate
    pub fn update_gate(&self) -> &UpdateGate {
        &self.update_gate
    }
}

impl fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleContext")
            .field("update_gate", &self.update_gate)
            .finish_non_exhaustive()
    }
}

/// A status icon adapter
pub trait Module: Send {
    /// Descriptor of the icon this module drives
    fn descriptor(&self) -> &IconDescriptor;

    /// Module name
    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Subscribe to platform notifications and show the initial state
    fn init(&mut self, ctx: &ModuleContext) -> Result<()>;

    /// Drop platform subscriptions
    fn fini(&mut self, _ctx: &ModuleContext) -> Result<()> {
        Ok(())
    }

    /// React to a platform notification
    fn handle_event(&mut self, _event: &PlatformEvent, _ctx: &ModuleContext) {}

    /// The display language changed
    fn language_changed(&mut self, _ctx: &ModuleContext) {}

    /// The region format changed
    fn region_changed(&mut self, _ctx: &ModuleContext) {}

    /// A mini-controller changed
    fn minictrl_control(&mut self, _action: MinictrlAction, _name: &str, _ctx: &ModuleContext) {}

    /// The display came back on
    fn wake_up(&mut self, _ctx: &ModuleContext) -> Result<()> {
        Ok(())
    }

    /// Screen-reader text for the icon in its current state
    fn accessibility_description(&self) -> Option<String> {
        None
    }

    /// Level currently shown, for modules built on `LevelIcon`
    fn shown_level(&self) -> Option<usize> {
        None
    }
}

/// Subscribe to every topic, rolling back on the first failure
pub(crate) fn subscribe_all(ctx: &ModuleContext, topics: &[Topic]) -> Result<()> {
    let mut done: SmallVec<[Topic; 4]> = SmallVec::new();
    for &topic in topics {
        if let Err(e) = ctx.platform().subscribe(topic) {
            unsubscribe_all(ctx, &done);
            return Err(e);
        }
        done.push(topic);
    }
    Ok(())
}

/// Unsubscribe from every topic, logging failures
pub(crate) fn unsubscribe_all(ctx: &ModuleContext, topics: &[Topic]) {
    for &topic in topics {
        if let Err(e) = ctx.platform().unsubscribe(topic) {
            warn!("Failed to unsubscribe from {}: {}", topic, e);
        }
    }
}

/// The stock module set in display-priority order
///
/// The first `FIRST_STAGE_MODULES` entries are the time-critical icons that
/// are brought up before the rest of the shell.
pub fn default_modules() -> Vec<Box<dyn Module>> {
    let call_manager = call_options::CallManagerSession::shared();
    vec![
        Box::new(clock::Clock::new()),
        Box::new(battery::Battery::new()),
        Box::new(wifi::Wifi::new()),
        Box::new(rssi::Rssi::sim1()),
        Box::new(rssi::Rssi::sim2()),
        Box::new(usb::Usb::new()),
        Box::new(wifi_direct::WifiDirect::new()),
        Box::new(call_options::CallOption::mute(call_manager.clone())),
        Box::new(call_options::CallOption::speaker(call_manager)),
        Box::new(bluetooth::Bluetooth::new()),
        Box::new(nfc::Nfc::new()),
        Box::new(more_notify::MoreNotify::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconBoard;
    use crate::platform::{MemoryPlatform, StateKey};

    #[test]
    fn test_update_gate_reports_transitions() {
        let gate = UpdateGate::default();
        assert!(gate.is_open());
        assert!(!gate.open());

        gate.close();
        assert!(!gate.is_open());
        assert!(gate.open());
        assert!(gate.is_open());
    }

    #[test]
    fn test_gate_is_shared_between_clones() {
        let (platform, _rx) = MemoryPlatform::new();
        let ctx = ModuleContext::new(Arc::new(platform), Arc::new(IconBoard::new("/res")));
        let other = ctx.clone();

        ctx.update_gate().close();
        assert!(!other.update_gate().is_open());
    }

    #[test]
    fn test_subscribe_all_rolls_back() {
        let (platform, _rx) = MemoryPlatform::new();
        let platform = Arc::new(platform);
        let ctx = ModuleContext::new(platform.clone(), Arc::new(IconBoard::new("/res")));

        platform.fail_subscription(Topic::Key(StateKey::WifiStrength));
        let result = subscribe_all(
            &ctx,
            &[
                Topic::Key(StateKey::WifiState),
                Topic::Key(StateKey::WifiStrength),
            ],
        );
        assert!(result.is_err());
        assert!(!platform.is_subscribed(Topic::Key(StateKey::WifiState)));
    }

    #[test]
    fn test_default_module_names_are_unique() {
        let modules = default_modules();
        let mut names: Vec<_> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), 12);
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_first_stage_is_clock_battery_network_usb() {
        let names: Vec<_> = default_modules()
            .iter()
            .take(FIRST_STAGE_MODULES)
            .map(|m| m.name())
            .collect();
        assert_eq!(names, vec!["clock", "battery", "wifi", "rssi", "rssi2", "usb"]);
    }
}
