//! Bluetooth connection icon
//!
//! Shows whether the adapter is on and what kind of device is connected. The
//! device bitmask key is the only notification source; the adapter state is
//! queried on every change.

use super::{LevelIcon, Module, ModuleContext, subscribe_all, unsubscribe_all};
use crate::error::Result;
use crate::icon::{IconArea, IconDescriptor, SIGNAL_SOURCE, priority};
use crate::platform::{AdapterState, PlatformEvent, StateKey, Topic, bt_device};
use tracing::{debug, warn};

/// Adapter on, no profile connected
pub const LEVEL_BT_ON: usize = 0;
/// A non-audio profile is connected
pub const LEVEL_BT_CONNECTED: usize = 1;
/// A headset is connected
pub const LEVEL_BT_HEADSET: usize = 2;

const ICON_PATHS: &[&str] = &[
    "Bluetooth, NFC, GPS/b03_bt_on_connected.png",
    "Bluetooth, NFC, GPS/b03_bt_activated_on.png",
    "Bluetooth, NFC, GPS/b03_bt_on_connected&headset.png",
];

const TOPICS: &[Topic] = &[Topic::Key(StateKey::BtDevice)];

const HEADSET_BITS: i32 = bt_device::HEADSET_CONNECTED | bt_device::A2DP_HEADSET_CONNECTED;
const DEVICE_BITS: i32 = bt_device::SAP_CONNECTED
    | bt_device::PBAP_CONNECTED
    | bt_device::HID_CONNECTED
    | bt_device::PAN_CONNECTED;

/// Map a connected-device bitmask to an icon level
///
/// `None` means nothing is connected and the icon should be hidden. Headsets
/// win over other profiles; unknown bits fall back to the plain "on" level.
pub fn level_for_devices(devices: i32) -> Option<usize> {
    if devices == bt_device::NONE {
        None
    } else if devices & HEADSET_BITS != 0 {
        Some(LEVEL_BT_HEADSET)
    } else if devices & DEVICE_BITS != 0 {
        Some(LEVEL_BT_CONNECTED)
    } else {
        Some(LEVEL_BT_ON)
    }
}

/// Bluetooth module
#[derive(Debug)]
pub struct Bluetooth {
    icon: LevelIcon,
}

impl Default for Bluetooth {
    fn default() -> Self {
        Self::new()
    }
}

impl Bluetooth {
    /// Create the module with the icon hidden
    pub const fn new() -> Self {
        Self {
            icon: LevelIcon::new(
                IconDescriptor::image(
                    "bluetooth",
                    IconArea::ConnectionSystem,
                    priority::CONNECTION_SYSTEM_1,
                ),
                ICON_PATHS,
            ),
        }
    }

    fn refresh(&mut self, ctx: &ModuleContext) {
        if self.icon.defer_while_display_off(ctx) {
            return;
        }

        match ctx.platform().bluetooth_adapter_state() {
            Ok(AdapterState::Enabled) => {}
            Ok(AdapterState::Disabled) => {
                debug!("Bluetooth adapter is disabled");
                self.hide(ctx);
                return;
            }
            Err(e) => {
                warn!("Failed to query bluetooth adapter: {}", e);
                self.hide(ctx);
                return;
            }
        }

        match ctx.platform().get_int(StateKey::BtDevice) {
            Ok(devices) => {
                debug!("Bluetooth devices: {:#x}", devices);
                match level_for_devices(devices) {
                    Some(level) => {
                        self.icon.show(level, ctx);
                    }
                    None => self.hide(ctx),
                }
            }
            Err(e) => {
                warn!("Failed to read bluetooth devices: {}", e);
                self.hide(ctx);
            }
        }
    }

    fn hide(&mut self, ctx: &ModuleContext) {
        self.icon.hide(ctx);
        ctx.presenter()
            .signal_emit("indicator.bluetooth.hide", SIGNAL_SOURCE);
    }
}

impl Module for Bluetooth {
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
            key: StateKey::BtDevice,
            ..
        } = event
        {
            self.refresh(ctx);
        }
    }

    fn wake_up(&mut self, ctx: &ModuleContext) -> Result<()> {
        if !self.icon.resync_pending() && !self.icon.descriptor().obj_exist {
            return Ok(());
        }
        self.refresh(ctx);
        Ok(())
    }

    fn accessibility_description(&self) -> Option<String> {
        let state = match self.icon.level()? {
            LEVEL_BT_ON => "Bluetooth on",
            LEVEL_BT_CONNECTED => "Bluetooth on and connected",
            _ => "Bluetooth on and connected headset",
        };
        Some(format!("{state}, Status bar item"))
    }

    fn shown_level(&self) -> Option<usize> {
        self.icon.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::Service;
    use crate::test_utils::Rig;

    fn started(rig: &Rig) -> Bluetooth {
        rig.platform.set_bluetooth_adapter(AdapterState::Enabled);
        let mut module = Bluetooth::new();
        module.init(&rig.ctx).unwrap();
        module
    }

    #[test]
    fn test_device_mapping() {
        assert_eq!(level_for_devices(bt_device::NONE), None);
        assert_eq!(
            level_for_devices(bt_device::HEADSET_CONNECTED),
            Some(LEVEL_BT_HEADSET)
        );
        assert_eq!(
            level_for_devices(bt_device::A2DP_HEADSET_CONNECTED | bt_device::PAN_CONNECTED),
            Some(LEVEL_BT_HEADSET)
        );
        assert_eq!(
            level_for_devices(bt_device::PBAP_CONNECTED),
            Some(LEVEL_BT_CONNECTED)
        );
        assert_eq!(level_for_devices(0x1), Some(LEVEL_BT_ON));
    }

    #[test]
    fn test_headset_then_none_hides() {
        let rig = Rig::new();
        let mut module = started(&rig);
        assert!(!rig.board.is_visible("bluetooth"));

        rig.platform
            .set_int(StateKey::BtDevice, bt_device::HEADSET_CONNECTED);
        rig.pump(&mut module);
        assert_eq!(module.shown_level(), Some(LEVEL_BT_HEADSET));
        assert!(rig.board.is_visible("bluetooth"));

        rig.platform.set_int(StateKey::BtDevice, bt_device::NONE);
        rig.pump(&mut module);
        assert_eq!(module.shown_level(), None);
        assert!(!rig.board.is_visible("bluetooth"));
        assert_eq!(
            rig.board.last_signal().unwrap().emission,
            "indicator.bluetooth.hide"
        );
    }

    #[test]
    fn test_same_level_is_shown_once() {
        let rig = Rig::new();
        let mut module = started(&rig);

        rig.platform
            .set_int(StateKey::BtDevice, bt_device::HEADSET_CONNECTED);
        rig.pump(&mut module);
        rig.platform
            .set_int(StateKey::BtDevice, bt_device::A2DP_HEADSET_CONNECTED);
        rig.pump(&mut module);

        assert_eq!(rig.board.show_count("bluetooth"), 1);
    }

    #[test]
    fn test_disabled_adapter_hides() {
        let rig = Rig::new();
        let mut module = started(&rig);
        rig.platform.set_int(StateKey::BtDevice, bt_device::HID_CONNECTED);
        rig.pump(&mut module);
        assert!(rig.board.is_visible("bluetooth"));

        rig.platform.set_bluetooth_adapter(AdapterState::Disabled);
        rig.platform.set_int(StateKey::BtDevice, bt_device::PAN_CONNECTED);
        rig.pump(&mut module);
        assert!(!rig.board.is_visible("bluetooth"));
    }

    #[test]
    fn test_query_failures_hide() {
        let rig = Rig::new();
        let mut module = started(&rig);
        rig.platform.set_int(StateKey::BtDevice, bt_device::HID_CONNECTED);
        rig.pump(&mut module);

        rig.platform.fail_service(Service::BluetoothAdapter);
        rig.platform.set_int(StateKey::BtDevice, bt_device::PAN_CONNECTED);
        rig.pump(&mut module);
        assert!(!rig.board.is_visible("bluetooth"));

        rig.platform.clear_failures();
        rig.platform.fail_key(StateKey::BtDevice);
        module.handle_event(
            &PlatformEvent::KeyChanged {
                key: StateKey::BtDevice,
                value: crate::platform::StateValue::Int(bt_device::HID_CONNECTED),
            },
            &rig.ctx,
        );
        assert!(!rig.board.is_visible("bluetooth"));
    }

    #[test]
    fn test_changes_while_display_off_apply_once_on_wake_up() {
        let rig = Rig::new();
        let mut module = started(&rig);

        rig.display_off();
        rig.platform.set_int(StateKey::BtDevice, bt_device::HID_CONNECTED);
        rig.pump(&mut module);
        rig.platform
            .set_int(StateKey::BtDevice, bt_device::HEADSET_CONNECTED);
        rig.pump(&mut module);
        assert_eq!(rig.board.show_count("bluetooth"), 0);

        rig.display_on();
        module.wake_up(&rig.ctx).unwrap();
        assert_eq!(rig.board.show_count("bluetooth"), 1);
        assert_eq!(module.shown_level(), Some(LEVEL_BT_HEADSET));
    }

    #[test]
    fn test_wake_up_without_pending_change_on_hidden_icon_is_quiet() {
        let rig = Rig::new();
        let mut module = started(&rig);
        let reads = rig.platform.read_count(StateKey::BtDevice);

        module.wake_up(&rig.ctx).unwrap();
        assert_eq!(rig.platform.read_count(StateKey::BtDevice), reads);
    }

    #[test]
    fn test_accessibility_text_follows_level() {
        let rig = Rig::new();
        let mut module = started(&rig);
        assert_eq!(module.accessibility_description(), None);

        rig.platform.set_int(StateKey::BtDevice, bt_device::SAP_CONNECTED);
        rig.pump(&mut module);
        assert_eq!(
            module.accessibility_description().as_deref(),
            Some("Bluetooth on and connected, Status bar item")
        );
    }

    #[test]
    fn test_fini_unsubscribes() {
        let rig = Rig::new();
        let mut module = started(&rig);
        module.fini(&rig.ctx).unwrap();
        assert!(!rig.platform.is_subscribed(Topic::Key(StateKey::BtDevice)));
    }
}
