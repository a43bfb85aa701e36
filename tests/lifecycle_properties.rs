//! Property tests for display-off deferral and wake-up resync
//!
//! Random sequences of display transitions and state changes are fed through
//! the shell; the board must never change while the display is off and must
//! match the latest platform state after every wake-up.

use indicator::{
    icon::IconBoard,
    modules::{ModuleContext, Registry, bluetooth, default_modules},
    platform::{AdapterState, DisplayState, MemoryPlatform, PlatformEvent, StateKey, bt_device},
    shell::IndicatorShell,
};
use proptest::prelude::*;
use std::sync::{Arc, mpsc};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Display(DisplayState),
    Bluetooth(i32),
    Battery(i32),
}

fn step() -> impl Strategy<Value = Step> {
    let devices = prop::sample::select(vec![
        bt_device::NONE,
        bt_device::HEADSET_CONNECTED,
        bt_device::A2DP_HEADSET_CONNECTED,
        bt_device::HID_CONNECTED,
        bt_device::PBAP_CONNECTED,
        0x1,
    ]);
    prop_oneof![
        prop::sample::select(vec![
            DisplayState::Normal,
            DisplayState::Dim,
            DisplayState::ScreenOff,
        ])
        .prop_map(Step::Display),
        devices.prop_map(Step::Bluetooth),
        (-5i32..120).prop_map(Step::Battery),
    ]
}

fn expected_battery_level(capacity: i32) -> usize {
    if (0..=100).contains(&capacity) {
        usize::try_from(capacity / 20).unwrap_or(0).min(5)
    } else {
        0
    }
}

proptest! {
    #[test]
    fn board_is_frozen_while_off_and_consistent_after_wake_up(
        steps in prop::collection::vec(step(), 1..40)
    ) {
        let (platform, events) = MemoryPlatform::new();
        platform.set_bluetooth_adapter(AdapterState::Enabled);
        let platform = Arc::new(platform);
        let board = Arc::new(IconBoard::new("/res"));
        let ctx = ModuleContext::new(platform.clone(), board.clone());
        let (_unused_tx, unused_rx) = mpsc::channel::<PlatformEvent>();
        let (_shell_tx, shell_rx) = mpsc::channel();
        let mut shell = IndicatorShell::create(
            Registry::new(default_modules()),
            ctx.clone(),
            unused_rx,
            shell_rx,
            Duration::from_millis(5),
        );
        shell.start();

        let mut capacity = 80;
        let mut devices = bt_device::NONE;
        for step in steps {
            let frozen = !ctx.update_gate().is_open();
            let shows_before = board.show_count("battery") + board.show_count("bluetooth");

            match step {
                Step::Display(state) => platform.set_display_state(state),
                Step::Bluetooth(value) => {
                    devices = value;
                    platform.set_int(StateKey::BtDevice, value);
                }
                Step::Battery(value) => {
                    capacity = value;
                    platform.set_int(StateKey::BatteryCapacity, value);
                }
            }
            while let Ok(event) = events.try_recv() {
                shell.handle_platform_event(&event);
            }

            let shows_after = board.show_count("battery") + board.show_count("bluetooth");
            if frozen && !ctx.update_gate().is_open() {
                prop_assert_eq!(shows_before, shows_after);
            }

            if ctx.update_gate().is_open() {
                let registry = shell.registry();
                prop_assert_eq!(
                    registry.module("battery").and_then(|m| m.shown_level()),
                    Some(expected_battery_level(capacity))
                );
                prop_assert_eq!(
                    registry.module("bluetooth").and_then(|m| m.shown_level()),
                    bluetooth::level_for_devices(devices)
                );
            }
        }
    }
}
