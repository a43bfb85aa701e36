//! In-memory platform
//!
//! A `Platform` implementation backed by a hash map state store. Mutations emit
//! `PlatformEvent`s for subscribed topics only, matching how the device
//! services behave. Every query and subscription can be made to fail, which
//! the tests use to exercise the degraded paths.

use super::{
    AdapterState, AudioState, ClockTime, DisplayState, MuteStatus, Platform, PlatformEvent,
    StateKey, StateValue, Topic,
};
use crate::error::{IndicatorError, Result};
use chrono::Timelike;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use tracing::{debug, trace};

/// Services whose queries can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Bluetooth adapter state query
    BluetoothAdapter,
    /// NFC activation query
    Nfc,
    /// Call-manager session open/close
    CallManager,
    /// Wall clock
    Clock,
}

#[derive(Debug)]
struct State {
    values: HashMap<StateKey, StateValue>,
    subscriptions: HashSet<Topic>,
    adapter: AdapterState,
    nfc_activated: bool,
    fixed_time: Option<ClockTime>,
    call_sessions: usize,
    call_opens: usize,
    call_closes: usize,
    reads: HashMap<StateKey, usize>,
    failing_keys: HashSet<StateKey>,
    failing_topics: HashSet<Topic>,
    failing_services: HashSet<Service>,
}

/// In-memory device services with an event channel
#[derive(Debug)]
pub struct MemoryPlatform {
    state: Mutex<State>,
    events: mpsc::Sender<PlatformEvent>,
}

impl MemoryPlatform {
    /// Create a platform seeded with the values of a freshly booted device
    ///
    /// Returns the platform and the receiving end of its event channel.
    pub fn new() -> (Self, mpsc::Receiver<PlatformEvent>) {
        let (tx, rx) = mpsc::channel();
        let values = HashMap::from([
            (StateKey::BtDevice, StateValue::Int(super::bt_device::NONE)),
            (StateKey::WifiDirectState, StateValue::Int(0)),
            (StateKey::BatteryCapacity, StateValue::Int(80)),
            (StateKey::BatteryCharging, StateValue::Bool(false)),
            (StateKey::WifiState, StateValue::Int(0)),
            (StateKey::WifiStrength, StateValue::Int(0)),
            (StateKey::RssiSim1, StateValue::Int(4)),
            (StateKey::RssiSim2, StateValue::Int(-1)),
            (StateKey::UsbConnected, StateValue::Bool(false)),
            (StateKey::TimeFormat, StateValue::Int(1)),
            (StateKey::Language, StateValue::Str("en_US.UTF-8".to_string())),
            (StateKey::Region, StateValue::Str("en_US.UTF-8".to_string())),
            (StateKey::LockState, StateValue::Int(0)),
        ]);

        let platform = Self {
            state: Mutex::new(State {
                values,
                subscriptions: HashSet::new(),
                adapter: AdapterState::Disabled,
                nfc_activated: false,
                fixed_time: None,
                call_sessions: 0,
                call_opens: 0,
                call_closes: 0,
                reads: HashMap::new(),
                failing_keys: HashSet::new(),
                failing_topics: HashSet::new(),
                failing_services: HashSet::new(),
            }),
            events: tx,
        };
        (platform, rx)
    }

    /// Deliver `event` if its topic is subscribed
    fn emit(&self, event: PlatformEvent) {
        let subscribed = self.state.lock().subscriptions.contains(&event.topic());
        if !subscribed {
            trace!("Dropping {:?}: no subscriber", event);
            return;
        }
        if self.events.send(event).is_err() {
            debug!("Platform event receiver dropped");
        }
    }

    /// Store a key value and notify subscribers
    pub fn set(&self, key: StateKey, value: StateValue) {
        let changed = {
            let mut state = self.state.lock();
            state.values.insert(key, value.clone()).as_ref() != Some(&value)
        };
        if changed {
            self.emit(PlatformEvent::KeyChanged { key, value });
        }
    }

    /// Shorthand for `set` with an integer value
    pub fn set_int(&self, key: StateKey, value: i32) {
        self.set(key, StateValue::Int(value));
    }

    /// Shorthand for `set` with a boolean value
    pub fn set_bool(&self, key: StateKey, value: bool) {
        self.set(key, StateValue::Bool(value));
    }

    /// Change the bluetooth adapter state (queried, never notified)
    pub fn set_bluetooth_adapter(&self, adapter: AdapterState) {
        self.state.lock().adapter = adapter;
    }

    /// Switch NFC and notify subscribers
    ///
    /// The service reports every activation callback, even when the value
    /// did not change.
    pub fn set_nfc_activated(&self, activated: bool) {
        self.state.lock().nfc_activated = activated;
        self.emit(PlatformEvent::NfcActivationChanged(activated));
    }

    /// Report a call mute status change
    pub fn set_call_mute(&self, status: MuteStatus) {
        self.emit(PlatformEvent::CallMuteChanged(status));
    }

    /// Report a call audio route change
    pub fn set_call_audio(&self, audio: AudioState) {
        self.emit(PlatformEvent::CallAudioChanged(audio));
    }

    /// Report a notification overflow change
    pub fn post_notification_overflow(&self, overflowing: bool) {
        self.emit(PlatformEvent::NotificationOverflow(overflowing));
    }

    /// Report a display power change
    pub fn set_display_state(&self, display: DisplayState) {
        self.emit(PlatformEvent::DisplayStateChanged(display));
    }

    /// Pin the wall clock to `time` and deliver a tick
    pub fn set_time(&self, time: ClockTime) {
        self.state.lock().fixed_time = Some(time);
        self.tick();
    }

    /// Deliver a minute tick
    pub fn tick(&self) {
        self.emit(PlatformEvent::TimeTick);
    }

    /// Make reads of `key` fail
    pub fn fail_key(&self, key: StateKey) {
        self.state.lock().failing_keys.insert(key);
    }

    /// Make subscriptions to `topic` fail
    pub fn fail_subscription(&self, topic: Topic) {
        self.state.lock().failing_topics.insert(topic);
    }

    /// Make queries of `service` fail
    pub fn fail_service(&self, service: Service) {
        self.state.lock().failing_services.insert(service);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing_keys.clear();
        state.failing_topics.clear();
        state.failing_services.clear();
    }

    /// Whether `topic` is currently subscribed
    pub fn is_subscribed(&self, topic: Topic) -> bool {
        self.state.lock().subscriptions.contains(&topic)
    }

    /// Number of subscribed topics
    pub fn subscription_count(&self) -> usize {
        self.state.lock().subscriptions.len()
    }

    /// How many times `key` has been read
    pub fn read_count(&self, key: StateKey) -> usize {
        self.state.lock().reads.get(&key).copied().unwrap_or(0)
    }

    /// How many times the call-manager session was opened and closed
    pub fn call_manager_transitions(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.call_opens, state.call_closes)
    }

    fn read(&self, key: StateKey) -> Result<StateValue> {
        let mut state = self.state.lock();
        *state.reads.entry(key).or_insert(0) += 1;
        if state.failing_keys.contains(&key) {
            return Err(IndicatorError::QueryFailed(key));
        }
        state
            .values
            .get(&key)
            .cloned()
            .ok_or(IndicatorError::QueryFailed(key))
    }

    fn check_service(&self, service: Service, name: &'static str) -> Result<()> {
        if self.state.lock().failing_services.contains(&service) {
            return Err(IndicatorError::ServiceUnavailable(name));
        }
        Ok(())
    }
}

impl Platform for MemoryPlatform {
    fn get_int(&self, key: StateKey) -> Result<i32> {
        match self.read(key)? {
            StateValue::Int(value) => Ok(value),
            StateValue::Bool(value) => Ok(i32::from(value)),
            StateValue::Str(_) => Err(IndicatorError::TypeMismatch {
                key,
                expected: "int",
            }),
        }
    }

    fn get_bool(&self, key: StateKey) -> Result<bool> {
        match self.read(key)? {
            StateValue::Bool(value) => Ok(value),
            StateValue::Int(value) => Ok(value != 0),
            StateValue::Str(_) => Err(IndicatorError::TypeMismatch {
                key,
                expected: "bool",
            }),
        }
    }

    fn get_str(&self, key: StateKey) -> Result<String> {
        match self.read(key)? {
            StateValue::Str(value) => Ok(value),
            _ => Err(IndicatorError::TypeMismatch {
                key,
                expected: "string",
            }),
        }
    }

    fn subscribe(&self, topic: Topic) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing_topics.contains(&topic) {
            return Err(IndicatorError::RegistrationFailed(topic));
        }
        state.subscriptions.insert(topic);
        debug!("Subscribed to {}", topic);
        Ok(())
    }

    fn unsubscribe(&self, topic: Topic) -> Result<()> {
        self.state.lock().subscriptions.remove(&topic);
        debug!("Unsubscribed from {}", topic);
        Ok(())
    }

    fn bluetooth_adapter_state(&self) -> Result<AdapterState> {
        self.check_service(Service::BluetoothAdapter, "bluetooth adapter")?;
        Ok(self.state.lock().adapter)
    }

    fn nfc_activated(&self) -> Result<bool> {
        self.check_service(Service::Nfc, "nfc manager")?;
        Ok(self.state.lock().nfc_activated)
    }

    fn call_manager_open(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing_services.contains(&Service::CallManager) {
            return Err(IndicatorError::CallManager("cm_init refused".to_string()));
        }
        state.call_sessions += 1;
        state.call_opens += 1;
        Ok(())
    }

    fn call_manager_close(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.call_sessions == 0 {
            return Err(IndicatorError::CallManager(
                "no open call-manager session".to_string(),
            ));
        }
        state.call_sessions -= 1;
        state.call_closes += 1;
        Ok(())
    }

    fn local_time(&self) -> Result<ClockTime> {
        self.check_service(Service::Clock, "clock")?;
        if let Some(time) = self.state.lock().fixed_time {
            return Ok(time);
        }
        let now = chrono::Local::now();
        // hour() < 24 and minute() < 60 always fit in u8
        Ok(ClockTime {
            hour: u8::try_from(now.hour()).unwrap_or(0),
            minute: u8::try_from(now.minute()).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::bt_device;

    #[test]
    fn test_events_only_for_subscribed_topics() {
        let (platform, rx) = MemoryPlatform::new();

        platform.set_int(StateKey::BtDevice, bt_device::HEADSET_CONNECTED);
        assert!(rx.try_recv().is_err());

        platform.subscribe(Topic::Key(StateKey::BtDevice)).unwrap();
        platform.set_int(StateKey::BtDevice, bt_device::NONE);
        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::KeyChanged {
                key: StateKey::BtDevice,
                value: StateValue::Int(0),
            }
        );
    }

    #[test]
    fn test_unchanged_value_is_not_notified() {
        let (platform, rx) = MemoryPlatform::new();
        platform.subscribe(Topic::Key(StateKey::UsbConnected)).unwrap();

        platform.set_bool(StateKey::UsbConnected, false);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failure_injection() {
        let (platform, _rx) = MemoryPlatform::new();

        platform.fail_key(StateKey::BatteryCapacity);
        assert!(matches!(
            platform.get_int(StateKey::BatteryCapacity),
            Err(IndicatorError::QueryFailed(StateKey::BatteryCapacity))
        ));

        platform.fail_subscription(Topic::NfcActivation);
        assert!(platform.subscribe(Topic::NfcActivation).is_err());
        assert!(!platform.is_subscribed(Topic::NfcActivation));

        platform.clear_failures();
        assert_eq!(platform.get_int(StateKey::BatteryCapacity).unwrap(), 80);
        assert!(platform.subscribe(Topic::NfcActivation).is_ok());
    }

    #[test]
    fn test_type_mismatch() {
        let (platform, _rx) = MemoryPlatform::new();
        assert!(matches!(
            platform.get_str(StateKey::BatteryCapacity),
            Err(IndicatorError::TypeMismatch { .. })
        ));
        assert!(platform.get_bool(StateKey::BatteryCapacity).unwrap());
    }

    #[test]
    fn test_call_manager_session_counting() {
        let (platform, _rx) = MemoryPlatform::new();
        assert!(platform.call_manager_close().is_err());

        platform.call_manager_open().unwrap();
        platform.call_manager_close().unwrap();
        assert_eq!(platform.call_manager_transitions(), (1, 1));
    }

    #[test]
    fn test_fixed_clock() {
        let (platform, _rx) = MemoryPlatform::new();
        let time = ClockTime { hour: 13, minute: 5 };
        platform.set_time(time);
        assert_eq!(platform.local_time().unwrap(), time);
    }
}
