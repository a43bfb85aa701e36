//! Indicator shell implementation
//!
//! This module owns the module registry and drives it from the two event
//! channels: platform notifications and shell (application) events.

use crate::icon::SIGNAL_SOURCE;
use crate::modules::{ModuleContext, Registry};
use crate::platform::{
    DisplayState, LockState, MinictrlAction, PlatformEvent, StateKey, StateValue, TimeFormat,
    Topic,
};
use std::ops::ControlFlow;
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Topics the shell itself listens to
const SHELL_TOPICS: &[Topic] = &[Topic::DisplayState, Topic::Key(StateKey::LockState)];

/// Application-level events delivered to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// The display language changed
    LanguageChanged,
    /// The region format changed
    RegionChanged,
    /// A mini-controller changed
    Minictrl {
        /// What happened to the controller
        action: MinictrlAction,
        /// Name of the controller's owner
        name: String,
    },
    /// Shut down the indicator
    Terminate,
}

/// Indicator application shell
pub struct IndicatorShell {
    registry: Registry,
    ctx: ModuleContext,
    platform_events: Option<mpsc::Receiver<PlatformEvent>>,
    shell_events: Option<mpsc::Receiver<ShellEvent>>,
    poll_interval: Duration,
    lock_state: Option<LockState>,
    started: bool,
    terminated: bool,
}

impl IndicatorShell {
    /// Create the shell and bring up the first-stage modules
    pub fn create(
        mut registry: Registry,
        ctx: ModuleContext,
        platform_events: mpsc::Receiver<PlatformEvent>,
        shell_events: mpsc::Receiver<ShellEvent>,
        poll_interval: Duration,
    ) -> Self {
        registry.init_first(&ctx);
        Self {
            registry,
            ctx,
            platform_events: Some(platform_events),
            shell_events: Some(shell_events),
            poll_interval,
            lock_state: None,
            started: false,
            terminated: false,
        }
    }

    /// Subscribe to shell topics, initialize every module and sync the lock state
    pub fn start(&mut self) {
        if self.started {
            debug!("Indicator already started");
            return;
        }
        self.started = true;
        info!("Indicator is started");

        for &topic in SHELL_TOPICS {
            if let Err(e) = self.ctx.platform().subscribe(topic) {
                warn!("Failed to subscribe to {}: {}", topic, e);
            }
        }
        self.registry.init(&self.ctx);

        match self.ctx.platform().get_int(StateKey::LockState) {
            Ok(raw) => self.lock_state_changed(raw),
            Err(e) => warn!("Failed to read lock state: {}", e),
        }
    }

    /// Module registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Shared module context
    pub fn context(&self) -> &ModuleContext {
        &self.ctx
    }

    /// Lock state last applied
    pub fn lock_state(&self) -> Option<LockState> {
        self.lock_state
    }

    /// Whether `terminate` has run
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Handle one platform notification
    pub fn handle_platform_event(&mut self, event: &PlatformEvent) {
        match event {
            PlatformEvent::DisplayStateChanged(state) => self.display_state_changed(*state),
            PlatformEvent::KeyChanged {
                key: StateKey::LockState,
                value,
            } => match value {
                StateValue::Int(raw) => self.lock_state_changed(*raw),
                other => warn!("Unexpected lock state value {:?}", other),
            },
            _ => self.registry.dispatch(event, &self.ctx),
        }
    }

    /// Handle one shell event, returning `Break` on `Terminate`
    pub fn handle_shell_event(&mut self, event: ShellEvent) -> ControlFlow<()> {
        match event {
            ShellEvent::LanguageChanged => {
                match self.ctx.platform().get_str(StateKey::Language) {
                    Ok(language) => info!("Language changed: {}", language),
                    Err(e) => debug!("Language changed (unreadable: {})", e),
                }
                self.registry.language_changed(&self.ctx);
            }
            ShellEvent::RegionChanged => {
                debug!("Region format changed");
                self.registry.region_changed(&self.ctx);
            }
            ShellEvent::Minictrl { action, name } => {
                debug!("Mini-controller {:?} from {}", action, name);
                self.registry.minictrl_control(action, &name, &self.ctx);
            }
            ShellEvent::Terminate => {
                info!("Terminate requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn display_state_changed(&mut self, state: DisplayState) {
        let gate = self.ctx.update_gate();
        match state {
            DisplayState::ScreenOff | DisplayState::Dim => {
                debug!("Display {:?}: suspending icon updates", state);
                gate.close();
            }
            DisplayState::Normal => {
                if gate.open() {
                    info!("Display is on: waking up modules");
                    self.registry.wake_up(&self.ctx);
                }
            }
        }
    }

    fn lock_state_changed(&mut self, raw: i32) {
        let Some(state) = LockState::from_raw(raw) else {
            warn!("Unknown lock state {}", raw);
            return;
        };
        if self.lock_state == Some(state) {
            return;
        }
        self.lock_state = Some(state);

        let emission = match state {
            LockState::Unlock => {
                let format = self
                    .ctx
                    .platform()
                    .get_int(StateKey::TimeFormat)
                    .map(TimeFormat::from_raw)
                    .unwrap_or_default();
                match format {
                    TimeFormat::Hour12 => "clock.font.12",
                    TimeFormat::Hour24 => "clock.font.24",
                }
            }
            LockState::Lock | LockState::LaunchingLock => "clock.invisible",
        };
        debug!("Lock state {:?}: {}", state, emission);
        self.ctx.presenter().signal_emit(emission, SIGNAL_SOURCE);
    }

    fn drain_platform_events(&mut self, receiver: &mpsc::Receiver<PlatformEvent>) {
        use std::sync::mpsc::TryRecvError;

        loop {
            match receiver.try_recv() {
                Ok(event) => self.handle_platform_event(&event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Platform event channel disconnected");
                    break;
                }
            }
        }
    }

    /// Run the event loop until `Terminate` or the shell channel closes
    ///
    /// Waits on shell events with the poll interval as timeout and drains
    /// platform events between waits. Platform events queued before a shell
    /// event are handled ahead of it. Terminates the modules on exit.
    pub fn run(&mut self) {
        use std::sync::mpsc::RecvTimeoutError;

        let (Some(platform_events), Some(shell_events)) =
            (self.platform_events.take(), self.shell_events.take())
        else {
            warn!("Event loop already running; run() call ignored");
            return;
        };

        info!("Entering main event loop (shell events + platform events)");
        loop {
            match shell_events.recv_timeout(self.poll_interval) {
                Ok(event) => {
                    // Platform events reported before this one are applied first
                    self.drain_platform_events(&platform_events);
                    if self.handle_shell_event(event).is_break() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Shell event channel disconnected. Exiting event loop.");
                    self.drain_platform_events(&platform_events);
                    break;
                }
            }

            self.drain_platform_events(&platform_events);
        }
        info!("Main event loop exited");

        self.terminate();
    }

    /// Shut down every module and drop shell subscriptions
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        self.registry.fini(&self.ctx);
        for &topic in SHELL_TOPICS {
            if let Err(e) = self.ctx.platform().unsubscribe(topic) {
                warn!("Failed to unsubscribe from {}: {}", topic, e);
            }
        }
        info!("Indicator is terminated");
    }
}

impl Drop for IndicatorShell {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl std::fmt::Debug for IndicatorShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorShell")
            .field("registry", &self.registry)
            .field("lock_state", &self.lock_state)
            .field("started", &self.started)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
