//! Shared test utilities for indicator unit tests.
//!
//! This module provides the module test rig and the config-directory guard used
//! across multiple test modules. It is only compiled during testing
//! (`#[cfg(test)]`).

use crate::icon::IconBoard;
use crate::modules::ModuleContext;
use crate::platform::{MemoryPlatform, PlatformEvent};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `XDG_CONFIG_HOME` variable.
static XDG_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A module context wired to an in-memory platform and board
pub struct Rig {
    pub platform: Arc<MemoryPlatform>,
    pub board: Arc<IconBoard>,
    pub ctx: ModuleContext,
    pub events: Receiver<PlatformEvent>,
}

impl Rig {
    pub fn new() -> Self {
        let (platform, events) = MemoryPlatform::new();
        let platform = Arc::new(platform);
        let board = Arc::new(IconBoard::new("/res"));
        let ctx = ModuleContext::new(platform.clone(), board.clone());
        Self {
            platform,
            board,
            ctx,
            events,
        }
    }

    /// Feed every pending platform event to `module`
    pub fn pump(&self, module: &mut dyn crate::modules::Module) {
        while let Ok(event) = self.events.try_recv() {
            module.handle_event(&event, &self.ctx);
        }
    }

    pub fn display_off(&self) {
        self.ctx.update_gate().close();
    }

    pub fn display_on(&self) {
        self.ctx.update_gate().open();
    }
}

/// RAII guard that points `XDG_CONFIG_HOME` at a temp directory for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because other
/// threads may read the environment concurrently. The `XDG_LOCK` mutex is held
/// for the guard's lifetime so only one test touches the variable at a time,
/// and the original value is restored on drop even if the test panics.
pub struct XdgConfigGuard {
    original: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under a global lock"
)]
impl XdgConfigGuard {
    /// Create a new guard that sets `XDG_CONFIG_HOME` to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = XDG_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: XDG_LOCK serializes every writer and the value is restored on drop.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under a global lock"
)]
impl Drop for XdgConfigGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held by this guard.
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", original);
            }
        } else {
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}
