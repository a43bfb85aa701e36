//! Indicator shell module
//!
//! This module is the application around the module registry: it owns the
//! registry, runs the event loop, and turns display, lock and locale events
//! into registry broadcasts.
//!
//! # Overview
//!
//! - `IndicatorShell`: lifecycle (`create` → `start` → `run` → `terminate`)
//!   and event handling
//! - `ShellEvent`: application events (language, region, mini-controller,
//!   terminate) delivered over a channel
//! - `ScriptCommand`: JSON-lines event scripts used by the binary to drive a
//!   `MemoryPlatform`
//!
//! # Event Flow
//!
//! ```text
//! script feeder → MemoryPlatform → PlatformEvent ─┐
//!               → ShellEvent ─────────────────────┴→ IndicatorShell → Registry → modules
//! ```
//!
//! # Display Handling
//!
//! `ScreenOff` and `Dim` close the update gate. `Normal` reopens it, and only
//! when it was closed are the modules told to wake up, so repeated `Normal`
//! notifications never cause a second resync.

pub mod indicator;
pub mod script;

pub use indicator::{IndicatorShell, ShellEvent};
pub use script::{ScriptCommand, parse_script};
