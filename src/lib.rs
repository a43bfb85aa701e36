//! Indicator - status-bar icon module core
//!
//! Keeps a fixed registry of status icon modules (clock, battery, network,
//! bluetooth, NFC, ...) and drives their lifecycle from platform and shell
//! events. Each module maps one platform status source to one icon, defers
//! visible updates while the display is off, and resynchronizes once when it
//! comes back.
//!
//! # Layout
//!
//! - `platform`: the device-facing `Platform` trait and the in-memory platform
//! - `icon`: icon descriptors, the display list and the `Presenter` surface
//! - `modules`: the `Module` trait, the per-icon adapters and the `Registry`
//! - `shell`: the event loop around the registry and event scripts
//! - `config`, `utils`: configuration file and logging

pub mod config;
pub mod error;
pub mod icon;
pub mod modules;
pub mod platform;
pub mod shell;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{IndicatorError, Result};
