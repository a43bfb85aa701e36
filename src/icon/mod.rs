//! Icon model and presentation module
//!
//! - `IconDescriptor`: identity, placement and payload of one status icon
//! - `IconList`: the display list used to order registered icons
//! - `Presenter`: the show/hide/signal surface modules draw through
//! - `IconBoard`: in-memory `Presenter` that records what is on screen

pub mod board;
pub mod descriptor;
pub mod list;

pub use board::{IconBoard, Presenter, SIGNAL_SOURCE, Signal, VisibleIcon};
pub use descriptor::{IconArea, IconDescriptor, IconKind, priority};
pub use list::IconList;
