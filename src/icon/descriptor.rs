//! Icon descriptor data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an icon is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    /// Pre-rendered image
    Image,
    /// Text label
    Text,
    /// Image with a text overlay
    Composite,
}

/// Placement zone of an icon in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconArea {
    /// Fixed slots (clock, battery, signal)
    Fixed,
    /// System status icons
    System,
    /// Notification icons
    Noti,
    /// Alarm icons
    Alarm,
    /// Connection icons shown next to the system area
    ConnectionSystem,
    /// Mini-controller icons
    Minictrl,
    /// The "more notifications" marker
    MoreNoti,
}

impl fmt::Display for IconArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fixed => "fixed",
            Self::System => "system",
            Self::Noti => "noti",
            Self::Alarm => "alarm",
            Self::ConnectionSystem => "connection_system",
            Self::Minictrl => "minictrl",
            Self::MoreNoti => "more_noti",
        };
        f.write_str(name)
    }
}

/// Priority ranks within an area; lower ranks are placed first
pub mod priority {
    /// Clock slot
    pub const FIXED1: i32 = 1;
    /// Battery slot
    pub const FIXED2: i32 = 2;
    /// Wi-Fi slot
    pub const FIXED3: i32 = 3;
    /// First SIM signal slot
    pub const FIXED4: i32 = 4;
    /// Second SIM signal slot
    pub const FIXED5: i32 = 5;
    /// Wi-Fi Direct slot
    pub const FIXED8: i32 = 8;
    /// First connection-system slot
    pub const CONNECTION_SYSTEM_1: i32 = 10;
    /// Second connection-system slot
    pub const CONNECTION_SYSTEM_2: i32 = 11;
    /// Second mini-controller slot
    pub const MINICTRL2: i32 = 21;
    /// Third mini-controller slot
    pub const MINICTRL3: i32 = 22;
    /// Lowest notification rank
    pub const NOTI_MIN: i32 = 30;
    /// Second notification rank
    pub const NOTI_2: i32 = 32;
}

/// Static description of one status icon plus its live display flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDescriptor {
    /// Module name, unique across the registry
    pub name: &'static str,
    /// How the icon is drawn
    pub kind: IconKind,
    /// Rank within the area
    pub priority: i32,
    /// Placement zone
    pub area: IconArea,
    /// Never pushed out of view by lower-priority icons
    pub always_top: bool,
    /// Currently laid out in the visible part of its area
    pub exist_in_view: bool,
    /// A display object exists for this icon
    pub obj_exist: bool,
    /// Image asset path relative to the resource directory
    pub image: Option<&'static str>,
    /// Text label for text icons
    pub label: Option<String>,
}

impl IconDescriptor {
    /// Describe an image icon with no image selected yet
    pub const fn image(name: &'static str, area: IconArea, priority: i32) -> Self {
        Self {
            name,
            kind: IconKind::Image,
            priority,
            area,
            always_top: false,
            exist_in_view: false,
            obj_exist: false,
            image: None,
            label: None,
        }
    }

    /// Describe a text icon
    pub const fn text(name: &'static str, area: IconArea, priority: i32) -> Self {
        Self {
            name,
            kind: IconKind::Text,
            priority,
            area,
            always_top: false,
            exist_in_view: false,
            obj_exist: false,
            image: None,
            label: None,
        }
    }

    /// Set a fixed image
    #[must_use]
    pub const fn with_image(mut self, image: &'static str) -> Self {
        self.image = Some(image);
        self
    }

    /// Keep the icon on top of its area
    #[must_use]
    pub const fn always_on_top(mut self) -> Self {
        self.always_top = true;
        self
    }
}
