//! Icon presentation
//!
//! `Presenter` is the side-effecting surface modules draw through. `IconBoard`
//! is the in-memory implementation: it keeps the set of visible icons, the
//! layout signals emitted so far and the swallowed parts, and counts show/hide
//! calls so tests can assert on exactly how many visible updates happened.

use super::{IconArea, IconDescriptor};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Layout source used for program signals
pub const SIGNAL_SOURCE: &str = "indicator.prog";

/// Presentation primitives used by the modules
pub trait Presenter: Send + Sync {
    /// Show or update an icon
    fn show(&self, icon: &IconDescriptor);

    /// Hide an icon
    fn hide(&self, icon: &IconDescriptor);

    /// Toggle a named visual state in the layout theme
    fn signal_emit(&self, emission: &str, source: &str);

    /// Create the icon object and place it into a layout part
    fn swallow(&self, part: &str, icon: &IconDescriptor);

    /// Remove whatever object sits in a layout part
    fn unswallow(&self, part: &str);
}

/// A visible icon as laid out on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleIcon {
    /// Module name
    pub name: &'static str,
    /// Placement zone
    pub area: IconArea,
    /// Rank within the area
    pub priority: i32,
    /// Resolved image path
    pub image: Option<PathBuf>,
    /// Text label
    pub label: Option<String>,
}

/// A layout signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Signal name, e.g. `indicator.bluetooth.hide`
    pub emission: String,
    /// Signal source
    pub source: String,
}

#[derive(Debug, Default)]
struct BoardState {
    visible: BTreeMap<&'static str, VisibleIcon>,
    shows: HashMap<&'static str, usize>,
    hides: HashMap<&'static str, usize>,
    signals: Vec<Signal>,
    swallowed: HashMap<String, &'static str>,
}

/// In-memory status bar
#[derive(Debug)]
pub struct IconBoard {
    resource_dir: PathBuf,
    state: Mutex<BoardState>,
}

impl IconBoard {
    /// Create an empty board resolving images under `resource_dir`
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            state: Mutex::new(BoardState::default()),
        }
    }

    /// Directory images are resolved against
    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// Whether `name` is currently visible
    pub fn is_visible(&self, name: &str) -> bool {
        self.state.lock().visible.contains_key(name)
    }

    /// Current state of a visible icon
    pub fn icon(&self, name: &str) -> Option<VisibleIcon> {
        self.state.lock().visible.get(name).cloned()
    }

    /// How many times `name` was shown
    pub fn show_count(&self, name: &str) -> usize {
        self.state.lock().shows.get(name).copied().unwrap_or(0)
    }

    /// How many times `name` was hidden
    pub fn hide_count(&self, name: &str) -> usize {
        self.state.lock().hides.get(name).copied().unwrap_or(0)
    }

    /// Visible icons of `area` ordered by priority
    pub fn visible_in(&self, area: IconArea) -> Vec<VisibleIcon> {
        let mut icons: Vec<VisibleIcon> = self
            .state
            .lock()
            .visible
            .values()
            .filter(|icon| icon.area == area)
            .cloned()
            .collect();
        icons.sort_by_key(|icon| icon.priority);
        icons
    }

    /// All visible icons ordered by area and priority
    pub fn snapshot(&self) -> Vec<VisibleIcon> {
        let mut icons: Vec<VisibleIcon> = self.state.lock().visible.values().cloned().collect();
        icons.sort_by_key(|icon| (icon.area, icon.priority));
        icons
    }

    /// Signals emitted so far, oldest first
    pub fn signals(&self) -> Vec<Signal> {
        self.state.lock().signals.clone()
    }

    /// Most recent signal
    pub fn last_signal(&self) -> Option<Signal> {
        self.state.lock().signals.last().cloned()
    }

    /// Icon swallowed into `part`
    pub fn swallowed(&self, part: &str) -> Option<&'static str> {
        self.state.lock().swallowed.get(part).copied()
    }

    /// Forget show/hide counts and signals, keeping visible icons
    pub fn reset_counters(&self) {
        let mut state = self.state.lock();
        state.shows.clear();
        state.hides.clear();
        state.signals.clear();
    }
}

impl Presenter for IconBoard {
    fn show(&self, icon: &IconDescriptor) {
        let image = icon.image.map(|image| self.resource_dir.join(image));
        debug!(
            "Show icon {} ({}:{}) image={:?} label={:?}",
            icon.name, icon.area, icon.priority, image, icon.label
        );

        let mut state = self.state.lock();
        *state.shows.entry(icon.name).or_insert(0) += 1;
        state.visible.insert(
            icon.name,
            VisibleIcon {
                name: icon.name,
                area: icon.area,
                priority: icon.priority,
                image,
                label: icon.label.clone(),
            },
        );
    }

    fn hide(&self, icon: &IconDescriptor) {
        debug!("Hide icon {}", icon.name);

        let mut state = self.state.lock();
        *state.hides.entry(icon.name).or_insert(0) += 1;
        state.visible.remove(icon.name);
    }

    fn signal_emit(&self, emission: &str, source: &str) {
        debug!("Signal {} from {}", emission, source);

        self.state.lock().signals.push(Signal {
            emission: emission.to_string(),
            source: source.to_string(),
        });
    }

    fn swallow(&self, part: &str, icon: &IconDescriptor) {
        debug!("Swallow {} into {}", icon.name, part);
        self.state.lock().swallowed.insert(part.to_string(), icon.name);
    }

    fn unswallow(&self, part: &str) {
        debug!("Unswallow {}", part);
        self.state.lock().swallowed.remove(part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_hide_are_counted() {
        let board = IconBoard::new("/res");
        let icon = IconDescriptor::image("usb", IconArea::ConnectionSystem, 11)
            .with_image("Connection/b03_usb.png");

        board.show(&icon);
        board.show(&icon);
        assert!(board.is_visible("usb"));
        assert_eq!(board.show_count("usb"), 2);
        assert_eq!(
            board.icon("usb").unwrap().image,
            Some(PathBuf::from("/res/Connection/b03_usb.png"))
        );

        board.hide(&icon);
        assert!(!board.is_visible("usb"));
        assert_eq!(board.hide_count("usb"), 1);
    }

    #[test]
    fn test_visible_in_orders_by_priority() {
        let board = IconBoard::new("/res");
        board.show(&IconDescriptor::image("late", IconArea::Fixed, 9));
        board.show(&IconDescriptor::image("early", IconArea::Fixed, 1));
        board.show(&IconDescriptor::image("other", IconArea::Noti, 0));

        let names: Vec<_> = board
            .visible_in(IconArea::Fixed)
            .into_iter()
            .map(|icon| icon.name)
            .collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn test_signals_and_swallow() {
        let board = IconBoard::new("/res");
        board.signal_emit("indicator.more_noti.show", SIGNAL_SOURCE);
        assert_eq!(
            board.last_signal().unwrap().emission,
            "indicator.more_noti.show"
        );

        let icon = IconDescriptor::image("more_notify", IconArea::MoreNoti, 30);
        board.swallow("elm.swallow.more_noti", &icon);
        assert_eq!(board.swallowed("elm.swallow.more_noti"), Some("more_notify"));
        board.unswallow("elm.swallow.more_noti");
        assert_eq!(board.swallowed("elm.swallow.more_noti"), None);

        board.reset_counters();
        assert!(board.signals().is_empty());
    }
}
