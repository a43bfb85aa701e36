//! Display list used for visual ordering
//!
//! Every registered icon is inserted once when the registry initializes. The
//! list orders icons by area, then priority, with insertion order breaking ties,
//! and is released as a whole when the registry shuts down.

use super::{IconArea, IconDescriptor};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: &'static str,
    area: IconArea,
    priority: i32,
    always_top: bool,
    seq: usize,
}

/// Ordered set of registered icons
#[derive(Debug, Default)]
pub struct IconList {
    entries: Vec<Entry>,
    names: HashSet<&'static str>,
    next_seq: usize,
}

impl IconList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an icon, keeping the list ordered
    ///
    /// Returns `false` if an icon with the same name is already listed.
    pub fn insert(&mut self, icon: &IconDescriptor) -> bool {
        if !self.names.insert(icon.name) {
            return false;
        }

        let entry = Entry {
            name: icon.name,
            area: icon.area,
            priority: icon.priority,
            always_top: icon.always_top,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        let key = |e: &Entry| (e.area, !e.always_top, e.priority, e.seq);
        let position = self
            .entries
            .partition_point(|existing| key(existing) <= key(&entry));
        self.entries.insert(position, entry);
        true
    }

    /// Remove every icon
    pub fn free_all(&mut self) {
        self.entries.clear();
        self.names.clear();
        self.next_seq = 0;
    }

    /// Number of listed icons
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` is listed
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names of the icons in `area`, in display order
    pub fn ordered(&self, area: IconArea) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.area == area)
            .map(|e| e.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::priority;

    #[test]
    fn test_ordering_by_priority_then_insertion() {
        let mut list = IconList::new();
        list.insert(&IconDescriptor::image("b", IconArea::Fixed, 5));
        list.insert(&IconDescriptor::image("a", IconArea::Fixed, 1));
        list.insert(&IconDescriptor::image("c", IconArea::Fixed, 5));
        list.insert(&IconDescriptor::image("noti", IconArea::Noti, 0));

        assert_eq!(list.ordered(IconArea::Fixed), vec!["a", "b", "c"]);
        assert_eq!(list.ordered(IconArea::Noti), vec!["noti"]);
    }

    #[test]
    fn test_always_top_goes_first() {
        let mut list = IconList::new();
        list.insert(&IconDescriptor::image("nfc", IconArea::Noti, priority::NOTI_2));
        list.insert(
            &IconDescriptor::image("top", IconArea::Noti, priority::NOTI_MIN).always_on_top(),
        );
        assert_eq!(list.ordered(IconArea::Noti), vec!["top", "nfc"]);
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let mut list = IconList::new();
        let icon = IconDescriptor::image("usb", IconArea::ConnectionSystem, 11);
        assert!(list.insert(&icon));
        assert!(!list.insert(&icon));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_free_all() {
        let mut list = IconList::new();
        list.insert(&IconDescriptor::image("usb", IconArea::ConnectionSystem, 11));
        list.free_all();
        assert!(list.is_empty());
        assert!(!list.contains("usb"));
    }
}
