// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::RowKey;

/// Drives a tri-state "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Some,
    All,
}

impl SelectionState {
    pub const fn marker(self) -> &'static str {
        match self {
            Self::None => "[ ]",
            Self::Some => "[-]",
            Self::All => "[x]",
        }
    }
}

/// Selected row keys for the currently fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: BTreeSet<RowKey>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, key: &RowKey) {
        if !self.selected.remove(key) {
            self.selected.insert(key.clone());
        }
    }

    /// Replaces the selection; it never unions with a previous page's picks.
    pub fn toggle_all_visible<'a, I>(&mut self, checked: bool, visible: I)
    where
        I: IntoIterator<Item = &'a RowKey>,
    {
        self.selected.clear();
        if checked {
            self.selected.extend(visible.into_iter().cloned());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter()
    }

    pub fn is_all_selected(&self, visible: &[RowKey]) -> bool {
        self.state(visible) == SelectionState::All
    }

    pub fn is_some_selected(&self, visible: &[RowKey]) -> bool {
        self.state(visible) == SelectionState::Some
    }

    pub fn state(&self, visible: &[RowKey]) -> SelectionState {
        let visible: BTreeSet<&RowKey> = visible.iter().collect();
        if visible.is_empty() {
            return SelectionState::None;
        }
        let selected = visible
            .iter()
            .filter(|key| self.selected.contains(**key))
            .count();
        if selected == 0 {
            SelectionState::None
        } else if selected == visible.len() {
            SelectionState::All
        } else {
            SelectionState::Some
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionState, SelectionTracker};
    use crate::RowKey;

    fn keys(values: &[&str]) -> Vec<RowKey> {
        values.iter().map(|value| RowKey::from(*value)).collect()
    }

    #[test]
    fn toggle_is_symmetric_difference() {
        let mut selection = SelectionTracker::new();
        let key = RowKey::from("7");
        selection.toggle(&key);
        assert!(selection.is_selected(&key));
        selection.toggle(&key);
        assert!(!selection.is_selected(&key));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_replaces_previous_selection() {
        let mut selection = SelectionTracker::new();
        selection.toggle(&RowKey::from("old"));

        let visible = keys(&["1", "2", "3"]);
        selection.toggle_all_visible(true, &visible);
        assert_eq!(selection.len(), 3);
        assert!(!selection.is_selected(&RowKey::from("old")));

        selection.toggle_all_visible(false, &visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn tri_state_over_every_subset() {
        let visible = keys(&["a", "b", "c", "d"]);
        for mask in 0_u32..16 {
            let mut selection = SelectionTracker::new();
            for (index, key) in visible.iter().enumerate() {
                if mask & (1 << index) != 0 {
                    selection.toggle(key);
                }
            }
            let count = mask.count_ones() as usize;
            let all = selection.is_all_selected(&visible);
            let some = selection.is_some_selected(&visible);
            assert_eq!(all, count == visible.len(), "mask {mask:04b}");
            assert_eq!(some, count > 0 && count < visible.len(), "mask {mask:04b}");
            assert!(!(all && some));
        }
    }

    #[test]
    fn empty_visible_set_is_neither_all_nor_some() {
        let mut selection = SelectionTracker::new();
        selection.toggle(&RowKey::from("hidden"));
        assert!(!selection.is_all_selected(&[]));
        assert!(!selection.is_some_selected(&[]));
        assert_eq!(selection.state(&[]), SelectionState::None);
    }

    #[test]
    fn keys_outside_visible_set_do_not_count() {
        let mut selection = SelectionTracker::new();
        selection.toggle(&RowKey::from("elsewhere"));
        let visible = keys(&["1", "2"]);
        assert_eq!(selection.state(&visible), SelectionState::None);
        selection.toggle(&RowKey::from("1"));
        assert_eq!(selection.state(&visible), SelectionState::Some);
        assert_eq!(SelectionState::Some.marker(), "[-]");
    }
}
