// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Overlay: who is open where, and whether a dismiss gesture counts.
//!
//! Overlay-style widgets nest: a select inside a dialog, a popover inside a
//! sheet, a date picker inside a popover. Their panels are frequently
//! *portaled* — rendered at the end of the document while logically belonging
//! to a trigger deep inside another overlay — so a click that is spatially
//! "outside" a dialog may still be logically inside it. A dialog must not
//! close itself because the user clicked an open combobox list that merely
//! renders elsewhere.
//!
//! The original pattern for answering "is any nested overlay open?" is a
//! fresh tree walk per check. Here it is an explicit [`OverlayRegistry`]:
//! widgets register on mount with the node their trigger lives at (resolving
//! the portal back to its logical home), flip an open flag as their state
//! changes, and unregister on unmount. Containment questions go through the
//! host's [`Ancestors`] adapter, so the registry itself never needs a tree.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_overlay::{Ancestors, OverlayKind, OverlayRegistry};
//!
//! // A toy tree: child → parent edges.
//! struct Tree;
//! impl Ancestors<u32> for Tree {
//!     fn parent_of(&self, node: u32) -> Option<u32> {
//!         match node {
//!             2 => Some(1), // trigger inside the dialog
//!             1 => Some(0), // dialog inside the root
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
//! // The popover's content is portaled to node 9, but it registers under
//! // its trigger at node 2 — inside the dialog at node 1.
//! registry.register(9, OverlayKind::Popover, 2);
//! registry.set_open(9, true);
//!
//! assert!(registry.has_open_overlay_within(1, &Tree));
//! ```
//!
//! Unknown ids are tolerated everywhere: overlay composition is optional and
//! widgets must work standalone, so lookups that find nothing are no-ops.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use core::hash::Hash;

use hashbrown::HashMap;

/// The overlay-style widget types that participate in dismiss coordination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Modal dialog.
    Dialog,
    /// Edge-docked modal sheet.
    Sheet,
    /// Non-modal anchored panel.
    Popover,
    /// Action menu anchored to a trigger.
    DropdownMenu,
    /// Single-choice listbox panel.
    Select,
    /// Filterable listbox panel.
    Combobox,
    /// Hover/focus description bubble.
    Tooltip,
    /// Rich hover preview.
    HoverCard,
    /// Single-date calendar panel.
    DatePicker,
    /// Range calendar panel.
    DateRangePicker,
}

impl OverlayKind {
    /// Stable widget-type name, matching the attachment marker a host puts
    /// in its markup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::Sheet => "sheet",
            Self::Popover => "popover",
            Self::DropdownMenu => "dropdown-menu",
            Self::Select => "select",
            Self::Combobox => "combobox",
            Self::Tooltip => "tooltip",
            Self::HoverCard => "hover-card",
            Self::DatePicker => "date-picker",
            Self::DateRangePicker => "date-range-picker",
        }
    }
}

/// Host adapter answering parent queries over its tree.
///
/// Implementations walk whatever structure the host keeps — a real document,
/// a retained widget tree, or a test fixture map.
pub trait Ancestors<K> {
    /// The parent of `node`, or `None` at a root.
    fn parent_of(&self, node: K) -> Option<K>;

    /// Returns `true` when `node` is `root` or lies in `root`'s subtree.
    fn is_within(&self, node: K, root: K) -> bool
    where
        K: Copy + Eq,
    {
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            if n == root {
                return true;
            }
            cursor = self.parent_of(n);
        }
        false
    }
}

/// An [`Ancestors`] source for flat hosts with no hierarchy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoAncestors;

impl<K> Ancestors<K> for NoAncestors {
    fn parent_of(&self, _node: K) -> Option<K> {
        None
    }
}

/// One registered overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayEntry<K> {
    /// Which widget type this is.
    pub kind: OverlayKind,
    /// Where the overlay logically lives: the node carrying its trigger.
    /// For portaled content this is deliberately *not* where the panel
    /// renders.
    pub host: K,
    /// Live open/closed flag.
    pub open: bool,
}

/// Process-wide map from overlay content id to its live state.
///
/// Mount/unmount discipline is explicit: controllers register when their
/// subtree connects and unregister when it disconnects, rather than being
/// re-derived by tree walks on every check.
#[derive(Clone, Debug)]
pub struct OverlayRegistry<K> {
    entries: HashMap<K, OverlayEntry<K>>,
}

impl<K: Copy + Eq + Hash> OverlayRegistry<K> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers overlay `content` of `kind`, hosted at `host`. Registering
    /// the same content id again overwrites the stale entry (a remount).
    pub fn register(&mut self, content: K, kind: OverlayKind, host: K) {
        self.entries.insert(
            content,
            OverlayEntry {
                kind,
                host,
                open: false,
            },
        );
    }

    /// Removes overlay `content`. Unknown ids are a no-op.
    pub fn unregister(&mut self, content: &K) {
        self.entries.remove(content);
    }

    /// Updates the open flag for `content`. Unknown ids are a no-op.
    pub fn set_open(&mut self, content: K, open: bool) {
        if let Some(entry) = self.entries.get_mut(&content) {
            entry.open = open;
        }
    }

    /// Looks up the entry for `content`.
    #[must_use]
    pub fn get(&self, content: &K) -> Option<&OverlayEntry<K>> {
        self.entries.get(content)
    }

    /// Returns `true` when `content` is registered and open.
    #[must_use]
    pub fn is_open(&self, content: &K) -> bool {
        self.entries.get(content).is_some_and(|e| e.open)
    }

    /// Number of registered overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when any registered overlay hosted within `root`'s
    /// subtree is open.
    ///
    /// This is what a modal's outside-click handler consults before closing:
    /// an open descendant overlay means the gesture belongs to that overlay,
    /// however far away its panel renders.
    #[must_use]
    pub fn has_open_overlay_within(&self, root: K, tree: &impl Ancestors<K>) -> bool {
        self.entries
            .values()
            .any(|entry| entry.open && tree.is_within(entry.host, root))
    }
}

impl<K: Copy + Eq + Hash> Default for OverlayRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` when an event at `target` is genuinely outside `trigger`.
///
/// A press on the trigger (or anything inside it) is not an outside click:
/// the trigger owns its own toggling, and a generic dismiss handler acting on
/// it would double-handle the gesture.
#[must_use]
pub fn is_outside_event<K: Copy + Eq>(trigger: K, target: K, tree: &impl Ancestors<K>) -> bool {
    !tree.is_within(target, trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Child → parent fixture tree.
    struct FixtureTree {
        edges: Vec<(u32, u32)>,
    }

    impl Ancestors<u32> for FixtureTree {
        fn parent_of(&self, node: u32) -> Option<u32> {
            self.edges
                .iter()
                .find(|(child, _)| *child == node)
                .map(|(_, parent)| *parent)
        }
    }

    /// root(0) ── dialog(1) ── trigger(2)
    ///        └── portal-host(8) ── popover-content(9)
    fn tree() -> FixtureTree {
        FixtureTree {
            edges: alloc::vec![(1, 0), (2, 1), (8, 0), (9, 8)],
        }
    }

    #[test]
    fn portaled_open_popover_counts_as_inside_its_logical_parent() {
        let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
        // Content renders under the portal host (9), but the overlay is
        // hosted at its trigger (2) inside the dialog (1).
        registry.register(9, OverlayKind::Popover, 2);

        assert!(!registry.has_open_overlay_within(1, &tree()));
        registry.set_open(9, true);
        assert!(registry.has_open_overlay_within(1, &tree()));

        // Closed again: the dialog is free to dismiss.
        registry.set_open(9, false);
        assert!(!registry.has_open_overlay_within(1, &tree()));
    }

    #[test]
    fn overlays_hosted_elsewhere_do_not_block_dismissal() {
        let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
        // An open tooltip hosted directly under the root, outside the dialog.
        registry.register(9, OverlayKind::Tooltip, 8);
        registry.set_open(9, true);

        assert!(!registry.has_open_overlay_within(1, &tree()));
        assert!(registry.has_open_overlay_within(0, &tree()));
    }

    #[test]
    fn unknown_ids_are_tolerated_no_ops() {
        let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
        registry.set_open(42, true);
        registry.unregister(&42);
        assert!(!registry.is_open(&42));
        assert!(registry.is_empty());
    }

    #[test]
    fn remount_overwrites_the_stale_entry() {
        let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
        registry.register(9, OverlayKind::Popover, 2);
        registry.set_open(9, true);

        // Remount under a different host: open state resets.
        registry.register(9, OverlayKind::Popover, 8);
        assert!(!registry.is_open(&9));
        assert_eq!(registry.get(&9).map(|e| e.host), Some(8));
    }

    #[test]
    fn unregister_on_unmount_clears_the_open_flag_with_it() {
        let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
        registry.register(9, OverlayKind::Select, 2);
        registry.set_open(9, true);
        registry.unregister(&9);
        assert!(!registry.has_open_overlay_within(1, &tree()));
    }

    #[test]
    fn outside_event_excludes_the_trigger_subtree() {
        let tree = tree();
        // Target is the trigger itself.
        assert!(!is_outside_event(2, 2, &tree));
        // Target is an ancestor of the trigger, not inside it.
        assert!(is_outside_event(2, 1, &tree));
        // Target elsewhere in the document.
        assert!(is_outside_event(2, 9, &tree));
    }

    #[test]
    fn is_within_includes_the_root_itself() {
        let tree = tree();
        assert!(tree.is_within(1, 1));
        assert!(tree.is_within(2, 0));
        assert!(!tree.is_within(0, 2));
    }

    #[test]
    fn kind_names_match_attachment_markers() {
        assert_eq!(OverlayKind::DropdownMenu.name(), "dropdown-menu");
        assert_eq!(OverlayKind::DateRangePicker.name(), "date-range-picker");
    }
}
