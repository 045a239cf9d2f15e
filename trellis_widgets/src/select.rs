// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-choice listbox controller: a popover plus a roving highlight over
//! a fixed option list.

use core::hash::Hash;

use kurbo::{Rect, Size};
use trellis_anchor::{AnchorConfig, Resolved};
use trellis_focus::FocusTarget;
use trellis_list_nav::{Wrap, next_enabled_index, previous_enabled_index};
use trellis_overlay::{Ancestors, OverlayKind, OverlayRegistry};

use crate::popover::{Dismiss, PopoverController};

/// One option in the listbox.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectOption<K> {
    /// Host-side id, echoed back on selection.
    pub key: K,
    /// Disabled options are skipped by highlight traversal and cannot be
    /// selected.
    pub disabled: bool,
}

impl<K> SelectOption<K> {
    /// An enabled option.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self {
            key,
            disabled: false,
        }
    }

    /// Marks the option disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Controller for a select widget.
///
/// The panel behaves like any anchored popover; on top of that the
/// controller keeps a highlight roving over the options with wrap-around
/// arrow traversal, seeded from the current selection when the panel opens.
#[derive(Clone, Debug)]
pub struct SelectController<K> {
    popover: PopoverController<K>,
    options: Vec<SelectOption<K>>,
    highlighted: Option<usize>,
    selected: Option<usize>,
}

impl<K: Copy + Eq + Hash> SelectController<K> {
    /// A select with the given options, none selected.
    #[must_use]
    pub fn new(
        content: K,
        trigger: K,
        anchor_config: AnchorConfig,
        options: Vec<SelectOption<K>>,
    ) -> Self {
        Self {
            popover: PopoverController::with_kind(
                content,
                trigger,
                OverlayKind::Select,
                anchor_config,
            ),
            options,
            highlighted: None,
            selected: None,
        }
    }

    /// Registers with the overlay registry.
    pub fn mount(&self, registry: &mut OverlayRegistry<K>) {
        self.popover.mount(registry);
    }

    /// Unregisters and tears down.
    pub fn unmount(&mut self, registry: &mut OverlayRegistry<K>) {
        self.popover.unmount(registry);
        self.highlighted = None;
    }

    /// Opens the listbox, seeding the highlight from the current selection
    /// (falling back to the first enabled option). Returns `false` if
    /// already open.
    pub fn open(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> bool {
        if !self.popover.open(registry, now) {
            return false;
        }
        self.highlighted = self.selected.or_else(|| self.first_enabled());
        true
    }

    /// Closes the listbox. Returns `false` if already closed.
    pub fn close(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> bool {
        let closed = self.popover.close(registry, now);
        if closed {
            self.highlighted = None;
        }
        closed
    }

    /// Arrow-down: the next enabled option, wrapping to the top past the
    /// last one. Returns the new highlight index, or `None` when nothing is
    /// open or enabled.
    pub fn on_arrow_down(&mut self) -> Option<usize> {
        if !self.popover.is_open() {
            return None;
        }
        let next = match self.highlighted {
            Some(current) => {
                let next = next_enabled_index(&self.options, current, Wrap::Around, enabled);
                if next == current { self.first_enabled()? } else { next }
            }
            None => self.first_enabled()?,
        };
        self.highlighted = Some(next);
        Some(next)
    }

    /// Arrow-up: the previous enabled option, wrapping to the bottom past
    /// the first one.
    pub fn on_arrow_up(&mut self) -> Option<usize> {
        if !self.popover.is_open() {
            return None;
        }
        let previous = match self.highlighted {
            Some(current) => {
                let previous = previous_enabled_index(&self.options, current, Wrap::Around, enabled);
                if previous == current { self.last_enabled()? } else { previous }
            }
            None => self.last_enabled()?,
        };
        self.highlighted = Some(previous);
        Some(previous)
    }

    /// Home: the first enabled option.
    pub fn on_home(&mut self) -> Option<usize> {
        if !self.popover.is_open() {
            return None;
        }
        self.highlighted = self.first_enabled();
        self.highlighted
    }

    /// End: the last enabled option.
    pub fn on_end(&mut self) -> Option<usize> {
        if !self.popover.is_open() {
            return None;
        }
        self.highlighted = self.last_enabled();
        self.highlighted
    }

    /// Pointer hover over option `index`. Disabled options never take the
    /// highlight.
    pub fn on_item_hover(&mut self, index: usize) -> bool {
        if !self.popover.is_open() {
            return false;
        }
        match self.options.get(index) {
            Some(option) if !option.disabled => {
                self.highlighted = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Commits the highlighted option: records the selection, closes the
    /// panel, and returns the chosen key.
    pub fn select_highlighted(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> Option<K> {
        let index = self.highlighted?;
        self.select(index, registry, now)
    }

    /// Commits the option at `index` directly (a pointer click on a row).
    /// Disabled or out-of-range indices are inert.
    pub fn select(
        &mut self,
        index: usize,
        registry: &mut OverlayRegistry<K>,
        now: u64,
    ) -> Option<K> {
        let option = *self.options.get(index).filter(|o| !o.disabled)?;
        self.selected = Some(index);
        self.close(registry, now);
        Some(option.key)
    }

    /// An Escape press; closes without changing the selection.
    pub fn on_escape(
        &mut self,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> Dismiss {
        let dismiss = self.popover.on_escape(registry, tree, now);
        if dismiss == Dismiss::Closed {
            self.highlighted = None;
        }
        dismiss
    }

    /// A pointer press at `target`; closes on genuine outside presses
    /// without changing the selection.
    pub fn on_pointer_down(
        &mut self,
        target: K,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> Dismiss {
        let dismiss = self.popover.on_pointer_down(target, registry, tree, now);
        if dismiss == Dismiss::Closed {
            self.highlighted = None;
        }
        dismiss
    }

    /// Recomputes the panel position; `None` while closed.
    pub fn update_position(
        &mut self,
        anchor: Rect,
        floating: Size,
        viewport: Rect,
    ) -> Option<Resolved> {
        self.popover.update_position(anchor, floating, viewport)
    }

    /// Hands out the due deferred focus move, if any.
    pub fn poll_focus(&mut self, now: u64) -> Option<FocusTarget<K>> {
        self.popover.poll_focus(now)
    }

    /// Whether the listbox is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Index of the highlighted option.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Key of the committed selection, if any.
    #[must_use]
    pub fn selected_key(&self) -> Option<K> {
        self.selected.map(|index| self.options[index].key)
    }

    /// The option list.
    #[must_use]
    pub fn options(&self) -> &[SelectOption<K>] {
        &self.options
    }

    fn first_enabled(&self) -> Option<usize> {
        self.options.iter().position(|o| !o.disabled)
    }

    fn last_enabled(&self) -> Option<usize> {
        self.options.iter().rposition(|o| !o.disabled)
    }
}

fn enabled<K>(option: &SelectOption<K>) -> bool {
    !option.disabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_overlay::NoAncestors;

    /// [e"a", d"b", e"c"]
    fn controller() -> SelectController<&'static str> {
        SelectController::new(
            "content",
            "trigger",
            AnchorConfig::default(),
            vec![
                SelectOption::new("a"),
                SelectOption::new("b").disabled(),
                SelectOption::new("c"),
            ],
        )
    }

    #[test]
    fn open_seeds_highlight_from_selection() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();

        // No selection yet: first enabled option.
        select.open(&mut registry, 0);
        assert_eq!(select.highlighted(), Some(0));

        select.select(2, &mut registry, 0);
        assert_eq!(select.selected_key(), Some("c"));
        assert!(!select.is_open());

        // Reopening highlights the committed option.
        select.open(&mut registry, 100);
        assert_eq!(select.highlighted(), Some(2));
    }

    #[test]
    fn arrows_skip_disabled_and_wrap() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();
        select.open(&mut registry, 0);

        // 0 → 2 (skipping the disabled 1) → wraps to 0.
        assert_eq!(select.on_arrow_down(), Some(2));
        assert_eq!(select.on_arrow_down(), Some(0));
        // And back: 0 wraps to 2.
        assert_eq!(select.on_arrow_up(), Some(2));
        assert_eq!(select.on_arrow_up(), Some(0));
    }

    #[test]
    fn home_and_end_jump_to_enabled_edges() {
        let mut registry = OverlayRegistry::new();
        let mut select = SelectController::new(
            "content",
            "trigger",
            AnchorConfig::default(),
            vec![
                SelectOption::new("a").disabled(),
                SelectOption::new("b"),
                SelectOption::new("c"),
                SelectOption::new("d").disabled(),
            ],
        );
        select.open(&mut registry, 0);
        assert_eq!(select.on_end(), Some(2));
        assert_eq!(select.on_home(), Some(1));
    }

    #[test]
    fn keyboard_is_inert_while_closed() {
        let mut select = controller();
        assert_eq!(select.on_arrow_down(), None);
        assert_eq!(select.on_home(), None);
        assert!(!select.on_item_hover(0));
    }

    #[test]
    fn hover_highlights_enabled_options_only() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();
        select.open(&mut registry, 0);

        assert!(select.on_item_hover(2));
        assert_eq!(select.highlighted(), Some(2));
        assert!(!select.on_item_hover(1));
        assert!(!select.on_item_hover(9));
        assert_eq!(select.highlighted(), Some(2));
    }

    #[test]
    fn select_highlighted_commits_and_closes() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();
        select.mount(&mut registry);
        select.open(&mut registry, 0);
        select.on_arrow_down();

        assert_eq!(select.select_highlighted(&mut registry, 0), Some("c"));
        assert!(!select.is_open());
        assert!(!registry.is_open(&"content"));
        assert_eq!(select.selected_key(), Some("c"));
    }

    #[test]
    fn disabled_option_cannot_be_selected() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();
        select.open(&mut registry, 0);
        assert_eq!(select.select(1, &mut registry, 0), None);
        assert!(select.is_open());
        assert_eq!(select.selected_key(), None);
    }

    #[test]
    fn escape_closes_without_committing() {
        let mut registry = OverlayRegistry::new();
        let mut select = controller();
        select.mount(&mut registry);
        select.open(&mut registry, 0);
        select.on_arrow_down();

        assert_eq!(select.on_escape(&mut registry, &NoAncestors, 0), Dismiss::Closed);
        assert_eq!(select.selected_key(), None);
        assert_eq!(select.highlighted(), None);
    }
}
