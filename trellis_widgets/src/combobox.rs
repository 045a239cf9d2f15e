// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filterable listbox controller: a popover with an embedded
//! [`FilterEngine`].

use core::hash::Hash;

use kurbo::{Rect, Size};
use trellis_anchor::{AnchorConfig, Resolved};
use trellis_filter::{
    ConfigError, FilterConfig, FilterEngine, Generation, Group, HoverOutcome, InputOutcome, Item,
    RemoteItem, ScrollCommand, SearchCommand, SearchOutcome,
};
use trellis_focus::FocusTarget;
use trellis_overlay::{Ancestors, OverlayKind, OverlayRegistry};

use crate::popover::{Dismiss, PopoverController};

/// Result of closing the combobox panel, by commit or dismissal.
///
/// Closing resets the filter, which may obsolete an in-flight search; the
/// host should abort the named request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CloseOutcome<K> {
    /// The committed key, when the close was a selection.
    pub committed: Option<K>,
    /// An in-flight search request to abort.
    pub cancel: Option<Generation>,
}

/// Result of a dismiss gesture on the combobox.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComboboxDismiss {
    /// The panel closed; abort the named search request, if any.
    Closed {
        /// An in-flight search request to abort.
        cancel: Option<Generation>,
    },
    /// A nested overlay is open; the gesture belongs to it.
    Blocked,
    /// Closed already, or the event landed on the trigger or in the panel.
    Ignored,
}

/// Controller for a combobox or command palette.
///
/// The panel is an ordinary anchored popover; the list inside it is a
/// [`FilterEngine`]. The controller's own job is small: typing opens the
/// panel, closing it (however that happens) resets the filter and surfaces
/// the generation of any search the reset obsoleted, and everything else
/// forwards. Hosts keep driving the engine protocol — poll for
/// [`SearchCommand`]s, report outcomes back — through this type.
pub struct ComboboxController<K> {
    popover: PopoverController<K>,
    engine: FilterEngine<K>,
}

impl<K: Copy + Eq + Hash> ComboboxController<K> {
    /// A combobox with the given anchor and filter configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] from the filter engine.
    pub fn new(
        content: K,
        trigger: K,
        anchor_config: AnchorConfig,
        filter_config: FilterConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            popover: PopoverController::with_kind(
                content,
                trigger,
                OverlayKind::Combobox,
                anchor_config,
            ),
            engine: FilterEngine::new(filter_config)?,
        })
    }

    /// Replaces the item and group tables.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::GroupOutOfRange`] from the engine.
    pub fn set_items(&mut self, items: Vec<Item<K>>, groups: Vec<Group>) -> Result<(), ConfigError> {
        self.engine.set_items(items, groups)
    }

    /// Registers with the overlay registry.
    pub fn mount(&self, registry: &mut OverlayRegistry<K>) {
        self.popover.mount(registry);
    }

    /// Unregisters and tears down.
    pub fn unmount(&mut self, registry: &mut OverlayRegistry<K>) {
        self.popover.unmount(registry);
    }

    /// Opens the panel. Returns `false` if already open.
    pub fn open(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> bool {
        self.popover.open(registry, now)
    }

    /// Closes the panel and resets the filter. Returns `None` if already
    /// closed.
    pub fn close(
        &mut self,
        registry: &mut OverlayRegistry<K>,
        now: u64,
    ) -> Option<CloseOutcome<K>> {
        if !self.popover.close(registry, now) {
            return None;
        }
        Some(CloseOutcome {
            committed: None,
            cancel: self.engine.on_input("", now).cancel,
        })
    }

    /// Commits the highlighted item: closes the panel and returns the key.
    /// Inert when nothing is highlighted or the panel is closed.
    pub fn commit(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> Option<CloseOutcome<K>> {
        if !self.popover.is_open() {
            return None;
        }
        let key = self.engine.highlighted_key()?;
        self.popover.close(registry, now);
        Some(CloseOutcome {
            committed: Some(key),
            cancel: self.engine.on_input("", now).cancel,
        })
    }

    /// Feeds one input event, opening the panel first if it is closed
    /// (typing into the field is how a combobox opens).
    pub fn on_input(
        &mut self,
        value: &str,
        registry: &mut OverlayRegistry<K>,
        now: u64,
    ) -> InputOutcome {
        self.popover.open(registry, now);
        self.engine.on_input(value, now)
    }

    /// Checks the debounce deadline; see [`FilterEngine::poll`].
    pub fn poll_search(&mut self, now: u64) -> Option<SearchCommand> {
        self.engine.poll(now)
    }

    /// Applies a remote response; see [`FilterEngine::on_search_success`].
    pub fn on_search_success(
        &mut self,
        generation: Generation,
        results: Vec<RemoteItem<K>>,
    ) -> SearchOutcome {
        self.engine.on_search_success(generation, results)
    }

    /// Reports a failed request; see [`FilterEngine::on_search_error`].
    pub fn on_search_error(&mut self, generation: Generation) -> SearchOutcome {
        self.engine.on_search_error(generation)
    }

    /// Arrow-down over the filtered list.
    pub fn on_arrow_down(&mut self, now: u64) -> Option<ScrollCommand> {
        if !self.popover.is_open() {
            return None;
        }
        self.engine.highlight_next(now)
    }

    /// Arrow-up over the filtered list.
    pub fn on_arrow_up(&mut self, now: u64) -> Option<ScrollCommand> {
        if !self.popover.is_open() {
            return None;
        }
        self.engine.highlight_previous(now)
    }

    /// Pointer hover over a filtered row.
    pub fn on_item_hover(&mut self, position: usize, now: u64) -> HoverOutcome {
        if !self.popover.is_open() {
            return HoverOutcome::Ignored;
        }
        self.engine.on_item_hover(position, now)
    }

    /// An Escape press.
    pub fn on_escape(
        &mut self,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> ComboboxDismiss {
        match self.popover.on_escape(registry, tree, now) {
            Dismiss::Closed => ComboboxDismiss::Closed {
                cancel: self.engine.on_input("", now).cancel,
            },
            Dismiss::Blocked => ComboboxDismiss::Blocked,
            Dismiss::Ignored => ComboboxDismiss::Ignored,
        }
    }

    /// A pointer press at `target`.
    pub fn on_pointer_down(
        &mut self,
        target: K,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> ComboboxDismiss {
        match self.popover.on_pointer_down(target, registry, tree, now) {
            Dismiss::Closed => ComboboxDismiss::Closed {
                cancel: self.engine.on_input("", now).cancel,
            },
            Dismiss::Blocked => ComboboxDismiss::Blocked,
            Dismiss::Ignored => ComboboxDismiss::Ignored,
        }
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

    /// Whether the panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// The embedded engine, for rendering the list.
    #[must_use]
    pub const fn engine(&self) -> &FilterEngine<K> {
        &self.engine
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for ComboboxController<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComboboxController")
            .field("popover", &self.popover)
            .field("engine", &self.engine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_filter::RemoteConfig;
    use trellis_overlay::NoAncestors;

    fn controller() -> ComboboxController<u32> {
        let mut combobox = ComboboxController::new(
            9_u32,
            2,
            AnchorConfig::default(),
            FilterConfig {
                remote: Some(RemoteConfig::new("/search")),
                ..FilterConfig::default()
            },
        )
        .expect("valid config");
        combobox
            .set_items(
                vec![Item::new(0, "Apple"), Item::new(1, "Apricot"), Item::new(2, "Cherry")],
                Vec::new(),
            )
            .expect("valid items");
        combobox
    }

    #[test]
    fn typing_opens_the_panel_and_filters() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        combobox.mount(&mut registry);
        assert!(!combobox.is_open());

        combobox.on_input("ap", &mut registry, 0);
        assert!(combobox.is_open());
        assert!(registry.is_open(&9));
        assert_eq!(combobox.engine().filtered_len(), 2);
    }

    #[test]
    fn commit_returns_the_highlighted_key_and_closes() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        // Only Apricot matches; the filter pass highlights it.
        combobox.on_input("apr", &mut registry, 0);

        let outcome = combobox.commit(&mut registry, 0).expect("open with highlight");
        assert_eq!(outcome.committed, Some(1));
        assert!(!combobox.is_open());
        // The filter is reset for the next open.
        assert_eq!(combobox.engine().query(), "");
        assert_eq!(combobox.engine().filtered_len(), 3);
    }

    #[test]
    fn commit_with_nothing_highlighted_is_inert() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        combobox.open(&mut registry, 0);
        assert_eq!(combobox.commit(&mut registry, 0), None);
        assert!(combobox.is_open());
    }

    #[test]
    fn closing_cancels_a_search_in_flight() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        combobox.on_input("ap", &mut registry, 0);
        let command = combobox.poll_search(300).expect("debounce elapsed");

        let outcome = combobox.close(&mut registry, 400).expect("was open");
        assert_eq!(outcome.cancel, Some(command.generation));

        // The late response is stale.
        assert_eq!(
            combobox.on_search_success(command.generation, vec![RemoteItem::new(9, "Late")]),
            SearchOutcome::Stale
        );
    }

    #[test]
    fn escape_closes_and_cancels() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        combobox.on_input("ap", &mut registry, 0);
        let command = combobox.poll_search(300).expect("debounce elapsed");

        let dismiss = combobox.on_escape(&mut registry, &NoAncestors, 400);
        assert_eq!(
            dismiss,
            ComboboxDismiss::Closed {
                cancel: Some(command.generation)
            }
        );
        assert_eq!(combobox.on_escape(&mut registry, &NoAncestors, 500), ComboboxDismiss::Ignored);
    }

    #[test]
    fn keyboard_and_hover_are_inert_while_closed() {
        let mut combobox = controller();
        assert_eq!(combobox.on_arrow_down(0), None);
        assert_eq!(combobox.on_item_hover(0, 0), HoverOutcome::Ignored);
    }

    #[test]
    fn remote_results_flow_through_to_the_list() {
        let mut registry = OverlayRegistry::new();
        let mut combobox = controller();
        combobox.on_input("ap", &mut registry, 0);
        let command = combobox.poll_search(300).expect("debounce elapsed");

        let outcome = combobox.on_search_success(
            command.generation,
            vec![RemoteItem::new(7, "Asian pear").in_group("More results")],
        );
        assert_eq!(outcome, SearchOutcome::Applied { injected: 1 });
        assert_eq!(combobox.engine().filtered_len(), 3);
    }
}
