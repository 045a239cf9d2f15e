// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal dialog controller, also the shape used for edge-docked sheets.

use core::hash::Hash;

use log::debug;
use trellis_focus::{DeferredFocus, FocusTarget, TabDirection, trap_tab};
use trellis_overlay::{Ancestors, OverlayKind, OverlayRegistry, is_outside_event};
use trellis_scroll_lock::{LockChange, ScrollLock, Unlock};

/// Result of a dismiss gesture (Escape or pointer-down outside) on a modal.
#[derive(Debug, PartialEq, Eq)]
pub enum DismissOutcome<C> {
    /// The modal closed; the contained [`Unlock`] tells the host whether to
    /// restore the scroll surface.
    Dismissed(Unlock<C>),
    /// A nested overlay is open; the gesture belongs to it, not to this
    /// modal.
    Blocked,
    /// Nothing to do: the modal was closed already, or the event landed on
    /// the trigger or inside the panel.
    Ignored,
}

/// Controller for a modal dialog or sheet.
///
/// Opening engages the shared scroll lock and schedules a deferred focus
/// move into the panel; closing releases the lock and schedules focus back
/// to the trigger. Tab presses cycle inside the panel via [`trap_tab`], and
/// dismiss gestures consult the [`OverlayRegistry`] so an open nested
/// overlay — however far away its panel is portaled — keeps the modal from
/// closing underneath it.
///
/// The controller holds no tree and no styles; every method takes the
/// services it needs and returns effect values for the host to apply.
#[derive(Clone, Debug)]
pub struct DialogController<K> {
    content: K,
    trigger: K,
    kind: OverlayKind,
    open: bool,
    focus: DeferredFocus<K>,
}

impl<K: Copy + Eq + Hash> DialogController<K> {
    /// A dialog with `content` as its panel root and `trigger` as the
    /// element that opened it.
    #[must_use]
    pub const fn new(content: K, trigger: K) -> Self {
        Self::with_kind(content, trigger, OverlayKind::Dialog)
    }

    /// The same controller driving a sheet.
    #[must_use]
    pub const fn sheet(content: K, trigger: K) -> Self {
        Self::with_kind(content, trigger, OverlayKind::Sheet)
    }

    const fn with_kind(content: K, trigger: K, kind: OverlayKind) -> Self {
        Self {
            content,
            trigger,
            kind,
            open: false,
            focus: DeferredFocus::new(),
        }
    }

    /// Overrides the deferred-focus delay, e.g. to match a longer
    /// open/close transition.
    #[must_use]
    pub const fn with_focus_delay(mut self, delay_ms: u64) -> Self {
        self.focus = DeferredFocus::with_delay(delay_ms);
        self
    }

    /// Registers with the overlay registry. Call when the widget's subtree
    /// connects.
    pub fn mount(&self, registry: &mut OverlayRegistry<K>) {
        registry.register(self.content, self.kind, self.trigger);
    }

    /// Unregisters and releases anything still held. Call when the subtree
    /// disconnects; a dialog removed while open must not leave the page
    /// scroll-locked.
    pub fn unmount<C>(
        &mut self,
        registry: &mut OverlayRegistry<K>,
        lock: &mut ScrollLock<K, C>,
    ) -> Unlock<C> {
        registry.unregister(&self.content);
        self.focus.cancel();
        self.open = false;
        lock.unlock(&self.content)
    }

    /// Opens the dialog: engages the scroll lock (capturing pre-lock style
    /// through `capture` if this is the first holder), flips the registry
    /// flag, and schedules a deferred focus move into the panel.
    ///
    /// Returns `None` if already open.
    pub fn open<'a, C>(
        &mut self,
        lock: &'a mut ScrollLock<K, C>,
        registry: &mut OverlayRegistry<K>,
        capture: impl FnOnce() -> C,
        now: u64,
    ) -> Option<LockChange<'a, C>> {
        if self.open {
            return None;
        }
        self.open = true;
        registry.set_open(self.content, true);
        self.focus.schedule(FocusTarget::Content(self.content), now);
        debug!("{} opened", self.kind.name());
        Some(lock.lock(self.content, capture))
    }

    /// Closes the dialog: releases this holder's share of the scroll lock,
    /// clears the registry flag, and schedules focus back to the trigger.
    ///
    /// Returns `None` if already closed.
    pub fn close<C>(
        &mut self,
        lock: &mut ScrollLock<K, C>,
        registry: &mut OverlayRegistry<K>,
        now: u64,
    ) -> Option<Unlock<C>> {
        if !self.open {
            return None;
        }
        self.open = false;
        registry.set_open(self.content, false);
        self.focus.schedule(FocusTarget::Trigger(self.trigger), now);
        debug!("{} closed", self.kind.name());
        Some(lock.unlock(&self.content))
    }

    /// A Tab/Shift+Tab press while the dialog is open. `stops` are the
    /// panel's focusable descendants in tree order, queried by the host at
    /// call time; returns the element to move focus to when the press
    /// crosses an edge of the trap.
    #[must_use]
    pub fn on_tab(&self, stops: &[K], current: K, direction: TabDirection) -> Option<K> {
        if !self.open {
            return None;
        }
        trap_tab(stops, current, direction)
    }

    /// An Escape press. Closes the dialog unless a nested overlay inside
    /// the panel is open, in which case the press belongs to that overlay.
    pub fn on_escape<C>(
        &mut self,
        lock: &mut ScrollLock<K, C>,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> DismissOutcome<C> {
        if !self.open {
            return DismissOutcome::Ignored;
        }
        if registry.has_open_overlay_within(self.content, tree) {
            debug!("{} escape blocked by a nested overlay", self.kind.name());
            return DismissOutcome::Blocked;
        }
        match self.close(lock, registry, now) {
            Some(unlock) => DismissOutcome::Dismissed(unlock),
            None => DismissOutcome::Ignored,
        }
    }

    /// A pointer press at `target`. Dismisses only genuine outside presses:
    /// presses on the trigger (it owns its own toggling), inside the panel,
    /// or while a nested overlay is open are left alone.
    pub fn on_pointer_down<C>(
        &mut self,
        target: K,
        lock: &mut ScrollLock<K, C>,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> DismissOutcome<C> {
        if !self.open
            || !is_outside_event(self.trigger, target, tree)
            || tree.is_within(target, self.content)
        {
            return DismissOutcome::Ignored;
        }
        if registry.has_open_overlay_within(self.content, tree) {
            debug!("{} outside press blocked by a nested overlay", self.kind.name());
            return DismissOutcome::Blocked;
        }
        match self.close(lock, registry, now) {
            Some(unlock) => DismissOutcome::Dismissed(unlock),
            None => DismissOutcome::Ignored,
        }
    }

    /// Hands out the due deferred focus move, if any. One-shot.
    pub fn poll_focus(&mut self, now: u64) -> Option<FocusTarget<K>> {
        self.focus.poll(now)
    }

    /// Whether the dialog is currently open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The panel root node.
    #[must_use]
    pub const fn content(&self) -> K {
        self.content
    }

    /// The trigger node.
    #[must_use]
    pub const fn trigger(&self) -> K {
        self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_overlay::NoAncestors;

    /// root(0) ── trigger(1)
    ///        └── dialog-content(2) ── nested-trigger(3)
    ///        └── portal-host(8) ── nested-popover-content(9)
    struct Tree;

    impl Ancestors<u32> for Tree {
        fn parent_of(&self, node: u32) -> Option<u32> {
            match node {
                1 | 2 | 8 => Some(0),
                3 => Some(2),
                9 => Some(8),
                _ => None,
            }
        }
    }

    fn services() -> (ScrollLock<u32, f64>, OverlayRegistry<u32>) {
        (ScrollLock::new(), OverlayRegistry::new())
    }

    #[test]
    fn open_locks_scroll_and_schedules_content_focus() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        dialog.mount(&mut registry);

        let change = dialog.open(&mut lock, &mut registry, || 16.0, 1_000);
        assert_eq!(change, Some(LockChange::Engaged(&16.0)));
        assert!(dialog.is_open());
        assert!(registry.is_open(&2));

        // Focus lands in the panel after the transition delay.
        assert_eq!(dialog.poll_focus(1_000), None);
        assert_eq!(dialog.poll_focus(1_025), Some(FocusTarget::Content(2)));

        // A second open is a no-op.
        assert_eq!(dialog.open(&mut lock, &mut registry, || 0.0, 1_100), None);
    }

    #[test]
    fn close_unlocks_and_returns_focus_to_trigger() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        dialog.mount(&mut registry);
        dialog.open(&mut lock, &mut registry, || 16.0, 0);

        let unlock = dialog.close(&mut lock, &mut registry, 2_000);
        assert_eq!(unlock, Some(Unlock::Released(16.0)));
        assert!(!registry.is_open(&2));
        assert_eq!(dialog.poll_focus(2_025), Some(FocusTarget::Trigger(1)));

        assert_eq!(dialog.close(&mut lock, &mut registry, 2_100), None);
    }

    #[test]
    fn two_modals_share_the_lock() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        let mut sheet = DialogController::sheet(4_u32, 5);
        dialog.open(&mut lock, &mut registry, || 16.0, 0);
        assert_eq!(sheet.open(&mut lock, &mut registry, || 0.0, 0), Some(LockChange::Retained));

        // First close keeps the page locked for the other modal.
        assert_eq!(dialog.close(&mut lock, &mut registry, 0), Some(Unlock::Retained));
        assert!(lock.is_locked());
        assert_eq!(sheet.close(&mut lock, &mut registry, 0), Some(Unlock::Released(16.0)));
        assert!(!lock.is_locked());
    }

    #[test]
    fn tab_cycles_only_while_open() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        let stops = [10_u32, 11, 12];

        assert_eq!(dialog.on_tab(&stops, 12, TabDirection::Forward), None);
        dialog.open(&mut lock, &mut registry, || 0.0, 0);
        assert_eq!(dialog.on_tab(&stops, 12, TabDirection::Forward), Some(10));
        assert_eq!(dialog.on_tab(&stops, 10, TabDirection::Backward), Some(12));
        assert_eq!(dialog.on_tab(&stops, 11, TabDirection::Forward), None);
    }

    #[test]
    fn open_nested_overlay_blocks_dismissal() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        dialog.mount(&mut registry);
        dialog.open(&mut lock, &mut registry, || 16.0, 0);

        // A popover portaled to node 9 but hosted at the nested trigger (3)
        // inside the dialog panel.
        registry.register(9, OverlayKind::Popover, 3);
        registry.set_open(9, true);

        assert_eq!(dialog.on_escape(&mut lock, &mut registry, &Tree, 0), DismissOutcome::Blocked);
        assert_eq!(
            dialog.on_pointer_down(9, &mut lock, &mut registry, &Tree, 0),
            DismissOutcome::Blocked
        );
        assert!(dialog.is_open());

        // Once the popover closes, the same gestures dismiss the dialog.
        registry.set_open(9, false);
        assert_eq!(
            dialog.on_escape(&mut lock, &mut registry, &Tree, 0),
            DismissOutcome::Dismissed(Unlock::Released(16.0))
        );
    }

    #[test]
    fn presses_on_trigger_or_panel_are_ignored() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        dialog.open(&mut lock, &mut registry, || 16.0, 0);

        // On the trigger: the trigger owns its own toggling.
        assert_eq!(
            dialog.on_pointer_down(1, &mut lock, &mut registry, &Tree, 0),
            DismissOutcome::Ignored
        );
        // Inside the panel.
        assert_eq!(
            dialog.on_pointer_down(3, &mut lock, &mut registry, &Tree, 0),
            DismissOutcome::Ignored
        );
        assert!(dialog.is_open());

        // Genuinely outside.
        assert_eq!(
            dialog.on_pointer_down(8, &mut lock, &mut registry, &Tree, 0),
            DismissOutcome::Dismissed(Unlock::Released(16.0))
        );
    }

    #[test]
    fn unmount_while_open_releases_everything() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        dialog.mount(&mut registry);
        dialog.open(&mut lock, &mut registry, || 16.0, 0);

        assert_eq!(dialog.unmount(&mut registry, &mut lock), Unlock::Released(16.0));
        assert!(registry.is_empty());
        assert!(!lock.is_locked());
        assert_eq!(dialog.poll_focus(u64::MAX), None);
    }

    #[test]
    fn escape_while_closed_is_ignored() {
        let (mut lock, mut registry) = services();
        let mut dialog = DialogController::new(2_u32, 1);
        assert_eq!(
            dialog.on_escape(&mut lock, &mut registry, &NoAncestors, 0),
            DismissOutcome::Ignored
        );
    }
}
