// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored non-modal panel controller: popovers, dropdown menus, tooltips,
//! hover cards.

use core::hash::Hash;

use kurbo::{Rect, Size};
use log::debug;
use trellis_anchor::{AnchorConfig, AnchorSession, Resolved};
use trellis_focus::{DeferredFocus, FocusTarget};
use trellis_overlay::{Ancestors, OverlayKind, OverlayRegistry, is_outside_event};

/// Result of a dismiss gesture on a non-modal overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dismiss {
    /// The overlay closed.
    Closed,
    /// A nested overlay is open; the gesture belongs to it.
    Blocked,
    /// Closed already, or the event landed on the trigger or in the panel.
    Ignored,
}

/// Controller for an anchored, non-modal overlay.
///
/// While open it owns one [`AnchorSession`]; the host forwards geometry into
/// [`PopoverController::update_position`] whenever anything may have moved.
/// Closing disposes the session exactly once, so no subscription keeps
/// repositioning a hidden panel. Unlike modals, popovers never touch the
/// scroll lock.
#[derive(Clone, Debug)]
pub struct PopoverController<K> {
    content: K,
    trigger: K,
    kind: OverlayKind,
    anchor_config: AnchorConfig,
    session: Option<AnchorSession>,
    focus: DeferredFocus<K>,
    open: bool,
}

impl<K: Copy + Eq + Hash> PopoverController<K> {
    /// A plain popover anchored to `trigger`.
    #[must_use]
    pub const fn new(content: K, trigger: K, anchor_config: AnchorConfig) -> Self {
        Self::with_kind(content, trigger, OverlayKind::Popover, anchor_config)
    }

    /// The same shape driving another non-modal overlay kind (dropdown
    /// menu, tooltip, hover card, select, combobox).
    #[must_use]
    pub const fn with_kind(
        content: K,
        trigger: K,
        kind: OverlayKind,
        anchor_config: AnchorConfig,
    ) -> Self {
        Self {
            content,
            trigger,
            kind,
            anchor_config,
            session: None,
            focus: DeferredFocus::new(),
            open: false,
        }
    }

    /// Registers with the overlay registry, resolving portals: the entry is
    /// hosted at the trigger's node, wherever the panel renders.
    pub fn mount(&self, registry: &mut OverlayRegistry<K>) {
        registry.register(self.content, self.kind, self.trigger);
    }

    /// Unregisters and tears down any live positioning session.
    pub fn unmount(&mut self, registry: &mut OverlayRegistry<K>) {
        registry.unregister(&self.content);
        self.focus.cancel();
        self.open = false;
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
    }

    /// Opens the panel: flips the registry flag, starts a positioning
    /// session, and schedules a deferred focus move into the panel.
    /// Returns `false` if already open.
    pub fn open(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        registry.set_open(self.content, true);
        self.session = Some(AnchorSession::new(self.anchor_config));
        self.focus.schedule(FocusTarget::Content(self.content), now);
        debug!("{} opened", self.kind.name());
        true
    }

    /// Closes the panel, disposing the positioning session exactly once and
    /// scheduling focus back to the trigger. Returns `false` if already
    /// closed.
    pub fn close(&mut self, registry: &mut OverlayRegistry<K>, now: u64) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        registry.set_open(self.content, false);
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
        self.focus.schedule(FocusTarget::Trigger(self.trigger), now);
        debug!("{} closed", self.kind.name());
        true
    }

    /// Recomputes the panel position for the current geometry. `None` while
    /// closed, or when geometry went non-finite mid-update.
    pub fn update_position(
        &mut self,
        anchor: Rect,
        floating: Size,
        viewport: Rect,
    ) -> Option<Resolved> {
        self.session.as_mut()?.update(anchor, floating, viewport)
    }

    /// An Escape press.
    pub fn on_escape(
        &mut self,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> Dismiss {
        if !self.open {
            return Dismiss::Ignored;
        }
        if registry.has_open_overlay_within(self.content, tree) {
            return Dismiss::Blocked;
        }
        if self.close(registry, now) { Dismiss::Closed } else { Dismiss::Ignored }
    }

    /// A pointer press at `target`. Presses on the trigger or inside the
    /// panel are left alone; so are outside presses while a nested overlay
    /// is open.
    pub fn on_pointer_down(
        &mut self,
        target: K,
        registry: &mut OverlayRegistry<K>,
        tree: &impl Ancestors<K>,
        now: u64,
    ) -> Dismiss {
        if !self.open
            || !is_outside_event(self.trigger, target, tree)
            || tree.is_within(target, self.content)
        {
            return Dismiss::Ignored;
        }
        if registry.has_open_overlay_within(self.content, tree) {
            return Dismiss::Blocked;
        }
        if self.close(registry, now) { Dismiss::Closed } else { Dismiss::Ignored }
    }

    /// Hands out the due deferred focus move, if any. One-shot.
    pub fn poll_focus(&mut self, now: u64) -> Option<FocusTarget<K>> {
        self.focus.poll(now)
    }

    /// Whether the panel is currently open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// The panel node.
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
