// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Focus: focus trapping and deferred focus movement for overlays.
//!
//! Three concerns live here, all host-driven and free of any widget tree:
//!
//! - **Tab-stop classification** ([`TabStop`] / [`ControlKind`]): a small
//!   descriptor the host builds per candidate element, with
//!   [`TabStop::is_tab_stop`] encoding which elements participate in a focus
//!   trap. The host is expected to rebuild descriptors **at call time** — the
//!   tree may have changed since the container opened, so nothing here is
//!   cached.
//! - **Trap cycling** ([`trap_tab`]): given the focusable descendants of a
//!   container in tree order and the currently focused one, decide whether a
//!   Tab/Shift+Tab press must cycle to the opposite end. Interior presses and
//!   containers with no focusables are inert (`None`), never an error.
//! - **Deferred focus** ([`DeferredFocus`]): opening or closing an overlay
//!   moves focus only after a short delay, so the target is focused once
//!   enter/exit transitions have settled rather than mid-animation. Delays
//!   are modeled as injected monotonic timestamps in milliseconds plus a
//!   pollable deadline — no timers are owned here.
//!
//! ## Trap example
//!
//! ```rust
//! use trellis_focus::{TabDirection, trap_tab};
//!
//! let stops = [10_u32, 11, 12];
//!
//! // Tab on the last focusable cycles to the first…
//! assert_eq!(trap_tab(&stops, 12, TabDirection::Forward), Some(10));
//! // …Shift+Tab on the first cycles to the last…
//! assert_eq!(trap_tab(&stops, 10, TabDirection::Backward), Some(12));
//! // …and interior presses fall through to the host's normal handling.
//! assert_eq!(trap_tab(&stops, 11, TabDirection::Forward), None);
//! ```
//!
//! ## Deferred focus example
//!
//! ```rust
//! use trellis_focus::{DeferredFocus, FocusTarget};
//!
//! let mut focus: DeferredFocus<u32> = DeferredFocus::new();
//! focus.schedule(FocusTarget::Content(7), 1_000);
//!
//! // Not due yet.
//! assert_eq!(focus.poll(1_010), None);
//! // Due once the delay has elapsed.
//! assert_eq!(focus.poll(1_030), Some(FocusTarget::Content(7)));
//! // One-shot: a second poll is empty.
//! assert_eq!(focus.poll(1_040), None);
//! ```
//!
//! This crate is `no_std` and allocation-free.

#![no_std]

/// Default delay before a deferred focus move fires, in milliseconds.
///
/// Tuned to land after typical open/close transitions have made the target
/// visible and focusable; hosts with longer animations should configure a
/// matching delay via [`DeferredFocus::with_delay`].
pub const DEFAULT_FOCUS_DELAY_MS: u64 = 25;

/// Broad element category used by [`TabStop::is_tab_stop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// A button element.
    Button,
    /// A link; only links that actually carry a destination are focusable.
    Anchor {
        /// Whether the link has an `href`-equivalent destination.
        has_destination: bool,
    },
    /// A text-entry control.
    Input,
    /// A single/multi select control.
    Select,
    /// A multi-line text control.
    TextArea,
    /// Anything else; focusable only via an explicit tab index.
    Other,
}

/// Host-built descriptor for one focus-trap candidate.
///
/// Mirrors the candidate query a browser host would run over a container:
/// buttons, links with a destination, non-hidden inputs, selects and text
/// areas without a `-1` tab index, and any other element whose explicit tab
/// index is not `-1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TabStop {
    /// What kind of control this is.
    pub kind: ControlKind,
    /// Whether the control is hidden (for inputs: `type="hidden"`).
    pub hidden: bool,
    /// Explicit tab index, when one is set.
    pub tab_index: Option<i32>,
}

impl TabStop {
    /// Convenience constructor for a visible control without a tab index.
    #[must_use]
    pub const fn of(kind: ControlKind) -> Self {
        Self {
            kind,
            hidden: false,
            tab_index: None,
        }
    }

    /// Returns `true` if this candidate participates in tab cycling.
    #[must_use]
    pub fn is_tab_stop(&self) -> bool {
        match self.kind {
            ControlKind::Button | ControlKind::TextArea => true,
            ControlKind::Anchor { has_destination } => has_destination,
            ControlKind::Input => !self.hidden,
            ControlKind::Select => self.tab_index != Some(-1),
            ControlKind::Other => matches!(self.tab_index, Some(i) if i != -1),
        }
    }
}

/// Direction of a Tab keypress inside a trap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TabDirection {
    /// Tab.
    Forward,
    /// Shift+Tab.
    Backward,
}

/// Cycles focus at the edges of a trapped container.
///
/// `stops` are the container's focusable descendants in tree order, queried
/// by the host at call time; `current` is the element focus sits on. Returns
/// the element to move focus to when the press crosses an edge — Tab on the
/// last stop yields the first, Shift+Tab on the first yields the last — and
/// `None` otherwise, including when `stops` is empty or `current` is not a
/// member (both tolerated no-ops).
#[must_use]
pub fn trap_tab<K: Copy + Eq>(stops: &[K], current: K, direction: TabDirection) -> Option<K> {
    let first = *stops.first()?;
    let last = *stops.last()?;
    match direction {
        TabDirection::Forward if current == last => Some(first),
        TabDirection::Backward if current == first => Some(last),
        _ => None,
    }
}

/// Where a deferred focus move should land.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget<K> {
    /// Focus the element itself (used when opening content, once it has had
    /// a chance to become visible).
    Content(K),
    /// Return focus to a trigger. When the trigger is a non-focusable
    /// wrapper, the host should land on its first focusable child instead;
    /// the variant carries the intent, resolution stays with the host.
    Trigger(K),
}

/// Single-slot delayed focus queue.
///
/// Scheduling replaces any pending entry — last write wins, which also
/// debounces rapid open/close sequences into a single focus move. The host
/// polls with its current timestamp; a due target is handed out exactly once.
#[derive(Copy, Clone, Debug)]
pub struct DeferredFocus<K> {
    delay_ms: u64,
    pending: Option<(FocusTarget<K>, u64)>,
}

impl<K: Copy> DeferredFocus<K> {
    /// Creates a queue with [`DEFAULT_FOCUS_DELAY_MS`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_delay(DEFAULT_FOCUS_DELAY_MS)
    }

    /// Creates a queue with a custom delay in milliseconds.
    #[must_use]
    pub const fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedules `target` to fire `delay` after `now`, replacing any pending
    /// entry.
    pub fn schedule(&mut self, target: FocusTarget<K>, now: u64) {
        self.pending = Some((target, now.saturating_add(self.delay_ms)));
    }

    /// Drops any pending entry.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns the due target, if its deadline has passed. One-shot.
    pub fn poll(&mut self, now: u64) -> Option<FocusTarget<K>> {
        match self.pending {
            Some((target, deadline)) if now >= deadline => {
                self.pending = None;
                Some(target)
            }
            _ => None,
        }
    }

    /// Returns `true` while a focus move is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<K: Copy> Default for DeferredFocus<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_stop_rules_mirror_the_candidate_query() {
        assert!(TabStop::of(ControlKind::Button).is_tab_stop());
        assert!(TabStop::of(ControlKind::TextArea).is_tab_stop());

        assert!(
            TabStop::of(ControlKind::Anchor {
                has_destination: true
            })
            .is_tab_stop()
        );
        assert!(
            !TabStop::of(ControlKind::Anchor {
                has_destination: false
            })
            .is_tab_stop()
        );

        assert!(TabStop::of(ControlKind::Input).is_tab_stop());
        assert!(
            !TabStop {
                hidden: true,
                ..TabStop::of(ControlKind::Input)
            }
            .is_tab_stop()
        );

        assert!(TabStop::of(ControlKind::Select).is_tab_stop());
        assert!(
            !TabStop {
                tab_index: Some(-1),
                ..TabStop::of(ControlKind::Select)
            }
            .is_tab_stop()
        );

        // Plain elements need an explicit, non-negative-one tab index.
        assert!(!TabStop::of(ControlKind::Other).is_tab_stop());
        assert!(
            TabStop {
                tab_index: Some(0),
                ..TabStop::of(ControlKind::Other)
            }
            .is_tab_stop()
        );
        assert!(
            !TabStop {
                tab_index: Some(-1),
                ..TabStop::of(ControlKind::Other)
            }
            .is_tab_stop()
        );
    }

    #[test]
    fn trap_cycles_only_at_the_edges() {
        let stops = [1_u32, 2, 3];

        assert_eq!(trap_tab(&stops, 3, TabDirection::Forward), Some(1));
        assert_eq!(trap_tab(&stops, 1, TabDirection::Backward), Some(3));

        assert_eq!(trap_tab(&stops, 2, TabDirection::Forward), None);
        assert_eq!(trap_tab(&stops, 2, TabDirection::Backward), None);
        assert_eq!(trap_tab(&stops, 1, TabDirection::Forward), None);
        assert_eq!(trap_tab(&stops, 3, TabDirection::Backward), None);
    }

    #[test]
    fn trap_on_empty_or_foreign_current_is_inert() {
        let empty: [u32; 0] = [];
        assert_eq!(trap_tab(&empty, 1, TabDirection::Forward), None);

        let stops = [1_u32, 2];
        assert_eq!(trap_tab(&stops, 99, TabDirection::Forward), None);
    }

    #[test]
    fn trap_with_single_stop_cycles_onto_itself() {
        let stops = [5_u32];
        assert_eq!(trap_tab(&stops, 5, TabDirection::Forward), Some(5));
        assert_eq!(trap_tab(&stops, 5, TabDirection::Backward), Some(5));
    }

    #[test]
    fn deferred_focus_fires_once_after_delay() {
        let mut focus: DeferredFocus<u32> = DeferredFocus::with_delay(100);
        focus.schedule(FocusTarget::Trigger(3), 500);

        assert_eq!(focus.poll(599), None);
        assert!(focus.is_pending());
        assert_eq!(focus.poll(600), Some(FocusTarget::Trigger(3)));
        assert!(!focus.is_pending());
        assert_eq!(focus.poll(601), None);
    }

    #[test]
    fn rescheduling_replaces_the_pending_target() {
        let mut focus: DeferredFocus<u32> = DeferredFocus::with_delay(50);
        focus.schedule(FocusTarget::Content(1), 0);
        focus.schedule(FocusTarget::Trigger(2), 10);

        // The first entry is gone; only the replacement fires, at its own
        // deadline.
        assert_eq!(focus.poll(55), None);
        assert_eq!(focus.poll(60), Some(FocusTarget::Trigger(2)));
    }

    #[test]
    fn cancel_discards_the_pending_target() {
        let mut focus: DeferredFocus<u32> = DeferredFocus::new();
        focus.schedule(FocusTarget::Content(1), 0);
        focus.cancel();
        assert_eq!(focus.poll(u64::MAX), None);
    }
}
