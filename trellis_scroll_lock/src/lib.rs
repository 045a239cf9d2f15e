// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scroll Lock: reference-counted locking of a shared scroll surface.
//!
//! Overlay-style widgets (dialogs, sheets, full-screen pickers) want to freeze
//! the page behind them while they are open. Several such widgets can be open
//! at once, so the lock must be reference counted: the surface is locked iff
//! at least one holder is registered, and only the transition edges matter to
//! the host.
//!
//! [`ScrollLock`] is an explicit, injectable service rather than ambient
//! global state. It is generic over:
//!
//! - `K`: the content id a widget locks under (any `Eq` handle — a node id,
//!   an interned string, a number).
//! - `C`: whatever pre-lock style the host needs to capture on engagement and
//!   restore on release (for a browser host, typically the scrollbar
//!   compensation margin of the body element).
//!
//! The service never touches the surface itself; it tells the host when to
//! act via [`LockChange`] and [`Unlock`].
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_scroll_lock::{LockChange, ScrollLock, Unlock};
//!
//! // Captured style: the body's original right margin, in pixels.
//! let mut lock: ScrollLock<&str, f64> = ScrollLock::new();
//!
//! // First holder engages the lock; the capture closure runs exactly once.
//! assert_eq!(lock.lock("dialog-1", || 16.0), LockChange::Engaged(&16.0));
//! // A second holder piggybacks on the existing lock.
//! assert!(matches!(lock.lock("sheet-2", || unreachable!()), LockChange::Retained));
//!
//! // Releasing one holder keeps the lock engaged.
//! assert!(matches!(lock.unlock(&"dialog-1"), Unlock::Retained));
//! // Releasing the last holder hands the captured style back for restoration.
//! assert_eq!(lock.unlock(&"sheet-2"), Unlock::Released(16.0));
//! ```
//!
//! Duplicate locks under the same id are idempotent, and unlocking an id that
//! was never locked is an inert no-op. Release order is irrelevant; only the
//! holder set becoming empty matters.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// Result of a [`ScrollLock::lock`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum LockChange<'a, C> {
    /// The holder set transitioned empty → non-empty. The host should apply
    /// lock styling now; the freshly captured pre-lock style is borrowed so
    /// the host can derive the compensated styling from it.
    Engaged(&'a C),
    /// The lock was already engaged (or the id was already a holder). Nothing
    /// for the host to do.
    Retained,
}

/// Result of a [`ScrollLock::unlock`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Unlock<C> {
    /// The holder set became empty. The host should restore the returned
    /// pre-lock style and drop any lock styling.
    Released(C),
    /// Other holders remain; the lock stays engaged.
    Retained,
    /// The id was not a holder. Unlocking something that was never locked is
    /// a tolerated no-op, not an error.
    Inert,
}

/// Reference-counted lock over a single shared scroll surface.
///
/// The holder set preserves insertion order, though order never affects
/// behavior — only emptiness does. The captured style `C` is produced once on
/// the empty → non-empty edge and returned once on the non-empty → empty edge.
#[derive(Clone, Debug)]
pub struct ScrollLock<K, C> {
    holders: Vec<K>,
    captured: Option<C>,
}

impl<K: Eq, C> ScrollLock<K, C> {
    /// Creates an unlocked service with no holders.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            holders: Vec::new(),
            captured: None,
        }
    }

    /// Registers `id` as a lock holder.
    ///
    /// On the empty → non-empty transition, `capture` is invoked to snapshot
    /// the pre-lock style and [`LockChange::Engaged`] tells the host to apply
    /// lock styling. Re-locking an id that is already a holder must not
    /// double-push it (the release bookkeeping compares against emptiness),
    /// so duplicates are idempotent and report [`LockChange::Retained`].
    pub fn lock(&mut self, id: K, capture: impl FnOnce() -> C) -> LockChange<'_, C> {
        if self.holders.contains(&id) {
            return LockChange::Retained;
        }
        let engaging = self.holders.is_empty();
        self.holders.push(id);
        if engaging {
            let captured = self.captured.insert(capture());
            LockChange::Engaged(captured)
        } else {
            LockChange::Retained
        }
    }

    /// Removes `id` from the holder set.
    ///
    /// When the set becomes empty the captured pre-lock style is handed back
    /// via [`Unlock::Released`] and the service returns to its initial state.
    /// Unlocking an id that was never locked yields [`Unlock::Inert`].
    pub fn unlock(&mut self, id: &K) -> Unlock<C> {
        let Some(pos) = self.holders.iter().position(|h| h == id) else {
            return Unlock::Inert;
        };
        self.holders.remove(pos);
        if self.holders.is_empty() {
            match self.captured.take() {
                Some(captured) => Unlock::Released(captured),
                // Unreachable when the invariant holds, but a missing capture
                // is tolerated rather than panicking.
                None => Unlock::Retained,
            }
        } else {
            Unlock::Retained
        }
    }

    /// Returns `true` while at least one holder is registered.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.holders.is_empty()
    }

    /// Number of currently registered holders.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    /// Returns `true` if `id` currently holds the lock.
    #[must_use]
    pub fn holds(&self, id: &K) -> bool {
        self.holders.contains(id)
    }

    /// Borrows the captured pre-lock style while the lock is engaged.
    #[must_use]
    pub fn captured(&self) -> Option<&C> {
        self.captured.as_ref()
    }
}

impl<K: Eq, C> Default for ScrollLock<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lock_engages_and_captures() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        assert!(!lock.is_locked());

        let change = lock.lock(1, || 7);
        assert_eq!(change, LockChange::Engaged(&7));
        assert!(lock.is_locked());
        assert_eq!(lock.captured(), Some(&7));
    }

    #[test]
    fn second_holder_keeps_lock_engaged_until_both_release() {
        let mut lock: ScrollLock<&str, i32> = ScrollLock::new();
        lock.lock("a", || 1);
        assert_eq!(lock.lock("b", || panic!("capture must run once")), LockChange::Retained);

        // Releasing A leaves the lock engaged.
        assert_eq!(lock.unlock(&"a"), Unlock::Retained);
        assert!(lock.is_locked());

        // Only after B releases does the captured style come back.
        assert_eq!(lock.unlock(&"b"), Unlock::Released(1));
        assert!(!lock.is_locked());
    }

    #[test]
    fn duplicate_lock_is_idempotent() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        lock.lock(1, || 9);
        assert_eq!(lock.lock(1, || panic!("duplicate must not recapture")), LockChange::Retained);
        assert_eq!(lock.holder_count(), 1);

        // A single unlock fully releases despite the duplicate lock call.
        assert_eq!(lock.unlock(&1), Unlock::Released(9));
        assert!(!lock.is_locked());
    }

    #[test]
    fn double_release_is_inert() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        lock.lock(1, || 0);
        assert_eq!(lock.unlock(&1), Unlock::Released(0));
        assert_eq!(lock.unlock(&1), Unlock::Inert);
    }

    #[test]
    fn unlocking_unknown_id_is_inert() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        assert_eq!(lock.unlock(&42), Unlock::Inert);

        lock.lock(1, || 3);
        assert_eq!(lock.unlock(&42), Unlock::Inert);
        assert!(lock.is_locked());
    }

    #[test]
    fn release_order_is_irrelevant() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        lock.lock(1, || 5);
        lock.lock(2, || unreachable!());
        lock.lock(3, || unreachable!());

        assert_eq!(lock.unlock(&2), Unlock::Retained);
        assert_eq!(lock.unlock(&3), Unlock::Retained);
        assert_eq!(lock.unlock(&1), Unlock::Released(5));
    }

    #[test]
    fn recapture_happens_on_reengagement() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        lock.lock(1, || 1);
        assert_eq!(lock.unlock(&1), Unlock::Released(1));

        // A fresh engagement captures again; the old snapshot is gone.
        assert_eq!(lock.lock(2, || 2), LockChange::Engaged(&2));
        assert_eq!(lock.unlock(&2), Unlock::Released(2));
    }

    #[test]
    fn holds_reports_membership() {
        let mut lock: ScrollLock<u32, i32> = ScrollLock::new();
        lock.lock(1, || 0);
        assert!(lock.holds(&1));
        assert!(!lock.holds(&2));
    }
}
