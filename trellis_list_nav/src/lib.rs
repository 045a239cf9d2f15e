// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis List Nav: index traversal building blocks for arrow-key navigation.
//!
//! Menus, radio groups, listboxes, and command palettes all share the same
//! movement rules: step to the next or previous item, optionally skipping
//! disabled entries, optionally wrapping at the edges. These are deterministic
//! pure functions over an index range so they can be tested without any
//! widget tree.
//!
//! Two families are provided:
//!
//! - [`next_index`] / [`previous_index`]: unfiltered single steps. The result
//!   is wrapped to the opposite edge or clamped at the boundary, per
//!   [`Wrap`].
//! - [`next_enabled_index`] / [`previous_enabled_index`]: predicate-filtered
//!   scans. These search strictly in one direction for the first index whose
//!   item satisfies the predicate. **A scan with no match returns the current
//!   index unchanged** — a deliberate "no movement" outcome, distinct from
//!   clamping, so a highlight parked on the last enabled item stays put
//!   instead of jumping to a disabled edge. Wrapping never applies to the
//!   no-match case.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_list_nav::{Wrap, next_enabled_index, next_index};
//!
//! #[derive(Debug)]
//! struct Entry { disabled: bool }
//! let items = [
//!     Entry { disabled: false },
//!     Entry { disabled: false },
//!     Entry { disabled: true },
//!     Entry { disabled: false },
//! ];
//!
//! // Unfiltered stepping wraps around.
//! assert_eq!(next_index(items.len(), 3, Wrap::Around), 0);
//!
//! // Filtered stepping skips the disabled entry…
//! assert_eq!(next_enabled_index(&items, 1, Wrap::Clamp, |e| !e.disabled), 3);
//! // …and parks when nothing further is enabled.
//! assert_eq!(next_enabled_index(&items, 3, Wrap::Clamp, |e| !e.disabled), 3);
//! ```
//!
//! This crate is `no_std` and allocation-free.

#![no_std]

/// Edge behavior for unfiltered index stepping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Wrap {
    /// Stepping past an edge wraps to the opposite edge.
    Around,
    /// Stepping past an edge clamps to that edge.
    Clamp,
}

/// Steps forward by one from `current` over `0..len`.
///
/// Out-of-range results wrap to 0 or clamp to `len - 1` per `wrap`. An empty
/// range returns 0.
#[must_use]
pub fn next_index(len: usize, current: usize, wrap: Wrap) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current + 1;
    if next >= len {
        match wrap {
            Wrap::Around => 0,
            Wrap::Clamp => len - 1,
        }
    } else {
        next
    }
}

/// Steps backward by one from `current` over `0..len`.
///
/// Out-of-range results wrap to `len - 1` or clamp to 0 per `wrap`. An empty
/// range returns 0.
#[must_use]
pub fn previous_index(len: usize, current: usize, wrap: Wrap) -> usize {
    if len == 0 {
        return 0;
    }
    match current.checked_sub(1) {
        Some(prev) => prev.min(len - 1),
        None => match wrap {
            Wrap::Around => len - 1,
            Wrap::Clamp => 0,
        },
    }
}

/// Scans strictly forward from `current` for the first item satisfying
/// `is_enabled`.
///
/// Returns `current` unchanged when no later item matches. The scan covers
/// `current + 1 .. len` only and never leaves that range, so `wrap` cannot
/// influence the result; the parameter is kept so filtered and unfiltered
/// stepping share a call shape.
#[must_use]
pub fn next_enabled_index<T>(
    items: &[T],
    current: usize,
    _wrap: Wrap,
    is_enabled: impl Fn(&T) -> bool,
) -> usize {
    let start = current.saturating_add(1);
    if start >= items.len() {
        return current;
    }
    match items[start..].iter().position(&is_enabled) {
        Some(offset) => start + offset,
        None => current,
    }
}

/// Scans strictly backward from `current` for the first item satisfying
/// `is_enabled`.
///
/// Returns `current` unchanged when no earlier item matches; as with
/// [`next_enabled_index`], the bounded scan makes `wrap` inert.
#[must_use]
pub fn previous_enabled_index<T>(
    items: &[T],
    current: usize,
    _wrap: Wrap,
    is_enabled: impl Fn(&T) -> bool,
) -> usize {
    let end = current.min(items.len());
    match items[..end].iter().rposition(&is_enabled) {
        Some(index) => index,
        None => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        enabled: bool,
    }

    #[test]
    fn unfiltered_step_wraps_and_clamps() {
        assert_eq!(next_index(4, 1, Wrap::Clamp), 2);
        assert_eq!(next_index(4, 3, Wrap::Clamp), 3);
        assert_eq!(next_index(4, 3, Wrap::Around), 0);

        assert_eq!(previous_index(4, 2, Wrap::Clamp), 1);
        assert_eq!(previous_index(4, 0, Wrap::Clamp), 0);
        assert_eq!(previous_index(4, 0, Wrap::Around), 3);
    }

    #[test]
    fn unfiltered_step_on_empty_range() {
        assert_eq!(next_index(0, 0, Wrap::Around), 0);
        assert_eq!(previous_index(0, 5, Wrap::Clamp), 0);
    }

    #[test]
    fn forward_scan_skips_disabled_items() {
        // [e0, e1, d2, e3] from the behavior contract.
        let list = [
            Item { enabled: true },
            Item { enabled: true },
            Item { enabled: false },
            Item { enabled: true },
        ];
        let enabled = |i: &Item| i.enabled;

        assert_eq!(next_enabled_index(&list, 0, Wrap::Clamp, enabled), 1);
        assert_eq!(next_enabled_index(&list, 1, Wrap::Clamp, enabled), 3);
        // From the last enabled item there is no further match: no movement.
        assert_eq!(next_enabled_index(&list, 3, Wrap::Clamp, enabled), 3);
        // No-match stays put even with wrapping requested.
        assert_eq!(next_enabled_index(&list, 3, Wrap::Around, enabled), 3);
    }

    #[test]
    fn backward_scan_skips_disabled_items() {
        let list = [
            Item { enabled: true },
            Item { enabled: false },
            Item { enabled: true },
        ];
        let enabled = |i: &Item| i.enabled;

        assert_eq!(previous_enabled_index(&list, 2, Wrap::Clamp, enabled), 0);
        assert_eq!(previous_enabled_index(&list, 0, Wrap::Clamp, enabled), 0);
        assert_eq!(previous_enabled_index(&list, 0, Wrap::Around, enabled), 0);
    }

    #[test]
    fn scans_tolerate_out_of_range_current() {
        let list = [Item { enabled: true }, Item { enabled: true }];
        let enabled = |i: &Item| i.enabled;

        // A stale index beyond the list parks rather than panicking.
        assert_eq!(next_enabled_index(&list, 9, Wrap::Clamp, enabled), 9);
        assert_eq!(previous_enabled_index(&list, 9, Wrap::Clamp, enabled), 1);
    }

    #[test]
    fn all_disabled_never_moves() {
        let list = [Item { enabled: false }, Item { enabled: false }];
        let enabled = |i: &Item| i.enabled;

        assert_eq!(next_enabled_index(&list, 0, Wrap::Around, enabled), 0);
        assert_eq!(previous_enabled_index(&list, 1, Wrap::Around, enabled), 1);
    }
}
