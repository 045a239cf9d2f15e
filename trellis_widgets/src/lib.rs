// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Widgets: thin per-widget controllers over the behavior services.
//!
//! Each controller wires one widget's input events — open/close, Escape,
//! pointer presses, arrows, text input — to the services the widget needs:
//! the shared [`ScrollLock`](trellis_scroll_lock::ScrollLock), the
//! [`OverlayRegistry`](trellis_overlay::OverlayRegistry), deferred focus,
//! anchored positioning, and the filter engine. Controllers hold no tree and
//! perform no I/O: every method takes the services it touches plus a
//! millisecond timestamp, and returns effect values for the host to apply.
//!
//! Four shapes cover the widget family:
//!
//! - [`DialogController`] — modal dialogs and sheets: scroll lock, focus
//!   trap, dismissal guarded by nested overlays.
//! - [`PopoverController`] — anchored non-modal panels: popovers, dropdown
//!   menus, tooltips, hover cards.
//! - [`SelectController`] — a popover plus a wrap-around roving highlight.
//! - [`ComboboxController`] — a popover plus an embedded
//!   [`FilterEngine`](trellis_filter::FilterEngine).
//!
//! ## Nesting example
//!
//! A popover inside a dialog keeps the dialog from dismissing while it is
//! open, even though its panel is portaled elsewhere:
//!
//! ```rust
//! use trellis_overlay::{Ancestors, OverlayRegistry};
//! use trellis_scroll_lock::ScrollLock;
//! use trellis_widgets::{DialogController, DismissOutcome};
//!
//! // Child → parent edges: trigger(1) and dialog panel(2) under root(0),
//! // a nested trigger(3) inside the panel.
//! struct Tree;
//! impl Ancestors<u32> for Tree {
//!     fn parent_of(&self, node: u32) -> Option<u32> {
//!         match node {
//!             1 | 2 => Some(0),
//!             3 => Some(2),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut lock: ScrollLock<u32, f64> = ScrollLock::new();
//! let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
//!
//! let mut dialog = DialogController::new(2_u32, 1);
//! dialog.mount(&mut registry);
//! dialog.open(&mut lock, &mut registry, || 16.0, 0);
//!
//! // A nested popover, hosted at the trigger inside the panel, opens.
//! registry.register(9, trellis_overlay::OverlayKind::Popover, 3);
//! registry.set_open(9, true);
//!
//! // Escape belongs to the popover, not the dialog.
//! let outcome = dialog.on_escape(&mut lock, &mut registry, &Tree, 100);
//! assert_eq!(outcome, DismissOutcome::Blocked);
//! assert!(dialog.is_open());
//! ```

mod combobox;
mod dialog;
mod popover;
mod select;

pub use combobox::{CloseOutcome, ComboboxController, ComboboxDismiss};
pub use dialog::{DialogController, DismissOutcome};
pub use popover::{Dismiss, PopoverController};
pub use select::{SelectController, SelectOption};
