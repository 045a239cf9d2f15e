// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Anchor: placement of floating panels relative to an anchor.
//!
//! Menus, popovers, tooltips, and pickers are *floating panels*: positioned
//! overlays anchored to a trigger element. This crate computes where such a
//! panel goes, as pure geometry over [`kurbo`] rectangles:
//!
//! - A requested [`Placement`] — a [`Side`] plus an [`Align`]ment — is
//!   resolved against the viewport with collision avoidance: flipping to the
//!   opposite side and shifting along the alignment axis, with the priority
//!   between the two determined by the alignment (edge-aligned placements
//!   flip before shifting; center-aligned placements shift before flipping).
//! - The result ([`Resolved`]) carries the panel's top-left corner in
//!   viewport coordinates (the host writes it as inline `left`/`top` on a
//!   `position: fixed` element), the effective placement after collisions,
//!   the space still available at that placement and the anchor's own size
//!   (exposed by hosts as custom style properties so a menu can match its
//!   trigger's width), a transform origin for scale/fade animations, and an
//!   optional [`ArrowLayout`] for a pointer element.
//! - [`AnchorSession`] wraps the solver for one open panel. The host calls
//!   [`AnchorSession::update`] from whatever scroll/resize/mutation
//!   subscription it owns; [`AnchorSession::dispose`] tears the session down
//!   exactly once, after which updates are skipped silently — tolerating
//!   frames where the elements were already removed.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use trellis_anchor::{Align, AnchorConfig, Side, compute_position};
//!
//! let anchor = Rect::new(100.0, 100.0, 180.0, 130.0);
//! let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let config = AnchorConfig {
//!     side: Side::Bottom,
//!     align: Align::Start,
//!     side_offset: 4.0,
//!     ..AnchorConfig::default()
//! };
//!
//! let resolved = compute_position(anchor, Size::new(200.0, 150.0), viewport, &config);
//! assert_eq!(resolved.position.x, 100.0); // start-aligned with the anchor
//! assert_eq!(resolved.position.y, 134.0); // below it, offset by 4
//! assert_eq!(resolved.placement.label(), "bottom-start");
//! ```
//!
//! Coordinates are y-down viewport coordinates throughout. Inputs are
//! expected to be finite; [`AnchorSession::update`] checks and skips the
//! frame when they are not.
//!
//! This crate is `no_std` (via the `libm` feature) and allocation-free.

#![cfg_attr(not(feature = "std"), no_std)]

mod session;
mod solve;
mod types;

pub use session::AnchorSession;
pub use solve::compute_position;
pub use types::{Align, AnchorConfig, ArrowLayout, Placement, Resolved, Side};
