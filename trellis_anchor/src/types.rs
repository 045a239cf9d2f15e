// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement vocabulary and solver inputs/outputs.

use kurbo::{Point, Size};

/// Which side of the anchor the panel prefers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the anchor.
    Top,
    /// To the right of the anchor.
    Right,
    /// Below the anchor (the default for menus and popovers).
    #[default]
    Bottom,
    /// To the left of the anchor.
    Left,
}

impl Side {
    /// The opposite side, used when flipping on collision.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns `true` for top/bottom sides, where the main axis is vertical
    /// and the alignment axis horizontal.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// How the panel aligns along the anchor's cross axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Leading edges line up.
    Start,
    /// Centers line up (the default).
    #[default]
    Center,
    /// Trailing edges line up.
    End,
}

/// A side/alignment pair describing where the panel sits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Side of the anchor.
    pub side: Side,
    /// Alignment along the cross axis.
    pub align: Align,
}

impl Placement {
    /// The conventional placement label: the side name, suffixed with the
    /// alignment unless it is centered (`"bottom"`, `"bottom-start"`,
    /// `"right-end"`). Hosts typically mirror this into a data attribute for
    /// styling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match (self.side, self.align) {
            (Side::Top, Align::Center) => "top",
            (Side::Top, Align::Start) => "top-start",
            (Side::Top, Align::End) => "top-end",
            (Side::Right, Align::Center) => "right",
            (Side::Right, Align::Start) => "right-start",
            (Side::Right, Align::End) => "right-end",
            (Side::Bottom, Align::Center) => "bottom",
            (Side::Bottom, Align::Start) => "bottom-start",
            (Side::Bottom, Align::End) => "bottom-end",
            (Side::Left, Align::Center) => "left",
            (Side::Left, Align::Start) => "left-start",
            (Side::Left, Align::End) => "left-end",
        }
    }
}

impl core::fmt::Display for Placement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Solver configuration for one floating panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorConfig {
    /// Preferred side of the anchor.
    pub side: Side,
    /// Preferred alignment along the cross axis.
    pub align: Align,
    /// Gap between the anchor and the panel along the main axis.
    pub side_offset: f64,
    /// Extra displacement along the alignment axis. For [`Align::End`] the
    /// offset pushes inward from the trailing edge, mirroring start-aligned
    /// behavior.
    pub align_offset: f64,
    /// Size of the pointer/arrow element, when the panel has one. The arrow
    /// is assumed to point toward the anchor at 0° when the panel sits above
    /// it; [`ArrowLayout::rotation_degrees`] turns it for the other sides.
    pub arrow: Option<Size>,
    /// Minimum distance kept between the panel and the viewport edges when
    /// shifting and clamping.
    pub collision_padding: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            side: Side::default(),
            align: Align::default(),
            side_offset: 0.0,
            align_offset: 0.0,
            arrow: None,
            collision_padding: 0.0,
        }
    }
}

/// Layout of the pointer element, in the panel's local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrowLayout {
    /// Offset of the arrow's leading edge along the panel's cross axis
    /// (x for top/bottom placements, y for left/right), clamped so the arrow
    /// stays within the panel.
    pub cross_offset: f64,
    /// `true` when the arrow cannot be centered on the anchor at all (the
    /// anchor's center lies outside the panel's span); the host should hide
    /// it rather than show it mis-centered.
    pub hidden: bool,
    /// Clockwise rotation so the arrow's point touches the anchor: 0° for
    /// [`Side::Top`], 90° for [`Side::Right`], 180° for [`Side::Bottom`],
    /// 270° for [`Side::Left`].
    pub rotation_degrees: f64,
}

/// Output of [`compute_position`](crate::compute_position).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resolved {
    /// Top-left corner of the panel in viewport coordinates.
    pub position: Point,
    /// Effective placement after collision handling.
    pub placement: Placement,
    /// Whether collision handling flipped the panel to the opposite side.
    pub flipped: bool,
    /// Whether collision handling shifted the panel along the cross axis.
    pub shifted: bool,
    /// Width/height still available at the effective placement, for hosts
    /// that cap the panel's size to the viewport.
    pub available: Size,
    /// The anchor's size, for hosts that size the panel to its trigger.
    pub anchor_size: Size,
    /// Point the panel's scale/fade animations should emanate from, in the
    /// panel's local coordinates — at the arrow tip when there is an arrow,
    /// else the middle of the anchor-facing edge.
    pub transform_origin: Point,
    /// Pointer element layout, when an arrow was configured.
    pub arrow: Option<ArrowLayout>,
}
