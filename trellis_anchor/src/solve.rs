// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement solver: main/cross axis resolution, flip, shift, arrow.

use kurbo::{Point, Rect, Size};

use crate::types::{Align, AnchorConfig, ArrowLayout, Placement, Resolved, Side};

/// Collision-avoidance steps, applied in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Collision {
    /// Flip to the opposite side when the preferred side lacks room and the
    /// opposite side has more.
    Flip,
    /// Clamp the panel along the alignment axis so it stays inside the
    /// viewport.
    Shift,
}

/// Computes the panel position for `anchor` within `viewport`.
///
/// Collision handling runs flip-before-shift for edge-aligned placements and
/// shift-before-flip for center-aligned ones, then the final position is
/// clamped within the viewport (minus `collision_padding`). See the crate
/// docs for the coordinate conventions and [`Resolved`] for everything the
/// result carries.
#[must_use]
pub fn compute_position(
    anchor: Rect,
    floating: Size,
    viewport: Rect,
    config: &AnchorConfig,
) -> Resolved {
    let order = if config.align == Align::Center {
        [Collision::Shift, Collision::Flip]
    } else {
        [Collision::Flip, Collision::Shift]
    };

    let mut side = config.side;
    let mut flipped = false;
    let mut cross = unshifted_cross(anchor, floating, config.side, config.align, config.align_offset);
    let mut shifted = false;

    for step in order {
        match step {
            Collision::Flip => {
                let need = main_extent(floating, side);
                let avail = space_on(side, anchor, viewport, config.side_offset);
                if avail < need {
                    let opposite = side.opposite();
                    if space_on(opposite, anchor, viewport, config.side_offset) > avail {
                        side = opposite;
                        flipped = true;
                    }
                }
            }
            Collision::Shift => {
                let clamped = clamp_cross(cross, floating, viewport, side, config.collision_padding);
                if clamped != cross {
                    cross = clamped;
                    shifted = true;
                }
            }
        }
    }

    let main = clamp_main(
        main_coordinate(anchor, floating, side, config.side_offset),
        floating,
        viewport,
        side,
        config.collision_padding,
    );

    let position = if side.is_vertical() {
        Point::new(cross, main)
    } else {
        Point::new(main, cross)
    };

    let pad = config.collision_padding;
    let remaining = (space_on(side, anchor, viewport, config.side_offset) - pad).max(0.0);
    let available = if side.is_vertical() {
        Size::new((viewport.width() - 2.0 * pad).max(0.0), remaining)
    } else {
        Size::new(remaining, (viewport.height() - 2.0 * pad).max(0.0))
    };

    let cross_extent = if side.is_vertical() {
        floating.width
    } else {
        floating.height
    };
    let (arrow, origin_cross) = match config.arrow {
        Some(arrow_size) => {
            let layout = arrow_layout(anchor, floating, position, side, arrow_size);
            let arrow_cross = if side.is_vertical() {
                arrow_size.width
            } else {
                arrow_size.height
            };
            let origin = layout.cross_offset + arrow_cross / 2.0;
            (Some(layout), origin)
        }
        None => (None, cross_extent / 2.0),
    };

    // The origin sits on the anchor-facing edge so scale/fade animations
    // appear to emanate from the arrow tip.
    let transform_origin = match side {
        Side::Bottom => Point::new(origin_cross, 0.0),
        Side::Top => Point::new(origin_cross, floating.height),
        Side::Right => Point::new(0.0, origin_cross),
        Side::Left => Point::new(floating.width, origin_cross),
    };

    Resolved {
        position,
        placement: Placement {
            side,
            align: config.align,
        },
        flipped,
        shifted,
        available,
        anchor_size: anchor.size(),
        transform_origin,
        arrow,
    }
}

/// Free space between the anchor and the viewport edge on `side`, net of the
/// side offset.
fn space_on(side: Side, anchor: Rect, viewport: Rect, side_offset: f64) -> f64 {
    match side {
        Side::Bottom => viewport.y1 - anchor.y1 - side_offset,
        Side::Top => anchor.y0 - viewport.y0 - side_offset,
        Side::Right => viewport.x1 - anchor.x1 - side_offset,
        Side::Left => anchor.x0 - viewport.x0 - side_offset,
    }
}

/// The panel extent consumed along the main axis of `side`.
fn main_extent(floating: Size, side: Side) -> f64 {
    if side.is_vertical() {
        floating.height
    } else {
        floating.width
    }
}

/// Main-axis coordinate of the panel's top-left corner for `side`.
fn main_coordinate(anchor: Rect, floating: Size, side: Side, side_offset: f64) -> f64 {
    match side {
        Side::Bottom => anchor.y1 + side_offset,
        Side::Top => anchor.y0 - side_offset - floating.height,
        Side::Right => anchor.x1 + side_offset,
        Side::Left => anchor.x0 - side_offset - floating.width,
    }
}

/// Cross-axis coordinate before any shifting, from the requested alignment.
fn unshifted_cross(anchor: Rect, floating: Size, side: Side, align: Align, align_offset: f64) -> f64 {
    let (anchor_start, anchor_end, anchor_center, extent) = if side.is_vertical() {
        (anchor.x0, anchor.x1, anchor.center().x, floating.width)
    } else {
        (anchor.y0, anchor.y1, anchor.center().y, floating.height)
    };
    match align {
        Align::Start => anchor_start + align_offset,
        Align::Center => anchor_center - extent / 2.0 + align_offset,
        Align::End => anchor_end - extent - align_offset,
    }
}

/// Clamps a cross-axis coordinate so the panel stays inside the viewport.
fn clamp_cross(cross: f64, floating: Size, viewport: Rect, side: Side, pad: f64) -> f64 {
    let (min, max) = if side.is_vertical() {
        (viewport.x0 + pad, viewport.x1 - floating.width - pad)
    } else {
        (viewport.y0 + pad, viewport.y1 - floating.height - pad)
    };
    // A panel larger than the viewport pins to the leading edge.
    if max < min { min } else { cross.clamp(min, max) }
}

/// Final main-axis clamp within the viewport.
fn clamp_main(main: f64, floating: Size, viewport: Rect, side: Side, pad: f64) -> f64 {
    let (min, max) = if side.is_vertical() {
        (viewport.y0 + pad, viewport.y1 - floating.height - pad)
    } else {
        (viewport.x0 + pad, viewport.x1 - floating.width - pad)
    };
    if max < min { min } else { main.clamp(min, max) }
}

/// Positions the arrow along the panel's cross axis, centered on the anchor
/// when possible.
fn arrow_layout(
    anchor: Rect,
    floating: Size,
    position: Point,
    side: Side,
    arrow_size: Size,
) -> ArrowLayout {
    let (panel_extent, arrow_extent, anchor_center) = if side.is_vertical() {
        (floating.width, arrow_size.width, anchor.center().x - position.x)
    } else {
        (floating.height, arrow_size.height, anchor.center().y - position.y)
    };

    // When the anchor's center lies outside the panel's span, centering is
    // impossible; hide the arrow instead of mis-centering it.
    let hidden = anchor_center < 0.0 || anchor_center > panel_extent;

    let upper = (panel_extent - arrow_extent).max(0.0);
    let cross_offset = (anchor_center - arrow_extent / 2.0).clamp(0.0, upper);

    let rotation_degrees = match side {
        Side::Top => 0.0,
        Side::Right => 90.0,
        Side::Bottom => 180.0,
        Side::Left => 270.0,
    };

    ArrowLayout {
        cross_offset,
        hidden,
        rotation_degrees,
    }
}
