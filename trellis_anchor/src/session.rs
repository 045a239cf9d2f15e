// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-panel session owning the solver config and teardown state.

use kurbo::{Rect, Size};

use crate::solve::compute_position;
use crate::types::{AnchorConfig, Resolved};

/// One positioning session per open floating panel.
///
/// The host owns the actual scroll/resize/mutation subscription and calls
/// [`AnchorSession::update`] whenever anything may have moved. The session
/// tracks teardown so a panel that closed (or a controller that disconnected)
/// stops producing positions: [`AnchorSession::dispose`] is idempotent, and
/// updates after disposal — or with non-finite geometry from elements removed
/// mid-computation — are skipped silently rather than treated as errors.
///
/// Disposing exactly once when the panel closes is the host's contract; a
/// session kept alive past that keeps its subscription repositioning a
/// hidden element, which is the leak this type exists to make visible.
#[derive(Clone, Debug)]
pub struct AnchorSession {
    config: AnchorConfig,
    disposed: bool,
    last: Option<Resolved>,
}

impl AnchorSession {
    /// Creates a live session for a newly opened panel.
    #[must_use]
    pub const fn new(config: AnchorConfig) -> Self {
        Self {
            config,
            disposed: false,
            last: None,
        }
    }

    /// The solver configuration this session was opened with.
    #[must_use]
    pub const fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Recomputes the panel position for the current geometry.
    ///
    /// Returns `None` — skipping the frame — when the session was disposed
    /// or any input is non-finite (elements can vanish between the event
    /// that scheduled this update and the update itself).
    pub fn update(&mut self, anchor: Rect, floating: Size, viewport: Rect) -> Option<Resolved> {
        if self.disposed || !anchor.is_finite() || !floating.is_finite() || !viewport.is_finite() {
            return None;
        }
        let resolved = compute_position(anchor, floating, viewport, &self.config);
        self.last = Some(resolved);
        Some(resolved)
    }

    /// The most recent successful result, if any.
    #[must_use]
    pub const fn last(&self) -> Option<&Resolved> {
        self.last.as_ref()
    }

    /// Tears the session down. Returns `true` the first time, `false` for
    /// redundant calls, so hosts can release their subscription exactly once.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        true
    }

    /// Returns `true` once the session has been torn down.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn update_positions_and_caches_the_result() {
        let mut session = AnchorSession::new(AnchorConfig::default());
        let resolved = session
            .update(
                Rect::new(100.0, 100.0, 200.0, 140.0),
                Size::new(100.0, 50.0),
                VIEWPORT,
            )
            .expect("live session should resolve");
        assert_eq!(resolved.position, Point::new(100.0, 140.0));
        assert_eq!(session.last(), Some(&resolved));
    }

    #[test]
    fn dispose_is_idempotent_and_stops_updates() {
        let mut session = AnchorSession::new(AnchorConfig::default());
        assert!(session.dispose());
        assert!(!session.dispose());
        assert!(session.is_disposed());

        let skipped = session.update(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(10.0, 10.0),
            VIEWPORT,
        );
        assert_eq!(skipped, None);
    }

    #[test]
    fn non_finite_geometry_skips_the_frame() {
        let mut session = AnchorSession::new(AnchorConfig::default());
        let skipped = session.update(
            Rect::new(f64::NAN, 0.0, 10.0, 10.0),
            Size::new(10.0, 10.0),
            VIEWPORT,
        );
        assert_eq!(skipped, None);
        assert_eq!(session.last(), None);

        // The session stays usable for later, valid frames.
        let resolved = session.update(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(10.0, 10.0),
            VIEWPORT,
        );
        assert!(resolved.is_some());
    }
}
