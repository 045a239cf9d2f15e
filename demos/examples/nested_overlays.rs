// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested overlays: a dialog with a popover inside it.
//!
//! This walkthrough drives the scroll lock, overlay registry, and dismissal
//! logic through the scenario they exist for: a popover whose panel is
//! portaled to the end of the document, logically hosted at a trigger inside
//! an open dialog. Outside presses and Escape must dismiss the popover first
//! and only then the dialog, and the page scroll stays locked exactly while
//! the dialog is open.
//!
//! Run:
//! - `cargo run -p trellis_demos --example nested_overlays`
//!
//! Set `RUST_LOG=debug` to watch the controllers narrate.

use std::collections::HashMap;

use kurbo::{Rect, Size};
use trellis_anchor::AnchorConfig;
use trellis_overlay::{Ancestors, OverlayRegistry};
use trellis_scroll_lock::{LockChange, ScrollLock, Unlock};
use trellis_widgets::{DialogController, Dismiss, DismissOutcome, PopoverController};

/// Child → parent edges over plain numeric node ids.
struct Tree {
    parents: HashMap<u32, u32>,
}

impl Ancestors<u32> for Tree {
    fn parent_of(&self, node: u32) -> Option<u32> {
        self.parents.get(&node).copied()
    }
}

const ROOT: u32 = 0;
const DIALOG_TRIGGER: u32 = 1;
const DIALOG_PANEL: u32 = 2;
const POPOVER_TRIGGER: u32 = 3;
const PORTAL_HOST: u32 = 8;
const POPOVER_PANEL: u32 = 9;
const ELSEWHERE: u32 = 20;

fn main() {
    env_logger::init();

    // The document: the popover panel renders under a portal host at the
    // end of the body, away from its trigger inside the dialog.
    let tree = Tree {
        parents: HashMap::from([
            (DIALOG_TRIGGER, ROOT),
            (DIALOG_PANEL, ROOT),
            (POPOVER_TRIGGER, DIALOG_PANEL),
            (PORTAL_HOST, ROOT),
            (POPOVER_PANEL, PORTAL_HOST),
            (ELSEWHERE, ROOT),
        ]),
    };

    let mut lock: ScrollLock<u32, f64> = ScrollLock::new();
    let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();

    let mut dialog = DialogController::new(DIALOG_PANEL, DIALOG_TRIGGER);
    let mut popover =
        PopoverController::new(POPOVER_PANEL, POPOVER_TRIGGER, AnchorConfig::default());
    dialog.mount(&mut registry);
    popover.mount(&mut registry);

    // The user opens the dialog. First holder: the host captures the body's
    // scrollbar compensation margin and applies lock styling.
    let change = dialog.open(&mut lock, &mut registry, || 16.0, 1_000);
    println!("dialog opened: {change:?}");
    assert_eq!(change, Some(LockChange::Engaged(&16.0)));

    // After the open transition, focus moves into the panel.
    println!("deferred focus: {:?}", dialog.poll_focus(1_025));

    // The user opens the popover from the trigger inside the dialog.
    popover.open(&mut registry, 2_000);
    let resolved = popover.update_position(
        Rect::new(300.0, 200.0, 380.0, 232.0),
        Size::new(240.0, 120.0),
        Rect::new(0.0, 0.0, 1024.0, 768.0),
    );
    println!("popover positioned at {:?}", resolved.map(|r| r.position));

    // A press elsewhere on the page. The dialog refuses to close: the open
    // popover inside it owns the gesture, portal or not.
    let outcome = dialog.on_pointer_down(ELSEWHERE, &mut lock, &mut registry, &tree, 3_000);
    println!("outside press with popover open → dialog says {outcome:?}");
    assert_eq!(outcome, DismissOutcome::Blocked);

    // The same press closes the popover.
    let dismiss = popover.on_pointer_down(ELSEWHERE, &mut registry, &tree, 3_000);
    println!("outside press → popover says {dismiss:?}");
    assert_eq!(dismiss, Dismiss::Closed);

    // A second press now dismisses the dialog and releases the lock; the
    // host restores the captured margin.
    let outcome = dialog.on_pointer_down(ELSEWHERE, &mut lock, &mut registry, &tree, 4_000);
    println!("outside press with popover closed → dialog says {outcome:?}");
    assert_eq!(outcome, DismissOutcome::Dismissed(Unlock::Released(16.0)));
    assert!(!lock.is_locked());

    // Focus returns to the trigger that opened the dialog.
    println!("deferred focus: {:?}", dialog.poll_focus(4_025));
}
