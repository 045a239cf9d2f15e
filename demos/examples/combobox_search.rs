// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Combobox search: local filtering, debounced remote search, cancellation.
//!
//! This walkthrough drives a [`ComboboxController`] through the full remote
//! lifecycle: typing filters the local items at once, the debounced search
//! command appears on poll, a newer query cancels the in-flight request, the
//! stale response is dropped, and the winning response injects its items
//! after the local ones.
//!
//! Run:
//! - `cargo run -p trellis_demos --example combobox_search`
//!
//! Set `RUST_LOG=debug` to watch the engine narrate.

use trellis_anchor::AnchorConfig;
use trellis_filter::{FilterConfig, Item, RemoteConfig, RemoteItem, SearchOutcome};
use trellis_overlay::OverlayRegistry;
use trellis_widgets::ComboboxController;

fn print_list(combobox: &ComboboxController<u32>) {
    let engine = combobox.engine();
    for (position, item) in engine.filtered().enumerate() {
        let marker = if engine.highlighted() == Some(position) { "▸" } else { " " };
        println!("  {marker} {}", item.label);
    }
    if engine.show_empty() {
        println!("  (no results)");
    }
}

fn main() {
    env_logger::init();

    let mut registry: OverlayRegistry<u32> = OverlayRegistry::new();
    let mut combobox: ComboboxController<u32> = ComboboxController::new(
        9,
        2,
        AnchorConfig::default(),
        FilterConfig {
            remote: Some(RemoteConfig::new("/fruits/search")),
            ..FilterConfig::default()
        },
    )
    .expect("valid configuration");
    combobox.mount(&mut registry);
    combobox
        .set_items(
            vec![
                Item::new(0, "Apple"),
                Item::new(1, "Banana"),
                Item::new(2, "Apricot"),
                Item::new(3, "Cherry"),
            ],
            Vec::new(),
        )
        .expect("valid items");

    // Typing opens the panel and filters immediately.
    combobox.on_input("ap", &mut registry, 0);
    println!("typed \"ap\":");
    print_list(&combobox);

    // The debounced search is not due yet…
    assert!(combobox.poll_search(100).is_none());
    // …and fires 300ms after the keystroke.
    let first = combobox.poll_search(300).expect("debounce elapsed");
    println!("\nissued search #{} for {:?}", first.generation, first.query);

    // The user keeps typing before the response lands. The new input names
    // the request to abort at the source.
    let outcome = combobox.on_input("apr", &mut registry, 350);
    println!("typed \"apr\": abort search #{:?}", outcome.cancel);
    let second = combobox.poll_search(650).expect("debounce elapsed");
    println!("issued search #{} for {:?}", second.generation, second.query);

    // The aborted request's response arrives anyway. Dropped: the latest
    // request always wins.
    let stale = combobox.on_search_success(
        first.generation,
        vec![RemoteItem::new(10, "Apple pie (stale)")],
    );
    println!("response for search #{}: {stale:?}", first.generation);
    assert_eq!(stale, SearchOutcome::Stale);

    // The winning response injects its items after the local matches.
    let applied = combobox.on_search_success(
        second.generation,
        vec![
            RemoteItem::new(11, "April sugar plum").in_group("More results"),
            RemoteItem::new(12, "Apricot nectar").in_group("More results"),
        ],
    );
    println!("response for search #{}: {applied:?}", second.generation);
    println!("\nfinal list:");
    print_list(&combobox);

    // Arrow down, then commit the highlighted item.
    combobox.on_arrow_down(700);
    let committed = combobox.commit(&mut registry, 800).expect("item highlighted");
    println!("\ncommitted key {:?}", committed.committed);
    assert!(!combobox.is_open());
}
