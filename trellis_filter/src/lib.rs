// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Filter: the engine behind comboboxes and command palettes.
//!
//! A filterable list does three jobs at once: fuzzy-filter and reorder the
//! local items as the user types, fetch additional items from a remote
//! endpoint once typing pauses, and keep a single highlighted row that the
//! keyboard and the pointer both move without fighting each other. This
//! crate implements all three as one synchronous state machine,
//! [`FilterEngine`], with no I/O and no clock of its own.
//!
//! The host drives the protocol:
//!
//! 1. Feed every input event through [`FilterEngine::on_input`] with a
//!    millisecond timestamp. The local fuzzy pass applies immediately;
//!    if remote search is configured, a request is armed behind a debounce.
//! 2. Call [`FilterEngine::poll`] on a tick (or a scheduled timeout). When
//!    the debounce deadline passes it yields a [`SearchCommand`] naming the
//!    request to issue and, possibly, an older one to abort.
//! 3. Perform the request, then report back with
//!    [`FilterEngine::on_search_success`] or
//!    [`FilterEngine::on_search_error`]. Responses for superseded requests
//!    are dropped, so the latest query always wins no matter how responses
//!    race.
//! 4. Render from [`FilterEngine::items`] / [`FilterEngine::filtered`] and
//!    apply any [`ScrollCommand`] the highlight methods return.
//!
//! ```rust
//! use trellis_filter::{FilterConfig, FilterEngine, Item, RemoteConfig, RemoteItem};
//!
//! let mut engine = FilterEngine::new(FilterConfig {
//!     remote: Some(RemoteConfig::new("/fruits/search")),
//!     ..FilterConfig::default()
//! })?;
//! engine.set_items(
//!     vec![Item::new(1u32, "Apple"), Item::new(2, "Cherry")],
//!     Vec::new(),
//! )?;
//!
//! engine.on_input("ap", 1_000);
//! assert_eq!(engine.filtered_len(), 1); // Apple, immediately
//!
//! // 300ms later the debounced remote search is due.
//! let command = engine.poll(1_300).expect("search due");
//! let applied = engine.on_search_success(
//!     command.generation,
//!     vec![RemoteItem::new(3u32, "Asian pear")],
//! );
//! assert_eq!(engine.filtered_len(), 2);
//! # let _ = applied;
//! # Ok::<(), trellis_filter::ConfigError>(())
//! ```
//!
//! Labels are plain text. When a remote endpoint serves markup, parsing and
//! sanitizing it is the host's job; the engine only ever receives
//! [`RemoteItem`]s that are already safe to display.

mod engine;
mod types;

pub use engine::FilterEngine;
pub use types::{
    ConfigError, FilterConfig, FilterState, Generation, Group, HoverOutcome, InputOutcome, Item,
    Origin, RemoteConfig, RemoteItem, ScrollAlign, ScrollCommand, SearchCommand, SearchOutcome,
};
