// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Items, groups, configuration, and the command/outcome types the engine
//! exchanges with its host.

use thiserror::Error;

/// Monotonic id for one issued remote search request.
///
/// Generations are how cancellation works without the engine owning any I/O:
/// every [`SearchCommand`](crate::SearchCommand) carries a fresh generation,
/// and a response is applied only if its generation is still the in-flight
/// one. Everything else is stale and dropped silently.
pub type Generation = u64;

/// Where an item came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Present in the host's initial item set.
    Static,
    /// Injected from a remote search response. Remote items are transient:
    /// they sink to the end of the list, hide during local filter passes,
    /// and are replaced wholesale by the next search response.
    Remote,
}

/// One selectable entry in the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item<K> {
    /// Host-side id, echoed back on selection.
    pub key: K,
    /// Text the fuzzy matcher runs against.
    pub label: String,
    /// Disabled items are skipped by matching and highlight traversal.
    pub disabled: bool,
    /// Index into the engine's group table, if grouped.
    pub group: Option<usize>,
    /// Static or remote.
    pub origin: Origin,
}

impl<K> Item<K> {
    /// A plain enabled, ungrouped item.
    pub fn new(key: K, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            disabled: false,
            group: None,
            origin: Origin::Static,
        }
    }

    /// Marks the item disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Places the item in group `group` (an index into the group table).
    #[must_use]
    pub fn in_group(mut self, group: usize) -> Self {
        self.group = Some(group);
        self
    }
}

/// A labelled group header.
///
/// A group is visible exactly when at least one of its items is visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    /// Header text, also the key remote results are matched against.
    pub label: String,
    /// Static or created from a remote response.
    pub origin: Origin,
}

impl Group {
    /// A static group.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            origin: Origin::Static,
        }
    }
}

/// One entry of a remote search response, already parsed by the host.
///
/// The engine never sees markup: the host fetches, sanitizes, and parses the
/// response on its side of the trust boundary and hands over keys and labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteItem<K> {
    /// Host-side id for the new item.
    pub key: K,
    /// Label text for matching and display.
    pub label: String,
    /// Group header to file the item under. A group with this label is
    /// created if none exists yet.
    pub group: Option<String>,
    /// Whether the item arrives disabled.
    pub disabled: bool,
}

impl<K> RemoteItem<K> {
    /// An enabled, ungrouped remote item.
    pub fn new(key: K, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            group: None,
            disabled: false,
        }
    }

    /// Files the item under the group with this header label.
    #[must_use]
    pub fn in_group(mut self, label: impl Into<String>) -> Self {
        self.group = Some(label.into());
        self
    }
}

/// Remote search wiring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Path or URL the host should query, with the text appended as a
    /// query parameter.
    pub search_path: String,
}

impl RemoteConfig {
    /// Remote search against `search_path`.
    pub fn new(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// Quiet period after the last keystroke before a remote search is
    /// issued. Zero means "on the next poll".
    pub debounce_ms: u64,
    /// How long after a keyboard-driven scroll hover events are ignored,
    /// so rows sliding under a stationary pointer don't steal the
    /// highlight.
    pub keyboard_scroll_ms: u64,
    /// Remote search, if configured. `None` is a purely local list.
    pub remote: Option<RemoteConfig>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            keyboard_scroll_ms: 200,
            remote: None,
        }
    }
}

/// Invalid configuration or item set, reported at construction time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Remote search was configured with an empty path.
    #[error("remote search path must not be empty")]
    EmptySearchPath,
    /// An item referenced a group index past the end of the group table.
    #[error("item references group {index} but only {count} groups exist")]
    GroupOutOfRange {
        /// The out-of-range group index.
        index: usize,
        /// Size of the group table.
        count: usize,
    },
}

/// What the engine is currently doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FilterState {
    /// No active filter: the full list (or the last applied remote result)
    /// is showing.
    #[default]
    Idle,
    /// A local fuzzy pass has been applied for the current query.
    FilteringLocal,
    /// A remote request is in flight.
    SearchingRemote,
    /// The current query produced zero visible items.
    Empty,
    /// The last remote request failed.
    Error,
}

/// An instruction to perform one remote search.
///
/// Returned by [`FilterEngine::poll`](crate::FilterEngine::poll) once the
/// debounce deadline passes. The host owns the transport: it aborts the
/// superseded request at the source if one is named, issues this one, and
/// reports back through `on_search_success` / `on_search_error` with the
/// same generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCommand {
    /// Identifies this request in the host's report-back calls.
    pub generation: Generation,
    /// A previously issued request this one replaces. The host should
    /// abort it; its response would be dropped as stale regardless.
    pub supersedes: Option<Generation>,
    /// The trimmed query text.
    pub query: String,
    /// Where to send it.
    pub search_path: String,
}

/// Result of reporting a remote response to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was current and its items were injected.
    Applied {
        /// How many items were added to the list.
        injected: usize,
    },
    /// The response was current but reported an error; the engine is now
    /// in the error state.
    Failed,
    /// The response belonged to a superseded request and was ignored.
    Stale,
}

/// Result of feeding one input event to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InputOutcome {
    /// An in-flight request made obsolete by this input. The host should
    /// abort it.
    pub cancel: Option<Generation>,
    /// The state the engine landed in.
    pub state: FilterState,
}

/// Vertical alignment for a host-side scroll-into-view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Pin the row to the top of the viewport.
    Start,
    /// Scroll the minimum distance that makes the row fully visible.
    Nearest,
    /// Pin the row to the bottom of the viewport.
    End,
}

/// An instruction to scroll the highlighted row into view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScrollCommand {
    /// Position of the row in the filtered list.
    pub index: usize,
    /// First and last rows pin to their edge; everything else scrolls the
    /// minimum distance.
    pub align: ScrollAlign,
}

/// Result of reporting a pointer hover over a row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverOutcome {
    /// The hovered row took the highlight.
    Highlighted,
    /// The hover was ignored: a keyboard scroll just moved the list, the
    /// row is disabled, or the position is out of range.
    Ignored,
}
