// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The filter engine itself: fuzzy passes, display-order maintenance, the
//! remote-search lifecycle, and roving highlight.

use core::cmp::Reverse;
use core::fmt;

use log::{debug, warn};
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config as MatchConfig, Matcher, Utf32Str};
use smallvec::SmallVec;
use trellis_list_nav::{Wrap, next_enabled_index, previous_enabled_index};

use crate::types::{
    ConfigError, FilterConfig, FilterState, Generation, Group, HoverOutcome, InputOutcome, Item,
    Origin, RemoteItem, ScrollAlign, ScrollCommand, SearchCommand, SearchOutcome,
};

/// One item plus its live visibility flag, stored in display order.
#[derive(Clone, Debug)]
struct Slot<K> {
    item: Item<K>,
    visible: bool,
    /// Rank in the unfiltered list. Filter passes permute the slots;
    /// clearing the input sorts them back by this.
    canonical: usize,
}

/// A remote search armed but not yet issued.
#[derive(Clone, Debug)]
struct PendingSearch {
    query: String,
    deadline: u64,
}

/// Filterable-list engine: local fuzzy filtering with grouped reordering,
/// optional debounced remote search, and a roving highlight.
///
/// The engine owns no I/O and no clock. The host feeds it input text and
/// timestamps, polls for [`SearchCommand`]s, performs the requests, and
/// reports outcomes back. See the crate docs for the full protocol.
pub struct FilterEngine<K> {
    config: FilterConfig,
    matcher: Matcher,
    slots: Vec<Slot<K>>,
    groups: Vec<Group>,
    /// Positions of visible slots, in display order. This is the list the
    /// highlight roves over and hosts render rows from.
    filtered: SmallVec<[usize; 16]>,
    /// Position in `filtered`, not a slot index.
    highlighted: Option<usize>,
    state: FilterState,
    query: String,
    /// Set once any input arrives; gates the empty indicator so an
    /// untouched list never claims "no results".
    received_input: bool,
    loading: bool,
    pending: Option<PendingSearch>,
    inflight: Option<Generation>,
    next_generation: Generation,
    next_canonical: usize,
    keyboard_scroll_until: Option<u64>,
}

impl<K> FilterEngine<K> {
    /// Creates an engine with no items yet.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptySearchPath`] if remote search is configured
    /// without a path.
    pub fn new(config: FilterConfig) -> Result<Self, ConfigError> {
        if let Some(remote) = &config.remote
            && remote.search_path.is_empty()
        {
            return Err(ConfigError::EmptySearchPath);
        }
        Ok(Self {
            config,
            matcher: Matcher::new(MatchConfig::DEFAULT),
            slots: Vec::new(),
            groups: Vec::new(),
            filtered: SmallVec::new(),
            highlighted: None,
            state: FilterState::Idle,
            query: String::new(),
            received_input: false,
            loading: false,
            pending: None,
            inflight: None,
            next_generation: 1,
            next_canonical: 0,
            keyboard_scroll_until: None,
        })
    }

    /// Replaces the item and group tables, resetting all filter state.
    ///
    /// Any armed or in-flight search is forgotten; a late response for it
    /// will be dropped as stale.
    ///
    /// # Errors
    ///
    /// [`ConfigError::GroupOutOfRange`] if an item names a group index the
    /// group table doesn't have.
    pub fn set_items(&mut self, items: Vec<Item<K>>, groups: Vec<Group>) -> Result<(), ConfigError> {
        for item in &items {
            if let Some(index) = item.group
                && index >= groups.len()
            {
                return Err(ConfigError::GroupOutOfRange {
                    index,
                    count: groups.len(),
                });
            }
        }
        self.groups = groups;
        self.next_canonical = 0;
        self.slots = items
            .into_iter()
            .map(|item| {
                let canonical = self.next_canonical;
                self.next_canonical += 1;
                Slot {
                    item,
                    visible: true,
                    canonical,
                }
            })
            .collect();
        self.query.clear();
        self.received_input = false;
        self.loading = false;
        self.pending = None;
        self.inflight = None;
        self.state = FilterState::Idle;
        self.highlighted = None;
        self.keyboard_scroll_until = None;
        self.rebuild_filtered();
        Ok(())
    }

    /// Feeds one input event.
    ///
    /// Empty (or all-whitespace) input resets: every item visible again in
    /// original order, remote items included, and any search abandoned.
    /// Non-empty input applies a local fuzzy pass immediately and, when
    /// remote search is configured, arms a debounced request.
    pub fn on_input(&mut self, value: &str, now: u64) -> InputOutcome {
        self.received_input = true;
        let trimmed = value.trim();
        let cancel = self.inflight.take();
        self.pending = None;
        self.loading = false;
        if trimmed.is_empty() {
            self.query.clear();
            self.reset_to_canonical();
            self.state = FilterState::Idle;
            debug!("input cleared; list reset to {} items", self.slots.len());
            return InputOutcome {
                cancel,
                state: self.state,
            };
        }
        self.query.clear();
        self.query.push_str(trimmed);
        let ranked = self.rank_matches(trimmed);
        self.apply_local_filter(&ranked);
        if let Some(remote) = &self.config.remote {
            self.loading = true;
            self.pending = Some(PendingSearch {
                query: trimmed.to_owned(),
                deadline: now + self.config.debounce_ms,
            });
            self.state = FilterState::FilteringLocal;
            debug!(
                "query {trimmed:?}: {} local matches, remote search armed for {}",
                self.filtered.len(),
                remote.search_path
            );
        } else {
            self.state = if self.filtered.is_empty() {
                FilterState::Empty
            } else {
                FilterState::FilteringLocal
            };
            debug!("query {trimmed:?}: {} local matches", self.filtered.len());
        }
        InputOutcome {
            cancel,
            state: self.state,
        }
    }

    /// Checks the debounce deadline, issuing a search command once it
    /// passes. Call this from the host's tick; returns `None` until a
    /// pending search is due.
    pub fn poll(&mut self, now: u64) -> Option<SearchCommand> {
        if self.pending.as_ref().is_none_or(|p| now < p.deadline) {
            return None;
        }
        let pending = self.pending.take()?;
        let remote = self.config.remote.as_ref()?;
        let generation = self.next_generation;
        self.next_generation += 1;
        let supersedes = self.inflight.replace(generation);
        self.state = FilterState::SearchingRemote;
        debug!("issuing search generation {generation} for {:?}", pending.query);
        Some(SearchCommand {
            generation,
            supersedes,
            query: pending.query,
            search_path: remote.search_path.clone(),
        })
    }

    /// Applies a successful remote response.
    ///
    /// The latest request always wins: a generation that is no longer in
    /// flight returns [`SearchOutcome::Stale`] and changes nothing. A
    /// current response replaces all previously injected remote items with
    /// `results`, appended after the static items.
    pub fn on_search_success(
        &mut self,
        generation: Generation,
        results: Vec<RemoteItem<K>>,
    ) -> SearchOutcome {
        if self.inflight != Some(generation) {
            // A superseded request; fully silent.
            return SearchOutcome::Stale;
        }
        self.inflight = None;
        self.loading = false;
        self.slots.retain(|slot| slot.item.origin == Origin::Static);
        let injected = results.len();
        for result in results {
            let group = result.group.map(|label| self.group_for(label));
            let canonical = self.next_canonical;
            self.next_canonical += 1;
            self.slots.push(Slot {
                item: Item {
                    key: result.key,
                    label: result.label,
                    disabled: result.disabled,
                    group,
                    origin: Origin::Remote,
                },
                visible: true,
                canonical,
            });
        }
        self.rebuild_filtered();
        self.highlighted = self
            .filtered
            .iter()
            .position(|&slot| !self.slots[slot].item.disabled);
        self.state = if self.filtered.is_empty() {
            FilterState::Empty
        } else {
            FilterState::Idle
        };
        debug!("applied search generation {generation}: {injected} items injected");
        SearchOutcome::Applied { injected }
    }

    /// Reports a failed remote request. Stale failures are ignored like
    /// stale successes.
    pub fn on_search_error(&mut self, generation: Generation) -> SearchOutcome {
        if self.inflight != Some(generation) {
            return SearchOutcome::Stale;
        }
        self.inflight = None;
        self.loading = false;
        self.state = FilterState::Error;
        warn!("remote search generation {generation} failed");
        SearchOutcome::Failed
    }

    /// Moves the highlight to the next enabled row below, clamping at the
    /// bottom. Returns the scroll the host should perform, or `None` if
    /// nothing moved.
    pub fn highlight_next(&mut self, now: u64) -> Option<ScrollCommand> {
        self.step_highlight(now, true)
    }

    /// Moves the highlight to the next enabled row above, clamping at the
    /// top.
    pub fn highlight_previous(&mut self, now: u64) -> Option<ScrollCommand> {
        self.step_highlight(now, false)
    }

    fn step_highlight(&mut self, now: u64, forward: bool) -> Option<ScrollCommand> {
        let enabled: Vec<bool> = self
            .filtered
            .iter()
            .map(|&slot| !self.slots[slot].item.disabled)
            .collect();
        let next = match (self.highlighted, forward) {
            (Some(current), true) => next_enabled_index(&enabled, current, Wrap::Clamp, |e| *e),
            (Some(current), false) => {
                previous_enabled_index(&enabled, current, Wrap::Clamp, |e| *e)
            }
            (None, true) => enabled.iter().position(|e| *e)?,
            (None, false) => enabled.iter().rposition(|e| *e)?,
        };
        if Some(next) == self.highlighted {
            return None;
        }
        self.highlighted = Some(next);
        self.keyboard_scroll_until = Some(now + self.config.keyboard_scroll_ms);
        let align = if next == 0 {
            ScrollAlign::Start
        } else if next + 1 == self.filtered.len() {
            ScrollAlign::End
        } else {
            ScrollAlign::Nearest
        };
        Some(ScrollCommand { index: next, align })
    }

    /// Sets the highlight to `position` in the filtered list. Out-of-range
    /// positions and disabled rows are rejected. Idempotent.
    pub fn highlight(&mut self, position: usize) -> bool {
        match self.filtered.get(position) {
            Some(&slot) if !self.slots[slot].item.disabled => {
                self.highlighted = Some(position);
                true
            }
            _ => false,
        }
    }

    /// Reports a pointer hover over the row at `position`.
    ///
    /// Ignored while a keyboard scroll is settling: rows sliding under a
    /// stationary pointer fire enter events that would otherwise fight the
    /// arrow keys for the highlight.
    pub fn on_item_hover(&mut self, position: usize, now: u64) -> HoverOutcome {
        if self
            .keyboard_scroll_until
            .is_some_and(|until| now < until)
        {
            return HoverOutcome::Ignored;
        }
        if self.highlight(position) {
            HoverOutcome::Highlighted
        } else {
            HoverOutcome::Ignored
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FilterState {
        self.state
    }

    /// The trimmed text of the active query, empty when unfiltered.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns `true` while a remote search is armed or in flight. Hosts
    /// show their loading indicator (and suppress the empty indicator) off
    /// this.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` when the empty indicator should show: input has been
    /// received, nothing is loading, and the filtered list is empty.
    #[must_use]
    pub fn show_empty(&self) -> bool {
        self.received_input && !self.loading && self.filtered.is_empty()
    }

    /// Number of visible rows.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The visible rows, in display order.
    pub fn filtered(&self) -> impl Iterator<Item = &Item<K>> {
        self.filtered.iter().map(|&slot| &self.slots[slot].item)
    }

    /// All items in display order, visible or not, with their visibility.
    pub fn items(&self) -> impl Iterator<Item = (&Item<K>, bool)> {
        self.slots.iter().map(|slot| (&slot.item, slot.visible))
    }

    /// Highlight position in the filtered list.
    #[must_use]
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The group table.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns `true` when group `group` has at least one visible item.
    #[must_use]
    pub fn group_visible(&self, group: usize) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.visible && slot.item.group == Some(group))
    }

    /// Ranked slot indices for `query` over enabled static items, best
    /// match first. Ties keep unfiltered order.
    fn rank_matches(&mut self, query: &str) -> Vec<usize> {
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();
        let mut scored: Vec<(u32, usize, usize)> = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.item.disabled || slot.item.origin == Origin::Remote {
                continue;
            }
            let haystack = Utf32Str::new(&slot.item.label, &mut buf);
            if let Some(score) = pattern.score(haystack, &mut self.matcher) {
                scored.push((score, slot.canonical, index));
            }
        }
        scored.sort_by_key(|&(score, canonical, _)| (Reverse(score), canonical));
        scored.into_iter().map(|(_, _, index)| index).collect()
    }

    /// Applies one local filter pass given ranked match indices.
    ///
    /// Display order afterwards: for each group, in order of its first
    /// appearance among the matches, that group's matched items in rank
    /// order followed by its unmatched (hidden) items; ungrouped matches
    /// interleave at their own rank; remaining static items keep their
    /// relative order; remote items sink to the end, hidden.
    fn apply_local_filter(&mut self, ranked: &[usize]) {
        let len = self.slots.len();
        let mut matched = vec![false; len];
        for &index in ranked {
            matched[index] = true;
        }
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.visible = matched[index];
        }

        let mut order: Vec<usize> = Vec::with_capacity(len);
        let mut emitted = vec![false; len];
        let mut group_done = vec![false; self.groups.len()];
        for &index in ranked {
            if emitted[index] {
                continue;
            }
            match self.slots[index].item.group {
                Some(group) => {
                    if group_done[group] {
                        continue;
                    }
                    group_done[group] = true;
                    for &other in ranked {
                        if !emitted[other] && self.slots[other].item.group == Some(group) {
                            emitted[other] = true;
                            order.push(other);
                        }
                    }
                    // Unmatched members stay with their group, hidden.
                    for other in 0..len {
                        if !emitted[other] && self.slots[other].item.group == Some(group) {
                            emitted[other] = true;
                            order.push(other);
                        }
                    }
                }
                None => {
                    emitted[index] = true;
                    order.push(index);
                }
            }
        }
        for index in 0..len {
            if !emitted[index] && self.slots[index].item.origin == Origin::Static {
                emitted[index] = true;
                order.push(index);
            }
        }
        // Whatever is left is remote; it always lands last.
        for index in 0..len {
            if !emitted[index] {
                order.push(index);
            }
        }

        self.reorder_slots(&order);
        self.rebuild_filtered();
        self.highlighted = if self.filtered.is_empty() { None } else { Some(0) };
    }

    /// Restores the unfiltered list: original order, everything visible.
    fn reset_to_canonical(&mut self) {
        self.slots.sort_by_key(|slot| slot.canonical);
        for slot in &mut self.slots {
            slot.visible = true;
        }
        self.rebuild_filtered();
        self.highlighted = None;
    }

    fn reorder_slots(&mut self, order: &[usize]) {
        let mut old: Vec<Option<Slot<K>>> = self.slots.drain(..).map(Some).collect();
        self.slots = order
            .iter()
            .map(|&index| old[index].take().expect("each slot emitted exactly once"))
            .collect();
    }

    fn rebuild_filtered(&mut self) {
        self.filtered = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.visible)
            .map(|(index, _)| index)
            .collect();
    }

    /// Index of the group labelled `label`, creating a remote group if
    /// none exists.
    fn group_for(&mut self, label: String) -> usize {
        if let Some(index) = self.groups.iter().position(|g| g.label == label) {
            return index;
        }
        self.groups.push(Group {
            label,
            origin: Origin::Remote,
        });
        self.groups.len() - 1
    }
}

impl<K: Copy> FilterEngine<K> {
    /// Key of the highlighted item, if any.
    #[must_use]
    pub fn highlighted_key(&self) -> Option<K> {
        let position = self.highlighted?;
        let slot = *self.filtered.get(position)?;
        Some(self.slots[slot].item.key)
    }
}

// `Matcher` keeps internal scratch buffers with no `Debug`.
impl<K: fmt::Debug> fmt::Debug for FilterEngine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("state", &self.state)
            .field("query", &self.query)
            .field("items", &self.slots.len())
            .field("filtered", &self.filtered.len())
            .field("highlighted", &self.highlighted)
            .field("inflight", &self.inflight)
            .finish_non_exhaustive()
    }
}
