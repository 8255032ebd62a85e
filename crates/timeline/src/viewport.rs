//! Sliding window over the timeline with load-older and pin-to-latest.
//!
//! The viewport shows the latest `baseline_count` messages plus `offset`
//! older ones. Loading older history is a two-step operation around a render:
//! [`Viewport::begin_load_older`] grows the window and records a scroll
//! anchor, the host renders the new rows, then [`Viewport::finish_load_older`]
//! shifts the scroll position by the height the new rows added so the content
//! the user was reading stays in place.
//!
//! Only one load runs at a time. [`Viewport::reset`] and
//! [`Viewport::container_changed`] abandon an in-flight load: its ticket goes
//! stale and finishing it has no effect. A ticket finished on a different
//! container than the one it measured is abandoned as well.

use crate::bus::TimelineEvent;
use crate::follow::{FollowState, ScrollPin};
use crate::scroll::{measure, ContainerId, ScrollContainer, ScrollError};
use crate::window;
use agentview_runtime_config::TimelineSettings;
use tracing::{debug, warn};

/// Distance from the bottom that still counts as "true bottom" after an
/// auto-scroll.
const TRUE_BOTTOM_EPSILON_PX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    pub baseline_count: usize,
    pub load_chunk_size: usize,
    pub bottom_tolerance_px: f64,
    pub near_top_threshold_px: f64,
    /// Growth or shrink beyond this many messages at once resets the window.
    /// 0 disables.
    pub reset_jump_threshold: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::from(&TimelineSettings::default())
    }
}

impl From<&TimelineSettings> for ViewportConfig {
    fn from(settings: &TimelineSettings) -> Self {
        Self {
            baseline_count: settings.baseline_count.max(1),
            load_chunk_size: settings.load_chunk_size.max(1),
            bottom_tolerance_px: settings.bottom_tolerance_px,
            near_top_threshold_px: settings.near_top_threshold_px,
            reset_jump_threshold: settings.reset_jump_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    LoadingOlder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollAnchor {
    scroll_top: f64,
    scroll_height: f64,
}

/// Handle for one in-flight load-older operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadTicket {
    generation: u64,
    container: ContainerId,
    added: usize,
    anchor: Option<ScrollAnchor>,
}

impl LoadTicket {
    /// Older messages added to the window by this load.
    pub fn added(&self) -> usize {
        self.added
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOlder {
    Started(LoadTicket),
    Rejected(LoadRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRejection {
    /// Another load is in flight.
    Busy,
    NothingOlder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadCompletion {
    /// Scroll position shifted to keep the viewed content in place.
    Restored { scroll_top: f64 },
    /// Window grew but the scroll position could not be restored.
    Skipped,
    /// The load was cancelled by a reset or a container change; the scroll
    /// position was not touched.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOutcome {
    pub pin: ScrollPin,
    /// Set when the scroll reached the top and started loading older messages.
    pub load: Option<LoadTicket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoScroll {
    NotPinned,
    /// Container could not be measured or scrolled.
    Skipped,
    /// Scrolled; call [`Viewport::settle_auto_scroll`] after the next layout.
    Scrolled,
    AtBottom,
    /// Content grew after the first attempt; scrolled again.
    Corrected,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    offset: usize,
    state: LoadState,
    follow: FollowState,
    generation: u64,
    last_total: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            offset: 0,
            state: LoadState::Idle,
            follow: FollowState::default(),
            generation: 0,
            last_total: 0,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Older messages shown beyond the baseline.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn pin(&self) -> ScrollPin {
        if self.follow.is_pinned() {
            ScrollPin::PinnedToLatest
        } else {
            ScrollPin::Floating
        }
    }

    pub fn visible_slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        window::visible_slice(all, self.config.baseline_count, self.offset)
    }

    pub fn has_older(&self, total: usize) -> bool {
        window::remaining_older(total, self.config.baseline_count, self.offset) > 0
    }

    /// Grow the window by one chunk of older messages.
    ///
    /// Rejected while another load is in flight; requests are not queued.
    pub fn begin_load_older(
        &mut self,
        total: usize,
        container: &dyn ScrollContainer,
    ) -> LoadOlder {
        if self.state == LoadState::LoadingOlder {
            debug!("load older rejected: already loading");
            return LoadOlder::Rejected(LoadRejection::Busy);
        }

        let chunk = window::next_chunk(
            total,
            self.config.baseline_count,
            self.offset,
            self.config.load_chunk_size,
        );
        if chunk == 0 {
            return LoadOlder::Rejected(LoadRejection::NothingOlder);
        }

        let anchor = match measure(container) {
            Ok(geometry) => Some(ScrollAnchor {
                scroll_top: geometry.scroll_top,
                scroll_height: geometry.scroll_height,
            }),
            Err(error) => {
                debug!(%error, "no scroll anchor; position will not be restored");
                None
            }
        };

        self.generation += 1;
        self.state = LoadState::LoadingOlder;
        self.offset += chunk;
        debug!(chunk, offset = self.offset, total, "loading older messages");

        LoadOlder::Started(LoadTicket {
            generation: self.generation,
            container: container.id(),
            added: chunk,
            anchor,
        })
    }

    /// Restore the scroll position once the grown window is rendered.
    ///
    /// Always leaves the viewport idle unless the ticket is stale, in which
    /// case nothing is touched.
    pub fn finish_load_older(
        &mut self,
        ticket: LoadTicket,
        container: &mut dyn ScrollContainer,
    ) -> LoadCompletion {
        if !self.is_current(&ticket) {
            debug!("load older abandoned");
            return LoadCompletion::Abandoned;
        }
        if ticket.container != container.id() {
            debug!("load older finished on another container; abandoning");
            self.cancel_load();
            return LoadCompletion::Abandoned;
        }

        let completion = match restore_scroll(ticket.anchor, container) {
            Ok(Some(scroll_top)) => LoadCompletion::Restored { scroll_top },
            Ok(None) => LoadCompletion::Skipped,
            Err(error) => {
                warn!(%error, "failed to restore scroll position after loading older messages");
                LoadCompletion::Skipped
            }
        };
        self.state = LoadState::Idle;
        completion
    }

    /// Run a complete load-older: grow, `render`, restore.
    pub fn load_older_with<C, F>(
        &mut self,
        total: usize,
        container: &mut C,
        render: F,
    ) -> Result<LoadCompletion, LoadRejection>
    where
        C: ScrollContainer,
        F: FnOnce(&mut C, &LoadTicket),
    {
        let ticket = match self.begin_load_older(total, &*container) {
            LoadOlder::Started(ticket) => ticket,
            LoadOlder::Rejected(rejection) => return Err(rejection),
        };
        render(&mut *container, &ticket);
        Ok(self.finish_load_older(ticket, &mut *container))
    }

    /// Back to the baseline window. Cancels any in-flight load.
    pub fn reset(&mut self) {
        if self.state == LoadState::LoadingOlder {
            debug!("reset cancels in-flight load");
        }
        self.cancel_load();
        self.offset = 0;
        self.follow.reset();
    }

    /// The host now scrolls the timeline in a different container. Cancels
    /// any in-flight load; the window keeps its size.
    pub fn container_changed(&mut self) {
        if self.state == LoadState::LoadingOlder {
            debug!("container change cancels in-flight load");
        }
        self.cancel_load();
    }

    /// Stop following new messages until [`Viewport::resume_follow`], even
    /// when the view sits at the bottom.
    pub fn pause_follow(&mut self) {
        self.follow.detach();
    }

    pub fn resume_follow(&mut self) {
        self.follow.reattach();
    }

    /// Track the filtered message count. Returns true when the window was
    /// reset because the source was replaced or emptied, or its size jumped
    /// in either direction by more than `reset_jump_threshold`.
    pub fn sync_total(&mut self, total: usize) -> bool {
        let previous = std::mem::replace(&mut self.last_total, total);

        let replaced = (previous == 0) != (total == 0);
        let jumped = self.config.reset_jump_threshold > 0
            && previous.abs_diff(total) > self.config.reset_jump_threshold;

        if replaced || jumped {
            debug!(previous, total, replaced, jumped, "resetting viewport");
            self.reset();
            return true;
        }
        false
    }

    /// Classify a user scroll and load older messages when near the top.
    pub fn on_scroll(&mut self, total: usize, container: &dyn ScrollContainer) -> ScrollOutcome {
        let geometry = match measure(container) {
            Ok(geometry) => geometry,
            Err(error) => {
                debug!(%error, "ignoring scroll on unmeasurable container");
                return ScrollOutcome {
                    pin: self.pin(),
                    load: None,
                };
            }
        };

        let pin = ScrollPin::classify(&geometry, self.config.bottom_tolerance_px);
        self.follow.observe(pin);

        let load = if geometry.is_near_top(self.config.near_top_threshold_px)
            && self.state == LoadState::Idle
        {
            match self.begin_load_older(total, container) {
                LoadOlder::Started(ticket) => Some(ticket),
                LoadOlder::Rejected(_) => None,
            }
        } else {
            None
        };

        ScrollOutcome { pin, load }
    }

    /// First auto-scroll attempt after new messages were rendered.
    pub fn auto_scroll(&mut self, container: &mut dyn ScrollContainer) -> AutoScroll {
        if !self.follow.is_pinned() {
            return AutoScroll::NotPinned;
        }
        match scroll_to_bottom(container) {
            Ok(()) => AutoScroll::Scrolled,
            Err(error) => {
                debug!(%error, "auto-scroll skipped");
                AutoScroll::Skipped
            }
        }
    }

    /// Second and final auto-scroll attempt, after a layout pass.
    pub fn settle_auto_scroll(&mut self, container: &mut dyn ScrollContainer) -> AutoScroll {
        if !self.follow.is_pinned() {
            return AutoScroll::NotPinned;
        }
        let settled = measure(&*container).and_then(|geometry| {
            if geometry.is_at_bottom(TRUE_BOTTOM_EPSILON_PX) {
                return Ok(AutoScroll::AtBottom);
            }
            scroll_to_bottom(container).map(|()| AutoScroll::Corrected)
        });
        settled.unwrap_or_else(|error| {
            debug!(%error, "auto-scroll retry skipped");
            AutoScroll::Skipped
        })
    }

    /// Apply a new message count: maybe reset, then keep a pinned view at
    /// the bottom across `layout`. `None` when nothing was appended.
    pub fn messages_updated<C, F>(
        &mut self,
        total: usize,
        container: &mut C,
        layout: F,
    ) -> Option<AutoScroll>
    where
        C: ScrollContainer,
        F: FnOnce(&mut C),
    {
        let previous = self.last_total;
        self.sync_total(total);
        if total <= previous {
            return None;
        }

        let outcome = match self.auto_scroll(&mut *container) {
            AutoScroll::Scrolled => {
                layout(&mut *container);
                self.settle_auto_scroll(&mut *container)
            }
            other => other,
        };
        Some(outcome)
    }

    pub fn handle(&mut self, event: &TimelineEvent) {
        match event {
            TimelineEvent::InitialLoadComplete { message_count } => {
                self.reset();
                self.last_total = *message_count;
            }
            TimelineEvent::OlderMessagesAvailable { total } => {
                debug!(total, has_older = self.has_older(*total), "older messages available");
            }
            TimelineEvent::SourceReplaced => {
                self.reset();
                self.last_total = 0;
            }
            TimelineEvent::ContainerChanged => self.container_changed(),
            TimelineEvent::ShowCommitDiff { .. } => {}
        }
    }

    fn cancel_load(&mut self) {
        self.generation += 1;
        self.state = LoadState::Idle;
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.state == LoadState::LoadingOlder && ticket.generation == self.generation
    }
}

fn restore_scroll(
    anchor: Option<ScrollAnchor>,
    container: &mut dyn ScrollContainer,
) -> Result<Option<f64>, ScrollError> {
    let Some(anchor) = anchor else {
        return Ok(None);
    };
    let geometry = measure(&*container)?;
    let grown = geometry.scroll_height - anchor.scroll_height;
    let scroll_top = anchor.scroll_top + grown;
    container.set_scroll_top(scroll_top)?;
    Ok(Some(scroll_top))
}

fn scroll_to_bottom(container: &mut dyn ScrollContainer) -> Result<(), ScrollError> {
    let geometry = measure(&*container)?;
    container.set_scroll_top(geometry.max_scroll_top())
}
