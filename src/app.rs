//! Presentation state.
//!
//! `App` owns the [`FeedController`] and everything that only matters to the
//! view: which card is at the top of the screen, whether the language picker
//! is open, how long the current error has been on screen.  It never mutates
//! the feed directly; every change goes through the controller.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::feed::{FeedController, FeedState};
use crate::language::{Language, LANGUAGES};
use crate::scroll::{ScrollFeed, ScrollPosition, ScrollTrigger};

/// Rows taken by one article card, borders included.
pub const CARD_HEIGHT: u16 = 14;

/// Length units per terminal row, roughly the pixel height of a line of text.
pub const UNITS_PER_ROW: u32 = 20;

pub struct App {
    pub feed: FeedController,
    /// Index of the card drawn at the top of the viewport.
    pub selected: usize,
    /// Highlighted row of the language picker, when it is open.
    pub picker: Option<usize>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Height of the card area in rows, updated on every draw.
    pub viewport_rows: u16,
    scroll_feed: ScrollFeed,
    trigger: ScrollTrigger,
    error_timeout: Duration,
    error_since: Option<Instant>,
}

impl App {
    pub fn new(feed: FeedController, error_timeout: Duration) -> Self {
        let scroll_feed = ScrollFeed::new();
        let trigger = ScrollTrigger::attach(&scroll_feed);
        Self {
            feed,
            selected: 0,
            picker: None,
            quit: false,
            viewport_rows: 0,
            scroll_feed,
            trigger,
            error_timeout,
            error_since: None,
        }
    }

    pub fn state(&self) -> &FeedState {
        self.feed.state()
    }

    fn article_count(&self) -> usize {
        self.feed.state().articles.len()
    }

    /// Cards that fit on screen at once (at least one).
    fn cards_per_page(&self) -> usize {
        usize::from((self.viewport_rows / CARD_HEIGHT).max(1))
    }

    // -- per-tick housekeeping -----------------------------------------------

    /// Apply finished fetches, publish the scroll position, let the trigger
    /// react to it and expire stale error notifications.
    pub fn tick(&mut self, now: Instant) {
        self.feed.process_pending();

        let count = self.article_count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }

        self.scroll_feed.publish(self.scroll_position());
        self.trigger.poll(&mut self.feed);

        if self.feed.state().error.is_some() {
            let since = *self.error_since.get_or_insert(now);
            if now.duration_since(since) >= self.error_timeout {
                debug!("Error notification timed out");
                self.dismiss_error();
            }
        } else {
            self.error_since = None;
        }
    }

    pub fn scroll_position(&self) -> ScrollPosition {
        let card = u32::from(CARD_HEIGHT) * UNITS_PER_ROW;
        let count = u32::try_from(self.article_count()).unwrap_or(u32::MAX);
        let selected = u32::try_from(self.selected).unwrap_or(u32::MAX);
        ScrollPosition {
            offset: selected.saturating_mul(card),
            viewport: u32::from(self.viewport_rows) * UNITS_PER_ROW,
            content: count.saturating_mul(card),
        }
    }

    /// Stop reacting to scroll changes; called once the loop exits.
    pub fn shutdown(&mut self) {
        self.trigger.detach();
    }

    pub fn dismiss_error(&mut self) {
        self.feed.dismiss_error();
        self.error_since = None;
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        let count = self.article_count();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let count = self.article_count();
        if count > 0 {
            self.selected = (self.selected + self.cards_per_page()).min(count - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.cards_per_page());
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.article_count().saturating_sub(1);
    }

    // -- language picker -----------------------------------------------------

    pub fn open_picker(&mut self) {
        let current = Language::index_of(self.feed.state().language.code).unwrap_or(0);
        self.picker = Some(current);
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_next(&mut self) {
        if let Some(i) = self.picker.as_mut() {
            *i = (*i + 1).min(LANGUAGES.len() - 1);
        }
    }

    pub fn picker_previous(&mut self) {
        if let Some(i) = self.picker.as_mut() {
            *i = i.saturating_sub(1);
        }
    }

    /// Switch to the highlighted language and close the picker.
    pub fn picker_confirm(&mut self) {
        let Some(index) = self.picker.take() else {
            return;
        };
        if self.feed.change_language(&LANGUAGES[index]) {
            self.selected = 0;
            self.error_since = None;
        }
    }
}
