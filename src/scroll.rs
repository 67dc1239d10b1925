//! Scroll-driven prefetch.
//!
//! The view publishes its [`ScrollPosition`] to a [`ScrollFeed`] whenever it
//! changes.  A [`ScrollTrigger`] subscribes to that feed and asks the
//! controller for the next batch once the bottom of the content comes within
//! [`DEFAULT_THRESHOLD`] units of the bottom of the viewport.
//!
//! The trigger keeps no in-flight state of its own.  Positions change far
//! more often than batches land, and every extra request while one is pending
//! is a no-op inside [`FeedController::request_next_batch`].

use tokio::sync::watch;
use tracing::trace;

use crate::feed::FeedController;

/// Distance from the bottom, in length units, at which the next batch is
/// requested.
pub const DEFAULT_THRESHOLD: u32 = 1000;

/// Where the viewport sits over the rendered content, in length units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Distance from the top of the content to the top of the viewport.
    pub offset: u32,
    /// Height of the viewport.
    pub viewport: u32,
    /// Height of all rendered content.
    pub content: u32,
}

impl ScrollPosition {
    /// Content left below the bottom edge of the viewport.
    pub fn distance_to_bottom(&self) -> u32 {
        self.content
            .saturating_sub(self.offset.saturating_add(self.viewport))
    }
}

/// Publisher side of the position feed, owned by the view.
pub struct ScrollFeed {
    tx: watch::Sender<ScrollPosition>,
}

impl ScrollFeed {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ScrollPosition::default());
        Self { tx }
    }

    /// Publish `position`; subscribers only see it if it differs from the
    /// last one.
    pub fn publish(&self, position: ScrollPosition) {
        self.tx.send_if_modified(|current| {
            if *current == position {
                return false;
            }
            *current = position;
            true
        });
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ScrollFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests the next batch when the view nears the bottom of the feed.
///
/// Dropping the trigger, or calling [`detach`](ScrollTrigger::detach),
/// releases its subscription.
pub struct ScrollTrigger {
    rx: Option<watch::Receiver<ScrollPosition>>,
    threshold: u32,
}

impl ScrollTrigger {
    pub fn attach(feed: &ScrollFeed) -> Self {
        Self::with_threshold(feed, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(feed: &ScrollFeed, threshold: u32) -> Self {
        Self {
            rx: Some(feed.tx.subscribe()),
            threshold,
        }
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.rx.is_some()
    }

    pub fn detach(&mut self) {
        self.rx = None;
    }

    /// Look at the latest position change, if any, and request the next
    /// batch when it is close enough to the bottom.
    ///
    /// Returns whether a fetch was started.
    pub fn poll(&mut self, controller: &mut FeedController) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return false;
        };
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }

        let position = *rx.borrow_and_update();
        let distance = position.distance_to_bottom();
        if distance > self.threshold {
            return false;
        }

        trace!("Near bottom ({distance} <= {}), requesting batch", self.threshold);
        controller.request_next_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{language, settle, FakeProvider};

    fn at(offset: u32, viewport: u32, content: u32) -> ScrollPosition {
        ScrollPosition {
            offset,
            viewport,
            content,
        }
    }

    #[test]
    fn distance_to_bottom_saturates() {
        assert_eq!(at(0, 800, 5000).distance_to_bottom(), 4200);
        assert_eq!(at(4200, 800, 5000).distance_to_bottom(), 0);
        assert_eq!(at(0, 800, 100).distance_to_bottom(), 0);
        assert_eq!(at(u32::MAX, u32::MAX, 10).distance_to_bottom(), 0);
    }

    #[tokio::test]
    async fn fires_only_within_threshold() {
        let provider = FakeProvider::new(10);
        let mut controller = FeedController::new(provider.clone(), language("en"));
        settle(&mut controller).await;

        let feed = ScrollFeed::new();
        let mut trigger = ScrollTrigger::attach(&feed);

        feed.publish(at(0, 800, 5000));
        assert!(!trigger.poll(&mut controller));

        feed.publish(at(3200, 800, 5000));
        assert!(trigger.poll(&mut controller), "exactly at the threshold");
        settle(&mut controller).await;
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn unchanged_position_does_not_refire() {
        let provider = FakeProvider::new(10);
        let mut controller = FeedController::new(provider.clone(), language("en"));
        settle(&mut controller).await;

        let feed = ScrollFeed::new();
        let mut trigger = ScrollTrigger::attach(&feed);

        feed.publish(at(4000, 800, 5000));
        assert!(trigger.poll(&mut controller));
        settle(&mut controller).await;

        feed.publish(at(4000, 800, 5000));
        assert!(!trigger.poll(&mut controller));
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn rapid_scrolling_while_pending_makes_one_request() {
        let provider = FakeProvider::new(10);
        let mut controller = FeedController::new(provider.clone(), language("en"));
        settle(&mut controller).await;

        provider.hold("en");
        let feed = ScrollFeed::new();
        let mut trigger = ScrollTrigger::attach(&feed);

        let mut started = 0;
        for offset in 4000..4200 {
            feed.publish(at(offset, 800, 5000));
            if trigger.poll(&mut controller) {
                started += 1;
            }
        }
        assert_eq!(started, 1);

        provider.release("en");
        settle(&mut controller).await;
        assert_eq!(provider.calls().len(), 2);
        assert_eq!(controller.state().articles.len(), 20);
    }

    #[tokio::test]
    async fn detached_trigger_never_fires() {
        let provider = FakeProvider::new(10);
        let mut controller = FeedController::new(provider.clone(), language("en"));
        settle(&mut controller).await;

        let feed = ScrollFeed::new();
        let mut trigger = ScrollTrigger::attach(&feed);
        assert_eq!(feed.subscriber_count(), 1);

        trigger.detach();
        assert!(!trigger.is_attached());
        assert_eq!(feed.subscriber_count(), 0);

        feed.publish(at(4900, 100, 5000));
        assert!(!trigger.poll(&mut controller));
        assert_eq!(provider.calls().len(), 1);
    }

    #[test]
    fn dropping_trigger_unsubscribes() {
        let feed = ScrollFeed::new();
        {
            let _trigger = ScrollTrigger::with_threshold(&feed, 10);
            assert_eq!(feed.subscriber_count(), 1);
        }
        assert_eq!(feed.subscriber_count(), 0);
    }
}
