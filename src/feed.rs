//! Feed state controller.
//!
//! Owns the accumulated article list and every flag the UI reads.  Fetches
//! run as tokio tasks and report back over an [`mpsc`] channel; the main loop
//! drains that channel each tick, so all mutation happens on the loop thread.
//!
//! ## Concurrency
//!
//! * At most one fetch is in flight.  [`FeedController::request_next_batch`]
//!   is a no-op while one is pending, which makes it safe to call from the
//!   high-frequency scroll trigger.
//! * Every fetch is tagged with the language session it was started in.
//!   Changing language starts a new session and does not cancel the network
//!   call; when the stale call finally resolves its outcome is dropped.
//! * A failed batch halts the feed until the language changes.  So does a
//!   batch that succeeds with no articles, without raising an error.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::language::Language;
use crate::source::{Article, ContentProvider};

/// Articles requested per batch.
pub const BATCH_SIZE: usize = 10;

/// Everything the presentation layer reads.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Append-only within a language session; insertion order is display order.
    pub articles: Vec<Article>,
    pub language: &'static Language,
    /// A fetch for the current session has not resolved yet.
    pub loading: bool,
    /// No batch has resolved yet in this session.
    pub initial_loading: bool,
    /// False once a fetch fails or a batch comes back empty; gates further
    /// fetches.
    pub has_more: bool,
    /// Last error message, until dismissed or the language changes.
    pub error: Option<String>,
    pub batches_loaded: usize,
    pub last_updated: Option<DateTime<Local>>,
}

impl FeedState {
    fn new(language: &'static Language) -> Self {
        Self {
            articles: Vec::new(),
            language,
            loading: false,
            initial_loading: true,
            has_more: true,
            error: None,
            batches_loaded: 0,
            last_updated: None,
        }
    }
}

/// Sent from a fetch task back to the controller.
struct BatchOutcome {
    session: u64,
    language: &'static str,
    result: Result<Vec<Article>, FetchError>,
}

pub struct FeedController {
    provider: Arc<dyn ContentProvider>,
    state: FeedState,
    in_flight: bool,
    session: u64,
    outcome_tx: mpsc::UnboundedSender<BatchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<BatchOutcome>,
    revision: watch::Sender<u64>,
}

impl FeedController {
    /// Create the controller and start loading the first batch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(provider: Arc<dyn ContentProvider>, language: &'static Language) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (revision, _) = watch::channel(0);

        let mut controller = Self {
            provider,
            state: FeedState::new(language),
            in_flight: false,
            session: 0,
            outcome_tx,
            outcome_rx,
            revision,
        };
        controller.request_next_batch();
        controller
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Revision counter bumped after every observable state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Start fetching the next batch for the current language.
    ///
    /// Returns `false` without touching state when a fetch is already in
    /// flight or the feed has halted.
    pub fn request_next_batch(&mut self) -> bool {
        if self.in_flight || !self.state.has_more {
            return false;
        }

        self.in_flight = true;
        self.state.loading = true;
        self.state.error = None;
        self.notify();

        let provider = Arc::clone(&self.provider);
        let tx = self.outcome_tx.clone();
        let session = self.session;
        let language = self.state.language.code;
        debug!(
            "Requesting batch of {BATCH_SIZE} from {} [{language}] (session {session})",
            provider.name()
        );

        tokio::spawn(async move {
            let result = provider.fetch_batch(language, BATCH_SIZE).await;
            // The receiver lives as long as the controller; nothing to do if
            // it is gone.
            let _ = tx.send(BatchOutcome {
                session,
                language,
                result,
            });
        });

        true
    }

    /// Switch language, reset the feed and start loading the new one.
    ///
    /// Returns `false` when `language` is already selected.
    pub fn change_language(&mut self, language: &'static Language) -> bool {
        if language.code == self.state.language.code {
            return false;
        }

        info!(
            "Language changed {} -> {}",
            self.state.language.code, language.code
        );

        self.session += 1;
        self.in_flight = false;
        self.state = FeedState::new(language);
        self.notify();

        self.request_next_batch();
        true
    }

    pub fn dismiss_error(&mut self) {
        if self.state.error.take().is_some() {
            self.notify();
        }
    }

    /// Apply every outcome that has already arrived.  Never blocks.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next outcome (current or stale) and apply it.
    ///
    /// Cancel safe: an outcome is only taken off the channel when it is
    /// applied in the same poll.
    pub async fn next_outcome(&mut self) {
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: BatchOutcome) {
        if outcome.session != self.session {
            debug!(
                "Discarding stale [{}] batch from session {} (now {})",
                outcome.language, outcome.session, self.session
            );
            return;
        }

        self.in_flight = false;
        self.state.loading = false;
        self.state.initial_loading = false;

        match outcome.result {
            Ok(articles) if articles.is_empty() => {
                info!("[{}] empty batch, feed exhausted", outcome.language);
                self.state.has_more = false;
                self.state.batches_loaded += 1;
                self.state.last_updated = Some(Local::now());
            }
            Ok(articles) => {
                info!(
                    "[{}] appended {} articles ({} total)",
                    outcome.language,
                    articles.len(),
                    self.state.articles.len() + articles.len()
                );
                self.state.articles.extend(articles);
                self.state.has_more = true;
                self.state.batches_loaded += 1;
                self.state.last_updated = Some(Local::now());
            }
            Err(e) => {
                warn!("[{}] batch failed, halting feed: {e}", outcome.language);
                self.state.error = Some(e.to_string());
                self.state.has_more = false;
            }
        }

        self.notify();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
