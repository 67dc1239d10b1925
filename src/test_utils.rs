//! Shared helpers for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::FetchError;
use crate::feed::FeedController;
use crate::language::Language;
use crate::source::{Article, ContentProvider};

pub const PLACEHOLDER: &str = "https://example.org/placeholder.png";

/// In-memory provider with scripted behaviour.
///
/// Returns `pages` articles per call, titled `"{language} #{id}"` with ids
/// counting up from 1 across calls.  Languages registered with
/// [`FakeProvider::hold`] block until [`FakeProvider::release`] is called.
pub struct FakeProvider {
    pages: usize,
    failing: AtomicBool,
    next_id: AtomicU64,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl FakeProvider {
    pub fn new(pages: usize) -> Arc<Self> {
        Arc::new(Self {
            pages,
            failing: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        let provider = Self::new(10);
        provider.failing.store(true, Ordering::SeqCst);
        provider
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make fetches for `language` wait until released.
    pub fn hold(&self, language: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(language.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Let every pending and future fetch for `language` through.
    pub fn release(&self, language: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(language) {
            gate.close();
        }
    }

    /// Languages requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_batch(
        &self,
        language: &str,
        batch_size: usize,
    ) -> Result<Vec<Article>, FetchError> {
        self.calls.lock().unwrap().push(language.to_string());

        let gate = self.gates.lock().unwrap().get(language).cloned();
        if let Some(gate) = gate {
            // A closed gate errors out immediately, which is the release.
            let _ = gate.acquire().await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::EmptyResult);
        }

        let count = self.pages.min(batch_size);
        Ok((0..count)
            .map(|_| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                Article::new(
                    id,
                    format!("{language} #{id}"),
                    Some(format!("Extract {id}")),
                    None,
                    format!("https://{language}.example.org/wiki/{id}"),
                    PLACEHOLDER,
                )
            })
            .collect())
    }
}

pub fn language(code: &str) -> &'static Language {
    Language::from_code(code).unwrap()
}

/// Wait for the next fetch outcome and apply it, failing the test after a
/// few seconds instead of hanging.
pub async fn settle(controller: &mut FeedController) {
    tokio::time::timeout(Duration::from_secs(5), controller.next_outcome())
        .await
        .expect("timed out waiting for a batch outcome");
}
