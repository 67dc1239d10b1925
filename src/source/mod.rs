//! Content provider abstraction layer.
//!
//! This module defines the [`ContentProvider`] trait and the common
//! [`Article`] type.  The concrete provider lives in [`wikipedia`].
//!
//! ## For contributors — adding a provider
//!
//! 1. Create a new file in this directory.
//! 2. Define a struct and implement [`ContentProvider`] for it.
//! 3. Add the `mod` line below and re-export the struct.
//! 4. Construct it in `main.rs` instead of [`WikipediaSource`].
//!
//! The feed controller, scroll trigger and UI are all provider-agnostic.

mod article;
mod wikipedia;

pub use article::Article;
#[cfg(test)]
pub use article::NO_DESCRIPTION;
pub use wikipedia::WikipediaSource;

use async_trait::async_trait;

use crate::error::FetchError;

/// A remote, read-only source of random articles.
///
/// The feed controller runs [`fetch_batch`](ContentProvider::fetch_batch) on
/// a spawned task, so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-readable label, used in logs.
    fn name(&self) -> &str;

    /// Fetch up to `batch_size` random articles in `language`.
    ///
    /// Makes a single attempt.  The provider may return fewer articles than
    /// requested; an empty discovery step is [`FetchError::EmptyResult`].
    async fn fetch_batch(
        &self,
        language: &str,
        batch_size: usize,
    ) -> Result<Vec<Article>, FetchError>;
}
