//! Wikipedia content provider.
//!
//! A batch costs two calls against the MediaWiki action API of the chosen
//! language edition:
//!
//! 1. `generator=random` discovers up to `batch_size` random page ids in the
//!    article namespace.
//! 2. `prop=extracts|pageimages` fetches the plain-text intro and the
//!    original lead image for exactly those ids.
//!
//! Both responses carry a `query.pages` object keyed by page id.  Parsing is
//! split into pure functions so tests can exercise it without a server.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{Article, ContentProvider};
use crate::config::Settings;
use crate::error::FetchError;

/// Characters `encodeURIComponent` leaves alone; everything else in a title
/// is escaped before it goes into a `/wiki/` path.
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Fetches random articles from `https://{language}.{domain}`.
pub struct WikipediaSource {
    client: reqwest::Client,
    domain: String,
    placeholder_image: String,
    /// Replaces the per-language API endpoint; used to target a mock server.
    api_base: Option<String>,
}

impl WikipediaSource {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            domain: settings.domain.clone(),
            placeholder_image: settings.placeholder_image.clone(),
            api_base: None,
        })
    }

    /// Send every API call to `base` instead of the language subdomain.
    /// Article URLs are still built from the configured domain.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    fn api_url(&self, language: &str) -> String {
        match &self.api_base {
            Some(base) => base.clone(),
            None => format!("https://{language}.{}/w/api.php", self.domain),
        }
    }

    async fn get(&self, language: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(self.api_url(language))
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ContentProvider for WikipediaSource {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn fetch_batch(
        &self,
        language: &str,
        batch_size: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let limit = batch_size.to_string();
        let body = self
            .get(
                language,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("generator", "random"),
                    ("grnnamespace", "0"),
                    ("grnlimit", limit.as_str()),
                    ("origin", "*"),
                ],
            )
            .await?;

        let ids = parse_page_ids(&body)?;
        debug!("[{language}] discovered {} random page ids", ids.len());

        let page_ids = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let body = self
            .get(
                language,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("pageids", page_ids.as_str()),
                    ("prop", "extracts|pageimages"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("piprop", "original"),
                    ("origin", "*"),
                ],
            )
            .await?;

        let articles = parse_articles(&body, language, &self.domain, &self.placeholder_image)?;
        debug!("[{language}] fetched details for {} articles", articles.len());
        Ok(articles)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    pages: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawPage {
    title: String,
    extract: Option<String>,
    original: Option<RawImage>,
}

#[derive(Deserialize)]
struct RawImage {
    source: String,
}

/// Pull `query.pages` out of a response body, if the structure is there.
fn pages(body: &[u8]) -> Option<Map<String, Value>> {
    serde_json::from_slice::<QueryResponse>(body)
        .ok()?
        .query?
        .pages
}

/// Id of a page entry: its `pageid` field, else its key.
fn page_id(key: &str, page: &Value) -> Option<u64> {
    page.get("pageid")
        .and_then(Value::as_u64)
        .or_else(|| key.parse().ok())
}

/// Page ids from a `generator=random` response, in response order.
///
/// Anything that yields no ids (missing structure included) is
/// [`FetchError::EmptyResult`].
pub fn parse_page_ids(body: &[u8]) -> Result<Vec<u64>, FetchError> {
    let ids: Vec<u64> = pages(body)
        .unwrap_or_default()
        .iter()
        .filter_map(|(key, page)| page_id(key, page))
        .collect();

    if ids.is_empty() {
        return Err(FetchError::EmptyResult);
    }
    Ok(ids)
}

/// Articles from a `prop=extracts|pageimages` response, ordered by page id.
///
/// Pages the API flags as `missing` (deleted between the two calls) are
/// skipped.  A body without `query.pages`, or a page without a title or id,
/// is [`FetchError::MalformedResponse`].
pub fn parse_articles(
    body: &[u8],
    language: &str,
    domain: &str,
    placeholder_image: &str,
) -> Result<Vec<Article>, FetchError> {
    let pages = pages(body).ok_or(FetchError::MalformedResponse)?;

    let mut articles = pages
        .into_iter()
        .filter(|(_, page)| page.get("missing").is_none())
        .map(|(key, page)| {
            let id = page_id(&key, &page).ok_or(FetchError::MalformedResponse)?;
            let raw: RawPage =
                serde_json::from_value(page).map_err(|_| FetchError::MalformedResponse)?;
            let url = article_url(language, domain, &raw.title);
            Ok(Article::new(
                id,
                raw.title,
                raw.extract,
                raw.original.map(|image| image.source),
                url,
                placeholder_image,
            ))
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    articles.sort_by_key(Article::id);
    Ok(articles)
}

/// `https://{language}.{domain}/wiki/{title}` with the title percent-encoded.
pub fn article_url(language: &str, domain: &str, title: &str) -> String {
    format!(
        "https://{language}.{domain}/wiki/{}",
        utf8_percent_encode(title, TITLE_ENCODE_SET)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
