//! The article record produced by every content provider.
//!
//! `Article` is what the rest of the application sees: the feed controller
//! appends them, the UI renders them as cards.  Providers normalise their
//! native page format into this struct, filling the placeholders for missing
//! excerpts and images so the UI never has to.

/// Shown when a page has no plain-text intro.
pub const NO_DESCRIPTION: &str = "No description available";

/// A single random article, normalised from a provider response.
///
/// Immutable once built: fields are private and exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: u64,
    title: String,
    extract: String,
    image_url: String,
    url: String,
}

impl Article {
    /// Build an article, substituting [`NO_DESCRIPTION`] for a missing or
    /// blank extract and `placeholder_image` for a missing image.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        extract: Option<String>,
        image_url: Option<String>,
        url: impl Into<String>,
        placeholder_image: &str,
    ) -> Self {
        let extract = extract
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        let image_url = image_url
            .filter(|src| !src.is_empty())
            .unwrap_or_else(|| placeholder_image.to_string());

        Self {
            id,
            title: title.into(),
            extract,
            image_url,
            url: url.into(),
        }
    }

    /// Page identifier.  Unique within one language, not across languages.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn extract(&self) -> &str {
        &self.extract
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Canonical URL of the article on the provider's site.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "https://example.org/placeholder.png";

    #[test]
    fn keeps_provided_fields() {
        let article = Article::new(
            7,
            "Rust",
            Some("A language.".into()),
            Some("https://example.org/rust.png".into()),
            "https://en.wikipedia.org/wiki/Rust",
            PLACEHOLDER,
        );

        assert_eq!(article.id(), 7);
        assert_eq!(article.title(), "Rust");
        assert_eq!(article.extract(), "A language.");
        assert_eq!(article.image_url(), "https://example.org/rust.png");
        assert_eq!(article.url(), "https://en.wikipedia.org/wiki/Rust");
    }

    #[test]
    fn missing_extract_and_image_use_placeholders() {
        let article = Article::new(1, "Stub", None, None, "u", PLACEHOLDER);
        assert_eq!(article.extract(), NO_DESCRIPTION);
        assert_eq!(article.image_url(), PLACEHOLDER);
    }

    #[test]
    fn blank_extract_counts_as_missing() {
        let article = Article::new(1, "Stub", Some("  \n".into()), Some(String::new()), "u", PLACEHOLDER);
        assert_eq!(article.extract(), NO_DESCRIPTION);
        assert_eq!(article.image_url(), PLACEHOLDER);
    }
}
