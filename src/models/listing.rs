//! Topics as they appear in a group or front-page listing.
//!
//! A listing article is a partial topic: it carries counts and metadata but
//! neither the body, the log, nor any comments.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::fragment::{
    attr, first, full_text, group_name, leading_integer, own_text, required, required_attr, sel,
    Fragment,
};

static ARTICLE: Lazy<Selector> = Lazy::new(|| sel("article.topic[data-topic-id36]"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| sel("h1.topic-title > a"));
static GROUP: Lazy<Selector> = Lazy::new(|| sel(".topic-group a"));
static TAG: Lazy<Selector> = Lazy::new(|| sel("ul.topic-tags > li > a"));
static CONTENT_TYPE: Lazy<Selector> = Lazy::new(|| sel(".topic-content-type"));
static POSTED_TIME: Lazy<Selector> = Lazy::new(|| sel("time[datetime]"));
static VOTES: Lazy<Selector> = Lazy::new(|| sel(".topic-voting-votes"));
static COMMENTS: Lazy<Selector> = Lazy::new(|| sel(".topic-info-comments"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicListing {
    pub id36: String,
    pub title: String,
    /// Group name without the `~` prefix.
    pub group: String,
    pub tags: Vec<String>,
    /// External URL for link topics; text topics link to themselves and get `None`.
    pub link: Option<String>,
    /// Label such as "Article" or "Video", when the listing shows one.
    pub content_type: Option<String>,
    pub timestamp: String,
    pub num_votes: u32,
    pub num_comments: u32,
}

impl TopicListing {
    /// Extract one listing article.
    ///
    /// # Errors
    ///
    /// Fails on empty markup or a missing article, title link, group or time.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        Self::from_element(fragment.require(&ARTICLE, "article.topic[data-topic-id36]")?)
    }

    /// Extract every listing article on a page, in page order.
    ///
    /// # Errors
    ///
    /// Fails on the first article that cannot be extracted.
    pub fn list_from_html(html: &str) -> Result<Vec<Self>> {
        let fragment = Fragment::parse(html)?;
        fragment.select_all(&ARTICLE).map(Self::from_element).collect()
    }

    fn from_element(article: ElementRef<'_>) -> Result<Self> {
        let id36 = required_attr(article, "data-topic-id36")?;
        let title_link = required(article, &TITLE_LINK, "h1.topic-title > a")?;
        let title = full_text(title_link);
        let link = attr(title_link, "href").and_then(external_link);
        let group = group_name(&own_text(required(article, &GROUP, ".topic-group a")?));
        let tags = article.select(&TAG).map(own_text).collect();
        let content_type = first(article, &CONTENT_TYPE)
            .map(full_text)
            .filter(|label| !label.is_empty());
        let timestamp = required_attr(
            required(article, &POSTED_TIME, "time[datetime]")?,
            "datetime",
        )?;
        let num_votes =
            first(article, &VOTES).map_or(0, |votes| leading_integer(&full_text(votes)));
        let num_comments =
            first(article, &COMMENTS).map_or(0, |count| leading_integer(&full_text(count)));

        debug!(id36 = %id36, group = %group, "Extracted topic listing");

        Ok(Self {
            id36,
            title,
            group,
            tags,
            link,
            content_type,
            timestamp,
            num_votes,
            num_comments,
        })
    }
}

/// Absolute http(s) URLs point off-site; relative hrefs are topic permalinks.
fn external_link(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_link() {
        assert_eq!(
            external_link("https://example.com/a?b=c"),
            Some("https://example.com/a?b=c".to_string())
        );
        assert_eq!(external_link("/~music/2a/some_title"), None);
        assert_eq!(external_link("mailto:someone@example.com"), None);
    }
}
