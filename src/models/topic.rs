use once_cell::sync::Lazy;
use scraper::Selector;
use serde::Serialize;
use tracing::debug;

use super::comment::Comment;
use super::log_entry::TopicLogEntry;
use crate::error::Result;
use crate::fragment::{
    attr, first, full_text, group_name, inner_html, leading_integer, own_text, required_attr,
    sel, Fragment,
};
use crate::status::{topic_status, AccessStatus};

static GROUP: Lazy<Selector> = Lazy::new(|| sel("a.site-header-context"));
static TAG: Lazy<Selector> = Lazy::new(|| sel("ul.topic-tags > li > a"));
static ARTICLE: Lazy<Selector> = Lazy::new(|| sel("article.topic-full"));
static TITLE: Lazy<Selector> = Lazy::new(|| sel("article.topic-full > header > h1"));
static TEXT: Lazy<Selector> = Lazy::new(|| sel("div.topic-full-text"));
static LINK: Lazy<Selector> = Lazy::new(|| sel("div.topic-full-link > a[href]"));
static AUTHOR: Lazy<Selector> =
    Lazy::new(|| sel("article.topic-full > header .topic-full-byline a.link-user"));
static POSTED_TIME: Lazy<Selector> =
    Lazy::new(|| sel("article.topic-full > header .topic-full-byline time[datetime]"));
static VOTES: Lazy<Selector> = Lazy::new(|| sel(".topic-voting-votes"));
static COMMENT_COUNT: Lazy<Selector> = Lazy::new(|| sel("section.topic-comments > header > h2"));
static LOG_ENTRY: Lazy<Selector> = Lazy::new(|| sel("ol.topic-log-listing > li.topic-log-entry"));
static TOP_LEVEL_COMMENT: Lazy<Selector> =
    Lazy::new(|| sel("ol#comments > li > article.comment"));

/// A full topic page.
///
/// Hidden topics (see [`AccessStatus`]) keep `group`, `tags` and `title`;
/// every other field is empty and `log`/`comments` are not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub tags: Vec<String>,
    /// Group name without the `~` prefix.
    pub group: String,
    pub title: String,
    pub status: AccessStatus,
    /// Rendered HTML of the text body, for text topics.
    pub content: Option<String>,
    /// Target URL, for link topics.
    pub link: Option<String>,
    pub author: String,
    pub timestamp: String,
    pub num_votes: u32,
    pub num_comments: u32,
    /// Oldest entry first.
    pub log: Vec<TopicLogEntry>,
    /// Top-level comments; replies hang off each comment.
    pub comments: Vec<Comment>,
}

impl Topic {
    /// Extract a topic from a full topic page.
    ///
    /// # Errors
    ///
    /// Fails on empty markup, an unknown status warning, a log sentence that
    /// drifted from its template, or a missing group, title, author or time.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;

        let group = group_name(&own_text(fragment.require(&GROUP, "a.site-header-context")?));
        let tags = fragment.select_all(&TAG).map(own_text).collect();
        let title = own_text(fragment.require(&TITLE, "article.topic-full > header > h1")?);

        let article = fragment.require(&ARTICLE, "article.topic-full")?;
        let status = topic_status(article)?;
        if !status.is_full() {
            return Ok(Self::hidden(tags, group, title, status));
        }

        let content = first(article, &TEXT).map(inner_html);
        let link = first(article, &LINK)
            .and_then(|a| attr(a, "href"))
            .map(str::to_string);

        let author = own_text(fragment.require(&AUTHOR, "topic byline a.link-user")?);
        let timestamp = required_attr(
            fragment.require(&POSTED_TIME, "topic byline time[datetime]")?,
            "datetime",
        )?;
        let num_votes =
            first(article, &VOTES).map_or(0, |votes| leading_integer(&full_text(votes)));
        let num_comments = fragment
            .select_first(&COMMENT_COUNT)
            .map_or(0, |heading| leading_integer(&full_text(heading)));

        // The sidebar lists the newest entry first.
        let mut log = fragment
            .select_all(&LOG_ENTRY)
            .map(TopicLogEntry::from_element)
            .collect::<Result<Vec<_>>>()?;
        log.reverse();

        let comments = fragment
            .select_all(&TOP_LEVEL_COMMENT)
            .map(Comment::from_element)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            group = %group,
            title = %title,
            log_entries = log.len(),
            top_level_comments = comments.len(),
            "Extracted topic"
        );

        Ok(Self {
            tags,
            group,
            title,
            status,
            content,
            link,
            author,
            timestamp,
            num_votes,
            num_comments,
            log,
            comments,
        })
    }

    fn hidden(tags: Vec<String>, group: String, title: String, status: AccessStatus) -> Self {
        Self {
            tags,
            group,
            title,
            status,
            content: None,
            link: None,
            author: String::new(),
            timestamp: String::new(),
            num_votes: 0,
            num_comments: 0,
            log: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Number of comments in the loaded forest, replies included.
    #[must_use]
    pub fn comment_count_loaded(&self) -> usize {
        self.comments.iter().map(|c| c.walk().count()).sum()
    }
}
