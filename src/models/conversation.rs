use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::fragment::{full_text, inner_html, own_text, required, required_attr, sel, Fragment};

static TITLE: Lazy<Selector> = Lazy::new(|| sel("h1.heading-main"));
static MESSAGE: Lazy<Selector> = Lazy::new(|| sel("article.message"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| sel("a.link-user"));
static POSTED_TIME: Lazy<Selector> = Lazy::new(|| sel("time.time-responsive[datetime]"));
static TEXT: Lazy<Selector> = Lazy::new(|| sel("div.message-text"));

/// A private conversation and its messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub title: String,
    pub entries: Vec<Message>,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub author: String,
    pub timestamp: String,
    /// Rendered HTML of the message body.
    pub content: String,
}

impl Conversation {
    /// Extract a conversation from a full conversation page.
    ///
    /// # Errors
    ///
    /// Fails on empty markup, a missing title, or a message without author,
    /// time or body.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        let title = full_text(fragment.require(&TITLE, "h1.heading-main")?);
        let entries = fragment
            .select_all(&MESSAGE)
            .map(Message::from_element)
            .collect::<Result<Vec<_>>>()?;

        debug!(title = %title, messages = entries.len(), "Extracted conversation");
        Ok(Self { title, entries })
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Message> {
        self.entries.last()
    }
}

impl Message {
    fn from_element(message: ElementRef<'_>) -> Result<Self> {
        Ok(Self {
            author: own_text(required(message, &AUTHOR, "a.link-user")?),
            timestamp: required_attr(
                required(message, &POSTED_TIME, "time.time-responsive")?,
                "datetime",
            )?,
            content: inner_html(required(message, &TEXT, "div.message-text")?),
        })
    }

    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
