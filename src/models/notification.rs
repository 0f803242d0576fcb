use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::fragment::{full_text, required, required_attr, sel, Fragment};

static ITEM: Lazy<Selector> = Lazy::new(|| sel("li.notification"));
static HEADING: Lazy<Selector> = Lazy::new(|| sel("h2.heading-notification"));
static SUBJECT: Lazy<Selector> = Lazy::new(|| sel("article.comment[data-comment-id36]"));

/// Heading prefixes, checked in order.
const HEADING_KINDS: &[(&str, NotificationKind)] = &[
    ("You were mentioned in a comment", NotificationKind::Mention),
    ("Reply to your topic", NotificationKind::TopicReply),
    ("Reply to your comment", NotificationKind::CommentReply),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Mention,
    TopicReply,
    CommentReply,
    Unknown,
}

impl NotificationKind {
    /// Classify a notification heading by its prefix.
    #[must_use]
    pub fn from_heading(heading: &str) -> Self {
        let heading = heading.trim_start();
        HEADING_KINDS
            .iter()
            .find(|(prefix, _)| heading.starts_with(prefix))
            .map_or(Self::Unknown, |(_, kind)| *kind)
    }
}

/// A notification about a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// id36 of the comment that triggered the notification.
    pub subject: String,
    pub kind: NotificationKind,
}

impl Notification {
    /// Extract one notification list item.
    ///
    /// # Errors
    ///
    /// Fails on empty markup or a missing heading or subject comment.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        let scope = fragment.select_first(&ITEM).unwrap_or_else(|| fragment.root());
        Self::from_element(scope)
    }

    /// Extract every notification on a notifications page, in page order.
    ///
    /// # Errors
    ///
    /// Fails on the first item that cannot be extracted.
    pub fn list_from_html(html: &str) -> Result<Vec<Self>> {
        let fragment = Fragment::parse(html)?;
        fragment.select_all(&ITEM).map(Self::from_element).collect()
    }

    fn from_element(item: ElementRef<'_>) -> Result<Self> {
        let heading = full_text(required(item, &HEADING, "h2.heading-notification")?);
        let subject = required_attr(
            required(item, &SUBJECT, "article.comment[data-comment-id36]")?,
            "data-comment-id36",
        )?;
        let kind = NotificationKind::from_heading(&heading);

        debug!(subject = %subject, kind = ?kind, "Extracted notification");
        Ok(Self { subject, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_heading() {
        assert_eq!(
            NotificationKind::from_heading("You were mentioned in a comment on Foo"),
            NotificationKind::Mention
        );
        assert_eq!(
            NotificationKind::from_heading("  Reply to your topic Foo"),
            NotificationKind::TopicReply
        );
        assert_eq!(
            NotificationKind::from_heading("Reply to your comment on Foo"),
            NotificationKind::CommentReply
        );
        assert_eq!(
            NotificationKind::from_heading("Someone voted on your comment"),
            NotificationKind::Unknown
        );
    }
}
