//! Visibility classification for topics and comments.
//!
//! A hidden topic or comment replaces its body with a short warning. The
//! warning's wording is the only thing telling an author deletion apart from
//! an admin removal, so unfamiliar wording is surfaced as an error instead of
//! being read as visible content.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::fragment::{child_elements, first, full_text, sel};

static TOPIC_MARKER: Lazy<Selector> = Lazy::new(|| sel(".topic-removed-warning"));
static COMMENT_MARKER: Lazy<Selector> = Lazy::new(|| sel(".comment-removed-warning"));

const DELETED_PHRASE: &str = "deleted by author";
const REMOVED_PHRASE: &str = "removed by site admin";

/// Whether a topic or comment's content is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    /// Content fields are populated.
    Full,
    /// Hidden by its author.
    Deleted,
    /// Hidden by a site admin.
    Removed,
}

impl AccessStatus {
    #[must_use]
    pub fn is_full(self) -> bool {
        self == Self::Full
    }
}

/// Classify the text of a removal/deletion warning.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownStatus`] carrying the text when it names
/// neither a deletion nor a removal.
pub fn classify_indicator(text: &str) -> Result<AccessStatus> {
    let lowered = text.to_lowercase();
    if lowered.contains(DELETED_PHRASE) {
        Ok(AccessStatus::Deleted)
    } else if lowered.contains(REMOVED_PHRASE) {
        Ok(AccessStatus::Removed)
    } else {
        Err(ExtractError::UnknownStatus {
            text: text.trim().to_string(),
        })
    }
}

/// Status of a full topic, read from the warning directly under its article.
///
/// # Errors
///
/// Returns [`ExtractError::UnknownStatus`] for an unrecognized warning.
pub fn topic_status(topic_article: ElementRef<'_>) -> Result<AccessStatus> {
    let marker = child_elements(topic_article, &TOPIC_MARKER).next();
    resolve(marker, "topic")
}

/// Status of a comment, read from its own region (never from its replies).
///
/// # Errors
///
/// Returns [`ExtractError::UnknownStatus`] for an unrecognized warning.
pub fn comment_status(comment_itself: ElementRef<'_>) -> Result<AccessStatus> {
    let marker = first(comment_itself, &COMMENT_MARKER);
    resolve(marker, "comment")
}

fn resolve(marker: Option<ElementRef<'_>>, record: &str) -> Result<AccessStatus> {
    let Some(marker) = marker else {
        return Ok(AccessStatus::Full);
    };
    let status = classify_indicator(&full_text(marker))?;
    debug!(record, status = ?status, "Content hidden, skipping content fields");
    Ok(status)
}
