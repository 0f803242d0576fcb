//! Fragment kind dispatch and JSON rendering for the `tildee-dump` binary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::error::ExtractError;
use crate::models::{
    Comment, Conversation, Group, Notification, Topic, TopicListing, TopicLogEntry, WikiPage,
};

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("unknown fragment kind: {0}")]
    UnknownKind(String),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which extractor a fragment should be fed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Topic,
    Comment,
    Notification,
    Notifications,
    Conversation,
    LogEntry,
    Group,
    Wiki,
    Listing,
    Listings,
}

impl FragmentKind {
    pub const ALL: [Self; 10] = [
        Self::Topic,
        Self::Comment,
        Self::Notification,
        Self::Notifications,
        Self::Conversation,
        Self::LogEntry,
        Self::Group,
        Self::Wiki,
        Self::Listing,
        Self::Listings,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Comment => "comment",
            Self::Notification => "notification",
            Self::Notifications => "notifications",
            Self::Conversation => "conversation",
            Self::LogEntry => "log-entry",
            Self::Group => "group",
            Self::Wiki => "wiki",
            Self::Listing => "listing",
            Self::Listings => "listings",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FragmentKind {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| DumpError::UnknownKind(s.to_string()))
    }
}

/// Extract `html` as `kind` and render the record as JSON.
///
/// # Errors
///
/// Returns the extraction failure, or a serialization failure.
pub fn extract_json(kind: FragmentKind, html: &str, pretty: bool) -> Result<String, DumpError> {
    match kind {
        FragmentKind::Topic => render(&Topic::from_html(html)?, pretty),
        FragmentKind::Comment => render(&Comment::from_html(html)?, pretty),
        FragmentKind::Notification => render(&Notification::from_html(html)?, pretty),
        FragmentKind::Notifications => render(&Notification::list_from_html(html)?, pretty),
        FragmentKind::Conversation => render(&Conversation::from_html(html)?, pretty),
        FragmentKind::LogEntry => render(&TopicLogEntry::from_html(html)?, pretty),
        FragmentKind::Group => render(&Group::from_html(html)?, pretty),
        FragmentKind::Wiki => render(&WikiPage::from_html(html)?, pretty),
        FragmentKind::Listing => render(&TopicListing::from_html(html)?, pretty),
        FragmentKind::Listings => render(&TopicListing::list_from_html(html)?, pretty),
    }
}

fn render<T: Serialize>(record: &T, pretty: bool) -> Result<String, DumpError> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}
