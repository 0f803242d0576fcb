//! Topic log entries.
//!
//! The site renders each moderation/edit event as an English sentence after
//! the editor's user link, e.g. `changed title from "a" to "b"`. Parsing is
//! split in two steps: [`classify_sentence`] never fails and degrades to
//! [`LogEntryKind::Unknown`], while [`parse_sentence`] treats a classified
//! sentence whose payload does not match as template drift.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use tracing::warn;

use crate::error::{ExtractError, Result};
use crate::fragment::{own_text, required, required_attr, sel, trailing_text, Fragment};

static ENTRY: Lazy<Selector> = Lazy::new(|| sel("li.topic-log-entry"));
static USER_LINK: Lazy<Selector> = Lazy::new(|| sel("a.link-user"));
static TIME: Lazy<Selector> = Lazy::new(|| sel("time[datetime]"));

static QUOTED_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"'(.*?)'").unwrap());
static LINK_EDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"changed link from (\S+) to (\S+)").unwrap());
static TITLE_EDIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"changed title from "(.+)" to "(.+)""#).unwrap());
static MOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"moved from ~(\S+) to ~(\S+)").unwrap());

/// Separates the added and removed halves of a combined tag edit.
const TAG_BOUNDARY: &str = "' and removed tag";
/// Separates old and new title; may also occur inside a title.
const TITLE_DELIMITER: &str = "\" to \"";

/// The nine kinds of topic log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEntryKind {
    TagEdit,
    LinkEdit,
    TitleEdit,
    Lock,
    Unlock,
    Remove,
    Unremove,
    Move,
    Unknown,
}

/// Kind-specific payload of a log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEntryData {
    TagEdit {
        added: Vec<String>,
        removed: Vec<String>,
    },
    LinkEdit {
        old: String,
        new: String,
    },
    /// `certain` is false when the old/new split point was ambiguous.
    TitleEdit {
        old: String,
        new: String,
        certain: bool,
    },
    Lock,
    Unlock,
    Remove,
    Unremove,
    /// Group move; names are without the `~` prefix.
    Move {
        old: String,
        new: String,
    },
    Unknown,
}

impl LogEntryData {
    #[must_use]
    pub fn kind(&self) -> LogEntryKind {
        match self {
            Self::TagEdit { .. } => LogEntryKind::TagEdit,
            Self::LinkEdit { .. } => LogEntryKind::LinkEdit,
            Self::TitleEdit { .. } => LogEntryKind::TitleEdit,
            Self::Lock => LogEntryKind::Lock,
            Self::Unlock => LogEntryKind::Unlock,
            Self::Remove => LogEntryKind::Remove,
            Self::Unremove => LogEntryKind::Unremove,
            Self::Move { .. } => LogEntryKind::Move,
            Self::Unknown => LogEntryKind::Unknown,
        }
    }
}

/// One line of a topic's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicLogEntry {
    /// Username of the editor.
    pub user: String,
    /// ISO-8601 timestamp from the `datetime` attribute.
    pub timestamp: String,
    #[serde(flatten)]
    pub data: LogEntryData,
}

impl TopicLogEntry {
    /// Extract a log entry from a fragment holding one `li.topic-log-entry`.
    ///
    /// # Errors
    ///
    /// Fails if the markup is empty, the user link or time is missing, or the
    /// sentence drifted from its template.
    pub fn from_html(html: &str) -> Result<Self> {
        let fragment = Fragment::parse(html)?;
        let scope = fragment.select_first(&ENTRY).unwrap_or_else(|| fragment.root());
        Self::from_element(scope)
    }

    pub(crate) fn from_element(entry: ElementRef<'_>) -> Result<Self> {
        let user_link = required(entry, &USER_LINK, "a.link-user")?;
        let user = own_text(user_link);
        let timestamp = required_attr(required(entry, &TIME, "time[datetime]")?, "datetime")?;

        let tail = trailing_text(user_link);
        let data = parse_sentence(tail.trim())?;

        Ok(Self {
            user,
            timestamp,
            data,
        })
    }

    #[must_use]
    pub fn kind(&self) -> LogEntryKind {
        self.data.kind()
    }

    /// The timestamp as a UTC instant, if it is valid RFC 3339.
    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Decide which kind of event a sentence describes.
///
/// Prefixes are tested in a fixed order so that e.g. `unlocked comments` is
/// never read as `locked comments` and `removed tag` never as `removed`.
#[must_use]
pub fn classify_sentence(sentence: &str) -> LogEntryKind {
    if sentence.starts_with("added tag") || sentence.starts_with("removed tag") {
        LogEntryKind::TagEdit
    } else if sentence.starts_with("changed link") {
        LogEntryKind::LinkEdit
    } else if sentence.starts_with("changed title") {
        LogEntryKind::TitleEdit
    } else if sentence.starts_with("unlocked comments") {
        LogEntryKind::Unlock
    } else if sentence.starts_with("locked comments") {
        LogEntryKind::Lock
    } else if sentence.starts_with("un-removed") {
        LogEntryKind::Unremove
    } else if sentence.starts_with("removed") {
        LogEntryKind::Remove
    } else if sentence.starts_with("moved") {
        LogEntryKind::Move
    } else {
        LogEntryKind::Unknown
    }
}

/// Classify a sentence and extract its payload.
///
/// # Errors
///
/// Returns [`ExtractError::TemplateMismatch`] when the sentence is classified
/// as a kind with a payload but the payload pattern does not match.
pub fn parse_sentence(sentence: &str) -> Result<LogEntryData> {
    let kind = classify_sentence(sentence);
    let mismatch = || ExtractError::TemplateMismatch {
        kind,
        text: sentence.to_string(),
    };

    let data = match kind {
        LogEntryKind::TagEdit => parse_tag_edit(sentence).ok_or_else(mismatch)?,
        LogEntryKind::LinkEdit => {
            let caps = LINK_EDIT.captures(sentence).ok_or_else(mismatch)?;
            LogEntryData::LinkEdit {
                old: caps[1].to_string(),
                new: caps[2].to_string(),
            }
        }
        LogEntryKind::TitleEdit => {
            let caps = TITLE_EDIT.captures(sentence).ok_or_else(mismatch)?;
            LogEntryData::TitleEdit {
                old: caps[1].to_string(),
                new: caps[2].to_string(),
                certain: sentence.matches(TITLE_DELIMITER).count() == 1,
            }
        }
        LogEntryKind::Move => {
            let caps = MOVE.captures(sentence).ok_or_else(mismatch)?;
            LogEntryData::Move {
                old: caps[1].to_string(),
                new: caps[2].to_string(),
            }
        }
        LogEntryKind::Lock => LogEntryData::Lock,
        LogEntryKind::Unlock => LogEntryData::Unlock,
        LogEntryKind::Remove => LogEntryData::Remove,
        LogEntryKind::Unremove => LogEntryData::Unremove,
        LogEntryKind::Unknown => {
            warn!(sentence = %sentence, "Unrecognized topic log sentence");
            LogEntryData::Unknown
        }
    };

    Ok(data)
}

/// `added tag(s) 'a'[, 'b'][ and removed tag(s) 'c'[, 'd']]`, or a
/// removal on its own. Every present half must name at least one tag.
fn parse_tag_edit(sentence: &str) -> Option<LogEntryData> {
    let (added_region, removed_region) = match sentence.find(TAG_BOUNDARY) {
        // The closing quote of the last added tag stays in the added half.
        Some(idx) => (&sentence[..=idx], &sentence[idx + 1..]),
        None if sentence.starts_with("removed") => ("", sentence),
        None => (sentence, ""),
    };

    let added = quoted_tags(added_region);
    let removed = quoted_tags(removed_region);

    let added_ok = added_region.is_empty() || !added.is_empty();
    let removed_ok = removed_region.is_empty() || !removed.is_empty();
    (added_ok && removed_ok).then_some(LogEntryData::TagEdit { added, removed })
}

fn quoted_tags(region: &str) -> Vec<String> {
    QUOTED_TAG
        .captures_iter(region)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify_sentence("removed tag 'x'"), LogEntryKind::TagEdit);
        assert_eq!(classify_sentence("removed the topic"), LogEntryKind::Remove);
        assert_eq!(classify_sentence("un-removed the topic"), LogEntryKind::Unremove);
        assert_eq!(classify_sentence("unlocked comments"), LogEntryKind::Unlock);
        assert_eq!(classify_sentence("locked comments"), LogEntryKind::Lock);
        assert_eq!(classify_sentence("pinned the topic"), LogEntryKind::Unknown);
    }

    #[test]
    fn test_single_added_tag() {
        assert_eq!(
            parse_sentence("added tag 'music'").unwrap(),
            LogEntryData::TagEdit {
                added: vec!["music".to_string()],
                removed: vec![],
            }
        );
    }

    #[test]
    fn test_added_and_removed_tags() {
        assert_eq!(
            parse_sentence("added tags 'music', 'tv' and removed tag 'talk'").unwrap(),
            LogEntryData::TagEdit {
                added: vec!["music".to_string(), "tv".to_string()],
                removed: vec!["talk".to_string()],
            }
        );
    }

    #[test]
    fn test_removed_tags_only() {
        assert_eq!(
            parse_sentence("removed tags 'a.b', 'c d'").unwrap(),
            LogEntryData::TagEdit {
                added: vec![],
                removed: vec!["a.b".to_string(), "c d".to_string()],
            }
        );
    }

    #[test]
    fn test_tag_edit_without_tags_is_drift() {
        let err = parse_sentence("added tags music and tv").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::TemplateMismatch {
                kind: LogEntryKind::TagEdit,
                ..
            }
        ));
    }

    #[test]
    fn test_link_edit() {
        assert_eq!(
            parse_sentence("changed link from https://example.com to https://example.com/a")
                .unwrap(),
            LogEntryData::LinkEdit {
                old: "https://example.com".to_string(),
                new: "https://example.com/a".to_string(),
            }
        );
    }

    #[test]
    fn test_link_edit_drift() {
        assert!(matches!(
            parse_sentence("changed link to https://example.com"),
            Err(ExtractError::TemplateMismatch {
                kind: LogEntryKind::LinkEdit,
                ..
            })
        ));
    }

    #[test]
    fn test_title_edit_certain() {
        assert_eq!(
            parse_sentence(r#"changed title from "More tests? Yes." to "More tests? Yes. No.""#)
                .unwrap(),
            LogEntryData::TitleEdit {
                old: "More tests? Yes.".to_string(),
                new: "More tests? Yes. No.".to_string(),
                certain: true,
            }
        );
    }

    #[test]
    fn test_title_edit_ambiguous() {
        let data = parse_sentence(r#"changed title from "A bc" to "A bc " to "blorb""#).unwrap();
        match data {
            LogEntryData::TitleEdit { certain, old, .. } => {
                assert!(!certain);
                assert!(old.starts_with("A bc"));
            }
            other => panic!("expected a title edit, got {other:?}"),
        }
    }

    #[test]
    fn test_move() {
        assert_eq!(
            parse_sentence("moved from ~test to ~test.child").unwrap(),
            LogEntryData::Move {
                old: "test".to_string(),
                new: "test.child".to_string(),
            }
        );
    }

    #[test]
    fn test_payloadless_kinds() {
        assert_eq!(parse_sentence("locked comments").unwrap(), LogEntryData::Lock);
        assert_eq!(parse_sentence("unlocked comments").unwrap(), LogEntryData::Unlock);
        assert_eq!(parse_sentence("removed").unwrap(), LogEntryData::Remove);
        assert_eq!(parse_sentence("un-removed").unwrap(), LogEntryData::Unremove);
    }

    #[test]
    fn test_unknown_sentence_is_tolerated() {
        let data = parse_sentence("marked the topic as official").unwrap();
        assert_eq!(data, LogEntryData::Unknown);
        assert_eq!(data.kind(), LogEntryKind::Unknown);
    }

    #[test]
    fn test_serialized_shape() {
        let entry = TopicLogEntry {
            user: "TestUser".to_string(),
            timestamp: "2019-06-28T16:23:23Z".to_string(),
            data: LogEntryData::Lock,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "LOCK");
        assert!(json.get("data").is_none());
        assert_eq!(json["user"], "TestUser");
    }
}
