//! Integration tests for topic log entry parsing from `li.topic-log-entry` markup.

use tildee::{ExtractError, LogEntryData, LogEntryKind, TopicLogEntry};

fn entry(sentence: &str) -> String {
    format!(
        r#"<li class="topic-log-entry">
              <a href="/user/TestUser" class="link-user">TestUser</a>
            {sentence}
            <span class="topic-log-entry-time">(<time datetime="2019-06-28T16:23:23Z" title="2019-06-28 16:23:23 UTC">5d 1h ago</time>)</span>
          </li>"#
    )
}

#[test]
fn test_link_edit_entry() {
    let output = TopicLogEntry::from_html(&entry(
        "changed link from https://example.com to https://example.com/a",
    ))
    .unwrap();

    assert_eq!(output.user, "TestUser");
    assert_eq!(output.timestamp, "2019-06-28T16:23:23Z");
    assert_eq!(output.kind(), LogEntryKind::LinkEdit);
    assert_eq!(
        output.data,
        LogEntryData::LinkEdit {
            old: "https://example.com".to_string(),
            new: "https://example.com/a".to_string(),
        }
    );
}

#[test]
fn test_title_edit_entry_certain() {
    let output = TopicLogEntry::from_html(&entry(
        r#"changed title from "More tests? Yes." to "More tests? Yes. No.""#,
    ))
    .unwrap();

    assert_eq!(
        output.data,
        LogEntryData::TitleEdit {
            old: "More tests? Yes.".to_string(),
            new: "More tests? Yes. No.".to_string(),
            certain: true,
        }
    );
}

#[test]
fn test_title_edit_entry_uncertain() {
    let output = TopicLogEntry::from_html(&entry(
        r#"changed title from "A bc" to "A bc " to "blorb"""#,
    ))
    .unwrap();

    assert_eq!(output.kind(), LogEntryKind::TitleEdit);
    match output.data {
        LogEntryData::TitleEdit { certain, .. } => assert!(!certain),
        other => panic!("expected a title edit, got {other:?}"),
    }
}

#[test]
fn test_tag_edit_entries() {
    let single = TopicLogEntry::from_html(&entry("added tag 'music'")).unwrap();
    assert_eq!(
        single.data,
        LogEntryData::TagEdit {
            added: vec!["music".to_string()],
            removed: vec![],
        }
    );

    let combined = TopicLogEntry::from_html(&entry(
        "added tags 'music', 'tv' and removed tag 'talk'",
    ))
    .unwrap();
    assert_eq!(
        combined.data,
        LogEntryData::TagEdit {
            added: vec!["music".to_string(), "tv".to_string()],
            removed: vec!["talk".to_string()],
        }
    );

    let removed_several = TopicLogEntry::from_html(&entry(
        "added tag 'a' and removed tags 'b', 'c'",
    ))
    .unwrap();
    assert_eq!(
        removed_several.data,
        LogEntryData::TagEdit {
            added: vec!["a".to_string()],
            removed: vec!["b".to_string(), "c".to_string()],
        }
    );
}

#[test]
fn test_move_and_state_entries() {
    let moved = TopicLogEntry::from_html(&entry("moved from ~test to ~music")).unwrap();
    assert_eq!(
        moved.data,
        LogEntryData::Move {
            old: "test".to_string(),
            new: "music".to_string(),
        }
    );

    for (sentence, kind) in [
        ("locked comments", LogEntryKind::Lock),
        ("unlocked comments", LogEntryKind::Unlock),
        ("removed", LogEntryKind::Remove),
        ("un-removed", LogEntryKind::Unremove),
    ] {
        let output = TopicLogEntry::from_html(&entry(sentence)).unwrap();
        assert_eq!(output.kind(), kind, "sentence: {sentence}");
    }
}

#[test]
fn test_unrecognized_sentence_is_unknown() {
    let output = TopicLogEntry::from_html(&entry("bookmarked the topic for later")).unwrap();
    assert_eq!(output.kind(), LogEntryKind::Unknown);
    assert_eq!(output.data, LogEntryData::Unknown);

    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["kind"], "UNKNOWN");
    assert!(json.get("data").is_none());
}

#[test]
fn test_template_drift_is_an_error() {
    let err = TopicLogEntry::from_html(&entry("moved to ~music")).unwrap_err();
    assert_eq!(
        err,
        ExtractError::TemplateMismatch {
            kind: LogEntryKind::Move,
            text: "moved to ~music".to_string(),
        }
    );
}

#[test]
fn test_missing_user_link() {
    let err = TopicLogEntry::from_html(
        r#"<li class="topic-log-entry">somebody locked comments
            <time datetime="2019-06-28T16:23:23Z">now</time></li>"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ExtractError::MissingRequiredElement {
            element: "a.link-user".to_string()
        }
    );
}

#[test]
fn test_timestamp_uses_machine_readable_attribute() {
    let output = TopicLogEntry::from_html(&entry("locked comments")).unwrap();
    let posted = output.posted_at().unwrap();
    assert_eq!(posted.to_rfc3339(), "2019-06-28T16:23:23+00:00");
}
